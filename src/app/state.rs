// ABOUTME: Application state and async request plumbing for the setup wizard TUI
// AppState is synchronous and testable; App owns the API handle and the response channel

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::api::AdminApi;
use crate::wizard::{execute, Dispatch, SubmissionStatus, Ticket, WizardResponse, WizardState};

/// How the wizard session ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppOutcome {
    Cancelled,
    /// Configuration saved; carries the backend's message
    Completed(String),
}

#[derive(Debug)]
pub struct AppState {
    pub wizard: WizardState,
    pub should_quit: bool,
    pub outcome: Option<AppOutcome>,
    pending: Vec<Dispatch>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// Fresh wizard with the environment lookup already queued
    pub fn new() -> Self {
        let mut state = Self {
            wizard: WizardState::new(),
            should_quit: false,
            outcome: None,
            pending: Vec::new(),
        };
        let dispatch = state.wizard.load_environment();
        state.queue(dispatch);
        state
    }

    pub fn queue(&mut self, dispatch: Option<Dispatch>) {
        if let Some(dispatch) = dispatch {
            self.pending.push(dispatch);
        }
    }

    /// Requests waiting to be run, oldest first
    pub fn take_pending(&mut self) -> Vec<Dispatch> {
        std::mem::take(&mut self.pending)
    }

    pub fn apply(&mut self, ticket: Ticket, response: WizardResponse) -> bool {
        self.wizard.apply(ticket, response)
    }

    /// Leave the wizard. In-flight results are ignored from here on.
    ///
    /// Once the backend has confirmed the save, leaving counts as finishing.
    pub fn quit(&mut self) {
        if self.wizard.is_completed() {
            self.finish();
            return;
        }
        self.wizard.unmount();
        self.pending.clear();
        self.outcome.get_or_insert(AppOutcome::Cancelled);
        self.should_quit = true;
    }

    /// Leave after a successful save
    pub fn finish(&mut self) {
        if let SubmissionStatus::Completed(message) = &self.wizard.submission {
            self.outcome = Some(AppOutcome::Completed(message.clone()));
        }
        self.wizard.unmount();
        self.should_quit = true;
    }
}

pub struct App {
    pub state: AppState,
    api: Arc<dyn AdminApi>,
    tx: mpsc::UnboundedSender<(Ticket, WizardResponse)>,
    rx: mpsc::UnboundedReceiver<(Ticket, WizardResponse)>,
}

impl App {
    pub fn new(api: Arc<dyn AdminApi>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            state: AppState::new(),
            api,
            tx,
            rx,
        }
    }

    /// Spawn every queued request; results come back through the channel
    pub fn dispatch_pending(&mut self) {
        for Dispatch { ticket, request } in self.state.take_pending() {
            let api = Arc::clone(&self.api);
            let tx = self.tx.clone();
            tokio::spawn(async move {
                let response = execute(api.as_ref(), request).await;
                // Receiver gone means the app already exited
                let _ = tx.send((ticket, response));
            });
        }
    }

    /// Apply responses that have arrived. Returns true if anything changed.
    pub fn tick(&mut self) -> bool {
        self.dispatch_pending();

        let mut changed = false;
        while let Ok((ticket, response)) = self.rx.try_recv() {
            changed |= self.state.apply(ticket, response);
        }
        if changed {
            debug!("Applied backend responses");
        }
        changed
    }

    /// Wait for one response and apply it
    pub async fn next_response(&mut self) -> Option<bool> {
        self.dispatch_pending();
        let (ticket, response) = self.rx.recv().await?;
        let applied = self.state.apply(ticket, response);
        if !applied {
            info!("Discarded stale response (seq {})", ticket.seq);
        }
        Some(applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiError, MockAdminApi};
    use crate::wizard::{EnvironmentStatus, WizardRequest};

    #[test]
    fn test_new_state_queues_environment_lookup() {
        let mut state = AppState::new();
        let pending = state.take_pending();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].request, WizardRequest::LoadEnvironment);
        assert!(state.take_pending().is_empty());
    }

    #[test]
    fn test_quit_drops_pending_and_unmounts() {
        let mut state = AppState::new();
        state.quit();
        assert!(state.should_quit);
        assert!(!state.wizard.is_mounted());
        assert!(state.take_pending().is_empty());
        assert_eq!(state.outcome, Some(AppOutcome::Cancelled));
    }

    #[tokio::test]
    async fn test_environment_failure_reaches_wizard() {
        let mut api = MockAdminApi::new();
        api.expect_env_vars()
            .times(1)
            .returning(|| Err(ApiError::status(502, "")));

        let mut app = App::new(Arc::new(api));
        assert_eq!(app.next_response().await, Some(true));
        assert_eq!(
            app.state.wizard.env_status,
            EnvironmentStatus::Unavailable("HTTP 502".to_string())
        );
    }

    #[tokio::test]
    async fn test_response_after_quit_is_discarded() {
        let mut api = MockAdminApi::new();
        api.expect_env_vars().returning(|| {
            Ok(crate::wizard::EnvironmentOverrideFlags {
                plex_token_from_env: true,
                ..Default::default()
            })
        });

        let mut app = App::new(Arc::new(api));
        app.dispatch_pending();
        app.state.quit();

        assert_eq!(app.next_response().await, Some(false));
        assert!(!app.state.wizard.env.plex_token_from_env);
    }
}
