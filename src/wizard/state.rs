// ABOUTME: Setup wizard sequencer
// Owns the current step, the shared configuration, and the per-step forms; tickets keep late
// backend results from touching a wizard that was closed or a step that moved on

use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, info, warn};

use super::config::WizardConfiguration;
use super::env::EnvironmentOverrideFlags;
use super::requests::{WizardRequest, WizardResponse};
use super::step::WizardStep;
use super::steps::{
    AuthField, AuthForm, EditAction, PlexField, PlexForm, RotationField, RotationForm, TraktField,
    TraktForm,
};

static NEXT_MOUNT: AtomicU64 = AtomicU64::new(1);

/// Identifies one issued request: which wizard instance sent it and in what order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket {
    pub mount: u64,
    pub seq: u64,
}

/// A request the caller should run, tagged with the ticket to hand back to `apply`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    pub ticket: Ticket,
    pub request: WizardRequest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvironmentStatus {
    Loading,
    Loaded,
    /// Fetch failed; every field is treated as user-editable
    Unavailable(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionStatus {
    Idle,
    Submitting,
    Failed(String),
    /// Backend confirmed the save; carries its message
    Completed(String),
}

#[derive(Debug)]
pub struct WizardState {
    pub current_step: WizardStep,
    pub config: WizardConfiguration,
    pub env: EnvironmentOverrideFlags,
    pub env_status: EnvironmentStatus,
    pub auth: AuthForm,
    pub plex: PlexForm,
    pub trakt: TraktForm,
    pub rotation: RotationForm,
    pub submission: SubmissionStatus,
    mount: u64,
    next_seq: u64,
    env_in_flight: Option<u64>,
    submit_in_flight: Option<u64>,
    mounted: bool,
}

impl Default for WizardState {
    fn default() -> Self {
        Self::new()
    }
}

impl WizardState {
    pub fn new() -> Self {
        let config = WizardConfiguration::default();
        let mount = NEXT_MOUNT.fetch_add(1, Ordering::Relaxed);
        debug!("Mounting setup wizard instance {}", mount);

        Self {
            current_step: WizardStep::Welcome,
            auth: AuthForm::from_config(&config),
            plex: PlexForm::from_config(&config),
            trakt: TraktForm::from_config(&config),
            rotation: RotationForm::from_config(&config),
            config,
            env: EnvironmentOverrideFlags::default(),
            env_status: EnvironmentStatus::Loading,
            submission: SubmissionStatus::Idle,
            mount,
            next_seq: 1,
            env_in_flight: None,
            submit_in_flight: None,
            mounted: true,
        }
    }

    pub fn mount_id(&self) -> u64 {
        self.mount
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Stop accepting results; anything still in flight is dropped on arrival
    pub fn unmount(&mut self) {
        if self.mounted {
            debug!("Unmounting setup wizard instance {}", self.mount);
        }
        self.mounted = false;
    }

    fn issue(&mut self) -> Ticket {
        let seq = self.next_seq;
        self.next_seq += 1;
        Ticket {
            mount: self.mount,
            seq,
        }
    }

    fn dispatch(&mut self, build: impl FnOnce(&mut Self, u64) -> WizardRequest) -> Dispatch {
        let ticket = self.issue();
        let request = build(self, ticket.seq);
        debug!("Dispatching {} (seq {})", request.name(), ticket.seq);
        Dispatch { ticket, request }
    }

    /// Fetch the environment override flags. Issued once when the wizard opens.
    pub fn load_environment(&mut self) -> Option<Dispatch> {
        if !self.mounted || self.env_in_flight.is_some() {
            return None;
        }
        Some(self.dispatch(|state, seq| {
            state.env_in_flight = Some(seq);
            state.env_status = EnvironmentStatus::Loading;
            WizardRequest::LoadEnvironment
        }))
    }

    /// Gate for the Next control on the current step
    pub fn can_advance(&self) -> bool {
        match self.current_step {
            WizardStep::Welcome | WizardStep::Rotation => true,
            WizardStep::Auth => self.auth.can_advance(&self.env),
            WizardStep::Plex => self.plex.can_advance(&self.env),
            WizardStep::Trakt => self.trakt.can_advance(&self.env),
            WizardStep::Complete => false,
        }
    }

    pub fn can_go_back(&self) -> bool {
        self.current_step.previous().is_some() && !self.is_submitting()
    }

    pub fn can_skip(&self) -> bool {
        self.current_step == WizardStep::Trakt && self.trakt.can_skip()
    }

    /// Merge the current step's values into the configuration and move forward.
    ///
    /// Returns false (and changes nothing) when the gate is not satisfied.
    pub fn advance(&mut self) -> bool {
        if !self.can_advance() {
            return false;
        }
        let Some(next) = self.current_step.next() else {
            return false;
        };

        match self.current_step {
            WizardStep::Auth => self.auth.merge_into(&mut self.config, &self.env),
            WizardStep::Plex => self.plex.merge_into(&mut self.config, &self.env),
            WizardStep::Trakt => self.trakt.merge_into(&mut self.config, &self.env),
            WizardStep::Rotation => self.rotation.merge_into(&mut self.config),
            WizardStep::Welcome | WizardStep::Complete => {}
        }

        info!("Wizard step {} -> {}", self.current_step.title(), next.title());
        self.current_step = next;
        true
    }

    /// Move back one step. Values merged on earlier steps stay in place.
    pub fn go_back(&mut self) -> bool {
        if !self.can_go_back() {
            return false;
        }
        let Some(previous) = self.current_step.previous() else {
            return false;
        };
        info!("Wizard step {} <- {}", previous.title(), self.current_step.title());
        self.current_step = previous;
        true
    }

    /// Leave the Trakt step with the integration forced off
    pub fn skip_trakt(&mut self) -> bool {
        if !self.can_skip() {
            return false;
        }
        self.trakt.skip_into(&mut self.config);
        info!("Trakt integration skipped");
        self.current_step = WizardStep::Rotation;
        true
    }

    pub fn test_plex_connection(&mut self) -> Option<Dispatch> {
        if !self.mounted
            || self.current_step != WizardStep::Plex
            || !self.plex.can_test(&self.env)
        {
            return None;
        }
        Some(self.dispatch(|state, seq| {
            let probe = state.plex.begin_test(seq, &state.env);
            WizardRequest::TestPlex {
                url: probe.url,
                token: probe.token,
            }
        }))
    }

    pub fn test_trakt_connection(&mut self) -> Option<Dispatch> {
        if !self.mounted || self.current_step != WizardStep::Trakt || !self.trakt.can_test() {
            return None;
        }
        Some(self.dispatch(|state, seq| {
            state.trakt.begin_test(seq);
            WizardRequest::TestTrakt
        }))
    }

    pub fn is_submitting(&self) -> bool {
        self.submit_in_flight.is_some()
    }

    pub fn is_completed(&self) -> bool {
        matches!(self.submission, SubmissionStatus::Completed(_))
    }

    /// Send the accumulated configuration. Only valid on the final step.
    pub fn submit(&mut self) -> Option<Dispatch> {
        if !self.mounted
            || self.current_step != WizardStep::Complete
            || self.is_submitting()
            || self.is_completed()
        {
            return None;
        }
        Some(self.dispatch(|state, seq| {
            state.submit_in_flight = Some(seq);
            state.submission = SubmissionStatus::Submitting;
            WizardRequest::Submit(state.config.to_request())
        }))
    }

    /// Apply a backend result. Returns false if the result was discarded as stale.
    pub fn apply(&mut self, ticket: Ticket, response: WizardResponse) -> bool {
        if !self.mounted || ticket.mount != self.mount {
            debug!("Dropping result for unmounted wizard {}", ticket.mount);
            return false;
        }

        match response {
            WizardResponse::Environment(result) => {
                if self.env_in_flight != Some(ticket.seq) {
                    return false;
                }
                self.env_in_flight = None;
                match result {
                    Ok(flags) => {
                        info!("Environment overrides loaded (any set: {})", flags.any());
                        self.env = flags;
                        self.env_status = EnvironmentStatus::Loaded;
                    }
                    Err(e) => {
                        warn!("Could not load environment overrides: {}", e);
                        self.env = EnvironmentOverrideFlags::default();
                        self.env_status = EnvironmentStatus::Unavailable(e.user_message());
                    }
                }
                true
            }
            WizardResponse::PlexLibraries(result) => self.plex.finish_test(ticket.seq, result),
            WizardResponse::TraktHealth(result) => self.trakt.finish_test(ticket.seq, result),
            WizardResponse::Submitted(result) => {
                if self.submit_in_flight != Some(ticket.seq) {
                    return false;
                }
                self.submit_in_flight = None;
                self.submission = match result {
                    Ok(saved) if saved.ok => {
                        info!("Configuration saved to {}", saved.path);
                        SubmissionStatus::Completed(saved.message)
                    }
                    Ok(saved) => {
                        warn!("Backend refused configuration: {}", saved.message);
                        SubmissionStatus::Failed(saved.message)
                    }
                    Err(e) => {
                        warn!("Configuration submit failed: {}", e);
                        SubmissionStatus::Failed(e.user_message())
                    }
                };
                true
            }
        }
    }

    pub fn focus_next(&mut self) {
        match self.current_step {
            WizardStep::Auth => self.auth.focus_next(&self.env),
            WizardStep::Plex => self.plex.focus_next(&self.env),
            WizardStep::Trakt => self.trakt.focus_next(&self.env),
            WizardStep::Rotation => self.rotation.focus_next(),
            WizardStep::Welcome | WizardStep::Complete => {}
        }
    }

    pub fn focus_previous(&mut self) {
        match self.current_step {
            WizardStep::Auth => self.auth.focus_previous(&self.env),
            WizardStep::Plex => self.plex.focus_previous(&self.env),
            WizardStep::Trakt => self.trakt.focus_previous(&self.env),
            WizardStep::Rotation => self.rotation.focus_previous(),
            WizardStep::Welcome | WizardStep::Complete => {}
        }
    }

    /// Flip the focused switch or library. Returns false if the focus is not on one.
    pub fn toggle(&mut self) -> bool {
        match self.current_step {
            WizardStep::Auth if self.auth.focus == AuthField::Enabled => {
                self.auth.toggle_enabled();
                true
            }
            WizardStep::Plex if self.plex.focus == PlexField::Libraries => {
                self.plex.toggle_library_at_cursor();
                true
            }
            WizardStep::Trakt if self.trakt.focus == TraktField::Enabled => {
                self.trakt.toggle_enabled();
                true
            }
            WizardStep::Rotation
                if matches!(
                    self.rotation.focus,
                    RotationField::Enabled | RotationField::AllowRepeats
                ) =>
            {
                self.rotation.toggle();
                true
            }
            _ => false,
        }
    }

    /// Up arrow: previous library, or increment the focused number
    pub fn up(&mut self) {
        match self.current_step {
            WizardStep::Plex if self.plex.focus == PlexField::Libraries => {
                self.plex.library_cursor_up();
            }
            WizardStep::Rotation => self.rotation.adjust(1),
            _ => self.focus_previous(),
        }
    }

    /// Down arrow: next library, or decrement the focused number
    pub fn down(&mut self) {
        match self.current_step {
            WizardStep::Plex if self.plex.focus == PlexField::Libraries => {
                self.plex.library_cursor_down();
            }
            WizardStep::Rotation => self.rotation.adjust(-1),
            _ => self.focus_next(),
        }
    }

    /// Text editing on the focused input
    pub fn edit(&mut self, action: EditAction) {
        match self.current_step {
            WizardStep::Auth => self.auth.edit(action, &self.env),
            WizardStep::Plex => self.plex.edit(action, &self.env),
            WizardStep::Trakt => self.trakt.edit(action, &self.env),
            WizardStep::Rotation => match action {
                EditAction::Insert(c) => {
                    if let Some(digit) = c.to_digit(10) {
                        self.rotation.push_digit(digit);
                    }
                }
                EditAction::Backspace | EditAction::Delete => self.rotation.pop_digit(),
                _ => {}
            },
            WizardStep::Welcome | WizardStep::Complete => {}
        }
    }

    /// Error to show inline on the current step, if any
    pub fn step_error(&self) -> Option<&str> {
        match self.current_step {
            WizardStep::Plex => self.plex.probe.error(),
            WizardStep::Trakt => self.trakt.probe.error(),
            WizardStep::Complete => match &self.submission {
                SubmissionStatus::Failed(message) => Some(message),
                _ => None,
            },
            _ => None,
        }
    }
}
