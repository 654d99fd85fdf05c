// ABOUTME: Debounced library search for the collection screens
// Each keystroke restarts the quiet period; only the newest dispatched request may update the results

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::api::{ApiError, CollectionsApi, MediaItem};

/// Quiet period after the last keystroke before a search is sent
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Result of one dispatched search, tagged with its sequence number
#[derive(Debug)]
pub struct SearchOutcome {
    pub seq: u64,
    pub query: String,
    pub result: Result<Vec<MediaItem>, ApiError>,
}

/// Schedules searches on the tokio runtime.
///
/// `schedule` aborts any timer still waiting. A request that was already
/// sent runs to completion, but its outcome is flagged stale by
/// [`SearchDebouncer::is_current`] once a newer request goes out.
pub struct SearchDebouncer {
    api: Arc<dyn CollectionsApi>,
    library: String,
    delay: Duration,
    scheduled: Arc<AtomicU64>,
    dispatched: Arc<AtomicU64>,
    /// Newest scheduled task and its sequence
    pending: Option<(u64, JoinHandle<()>)>,
    tx: mpsc::UnboundedSender<SearchOutcome>,
}

impl SearchDebouncer {
    pub fn new(
        api: Arc<dyn CollectionsApi>,
        library: impl Into<String>,
        delay: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<SearchOutcome>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let debouncer = Self {
            api,
            library: library.into(),
            delay,
            scheduled: Arc::new(AtomicU64::new(0)),
            dispatched: Arc::new(AtomicU64::new(0)),
            pending: None,
            tx,
        };
        (debouncer, rx)
    }

    pub fn library(&self) -> &str {
        &self.library
    }

    /// Start the quiet period for `query`, replacing any pending one. Returns its sequence.
    pub fn schedule(&mut self, query: impl Into<String>) -> u64 {
        let query = query.into();
        self.abort_waiting();
        let seq = self.scheduled.fetch_add(1, Ordering::SeqCst) + 1;

        let api = Arc::clone(&self.api);
        let library = self.library.clone();
        let scheduled = Arc::clone(&self.scheduled);
        let dispatched = Arc::clone(&self.dispatched);
        let tx = self.tx.clone();
        let delay = self.delay;

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if scheduled.load(Ordering::SeqCst) != seq {
                return;
            }

            dispatched.store(seq, Ordering::SeqCst);
            debug!("Searching {} (seq {})", library, seq);
            let result = api.search(&library, &query).await;
            // Receiver gone means the screen closed
            let _ = tx.send(SearchOutcome { seq, query, result });
        });
        self.pending = Some((seq, handle));

        seq
    }

    /// Drop the pending timer and mark every earlier request stale
    pub fn cancel(&mut self) {
        self.abort_waiting();
        let seq = self.scheduled.fetch_add(1, Ordering::SeqCst) + 1;
        self.dispatched.store(seq, Ordering::SeqCst);
    }

    /// Whether a timer is still counting down to a request
    pub fn has_waiting_timer(&self) -> bool {
        self.pending.as_ref().is_some_and(|(seq, handle)| {
            !handle.is_finished() && self.dispatched.load(Ordering::SeqCst) < *seq
        })
    }

    /// Abort the newest task if its timer has not fired. Sent requests run to completion.
    fn abort_waiting(&mut self) {
        if !self.has_waiting_timer() {
            return;
        }
        if let Some((seq, handle)) = self.pending.take() {
            debug!("Superseding search timer (seq {})", seq);
            handle.abort();
        }
    }

    /// Whether an outcome belongs to the newest dispatched request
    pub fn is_current(&self, outcome: &SearchOutcome) -> bool {
        outcome.seq == self.dispatched.load(Ordering::SeqCst)
    }
}

/// Search box state: the typed query and the results currently shown
pub struct SearchView {
    debouncer: SearchDebouncer,
    outcomes: mpsc::UnboundedReceiver<SearchOutcome>,
    pub query: String,
    pub results: Vec<MediaItem>,
    pub error: Option<String>,
    pub searching: bool,
}

impl SearchView {
    pub fn new(api: Arc<dyn CollectionsApi>, library: impl Into<String>, delay: Duration) -> Self {
        let (debouncer, outcomes) = SearchDebouncer::new(api, library, delay);
        Self {
            debouncer,
            outcomes,
            query: String::new(),
            results: Vec::new(),
            error: None,
            searching: false,
        }
    }

    pub fn library(&self) -> &str {
        self.debouncer.library()
    }

    /// Replace the query. A blank query clears the results without a request.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        if self.query.trim().is_empty() {
            self.debouncer.cancel();
            self.results.clear();
            self.error = None;
            self.searching = false;
            return;
        }
        self.searching = true;
        self.debouncer.schedule(self.query.trim());
    }

    pub fn push_char(&mut self, c: char) {
        let mut query = std::mem::take(&mut self.query);
        query.push(c);
        self.set_query(query);
    }

    pub fn pop_char(&mut self) {
        let mut query = std::mem::take(&mut self.query);
        query.pop();
        self.set_query(query);
    }

    /// Apply an outcome; stale ones are dropped. Returns true if the view changed.
    pub fn apply(&mut self, outcome: SearchOutcome) -> bool {
        if !self.debouncer.is_current(&outcome) {
            debug!("Discarding stale search results for seq {}", outcome.seq);
            return false;
        }

        self.searching = false;
        match outcome.result {
            Ok(results) => {
                self.results = results;
                self.error = None;
            }
            Err(e) => {
                self.results.clear();
                self.error = Some(e.user_message());
            }
        }
        true
    }

    /// Apply everything that already arrived without waiting
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Ok(outcome) = self.outcomes.try_recv() {
            changed |= self.apply(outcome);
        }
        changed
    }

    /// Wait for the next outcome and apply it. Returns None if no search can still arrive.
    pub async fn next_outcome(&mut self) -> Option<bool> {
        let outcome = self.outcomes.recv().await?;
        Some(self.apply(outcome))
    }
}
