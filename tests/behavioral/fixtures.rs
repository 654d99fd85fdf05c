// ABOUTME: Shared test fixtures for behavioral tests
//
// Provides:
// - FakeBackend: in-memory AdminApi + CollectionsApi that records every call
// - press(): feed one key through the event handler

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use hsh_admin::api::{
    ActiveCollection, AdminApi, ApiError, CollectionDetail, CollectionItemRequest,
    CollectionSummary, CollectionUpdateRequest, CollectionsApi, ConfigExistsResponse,
    ConfigSaveResponse, HealthComponent, Library, MediaItem, PosterSource, QuickStartRequest,
};
use hsh_admin::app::{AppState, EventHandler};
use hsh_admin::wizard::EnvironmentOverrideFlags;

/// Backend double. Failures are stored as (status, body) since ApiError is not Clone.
#[derive(Default)]
pub struct FakeBackend {
    pub env: EnvironmentOverrideFlags,
    pub env_failure: Option<(u16, String)>,
    pub libraries: Vec<Library>,
    pub trakt: Option<HealthComponent>,
    /// Results handed out by quick_start in order; once empty every call succeeds
    pub quick_start_results: Mutex<VecDeque<Result<ConfigSaveResponse, (u16, String)>>>,
    pub quick_starts: Mutex<Vec<QuickStartRequest>>,
    pub library_calls: Mutex<usize>,
    pub searches: Mutex<Vec<(String, String)>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_libraries(mut self, titles: &[(&str, &str)]) -> Self {
        self.libraries = titles
            .iter()
            .map(|(title, kind)| Library {
                title: (*title).to_string(),
                kind: (*kind).to_string(),
            })
            .collect();
        self
    }

    pub fn with_env(mut self, env: EnvironmentOverrideFlags) -> Self {
        self.env = env;
        self
    }

    pub fn fail_next_quick_start(&self, status: u16, body: &str) {
        self.quick_start_results
            .lock()
            .unwrap()
            .push_back(Err((status, body.to_string())));
    }

    pub fn quick_starts(&self) -> Vec<QuickStartRequest> {
        self.quick_starts.lock().unwrap().clone()
    }

    pub fn search_queries(&self) -> Vec<String> {
        self.searches
            .lock()
            .unwrap()
            .iter()
            .map(|(_, query)| query.clone())
            .collect()
    }
}

pub fn saved(message: &str) -> ConfigSaveResponse {
    ConfigSaveResponse {
        ok: true,
        path: "/config/config.yaml".to_string(),
        message: message.to_string(),
        env_override: false,
    }
}

#[async_trait]
impl AdminApi for FakeBackend {
    async fn env_vars(&self) -> Result<EnvironmentOverrideFlags, ApiError> {
        match &self.env_failure {
            Some((status, body)) => Err(ApiError::status(*status, body.clone())),
            None => Ok(self.env),
        }
    }

    async fn quick_start(&self, request: &QuickStartRequest) -> Result<ConfigSaveResponse, ApiError> {
        self.quick_starts.lock().unwrap().push(request.clone());
        match self.quick_start_results.lock().unwrap().pop_front() {
            Some(Err((status, body))) => Err(ApiError::status(status, body)),
            Some(Ok(response)) => Ok(response),
            None => Ok(saved("Configuration saved")),
        }
    }

    async fn libraries(&self) -> Result<Vec<Library>, ApiError> {
        *self.library_calls.lock().unwrap() += 1;
        Ok(self.libraries.clone())
    }

    async fn trakt_health(&self) -> Result<HealthComponent, ApiError> {
        Ok(self.trakt.clone().unwrap_or(HealthComponent {
            ok: true,
            error: None,
            details: None,
        }))
    }

    async fn config_exists(&self) -> Result<ConfigExistsResponse, ApiError> {
        Ok(ConfigExistsResponse {
            exists: !self.quick_starts.lock().unwrap().is_empty(),
            is_configured: false,
            path: "/config/config.yaml".to_string(),
        })
    }
}

#[async_trait]
impl CollectionsApi for FakeBackend {
    async fn all_collections(&self) -> Result<Vec<CollectionSummary>, ApiError> {
        Ok(Vec::new())
    }

    async fn active_collections(&self) -> Result<Vec<ActiveCollection>, ApiError> {
        Ok(Vec::new())
    }

    async fn collection_detail(
        &self,
        library: &str,
        title: &str,
    ) -> Result<CollectionDetail, ApiError> {
        Ok(CollectionDetail {
            title: title.to_string(),
            library: library.to_string(),
            summary: None,
            poster_url: None,
            items: Vec::new(),
        })
    }

    async fn search(&self, library: &str, query: &str) -> Result<Vec<MediaItem>, ApiError> {
        self.searches
            .lock()
            .unwrap()
            .push((library.to_string(), query.to_string()));
        Ok(vec![MediaItem {
            rating_key: format!("{}", query.len()),
            title: query.to_string(),
            year: None,
            thumb_url: None,
        }])
    }

    async fn add_item(&self, _request: &CollectionItemRequest) -> Result<(), ApiError> {
        Ok(())
    }

    async fn remove_item(&self, _request: &CollectionItemRequest) -> Result<(), ApiError> {
        Ok(())
    }

    async fn update_collection(&self, _request: &CollectionUpdateRequest) -> Result<(), ApiError> {
        Ok(())
    }

    async fn upload_poster(
        &self,
        _library: &str,
        _collection: &str,
        _poster: PosterSource,
    ) -> Result<(), ApiError> {
        Ok(())
    }
}

/// Send one key press through the same path the TUI uses
pub fn press(state: &mut AppState, code: KeyCode) {
    press_with(state, code, KeyModifiers::NONE);
}

pub fn press_with(state: &mut AppState, code: KeyCode, modifiers: KeyModifiers) {
    if let Some(event) = EventHandler::handle_key_event(KeyEvent::new(code, modifiers), state) {
        EventHandler::process_event(event, state);
    }
}

pub fn type_text(state: &mut AppState, text: &str) {
    for c in text.chars() {
        press(state, KeyCode::Char(c));
    }
}
