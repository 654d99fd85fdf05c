// ABOUTME: Backend calls issued by the setup wizard and their results
// The wizard state decides what to send; the app runs execute() on a task and feeds the response back

use tracing::debug;

use super::config::WizardConfiguration;
use super::env::EnvironmentOverrideFlags;
use crate::api::{AdminApi, ApiError, ConfigSaveResponse, HealthComponent, Library, QuickStartRequest};

/// Library title sent with a Plex connectivity test.
///
/// The quick-start endpoint refuses an empty library list, and the real
/// selection is only known after the test succeeds.
pub const PROBE_PLACEHOLDER_LIBRARY: &str = "Movies";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardRequest {
    LoadEnvironment,
    TestPlex { url: String, token: String },
    TestTrakt,
    Submit(QuickStartRequest),
}

impl WizardRequest {
    pub fn name(&self) -> &'static str {
        match self {
            Self::LoadEnvironment => "load_environment",
            Self::TestPlex { .. } => "test_plex",
            Self::TestTrakt => "test_trakt",
            Self::Submit(_) => "submit",
        }
    }
}

#[derive(Debug)]
pub enum WizardResponse {
    Environment(Result<EnvironmentOverrideFlags, ApiError>),
    PlexLibraries(Result<Vec<Library>, ApiError>),
    TraktHealth(Result<HealthComponent, ApiError>),
    Submitted(Result<ConfigSaveResponse, ApiError>),
}

/// Quick-start body used to probe Plex credentials before libraries are chosen
pub fn plex_probe_request(url: &str, token: &str) -> QuickStartRequest {
    WizardConfiguration {
        plex_url: url.to_string(),
        plex_token: token.to_string(),
        selected_libraries: vec![PROBE_PLACEHOLDER_LIBRARY.to_string()],
        ..Default::default()
    }
    .to_request()
}

/// Run one wizard request against the backend
pub async fn execute(api: &dyn AdminApi, request: WizardRequest) -> WizardResponse {
    debug!("Executing wizard request {}", request.name());

    match request {
        WizardRequest::LoadEnvironment => WizardResponse::Environment(api.env_vars().await),
        WizardRequest::TestPlex { url, token } => {
            let probe = plex_probe_request(&url, &token);
            let result = match api.quick_start(&probe).await {
                Ok(_) => api.libraries().await,
                Err(e) => Err(e),
            };
            WizardResponse::PlexLibraries(result)
        }
        WizardRequest::TestTrakt => WizardResponse::TraktHealth(api.trakt_health().await),
        WizardRequest::Submit(body) => WizardResponse::Submitted(api.quick_start(&body).await),
    }
}
