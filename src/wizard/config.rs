// ABOUTME: Configuration accumulated across wizard steps
// Each field is written by exactly one step and consumed once by the final submission

use crate::api::QuickStartRequest;

pub const DEFAULT_TRAKT_BASE_URL: &str = "https://api.trakt.tv";
pub const DEFAULT_ROTATION_INTERVAL_HOURS: u32 = 12;
pub const DEFAULT_ROTATION_MAX_COLLECTIONS: u32 = 5;
/// The only rotation strategy the backend supports
pub const ROTATION_STRATEGY: &str = "random";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardConfiguration {
    pub auth_enabled: bool,
    pub auth_username: String,
    pub auth_password: String,

    pub plex_url: String,
    pub plex_token: String,
    /// Insertion-ordered, never contains duplicates
    pub selected_libraries: Vec<String>,

    pub trakt_enabled: bool,
    pub trakt_client_id: String,
    pub trakt_base_url: String,

    pub rotation_enabled: bool,
    pub rotation_interval_hours: u32,
    pub rotation_max_collections: u32,
    pub rotation_strategy: String,
    pub rotation_allow_repeats: bool,
}

impl Default for WizardConfiguration {
    fn default() -> Self {
        Self {
            auth_enabled: false,
            auth_username: String::new(),
            auth_password: String::new(),
            plex_url: String::new(),
            plex_token: String::new(),
            selected_libraries: Vec::new(),
            trakt_enabled: false,
            trakt_client_id: String::new(),
            trakt_base_url: DEFAULT_TRAKT_BASE_URL.to_string(),
            rotation_enabled: false,
            rotation_interval_hours: DEFAULT_ROTATION_INTERVAL_HOURS,
            rotation_max_collections: DEFAULT_ROTATION_MAX_COLLECTIONS,
            rotation_strategy: ROTATION_STRATEGY.to_string(),
            rotation_allow_repeats: false,
        }
    }
}

impl WizardConfiguration {
    /// Build the final quick-start payload
    pub fn to_request(&self) -> QuickStartRequest {
        let (auth_username, auth_password) = if self.auth_enabled {
            (
                Some(self.auth_username.clone()),
                (!self.auth_password.is_empty()).then(|| self.auth_password.clone()),
            )
        } else {
            (None, None)
        };

        QuickStartRequest {
            plex_url: self.plex_url.clone(),
            plex_token: self.plex_token.clone(),
            trakt_enabled: self.trakt_enabled,
            trakt_client_id: Some(self.trakt_client_id.clone()),
            trakt_base_url: self.trakt_base_url.clone(),
            libraries: self.selected_libraries.clone(),
            auth_enabled: self.auth_enabled,
            auth_username,
            auth_password,
            rotation_enabled: self.rotation_enabled,
            rotation_interval_hours: self.rotation_interval_hours,
            rotation_max_collections: self.rotation_max_collections,
            rotation_strategy: self.rotation_strategy.clone(),
            rotation_allow_repeats: self.rotation_allow_repeats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = WizardConfiguration::default();
        assert_eq!(config.trakt_base_url, "https://api.trakt.tv");
        assert_eq!(config.rotation_interval_hours, 12);
        assert_eq!(config.rotation_max_collections, 5);
        assert_eq!(config.rotation_strategy, "random");
        assert!(!config.rotation_allow_repeats);
        assert!(config.selected_libraries.is_empty());
    }

    #[test]
    fn test_request_omits_auth_when_disabled() {
        let config = WizardConfiguration {
            auth_username: "stale".to_string(),
            auth_password: "stale".to_string(),
            ..Default::default()
        };

        let request = config.to_request();
        assert!(!request.auth_enabled);
        assert!(request.auth_username.is_none());
        assert!(request.auth_password.is_none());
    }

    #[test]
    fn test_request_leaves_env_password_to_backend() {
        let config = WizardConfiguration {
            auth_enabled: true,
            auth_username: "admin".to_string(),
            ..Default::default()
        };

        let request = config.to_request();
        assert_eq!(request.auth_username.as_deref(), Some("admin"));
        assert!(request.auth_password.is_none());
    }

    #[test]
    fn test_request_sends_empty_client_id_for_env_fallback() {
        let config = WizardConfiguration {
            trakt_enabled: true,
            ..Default::default()
        };
        let request = config.to_request();
        assert!(request.trakt_enabled);
        assert_eq!(request.trakt_client_id.as_deref(), Some(""));
    }
}
