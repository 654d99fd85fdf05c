// ABOUTME: Environment override flags reported by the backend
// One capability lookup decides, per field, whether the user types it or the deployment supplies it

use serde::{Deserialize, Serialize};

/// Which configuration values the deployment environment already provides.
///
/// Fetched once when the wizard starts and never changed afterwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentOverrideFlags {
    #[serde(default)]
    pub plex_token_from_env: bool,
    #[serde(default)]
    pub plex_url_from_env: bool,
    #[serde(default)]
    pub auth_password_from_env: bool,
    #[serde(default)]
    pub auth_secret_from_env: bool,
    #[serde(default)]
    pub trakt_client_id_from_env: bool,
}

/// Fields that can be supplied by the environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnvField {
    PlexToken,
    PlexUrl,
    AuthPassword,
    AuthSecret,
    TraktClientId,
}

impl EnvField {
    /// Backend environment variable that supplies this field
    pub fn variable(&self) -> &'static str {
        match self {
            Self::PlexToken => "HSH_PLEX_TOKEN",
            Self::PlexUrl => "HSH_PLEX_URL",
            Self::AuthPassword => "HSH_AUTH_PASSWORD",
            Self::AuthSecret => "HSH_AUTH_SECRET_KEY",
            Self::TraktClientId => "HSH_TRAKT_CLIENT_ID",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::PlexToken => "Plex token",
            Self::PlexUrl => "Plex URL",
            Self::AuthPassword => "Password",
            Self::AuthSecret => "Auth secret key",
            Self::TraktClientId => "Trakt client ID",
        }
    }
}

/// How a step should treat one field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldCapability {
    /// Render an editable input
    pub user_editable: bool,
    /// The value exists server-side; the field is satisfied without input
    pub present_from_environment: bool,
}

impl FieldCapability {
    /// Whether the field passes a validation gate given what the user typed
    pub fn satisfied_by(&self, typed: &str) -> bool {
        self.present_from_environment || !typed.trim().is_empty()
    }

    /// Read-only notice shown in place of the input, if any
    pub fn notice(&self, field: EnvField) -> Option<String> {
        self.present_from_environment
            .then(|| format!("{} is set by {}", field.label(), field.variable()))
    }
}

impl EnvironmentOverrideFlags {
    pub fn capability(&self, field: EnvField) -> FieldCapability {
        let from_env = match field {
            EnvField::PlexToken => self.plex_token_from_env,
            EnvField::PlexUrl => self.plex_url_from_env,
            EnvField::AuthPassword => self.auth_password_from_env,
            EnvField::AuthSecret => self.auth_secret_from_env,
            EnvField::TraktClientId => self.trakt_client_id_from_env,
        };

        FieldCapability {
            user_editable: !from_env,
            present_from_environment: from_env,
        }
    }

    pub fn any(&self) -> bool {
        self.plex_token_from_env
            || self.plex_url_from_env
            || self.auth_password_from_env
            || self.auth_secret_from_env
            || self.trakt_client_id_from_env
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_from_env_is_read_only() {
        let flags = EnvironmentOverrideFlags {
            plex_token_from_env: true,
            ..Default::default()
        };

        let token = flags.capability(EnvField::PlexToken);
        assert!(!token.user_editable);
        assert!(token.satisfied_by(""));
        assert_eq!(
            token.notice(EnvField::PlexToken).as_deref(),
            Some("Plex token is set by HSH_PLEX_TOKEN")
        );

        let url = flags.capability(EnvField::PlexUrl);
        assert!(url.user_editable);
        assert!(!url.satisfied_by("   "));
        assert!(url.satisfied_by("http://plex:32400"));
        assert!(url.notice(EnvField::PlexUrl).is_none());
    }

    #[test]
    fn test_parses_backend_payload() {
        let json = r#"{
            "plex_token_from_env": false,
            "plex_url_from_env": true,
            "auth_password_from_env": false,
            "auth_secret_from_env": true,
            "trakt_client_id_from_env": false
        }"#;
        let flags: EnvironmentOverrideFlags = serde_json::from_str(json).unwrap();
        assert!(flags.plex_url_from_env);
        assert!(flags.auth_secret_from_env);
        assert!(!flags.plex_token_from_env);
        assert!(flags.any());
    }

    #[test]
    fn test_default_has_no_overrides() {
        assert!(!EnvironmentOverrideFlags::default().any());
    }
}
