// ABOUTME: Wire types exchanged with the Homescreen Hero backend
// Field names match the backend's JSON exactly; Rust names only differ where a keyword is in the way

use serde::{Deserialize, Serialize};

/// Library entry from `GET /api/collections/libraries`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Library {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LibrariesResponse {
    pub libraries: Vec<Library>,
}

/// Body of `POST /api/admin/config/quick-start`.
///
/// Values supplied by the deployment environment are sent empty; the backend
/// substitutes its own value for those.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickStartRequest {
    pub plex_url: String,
    pub plex_token: String,
    pub trakt_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trakt_client_id: Option<String>,
    pub trakt_base_url: String,
    pub libraries: Vec<String>,
    pub auth_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_password: Option<String>,
    pub rotation_enabled: bool,
    pub rotation_interval_hours: u32,
    pub rotation_max_collections: u32,
    pub rotation_strategy: String,
    pub rotation_allow_repeats: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigSaveResponse {
    pub ok: bool,
    pub path: String,
    pub message: String,
    #[serde(default)]
    pub env_override: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigExistsResponse {
    pub exists: bool,
    pub is_configured: bool,
    pub path: String,
}

/// Health probe result (`GET /api/health/trakt`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthComponent {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub details: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    pub username: String,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

// Collection management types

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionSummary {
    pub title: String,
    pub library: String,
    #[serde(default)]
    pub poster_url: Option<String>,
    #[serde(default)]
    pub item_count: u32,
    #[serde(default)]
    pub is_active: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AllCollectionsResponse {
    pub collections: Vec<CollectionSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveCollection {
    pub title: String,
    #[serde(default)]
    pub library: Option<String>,
    #[serde(default)]
    pub poster_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActiveCollectionsResponse {
    pub collections: Vec<ActiveCollection>,
}

/// A movie or show that can be a member of a collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaItem {
    pub rating_key: String,
    pub title: String,
    #[serde(default)]
    pub year: Option<u32>,
    #[serde(default)]
    pub thumb_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionDetail {
    pub title: String,
    pub library: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub poster_url: Option<String>,
    #[serde(default)]
    pub items: Vec<MediaItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<MediaItem>,
}

/// Body for both `add-item` and `remove-item`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionItemRequest {
    pub library: String,
    pub collection: String,
    pub rating_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionUpdateRequest {
    pub library: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

/// Where a new poster comes from: an uploaded file or a remote URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PosterSource {
    File { file_name: String, bytes: Vec<u8> },
    Url(String),
}

impl PosterSource {
    /// MIME type guessed from the file extension
    pub fn mime_type(&self) -> Option<&'static str> {
        let Self::File { file_name, .. } = self else {
            return None;
        };
        let ext = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase());
        Some(match ext.as_deref() {
            Some("png") => "image/png",
            Some("jpg" | "jpeg") => "image/jpeg",
            Some("gif") => "image/gif",
            Some("webp") => "image/webp",
            _ => "application/octet-stream",
        })
    }
}
