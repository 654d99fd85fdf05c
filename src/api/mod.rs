// ABOUTME: Backend API integration for the setup wizard and collection screens
// The traits are the seam the wizard and collection view-models depend on; AdminClient is the HTTP implementation

pub mod client;
pub mod error;
pub mod types;

use async_trait::async_trait;

use crate::wizard::env::EnvironmentOverrideFlags;

pub use client::AdminClient;
pub use error::ApiError;
pub use types::{
    ActiveCollection, CollectionDetail, CollectionItemRequest, CollectionSummary,
    CollectionUpdateRequest, ConfigExistsResponse, ConfigSaveResponse, HealthComponent, Library,
    MediaItem, PosterSource, QuickStartRequest,
};

/// Endpoints the setup wizard talks to
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdminApi: Send + Sync {
    /// `GET /api/admin/config/env-vars`
    async fn env_vars(&self) -> Result<EnvironmentOverrideFlags, ApiError>;

    /// `POST /api/admin/config/quick-start`
    async fn quick_start(&self, request: &QuickStartRequest) -> Result<ConfigSaveResponse, ApiError>;

    /// `GET /api/collections/libraries`
    async fn libraries(&self) -> Result<Vec<Library>, ApiError>;

    /// `GET /api/health/trakt`
    async fn trakt_health(&self) -> Result<HealthComponent, ApiError>;

    /// `GET /api/admin/config/exists`
    async fn config_exists(&self) -> Result<ConfigExistsResponse, ApiError>;
}

/// Endpoints behind the collection management screens
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CollectionsApi: Send + Sync {
    async fn all_collections(&self) -> Result<Vec<CollectionSummary>, ApiError>;

    async fn active_collections(&self) -> Result<Vec<ActiveCollection>, ApiError>;

    async fn collection_detail(&self, library: &str, title: &str)
        -> Result<CollectionDetail, ApiError>;

    async fn search(&self, library: &str, query: &str) -> Result<Vec<MediaItem>, ApiError>;

    async fn add_item(&self, request: &CollectionItemRequest) -> Result<(), ApiError>;

    async fn remove_item(&self, request: &CollectionItemRequest) -> Result<(), ApiError>;

    async fn update_collection(&self, request: &CollectionUpdateRequest) -> Result<(), ApiError>;

    async fn upload_poster(
        &self,
        library: &str,
        collection: &str,
        poster: PosterSource,
    ) -> Result<(), ApiError>;
}
