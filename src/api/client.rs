// ABOUTME: reqwest implementation of the backend API traits
// One shared HTTP client; every endpoint is resolved against the configured server URL

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};
use url::Url;

use super::error::ApiError;
use super::types::{
    ActiveCollection, ActiveCollectionsResponse, AllCollectionsResponse, CollectionDetail,
    CollectionItemRequest, CollectionSummary, CollectionUpdateRequest, ConfigExistsResponse,
    ConfigSaveResponse, HealthComponent, LibrariesResponse, Library, LoginRequest, LoginResponse,
    MediaItem, PosterSource, QuickStartRequest, SearchResponse,
};
use super::{AdminApi, CollectionsApi};
use crate::config::AppConfig;
use crate::wizard::env::EnvironmentOverrideFlags;

#[derive(Debug, Clone)]
pub struct AdminClient {
    client: Client,
    base_url: Url,
    access_token: Option<String>,
}

impl AdminClient {
    /// Create a client for the backend at `base_url`
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let mut base_url =
            Url::parse(base_url).with_context(|| format!("Invalid server URL: {base_url}"))?;

        // Url::join replaces the last segment unless the base path ends with '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder()
            .user_agent(concat!("hsh-admin/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url,
            access_token: None,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::new(
            &config.server_url,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    /// Exchange credentials for a bearer token used on every later call
    pub async fn login(&mut self, username: &str, password: &str) -> Result<(), ApiError> {
        info!("Logging in to backend as {}", username);

        let body = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let response: LoginResponse = self
            .send_json(self.request(Method::POST, "api/auth/login")?.json(&body))
            .await?;

        debug!("Received {} token for {}", response.token_type, response.username);
        self.access_token = Some(response.access_token);
        Ok(())
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let url = self.endpoint(path)?;
        debug!("{} {}", method, url);

        let builder = self.client.request(method, url);
        Ok(match &self.access_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    async fn checked(builder: RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let response = builder.send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            warn!("Backend returned HTTP {}", status);
            return Err(ApiError::status(status, body));
        }

        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let response = Self::checked(builder).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn send_empty(&self, builder: RequestBuilder) -> Result<(), ApiError> {
        Self::checked(builder).await.map(|_| ())
    }
}

#[async_trait]
impl AdminApi for AdminClient {
    async fn env_vars(&self) -> Result<EnvironmentOverrideFlags, ApiError> {
        self.send_json(self.request(Method::GET, "api/admin/config/env-vars")?)
            .await
    }

    async fn quick_start(&self, request: &QuickStartRequest) -> Result<ConfigSaveResponse, ApiError> {
        self.send_json(
            self.request(Method::POST, "api/admin/config/quick-start")?
                .json(request),
        )
        .await
    }

    async fn libraries(&self) -> Result<Vec<Library>, ApiError> {
        let response: LibrariesResponse = self
            .send_json(self.request(Method::GET, "api/collections/libraries")?)
            .await?;
        Ok(response.libraries)
    }

    async fn trakt_health(&self) -> Result<HealthComponent, ApiError> {
        self.send_json(self.request(Method::GET, "api/health/trakt")?)
            .await
    }

    async fn config_exists(&self) -> Result<ConfigExistsResponse, ApiError> {
        self.send_json(self.request(Method::GET, "api/admin/config/exists")?)
            .await
    }
}

#[async_trait]
impl CollectionsApi for AdminClient {
    async fn all_collections(&self) -> Result<Vec<CollectionSummary>, ApiError> {
        let response: AllCollectionsResponse = self
            .send_json(self.request(Method::GET, "api/collections/all")?)
            .await?;
        Ok(response.collections)
    }

    async fn active_collections(&self) -> Result<Vec<ActiveCollection>, ApiError> {
        let response: ActiveCollectionsResponse = self
            .send_json(self.request(Method::GET, "api/collections/active")?)
            .await?;
        Ok(response.collections)
    }

    async fn collection_detail(
        &self,
        library: &str,
        title: &str,
    ) -> Result<CollectionDetail, ApiError> {
        self.send_json(
            self.request(Method::GET, "api/collections/detail")?
                .query(&[("library", library), ("title", title)]),
        )
        .await
    }

    async fn search(&self, library: &str, query: &str) -> Result<Vec<MediaItem>, ApiError> {
        let response: SearchResponse = self
            .send_json(
                self.request(Method::GET, "api/collections/search")?
                    .query(&[("library", library), ("query", query)]),
            )
            .await?;
        Ok(response.results)
    }

    async fn add_item(&self, request: &CollectionItemRequest) -> Result<(), ApiError> {
        self.send_empty(self.request(Method::POST, "api/collections/add-item")?.json(request))
            .await
    }

    async fn remove_item(&self, request: &CollectionItemRequest) -> Result<(), ApiError> {
        self.send_empty(
            self.request(Method::POST, "api/collections/remove-item")?
                .json(request),
        )
        .await
    }

    async fn update_collection(&self, request: &CollectionUpdateRequest) -> Result<(), ApiError> {
        self.send_empty(self.request(Method::PUT, "api/collections/update")?.json(request))
            .await
    }

    async fn upload_poster(
        &self,
        library: &str,
        collection: &str,
        poster: PosterSource,
    ) -> Result<(), ApiError> {
        let mime_type = poster.mime_type();
        let form = Form::new()
            .text("library", library.to_string())
            .text("collection", collection.to_string());

        let form = match poster {
            PosterSource::File { file_name, bytes } => {
                let part = Part::bytes(bytes)
                    .file_name(file_name)
                    .mime_str(mime_type.unwrap_or("application/octet-stream"))?;
                form.part("file", part)
            }
            PosterSource::Url(url) => form.text("url", url),
        };

        info!("Uploading poster for '{}' in {}", collection, library);
        self.send_empty(
            self.request(Method::POST, "api/collections/upload-poster")?
                .multipart(form),
        )
        .await
    }
}
