// ABOUTME: Collection detail view-model
// Loads one collection and applies item, metadata, and poster changes through the collections API

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::api::{
    ApiError, CollectionDetail, CollectionItemRequest, CollectionUpdateRequest, CollectionsApi,
    PosterSource,
};

/// Outcome of adding several items one request at a time.
///
/// Items already added stay added when a later one fails.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub added: Vec<String>,
    /// `(rating_key, message)` for each item the backend refused
    pub failed: Vec<(String, String)>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn summary(&self) -> String {
        if self.failed.is_empty() {
            return format!("Added {} item(s)", self.added.len());
        }
        let keys: Vec<&str> = self.failed.iter().map(|(key, _)| key.as_str()).collect();
        format!(
            "Added {} item(s), {} failed: {}",
            self.added.len(),
            self.failed.len(),
            keys.join(", ")
        )
    }
}

pub struct CollectionDetailView {
    api: Arc<dyn CollectionsApi>,
    pub library: String,
    pub title: String,
    pub detail: Option<CollectionDetail>,
    pub error: Option<String>,
    /// Rating keys picked from search results, in pick order
    pub selected: Vec<String>,
    pub busy: bool,
}

impl CollectionDetailView {
    pub fn new(
        api: Arc<dyn CollectionsApi>,
        library: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            api,
            library: library.into(),
            title: title.into(),
            detail: None,
            error: None,
            selected: Vec::new(),
            busy: false,
        }
    }

    fn record<T>(&mut self, result: Result<T, ApiError>) -> Result<T, ApiError> {
        match &result {
            Ok(_) => self.error = None,
            Err(e) => self.error = Some(e.user_message()),
        }
        result
    }

    pub async fn load(&mut self) -> Result<&CollectionDetail, ApiError> {
        let result = self.api.collection_detail(&self.library, &self.title).await;
        let detail = self.record(result)?;
        Ok(self.detail.insert(detail))
    }

    pub fn contains(&self, rating_key: &str) -> bool {
        self.detail
            .as_ref()
            .is_some_and(|d| d.items.iter().any(|i| i.rating_key == rating_key))
    }

    pub fn toggle_selection(&mut self, rating_key: &str) {
        if let Some(pos) = self.selected.iter().position(|k| k == rating_key) {
            self.selected.remove(pos);
        } else {
            self.selected.push(rating_key.to_string());
        }
    }

    fn item_request(&self, rating_key: &str) -> CollectionItemRequest {
        CollectionItemRequest {
            library: self.library.clone(),
            collection: self.title.clone(),
            rating_key: rating_key.to_string(),
        }
    }

    /// Add every selected item, one request each, then reload.
    ///
    /// Failed items stay selected so the user can retry just those.
    pub async fn add_selected(&mut self) -> BatchReport {
        if self.busy {
            return BatchReport::default();
        }
        self.busy = true;

        let mut report = BatchReport::default();
        for key in std::mem::take(&mut self.selected) {
            match self.api.add_item(&self.item_request(&key)).await {
                Ok(()) => report.added.push(key),
                Err(e) => {
                    warn!("Adding {} to '{}' failed: {}", key, self.title, e);
                    report.failed.push((key, e.user_message()));
                }
            }
        }
        self.selected = report.failed.iter().map(|(key, _)| key.clone()).collect();
        info!("{} for '{}'", report.summary(), self.title);

        self.error = (!report.is_success()).then(|| report.summary());
        if !report.added.is_empty() {
            self.reload_after_change().await;
        }

        self.busy = false;
        report
    }

    pub async fn remove_item(&mut self, rating_key: &str) -> Result<(), ApiError> {
        let result = self.api.remove_item(&self.item_request(rating_key)).await;
        self.record(result)?;

        if let Some(detail) = self.detail.as_mut() {
            detail.items.retain(|item| item.rating_key != rating_key);
        }
        info!("Removed {} from '{}'", rating_key, self.title);
        Ok(())
    }

    /// Rename and/or change the summary. Blank values are left unchanged.
    pub async fn update(
        &mut self,
        new_title: Option<String>,
        summary: Option<String>,
    ) -> Result<(), ApiError> {
        let new_title = new_title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty() && *t != self.title);
        let summary = summary.filter(|s| !s.trim().is_empty());
        if new_title.is_none() && summary.is_none() {
            return Ok(());
        }

        let request = CollectionUpdateRequest {
            library: self.library.clone(),
            title: self.title.clone(),
            new_title: new_title.clone(),
            summary: summary.clone(),
        };
        let result = self.api.update_collection(&request).await;
        self.record(result)?;

        if let Some(title) = new_title {
            info!("Renamed collection '{}' to '{}'", self.title, title);
            self.title = title.clone();
            if let Some(detail) = self.detail.as_mut() {
                detail.title = title;
            }
        }
        if let (Some(summary), Some(detail)) = (summary, self.detail.as_mut()) {
            detail.summary = Some(summary);
        }
        Ok(())
    }

    pub async fn upload_poster(&mut self, poster: PosterSource) -> Result<(), ApiError> {
        let result = self
            .api
            .upload_poster(&self.library, &self.title, poster)
            .await;
        self.record(result)?;

        // The backend decides the stored poster URL
        self.reload_after_change().await;
        Ok(())
    }

    /// Refresh after a successful write. A failed refresh keeps the old detail.
    async fn reload_after_change(&mut self) {
        match self.api.collection_detail(&self.library, &self.title).await {
            Ok(detail) => self.detail = Some(detail),
            Err(e) => warn!(
                "Reloading '{}' after a change failed, showing stale detail: {}",
                self.title, e
            ),
        }
    }
}

/// Build a poster source from a command-line argument: an http(s) URL or a local file
pub async fn poster_source(arg: &str) -> Result<PosterSource> {
    if arg.starts_with("http://") || arg.starts_with("https://") {
        return Ok(PosterSource::Url(arg.to_string()));
    }

    let path = Path::new(arg);
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read poster file {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "poster".to_string());

    Ok(PosterSource::File { file_name, bytes })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{MediaItem, MockCollectionsApi};
    use mockall::predicate::eq;
    use pretty_assertions::assert_eq;

    fn detail(items: &[&str]) -> CollectionDetail {
        CollectionDetail {
            title: "Heists".to_string(),
            library: "Movies".to_string(),
            summary: None,
            poster_url: None,
            items: items
                .iter()
                .map(|key| MediaItem {
                    rating_key: key.to_string(),
                    title: format!("Movie {key}"),
                    year: Some(2001),
                    thumb_url: None,
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn test_batch_add_continues_after_failure() {
        let mut api = MockCollectionsApi::new();
        let mut seq = mockall::Sequence::new();
        for key in ["1", "2", "3"] {
            let expectation = api
                .expect_add_item()
                .withf(move |req| req.rating_key == key && req.collection == "Heists")
                .times(1)
                .in_sequence(&mut seq);
            if key == "2" {
                expectation.returning(|_| Err(ApiError::status(409, "already in collection")));
            } else {
                expectation.returning(|_| Ok(()));
            }
        }
        api.expect_collection_detail()
            .returning(|_, _| Ok(detail(&["1", "3"])));

        let mut view = CollectionDetailView::new(Arc::new(api), "Movies", "Heists");
        for key in ["1", "2", "3"] {
            view.toggle_selection(key);
        }

        let report = view.add_selected().await;
        assert_eq!(report.added, vec!["1".to_string(), "3".to_string()]);
        assert_eq!(
            report.failed,
            vec![("2".to_string(), "already in collection".to_string())]
        );
        assert_eq!(view.selected, vec!["2".to_string()]);
        assert_eq!(view.error.as_deref(), Some("Added 2 item(s), 1 failed: 2"));
        assert!(view.contains("3"));
        assert!(!view.busy);
    }

    #[tokio::test]
    async fn test_remove_item_updates_local_detail() {
        let mut api = MockCollectionsApi::new();
        api.expect_collection_detail()
            .with(eq("Movies"), eq("Heists"))
            .returning(|_, _| Ok(detail(&["1", "2"])));
        api.expect_remove_item().times(1).returning(|_| Ok(()));

        let mut view = CollectionDetailView::new(Arc::new(api), "Movies", "Heists");
        view.load().await.unwrap();
        view.remove_item("1").await.unwrap();

        assert!(!view.contains("1"));
        assert!(view.contains("2"));
    }

    #[tokio::test]
    async fn test_failed_remove_keeps_item_and_reports() {
        let mut api = MockCollectionsApi::new();
        api.expect_collection_detail()
            .returning(|_, _| Ok(detail(&["1"])));
        api.expect_remove_item()
            .returning(|_| Err(ApiError::status(500, "Plex unreachable")));

        let mut view = CollectionDetailView::new(Arc::new(api), "Movies", "Heists");
        view.load().await.unwrap();
        assert!(view.remove_item("1").await.is_err());
        assert!(view.contains("1"));
        assert_eq!(view.error.as_deref(), Some("Plex unreachable"));
    }

    #[tokio::test]
    async fn test_rename_updates_title() {
        let mut api = MockCollectionsApi::new();
        api.expect_update_collection()
            .withf(|req| req.title == "Heists" && req.new_title.as_deref() == Some("Capers"))
            .times(1)
            .returning(|_| Ok(()));

        let mut view = CollectionDetailView::new(Arc::new(api), "Movies", "Heists");
        view.update(Some(" Capers ".to_string()), None).await.unwrap();
        assert_eq!(view.title, "Capers");
    }

    #[tokio::test]
    async fn test_update_without_changes_sends_nothing() {
        let mut api = MockCollectionsApi::new();
        api.expect_update_collection().times(0);

        let mut view = CollectionDetailView::new(Arc::new(api), "Movies", "Heists");
        view.update(Some("Heists".to_string()), Some("  ".to_string()))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_poster_upload_survives_failed_reload() {
        let mut api = MockCollectionsApi::new();
        let mut seq = mockall::Sequence::new();
        api.expect_collection_detail()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(detail(&["1"])));
        api.expect_upload_poster().times(1).returning(|_, _, _| Ok(()));
        api.expect_collection_detail()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Err(ApiError::status(502, "")));

        let mut view = CollectionDetailView::new(Arc::new(api), "Movies", "Heists");
        view.load().await.unwrap();
        view.upload_poster(PosterSource::Url("https://img.example/p.jpg".to_string()))
            .await
            .unwrap();

        assert!(view.contains("1"));
        assert!(view.error.is_none());
    }

    #[tokio::test]
    async fn test_poster_source_from_url_and_file() {
        let source = poster_source("https://img.example/poster.jpg").await.unwrap();
        assert_eq!(source, PosterSource::Url("https://img.example/poster.jpg".to_string()));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cover.png");
        std::fs::write(&path, [0x89, b'P', b'N', b'G']).unwrap();

        let source = poster_source(path.to_str().unwrap()).await.unwrap();
        assert_eq!(source.mime_type(), Some("image/png"));
        let PosterSource::File { file_name, bytes } = source else {
            panic!("expected a file poster");
        };
        assert_eq!(file_name, "cover.png");
        assert_eq!(bytes.len(), 4);
    }

    #[tokio::test]
    async fn test_missing_poster_file_is_an_error() {
        assert!(poster_source("/definitely/not/here.png").await.is_err());
    }
}
