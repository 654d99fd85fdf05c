// ABOUTME: Debounced search behavior observed from the backend's side

use std::sync::Arc;
use std::time::Duration;

use hsh_admin::collections::{SearchView, DEFAULT_SEARCH_DEBOUNCE};

use super::fixtures::FakeBackend;

#[tokio::test(start_paused = true)]
async fn test_typing_burst_sends_only_final_query() {
    let backend = Arc::new(FakeBackend::new());
    let mut view = SearchView::new(backend.clone(), "Movies", DEFAULT_SEARCH_DEBOUNCE);

    for c in "batman".chars() {
        view.push_char(c);
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    assert_eq!(view.next_outcome().await, Some(true));
    assert_eq!(backend.search_queries(), vec!["batman".to_string()]);
    assert_eq!(view.results.len(), 1);
    assert_eq!(view.results[0].title, "batman");
}

#[tokio::test(start_paused = true)]
async fn test_searches_target_the_view_library() {
    let backend = Arc::new(FakeBackend::new());
    let mut view = SearchView::new(backend.clone(), "TV Shows", DEFAULT_SEARCH_DEBOUNCE);

    view.set_query("office");
    view.next_outcome().await;

    let searches = backend.searches.lock().unwrap().clone();
    assert_eq!(searches, vec![("TV Shows".to_string(), "office".to_string())]);
}

#[tokio::test(start_paused = true)]
async fn test_clearing_query_drops_in_flight_results() {
    let backend = Arc::new(FakeBackend::new());
    let mut view = SearchView::new(backend.clone(), "Movies", DEFAULT_SEARCH_DEBOUNCE);

    view.set_query("heat");
    tokio::time::sleep(DEFAULT_SEARCH_DEBOUNCE + Duration::from_millis(10)).await;
    view.set_query("");

    // The request already went out; its result must not repopulate the list
    assert_eq!(view.next_outcome().await, Some(false));
    assert!(view.results.is_empty());
    assert_eq!(backend.search_queries(), vec!["heat".to_string()]);
}
