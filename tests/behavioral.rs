// ABOUTME: Behavioral test suite driving the wizard and search views against an in-memory backend
//
// These tests go through the same entry points as the TUI and CLI: key events
// into AppState, requests through App, searches through SearchView.

#[path = "behavioral/fixtures.rs"]
pub mod fixtures;

#[path = "behavioral/wizard_flow.rs"]
mod wizard_flow;

#[path = "behavioral/collections_search.rs"]
mod collections_search;
