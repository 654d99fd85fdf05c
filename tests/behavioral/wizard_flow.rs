// ABOUTME: End-to-end setup wizard flows through App with a fake backend

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyModifiers};
use pretty_assertions::assert_eq;

use hsh_admin::app::{App, AppOutcome};
use hsh_admin::wizard::{
    EnvironmentOverrideFlags, EnvironmentStatus, ProbeStatus, SubmissionStatus, WizardStep,
};

use super::fixtures::{press, press_with, type_text, FakeBackend};

fn ctrl(app: &mut App, c: char) {
    press_with(&mut app.state, KeyCode::Char(c), KeyModifiers::CONTROL);
}

/// Open the wizard and wait for the environment lookup
async fn open(backend: &Arc<FakeBackend>) -> App {
    let mut app = App::new(backend.clone());
    assert_eq!(app.next_response().await, Some(true));
    assert_eq!(app.state.wizard.env_status, EnvironmentStatus::Loaded);
    app
}

/// Welcome -> Auth (disabled) -> Plex
fn to_plex(app: &mut App) {
    press(&mut app.state, KeyCode::Enter);
    press(&mut app.state, KeyCode::Enter);
    assert_eq!(app.state.wizard.current_step, WizardStep::Plex);
}

#[tokio::test]
async fn test_full_setup_with_token_from_environment() {
    let backend = Arc::new(
        FakeBackend::new()
            .with_env(EnvironmentOverrideFlags {
                plex_token_from_env: true,
                ..Default::default()
            })
            .with_libraries(&[("Movies", "movie"), ("TV Shows", "show")]),
    );
    let mut app = open(&backend).await;
    to_plex(&mut app);

    type_text(&mut app.state, "http://plex:32400");
    assert!(!app.state.wizard.can_advance());
    ctrl(&mut app, 't');
    assert_eq!(app.next_response().await, Some(true));
    assert_eq!(app.state.wizard.plex.probe, ProbeStatus::Succeeded);

    // Pick TV Shows first, then Movies
    press(&mut app.state, KeyCode::Tab);
    press(&mut app.state, KeyCode::Down);
    press(&mut app.state, KeyCode::Char(' '));
    press(&mut app.state, KeyCode::Up);
    press(&mut app.state, KeyCode::Char(' '));
    press(&mut app.state, KeyCode::Enter);
    assert_eq!(app.state.wizard.current_step, WizardStep::Trakt);

    // Trakt is off by default
    press(&mut app.state, KeyCode::Enter);
    assert_eq!(app.state.wizard.current_step, WizardStep::Rotation);

    press(&mut app.state, KeyCode::Char(' '));
    press(&mut app.state, KeyCode::Tab);
    for _ in 0..6 {
        press(&mut app.state, KeyCode::Down);
    }
    press(&mut app.state, KeyCode::Tab);
    for _ in 0..2 {
        press(&mut app.state, KeyCode::Down);
    }
    press(&mut app.state, KeyCode::Tab);
    press(&mut app.state, KeyCode::Char(' '));
    press(&mut app.state, KeyCode::Enter);
    assert_eq!(app.state.wizard.current_step, WizardStep::Complete);

    press(&mut app.state, KeyCode::Enter);
    assert!(app.state.wizard.is_submitting());
    assert_eq!(app.next_response().await, Some(true));
    assert!(app.state.wizard.is_completed());

    let sent = backend.quick_starts();
    assert_eq!(sent.len(), 2, "one probe and one submission");
    let body = &sent[1];
    assert_eq!(body.plex_url, "http://plex:32400");
    assert_eq!(body.plex_token, "");
    assert_eq!(body.libraries, vec!["TV Shows".to_string(), "Movies".to_string()]);
    assert!(!body.trakt_enabled);
    assert!(!body.auth_enabled);
    assert_eq!(body.auth_username, None);
    assert!(body.rotation_enabled);
    assert_eq!(body.rotation_interval_hours, 6);
    assert_eq!(body.rotation_max_collections, 3);
    assert!(body.rotation_allow_repeats);
    assert_eq!(body.rotation_strategy, "random");

    // Enter on the finished wizard closes it
    press(&mut app.state, KeyCode::Enter);
    assert!(app.state.should_quit);
    assert_eq!(
        app.state.outcome,
        Some(AppOutcome::Completed("Configuration saved".to_string()))
    );
}

#[tokio::test]
async fn test_auth_gate_requires_username_and_password() {
    let backend = Arc::new(FakeBackend::new());
    let mut app = open(&backend).await;
    press(&mut app.state, KeyCode::Enter);
    assert_eq!(app.state.wizard.current_step, WizardStep::Auth);

    press(&mut app.state, KeyCode::Char(' '));
    assert!(app.state.wizard.auth.enabled);
    press(&mut app.state, KeyCode::Enter);
    assert_eq!(app.state.wizard.current_step, WizardStep::Auth);

    press(&mut app.state, KeyCode::Tab);
    type_text(&mut app.state, "admin");
    press(&mut app.state, KeyCode::Enter);
    assert_eq!(app.state.wizard.current_step, WizardStep::Auth);

    press(&mut app.state, KeyCode::Tab);
    type_text(&mut app.state, "hunter2");
    press(&mut app.state, KeyCode::Enter);
    assert_eq!(app.state.wizard.current_step, WizardStep::Plex);
    assert_eq!(app.state.wizard.config.auth_username, "admin");
    assert_eq!(app.state.wizard.config.auth_password, "hunter2");
}

#[tokio::test]
async fn test_failed_plex_test_shows_backend_message() {
    let backend = Arc::new(FakeBackend::new().with_libraries(&[("Movies", "movie")]));
    backend.fail_next_quick_start(400, "invalid token");
    let mut app = open(&backend).await;
    to_plex(&mut app);

    type_text(&mut app.state, "http://plex:32400");
    press(&mut app.state, KeyCode::Tab);
    type_text(&mut app.state, "bad-token");
    ctrl(&mut app, 't');
    assert_eq!(app.next_response().await, Some(true));

    assert_eq!(app.state.wizard.step_error(), Some("invalid token"));
    assert!(app.state.wizard.plex.libraries.is_empty());
    assert_eq!(*backend.library_calls.lock().unwrap(), 0);
    press(&mut app.state, KeyCode::Enter);
    assert_eq!(app.state.wizard.current_step, WizardStep::Plex);
}

#[tokio::test]
async fn test_editing_url_during_test_discards_result() {
    let backend = Arc::new(FakeBackend::new().with_libraries(&[("Movies", "movie")]));
    let mut app = open(&backend).await;
    to_plex(&mut app);

    type_text(&mut app.state, "http://plex:32400");
    press(&mut app.state, KeyCode::Tab);
    type_text(&mut app.state, "abc");
    ctrl(&mut app, 't');
    assert_eq!(app.state.wizard.plex.probe, ProbeStatus::Testing);

    // Typing into the token field before the result lands
    type_text(&mut app.state, "d");
    assert_eq!(app.next_response().await, Some(false));
    assert_eq!(app.state.wizard.plex.probe, ProbeStatus::Untested);
    assert!(app.state.wizard.plex.libraries.is_empty());
}

#[tokio::test]
async fn test_back_keeps_entered_values() {
    let backend = Arc::new(FakeBackend::new().with_libraries(&[("Movies", "movie")]));
    let mut app = open(&backend).await;
    to_plex(&mut app);

    type_text(&mut app.state, "http://plex:32400");
    press(&mut app.state, KeyCode::Tab);
    type_text(&mut app.state, "abc");
    ctrl(&mut app, 't');
    app.next_response().await;
    press(&mut app.state, KeyCode::Tab);
    press(&mut app.state, KeyCode::Char(' '));
    press(&mut app.state, KeyCode::Enter);
    assert_eq!(app.state.wizard.current_step, WizardStep::Trakt);

    ctrl(&mut app, 'b');
    assert_eq!(app.state.wizard.current_step, WizardStep::Plex);
    assert_eq!(app.state.wizard.plex.url.value(), "http://plex:32400");
    assert_eq!(app.state.wizard.plex.selected, vec!["Movies".to_string()]);
    assert!(app.state.wizard.can_advance());
}

#[tokio::test]
async fn test_skip_trakt_forces_integration_off() {
    let backend = Arc::new(FakeBackend::new().with_libraries(&[("Movies", "movie")]));
    let mut app = open(&backend).await;
    to_plex(&mut app);
    type_text(&mut app.state, "http://plex:32400");
    press(&mut app.state, KeyCode::Tab);
    type_text(&mut app.state, "abc");
    ctrl(&mut app, 't');
    app.next_response().await;
    press(&mut app.state, KeyCode::Tab);
    press(&mut app.state, KeyCode::Char(' '));
    press(&mut app.state, KeyCode::Enter);

    // Enabled Trakt cannot be skipped
    press(&mut app.state, KeyCode::Char(' '));
    ctrl(&mut app, 's');
    assert_eq!(app.state.wizard.current_step, WizardStep::Trakt);

    press(&mut app.state, KeyCode::Char(' '));
    ctrl(&mut app, 's');
    assert_eq!(app.state.wizard.current_step, WizardStep::Rotation);
    assert!(!app.state.wizard.config.trakt_enabled);
    assert_eq!(app.state.wizard.config.trakt_client_id, "");
    assert_eq!(app.state.wizard.config.trakt_base_url, "https://api.trakt.tv");
}

#[tokio::test]
async fn test_failed_submission_can_be_retried() {
    let backend = Arc::new(FakeBackend::new().with_libraries(&[("Movies", "movie")]));
    let mut app = open(&backend).await;
    to_plex(&mut app);
    type_text(&mut app.state, "http://plex:32400");
    press(&mut app.state, KeyCode::Tab);
    type_text(&mut app.state, "abc");
    ctrl(&mut app, 't');
    app.next_response().await;
    press(&mut app.state, KeyCode::Tab);
    press(&mut app.state, KeyCode::Char(' '));
    press(&mut app.state, KeyCode::Enter);
    press(&mut app.state, KeyCode::Enter);
    press(&mut app.state, KeyCode::Enter);
    assert_eq!(app.state.wizard.current_step, WizardStep::Complete);

    backend.fail_next_quick_start(422, "libraries must not be empty");
    press(&mut app.state, KeyCode::Enter);
    assert_eq!(app.next_response().await, Some(true));
    assert_eq!(
        app.state.wizard.submission,
        SubmissionStatus::Failed("libraries must not be empty".to_string())
    );
    assert!(app.state.wizard.can_go_back());

    press(&mut app.state, KeyCode::Enter);
    assert_eq!(app.next_response().await, Some(true));
    assert!(app.state.wizard.is_completed());
    assert_eq!(backend.quick_starts().len(), 3);
}

#[tokio::test]
async fn test_escape_after_save_still_completes() {
    let backend = Arc::new(FakeBackend::new().with_libraries(&[("Movies", "movie")]));
    let mut app = open(&backend).await;
    to_plex(&mut app);
    type_text(&mut app.state, "http://plex:32400");
    press(&mut app.state, KeyCode::Tab);
    type_text(&mut app.state, "abc");
    ctrl(&mut app, 't');
    app.next_response().await;
    press(&mut app.state, KeyCode::Tab);
    press(&mut app.state, KeyCode::Char(' '));
    press(&mut app.state, KeyCode::Enter);
    press(&mut app.state, KeyCode::Enter);
    press(&mut app.state, KeyCode::Enter);
    press(&mut app.state, KeyCode::Enter);
    assert_eq!(app.next_response().await, Some(true));
    assert!(app.state.wizard.is_completed());

    press(&mut app.state, KeyCode::Esc);
    assert!(app.state.should_quit);
    assert_eq!(
        app.state.outcome,
        Some(AppOutcome::Completed("Configuration saved".to_string()))
    );
}

#[tokio::test]
async fn test_retyped_interval_is_submitted() {
    let backend = Arc::new(FakeBackend::new().with_libraries(&[("Movies", "movie")]));
    let mut app = open(&backend).await;
    to_plex(&mut app);
    type_text(&mut app.state, "http://plex:32400");
    press(&mut app.state, KeyCode::Tab);
    type_text(&mut app.state, "abc");
    ctrl(&mut app, 't');
    app.next_response().await;
    press(&mut app.state, KeyCode::Tab);
    press(&mut app.state, KeyCode::Char(' '));
    press(&mut app.state, KeyCode::Enter);
    press(&mut app.state, KeyCode::Enter);
    assert_eq!(app.state.wizard.current_step, WizardStep::Rotation);

    // Clear the default 12 and type 6
    press(&mut app.state, KeyCode::Tab);
    press(&mut app.state, KeyCode::Backspace);
    press(&mut app.state, KeyCode::Backspace);
    press(&mut app.state, KeyCode::Char('6'));
    assert_eq!(app.state.wizard.rotation.interval_hours(), 6);

    press(&mut app.state, KeyCode::Enter);
    assert_eq!(app.state.wizard.config.rotation_interval_hours, 6);
}

#[tokio::test]
async fn test_environment_failure_leaves_fields_editable() {
    let backend = Arc::new(FakeBackend {
        env_failure: Some((500, "boom".to_string())),
        ..FakeBackend::new()
    });
    let mut app = App::new(backend.clone());
    assert_eq!(app.next_response().await, Some(true));
    assert_eq!(
        app.state.wizard.env_status,
        EnvironmentStatus::Unavailable("boom".to_string())
    );
    assert_eq!(app.state.wizard.env, EnvironmentOverrideFlags::default());
}

#[tokio::test]
async fn test_escape_drops_late_results() {
    let backend = Arc::new(FakeBackend::new().with_env(EnvironmentOverrideFlags {
        plex_url_from_env: true,
        ..Default::default()
    }));
    let mut app = App::new(backend.clone());
    app.dispatch_pending();
    press(&mut app.state, KeyCode::Esc);

    assert_eq!(app.next_response().await, Some(false));
    assert!(!app.state.wizard.env.plex_url_from_env);
    assert_eq!(app.state.outcome, Some(AppOutcome::Cancelled));
}
