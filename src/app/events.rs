// ABOUTME: Event handling system for keyboard input in the setup wizard

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::info;

use crate::app::AppState;
use crate::wizard::{EditAction, WizardStep};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    Quit,
    /// Enter: advance, or save on the final step
    Next,
    Back,
    SkipStep,
    TestConnection,
    FocusNext,
    FocusPrevious,
    /// Space on a switch or library; typed as a space elsewhere
    Toggle,
    Up,
    Down,
    Edit(EditAction),
}

pub struct EventHandler;

impl EventHandler {
    pub fn handle_key_event(key_event: KeyEvent, _state: &AppState) -> Option<AppEvent> {
        let ctrl = key_event.modifiers.contains(KeyModifiers::CONTROL);

        match key_event.code {
            KeyCode::Esc => Some(AppEvent::Quit),
            KeyCode::Char('c') if ctrl => Some(AppEvent::Quit),
            KeyCode::Char('b') if ctrl => Some(AppEvent::Back),
            KeyCode::Char('s') if ctrl => Some(AppEvent::SkipStep),
            KeyCode::Char('t') if ctrl => Some(AppEvent::TestConnection),
            KeyCode::Char(_) if ctrl => None,
            KeyCode::Enter => Some(AppEvent::Next),
            KeyCode::Tab => Some(AppEvent::FocusNext),
            KeyCode::BackTab => Some(AppEvent::FocusPrevious),
            KeyCode::Up => Some(AppEvent::Up),
            KeyCode::Down => Some(AppEvent::Down),
            KeyCode::Left => Some(AppEvent::Edit(EditAction::Left)),
            KeyCode::Right => Some(AppEvent::Edit(EditAction::Right)),
            KeyCode::Home => Some(AppEvent::Edit(EditAction::Home)),
            KeyCode::End => Some(AppEvent::Edit(EditAction::End)),
            KeyCode::Backspace => Some(AppEvent::Edit(EditAction::Backspace)),
            KeyCode::Delete => Some(AppEvent::Edit(EditAction::Delete)),
            KeyCode::Char(' ') => Some(AppEvent::Toggle),
            KeyCode::Char(c) => Some(AppEvent::Edit(EditAction::Insert(c))),
            _ => None,
        }
    }

    pub fn process_event(event: AppEvent, state: &mut AppState) {
        match event {
            AppEvent::Quit => {
                info!("Setup wizard cancelled");
                state.quit();
            }
            AppEvent::Next => {
                if state.wizard.current_step == WizardStep::Complete {
                    if state.wizard.is_completed() {
                        state.finish();
                    } else {
                        let dispatch = state.wizard.submit();
                        state.queue(dispatch);
                    }
                } else {
                    state.wizard.advance();
                }
            }
            AppEvent::Back => {
                state.wizard.go_back();
            }
            AppEvent::SkipStep => {
                state.wizard.skip_trakt();
            }
            AppEvent::TestConnection => {
                let dispatch = match state.wizard.current_step {
                    WizardStep::Plex => state.wizard.test_plex_connection(),
                    WizardStep::Trakt => state.wizard.test_trakt_connection(),
                    _ => None,
                };
                state.queue(dispatch);
            }
            AppEvent::FocusNext => state.wizard.focus_next(),
            AppEvent::FocusPrevious => state.wizard.focus_previous(),
            AppEvent::Toggle => {
                if !state.wizard.toggle() {
                    state.wizard.edit(EditAction::Insert(' '));
                }
            }
            AppEvent::Up => state.wizard.up(),
            AppEvent::Down => state.wizard.down(),
            AppEvent::Edit(action) => state.wizard.edit(action),
        }
    }
}
