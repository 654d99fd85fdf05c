// ABOUTME: Per-step view-models for the setup wizard
// Each form holds its own local field values and validation gate; values reach the shared
// configuration only when the step's Next (or Skip) is confirmed

use tracing::{debug, info};

use super::config::{WizardConfiguration, DEFAULT_TRAKT_BASE_URL, ROTATION_STRATEGY};
use super::env::{EnvField, EnvironmentOverrideFlags};
use crate::api::{ApiError, HealthComponent, Library};

/// Single-line text input with a cursor measured in characters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextField {
    value: String,
    cursor: usize,
}

impl TextField {
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        let cursor = value.chars().count();
        Self { value, cursor }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }

    fn byte_index(&self) -> usize {
        self.value
            .char_indices()
            .nth(self.cursor)
            .map_or(self.value.len(), |(idx, _)| idx)
    }

    pub fn insert(&mut self, c: char) {
        let idx = self.byte_index();
        self.value.insert(idx, c);
        self.cursor += 1;
    }

    /// Returns true if a character was removed
    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        let idx = self.byte_index();
        self.value.remove(idx);
        true
    }

    /// Returns true if a character was removed
    pub fn delete(&mut self) -> bool {
        if self.cursor >= self.value.chars().count() {
            return false;
        }
        let idx = self.byte_index();
        self.value.remove(idx);
        true
    }

    pub fn cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        if self.cursor < self.value.chars().count() {
            self.cursor += 1;
        }
    }

    pub fn cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor = self.value.chars().count();
    }

    pub fn set(&mut self, value: impl Into<String>) {
        *self = Self::new(value);
    }
}

/// Outcome of a user-triggered connectivity test
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ProbeStatus {
    #[default]
    Untested,
    Testing,
    Succeeded,
    Failed(String),
}

impl ProbeStatus {
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Key-level editing actions shared by all forms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditAction {
    Insert(char),
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
}

impl EditAction {
    /// Apply to a field; returns true if the value changed
    pub fn apply(self, field: &mut TextField) -> bool {
        match self {
            Self::Insert(c) => {
                field.insert(c);
                true
            }
            Self::Backspace => field.backspace(),
            Self::Delete => field.delete(),
            Self::Left => {
                field.cursor_left();
                false
            }
            Self::Right => {
                field.cursor_right();
                false
            }
            Self::Home => {
                field.cursor_home();
                false
            }
            Self::End => {
                field.cursor_end();
                false
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Auth

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthField {
    Enabled,
    Username,
    Password,
}

#[derive(Debug, Clone)]
pub struct AuthForm {
    pub enabled: bool,
    pub username: TextField,
    pub password: TextField,
    pub focus: AuthField,
}

impl AuthForm {
    pub fn from_config(config: &WizardConfiguration) -> Self {
        Self {
            enabled: config.auth_enabled,
            username: TextField::new(config.auth_username.clone()),
            password: TextField::new(config.auth_password.clone()),
            focus: AuthField::Enabled,
        }
    }

    /// Username required and a password either typed or supplied by the environment
    pub fn can_advance(&self, env: &EnvironmentOverrideFlags) -> bool {
        if !self.enabled {
            return true;
        }
        let password = env.capability(EnvField::AuthPassword);
        !self.username.is_blank()
            && (password.present_from_environment || !self.password.value().is_empty())
    }

    pub fn toggle_enabled(&mut self) {
        self.enabled = !self.enabled;
    }

    /// Fields the user can move between, given the current toggle and overrides
    fn focusable(&self, env: &EnvironmentOverrideFlags) -> Vec<AuthField> {
        let mut fields = vec![AuthField::Enabled];
        if self.enabled {
            fields.push(AuthField::Username);
            if env.capability(EnvField::AuthPassword).user_editable {
                fields.push(AuthField::Password);
            }
        }
        fields
    }

    pub fn focus_next(&mut self, env: &EnvironmentOverrideFlags) {
        self.focus = cycle(&self.focusable(env), self.focus, 1);
    }

    pub fn focus_previous(&mut self, env: &EnvironmentOverrideFlags) {
        self.focus = cycle(&self.focusable(env), self.focus, -1);
    }

    pub fn edit(&mut self, action: EditAction, env: &EnvironmentOverrideFlags) {
        match self.focus {
            AuthField::Username => {
                action.apply(&mut self.username);
            }
            AuthField::Password if env.capability(EnvField::AuthPassword).user_editable => {
                action.apply(&mut self.password);
            }
            _ => {}
        }
    }

    pub fn merge_into(&self, config: &mut WizardConfiguration, env: &EnvironmentOverrideFlags) {
        config.auth_enabled = self.enabled;
        config.auth_username = self.username.value().trim().to_string();
        config.auth_password = if env.capability(EnvField::AuthPassword).user_editable {
            self.password.value().to_string()
        } else {
            String::new()
        };
    }
}

// ---------------------------------------------------------------------------
// Plex

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlexField {
    Url,
    Token,
    Libraries,
}

/// Values sent with a Plex connectivity test
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlexProbe {
    pub url: String,
    pub token: String,
}

#[derive(Debug, Clone)]
pub struct PlexForm {
    pub url: TextField,
    pub token: TextField,
    pub focus: PlexField,
    pub probe: ProbeStatus,
    /// Sequence of the connectivity test whose result is still awaited
    pub in_flight: Option<u64>,
    /// Libraries reported by the last successful test
    pub libraries: Vec<Library>,
    /// Selected library titles in the order they were picked
    pub selected: Vec<String>,
    pub library_cursor: usize,
}

impl PlexForm {
    pub fn from_config(config: &WizardConfiguration) -> Self {
        Self {
            url: TextField::new(config.plex_url.clone()),
            token: TextField::new(config.plex_token.clone()),
            focus: PlexField::Url,
            probe: ProbeStatus::Untested,
            in_flight: None,
            libraries: Vec::new(),
            selected: config.selected_libraries.clone(),
            library_cursor: 0,
        }
    }

    fn credentials_present(&self, env: &EnvironmentOverrideFlags) -> bool {
        env.capability(EnvField::PlexUrl).satisfied_by(self.url.value())
            && env.capability(EnvField::PlexToken).satisfied_by(self.token.value())
    }

    pub fn can_advance(&self, env: &EnvironmentOverrideFlags) -> bool {
        self.credentials_present(env)
            && self.probe == ProbeStatus::Succeeded
            && !self.selected.is_empty()
    }

    pub fn can_test(&self, env: &EnvironmentOverrideFlags) -> bool {
        self.in_flight.is_none() && self.credentials_present(env)
    }

    pub fn is_testing(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Mark a test as started and return the values to send
    pub fn begin_test(&mut self, seq: u64, env: &EnvironmentOverrideFlags) -> PlexProbe {
        self.in_flight = Some(seq);
        self.probe = ProbeStatus::Testing;
        PlexProbe {
            url: editable_value(env, EnvField::PlexUrl, &self.url),
            token: editable_value(env, EnvField::PlexToken, &self.token),
        }
    }

    /// Apply the result of test `seq`. Returns false if that test is no longer current.
    pub fn finish_test(&mut self, seq: u64, result: Result<Vec<Library>, ApiError>) -> bool {
        if self.in_flight != Some(seq) {
            return false;
        }
        self.in_flight = None;

        match result {
            Ok(libraries) => {
                info!("Plex connection verified, {} libraries available", libraries.len());
                self.selected
                    .retain(|title| libraries.iter().any(|lib| &lib.title == title));
                self.library_cursor = 0;
                self.libraries = libraries;
                self.probe = ProbeStatus::Succeeded;
            }
            Err(e) => {
                info!("Plex connection test failed: {}", e);
                self.libraries.clear();
                self.probe = ProbeStatus::Failed(e.user_message());
            }
        }
        true
    }

    /// Drop a previous success (and any pending test) after the url or token changed
    pub fn invalidate(&mut self) {
        if self.probe != ProbeStatus::Untested || self.in_flight.is_some() {
            debug!("Plex credentials edited; connection must be re-tested");
        }
        self.probe = ProbeStatus::Untested;
        self.in_flight = None;
        self.libraries.clear();
        self.library_cursor = 0;
    }

    fn focusable(&self, env: &EnvironmentOverrideFlags) -> Vec<PlexField> {
        let mut fields = Vec::new();
        if env.capability(EnvField::PlexUrl).user_editable {
            fields.push(PlexField::Url);
        }
        if env.capability(EnvField::PlexToken).user_editable {
            fields.push(PlexField::Token);
        }
        if !self.libraries.is_empty() {
            fields.push(PlexField::Libraries);
        }
        fields
    }

    pub fn focus_next(&mut self, env: &EnvironmentOverrideFlags) {
        self.focus = cycle(&self.focusable(env), self.focus, 1);
    }

    pub fn focus_previous(&mut self, env: &EnvironmentOverrideFlags) {
        self.focus = cycle(&self.focusable(env), self.focus, -1);
    }

    pub fn edit(&mut self, action: EditAction, env: &EnvironmentOverrideFlags) {
        let changed = match self.focus {
            PlexField::Url if env.capability(EnvField::PlexUrl).user_editable => {
                action.apply(&mut self.url)
            }
            PlexField::Token if env.capability(EnvField::PlexToken).user_editable => {
                action.apply(&mut self.token)
            }
            _ => false,
        };
        if changed {
            self.invalidate();
        }
    }

    /// Select or deselect a library by title, keeping selection order
    pub fn toggle_library(&mut self, title: &str) {
        if let Some(pos) = self.selected.iter().position(|t| t == title) {
            self.selected.remove(pos);
        } else if self.libraries.iter().any(|lib| lib.title == title) {
            self.selected.push(title.to_string());
        }
    }

    pub fn toggle_library_at_cursor(&mut self) {
        if let Some(title) = self.libraries.get(self.library_cursor).map(|l| l.title.clone()) {
            self.toggle_library(&title);
        }
    }

    pub fn is_selected(&self, title: &str) -> bool {
        self.selected.iter().any(|t| t == title)
    }

    pub fn library_cursor_down(&mut self) {
        if self.library_cursor + 1 < self.libraries.len() {
            self.library_cursor += 1;
        }
    }

    pub fn library_cursor_up(&mut self) {
        self.library_cursor = self.library_cursor.saturating_sub(1);
    }

    pub fn merge_into(&self, config: &mut WizardConfiguration, env: &EnvironmentOverrideFlags) {
        config.plex_url = editable_value(env, EnvField::PlexUrl, &self.url);
        config.plex_token = editable_value(env, EnvField::PlexToken, &self.token);
        config.selected_libraries = self.selected.clone();
    }
}

// ---------------------------------------------------------------------------
// Trakt

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraktField {
    Enabled,
    ClientId,
    BaseUrl,
}

#[derive(Debug, Clone)]
pub struct TraktForm {
    pub enabled: bool,
    pub client_id: TextField,
    pub base_url: TextField,
    pub focus: TraktField,
    pub probe: ProbeStatus,
    pub in_flight: Option<u64>,
}

impl TraktForm {
    pub fn from_config(config: &WizardConfiguration) -> Self {
        Self {
            enabled: config.trakt_enabled,
            client_id: TextField::new(config.trakt_client_id.clone()),
            base_url: TextField::new(config.trakt_base_url.clone()),
            focus: TraktField::Enabled,
            probe: ProbeStatus::Untested,
            in_flight: None,
        }
    }

    pub fn can_advance(&self, env: &EnvironmentOverrideFlags) -> bool {
        !self.enabled
            || (env
                .capability(EnvField::TraktClientId)
                .satisfied_by(self.client_id.value())
                && !self.base_url.is_blank())
    }

    /// Skipping is only offered while the integration is switched off
    pub fn can_skip(&self) -> bool {
        !self.enabled
    }

    pub fn can_test(&self) -> bool {
        self.in_flight.is_none()
    }

    pub fn toggle_enabled(&mut self) {
        self.enabled = !self.enabled;
    }

    pub fn begin_test(&mut self, seq: u64) {
        self.in_flight = Some(seq);
        self.probe = ProbeStatus::Testing;
    }

    /// Apply the result of test `seq`. Returns false if that test is no longer current.
    pub fn finish_test(&mut self, seq: u64, result: Result<HealthComponent, ApiError>) -> bool {
        if self.in_flight != Some(seq) {
            return false;
        }
        self.in_flight = None;

        self.probe = match result {
            Ok(health) if health.ok => ProbeStatus::Succeeded,
            Ok(health) => ProbeStatus::Failed(
                health
                    .error
                    .unwrap_or_else(|| "Trakt connection failed".to_string()),
            ),
            Err(e) => ProbeStatus::Failed(e.user_message()),
        };
        true
    }

    fn focusable(&self, env: &EnvironmentOverrideFlags) -> Vec<TraktField> {
        let mut fields = vec![TraktField::Enabled];
        if self.enabled {
            if env.capability(EnvField::TraktClientId).user_editable {
                fields.push(TraktField::ClientId);
            }
            fields.push(TraktField::BaseUrl);
        }
        fields
    }

    pub fn focus_next(&mut self, env: &EnvironmentOverrideFlags) {
        self.focus = cycle(&self.focusable(env), self.focus, 1);
    }

    pub fn focus_previous(&mut self, env: &EnvironmentOverrideFlags) {
        self.focus = cycle(&self.focusable(env), self.focus, -1);
    }

    pub fn edit(&mut self, action: EditAction, env: &EnvironmentOverrideFlags) {
        match self.focus {
            TraktField::ClientId if env.capability(EnvField::TraktClientId).user_editable => {
                action.apply(&mut self.client_id);
            }
            TraktField::BaseUrl => {
                action.apply(&mut self.base_url);
            }
            _ => {}
        }
    }

    pub fn merge_into(&self, config: &mut WizardConfiguration, env: &EnvironmentOverrideFlags) {
        config.trakt_enabled = self.enabled;
        config.trakt_client_id = editable_value(env, EnvField::TraktClientId, &self.client_id);
        config.trakt_base_url = self.base_url.value().trim().to_string();
    }

    /// Force the integration off and restore defaults, locally and in the configuration
    pub fn skip_into(&mut self, config: &mut WizardConfiguration) {
        self.enabled = false;
        self.client_id.set("");
        self.base_url.set(DEFAULT_TRAKT_BASE_URL);
        self.focus = TraktField::Enabled;

        config.trakt_enabled = false;
        config.trakt_client_id = String::new();
        config.trakt_base_url = DEFAULT_TRAKT_BASE_URL.to_string();
    }
}

// ---------------------------------------------------------------------------
// Rotation

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationField {
    Enabled,
    IntervalHours,
    MaxCollections,
    AllowRepeats,
}

impl RotationField {
    const ORDER: [Self; 4] = [
        Self::Enabled,
        Self::IntervalHours,
        Self::MaxCollections,
        Self::AllowRepeats,
    ];
}

#[derive(Debug, Clone)]
pub struct RotationForm {
    pub enabled: bool,
    interval_hours: u32,
    max_collections: u32,
    pub allow_repeats: bool,
    pub focus: RotationField,
}

impl RotationForm {
    pub fn from_config(config: &WizardConfiguration) -> Self {
        Self {
            enabled: config.rotation_enabled,
            interval_hours: config.rotation_interval_hours.max(1),
            max_collections: config.rotation_max_collections.max(1),
            allow_repeats: config.rotation_allow_repeats,
            focus: RotationField::Enabled,
        }
    }

    /// Interval to save; a cleared input counts as one
    pub fn interval_hours(&self) -> u32 {
        self.interval_hours.max(1)
    }

    /// Collection count to save; a cleared input counts as one
    pub fn max_collections(&self) -> u32 {
        self.max_collections.max(1)
    }

    /// Text shown in the interval input, empty while the user is retyping it
    pub fn interval_input(&self) -> String {
        input_text(self.interval_hours)
    }

    pub fn max_collections_input(&self) -> String {
        input_text(self.max_collections)
    }

    /// Values below one are raised to one
    pub fn set_interval_hours(&mut self, hours: u32) {
        self.interval_hours = hours.max(1);
    }

    /// Values below one are raised to one
    pub fn set_max_collections(&mut self, count: u32) {
        self.max_collections = count.max(1);
    }

    pub fn focus_next(&mut self) {
        self.focus = cycle(&RotationField::ORDER, self.focus, 1);
    }

    pub fn focus_previous(&mut self) {
        self.focus = cycle(&RotationField::ORDER, self.focus, -1);
    }

    /// Toggle the focused switch
    pub fn toggle(&mut self) {
        match self.focus {
            RotationField::Enabled => self.enabled = !self.enabled,
            RotationField::AllowRepeats => self.allow_repeats = !self.allow_repeats,
            _ => {}
        }
    }

    /// Step the focused number up or down by one
    pub fn adjust(&mut self, delta: i32) {
        let apply = |value: u32| value.max(1).saturating_add_signed(delta).max(1);
        match self.focus {
            RotationField::IntervalHours => self.interval_hours = apply(self.interval_hours),
            RotationField::MaxCollections => self.max_collections = apply(self.max_collections),
            _ => {}
        }
    }

    /// Type a digit into the focused number, e.g. "1" then "2" gives 12
    pub fn push_digit(&mut self, digit: u32) {
        let append = |value: u32| value.saturating_mul(10).saturating_add(digit);
        match self.focus {
            RotationField::IntervalHours => self.interval_hours = append(self.interval_hours),
            RotationField::MaxCollections => self.max_collections = append(self.max_collections),
            _ => {}
        }
    }

    pub fn pop_digit(&mut self) {
        match self.focus {
            RotationField::IntervalHours => self.interval_hours /= 10,
            RotationField::MaxCollections => self.max_collections /= 10,
            _ => {}
        }
    }

    pub fn merge_into(&self, config: &mut WizardConfiguration) {
        config.rotation_enabled = self.enabled;
        config.rotation_interval_hours = self.interval_hours();
        config.rotation_max_collections = self.max_collections();
        config.rotation_strategy = ROTATION_STRATEGY.to_string();
        config.rotation_allow_repeats = self.allow_repeats;
    }
}

/// Zero is the cleared state of a number input
fn input_text(value: u32) -> String {
    if value == 0 {
        String::new()
    } else {
        value.to_string()
    }
}

/// Value to send for a field: what the user typed, or empty when the environment supplies it
fn editable_value(env: &EnvironmentOverrideFlags, field: EnvField, input: &TextField) -> String {
    if env.capability(field).user_editable {
        input.value().trim().to_string()
    } else {
        String::new()
    }
}

fn cycle<T: Copy + PartialEq>(items: &[T], current: T, step: isize) -> T {
    if items.is_empty() {
        return current;
    }
    let len = items.len() as isize;
    let idx = items.iter().position(|i| *i == current).unwrap_or(0) as isize;
    items[(idx + step).rem_euclid(len) as usize]
}
