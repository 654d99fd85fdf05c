// ABOUTME: Setup wizard rendering
// Step progress header, one panel per step, and a navigation footer

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, Padding, Paragraph, Wrap},
    Frame,
};

use super::env::EnvField;
use super::state::{EnvironmentStatus, SubmissionStatus, WizardState};
use super::step::WizardStep;
use super::steps::{AuthField, PlexField, ProbeStatus, RotationField, TextField, TraktField};

const CORNFLOWER_BLUE: Color = Color::Rgb(100, 149, 237);
const GOLD: Color = Color::Rgb(255, 215, 0);
const SELECTION_GREEN: Color = Color::Rgb(100, 200, 100);
const DARK_BG: Color = Color::Rgb(25, 25, 35);
const PANEL_BG: Color = Color::Rgb(30, 30, 40);
const HIGHLIGHT_BG: Color = Color::Rgb(40, 40, 60);
const SOFT_WHITE: Color = Color::Rgb(220, 220, 230);
const MUTED_GRAY: Color = Color::Rgb(120, 120, 140);
const SUBDUED_BORDER: Color = Color::Rgb(60, 60, 80);
const ERROR_RED: Color = Color::Rgb(220, 80, 80);
const WARNING_YELLOW: Color = Color::Rgb(220, 180, 80);

pub struct WizardComponent;

impl WizardComponent {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, state: &WizardState) {
        frame.render_widget(Clear, area);
        frame.render_widget(Block::default().style(Style::default().bg(DARK_BG)), area);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5), // Header with progress
                Constraint::Min(12),   // Step panel
                Constraint::Length(3), // Navigation footer
            ])
            .split(area);

        self.render_header(frame, layout[0], state);

        let panel = step_block(state.current_step);
        let inner = panel.inner(layout[1]);
        frame.render_widget(panel, layout[1]);

        match state.current_step {
            WizardStep::Welcome => self.render_welcome(frame, inner, state),
            WizardStep::Auth => self.render_auth(frame, inner, state),
            WizardStep::Plex => self.render_plex(frame, inner, state),
            WizardStep::Trakt => self.render_trakt(frame, inner, state),
            WizardStep::Rotation => self.render_rotation(frame, inner, state),
            WizardStep::Complete => self.render_complete(frame, inner, state),
        }

        self.render_navigation(frame, layout[2], state);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect, state: &WizardState) {
        let block = Block::default()
            .borders(Borders::BOTTOM)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(CORNFLOWER_BLUE))
            .style(Style::default().bg(PANEL_BG));

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([Constraint::Length(1), Constraint::Length(1)])
            .split(inner);

        let title = Paragraph::new(Line::from(vec![
            Span::styled("Homescreen Hero Setup", Style::default().fg(GOLD).add_modifier(Modifier::BOLD)),
            Span::styled(
                format!("  step {} of {}", state.current_step.number(), WizardStep::total()),
                Style::default().fg(MUTED_GRAY),
            ),
        ]))
        .alignment(Alignment::Center);
        frame.render_widget(title, rows[0]);

        let current_idx = state.current_step.number() - 1;
        let steps = WizardStep::all();
        let mut spans = Vec::new();
        for (idx, step) in steps.iter().enumerate() {
            let (icon, style) = if idx < current_idx {
                ("●", Style::default().fg(SELECTION_GREEN))
            } else if idx == current_idx {
                ("◉", Style::default().fg(GOLD).add_modifier(Modifier::BOLD))
            } else {
                ("○", Style::default().fg(MUTED_GRAY))
            };
            spans.push(Span::styled(icon, style));
            spans.push(Span::raw(" "));
            spans.push(Span::styled(
                step.title(),
                Style::default().fg(if idx == current_idx { SOFT_WHITE } else { MUTED_GRAY }),
            ));
            if idx < steps.len() - 1 {
                spans.push(Span::styled(" → ", Style::default().fg(SUBDUED_BORDER)));
            }
        }
        frame.render_widget(
            Paragraph::new(Line::from(spans)).alignment(Alignment::Center),
            rows[1],
        );
    }

    fn render_welcome(&self, frame: &mut Frame, area: Rect, state: &WizardState) {
        let mut lines = vec![
            Line::from(""),
            Line::from(vec![
                Span::styled("Welcome to ", Style::default().fg(SOFT_WHITE)),
                Span::styled("Homescreen Hero", Style::default().fg(GOLD).add_modifier(Modifier::BOLD)),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                "This wizard configures the server in a few steps:",
                Style::default().fg(MUTED_GRAY),
            )),
            Line::from(""),
        ];

        for item in [
            "Optional login for the admin interface",
            "Plex connection and libraries",
            "Optional Trakt integration",
            "Collection rotation schedule",
        ] {
            lines.push(Line::from(vec![
                Span::styled("• ", Style::default().fg(GOLD)),
                Span::styled(item, Style::default().fg(SOFT_WHITE)),
            ]));
        }
        lines.push(Line::from(""));

        match &state.env_status {
            EnvironmentStatus::Loading => lines.push(Line::from(Span::styled(
                "Checking server environment...",
                Style::default().fg(MUTED_GRAY),
            ))),
            EnvironmentStatus::Unavailable(message) => {
                lines.push(Line::from(Span::styled(
                    format!("Could not read environment overrides: {message}"),
                    Style::default().fg(WARNING_YELLOW),
                )));
                lines.push(Line::from(Span::styled(
                    "Every field will be asked for.",
                    Style::default().fg(MUTED_GRAY),
                )));
            }
            EnvironmentStatus::Loaded => {
                let supplied: Vec<EnvField> = [
                    EnvField::PlexUrl,
                    EnvField::PlexToken,
                    EnvField::AuthPassword,
                    EnvField::AuthSecret,
                    EnvField::TraktClientId,
                ]
                .into_iter()
                .filter(|field| state.env.capability(*field).present_from_environment)
                .collect();

                if !supplied.is_empty() {
                    lines.push(Line::from(Span::styled(
                        "Already provided by the server environment:",
                        Style::default().fg(MUTED_GRAY),
                    )));
                    for field in supplied {
                        lines.push(Line::from(Span::styled(
                            format!("🔒 {} ({})", field.label(), field.variable()),
                            Style::default().fg(WARNING_YELLOW),
                        )));
                    }
                }
            }
        }

        frame.render_widget(
            Paragraph::new(lines)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: false }),
            area,
        );
    }

    fn render_auth(&self, frame: &mut Frame, area: Rect, state: &WizardState) {
        let form = &state.auth;
        let rows = form_rows(area, &[2, 3, 3]);

        frame.render_widget(
            Paragraph::new(toggle_line(
                "Require login for the admin interface",
                form.enabled,
                form.focus == AuthField::Enabled,
            )),
            rows[0],
        );

        if !form.enabled {
            frame.render_widget(
                hint("Anyone who can reach the server can change its settings."),
                rows[1],
            );
            return;
        }

        frame.render_widget(
            text_input("Username", &form.username, form.focus == AuthField::Username, false),
            rows[1],
        );

        let password = state.env.capability(EnvField::AuthPassword);
        match password.notice(EnvField::AuthPassword) {
            Some(notice) => frame.render_widget(env_notice(notice), rows[2]),
            None => frame.render_widget(
                text_input("Password", &form.password, form.focus == AuthField::Password, true),
                rows[2],
            ),
        }
    }

    fn render_plex(&self, frame: &mut Frame, area: Rect, state: &WizardState) {
        let form = &state.plex;
        let rows = form_rows(area, &[3, 3, 2]);

        match state.env.capability(EnvField::PlexUrl).notice(EnvField::PlexUrl) {
            Some(notice) => frame.render_widget(env_notice(notice), rows[0]),
            None => frame.render_widget(
                text_input("Plex URL", &form.url, form.focus == PlexField::Url, false),
                rows[0],
            ),
        }

        match state.env.capability(EnvField::PlexToken).notice(EnvField::PlexToken) {
            Some(notice) => frame.render_widget(env_notice(notice), rows[1]),
            None => frame.render_widget(
                text_input("Plex Token", &form.token, form.focus == PlexField::Token, true),
                rows[1],
            ),
        }

        frame.render_widget(Paragraph::new(probe_line(&form.probe)), rows[2]);

        if form.libraries.is_empty() {
            frame.render_widget(hint("Test the connection to list libraries."), rows[3]);
            return;
        }

        let focused = form.focus == PlexField::Libraries;
        let items: Vec<ListItem> = form
            .libraries
            .iter()
            .enumerate()
            .map(|(idx, library)| {
                let order = form.selected.iter().position(|t| t == &library.title);
                let check = match order {
                    Some(pos) => format!("[{}]", pos + 1),
                    None => "[ ]".to_string(),
                };
                let highlighted = focused && idx == form.library_cursor;
                let style = if highlighted {
                    Style::default().bg(HIGHLIGHT_BG)
                } else {
                    Style::default()
                };
                ListItem::new(Line::from(vec![
                    Span::styled(
                        if highlighted { "▶ " } else { "  " },
                        Style::default().fg(SELECTION_GREEN),
                    ),
                    Span::styled(
                        check,
                        Style::default().fg(if order.is_some() { SELECTION_GREEN } else { MUTED_GRAY }),
                    ),
                    Span::raw(" "),
                    Span::styled(library.title.as_str(), Style::default().fg(SOFT_WHITE)),
                    Span::styled(format!(" ({})", library.kind), Style::default().fg(MUTED_GRAY)),
                ]))
                .style(style)
            })
            .collect();

        let list = List::new(items).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(if focused { GOLD } else { SUBDUED_BORDER }))
                .title(" Libraries ")
                .title_style(Style::default().fg(SOFT_WHITE)),
        );
        frame.render_widget(list, rows[3]);
    }

    fn render_trakt(&self, frame: &mut Frame, area: Rect, state: &WizardState) {
        let form = &state.trakt;
        let rows = form_rows(area, &[2, 3, 3, 2]);

        frame.render_widget(
            Paragraph::new(toggle_line(
                "Import collections from Trakt lists",
                form.enabled,
                form.focus == TraktField::Enabled,
            )),
            rows[0],
        );

        if !form.enabled {
            frame.render_widget(hint("Trakt is optional. Press Ctrl+S to skip."), rows[1]);
            return;
        }

        match state
            .env
            .capability(EnvField::TraktClientId)
            .notice(EnvField::TraktClientId)
        {
            Some(notice) => frame.render_widget(env_notice(notice), rows[1]),
            None => frame.render_widget(
                text_input("Client ID", &form.client_id, form.focus == TraktField::ClientId, false),
                rows[1],
            ),
        }

        frame.render_widget(
            text_input("API Base URL", &form.base_url, form.focus == TraktField::BaseUrl, false),
            rows[2],
        );
        frame.render_widget(Paragraph::new(probe_line(&form.probe)), rows[3]);
    }

    fn render_rotation(&self, frame: &mut Frame, area: Rect, state: &WizardState) {
        let form = &state.rotation;
        let focus = form.focus;

        let number_line = |label: &str, value: String, focused: bool| {
            Line::from(vec![
                Span::styled(
                    if focused { "▶ " } else { "  " },
                    Style::default().fg(SELECTION_GREEN),
                ),
                Span::styled(format!("{label}: "), Style::default().fg(SOFT_WHITE)),
                Span::styled(
                    value,
                    if focused {
                        Style::default().fg(GOLD).add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(SOFT_WHITE)
                    },
                ),
            ])
        };

        let lines = vec![
            toggle_line("Rotate featured collections", form.enabled, focus == RotationField::Enabled),
            Line::from(""),
            number_line(
                "Interval (hours)",
                form.interval_input(),
                focus == RotationField::IntervalHours,
            ),
            number_line(
                "Collections per rotation",
                form.max_collections_input(),
                focus == RotationField::MaxCollections,
            ),
            toggle_line(
                "Allow repeats between rotations",
                form.allow_repeats,
                focus == RotationField::AllowRepeats,
            ),
            Line::from(""),
            Line::from(vec![
                Span::styled("  Strategy: ", Style::default().fg(MUTED_GRAY)),
                Span::styled(super::config::ROTATION_STRATEGY, Style::default().fg(SOFT_WHITE)),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                "  ↑/↓ change numbers, digits to type, Space toggles",
                Style::default().fg(MUTED_GRAY),
            )),
        ];

        frame.render_widget(
            Paragraph::new(lines).block(Block::default().padding(Padding::uniform(1))),
            area,
        );
    }

    fn render_complete(&self, frame: &mut Frame, area: Rect, state: &WizardState) {
        let config = &state.config;
        let env = &state.env;

        let check = |on: bool| {
            if on {
                Span::styled("  ✓ ", Style::default().fg(SELECTION_GREEN))
            } else {
                Span::styled("  ○ ", Style::default().fg(WARNING_YELLOW))
            }
        };
        let row = |on: bool, label: &str, value: String| {
            Line::from(vec![
                check(on),
                Span::styled(format!("{label}: "), Style::default().fg(SOFT_WHITE)),
                Span::styled(value, Style::default().fg(MUTED_GRAY)),
            ])
        };

        let plex_url = if env.plex_url_from_env {
            format!("from {}", EnvField::PlexUrl.variable())
        } else {
            config.plex_url.clone()
        };
        let auth = if config.auth_enabled {
            format!("login as {}", config.auth_username)
        } else {
            "disabled".to_string()
        };
        let trakt = if config.trakt_enabled {
            config.trakt_base_url.clone()
        } else {
            "disabled".to_string()
        };
        let rotation = if config.rotation_enabled {
            format!(
                "every {}h, {} collections{}",
                config.rotation_interval_hours,
                config.rotation_max_collections,
                if config.rotation_allow_repeats { ", repeats allowed" } else { "" }
            )
        } else {
            "disabled".to_string()
        };

        let mut lines = vec![
            Line::from(""),
            row(true, "Plex", plex_url),
            row(true, "Libraries", config.selected_libraries.join(", ")),
            row(config.auth_enabled, "Security", auth),
            row(config.trakt_enabled, "Trakt", trakt),
            row(config.rotation_enabled, "Rotation", rotation),
            Line::from(""),
        ];

        lines.push(match &state.submission {
            SubmissionStatus::Idle => Line::from(vec![
                Span::styled("Press ", Style::default().fg(MUTED_GRAY)),
                Span::styled("Enter", Style::default().fg(GOLD).add_modifier(Modifier::BOLD)),
                Span::styled(" to save this configuration", Style::default().fg(MUTED_GRAY)),
            ]),
            SubmissionStatus::Submitting => {
                Line::from(Span::styled("Saving configuration...", Style::default().fg(GOLD)))
            }
            SubmissionStatus::Failed(message) => Line::from(Span::styled(
                format!("✗ {message}"),
                Style::default().fg(ERROR_RED),
            )),
            SubmissionStatus::Completed(message) => Line::from(vec![
                Span::styled(format!("✓ {message}"), Style::default().fg(SELECTION_GREEN)),
                Span::styled("  Press Enter to exit", Style::default().fg(MUTED_GRAY)),
            ]),
        });

        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
    }

    fn render_navigation(&self, frame: &mut Frame, area: Rect, state: &WizardState) {
        let block = Block::default()
            .borders(Borders::TOP)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(SUBDUED_BORDER))
            .style(Style::default().bg(DARK_BG));

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut spans = Vec::new();
        let mut button = |key: &str, label: &str, enabled: bool| {
            if !spans.is_empty() {
                spans.push(Span::styled("  |  ", Style::default().fg(SUBDUED_BORDER)));
            }
            spans.push(Span::styled("[", Style::default().fg(SUBDUED_BORDER)));
            spans.push(Span::styled(
                key.to_string(),
                Style::default().fg(if enabled { GOLD } else { MUTED_GRAY }),
            ));
            spans.push(Span::styled("]", Style::default().fg(SUBDUED_BORDER)));
            spans.push(Span::styled(
                format!(" {label}"),
                Style::default().fg(if enabled { SOFT_WHITE } else { MUTED_GRAY }),
            ));
        };

        if state.can_go_back() {
            button("Ctrl+B", "Back", true);
        }

        match state.current_step {
            WizardStep::Complete => {
                if state.is_completed() {
                    button("Enter", "Exit", true);
                } else {
                    button("Enter", "Save", !state.is_submitting());
                }
            }
            WizardStep::Plex => {
                button("Ctrl+T", "Test", state.plex.can_test(&state.env));
                button("Enter", "Next", state.can_advance());
            }
            WizardStep::Trakt => {
                button("Ctrl+T", "Test", state.trakt.can_test());
                if state.can_skip() {
                    button("Ctrl+S", "Skip", true);
                }
                button("Enter", "Next", state.can_advance());
            }
            _ => button("Enter", "Next", state.can_advance()),
        }

        button("Esc", "Cancel", true);

        frame.render_widget(
            Paragraph::new(Line::from(spans)).alignment(Alignment::Center),
            inner,
        );
    }
}

impl Default for WizardComponent {
    fn default() -> Self {
        Self::new()
    }
}

fn step_block(step: WizardStep) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(CORNFLOWER_BLUE))
        .style(Style::default().bg(PANEL_BG))
        .title(format!(" {} ", step.description()))
        .title_style(Style::default().fg(GOLD).add_modifier(Modifier::BOLD))
}

/// Fixed-height rows followed by one row taking the rest
fn form_rows(area: Rect, heights: &[u16]) -> Vec<Rect> {
    let mut constraints: Vec<Constraint> = heights.iter().map(|h| Constraint::Length(*h)).collect();
    constraints.push(Constraint::Min(0));

    Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(constraints)
        .split(area)
        .to_vec()
}

fn text_input<'a>(title: &'a str, field: &TextField, focused: bool, masked: bool) -> Paragraph<'a> {
    let mut shown: String = if masked {
        "•".repeat(field.value().chars().count())
    } else {
        field.value().to_string()
    };
    if focused {
        let idx = shown
            .char_indices()
            .nth(field.cursor())
            .map_or(shown.len(), |(i, _)| i);
        shown.insert(idx, '│');
    }

    Paragraph::new(shown)
        .style(Style::default().fg(SOFT_WHITE))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(if focused { GOLD } else { SUBDUED_BORDER }))
                .style(Style::default().bg(DARK_BG))
                .title(format!(" {title} "))
                .title_style(Style::default().fg(if focused { SOFT_WHITE } else { MUTED_GRAY })),
        )
}

fn env_notice(notice: String) -> Paragraph<'static> {
    Paragraph::new(Line::from(Span::styled(
        format!("🔒 {notice}"),
        Style::default().fg(WARNING_YELLOW),
    )))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(SUBDUED_BORDER)),
    )
}

fn toggle_line(label: &str, on: bool, focused: bool) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            if focused { "▶ " } else { "  " },
            Style::default().fg(SELECTION_GREEN),
        ),
        Span::styled(
            if on { "[x] " } else { "[ ] " },
            Style::default().fg(if on { SELECTION_GREEN } else { MUTED_GRAY }),
        ),
        Span::styled(
            label.to_string(),
            Style::default().fg(if focused { SOFT_WHITE } else { MUTED_GRAY }),
        ),
    ])
}

fn probe_line(probe: &ProbeStatus) -> Line<'static> {
    match probe {
        ProbeStatus::Untested => Line::from(Span::styled(
            "  Not tested",
            Style::default().fg(MUTED_GRAY),
        )),
        ProbeStatus::Testing => Line::from(Span::styled(
            "  Testing connection...",
            Style::default().fg(GOLD),
        )),
        ProbeStatus::Succeeded => Line::from(Span::styled(
            "  ✓ Connected",
            Style::default().fg(SELECTION_GREEN),
        )),
        ProbeStatus::Failed(message) => Line::from(Span::styled(
            format!("  ✗ {message}"),
            Style::default().fg(ERROR_RED),
        )),
    }
}

fn hint(text: &'static str) -> Paragraph<'static> {
    Paragraph::new(Span::styled(text, Style::default().fg(MUTED_GRAY))).wrap(Wrap { trim: true })
}
