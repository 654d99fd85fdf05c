// ABOUTME: Ordered steps of the setup wizard
// Linear chain Welcome -> Auth -> Plex -> Trakt -> Rotation -> Complete

/// Steps in the setup wizard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WizardStep {
    Welcome,
    Auth,
    Plex,
    Trakt,
    Rotation,
    Complete,
}

impl WizardStep {
    /// Get all steps in order
    pub fn all() -> &'static [WizardStep] {
        &[
            Self::Welcome,
            Self::Auth,
            Self::Plex,
            Self::Trakt,
            Self::Rotation,
            Self::Complete,
        ]
    }

    /// Get the step number (1-indexed for display)
    pub fn number(&self) -> usize {
        match self {
            Self::Welcome => 1,
            Self::Auth => 2,
            Self::Plex => 3,
            Self::Trakt => 4,
            Self::Rotation => 5,
            Self::Complete => 6,
        }
    }

    pub fn total() -> usize {
        Self::all().len()
    }

    /// Get display title for this step
    pub fn title(&self) -> &'static str {
        match self {
            Self::Welcome => "Welcome",
            Self::Auth => "Security",
            Self::Plex => "Plex",
            Self::Trakt => "Trakt",
            Self::Rotation => "Rotation",
            Self::Complete => "Finish",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Welcome => "Set up Homescreen Hero",
            Self::Auth => "Protect the admin interface",
            Self::Plex => "Connect your Plex server",
            Self::Trakt => "Optional Trakt list integration",
            Self::Rotation => "How often featured collections change",
            Self::Complete => "Review and save",
        }
    }

    /// Get the next step, if any
    pub fn next(&self) -> Option<Self> {
        match self {
            Self::Welcome => Some(Self::Auth),
            Self::Auth => Some(Self::Plex),
            Self::Plex => Some(Self::Trakt),
            Self::Trakt => Some(Self::Rotation),
            Self::Rotation => Some(Self::Complete),
            Self::Complete => None,
        }
    }

    /// Get the previous step, if any
    pub fn previous(&self) -> Option<Self> {
        match self {
            Self::Welcome => None,
            Self::Auth => Some(Self::Welcome),
            Self::Plex => Some(Self::Auth),
            Self::Trakt => Some(Self::Plex),
            Self::Rotation => Some(Self::Trakt),
            Self::Complete => Some(Self::Rotation),
        }
    }
}
