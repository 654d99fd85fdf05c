// ABOUTME: First-run setup wizard for the Homescreen Hero server
// Walks the user through security, Plex, Trakt, and rotation settings and submits them in one call

pub mod component;
pub mod config;
pub mod env;
pub mod requests;
pub mod state;
pub mod step;
pub mod steps;

pub use component::WizardComponent;
pub use config::WizardConfiguration;
pub use env::{EnvField, EnvironmentOverrideFlags, FieldCapability};
pub use requests::{execute, WizardRequest, WizardResponse};
pub use state::{Dispatch, EnvironmentStatus, SubmissionStatus, Ticket, WizardState};
pub use step::WizardStep;
pub use steps::{EditAction, ProbeStatus, TextField};
