// ABOUTME: CLI commands that inspect the backend: env, status, libraries

use anyhow::Result;
use serde::Serialize;

use super::{connect, print_json, OutputFormat};
use crate::api::{AdminApi, ConfigExistsResponse, HealthComponent, Library};
use crate::config::AppConfig;
use crate::wizard::{EnvField, EnvironmentOverrideFlags};

const ENV_FIELDS: [EnvField; 5] = [
    EnvField::PlexUrl,
    EnvField::PlexToken,
    EnvField::AuthPassword,
    EnvField::AuthSecret,
    EnvField::TraktClientId,
];

pub fn format_env_flags(flags: &EnvironmentOverrideFlags) -> String {
    ENV_FIELDS
        .iter()
        .map(|field| {
            let source = if flags.capability(*field).present_from_environment {
                format!("environment ({})", field.variable())
            } else {
                "wizard".to_string()
            };
            format!("{:<18}{}", field.label(), source)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Execute the env command
pub async fn env(config: &AppConfig, format: OutputFormat) -> Result<()> {
    let client = connect(config).await?;
    let flags = client.env_vars().await?;

    match format {
        OutputFormat::Json => print_json(&flags)?,
        OutputFormat::Text => println!("{}", format_env_flags(&flags)),
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct StatusOutput {
    pub server: String,
    pub config: ConfigExistsResponse,
    pub trakt: HealthComponent,
}

pub fn format_status(status: &StatusOutput) -> String {
    let configured = match (status.config.exists, status.config.is_configured) {
        (true, true) => "configured",
        (true, false) => "incomplete (run `hsh-admin setup`)",
        (false, _) => "not configured (run `hsh-admin setup`)",
    };
    let trakt = if status.trakt.ok {
        "ok".to_string()
    } else {
        status
            .trakt
            .error
            .clone()
            .unwrap_or_else(|| "unavailable".to_string())
    };

    [
        format!("Server:   {}", status.server),
        "━".repeat(44),
        format!("Config:   {} ({})", configured, status.config.path),
        format!("Trakt:    {trakt}"),
    ]
    .join("\n")
}

/// Execute the status command
pub async fn status(config: &AppConfig, format: OutputFormat) -> Result<()> {
    let client = connect(config).await?;
    let output = StatusOutput {
        server: client.base_url().to_string(),
        config: client.config_exists().await?,
        trakt: client.trakt_health().await?,
    };

    match format {
        OutputFormat::Json => print_json(&output)?,
        OutputFormat::Text => println!("{}", format_status(&output)),
    }
    Ok(())
}

pub fn format_libraries(libraries: &[Library]) -> String {
    if libraries.is_empty() {
        return "No libraries found".to_string();
    }
    libraries
        .iter()
        .map(|lib| format!("{:<30}{}", lib.title, lib.kind))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Execute the libraries command
pub async fn libraries(config: &AppConfig, format: OutputFormat) -> Result<()> {
    let client = connect(config).await?;
    let libraries = client.libraries().await?;

    match format {
        OutputFormat::Json => print_json(&libraries)?,
        OutputFormat::Text => println!("{}", format_libraries(&libraries)),
    }
    Ok(())
}
