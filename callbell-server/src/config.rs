//! Server configuration.
//!
//! Loaded from `~/.config/callbell/config.toml`, or the path in the
//! `CALLBELL_CONFIG` environment variable. Secrets live in the config
//! struct and are passed into state explicitly, so nothing in the request
//! path reads the environment.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;

use callbell_provider_google::GoogleCredentials;
use callbell_provider_twilio::TwilioConfig;

fn default_port() -> u16 {
    4097
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Shared secret the scheduler must present as a bearer token.
    pub cron_secret: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Overrides the platform data directory.
    pub data_dir: Option<PathBuf>,

    pub google: GoogleCredentials,
    pub twilio: TwilioConfig,
}

impl ServerConfig {
    pub fn config_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var("CALLBELL_CONFIG") {
            return Ok(PathBuf::from(path));
        }
        Ok(dirs::config_dir()
            .context("Could not determine config directory")?
            .join("callbell")
            .join("config.toml"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            anyhow::bail!(
                "callbell config not found.\n\n\
                Create {} with:\n\n\
                cron_secret = \"...\"\n\n\
                [google]\n\
                client_id = \"your-client-id.apps.googleusercontent.com\"\n\
                client_secret = \"your-client-secret\"\n\n\
                [twilio]\n\
                account_sid = \"AC...\"\n\
                auth_token = \"...\"\n\
                from_number = \"+15550000000\"",
                path.display()
            );
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let config: ServerConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;

        Ok(config)
    }
}
