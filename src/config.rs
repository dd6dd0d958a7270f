//! Configuration types.

use secrecy::SecretString;

use crate::error::ConfigError;

/// Default base URL for the ClickUp v2 API.
pub const DEFAULT_TRACKER_BASE_URL: &str = "https://api.clickup.com/api/v2";

/// Default number of simultaneous attachment uploads per submission.
pub const DEFAULT_UPLOAD_BATCH: usize = 3;

/// Bot configuration, read from the environment.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Discord bot token. When absent, only the CLI channel runs.
    pub discord_token: Option<SecretString>,
    /// Task-tracker API token (sent as a bearer-style Authorization header).
    pub tracker_token: SecretString,
    /// Task-tracker API base URL.
    pub tracker_base_url: String,
    /// Upload concurrency cap per submission.
    pub upload_batch: usize,
}

impl BotConfig {
    /// Load configuration from environment variables.
    ///
    /// `CLICKUP_TOKEN` is required; everything else has a default. Tokens are
    /// not validated up front — a bad token surfaces as a downstream call
    /// failure.
    pub fn from_env() -> Result<Self, ConfigError> {
        let tracker_token = std::env::var("CLICKUP_TOKEN")
            .map_err(|_| ConfigError::MissingEnvVar("CLICKUP_TOKEN".into()))?;

        let discord_token = std::env::var("DISCORD_TOKEN").ok().map(SecretString::from);

        let tracker_base_url = std::env::var("CLICKUP_API_BASE")
            .unwrap_or_else(|_| DEFAULT_TRACKER_BASE_URL.to_string());

        let upload_batch = match std::env::var("TICKETBOT_UPLOAD_BATCH") {
            Ok(raw) => raw
                .parse::<usize>()
                .map_err(|e| ConfigError::InvalidValue {
                    key: "TICKETBOT_UPLOAD_BATCH".into(),
                    message: e.to_string(),
                })?
                .max(1),
            Err(_) => DEFAULT_UPLOAD_BATCH,
        };

        Ok(Self {
            discord_token,
            tracker_token: SecretString::from(tracker_token),
            tracker_base_url,
            upload_batch,
        })
    }
}
