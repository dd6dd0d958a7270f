//! Error types for ticketbot.

/// Top-level error type for the bot.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    #[error("Tracker error: {0}")]
    Tracker(#[from] TrackerError),

    #[error("Submission error: {0}")]
    Pipeline(#[from] PipelineError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Chat-channel errors.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("Channel {name} failed to start: {reason}")]
    StartupFailed { name: String, reason: String },

    #[error("Failed to send reply on channel {name}: {reason}")]
    SendFailed { name: String, reason: String },
}

/// Task-tracker API errors.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Tracker API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Invalid tracker response: {0}")]
    InvalidResponse(String),
}

/// Task submission pipeline errors.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("No task list configured for channel {channel}")]
    UnconfiguredChannel { channel: String },

    #[error("Tracker error: {0}")]
    Tracker(#[from] TrackerError),
}

/// Result type alias for the bot.
pub type Result<T> = std::result::Result<T, Error>;
