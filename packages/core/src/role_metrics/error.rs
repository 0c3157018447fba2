//! Error types for role metric derivation

use thiserror::Error;

/// Errors that can occur while deriving metrics for a participant
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MetricsError {
    #[error("Participant {participant_id} not found in match {match_id}")]
    ParticipantNotFound { match_id: String, participant_id: u32 },

    #[error("Insufficient data for calculation: {operation}")]
    InsufficientData { operation: String },

    #[error("Invalid game version: {version:?}")]
    InvalidGameVersion { version: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },
}

impl MetricsError {
    pub fn participant_not_found(match_id: impl Into<String>, participant_id: u32) -> Self {
        Self::ParticipantNotFound {
            match_id: match_id.into(),
            participant_id,
        }
    }

    pub fn insufficient_data(operation: impl Into<String>) -> Self {
        Self::InsufficientData { operation: operation.into() }
    }

    pub fn invalid_game_version(version: impl Into<String>) -> Self {
        Self::InvalidGameVersion { version: version.into() }
    }

    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError { message: message.into() }
    }

    /// `true` for conditions the engine folds into default values
    /// instead of surfacing to the caller.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::ParticipantNotFound { .. })
    }
}
