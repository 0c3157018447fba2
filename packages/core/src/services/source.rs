//! Match Data Source Interface
//!
//! Abstraction over where match payloads come from, so the batch pipeline
//! can run against a directory on disk or an in-memory fixture alike.

use async_trait::async_trait;
use thiserror::Error;

use crate::role_metrics::{MatchSummary, Timeline};

/// Errors from match data sources
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },

    #[error("Malformed payload in {path}: {message}")]
    Parse { path: String, message: String },

    #[error("Match not found: {match_id}")]
    NotFound { match_id: String },
}

impl SourceError {
    pub fn io(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Io {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn parse(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn not_found(match_id: impl Into<String>) -> Self {
        Self::NotFound {
            match_id: match_id.into(),
        }
    }
}

/// A match summary and, when one was captured, its timeline.
#[derive(Debug, Clone, Default)]
pub struct MatchBundle {
    pub summary: MatchSummary,
    pub timeline: Option<Timeline>,
}

/// Trait for match data sources
#[async_trait]
pub trait MatchSource {
    /// Every match id the source can load, in a stable order.
    async fn list_match_ids(&self) -> Result<Vec<String>, SourceError>;

    /// Load one match. A missing timeline is not an error.
    async fn load_match(&self, match_id: &str) -> Result<MatchBundle, SourceError>;

    /// Name of this source for logging
    fn source_name(&self) -> &str;
}
