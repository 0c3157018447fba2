//! In-memory match source for tests.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::services::source::{MatchBundle, MatchSource, SourceError};

#[derive(Clone)]
enum Entry {
    Bundle(MatchBundle),
    Broken(String),
}

/// Serves pre-built bundles, listed in id order.
#[derive(Clone, Default)]
pub struct MockMatchSource {
    entries: BTreeMap<String, Entry>,
    loads: Arc<AtomicUsize>,
}

impl MockMatchSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_match(mut self, bundle: MatchBundle) -> Self {
        let match_id = bundle.summary.match_id().to_string();
        self.entries.insert(match_id, Entry::Bundle(bundle));
        self
    }

    /// A listed match whose load fails with a parse error.
    pub fn with_broken_match(mut self, match_id: &str, message: &str) -> Self {
        self.entries
            .insert(match_id.to_string(), Entry::Broken(message.to_string()));
        self
    }

    /// Number of `load_match` calls served so far.
    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MatchSource for MockMatchSource {
    async fn list_match_ids(&self) -> Result<Vec<String>, SourceError> {
        Ok(self.entries.keys().cloned().collect())
    }

    async fn load_match(&self, match_id: &str) -> Result<MatchBundle, SourceError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        match self.entries.get(match_id) {
            Some(Entry::Bundle(bundle)) => Ok(bundle.clone()),
            Some(Entry::Broken(message)) => Err(SourceError::parse(match_id, message.clone())),
            None => Err(SourceError::not_found(match_id)),
        }
    }

    fn source_name(&self) -> &str {
        "mock"
    }
}
