//! In-memory record store.
//!
//! `RecordStore` holds one [`FlatStatRecord`] per `(player_puuid, match_id)`
//! in insertion order. Inserting a key that is already present leaves the
//! stored record untouched and reports `false`, so re-running a batch over
//! the same matches never produces duplicate rows.
//!
//! The store itself is not `Sync`; the pipeline shares it as
//! `Arc<RwLock<RecordStore>>`.

use std::collections::HashSet;
use std::io::{self, Write};

use crate::role_metrics::extractor::FlatStatRecord;
use crate::role_metrics::timeline::MatchAnalytics;

#[derive(Debug, Default)]
pub struct RecordStore {
    records: Vec<FlatStatRecord>,
    keys: HashSet<(String, String)>,
    analytics: Vec<MatchAnalytics>,
    analytics_keys: HashSet<(String, String)>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record unless its key is already stored.
    pub fn insert(&mut self, record: FlatStatRecord) -> bool {
        if !self.keys.insert(record.key()) {
            return false;
        }
        self.records.push(record);
        true
    }

    /// Insert a per-match analytics summary, keyed like records.
    pub fn insert_analytics(&mut self, analytics: MatchAnalytics) -> bool {
        let key = (analytics.player_puuid.clone(), analytics.match_id.clone());
        if !self.analytics_keys.insert(key) {
            return false;
        }
        self.analytics.push(analytics);
        true
    }

    pub fn contains(&self, player_puuid: &str, match_id: &str) -> bool {
        self.keys
            .contains(&(player_puuid.to_string(), match_id.to_string()))
    }

    pub fn get(&self, player_puuid: &str, match_id: &str) -> Option<&FlatStatRecord> {
        self.records
            .iter()
            .find(|r| r.player_puuid == player_puuid && r.match_id == match_id)
    }

    /// All records, oldest insertion first.
    pub fn records(&self) -> &[FlatStatRecord] {
        &self.records
    }

    pub fn analytics(&self) -> &[MatchAnalytics] {
        &self.analytics
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Write every record as one JSON object per line. Returns the number
    /// of lines written.
    pub fn write_jsonl<W: Write>(&self, writer: &mut W) -> io::Result<usize> {
        for record in &self.records {
            serde_json::to_writer(&mut *writer, record)?;
            writer.write_all(b"\n")?;
        }
        Ok(self.records.len())
    }

    /// Write all analytics summaries as a single JSON array.
    pub fn write_analytics<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        serde_json::to_writer_pretty(&mut *writer, &self.analytics)?;
        writer.write_all(b"\n")
    }
}
