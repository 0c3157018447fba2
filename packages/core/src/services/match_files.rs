//! Directory-backed match source.
//!
//! Layout: one `<match_id>.json` summary per match and, optionally, a
//! sibling `<match_id>.timeline.json`. Anything else in the directory is
//! ignored.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tokio::fs;

use crate::role_metrics::{MatchSummary, Timeline};
use crate::services::source::{MatchBundle, MatchSource, SourceError};

const SUMMARY_SUFFIX: &str = ".json";
const TIMELINE_SUFFIX: &str = ".timeline.json";

#[derive(Debug, Clone)]
pub struct MatchFileSource {
    dir: PathBuf,
}

impl MatchFileSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn summary_path(&self, match_id: &str) -> PathBuf {
        self.dir.join(format!("{}{}", match_id, SUMMARY_SUFFIX))
    }

    pub fn timeline_path(&self, match_id: &str) -> PathBuf {
        self.dir.join(format!("{}{}", match_id, TIMELINE_SUFFIX))
    }
}

/// Read and decode a JSON file. `Ok(None)` when the file does not exist.
async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, SourceError> {
    let display = path.display().to_string();

    let raw = match fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(SourceError::io(display, err.to_string())),
    };

    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|err| SourceError::parse(display, err.to_string()))
}

fn match_id_from_file_name(name: &str) -> Option<&str> {
    if name.ends_with(TIMELINE_SUFFIX) {
        return None;
    }
    name.strip_suffix(SUMMARY_SUFFIX)
        .filter(|match_id| !match_id.is_empty())
}

#[async_trait]
impl MatchSource for MatchFileSource {
    async fn list_match_ids(&self) -> Result<Vec<String>, SourceError> {
        let display = self.dir.display().to_string();
        let mut entries = fs::read_dir(&self.dir)
            .await
            .map_err(|err| SourceError::io(display.clone(), err.to_string()))?;

        let mut match_ids = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|err| SourceError::io(display.clone(), err.to_string()))?
        {
            let file_name = entry.file_name();
            if let Some(match_id) = file_name.to_str().and_then(match_id_from_file_name) {
                match_ids.push(match_id.to_string());
            }
        }

        match_ids.sort();
        Ok(match_ids)
    }

    async fn load_match(&self, match_id: &str) -> Result<MatchBundle, SourceError> {
        let summary: MatchSummary = read_json(&self.summary_path(match_id))
            .await?
            .ok_or_else(|| SourceError::not_found(match_id))?;

        let timeline = match read_json::<Timeline>(&self.timeline_path(match_id)).await {
            Ok(timeline) => timeline,
            Err(err) => {
                tracing::warn!("Ignoring timeline for {}: {}", match_id, err);
                None
            }
        };

        Ok(MatchBundle { summary, timeline })
    }

    fn source_name(&self) -> &str {
        "match-files"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, body: &str) {
        std::fs::write(dir.path().join(name), body).unwrap();
    }

    fn summary_body(match_id: &str) -> String {
        json!({
            "metadata": { "matchId": match_id, "participants": ["p1"] },
            "info": {
                "gameDuration": 1500,
                "gameVersion": "15.3.1.1",
                "participants": [{ "participantId": 1, "puuid": "p1", "teamPosition": "TOP" }]
            }
        })
        .to_string()
    }

    #[test]
    fn file_names_map_to_match_ids() {
        assert_eq!(match_id_from_file_name("NA1_1.json"), Some("NA1_1"));
        assert_eq!(match_id_from_file_name("NA1_1.timeline.json"), None);
        assert_eq!(match_id_from_file_name("notes.txt"), None);
        assert_eq!(match_id_from_file_name(".json"), None);
    }

    #[tokio::test]
    async fn lists_summaries_only_in_sorted_order() {
        let dir = TempDir::new().unwrap();
        write(&dir, "NA1_2.json", &summary_body("NA1_2"));
        write(&dir, "NA1_1.json", &summary_body("NA1_1"));
        write(&dir, "NA1_1.timeline.json", "{}");
        write(&dir, "README.md", "ignored");

        let source = MatchFileSource::new(dir.path());
        let ids = source.list_match_ids().await.unwrap();

        assert_eq!(ids, vec!["NA1_1".to_string(), "NA1_2".to_string()]);
    }

    #[tokio::test]
    async fn loads_summary_and_timeline() {
        let dir = TempDir::new().unwrap();
        write(&dir, "NA1_1.json", &summary_body("NA1_1"));
        write(
            &dir,
            "NA1_1.timeline.json",
            &json!({"info": {"frames": [{"timestamp": 0}]}}).to_string(),
        );

        let bundle = MatchFileSource::new(dir.path())
            .load_match("NA1_1")
            .await
            .unwrap();

        assert_eq!(bundle.summary.match_id(), "NA1_1");
        assert_eq!(bundle.timeline.unwrap().frames().len(), 1);
    }

    #[tokio::test]
    async fn missing_timeline_is_not_an_error() {
        let dir = TempDir::new().unwrap();
        write(&dir, "NA1_1.json", &summary_body("NA1_1"));

        let bundle = MatchFileSource::new(dir.path())
            .load_match("NA1_1")
            .await
            .unwrap();

        assert!(bundle.timeline.is_none());
    }

    #[tokio::test]
    async fn malformed_timeline_is_dropped() {
        let dir = TempDir::new().unwrap();
        write(&dir, "NA1_1.json", &summary_body("NA1_1"));
        write(&dir, "NA1_1.timeline.json", "{ not json");

        let bundle = MatchFileSource::new(dir.path())
            .load_match("NA1_1")
            .await
            .unwrap();

        assert!(bundle.timeline.is_none());
    }

    #[tokio::test]
    async fn malformed_summary_is_a_parse_error() {
        let dir = TempDir::new().unwrap();
        write(&dir, "NA1_1.json", "[1, 2, 3]");

        let err = MatchFileSource::new(dir.path())
            .load_match("NA1_1")
            .await
            .unwrap_err();

        assert!(matches!(err, SourceError::Parse { .. }));
    }

    #[tokio::test]
    async fn unknown_match_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = MatchFileSource::new(dir.path())
            .load_match("NA1_404")
            .await
            .unwrap_err();

        assert!(matches!(err, SourceError::NotFound { .. }));
    }

    #[tokio::test]
    async fn missing_directory_is_an_io_error() {
        let dir = TempDir::new().unwrap();
        let source = MatchFileSource::new(dir.path().join("absent"));

        assert!(matches!(
            source.list_match_ids().await,
            Err(SourceError::Io { .. })
        ));
    }
}
