//! Season / patch / split derivation from the game version string.
//!
//! The split boundaries follow the upstream season calendar and change
//! every year, so [`SplitCalendar`] is configuration rather than a formula.

use serde::{Deserialize, Serialize};

use crate::role_metrics::error::MetricsError;

/// The `season.patch` prefix of a dotted version string such as
/// `"15.22.724.5161"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GameVersion {
    pub season: u32,
    pub patch: u32,
}

impl GameVersion {
    pub fn parse(version: &str) -> Result<Self, MetricsError> {
        let mut parts = version.trim().split('.');
        let season = parts.next().and_then(|s| s.parse::<u32>().ok());
        let patch = parts.next().and_then(|s| s.parse::<u32>().ok());

        match (season, patch) {
            (Some(season), Some(patch)) => Ok(Self { season, patch }),
            _ => Err(MetricsError::invalid_game_version(version)),
        }
    }

    /// `"15.22"`
    pub fn patch_label(&self) -> String {
        format!("{}.{}", self.season, self.patch)
    }
}

/// A split covers every patch up to and including `last_patch`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitRule {
    pub number: u8,
    pub name: String,
    pub last_patch: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitCalendar {
    pub splits: Vec<SplitRule>,
}

impl Default for SplitCalendar {
    fn default() -> Self {
        Self {
            splits: vec![
                SplitRule {
                    number: 1,
                    name: "Welcome to Noxus".to_string(),
                    last_patch: 8,
                },
                SplitRule {
                    number: 2,
                    name: "Spirit Blossom Beyond".to_string(),
                    last_patch: 16,
                },
                SplitRule {
                    number: 3,
                    name: "Trials of Twilight".to_string(),
                    last_patch: u32::MAX,
                },
            ],
        }
    }
}

/// Calendar placement of one match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeasonInfo {
    pub season: u32,
    pub patch: String,
    pub split_number: u8,
    pub split_name: String,
}

impl SplitCalendar {
    /// First split whose `last_patch` covers `patch`; patches past the last
    /// boundary belong to the final split.
    pub fn split_for(&self, patch: u32) -> Option<&SplitRule> {
        self.splits
            .iter()
            .find(|rule| patch <= rule.last_patch)
            .or_else(|| self.splits.last())
    }

    pub fn season_info(&self, version: &str) -> Result<SeasonInfo, MetricsError> {
        let parsed = GameVersion::parse(version)?;
        let split = self
            .split_for(parsed.patch)
            .ok_or_else(|| MetricsError::config_error("split calendar is empty"))?;

        Ok(SeasonInfo {
            season: parsed.season,
            patch: parsed.patch_label(),
            split_number: split.number,
            split_name: split.name.clone(),
        })
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.splits.is_empty() {
            return Err("split calendar must define at least one split".to_string());
        }
        let ascending = self
            .splits
            .windows(2)
            .all(|pair| pair[0].last_patch < pair[1].last_patch);
        if !ascending {
            return Err("split boundaries must be strictly ascending".to_string());
        }
        Ok(())
    }
}
