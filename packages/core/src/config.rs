use std::env;
use std::path::PathBuf;

use crate::pipeline::DEFAULT_WORKERS;
use crate::role_metrics::MetricsConfig;

const DEFAULT_MATCHES_DIR: &str = "data/matches";

#[derive(Debug, Clone)]
pub struct Config {
    pub matches_dir: PathBuf,
    /// JSON-lines output; stdout when `None`.
    pub output: Option<PathBuf>,
    pub workers: usize,
    pub metrics_config: Option<PathBuf>,
    pub player_puuid: Option<String>,
}

fn non_empty(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_workers(raw: Option<&str>) -> Result<usize, String> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_WORKERS);
    };
    let workers = raw
        .trim()
        .parse::<usize>()
        .map_err(|_| "RIFT_WORKERS must be a valid number".to_string())?;
    validate_workers(workers)
}

fn validate_workers(workers: usize) -> Result<usize, String> {
    if workers == 0 {
        return Err("worker count must be at least 1".to_string());
    }
    Ok(workers)
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let matches_dir = non_empty("RIFT_MATCHES_DIR")
            .unwrap_or_else(|| DEFAULT_MATCHES_DIR.to_string())
            .into();

        let workers = parse_workers(non_empty("RIFT_WORKERS").as_deref())?;

        Ok(Self {
            matches_dir,
            output: non_empty("RIFT_OUTPUT").map(PathBuf::from),
            workers,
            metrics_config: non_empty("RIFT_METRICS_CONFIG").map(PathBuf::from),
            player_puuid: non_empty("RIFT_PLAYER_PUUID"),
        })
    }

    /// Apply command-line flags on top of the environment.
    pub fn with_overrides(
        mut self,
        matches_dir: Option<PathBuf>,
        output: Option<PathBuf>,
        workers: Option<usize>,
        player_puuid: Option<String>,
    ) -> Result<Self, String> {
        if let Some(dir) = matches_dir {
            self.matches_dir = dir;
        }
        if output.is_some() {
            self.output = output;
        }
        if let Some(workers) = workers {
            self.workers = validate_workers(workers)?;
        }
        if player_puuid.is_some() {
            self.player_puuid = player_puuid;
        }
        Ok(self)
    }

    /// Metric engine constants: the JSON file named by
    /// `RIFT_METRICS_CONFIG`, or the built-in defaults.
    pub fn load_metrics_config(&self) -> Result<MetricsConfig, String> {
        let Some(path) = &self.metrics_config else {
            return Ok(MetricsConfig::default());
        };

        let raw = std::fs::read_to_string(path)
            .map_err(|err| format!("cannot read {}: {}", path.display(), err))?;
        MetricsConfig::from_json(&raw).map_err(|err| format!("{} ({})", err, path.display()))
    }
}
