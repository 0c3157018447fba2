use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Rift Metrics CLI arguments
#[derive(Debug, Parser)]
#[command(
    name = "rift-metrics",
    version,
    about = "Role-specific performance metrics from match and timeline payloads"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract one flat stat record per player per match
    Extract(ExtractArgs),
    /// Check map landmarks against the timelines in a directory
    Calibrate(CalibrateArgs),
}

#[derive(Debug, Args)]
pub struct ExtractArgs {
    /// Directory of `<match_id>.json` and `<match_id>.timeline.json` files
    #[arg(long)]
    pub matches_dir: Option<PathBuf>,

    /// JSON-lines output file (stdout when omitted)
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Matches processed concurrently
    #[arg(long)]
    pub workers: Option<usize>,

    /// Only extract records for this player
    #[arg(long)]
    pub puuid: Option<String>,

    /// Write Prometheus text-format counters to this file
    #[arg(long)]
    pub metrics_out: Option<PathBuf>,

    /// Write per-match timeline analytics to this file as a JSON array
    #[arg(long)]
    pub analytics_out: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct CalibrateArgs {
    /// Directory of `<match_id>.timeline.json` files
    #[arg(long)]
    pub matches_dir: Option<PathBuf>,
}
