use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::sync::Arc;

use clap::Parser;
use dotenvy::dotenv;
use tokio::sync::RwLock;

use rift_metrics::cli::{CalibrateArgs, Cli, Command, ExtractArgs};
use rift_metrics::config::Config;
use rift_metrics::error::AppError;
use rift_metrics::logging::init_logging;
use rift_metrics::metrics::AppMetrics;
use rift_metrics::pipeline::{run_calibration, run_extraction, PipelineOptions};
use rift_metrics::role_metrics::RecordExtractor;
use rift_metrics::services::{MatchFileSource, MatchSource};
use rift_metrics::store::RecordStore;

#[tokio::main]
async fn main() {
    dotenv().ok();
    init_logging();

    let cli = Cli::parse();

    let config = Config::from_env()
        .map_err(AppError::Config)
        .unwrap_or_else(|err| {
            tracing::error!("{}", err);
            std::process::exit(1);
        });

    let result = match cli.command {
        Command::Extract(args) => extract(config, args).await,
        Command::Calibrate(args) => calibrate(config, args).await,
    };

    if let Err(err) = result {
        tracing::error!("{}", err);
        std::process::exit(1);
    }
}

async fn extract(config: Config, args: ExtractArgs) -> Result<(), AppError> {
    let config = config
        .with_overrides(args.matches_dir, args.output, args.workers, args.puuid)
        .map_err(AppError::Config)?;
    let metrics_config = config.load_metrics_config().map_err(AppError::Config)?;

    tracing::info!("Extracting with config: {:?}", config);

    let source: Arc<dyn MatchSource + Send + Sync> =
        Arc::new(MatchFileSource::new(config.matches_dir.clone()));
    let extractor = Arc::new(RecordExtractor::new(&metrics_config));
    let store = Arc::new(RwLock::new(RecordStore::new()));
    let metrics = Arc::new(AppMetrics::new()?);

    let options = PipelineOptions {
        workers: config.workers,
        player_filter: config.player_puuid.clone(),
        collect_analytics: args.analytics_out.is_some(),
    };

    let summary = run_extraction(source, extractor, store.clone(), metrics.clone(), options).await?;

    let store = store.read().await;
    let written = match &config.output {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            let written = store.write_jsonl(&mut writer)?;
            writer.flush()?;
            written
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            let written = store.write_jsonl(&mut writer)?;
            writer.flush()?;
            written
        }
    };

    if let Some(path) = &args.analytics_out {
        let mut writer = BufWriter::new(File::create(path)?);
        store.write_analytics(&mut writer)?;
        writer.flush()?;
        tracing::info!("Wrote {} analytics summaries to {}", store.analytics().len(), path.display());
    }

    if let Some(path) = &args.metrics_out {
        std::fs::write(path, metrics.render()?)?;
    }

    tracing::info!(
        "Done: {} records written ({} matches, {} failed, {} duplicates, {} participants skipped)",
        written,
        summary.matches_seen,
        summary.matches_failed,
        summary.duplicates_skipped,
        summary.participants_skipped
    );

    Ok(())
}

async fn calibrate(config: Config, args: CalibrateArgs) -> Result<(), AppError> {
    let config = config
        .with_overrides(args.matches_dir, None, None, None)
        .map_err(AppError::Config)?;

    let source: Arc<dyn MatchSource + Send + Sync> =
        Arc::new(MatchFileSource::new(config.matches_dir.clone()));
    let report = run_calibration(source).await?;

    tracing::info!("Calibrating against {} timelines", report.timelines);

    for check in &report.checks {
        let verdict = if check.within_tolerance { "OK" } else { "OFF" };
        tracing::info!(
            "{} {}: average ({:.0}, {:.0}) from {} events, off by ({:.0}, {:.0})",
            verdict,
            check.landmark,
            check.average_x,
            check.average_y,
            check.samples,
            check.diff_x,
            check.diff_y
        );
    }

    for name in &report.unlocated {
        tracing::warn!("No events located {}", name);
    }

    match report.extent {
        Some(extent) if report.extent_within_map => {
            tracing::info!("Observed extent {} x {}", extent.width, extent.height)
        }
        Some(extent) => tracing::warn!(
            "Observed extent {} x {} exceeds the expected map size",
            extent.width,
            extent.height
        ),
        None => tracing::warn!("No champion kill positions to measure the map extent"),
    }

    if !report.all_within_tolerance() {
        tracing::warn!("Calibration found landmarks outside tolerance");
    }

    Ok(())
}
