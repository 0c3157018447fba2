//! Batch extraction pipeline.
//!
//! Lists every match a [`MatchSource`] offers, loads and extracts them
//! concurrently (bounded by a semaphore, with the CPU-bound work on the
//! blocking pool), and inserts the results into the shared
//! [`RecordStore`] in match id order. A failing match is logged and
//! counted; it never stops the batch.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{RwLock, Semaphore};
use tokio::task::JoinHandle;

use crate::metrics::AppMetrics;
use crate::role_metrics::calibration::{
    check_landmark, observed_extent, LandmarkCheck, MapExtent, KNOWN_LANDMARKS,
    SUMMONERS_RIFT_EXTENT,
};
use crate::role_metrics::extractor::FlatStatRecord;
use crate::role_metrics::timeline::{scan_participant, MatchAnalytics};
use crate::role_metrics::{MetricsError, Position, RecordExtractor, Timeline};
use crate::services::{MatchBundle, MatchSource, SourceError};
use crate::store::RecordStore;

/// Default number of matches processed concurrently.
pub const DEFAULT_WORKERS: usize = 4;

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub workers: usize,
    /// Restrict extraction to one player.
    pub player_filter: Option<String>,
    /// Also build per-match timeline analytics for each selected player.
    pub collect_analytics: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            player_filter: None,
            collect_analytics: false,
        }
    }
}

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExtractionSummary {
    pub matches_seen: usize,
    pub matches_failed: usize,
    pub records_written: usize,
    pub duplicates_skipped: usize,
    pub participants_skipped: usize,
}

/// Everything extracted from one match, before it reaches the store.
#[derive(Debug, Default)]
pub struct MatchOutcome {
    pub records: Vec<FlatStatRecord>,
    pub analytics: Vec<MatchAnalytics>,
    pub participants_skipped: usize,
    pub had_timeline: bool,
}

/// Extract records for every selected participant of one match.
///
/// Pure apart from logging; runs on the blocking pool.
pub fn process_match(
    bundle: &MatchBundle,
    extractor: &RecordExtractor,
    options: &PipelineOptions,
) -> MatchOutcome {
    let summary = &bundle.summary;
    let timeline: Option<&Timeline> = bundle.timeline.as_ref();
    let mut outcome = MatchOutcome {
        had_timeline: timeline.is_some(),
        ..MatchOutcome::default()
    };

    for participant in &summary.info.participants {
        if let Some(puuid) = &options.player_filter {
            if participant.puuid != *puuid {
                continue;
            }
        }

        if participant.puuid.is_empty() {
            tracing::warn!(
                "Participant {} in {} has no player id; skipping",
                participant.participant_id,
                summary.match_id()
            );
            outcome.participants_skipped += 1;
            continue;
        }

        if participant.participant_id == 0 {
            tracing::warn!(
                "Participant {} in {} has no participant id; skipping",
                participant.puuid,
                summary.match_id()
            );
            outcome.participants_skipped += 1;
            continue;
        }

        let role = participant.role();
        if role.is_none() {
            tracing::debug!(
                "No recognizable position for {} in {}",
                participant.puuid,
                summary.match_id()
            );
        }

        match extractor.extract(summary, timeline, participant.participant_id, role) {
            Ok(record) => outcome.records.push(record),
            Err(err @ MetricsError::ParticipantNotFound { .. }) => {
                tracing::warn!("{}", err);
                outcome.participants_skipped += 1;
                continue;
            }
            Err(err) => {
                tracing::error!("Extraction failed in {}: {}", summary.match_id(), err);
                outcome.participants_skipped += 1;
                continue;
            }
        }

        if options.collect_analytics {
            if let Some(timeline) = timeline {
                match scan_participant(summary, timeline, participant.participant_id) {
                    Ok(analytics) => outcome.analytics.push(analytics),
                    Err(err) => tracing::warn!("Analytics skipped: {}", err),
                }
            }
        }
    }

    outcome
}

/// Load one match and extract it. Extracted for testability.
async fn load_and_process(
    source: Arc<dyn MatchSource + Send + Sync>,
    extractor: Arc<RecordExtractor>,
    options: Arc<PipelineOptions>,
    permits: Arc<Semaphore>,
    metrics: Arc<AppMetrics>,
    match_id: String,
) -> Result<MatchOutcome, String> {
    let _permit = permits
        .acquire_owned()
        .await
        .map_err(|err| err.to_string())?;

    let bundle = source
        .load_match(&match_id)
        .await
        .map_err(|err| err.to_string())?;

    let timer = metrics.extraction_duration.start_timer();
    let outcome =
        tokio::task::spawn_blocking(move || process_match(&bundle, &extractor, &options))
            .await
            .map_err(|err| format!("extraction task failed: {}", err))?;
    timer.observe_duration();

    Ok(outcome)
}

/// Run the extraction pipeline over every match in `source`.
///
/// Only listing the source can fail the run as a whole.
pub async fn run_extraction(
    source: Arc<dyn MatchSource + Send + Sync>,
    extractor: Arc<RecordExtractor>,
    store: Arc<RwLock<RecordStore>>,
    metrics: Arc<AppMetrics>,
    options: PipelineOptions,
) -> Result<ExtractionSummary, SourceError> {
    let match_ids = source.list_match_ids().await?;
    let workers = options.workers.max(1);

    tracing::info!(
        "Extraction started: {} matches from {} ({} workers)",
        match_ids.len(),
        source.source_name(),
        workers
    );

    let permits = Arc::new(Semaphore::new(workers));
    let options = Arc::new(options);

    let tasks: Vec<(String, JoinHandle<Result<MatchOutcome, String>>)> = match_ids
        .into_iter()
        .map(|match_id| {
            let task = tokio::spawn(load_and_process(
                source.clone(),
                extractor.clone(),
                options.clone(),
                permits.clone(),
                metrics.clone(),
                match_id.clone(),
            ));
            (match_id, task)
        })
        .collect();

    let mut summary = ExtractionSummary {
        matches_seen: tasks.len(),
        ..ExtractionSummary::default()
    };

    for (match_id, task) in tasks {
        let outcome = match task.await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(err)) => {
                tracing::error!("Skipping match {}: {}", match_id, err);
                summary.matches_failed += 1;
                metrics.match_failures_total.inc();
                continue;
            }
            Err(err) => {
                tracing::error!("Skipping match {}: worker panicked: {}", match_id, err);
                summary.matches_failed += 1;
                metrics.match_failures_total.inc();
                continue;
            }
        };

        metrics.matches_processed_total.inc();
        if !outcome.had_timeline {
            metrics.missing_timelines_total.inc();
        }
        summary.participants_skipped += outcome.participants_skipped;
        metrics
            .participants_skipped_total
            .inc_by(outcome.participants_skipped as f64);

        let mut store = store.write().await;
        for record in outcome.records {
            if store.insert(record) {
                summary.records_written += 1;
                metrics.records_extracted_total.inc();
            } else {
                summary.duplicates_skipped += 1;
                metrics.duplicate_records_total.inc();
            }
        }
        for analytics in outcome.analytics {
            store.insert_analytics(analytics);
        }
        tracing::debug!("Store now holds {} records", store.len());
    }

    tracing::info!(
        "Extraction finished: {} matches, {} failed, {} records written, {} duplicates skipped",
        summary.matches_seen,
        summary.matches_failed,
        summary.records_written,
        summary.duplicates_skipped
    );

    Ok(summary)
}

/// Result of checking every known landmark against a batch of timelines.
#[derive(Debug, Clone, Serialize)]
pub struct CalibrationReport {
    pub timelines: usize,
    pub checks: Vec<LandmarkCheck>,
    /// Landmarks no event located.
    pub unlocated: Vec<&'static str>,
    pub extent: Option<MapExtent>,
    pub extent_within_map: bool,
}

impl CalibrationReport {
    pub fn all_within_tolerance(&self) -> bool {
        self.extent_within_map && self.checks.iter().all(|check| check.within_tolerance)
    }
}

/// Check the known landmarks against every timeline in `source`.
pub async fn run_calibration(
    source: Arc<dyn MatchSource + Send + Sync>,
) -> Result<CalibrationReport, SourceError> {
    let mut timelines = Vec::new();
    for match_id in source.list_match_ids().await? {
        match source.load_match(&match_id).await {
            Ok(MatchBundle {
                timeline: Some(timeline),
                ..
            }) => timelines.push(timeline),
            Ok(_) => tracing::debug!("{} has no timeline", match_id),
            Err(err) => tracing::warn!("Skipping match {}: {}", match_id, err),
        }
    }

    let mut checks = Vec::new();
    let mut unlocated = Vec::new();
    for landmark in &KNOWN_LANDMARKS {
        match check_landmark(&timelines, landmark) {
            Ok(check) => checks.push(check),
            Err(err) => {
                tracing::debug!("{}", err);
                unlocated.push(landmark.name);
            }
        }
    }

    let extent = observed_extent(&timelines);
    let extent_within_map = extent
        .map(|e| SUMMONERS_RIFT_EXTENT.contains(Position::new(e.width, e.height)))
        .unwrap_or(true);

    Ok(CalibrationReport {
        timelines: timelines.len(),
        checks,
        unlocated,
        extent,
        extent_within_map,
    })
}
