//! Prometheus metrics registry for the extraction pipeline.
//!
//! [`AppMetrics`] owns all registered metrics and the [`Registry`] they
//! belong to. Construct it once per run, wrap in `Arc`, and pass it to the
//! pipeline. The binary renders it in Prometheus text exposition format
//! when `--metrics-out` is given, for pickup by a textfile collector.

use prometheus::{Counter, Histogram, HistogramOpts, Opts, Registry};

/// All application-level Prometheus metrics.
pub struct AppMetrics {
    /// Matches loaded and extracted.
    pub matches_processed_total: Counter,
    /// Matches skipped because they could not be loaded or processed.
    pub match_failures_total: Counter,
    /// Records newly inserted into the store.
    pub records_extracted_total: Counter,
    /// Records rejected because their (player, match) key already existed.
    pub duplicate_records_total: Counter,
    /// Participants that produced no record.
    pub participants_skipped_total: Counter,
    /// Matches processed without a timeline.
    pub missing_timelines_total: Counter,
    /// Per-match extraction latency in seconds.
    pub extraction_duration: Histogram,
    /// The registry that owns all of the above metrics.
    pub registry: Registry,
}

impl AppMetrics {
    /// Create and register all metrics. Returns an error if any metric
    /// name is invalid or duplicated.
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let matches_processed_total = Counter::with_opts(Opts::new(
            "rift_metrics_matches_processed_total",
            "Matches loaded and extracted by the pipeline",
        ))?;

        let match_failures_total = Counter::with_opts(Opts::new(
            "rift_metrics_match_failures_total",
            "Matches skipped after a load or processing failure",
        ))?;

        let records_extracted_total = Counter::with_opts(Opts::new(
            "rift_metrics_records_extracted_total",
            "Flat stat records inserted into the store",
        ))?;

        let duplicate_records_total = Counter::with_opts(Opts::new(
            "rift_metrics_duplicate_records_total",
            "Records skipped because the player/match key was already stored",
        ))?;

        let participants_skipped_total = Counter::with_opts(Opts::new(
            "rift_metrics_participants_skipped_total",
            "Participants that produced no record",
        ))?;

        let missing_timelines_total = Counter::with_opts(Opts::new(
            "rift_metrics_missing_timelines_total",
            "Matches processed without a timeline",
        ))?;

        let extraction_duration = Histogram::with_opts(
            HistogramOpts::new(
                "rift_metrics_extraction_duration_seconds",
                "Per-match extraction latency in seconds",
            )
            .buckets(vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5]),
        )?;

        registry.register(Box::new(matches_processed_total.clone()))?;
        registry.register(Box::new(match_failures_total.clone()))?;
        registry.register(Box::new(records_extracted_total.clone()))?;
        registry.register(Box::new(duplicate_records_total.clone()))?;
        registry.register(Box::new(participants_skipped_total.clone()))?;
        registry.register(Box::new(missing_timelines_total.clone()))?;
        registry.register(Box::new(extraction_duration.clone()))?;

        Ok(Self {
            matches_processed_total,
            match_failures_total,
            records_extracted_total,
            duplicate_records_total,
            participants_skipped_total,
            missing_timelines_total,
            extraction_duration,
            registry,
        })
    }

    /// Render all metrics as Prometheus text format.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buf = Vec::new();
        encoder.encode(&metric_families, &mut buf)?;
        Ok(String::from_utf8(buf).unwrap_or_default())
    }
}
