//! Role Metrics Module
//!
//! Derives role-specific skill metrics from a completed match summary and
//! its optional event timeline. Everything in here is a pure function of
//! its inputs: no I/O, no shared state, no environment lookups.

pub mod calculator;
pub mod calibration;
pub mod config;
pub mod detector;
pub mod error;
pub mod extractor;
pub mod geometry;
pub mod lenient;
pub mod profiler;
pub mod season;
pub mod timeline;
pub mod types;


pub use calculator::RoleMetricCalculator;
pub use config::MetricsConfig;
pub use detector::RoamingDetector;
pub use error::MetricsError;
pub use extractor::{FlatStatRecord, RecordExtractor};
pub use geometry::{Position, Side, Zone, ZoneGeometry};
pub use profiler::ZoneOccupancyProfiler;
pub use types::*;
