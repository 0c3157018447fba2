//! Configuration for the role metrics engine

use serde::{Deserialize, Serialize};

use crate::role_metrics::{
    error::MetricsError,
    geometry::{LaneBoxes, ZoneGeometry},
    season::SplitCalendar,
};

/// Tunable constants for metric derivation.
///
/// The defaults are calibrated for one map layout. Every field can be
/// overridden from a JSON document; omitted fields keep their default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub geometry: ZoneGeometry,
    pub lanes: LaneBoxes,
    pub split_calendar: SplitCalendar,
}

impl MetricsConfig {
    pub fn from_json(raw: &str) -> Result<Self, MetricsError> {
        let config: Self = serde_json::from_str(raw)
            .map_err(|err| MetricsError::config_error(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), MetricsError> {
        self.geometry.validate().map_err(MetricsError::config_error)?;
        self.lanes.validate().map_err(MetricsError::config_error)?;
        self.split_calendar
            .validate()
            .map_err(MetricsError::config_error)?;
        Ok(())
    }
}
