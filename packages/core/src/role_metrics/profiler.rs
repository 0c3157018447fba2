//! Zone-occupancy profiling from periodic position snapshots

use crate::role_metrics::{
    error::MetricsError,
    geometry::{Side, Zone, ZoneGeometry},
    timeline::position_samples,
    types::{Timeline, ZoneOccupancy},
};

#[derive(Debug, Default, Clone, Copy)]
struct ZoneCounts {
    friendly_jungle: u32,
    enemy_jungle: u32,
    lanes: u32,
    river: u32,
}

impl ZoneCounts {
    fn record(&mut self, zone: Zone) {
        match zone {
            Zone::FriendlyTerritory => self.friendly_jungle += 1,
            Zone::EnemyTerritory => self.enemy_jungle += 1,
            Zone::Lane => self.lanes += 1,
            Zone::NeutralCorridor => self.river += 1,
        }
    }

    fn total(&self) -> u32 {
        self.friendly_jungle + self.enemy_jungle + self.lanes + self.river
    }

    fn into_occupancy(self) -> ZoneOccupancy {
        let total = self.total() as f64;
        let share = |count: u32| round3(count as f64 / total);
        ZoneOccupancy {
            friendly_jungle: share(self.friendly_jungle),
            enemy_jungle: share(self.enemy_jungle),
            lanes: share(self.lanes),
            river: share(self.river),
        }
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Builds a normalized zone distribution for one participant.
#[derive(Debug, Clone, Default)]
pub struct ZoneOccupancyProfiler {
    geometry: ZoneGeometry,
}

impl ZoneOccupancyProfiler {
    pub fn new(geometry: ZoneGeometry) -> Self {
        Self { geometry }
    }

    pub fn geometry(&self) -> &ZoneGeometry {
        &self.geometry
    }

    /// Share of valid snapshots spent in each zone.
    ///
    /// Returns [`MetricsError::InsufficientData`] when the timeline has no
    /// valid snapshot for the participant, which is distinct from a
    /// profile that is all lanes.
    pub fn occupancy(
        &self,
        timeline: &Timeline,
        participant_id: u32,
        side: Side,
    ) -> Result<ZoneOccupancy, MetricsError> {
        let mut counts = ZoneCounts::default();
        for sample in position_samples(timeline, participant_id) {
            counts.record(self.geometry.classify(sample.position(), side));
        }

        if counts.total() == 0 {
            return Err(MetricsError::insufficient_data(format!(
                "zone occupancy for participant {}",
                participant_id
            )));
        }

        Ok(counts.into_occupancy())
    }
}
