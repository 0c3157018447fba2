//! Roaming detection from champion-kill positions

use crate::role_metrics::{
    geometry::LaneBoxes,
    timeline::kill_participations,
    types::{Role, Timeline},
};

/// Counts kill participations that happened outside a role's lane box.
#[derive(Debug, Clone, Default)]
pub struct RoamingDetector {
    lanes: LaneBoxes,
}

impl RoamingDetector {
    pub fn new(lanes: LaneBoxes) -> Self {
        Self { lanes }
    }

    pub fn lanes(&self) -> &LaneBoxes {
        &self.lanes
    }

    /// Number of kills and assists by `participant_id` located outside the
    /// lane box of `role`.
    ///
    /// Roles without a box (jungle) always return 0. Events without a
    /// usable position are not evaluated.
    pub fn roam_count(&self, timeline: &Timeline, participant_id: u32, role: Role) -> u32 {
        let Some(lane) = self.lanes.for_role(role) else {
            return 0;
        };

        kill_participations(timeline, participant_id)
            .filter(|participation| participation.is_takedown())
            .filter_map(|participation| participation.event.position)
            .filter(|position| !position.is_sentinel())
            .filter(|position| !lane.contains(*position))
            .count() as u32
    }
}

/// Roam count with the default lane boxes.
pub fn roam_count(timeline: &Timeline, participant_id: u32, role: Role) -> u32 {
    RoamingDetector::default().roam_count(timeline, participant_id, role)
}
