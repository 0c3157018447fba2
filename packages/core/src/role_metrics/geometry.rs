//! Field geometry: positions, team sides, and the coarse zone classifier.
//!
//! The classifier is a quadrant heuristic tuned for Summoner's Rift, not a
//! polygon geofence. Every threshold lives in [`ZoneGeometry`] or
//! [`LaneBoxes`] so a corrected map calibration can be passed in without
//! touching the algorithms.

use serde::{Deserialize, Serialize};

use crate::role_metrics::lenient;
use crate::role_metrics::types::Role;

/// A point on the field in native map units (roughly 0..15000 per axis).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    #[serde(default, deserialize_with = "lenient::i32")]
    pub x: i32,
    #[serde(default, deserialize_with = "lenient::i32")]
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// `(0, 0)` marks a snapshot with no position data.
    pub fn is_sentinel(&self) -> bool {
        self.x == 0 && self.y == 0
    }
}

/// Which half of the field a participant's team starts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Side A: team 100, base in the low-x/low-y corner.
    Blue,
    /// Side B: team 200, base in the high-x/high-y corner.
    Red,
}

impl Side {
    pub fn from_team_id(team_id: u32) -> Option<Self> {
        match team_id {
            100 => Some(Side::Blue),
            200 => Some(Side::Red),
            _ => None,
        }
    }

    /// Fallback when the payload carries no team id: slots 1-5 are blue.
    pub fn from_participant_id(participant_id: u32) -> Self {
        if participant_id <= 5 {
            Side::Blue
        } else {
            Side::Red
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Side::Blue => Side::Red,
            Side::Red => Side::Blue,
        }
    }
}

/// Coarse field zone, relative to the subject's side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Zone {
    #[serde(rename = "river")]
    NeutralCorridor,
    #[serde(rename = "friendly_jungle")]
    FriendlyTerritory,
    #[serde(rename = "enemy_jungle")]
    EnemyTerritory,
    #[serde(rename = "lanes")]
    Lane,
}

impl Zone {
    pub const ALL: [Zone; 4] = [
        Zone::FriendlyTerritory,
        Zone::EnemyTerritory,
        Zone::Lane,
        Zone::NeutralCorridor,
    ];
}

/// Calibration constants for [`ZoneGeometry::classify`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneGeometry {
    /// Positions with `|y - x|` below this are in the river corridor.
    pub corridor_half_width: i32,
    /// Upper x bound of the blue jungle quadrant and upper y bound of the red one.
    pub low_edge: i32,
    /// Lower y bound of the blue jungle quadrant and lower x bound of the red one.
    pub high_edge: i32,
}

impl Default for ZoneGeometry {
    fn default() -> Self {
        Self {
            corridor_half_width: 2000,
            low_edge: 6000,
            high_edge: 8000,
        }
    }
}

impl ZoneGeometry {
    /// Classify a position for a participant playing on `side`.
    ///
    /// The corridor test runs first and ignores side. Callers must drop
    /// sentinel `(0, 0)` positions beforehand; they would otherwise land in
    /// the corridor.
    pub fn classify(&self, position: Position, side: Side) -> Zone {
        let corridor_distance = (position.y - position.x).abs();
        if corridor_distance < self.corridor_half_width {
            return Zone::NeutralCorridor;
        }

        let in_blue_quadrant = position.x < self.low_edge && position.y > self.high_edge;
        let in_red_quadrant = position.x > self.high_edge && position.y < self.low_edge;

        let (friendly, enemy) = match side {
            Side::Blue => (in_blue_quadrant, in_red_quadrant),
            Side::Red => (in_red_quadrant, in_blue_quadrant),
        };

        if friendly {
            Zone::FriendlyTerritory
        } else if enemy {
            Zone::EnemyTerritory
        } else {
            Zone::Lane
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.corridor_half_width <= 0 {
            return Err("corridor_half_width must be positive".to_string());
        }
        if self.low_edge > self.high_edge {
            return Err(format!(
                "low_edge ({}) must not exceed high_edge ({})",
                self.low_edge, self.high_edge
            ));
        }
        Ok(())
    }
}

/// Classify with the default calibration.
pub fn classify(x: i32, y: i32, side: Side) -> Zone {
    ZoneGeometry::default().classify(Position::new(x, y), side)
}

/// Inclusive rectangle approximating one role's lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaneBox {
    pub x_min: i32,
    pub x_max: i32,
    pub y_min: i32,
    pub y_max: i32,
}

impl LaneBox {
    pub const fn new(x_min: i32, x_max: i32, y_min: i32, y_max: i32) -> Self {
        Self { x_min, x_max, y_min, y_max }
    }

    pub fn contains(&self, position: Position) -> bool {
        (self.x_min..=self.x_max).contains(&position.x)
            && (self.y_min..=self.y_max).contains(&position.y)
    }
}

/// Per-role lane rectangles used for roam detection.
///
/// Jungle has no box: roaming is not a meaningful signal for a role that
/// is expected to range across the whole map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaneBoxes {
    pub top: Option<LaneBox>,
    pub mid: Option<LaneBox>,
    pub adc: Option<LaneBox>,
    pub support: Option<LaneBox>,
}

impl Default for LaneBoxes {
    fn default() -> Self {
        Self {
            top: Some(LaneBox::new(0, 4000, 0, 6000)),
            mid: Some(LaneBox::new(4000, 10000, 4000, 10000)),
            adc: Some(LaneBox::new(10000, 15000, 9000, 15000)),
            support: Some(LaneBox::new(10000, 15000, 9000, 15000)),
        }
    }
}

impl LaneBoxes {
    pub fn for_role(&self, role: Role) -> Option<&LaneBox> {
        match role {
            Role::Top => self.top.as_ref(),
            Role::Jungle => None,
            Role::Mid => self.mid.as_ref(),
            Role::Adc => self.adc.as_ref(),
            Role::Support => self.support.as_ref(),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        for role in Role::ALL {
            if let Some(lane) = self.for_role(role) {
                if lane.x_min > lane.x_max || lane.y_min > lane.y_max {
                    return Err(format!("lane box for {} is inverted", role));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagonal_is_corridor_for_both_sides() {
        assert_eq!(classify(7000, 7500, Side::Blue), Zone::NeutralCorridor);
        assert_eq!(classify(7000, 7500, Side::Red), Zone::NeutralCorridor);
    }

    #[test]
    fn corridor_boundary_is_exclusive() {
        assert_eq!(classify(3000, 5000, Side::Blue), Zone::Lane);
        assert_eq!(classify(3000, 4999, Side::Blue), Zone::NeutralCorridor);
    }

    #[test]
    fn blue_quadrant_is_friendly_for_blue_and_enemy_for_red() {
        assert_eq!(classify(3000, 11000, Side::Blue), Zone::FriendlyTerritory);
        assert_eq!(classify(3000, 11000, Side::Red), Zone::EnemyTerritory);
    }

    #[test]
    fn red_quadrant_is_friendly_for_red() {
        assert_eq!(classify(11000, 3000, Side::Red), Zone::FriendlyTerritory);
        assert_eq!(classify(11000, 3000, Side::Blue), Zone::EnemyTerritory);
    }

    #[test]
    fn off_quadrant_positions_are_lane() {
        assert_eq!(classify(2000, 7000, Side::Blue), Zone::Lane);
        assert_eq!(classify(13000, 9000, Side::Blue), Zone::Lane);
        assert_eq!(classify(500, 4000, Side::Red), Zone::Lane);
    }

    #[test]
    fn sentinel_would_classify_as_corridor() {
        assert!(Position::new(0, 0).is_sentinel());
        assert_eq!(classify(0, 0, Side::Blue), Zone::NeutralCorridor);
    }

    #[test]
    fn side_from_team_id_and_slot() {
        assert_eq!(Side::from_team_id(100), Some(Side::Blue));
        assert_eq!(Side::from_team_id(200), Some(Side::Red));
        assert_eq!(Side::from_team_id(0), None);
        assert_eq!(Side::from_participant_id(5), Side::Blue);
        assert_eq!(Side::from_participant_id(6), Side::Red);
        assert_eq!(Side::Blue.opposite(), Side::Red);
    }

    #[test]
    fn lane_box_bounds_are_inclusive() {
        let lane = LaneBox::new(10000, 15000, 9000, 15000);
        assert!(lane.contains(Position::new(10000, 9000)));
        assert!(lane.contains(Position::new(15000, 15000)));
        assert!(!lane.contains(Position::new(9999, 12000)));
    }

    #[test]
    fn jungle_has_no_lane_box() {
        assert!(LaneBoxes::default().for_role(Role::Jungle).is_none());
        assert!(LaneBoxes::default().for_role(Role::Support).is_some());
    }

    #[test]
    fn configured_jungle_box_is_ignored() {
        let lanes: LaneBoxes = serde_json::from_str(
            r#"{"jungle": {"x_min": 0, "x_max": 15000, "y_min": 0, "y_max": 15000}}"#,
        )
        .unwrap();
        assert!(lanes.for_role(Role::Jungle).is_none());
        assert_eq!(lanes.for_role(Role::Mid), LaneBoxes::default().for_role(Role::Mid));
    }

    #[test]
    fn custom_geometry_moves_the_corridor() {
        let geometry = ZoneGeometry {
            corridor_half_width: 500,
            ..ZoneGeometry::default()
        };
        assert_eq!(geometry.classify(Position::new(7000, 7800), Side::Blue), Zone::Lane);
    }

    #[test]
    fn inverted_geometry_is_rejected() {
        let geometry = ZoneGeometry {
            low_edge: 9000,
            high_edge: 8000,
            ..ZoneGeometry::default()
        };
        assert!(geometry.validate().is_err());
        assert!(ZoneGeometry::default().validate().is_ok());
    }
}
