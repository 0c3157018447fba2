//! Map calibration checks against known landmarks.
//!
//! The zone thresholds are empirical. These checks average where
//! objectives actually die in real timelines and compare the result with
//! known landmark coordinates, which validates the coordinate system the
//! thresholds assume.

use serde::Serialize;

use crate::role_metrics::{
    error::MetricsError,
    geometry::Position,
    timeline::{building_kills, elite_monster_kills},
    types::{Timeline, TimelineEvent},
};

/// Which events locate a landmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LandmarkSource {
    /// Elite monster kills of this `monsterType`.
    Monster(&'static str),
    /// Building kills of this tower, owned by `team_id`.
    Tower {
        team_id: u32,
        lane: &'static str,
        tower_type: &'static str,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Landmark {
    pub name: &'static str,
    pub source: LandmarkSource,
    pub expected: Position,
    pub tolerance: i32,
}

pub const BARON_NASHOR: Landmark = Landmark {
    name: "Baron Nashor",
    source: LandmarkSource::Monster("BARON_NASHOR"),
    expected: Position::new(5200, 10200),
    tolerance: 500,
};

pub const DRAGON: Landmark = Landmark {
    name: "Dragon",
    source: LandmarkSource::Monster("DRAGON"),
    expected: Position::new(9800, 4400),
    tolerance: 500,
};

pub const KNOWN_LANDMARKS: [Landmark; 5] = [
    BARON_NASHOR,
    DRAGON,
    Landmark {
        name: "Blue Bot Outer Tower",
        source: LandmarkSource::Tower {
            team_id: 100,
            lane: "BOT_LANE",
            tower_type: "OUTER_TURRET",
        },
        expected: Position::new(10504, 1029),
        tolerance: 100,
    },
    Landmark {
        name: "Blue Mid Outer Tower",
        source: LandmarkSource::Tower {
            team_id: 100,
            lane: "MID_LANE",
            tower_type: "OUTER_TURRET",
        },
        expected: Position::new(5846, 6396),
        tolerance: 100,
    },
    Landmark {
        name: "Red Top Outer Tower",
        source: LandmarkSource::Tower {
            team_id: 200,
            lane: "TOP_LANE",
            tower_type: "OUTER_TURRET",
        },
        expected: Position::new(4318, 13875),
        tolerance: 200,
    },
];

/// Playable extent of the map as observed in real payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MapExtent {
    pub width: i32,
    pub height: i32,
}

pub const SUMMONERS_RIFT_EXTENT: MapExtent = MapExtent {
    width: 14870,
    height: 14980,
};

impl MapExtent {
    pub fn contains(&self, position: Position) -> bool {
        (0..=self.width).contains(&position.x) && (0..=self.height).contains(&position.y)
    }
}

/// Outcome of comparing observed positions with a landmark.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LandmarkCheck {
    pub landmark: &'static str,
    pub samples: usize,
    pub average_x: f64,
    pub average_y: f64,
    pub diff_x: f64,
    pub diff_y: f64,
    pub within_tolerance: bool,
}

fn landmark_positions(timeline: &Timeline, source: LandmarkSource) -> Vec<Position> {
    match source {
        LandmarkSource::Monster(monster_type) => elite_monster_kills(timeline)
            .filter(|kill| kill.monster_type == monster_type)
            .filter_map(|kill| kill.position)
            .collect(),
        LandmarkSource::Tower {
            team_id,
            lane,
            tower_type,
        } => building_kills(timeline)
            .filter(|kill| kill.team_id == team_id)
            .filter(|kill| kill.lane_type.as_deref() == Some(lane))
            .filter(|kill| kill.tower_type.as_deref() == Some(tower_type))
            .filter_map(|kill| kill.position)
            .collect(),
    }
}

/// Average the landmark's event positions across `timelines` and compare
/// with the expected coordinates.
pub fn check_landmark<'a>(
    timelines: impl IntoIterator<Item = &'a Timeline>,
    landmark: &Landmark,
) -> Result<LandmarkCheck, MetricsError> {
    let positions: Vec<Position> = timelines
        .into_iter()
        .flat_map(|timeline| landmark_positions(timeline, landmark.source))
        .filter(|position| !position.is_sentinel())
        .collect();

    if positions.is_empty() {
        return Err(MetricsError::insufficient_data(format!(
            "no events locate {}",
            landmark.name
        )));
    }

    let samples = positions.len();
    let average_x = positions.iter().map(|p| p.x as f64).sum::<f64>() / samples as f64;
    let average_y = positions.iter().map(|p| p.y as f64).sum::<f64>() / samples as f64;
    let diff_x = (average_x - landmark.expected.x as f64).abs();
    let diff_y = (average_y - landmark.expected.y as f64).abs();
    let tolerance = landmark.tolerance as f64;

    Ok(LandmarkCheck {
        landmark: landmark.name,
        samples,
        average_x,
        average_y,
        diff_x,
        diff_y,
        within_tolerance: diff_x < tolerance && diff_y < tolerance,
    })
}

/// Largest x and y seen across all champion-kill positions.
pub fn observed_extent<'a>(timelines: impl IntoIterator<Item = &'a Timeline>) -> Option<MapExtent> {
    timelines
        .into_iter()
        .flat_map(|timeline| timeline.events())
        .filter_map(|event| match event {
            TimelineEvent::ChampionKill(kill) => kill.position,
            _ => None,
        })
        .filter(|position| !position.is_sentinel())
        .fold(None, |extent: Option<MapExtent>, position| {
            Some(match extent {
                Some(e) => MapExtent {
                    width: e.width.max(position.x),
                    height: e.height.max(position.y),
                },
                None => MapExtent {
                    width: position.x,
                    height: position.y,
                },
            })
        })
}
