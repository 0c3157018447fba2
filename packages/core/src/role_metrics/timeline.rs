//! Timeline scanning: the per-participant slice of a match timeline.
//!
//! Everything here is a single forward pass over the frames. The roaming
//! detector consumes [`kill_participations`], the zone profiler consumes
//! [`position_samples`], and [`scan_participant`] builds the full
//! per-match analytics summary for one player.

use serde::Serialize;

use crate::role_metrics::{
    error::MetricsError,
    geometry::Position,
    types::{
        BuildingKillEvent, ChampionKillEvent, EliteMonsterKillEvent, MatchSummary, Timeline,
        TimelineEvent,
    },
};

/// Position timeline sampling period in the analytics summary.
pub const POSITION_TIMELINE_INTERVAL_MS: i64 = 300_000;

/// One valid position snapshot for a participant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PositionSample {
    pub timestamp: i64,
    pub x: i32,
    pub y: i32,
    pub level: i64,
    pub total_gold: i64,
    pub current_gold: i64,
    pub cs: i64,
    pub jungle_cs: i64,
}

impl PositionSample {
    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }
}

/// How a participant was involved in a champion kill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Involvement {
    Death,
    Kill,
    Assist,
}

#[derive(Debug, Clone, Copy)]
pub struct KillParticipation<'a> {
    pub involvement: Involvement,
    pub event: &'a ChampionKillEvent,
}

impl KillParticipation<'_> {
    /// Kill or assist; deaths do not count toward takedowns.
    pub fn is_takedown(&self) -> bool {
        self.involvement != Involvement::Death
    }
}

fn involvement(event: &ChampionKillEvent, participant_id: u32) -> Option<Involvement> {
    if participant_id == 0 {
        None
    } else if event.victim_id == participant_id {
        Some(Involvement::Death)
    } else if event.killer_id == participant_id {
        Some(Involvement::Kill)
    } else if event.assisting_participant_ids.contains(&participant_id) {
        Some(Involvement::Assist)
    } else {
        None
    }
}

/// Every champion kill the participant died in, scored, or assisted, in
/// timeline order.
pub fn kill_participations(
    timeline: &Timeline,
    participant_id: u32,
) -> impl Iterator<Item = KillParticipation<'_>> {
    timeline.events().filter_map(move |event| match event {
        TimelineEvent::ChampionKill(kill) => {
            involvement(kill, participant_id).map(|involvement| KillParticipation {
                involvement,
                event: kill,
            })
        }
        _ => None,
    })
}

/// Valid position snapshots for a participant. Frames without a snapshot,
/// without a position, or with the `(0, 0)` sentinel are skipped.
pub fn position_samples(
    timeline: &Timeline,
    participant_id: u32,
) -> impl Iterator<Item = PositionSample> + '_ {
    timeline.frames().iter().filter_map(move |frame| {
        let snapshot = frame.participant_frame(participant_id)?;
        let position = snapshot.position.filter(|p| !p.is_sentinel())?;
        Some(PositionSample {
            timestamp: frame.timestamp,
            x: position.x,
            y: position.y,
            level: snapshot.level,
            total_gold: snapshot.total_gold,
            current_gold: snapshot.current_gold,
            cs: snapshot.minions_killed,
            jungle_cs: snapshot.jungle_minions_killed,
        })
    })
}

pub fn elite_monster_kills(timeline: &Timeline) -> impl Iterator<Item = &EliteMonsterKillEvent> {
    timeline.events().filter_map(|event| match event {
        TimelineEvent::EliteMonsterKill(kill) => Some(kill),
        _ => None,
    })
}

pub fn building_kills(timeline: &Timeline) -> impl Iterator<Item = &BuildingKillEvent> {
    timeline.events().filter_map(|event| match event {
        TimelineEvent::BuildingKill(kill) => Some(kill),
        _ => None,
    })
}

// =============================================================================
// Per-match analytics summary
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeathRecord {
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub timestamp: i64,
    pub killer_champion: String,
    pub assisting_champions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KillRecord {
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub timestamp: i64,
    pub victim_champion: String,
    pub assisting_champions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssistRecord {
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub timestamp: i64,
    pub killer_champion: String,
    pub victim_champion: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonsterKillRecord {
    #[serde(rename = "type")]
    pub monster_type: String,
    pub subtype: Option<String>,
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildingKillRecord {
    #[serde(rename = "type")]
    pub building_type: String,
    pub lane: Option<String>,
    pub tower_type: Option<String>,
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub timestamp: i64,
}

/// Condensed timeline analytics for one player in one match.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchAnalytics {
    pub match_id: String,
    pub player_puuid: String,
    pub participant_id: u32,
    pub queue_id: Option<i64>,
    pub deaths: Vec<DeathRecord>,
    pub kills: Vec<KillRecord>,
    pub assists: Vec<AssistRecord>,
    pub elite_monster_kills: Vec<MonsterKillRecord>,
    pub building_kills: Vec<BuildingKillRecord>,
    pub position_timeline: Vec<PositionSample>,
}

fn coords(position: Option<Position>) -> (Option<i32>, Option<i32>) {
    match position {
        Some(p) => (Some(p.x), Some(p.y)),
        None => (None, None),
    }
}

fn champion_names(summary: &MatchSummary, ids: &[u32]) -> Vec<String> {
    ids.iter()
        .map(|id| summary.champion_name(*id).to_string())
        .collect()
}

/// Build the analytics summary for `participant_id`.
pub fn scan_participant(
    summary: &MatchSummary,
    timeline: &Timeline,
    participant_id: u32,
) -> Result<MatchAnalytics, MetricsError> {
    let participant = summary
        .participant(participant_id)
        .ok_or_else(|| MetricsError::participant_not_found(summary.match_id(), participant_id))?;

    let mut analytics = MatchAnalytics {
        match_id: summary.match_id().to_string(),
        player_puuid: participant.puuid.clone(),
        participant_id,
        queue_id: summary.info.queue_id,
        deaths: Vec::new(),
        kills: Vec::new(),
        assists: Vec::new(),
        elite_monster_kills: Vec::new(),
        building_kills: Vec::new(),
        position_timeline: Vec::new(),
    };

    for participation in kill_participations(timeline, participant_id) {
        let event = participation.event;
        let (x, y) = coords(event.position);
        match participation.involvement {
            Involvement::Death => analytics.deaths.push(DeathRecord {
                x,
                y,
                timestamp: event.timestamp,
                killer_champion: summary.champion_name(event.killer_id).to_string(),
                assisting_champions: champion_names(summary, &event.assisting_participant_ids),
            }),
            Involvement::Kill => analytics.kills.push(KillRecord {
                x,
                y,
                timestamp: event.timestamp,
                victim_champion: summary.champion_name(event.victim_id).to_string(),
                assisting_champions: champion_names(summary, &event.assisting_participant_ids),
            }),
            Involvement::Assist => analytics.assists.push(AssistRecord {
                x,
                y,
                timestamp: event.timestamp,
                killer_champion: summary.champion_name(event.killer_id).to_string(),
                victim_champion: summary.champion_name(event.victim_id).to_string(),
            }),
        }
    }

    analytics.elite_monster_kills = elite_monster_kills(timeline)
        .filter(|kill| kill.killer_id == participant_id)
        .map(|kill| {
            let (x, y) = coords(kill.position);
            MonsterKillRecord {
                monster_type: kill.monster_type.clone(),
                subtype: kill.monster_sub_type.clone(),
                x,
                y,
                timestamp: kill.timestamp,
            }
        })
        .collect();

    analytics.building_kills = building_kills(timeline)
        .filter(|kill| kill.killer_id == participant_id)
        .map(|kill| {
            let (x, y) = coords(kill.position);
            BuildingKillRecord {
                building_type: kill.building_type.clone(),
                lane: kill.lane_type.clone(),
                tower_type: kill.tower_type.clone(),
                x,
                y,
                timestamp: kill.timestamp,
            }
        })
        .collect();

    analytics.position_timeline = position_samples(timeline, participant_id)
        .filter(|sample| sample.timestamp % POSITION_TIMELINE_INTERVAL_MS == 0)
        .collect();

    Ok(analytics)
}
