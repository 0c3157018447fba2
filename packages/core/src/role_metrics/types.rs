//! Core data types: match payloads, timeline payloads, roles and metric sets

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::role_metrics::geometry::{Position, Side, Zone};
use crate::role_metrics::lenient;

// =============================================================================
// Match summary
// =============================================================================

/// One completed match as returned by the match endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchSummary {
    pub metadata: MatchMetadata,
    pub info: MatchInfo,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchMetadata {
    pub match_id: String,
    /// Player identifiers in participant order.
    #[serde(default)]
    pub participants: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchInfo {
    /// Match length in seconds.
    #[serde(default, deserialize_with = "lenient::i64")]
    pub game_duration: i64,
    /// Epoch milliseconds.
    #[serde(default, deserialize_with = "lenient::i64")]
    pub game_creation: i64,
    #[serde(default)]
    pub game_version: String,
    #[serde(default)]
    pub queue_id: Option<i64>,
    #[serde(default)]
    pub participants: Vec<Participant>,
}

impl MatchSummary {
    pub fn match_id(&self) -> &str {
        &self.metadata.match_id
    }

    /// Looks up a participant by id. Id 0 is never a participant: upstream
    /// uses it for minion, turret and monster executions.
    pub fn participant(&self, participant_id: u32) -> Option<&Participant> {
        if participant_id == 0 {
            return None;
        }
        self.info
            .participants
            .iter()
            .find(|p| p.participant_id == participant_id)
    }

    pub fn participant_by_puuid(&self, puuid: &str) -> Option<&Participant> {
        self.info.participants.iter().find(|p| p.puuid == puuid)
    }

    pub fn champion_name(&self, participant_id: u32) -> &str {
        self.participant(participant_id)
            .map(|p| p.champion_name.as_str())
            .filter(|name| !name.is_empty())
            .unwrap_or("Unknown")
    }
}

/// One player's performance in one match.
///
/// Counters the engine reads are typed; everything else the payload carries
/// stays in `counters` and is reachable through [`Participant::counter`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    #[serde(default, deserialize_with = "lenient::u32")]
    pub participant_id: u32,
    #[serde(default)]
    pub puuid: String,
    #[serde(default, deserialize_with = "lenient::i64")]
    pub champion_id: i64,
    #[serde(default)]
    pub champion_name: String,
    #[serde(default, deserialize_with = "lenient::u32")]
    pub team_id: u32,
    #[serde(default)]
    pub team_position: String,
    #[serde(default)]
    pub individual_position: String,
    #[serde(default, deserialize_with = "lenient::bool")]
    pub win: bool,

    #[serde(default, deserialize_with = "lenient::i64")]
    pub kills: i64,
    #[serde(default, deserialize_with = "lenient::i64")]
    pub deaths: i64,
    #[serde(default, deserialize_with = "lenient::i64")]
    pub assists: i64,
    #[serde(default, deserialize_with = "lenient::i64")]
    pub gold_earned: i64,
    #[serde(default, deserialize_with = "lenient::i64")]
    pub total_minions_killed: i64,
    #[serde(default, deserialize_with = "lenient::i64")]
    pub neutral_minions_killed: i64,
    #[serde(default, deserialize_with = "lenient::i64")]
    pub total_damage_dealt_to_champions: i64,
    #[serde(default, deserialize_with = "lenient::i64")]
    pub total_damage_taken: i64,
    #[serde(default, deserialize_with = "lenient::i64")]
    pub damage_self_mitigated: i64,
    #[serde(default, deserialize_with = "lenient::i64")]
    pub damage_dealt_to_turrets: i64,
    #[serde(default, deserialize_with = "lenient::i64")]
    pub damage_dealt_to_objectives: i64,
    #[serde(default, deserialize_with = "lenient::i64")]
    pub vision_score: i64,
    #[serde(default, deserialize_with = "lenient::i64")]
    pub wards_placed: i64,
    #[serde(default, deserialize_with = "lenient::i64")]
    pub wards_killed: i64,
    #[serde(default, deserialize_with = "lenient::i64")]
    pub vision_wards_bought_in_game: i64,
    #[serde(default, deserialize_with = "lenient::i64")]
    pub turret_kills: i64,
    #[serde(default, deserialize_with = "lenient::i64")]
    pub dragon_kills: i64,
    #[serde(default, deserialize_with = "lenient::i64")]
    pub baron_kills: i64,
    #[serde(rename = "timeCCingOthers", default, deserialize_with = "lenient::i64")]
    pub time_ccing_others: i64,
    #[serde(default, deserialize_with = "lenient::i64")]
    pub total_heals_on_teammates: i64,
    #[serde(default, deserialize_with = "lenient::i64")]
    pub total_damage_shielded_on_teammates: i64,

    /// Pre-aggregated stats computed upstream.
    #[serde(default)]
    pub challenges: Map<String, Value>,

    #[serde(flatten)]
    pub counters: Map<String, Value>,
}

impl Participant {
    /// Challenge counter by upstream key; 0 when absent or non-numeric.
    pub fn challenge(&self, key: &str) -> f64 {
        self.challenges
            .get(key)
            .map(lenient::number_from_value)
            .unwrap_or(0.0)
    }

    /// Any untyped top-level counter by upstream key; 0 when absent.
    pub fn counter(&self, key: &str) -> f64 {
        self.counters
            .get(key)
            .map(lenient::number_from_value)
            .unwrap_or(0.0)
    }

    /// Side from the team id, falling back to the participant slot.
    pub fn side(&self) -> Side {
        Side::from_team_id(self.team_id)
            .unwrap_or_else(|| Side::from_participant_id(self.participant_id))
    }

    pub fn role(&self) -> Option<Role> {
        Role::from_team_position(&self.team_position, &self.individual_position)
    }

    pub fn total_cs(&self) -> i64 {
        self.total_minions_killed + self.neutral_minions_killed
    }
}

// =============================================================================
// Timeline
// =============================================================================

/// Per-frame event and position log for one match.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Timeline {
    #[serde(default)]
    pub metadata: TimelineMetadata,
    #[serde(default)]
    pub info: TimelineInfo,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineMetadata {
    #[serde(default)]
    pub match_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineInfo {
    #[serde(default, deserialize_with = "lenient::i64")]
    pub frame_interval: i64,
    #[serde(default)]
    pub frames: Vec<Frame>,
}

impl Timeline {
    pub fn frames(&self) -> &[Frame] {
        &self.info.frames
    }

    pub fn events(&self) -> impl Iterator<Item = &TimelineEvent> {
        self.info.frames.iter().flat_map(|frame| frame.events.iter())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    /// Milliseconds since match start.
    #[serde(default, deserialize_with = "lenient::i64")]
    pub timestamp: i64,
    #[serde(default)]
    pub events: Vec<TimelineEvent>,
    /// Snapshots keyed by stringified participant id.
    #[serde(default)]
    pub participant_frames: BTreeMap<String, ParticipantFrame>,
}

impl Frame {
    pub fn participant_frame(&self, participant_id: u32) -> Option<&ParticipantFrame> {
        self.participant_frames.get(&participant_id.to_string())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantFrame {
    #[serde(default, deserialize_with = "lenient::u32")]
    pub participant_id: u32,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub position: Option<Position>,
    #[serde(default, deserialize_with = "lenient::i64")]
    pub level: i64,
    #[serde(default, deserialize_with = "lenient::i64")]
    pub current_gold: i64,
    #[serde(default, deserialize_with = "lenient::i64")]
    pub total_gold: i64,
    #[serde(default, deserialize_with = "lenient::i64")]
    pub minions_killed: i64,
    #[serde(default, deserialize_with = "lenient::i64")]
    pub jungle_minions_killed: i64,
}

/// Timeline event, tagged by the upstream `type` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimelineEvent {
    ChampionKill(ChampionKillEvent),
    EliteMonsterKill(EliteMonsterKillEvent),
    BuildingKill(BuildingKillEvent),
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChampionKillEvent {
    #[serde(default, deserialize_with = "lenient::i64")]
    pub timestamp: i64,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub position: Option<Position>,
    /// 0 when the kill was executed by a minion, turret or monster.
    #[serde(default, deserialize_with = "lenient::u32")]
    pub killer_id: u32,
    #[serde(default, deserialize_with = "lenient::u32")]
    pub victim_id: u32,
    #[serde(default, deserialize_with = "lenient::ids")]
    pub assisting_participant_ids: Vec<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EliteMonsterKillEvent {
    #[serde(default, deserialize_with = "lenient::i64")]
    pub timestamp: i64,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub position: Option<Position>,
    #[serde(default, deserialize_with = "lenient::u32")]
    pub killer_id: u32,
    #[serde(default, deserialize_with = "lenient::u32")]
    pub killer_team_id: u32,
    /// `DRAGON`, `BARON_NASHOR`, `RIFTHERALD`, ...
    #[serde(default, deserialize_with = "lenient::string")]
    pub monster_type: String,
    #[serde(default)]
    pub monster_sub_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildingKillEvent {
    #[serde(default, deserialize_with = "lenient::i64")]
    pub timestamp: i64,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub position: Option<Position>,
    #[serde(default, deserialize_with = "lenient::u32")]
    pub killer_id: u32,
    /// Team that owned the destroyed building.
    #[serde(default, deserialize_with = "lenient::u32")]
    pub team_id: u32,
    #[serde(default, deserialize_with = "lenient::string")]
    pub building_type: String,
    #[serde(default)]
    pub lane_type: Option<String>,
    #[serde(default)]
    pub tower_type: Option<String>,
}

// =============================================================================
// Roles
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Top,
    Jungle,
    Mid,
    Adc,
    Support,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown role label: {0:?}")]
pub struct ParseRoleError(pub String);

impl Role {
    pub const ALL: [Role; 5] = [Role::Top, Role::Jungle, Role::Mid, Role::Adc, Role::Support];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Top => "TOP",
            Role::Jungle => "JUNGLE",
            Role::Mid => "MID",
            Role::Adc => "ADC",
            Role::Support => "SUPPORT",
        }
    }

    /// Map an upstream position label (`TOP`, `JUNGLE`, `MIDDLE`, `BOTTOM`,
    /// `UTILITY`) to a role.
    pub fn from_position(position: &str) -> Option<Self> {
        match position.trim().to_ascii_uppercase().as_str() {
            "TOP" => Some(Role::Top),
            "JUNGLE" => Some(Role::Jungle),
            "MIDDLE" | "MID" => Some(Role::Mid),
            "BOTTOM" | "ADC" => Some(Role::Adc),
            "UTILITY" | "SUPPORT" => Some(Role::Support),
            _ => None,
        }
    }

    /// Team position first, individual position as fallback.
    pub fn from_team_position(team_position: &str, individual_position: &str) -> Option<Self> {
        Self::from_position(team_position).or_else(|| Self::from_position(individual_position))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TOP" => Ok(Role::Top),
            "JUNGLE" => Ok(Role::Jungle),
            "MID" => Ok(Role::Mid),
            "ADC" => Ok(Role::Adc),
            "SUPPORT" => Ok(Role::Support),
            _ => Err(ParseRoleError(s.to_string())),
        }
    }
}

// =============================================================================
// Derived metrics
// =============================================================================

/// Fraction of valid position samples spent in each zone.
///
/// Values are rounded to three decimals, so the sum may drift slightly
/// from 1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ZoneOccupancy {
    pub friendly_jungle: f64,
    pub enemy_jungle: f64,
    pub lanes: f64,
    pub river: f64,
}

impl ZoneOccupancy {
    pub fn fraction(&self, zone: Zone) -> f64 {
        match zone {
            Zone::FriendlyTerritory => self.friendly_jungle,
            Zone::EnemyTerritory => self.enemy_jungle,
            Zone::Lane => self.lanes,
            Zone::NeutralCorridor => self.river,
        }
    }

    pub fn total(&self) -> f64 {
        self.friendly_jungle + self.enemy_jungle + self.lanes + self.river
    }
}

/// Output name of a derived metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKey {
    DamagePerMinute,
    DamageShare,
    CsPerMinute,
    GoldEfficiency,
    PositioningScore,
    ObjectiveDamage,
    VisionScorePerMinute,
    KillParticipation,
    CrowdControlScore,
    DeathEfficiency,
    RoamingImpact,
    EarlyGameImpact,
    VisionScore,
    ObjectiveControl,
    SoloKills,
    EarlyGameDominance,
    DurabilityScore,
    SplitPushPressure,
    JungleProximity,
}

impl MetricKey {
    pub fn as_str(self) -> &'static str {
        match self {
            MetricKey::DamagePerMinute => "damage_per_minute",
            MetricKey::DamageShare => "damage_share",
            MetricKey::CsPerMinute => "cs_per_minute",
            MetricKey::GoldEfficiency => "gold_efficiency",
            MetricKey::PositioningScore => "positioning_score",
            MetricKey::ObjectiveDamage => "objective_damage",
            MetricKey::VisionScorePerMinute => "vision_score_per_minute",
            MetricKey::KillParticipation => "kill_participation",
            MetricKey::CrowdControlScore => "crowd_control_score",
            MetricKey::DeathEfficiency => "death_efficiency",
            MetricKey::RoamingImpact => "roaming_impact",
            MetricKey::EarlyGameImpact => "early_game_impact",
            MetricKey::VisionScore => "vision_score",
            MetricKey::ObjectiveControl => "objective_control",
            MetricKey::SoloKills => "solo_kills",
            MetricKey::EarlyGameDominance => "early_game_dominance",
            MetricKey::DurabilityScore => "durability_score",
            MetricKey::SplitPushPressure => "split_push_pressure",
            MetricKey::JungleProximity => "jungle_proximity",
        }
    }
}

impl fmt::Display for MetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetricValue {
    Number(f64),
    /// `None` when the profile could not be computed.
    ZoneProfile(Option<ZoneOccupancy>),
}

/// Role-specific derived metrics, keyed by output name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MetricSet {
    values: BTreeMap<MetricKey, MetricValue>,
}

impl MetricSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_number(mut self, key: MetricKey, value: f64) -> Self {
        self.values.insert(key, MetricValue::Number(value));
        self
    }

    pub fn with_zone_profile(mut self, key: MetricKey, profile: Option<ZoneOccupancy>) -> Self {
        self.values.insert(key, MetricValue::ZoneProfile(profile));
        self
    }

    pub fn get(&self, key: MetricKey) -> Option<&MetricValue> {
        self.values.get(&key)
    }

    pub fn number(&self, key: MetricKey) -> Option<f64> {
        match self.values.get(&key) {
            Some(MetricValue::Number(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn zone_profile(&self, key: MetricKey) -> Option<ZoneOccupancy> {
        match self.values.get(&key) {
            Some(MetricValue::ZoneProfile(profile)) => *profile,
            _ => None,
        }
    }

    pub fn contains(&self, key: MetricKey) -> bool {
        self.values.contains_key(&key)
    }

    pub fn keys(&self) -> impl Iterator<Item = MetricKey> + '_ {
        self.values.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
