//! Record Extractor: flat, persistence-ready rows

use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;
use tracing::warn;

use crate::role_metrics::{
    calculator::RoleMetricCalculator,
    config::MetricsConfig,
    error::MetricsError,
    geometry::Side,
    season::{SeasonInfo, SplitCalendar},
    types::*,
};

/// One row per (match, participant): identity, raw counters, and the
/// role's derived metrics.
///
/// Derived columns a role does not produce are 0, except
/// `jungle_proximity`, which stays `None` so "no data" is never confused
/// with a real profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlatStatRecord {
    // Identity
    pub match_id: String,
    pub player_puuid: String,
    pub participant_id: u32,
    pub champion_id: i64,
    pub champion_name: String,
    pub role: Option<Role>,
    pub team_side: Side,
    pub game_duration: i64,
    pub win: bool,
    pub queue_id: Option<i64>,
    pub match_date: Option<DateTime<Utc>>,
    pub season: Option<u32>,
    pub patch: Option<String>,
    pub split_number: Option<u8>,
    pub split_name: Option<String>,

    // Core
    pub kills: i64,
    pub deaths: i64,
    pub assists: i64,

    // Farm
    pub total_minions_killed: i64,
    pub neutral_minions_killed: i64,
    pub cs_per_minute: f64,

    // Damage
    pub total_damage_to_champions: i64,
    pub damage_per_minute: f64,
    pub damage_share: f64,
    pub total_damage_taken: i64,
    pub damage_self_mitigated: i64,

    // Gold
    pub gold_earned: i64,

    // Vision
    pub vision_score: i64,
    pub vision_score_per_minute: f64,
    pub wards_placed: i64,
    pub wards_killed: i64,
    pub control_wards_purchased: i64,

    // Objectives
    pub damage_to_turrets: i64,
    pub damage_to_objectives: i64,
    pub turret_plates_taken: i64,
    pub turrets_killed: i64,
    pub dragon_kills: i64,
    pub baron_kills: i64,
    pub rift_herald_kills: i64,

    // Combat
    pub time_ccing_others: i64,
    pub total_heal_on_teammates: i64,
    pub total_damage_shielded_on_teammates: i64,

    // Challenges
    pub kill_participation: f64,
    pub solo_kills: i64,
    pub takedowns_first_15_min: i64,
    pub save_ally_from_death: i64,

    // Role-specific
    pub gold_efficiency: f64,
    pub positioning_score: f64,
    pub objective_damage: f64,
    pub crowd_control_score: f64,
    pub death_efficiency: f64,
    pub early_game_impact: f64,
    pub objective_control_score: f64,
    pub early_game_dominance: f64,
    pub durability_score: f64,
    pub split_push_pressure: f64,
    pub roaming_impact: f64,
    pub jungle_proximity: Option<ZoneOccupancy>,

    /// The role's metric set as computed; its keys are exactly
    /// `role.metric_keys()`.
    #[serde(skip)]
    pub derived: MetricSet,
}

impl FlatStatRecord {
    /// Upsert key: one row per player per match.
    pub fn key(&self) -> (String, String) {
        (self.player_puuid.clone(), self.match_id.clone())
    }
}

fn count(value: f64) -> i64 {
    value.round() as i64
}

fn match_date(game_creation_ms: i64) -> Option<DateTime<Utc>> {
    if game_creation_ms <= 0 {
        return None;
    }
    Utc.timestamp_millis_opt(game_creation_ms).single()
}

/// Builds [`FlatStatRecord`]s from raw payloads.
#[derive(Debug, Clone, Default)]
pub struct RecordExtractor {
    calculator: RoleMetricCalculator,
    split_calendar: SplitCalendar,
}

impl RecordExtractor {
    pub fn new(config: &MetricsConfig) -> Self {
        Self {
            calculator: RoleMetricCalculator::new(config),
            split_calendar: config.split_calendar.clone(),
        }
    }

    pub fn calculator(&self) -> &RoleMetricCalculator {
        &self.calculator
    }

    fn season_info(&self, summary: &MatchSummary) -> Option<SeasonInfo> {
        match self.split_calendar.season_info(&summary.info.game_version) {
            Ok(info) => Some(info),
            Err(err) => {
                warn!("{} ({})", err, summary.match_id());
                None
            }
        }
    }

    /// Flatten one participant's match into a record.
    ///
    /// Fails only when `participant_id` is not in the match.
    pub fn extract(
        &self,
        summary: &MatchSummary,
        timeline: Option<&Timeline>,
        participant_id: u32,
        role: Option<Role>,
    ) -> Result<FlatStatRecord, MetricsError> {
        let p = summary
            .participant(participant_id)
            .ok_or_else(|| MetricsError::participant_not_found(summary.match_id(), participant_id))?;

        let derived = self
            .calculator
            .calculate(summary, timeline, participant_id, role)?;
        let metric = |key: MetricKey| derived.number(key).unwrap_or(0.0);

        let season = self.season_info(summary);

        Ok(FlatStatRecord {
            match_id: summary.match_id().to_string(),
            player_puuid: p.puuid.clone(),
            participant_id,
            champion_id: p.champion_id,
            champion_name: p.champion_name.clone(),
            role,
            team_side: p.side(),
            game_duration: summary.info.game_duration,
            win: p.win,
            queue_id: summary.info.queue_id,
            match_date: match_date(summary.info.game_creation),
            season: season.as_ref().map(|s| s.season),
            patch: season.as_ref().map(|s| s.patch.clone()),
            split_number: season.as_ref().map(|s| s.split_number),
            split_name: season.map(|s| s.split_name),

            kills: p.kills,
            deaths: p.deaths,
            assists: p.assists,

            total_minions_killed: p.total_minions_killed,
            neutral_minions_killed: p.neutral_minions_killed,
            cs_per_minute: metric(MetricKey::CsPerMinute),

            total_damage_to_champions: p.total_damage_dealt_to_champions,
            damage_per_minute: metric(MetricKey::DamagePerMinute),
            damage_share: metric(MetricKey::DamageShare),
            total_damage_taken: p.total_damage_taken,
            damage_self_mitigated: p.damage_self_mitigated,

            gold_earned: p.gold_earned,

            vision_score: p.vision_score,
            vision_score_per_minute: metric(MetricKey::VisionScorePerMinute),
            wards_placed: p.wards_placed,
            wards_killed: p.wards_killed,
            control_wards_purchased: p.vision_wards_bought_in_game,

            damage_to_turrets: p.damage_dealt_to_turrets,
            damage_to_objectives: p.damage_dealt_to_objectives,
            turret_plates_taken: count(p.challenge("turretPlatesTaken")),
            turrets_killed: p.turret_kills,
            dragon_kills: p.dragon_kills,
            baron_kills: p.baron_kills,
            rift_herald_kills: count(p.challenge("riftHeraldTakedowns")),

            time_ccing_others: p.time_ccing_others,
            total_heal_on_teammates: p.total_heals_on_teammates,
            total_damage_shielded_on_teammates: p.total_damage_shielded_on_teammates,

            kill_participation: metric(MetricKey::KillParticipation),
            solo_kills: count(p.challenge("soloKills")),
            takedowns_first_15_min: count(p.challenge("takedownsFirstXMinutes")),
            save_ally_from_death: count(p.challenge("saveAllyFromDeath")),

            gold_efficiency: metric(MetricKey::GoldEfficiency),
            positioning_score: metric(MetricKey::PositioningScore),
            objective_damage: metric(MetricKey::ObjectiveDamage),
            crowd_control_score: metric(MetricKey::CrowdControlScore),
            death_efficiency: metric(MetricKey::DeathEfficiency),
            early_game_impact: metric(MetricKey::EarlyGameImpact),
            objective_control_score: metric(MetricKey::ObjectiveControl),
            early_game_dominance: metric(MetricKey::EarlyGameDominance),
            durability_score: metric(MetricKey::DurabilityScore),
            split_push_pressure: metric(MetricKey::SplitPushPressure),
            roaming_impact: metric(MetricKey::RoamingImpact),
            jungle_proximity: derived.zone_profile(MetricKey::JungleProximity),

            derived,
        })
    }
}
