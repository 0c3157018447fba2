//! Role Metric Calculator
//!
//! Each role maps to one pure formula function through [`formula_for`].
//! A formula receives the participant's counters, the guarded match length
//! and optional access to the timeline-based sub-algorithms, and returns
//! exactly the role's key set from [`Role::metric_keys`].

use tracing::debug;

use crate::role_metrics::{
    config::MetricsConfig,
    detector::RoamingDetector,
    error::MetricsError,
    geometry::Side,
    profiler::ZoneOccupancyProfiler,
    types::*,
};

// Upstream challenge counter keys.
const DAMAGE_PER_MINUTE: &str = "damagePerMinute";
const TEAM_DAMAGE_PERCENTAGE: &str = "teamDamagePercentage";
const VISION_SCORE_PER_MINUTE: &str = "visionScorePerMinute";
const KILL_PARTICIPATION: &str = "killParticipation";
const SOLO_KILLS: &str = "soloKills";
const EARLY_TAKEDOWNS: &str = "takedownsFirstXMinutes";
const SAVES_FROM_DEATH: &str = "saveAllyFromDeath";
const HERALD_TAKEDOWNS: &str = "riftHeraldTakedowns";
const SOLO_TURRETS_LATE: &str = "soloTurretsLategame";
const TURRET_PLATES_TAKEN: &str = "turretPlatesTaken";

const ADC_KEYS: &[MetricKey] = &[
    MetricKey::DamagePerMinute,
    MetricKey::DamageShare,
    MetricKey::CsPerMinute,
    MetricKey::GoldEfficiency,
    MetricKey::PositioningScore,
    MetricKey::ObjectiveDamage,
];

const SUPPORT_KEYS: &[MetricKey] = &[
    MetricKey::VisionScorePerMinute,
    MetricKey::KillParticipation,
    MetricKey::CrowdControlScore,
    MetricKey::GoldEfficiency,
    MetricKey::DeathEfficiency,
    MetricKey::RoamingImpact,
];

const JUNGLE_KEYS: &[MetricKey] = &[
    MetricKey::KillParticipation,
    MetricKey::EarlyGameImpact,
    MetricKey::VisionScore,
    MetricKey::CsPerMinute,
    MetricKey::ObjectiveControl,
    MetricKey::JungleProximity,
];

const MID_KEYS: &[MetricKey] = &[
    MetricKey::DamagePerMinute,
    MetricKey::KillParticipation,
    MetricKey::SoloKills,
    MetricKey::VisionScore,
    MetricKey::CsPerMinute,
    MetricKey::RoamingImpact,
];

const TOP_KEYS: &[MetricKey] = &[
    MetricKey::DamagePerMinute,
    MetricKey::SoloKills,
    MetricKey::CsPerMinute,
    MetricKey::EarlyGameDominance,
    MetricKey::DurabilityScore,
    MetricKey::SplitPushPressure,
];

impl Role {
    /// The exact set of derived metric names produced for this role.
    pub fn metric_keys(self) -> &'static [MetricKey] {
        match self {
            Role::Adc => ADC_KEYS,
            Role::Support => SUPPORT_KEYS,
            Role::Jungle => JUNGLE_KEYS,
            Role::Mid => MID_KEYS,
            Role::Top => TOP_KEYS,
        }
    }
}

/// Match length in minutes, or `None` when the duration is zero or negative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameMinutes(Option<f64>);

impl GameMinutes {
    pub fn from_seconds(seconds: i64) -> Self {
        if seconds > 0 {
            Self(Some(seconds as f64 / 60.0))
        } else {
            Self(None)
        }
    }

    pub fn get(&self) -> Option<f64> {
        self.0
    }

    /// `value / minutes`, or 0 when the duration is unusable.
    pub fn per_minute(&self, value: f64) -> f64 {
        match self.0 {
            Some(minutes) => value / minutes,
            None => 0.0,
        }
    }

    /// A per-minute figure supplied upstream, zeroed when the duration is
    /// unusable so every per-minute output agrees.
    pub fn guard(&self, per_minute_value: f64) -> f64 {
        if self.0.is_some() {
            per_minute_value
        } else {
            0.0
        }
    }
}

/// Everything a role formula may read.
pub struct FormulaInputs<'a> {
    pub participant: &'a Participant,
    pub participant_id: u32,
    pub side: Side,
    pub minutes: GameMinutes,
    pub timeline: Option<&'a Timeline>,
    detector: &'a RoamingDetector,
    profiler: &'a ZoneOccupancyProfiler,
}

impl FormulaInputs<'_> {
    fn challenge(&self, key: &str) -> f64 {
        self.participant.challenge(key)
    }

    fn deaths_floor(&self) -> f64 {
        self.participant.deaths.max(1) as f64
    }

    fn cs_per_minute(&self) -> f64 {
        self.minutes.per_minute(self.participant.total_cs() as f64)
    }

    /// Roam count for `role`, or 0 without a timeline.
    fn roaming_impact(&self, role: Role) -> f64 {
        match self.timeline {
            Some(timeline) => self.detector.roam_count(timeline, self.participant_id, role) as f64,
            None => 0.0,
        }
    }

    /// Zone profile, or `None` without a timeline or without valid samples.
    fn zone_profile(&self) -> Option<ZoneOccupancy> {
        let timeline = self.timeline?;
        match self.profiler.occupancy(timeline, self.participant_id, self.side) {
            Ok(profile) => Some(profile),
            Err(err) => {
                debug!("{}", err);
                None
            }
        }
    }
}

pub type RoleFormula = fn(&FormulaInputs<'_>) -> MetricSet;

/// Dispatch table from role to its formula.
pub fn formula_for(role: Role) -> RoleFormula {
    match role {
        Role::Adc => adc_metrics,
        Role::Support => support_metrics,
        Role::Jungle => jungle_metrics,
        Role::Mid => mid_metrics,
        Role::Top => top_metrics,
    }
}

pub fn adc_metrics(inputs: &FormulaInputs<'_>) -> MetricSet {
    let p = inputs.participant;
    let damage = p.total_damage_dealt_to_champions as f64;

    MetricSet::new()
        .with_number(
            MetricKey::DamagePerMinute,
            inputs.minutes.guard(inputs.challenge(DAMAGE_PER_MINUTE)),
        )
        .with_number(MetricKey::DamageShare, inputs.challenge(TEAM_DAMAGE_PERCENTAGE))
        .with_number(MetricKey::CsPerMinute, inputs.cs_per_minute())
        .with_number(MetricKey::GoldEfficiency, damage / p.gold_earned.max(1) as f64)
        // Deaths stand in for risk exposure here and in the top lane
        // durability score; no other role has an equivalent.
        .with_number(MetricKey::PositioningScore, damage / inputs.deaths_floor())
        .with_number(
            MetricKey::ObjectiveDamage,
            (p.damage_dealt_to_turrets + p.damage_dealt_to_objectives) as f64,
        )
}

pub fn support_metrics(inputs: &FormulaInputs<'_>) -> MetricSet {
    let p = inputs.participant;
    let gold_thousands = p.gold_earned.max(1) as f64 / 1000.0;
    let gold_efficiency = (p.assists as f64 + p.wards_placed as f64 / 2.0) / gold_thousands;
    let death_efficiency =
        (p.assists as f64 + inputs.challenge(SAVES_FROM_DEATH)) / inputs.deaths_floor();

    MetricSet::new()
        .with_number(
            MetricKey::VisionScorePerMinute,
            inputs.minutes.guard(inputs.challenge(VISION_SCORE_PER_MINUTE)),
        )
        .with_number(MetricKey::KillParticipation, inputs.challenge(KILL_PARTICIPATION))
        .with_number(MetricKey::CrowdControlScore, p.time_ccing_others as f64)
        .with_number(MetricKey::GoldEfficiency, gold_efficiency)
        .with_number(MetricKey::DeathEfficiency, death_efficiency)
        .with_number(MetricKey::RoamingImpact, inputs.roaming_impact(Role::Support))
}

pub fn jungle_metrics(inputs: &FormulaInputs<'_>) -> MetricSet {
    let p = inputs.participant;
    let objective_control =
        (p.dragon_kills + p.baron_kills) as f64 + inputs.challenge(HERALD_TAKEDOWNS);

    MetricSet::new()
        .with_number(MetricKey::KillParticipation, inputs.challenge(KILL_PARTICIPATION))
        .with_number(MetricKey::EarlyGameImpact, inputs.challenge(EARLY_TAKEDOWNS))
        .with_number(MetricKey::VisionScore, p.vision_score as f64)
        .with_number(MetricKey::CsPerMinute, inputs.cs_per_minute())
        .with_number(MetricKey::ObjectiveControl, objective_control)
        .with_zone_profile(MetricKey::JungleProximity, inputs.zone_profile())
}

pub fn mid_metrics(inputs: &FormulaInputs<'_>) -> MetricSet {
    let p = inputs.participant;

    MetricSet::new()
        .with_number(
            MetricKey::DamagePerMinute,
            inputs.minutes.guard(inputs.challenge(DAMAGE_PER_MINUTE)),
        )
        .with_number(MetricKey::KillParticipation, inputs.challenge(KILL_PARTICIPATION))
        .with_number(MetricKey::SoloKills, inputs.challenge(SOLO_KILLS))
        .with_number(MetricKey::VisionScore, p.vision_score as f64)
        .with_number(MetricKey::CsPerMinute, inputs.cs_per_minute())
        .with_number(MetricKey::RoamingImpact, inputs.roaming_impact(Role::Mid))
}

pub fn top_metrics(inputs: &FormulaInputs<'_>) -> MetricSet {
    let p = inputs.participant;
    let solo_kills = inputs.challenge(SOLO_KILLS);
    let deaths = inputs.deaths_floor();

    let early_game_dominance = (solo_kills + inputs.challenge(EARLY_TAKEDOWNS)) / deaths;
    let durability_score =
        ((p.total_damage_taken + p.damage_self_mitigated) as f64 / deaths).floor();
    let split_push_pressure = p.damage_dealt_to_turrets as f64 / 1000.0
        + inputs.challenge(SOLO_TURRETS_LATE) * 2.0
        + inputs.challenge(TURRET_PLATES_TAKEN);

    MetricSet::new()
        .with_number(
            MetricKey::DamagePerMinute,
            inputs.minutes.guard(inputs.challenge(DAMAGE_PER_MINUTE)),
        )
        .with_number(MetricKey::SoloKills, solo_kills)
        .with_number(MetricKey::CsPerMinute, inputs.cs_per_minute())
        .with_number(MetricKey::EarlyGameDominance, early_game_dominance)
        .with_number(MetricKey::DurabilityScore, durability_score)
        .with_number(MetricKey::SplitPushPressure, split_push_pressure)
}

/// Computes the role-specific metric set for one participant.
#[derive(Debug, Clone, Default)]
pub struct RoleMetricCalculator {
    detector: RoamingDetector,
    profiler: ZoneOccupancyProfiler,
}

impl RoleMetricCalculator {
    pub fn new(config: &MetricsConfig) -> Self {
        Self {
            detector: RoamingDetector::new(config.lanes.clone()),
            profiler: ZoneOccupancyProfiler::new(config.geometry.clone()),
        }
    }

    pub fn detector(&self) -> &RoamingDetector {
        &self.detector
    }

    pub fn profiler(&self) -> &ZoneOccupancyProfiler {
        &self.profiler
    }

    /// Derive the metric set for `participant_id` playing `role`.
    ///
    /// An unknown role (`None`) yields an empty set rather than an error.
    /// A missing participant is the only failure.
    pub fn calculate(
        &self,
        summary: &MatchSummary,
        timeline: Option<&Timeline>,
        participant_id: u32,
        role: Option<Role>,
    ) -> Result<MetricSet, MetricsError> {
        let participant = summary
            .participant(participant_id)
            .ok_or_else(|| MetricsError::participant_not_found(summary.match_id(), participant_id))?;

        let Some(role) = role else {
            debug!(
                "No role for participant {} in {}; producing no metrics",
                participant_id,
                summary.match_id()
            );
            return Ok(MetricSet::new());
        };

        let inputs = FormulaInputs {
            participant,
            participant_id,
            side: participant.side(),
            minutes: GameMinutes::from_seconds(summary.info.game_duration),
            timeline,
            detector: &self.detector,
            profiler: &self.profiler,
        };

        Ok(formula_for(role)(&inputs))
    }
}
