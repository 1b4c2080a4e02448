//! Boss tuning data.
//!
//! Every number the decision core reads lives here. Defaults follow the latest tuning pass of the
//! dragon boss; a TOML file only needs to name the fields it overrides (`#[serde(default)]`).
//!
//! Validation runs once at construction (`from_toml_str`, `spawn_boss`). The tick logic assumes a
//! valid config and never re-checks it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ai::Phase;

/// Configuration validation error.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse boss tuning: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to build default tuning table: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("max_health must be positive, got {0}")]
    NonPositiveHealth(f32),

    #[error("Phase thresholds must satisfy 0 < phase3 < phase2 < 1 (phase2={phase2}, phase3={phase3})")]
    ThresholdOrder { phase2: f32, phase3: f32 },

    #[error("{field} is out of range: {value}")]
    OutOfRange { field: &'static str, value: f32 },
}

/// Full boss tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BossConfig {
    pub max_health: f32,
    /// Health fraction at or below which Phase2 starts
    pub phase2_threshold: f32,
    /// Health fraction at or below which Phase3 starts
    pub phase3_threshold: f32,

    /// Melee zone radius (meters)
    pub melee_range: f32,
    /// Outer edge of the AoE / ranged zones (meters)
    pub preferred_range: f32,
    /// Turn rate handed to the movement executor (slerp factor per second)
    pub rotation_speed: f32,

    /// Punish: target dwelling inside `punish_distance` for `punish_close_time` → defensive override
    pub punish_enabled: bool,
    pub punish_distance: f32,
    pub punish_close_time: f32,
    pub defensive_duration: f32,
    /// Single hit >= this → defensive override
    pub heavy_hit_threshold: f32,

    /// Hit receiver: damage per weapon contact and min interval between contacts
    pub damage_per_hit: f32,
    pub hit_cooldown: f32,

    pub phase1: PhaseTuning,
    pub phase2: PhaseTuning,
    pub phase3: PhaseTuning,
    pub attack: AttackTuning,
    pub ranged: RangedTuning,
    pub evasion: EvasionTuning,
}

impl Default for BossConfig {
    fn default() -> Self {
        Self {
            max_health: 100.0,
            phase2_threshold: 0.66,
            phase3_threshold: 0.33,
            melee_range: 5.0,
            preferred_range: 10.0,
            rotation_speed: 5.0,
            punish_enabled: true,
            punish_distance: 1.5,
            punish_close_time: 2.0,
            defensive_duration: 2.0,
            heavy_hit_threshold: 25.0,
            damage_per_hit: 1.0,
            hit_cooldown: 0.15,
            phase1: PhaseTuning::phase1(),
            phase2: PhaseTuning::phase2(),
            phase3: PhaseTuning::phase3(),
            attack: AttackTuning::default(),
            ranged: RangedTuning::default(),
            evasion: EvasionTuning::default(),
        }
    }
}

/// Per-phase behaviour numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhaseTuning {
    pub move_speed: f32,
    /// Approach until closer than this, then hold
    pub stop_distance: f32,
    /// Extra reach added to `melee_range` for the melee zone
    pub melee_buffer: f32,
    /// Per-tick chance to start an evasion while holding
    pub evasion_chance: f32,
    /// Attack timer reset after committing each kind
    pub melee_cadence: f32,
    pub aoe_cadence: f32,
    pub ranged_cadence: f32,
    /// Attack timer reset when no attack fits the current zone
    pub rethink_delay: f32,
    /// Melee-zone roll: below this → melee, else AoE
    pub melee_chance: f32,
    /// Ranged-zone roll when ranged is unavailable: below this → AoE
    pub ranged_zone_aoe_chance: f32,
    /// AoE zone (Phase2) starts at `melee_range + aoe_zone_margin`
    pub aoe_zone_margin: f32,
    /// Ranged zone (Phase3) starts at `melee_range + ranged_zone_margin`
    pub ranged_zone_margin: f32,
    /// Scales melee/AoE windups in this phase
    pub windup_multiplier: f32,
}

impl PhaseTuning {
    pub fn phase1() -> Self {
        Self {
            move_speed: 3.0,
            stop_distance: 4.0,
            melee_buffer: 0.0,
            evasion_chance: 0.25,
            melee_cadence: 2.0,
            aoe_cadence: 3.0,
            ranged_cadence: 0.25,
            rethink_delay: 0.25,
            melee_chance: 1.0,
            ranged_zone_aoe_chance: 0.0,
            aoe_zone_margin: 1.5,
            ranged_zone_margin: 3.0,
            windup_multiplier: 1.0,
        }
    }

    pub fn phase2() -> Self {
        Self {
            move_speed: 4.0,
            stop_distance: 4.5,
            evasion_chance: 0.35,
            melee_cadence: 1.6,
            aoe_cadence: 3.0,
            melee_chance: 0.7,
            windup_multiplier: 1.2,
            ..Self::phase1()
        }
    }

    pub fn phase3() -> Self {
        Self {
            move_speed: 6.0,
            stop_distance: 5.0,
            evasion_chance: 0.5,
            melee_cadence: 1.2,
            aoe_cadence: 2.5,
            ranged_cadence: 0.25,
            melee_chance: 0.5,
            ranged_zone_aoe_chance: 0.4,
            windup_multiplier: 1.4,
            ..Self::phase1()
        }
    }
}

impl Default for PhaseTuning {
    fn default() -> Self {
        Self::phase1()
    }
}

/// Melee / AoE / ranged-wrapper timings and hit volumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttackTuning {
    /// Melee point: this far in front of the boss
    pub melee_offset: f32,
    pub melee_radius: f32,
    pub melee_damage: f32,
    pub melee_knockback: f32,
    pub basic_windup: f32,
    pub claw_windup: f32,
    pub melee_recovery: f32,
    pub melee_cooldown: f32,

    /// AoE point: this far in front of the boss (0 = centered)
    pub aoe_offset: f32,
    pub aoe_radius: f32,
    pub aoe_damage: f32,
    pub aoe_knockback: f32,
    pub aoe_windup: f32,
    pub aoe_recovery: f32,
    pub aoe_cooldown: f32,

    pub ranged_recovery: f32,
    pub ranged_cooldown: f32,
}

impl Default for AttackTuning {
    fn default() -> Self {
        Self {
            melee_offset: 2.5,
            melee_radius: 2.0,
            melee_damage: 1.0,
            melee_knockback: 2.0,
            basic_windup: 0.8,
            claw_windup: 1.65,
            melee_recovery: 0.2,
            melee_cooldown: 2.0,
            aoe_offset: 0.0,
            aoe_radius: 4.0,
            aoe_damage: 2.0,
            aoe_knockback: 3.0,
            aoe_windup: 1.2,
            aoe_recovery: 0.25,
            aoe_cooldown: 3.0,
            ranged_recovery: 0.2,
            ranged_cooldown: 2.5,
        }
    }
}

/// Fireball sub-attack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RangedTuning {
    /// Own cooldown, started after `end_delay`
    pub cooldown: f32,
    pub cast_range: f32,
    pub spawn_delay: f32,
    pub end_delay: f32,
    /// Fire point relative to the boss (forward, up)
    pub fire_point_forward: f32,
    pub fire_point_height: f32,
    /// Aim at target position + this much up
    pub aim_height: f32,
}

impl Default for RangedTuning {
    fn default() -> Self {
        Self {
            cooldown: 4.0,
            cast_range: 20.0,
            spawn_delay: 0.6,
            end_delay: 0.6,
            fire_point_forward: 1.5,
            fire_point_height: 2.0,
            aim_height: 1.2,
        }
    }
}

/// Back-off / strafe maneuvers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvasionTuning {
    pub backoff_multiplier: f32,
    pub strafe_multiplier: f32,
    pub backoff_duration: f32,
    pub strafe_duration: f32,
    pub strafe_cooldown: f32,
    /// "Close" means distance <= stop_distance + close_buffer
    pub close_buffer: f32,
    /// Close: chance of pure back-off (else back-off then strafe)
    pub close_backoff_chance: f32,
    /// Far: chance of pure strafe (else back-off then strafe)
    pub far_strafe_chance: f32,
}

impl Default for EvasionTuning {
    fn default() -> Self {
        Self {
            backoff_multiplier: 0.6,
            strafe_multiplier: 0.6,
            backoff_duration: 0.7,
            strafe_duration: 1.0,
            strafe_cooldown: 1.5,
            close_buffer: 0.5,
            close_backoff_chance: 0.5,
            far_strafe_chance: 0.4,
        }
    }
}

impl EvasionTuning {
    /// Combined cooldown armed when a maneuver starts
    pub fn total_cooldown(&self) -> f32 {
        self.backoff_duration + self.strafe_duration + self.strafe_cooldown
    }
}

impl BossConfig {
    /// Parse TOML tuning and validate it.
    ///
    /// The file is layered over `BossConfig::default()` table by table, so `[phase3]` with a single
    /// key keeps the other Phase3 defaults (plain `#[serde(default)]` would fall back to Phase1 values).
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let overrides: toml::Table = toml::from_str(content)?;

        let mut merged = match toml::Value::try_from(BossConfig::default())? {
            toml::Value::Table(table) => table,
            _ => toml::Table::new(),
        };
        merge_tables(&mut merged, overrides);

        let config: BossConfig = toml::Value::Table(merged).try_into()?;
        config.validate()?;
        Ok(config)
    }

    /// Tuning block for a phase.
    pub fn phase_tuning(&self, phase: Phase) -> &PhaseTuning {
        match phase {
            Phase::Phase1 => &self.phase1,
            Phase::Phase2 => &self.phase2,
            Phase::Phase3 => &self.phase3,
        }
    }

    /// Construction-time checks. Tuning advice (e.g. stop distance inside melee reach) is not enforced.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.max_health > 0.0) || !self.max_health.is_finite() {
            return Err(ConfigError::NonPositiveHealth(self.max_health));
        }

        let ordered = self.phase3_threshold > 0.0
            && self.phase3_threshold < self.phase2_threshold
            && self.phase2_threshold < 1.0;
        if !ordered {
            return Err(ConfigError::ThresholdOrder {
                phase2: self.phase2_threshold,
                phase3: self.phase3_threshold,
            });
        }

        for (field, value) in self.non_negative_fields() {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::OutOfRange { field, value });
            }
        }

        for (field, value) in self.probability_fields() {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::OutOfRange { field, value });
            }
        }

        Ok(())
    }

    fn non_negative_fields(&self) -> Vec<(&'static str, f32)> {
        let mut fields = vec![
            ("melee_range", self.melee_range),
            ("preferred_range", self.preferred_range),
            ("rotation_speed", self.rotation_speed),
            ("punish_distance", self.punish_distance),
            ("punish_close_time", self.punish_close_time),
            ("defensive_duration", self.defensive_duration),
            ("heavy_hit_threshold", self.heavy_hit_threshold),
            ("damage_per_hit", self.damage_per_hit),
            ("hit_cooldown", self.hit_cooldown),
            ("attack.melee_offset", self.attack.melee_offset),
            ("attack.melee_radius", self.attack.melee_radius),
            ("attack.melee_damage", self.attack.melee_damage),
            ("attack.melee_knockback", self.attack.melee_knockback),
            ("attack.basic_windup", self.attack.basic_windup),
            ("attack.claw_windup", self.attack.claw_windup),
            ("attack.melee_recovery", self.attack.melee_recovery),
            ("attack.melee_cooldown", self.attack.melee_cooldown),
            ("attack.aoe_radius", self.attack.aoe_radius),
            ("attack.aoe_damage", self.attack.aoe_damage),
            ("attack.aoe_knockback", self.attack.aoe_knockback),
            ("attack.aoe_windup", self.attack.aoe_windup),
            ("attack.aoe_recovery", self.attack.aoe_recovery),
            ("attack.aoe_cooldown", self.attack.aoe_cooldown),
            ("attack.ranged_recovery", self.attack.ranged_recovery),
            ("attack.ranged_cooldown", self.attack.ranged_cooldown),
            ("ranged.cooldown", self.ranged.cooldown),
            ("ranged.cast_range", self.ranged.cast_range),
            ("ranged.spawn_delay", self.ranged.spawn_delay),
            ("ranged.end_delay", self.ranged.end_delay),
            ("evasion.backoff_multiplier", self.evasion.backoff_multiplier),
            ("evasion.strafe_multiplier", self.evasion.strafe_multiplier),
            ("evasion.backoff_duration", self.evasion.backoff_duration),
            ("evasion.strafe_duration", self.evasion.strafe_duration),
            ("evasion.strafe_cooldown", self.evasion.strafe_cooldown),
            ("evasion.close_buffer", self.evasion.close_buffer),
        ];

        for (name, tuning) in self.phases() {
            fields.extend([
                (name.move_speed, tuning.move_speed),
                (name.stop_distance, tuning.stop_distance),
                (name.melee_buffer, tuning.melee_buffer),
                (name.melee_cadence, tuning.melee_cadence),
                (name.aoe_cadence, tuning.aoe_cadence),
                (name.ranged_cadence, tuning.ranged_cadence),
                (name.rethink_delay, tuning.rethink_delay),
                (name.aoe_zone_margin, tuning.aoe_zone_margin),
                (name.ranged_zone_margin, tuning.ranged_zone_margin),
                (name.windup_multiplier, tuning.windup_multiplier),
            ]);
        }

        fields
    }

    fn probability_fields(&self) -> Vec<(&'static str, f32)> {
        let mut fields = vec![
            ("evasion.close_backoff_chance", self.evasion.close_backoff_chance),
            ("evasion.far_strafe_chance", self.evasion.far_strafe_chance),
        ];

        for (name, tuning) in self.phases() {
            fields.extend([
                (name.evasion_chance, tuning.evasion_chance),
                (name.melee_chance, tuning.melee_chance),
                (name.ranged_zone_aoe_chance, tuning.ranged_zone_aoe_chance),
            ]);
        }

        fields
    }

    fn phases(&self) -> [(&'static PhaseFieldNames, &PhaseTuning); 3] {
        [
            (&PHASE1_FIELDS, &self.phase1),
            (&PHASE2_FIELDS, &self.phase2),
            (&PHASE3_FIELDS, &self.phase3),
        ]
    }
}

/// Deep merge: tables merge key by key, any other value replaces the base.
fn merge_tables(base: &mut toml::Table, overrides: toml::Table) {
    for (key, value) in overrides {
        match value {
            toml::Value::Table(inner) => {
                if let Some(toml::Value::Table(base_inner)) = base.get_mut(&key) {
                    merge_tables(base_inner, inner);
                    continue;
                }
                base.insert(key, toml::Value::Table(inner));
            }
            other => {
                base.insert(key, other);
            }
        }
    }
}

/// Field names for error messages (no runtime string building).
struct PhaseFieldNames {
    move_speed: &'static str,
    stop_distance: &'static str,
    melee_buffer: &'static str,
    evasion_chance: &'static str,
    melee_cadence: &'static str,
    aoe_cadence: &'static str,
    ranged_cadence: &'static str,
    rethink_delay: &'static str,
    melee_chance: &'static str,
    ranged_zone_aoe_chance: &'static str,
    aoe_zone_margin: &'static str,
    ranged_zone_margin: &'static str,
    windup_multiplier: &'static str,
}

macro_rules! phase_field_names {
    ($prefix:literal) => {
        PhaseFieldNames {
            move_speed: concat!($prefix, ".move_speed"),
            stop_distance: concat!($prefix, ".stop_distance"),
            melee_buffer: concat!($prefix, ".melee_buffer"),
            evasion_chance: concat!($prefix, ".evasion_chance"),
            melee_cadence: concat!($prefix, ".melee_cadence"),
            aoe_cadence: concat!($prefix, ".aoe_cadence"),
            ranged_cadence: concat!($prefix, ".ranged_cadence"),
            rethink_delay: concat!($prefix, ".rethink_delay"),
            melee_chance: concat!($prefix, ".melee_chance"),
            ranged_zone_aoe_chance: concat!($prefix, ".ranged_zone_aoe_chance"),
            aoe_zone_margin: concat!($prefix, ".aoe_zone_margin"),
            ranged_zone_margin: concat!($prefix, ".ranged_zone_margin"),
            windup_multiplier: concat!($prefix, ".windup_multiplier"),
        }
    };
}

static PHASE1_FIELDS: PhaseFieldNames = phase_field_names!("phase1");
static PHASE2_FIELDS: PhaseFieldNames = phase_field_names!("phase2");
static PHASE3_FIELDS: PhaseFieldNames = phase_field_names!("phase3");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = BossConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.phase2_threshold, 0.66);
        assert_eq!(config.phase3_threshold, 0.33);
        assert_eq!(config.attack.basic_windup, 0.8);
    }

    #[test]
    fn test_phase_defaults_escalate() {
        let config = BossConfig::default();
        assert!(config.phase1.move_speed < config.phase2.move_speed);
        assert!(config.phase2.move_speed < config.phase3.move_speed);
        assert!(config.phase1.evasion_chance < config.phase3.evasion_chance);
        assert_eq!(config.phase1.melee_cadence, 2.0);
        assert_eq!(config.phase2.melee_chance, 0.7);
        assert_eq!(config.phase3.ranged_zone_aoe_chance, 0.4);
    }

    #[test]
    fn test_partial_toml_overrides_only_named_fields() {
        let config = BossConfig::from_toml_str(
            r#"
            max_health = 250.0
            heavy_hit_threshold = 40.0

            [phase3]
            move_speed = 8.0

            [evasion]
            strafe_cooldown = 2.0
            "#,
        )
        .expect("valid toml");

        assert_eq!(config.max_health, 250.0);
        assert_eq!(config.heavy_hit_threshold, 40.0);
        assert_eq!(config.phase3.move_speed, 8.0);
        // Unnamed fields inside a named table keep that phase's defaults
        assert_eq!(config.phase3.melee_cadence, PhaseTuning::phase3().melee_cadence);
        assert_eq!(config.phase3.windup_multiplier, 1.4);
        assert_eq!(config.evasion.strafe_cooldown, 2.0);
        assert_eq!(config.evasion.backoff_duration, 0.7);
        assert_eq!(config.phase2, PhaseTuning::phase2());
    }

    #[test]
    fn test_threshold_order_rejected() {
        let config = BossConfig {
            phase2_threshold: 0.3,
            phase3_threshold: 0.5,
            ..BossConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::ThresholdOrder { .. })));
    }

    #[test]
    fn test_non_positive_health_rejected() {
        let config = BossConfig {
            max_health: 0.0,
            ..BossConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::NonPositiveHealth(_))));
    }

    #[test]
    fn test_negative_duration_rejected() {
        let mut config = BossConfig::default();
        config.evasion.strafe_duration = -1.0;
        match config.validate() {
            Err(ConfigError::OutOfRange { field, .. }) => assert_eq!(field, "evasion.strafe_duration"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_probability_out_of_range_rejected() {
        let mut config = BossConfig::default();
        config.phase2.evasion_chance = 1.5;
        match config.validate() {
            Err(ConfigError::OutOfRange { field, value }) => {
                assert_eq!(field, "phase2.evasion_chance");
                assert_eq!(value, 1.5);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let result = BossConfig::from_toml_str("max_health = \"lots\"");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_evasion_total_cooldown() {
        let evasion = EvasionTuning::default();
        assert!((evasion.total_cooldown() - 3.2).abs() < 1e-6);
    }
}
