//! Game configuration and difficulty profiles
//!
//! Every hosted game instance boots from a fully-specified, validated
//! `GameConfig`; difficulty parameters live in static per-key bundles.
//! Unknown difficulty identifiers fall back to Easy rather than failing.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::store::StorageKeys;
use crate::view::{PlayfieldLayout, ViewportPolicy};

/// Difficulty identifier. The table lookup never fails; unknown keys map to
/// the default (`Easy`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DifficultyKey {
    #[default]
    Easy,
    Normal,
    Hard,
}

impl DifficultyKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyKey::Easy => "easy",
            DifficultyKey::Normal => "normal",
            DifficultyKey::Hard => "hard",
        }
    }

    /// Parse a difficulty identifier, falling back to Easy for anything
    /// unrecognized.
    pub fn from_key(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "normal" => DifficultyKey::Normal,
            "hard" => DifficultyKey::Hard,
            _ => DifficultyKey::Easy,
        }
    }
}

/// Lane-game parameter bundle. Intervals are milliseconds, speeds px/sec.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaneProfile {
    /// Catches required per level step.
    pub hits_per_level: u32,
    /// Spawn cadence: base interval shrinking per level, plus jitter.
    pub base_interval_ms: f32,
    pub interval_step_ms: f32,
    pub jitter_ms: f32,
    /// Fall speed range, midpoints growing per level, each bound capped.
    pub speed_min: f32,
    pub speed_max: f32,
    pub speed_min_step: f32,
    pub speed_max_step: f32,
    pub speed_cap_min: f32,
    pub speed_cap_max: f32,
    /// Lane alternation bias ramp.
    pub alt_bias_base: f32,
    pub alt_bias_step: f32,
    pub alt_bias_cap: f32,
    /// Minimum arrival gap between lanes before a spawn is flipped.
    pub cross_lane_gap_ms: f32,
    /// Fairness caps on degenerate lane patterns.
    pub max_same_lane: usize,
    pub max_perfect_alt: usize,
}

const LANE_EASY: LaneProfile = LaneProfile {
    hits_per_level: 20,
    base_interval_ms: 980.0,
    interval_step_ms: 16.0,
    jitter_ms: 420.0,
    speed_min: 90.0,
    speed_max: 240.0,
    speed_min_step: 8.0,
    speed_max_step: 14.0,
    speed_cap_min: 800.0,
    speed_cap_max: 1600.0,
    alt_bias_base: 0.03,
    alt_bias_step: 0.015,
    alt_bias_cap: 0.60,
    cross_lane_gap_ms: 420.0,
    max_same_lane: 8,
    max_perfect_alt: 10,
};

const LANE_NORMAL: LaneProfile = LaneProfile {
    hits_per_level: 14,
    base_interval_ms: 650.0,
    interval_step_ms: 26.0,
    jitter_ms: 320.0,
    speed_min: 160.0,
    speed_max: 380.0,
    speed_min_step: 16.0,
    speed_max_step: 24.0,
    speed_cap_min: 1400.0,
    speed_cap_max: 2400.0,
    alt_bias_base: 0.14,
    alt_bias_step: 0.04,
    alt_bias_cap: 0.84,
    cross_lane_gap_ms: 290.0,
    max_same_lane: 6,
    max_perfect_alt: 8,
};

const LANE_HARD: LaneProfile = LaneProfile {
    hits_per_level: 12,
    base_interval_ms: 520.0,
    interval_step_ms: 34.0,
    jitter_ms: 260.0,
    speed_min: 220.0,
    speed_max: 520.0,
    speed_min_step: 22.0,
    speed_max_step: 36.0,
    speed_cap_min: 1800.0,
    speed_cap_max: 3200.0,
    alt_bias_base: 0.26,
    alt_bias_step: 0.06,
    alt_bias_cap: 0.92,
    cross_lane_gap_ms: 235.0,
    max_same_lane: 5,
    max_perfect_alt: 7,
};

impl LaneProfile {
    /// Pure table lookup; unknown keys cannot occur (enum) and the default
    /// key maps to Easy.
    pub fn for_difficulty(key: DifficultyKey) -> &'static LaneProfile {
        match key {
            DifficultyKey::Easy => &LANE_EASY,
            DifficultyKey::Normal => &LANE_NORMAL,
            DifficultyKey::Hard => &LANE_HARD,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.hits_per_level == 0 {
            return Err(ConfigError::InvalidProfile("hits_per_level must be > 0"));
        }
        if self.base_interval_ms <= 0.0 || self.jitter_ms < 0.0 {
            return Err(ConfigError::InvalidProfile("spawn cadence must be positive"));
        }
        if self.speed_min <= 0.0 || self.speed_max < self.speed_min {
            return Err(ConfigError::InvalidProfile("speed range is inverted"));
        }
        if !(0.0..=1.0).contains(&self.alt_bias_cap) || self.alt_bias_base < 0.0 {
            return Err(ConfigError::InvalidProfile("alternation bias out of [0,1]"));
        }
        if self.max_same_lane < 2 || self.max_perfect_alt < 2 {
            return Err(ConfigError::InvalidProfile("fairness caps must allow runs of 2"));
        }
        Ok(())
    }
}

/// Shield-game parameter bundle. Rates are spawns/sec, times seconds,
/// speeds px/sec, distances px.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShieldProfile {
    pub start_rate: f32,
    pub rate_ramp: f32,
    pub speed: f32,
    pub speed_ramp: f32,
    pub cooldown_s: f32,
    pub burst_duration_s: f32,
    pub shard_size: f32,
    pub burst_range: f32,
}

const SHIELD_EASY: ShieldProfile = ShieldProfile {
    start_rate: 0.95,
    rate_ramp: 0.018,
    speed: 185.0,
    speed_ramp: 0.55,
    cooldown_s: 0.26,
    burst_duration_s: 0.30,
    shard_size: 0.95,
    burst_range: 92.0,
};

const SHIELD_NORMAL: ShieldProfile = ShieldProfile {
    start_rate: 1.25,
    rate_ramp: 0.025,
    speed: 205.0,
    speed_ramp: 0.70,
    cooldown_s: 0.29,
    burst_duration_s: 0.24,
    shard_size: 1.00,
    burst_range: 92.0,
};

const SHIELD_HARD: ShieldProfile = ShieldProfile {
    start_rate: 1.70,
    rate_ramp: 0.035,
    speed: 230.0,
    speed_ramp: 0.90,
    cooldown_s: 0.32,
    burst_duration_s: 0.20,
    shard_size: 1.05,
    burst_range: 92.0,
};

impl ShieldProfile {
    pub fn for_difficulty(key: DifficultyKey) -> &'static ShieldProfile {
        match key {
            DifficultyKey::Easy => &SHIELD_EASY,
            DifficultyKey::Normal => &SHIELD_NORMAL,
            DifficultyKey::Hard => &SHIELD_HARD,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.start_rate <= 0.0 || self.rate_ramp < 0.0 {
            return Err(ConfigError::InvalidProfile("spawn rate must be positive"));
        }
        if self.speed <= 0.0 || self.speed_ramp < 0.0 {
            return Err(ConfigError::InvalidProfile("shard speed must be positive"));
        }
        if self.burst_duration_s <= 0.0 || self.burst_range <= 0.0 {
            return Err(ConfigError::InvalidProfile("burst must have duration and range"));
        }
        if self.cooldown_s < 0.0 || self.shard_size <= 0.0 {
            return Err(ConfigError::InvalidProfile("cooldown/size must be non-negative"));
        }
        Ok(())
    }
}

/// One-continue-per-run monetization settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardedConfig {
    pub enabled: bool,
    /// Length of the local "ad" countdown, in whole seconds.
    pub countdown_seconds: u32,
}

impl Default for RewardedConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            countdown_seconds: 5,
        }
    }
}

/// Fatal boot-time configuration errors. Runtime simulation code never
/// returns these; degeneracies resolve to no-ops instead.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("rewarded countdown must be at least 1 second")]
    ZeroCountdown,
    #[error("minimum playfield size must be positive")]
    InvalidMinSize,
    #[error("lane positions must satisfy 0 < left < right < 1")]
    InvalidLanes,
    #[error("storage keys must be non-empty and distinct")]
    InvalidStorageKeys,
    #[error("invalid difficulty profile: {0}")]
    InvalidProfile(&'static str),
}

/// Per-game-instance configuration, validated once at boot.
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub title: String,
    pub storage: StorageKeys,
    pub rewarded: RewardedConfig,
    pub viewport: ViewportPolicy,
    pub playfield: PlayfieldLayout,
    pub default_difficulty: DifficultyKey,
}

impl GameConfig {
    /// Config for the lane-catch game instance.
    pub fn lane_catch() -> Self {
        Self {
            title: "Lane Catch".into(),
            storage: StorageKeys::prefixed("lanecatch"),
            rewarded: RewardedConfig::default(),
            viewport: ViewportPolicy::default(),
            playfield: PlayfieldLayout::default(),
            default_difficulty: DifficultyKey::Easy,
        }
    }

    /// Config for the shard-shield game instance.
    pub fn shard_shield() -> Self {
        Self {
            title: "Shard Shield".into(),
            storage: StorageKeys::prefixed("shardshield"),
            ..Self::lane_catch()
        }
    }

    /// Validate the whole configuration, including the built-in difficulty
    /// tables. Failure here means the system must not run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rewarded.enabled && self.rewarded.countdown_seconds == 0 {
            return Err(ConfigError::ZeroCountdown);
        }
        if self.viewport.min_width <= 0.0 || self.viewport.min_height <= 0.0 {
            return Err(ConfigError::InvalidMinSize);
        }
        let pf = &self.playfield;
        if !(pf.lane_x_left > 0.0 && pf.lane_x_left < pf.lane_x_right && pf.lane_x_right < 1.0) {
            return Err(ConfigError::InvalidLanes);
        }
        self.storage.validate()?;
        for key in [DifficultyKey::Easy, DifficultyKey::Normal, DifficultyKey::Hard] {
            LaneProfile::for_difficulty(key).validate()?;
            ShieldProfile::for_difficulty(key).validate()?;
        }
        Ok(())
    }
}
