//! Battle tuning parameters.
//!
//! Every pacing and balance constant lives here instead of in globals, so a
//! battle is fully described by `(config, rosters, seed, player actions)`.
//! The same config must be used for every invocation of one battle.

use serde::{Deserialize, Serialize};

use crate::error::{BattleError, ErrorSeverity};

/// Engine configuration passed into [`crate::BattleEngine::new`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    /// AP a unit must accumulate before it may act.
    pub turn_threshold: u32,
    /// Speed is divided by this to get per-tick AP growth (minimum 1).
    pub speed_divisor: u32,
    /// Tick limit used when the caller does not supply one.
    pub default_tick_limit: u32,
    /// Fraction of the target's defense subtracted from attack, in permille.
    pub defense_factor_permille: u32,
    /// Symmetric damage variance in percent (10 = ±10%).
    pub damage_variance_pct: u32,
    pub formation: FormationConfig,
    pub rewards: RewardConfig,
}

impl BattleConfig {
    // ===== layout constants =====
    /// Number of formation rows (front, back).
    pub const ROWS: usize = 2;
    /// Slots available in each row.
    pub const MAX_SLOTS_PER_ROW: u8 = 6;
    /// Maximum number of units an enemy encounter may field.
    pub const MAX_ENEMY_UNITS: usize = 5;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_TURN_THRESHOLD: u32 = 100;
    pub const DEFAULT_SPEED_DIVISOR: u32 = 10;
    pub const DEFAULT_TICK_LIMIT: u32 = 400;
    pub const DEFAULT_DEFENSE_FACTOR_PERMILLE: u32 = 500;
    pub const DEFAULT_DAMAGE_VARIANCE_PCT: u32 = 10;

    pub fn new() -> Self {
        Self {
            turn_threshold: Self::DEFAULT_TURN_THRESHOLD,
            speed_divisor: Self::DEFAULT_SPEED_DIVISOR,
            default_tick_limit: Self::DEFAULT_TICK_LIMIT,
            defense_factor_permille: Self::DEFAULT_DEFENSE_FACTOR_PERMILLE,
            damage_variance_pct: Self::DEFAULT_DAMAGE_VARIANCE_PCT,
            formation: FormationConfig::default(),
            rewards: RewardConfig::default(),
        }
    }

    /// Returns a copy with damage variance disabled. Handy for exact-number tests.
    pub fn without_variance(mut self) -> Self {
        self.damage_variance_pct = 0;
        self
    }

    /// Checks the values the engine relies on for termination and sane math.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.turn_threshold == 0 {
            return Err(ConfigError::ZeroTurnThreshold);
        }
        if self.speed_divisor == 0 {
            return Err(ConfigError::ZeroSpeedDivisor);
        }
        if self.default_tick_limit == 0 {
            return Err(ConfigError::ZeroTickLimit);
        }
        if self.damage_variance_pct >= 100 {
            return Err(ConfigError::VarianceTooLarge {
                pct: self.damage_variance_pct,
            });
        }
        if self.formation.front_target_weight == 0 && self.formation.back_target_weight == 0 {
            return Err(ConfigError::ZeroTargetWeights);
        }
        Ok(())
    }
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Row-dependent damage multipliers and targeting weights.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormationConfig {
    /// Physical multiplier for front-row attackers, in permille.
    pub front_physical_permille: u32,
    /// Magic multiplier for back-row attackers, in permille.
    pub back_magic_permille: u32,
    /// Relative chance of a front-row unit being picked as a target.
    pub front_target_weight: u32,
    /// Relative chance of a back-row unit being picked as a target.
    pub back_target_weight: u32,
}

impl Default for FormationConfig {
    fn default() -> Self {
        Self {
            front_physical_permille: 1150,
            back_magic_permille: 1050,
            front_target_weight: 1200,
            back_target_weight: 1000,
        }
    }
}

/// Experience payout rules.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    /// Base XP for every owned player unit on a win.
    pub win_base_xp: u32,
    /// Flat XP on a draw.
    pub draw_xp: u32,
    /// Flat XP on a loss.
    pub loss_xp: u32,
    /// XP per point of damage dealt on a win, in permille (100 = 0.1).
    pub damage_xp_permille: u32,
    /// XP per kill on a win.
    pub kill_xp: u32,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            win_base_xp: 120,
            draw_xp: 60,
            loss_xp: 30,
            damage_xp_permille: 100,
            kill_xp: 25,
        }
    }
}

/// Rejected configuration values.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("turn_threshold must be greater than zero")]
    ZeroTurnThreshold,

    #[error("speed_divisor must be greater than zero")]
    ZeroSpeedDivisor,

    #[error("default_tick_limit must be greater than zero")]
    ZeroTickLimit,

    #[error("damage_variance_pct must be below 100 (got {pct})")]
    VarianceTooLarge { pct: u32 },

    #[error("at least one formation target weight must be non-zero")]
    ZeroTargetWeights,
}

impl BattleError for ConfigError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::ZeroTurnThreshold => "CONFIG_ZERO_TURN_THRESHOLD",
            Self::ZeroSpeedDivisor => "CONFIG_ZERO_SPEED_DIVISOR",
            Self::ZeroTickLimit => "CONFIG_ZERO_TICK_LIMIT",
            Self::VarianceTooLarge { .. } => "CONFIG_VARIANCE_TOO_LARGE",
            Self::ZeroTargetWeights => "CONFIG_ZERO_TARGET_WEIGHTS",
        }
    }
}
