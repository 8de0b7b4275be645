//! Battle engine: the four external operations.
//!
//! [`BattleEngine`] is stateless between calls. Each operation takes the
//! persisted [`BattleState`], hydrates it, runs exactly one transition
//! (possibly spanning many ticks) and returns the next persisted state.
//!
//! ```text
//! new_battle ──► RUNNING ──advance──► AWAIT_PLAYER ──apply_player_action──► RUNNING ...
//!                    │                                                         │
//!                    └──────────────────────► ENDED ◄──────────────────────────┘
//! ```

mod action;
mod battle;
mod turns;

pub use action::TargetSelector;

use serde::{Deserialize, Serialize};

use battle::Battle;

use crate::abilities::AbilityRegistry;
use crate::config::{BattleConfig, ConfigError};
use crate::reward::{self, RewardReport};
use crate::snapshot::SnapshotError;
use crate::state::{BattlePhase, BattleState, UnitRuntime, Winner};

/// Result of a fully automatic battle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleOutcome {
    pub state: BattleState,
    pub rewards: RewardReport,
}

/// Deterministic battle engine.
///
/// Given the same config, registry, rosters, seed and sequence of player
/// actions, every call produces byte-identical state.
#[derive(Clone, Debug)]
pub struct BattleEngine {
    config: BattleConfig,
    registry: AbilityRegistry,
}

impl BattleEngine {
    pub fn new(config: BattleConfig, registry: AbilityRegistry) -> Self {
        Self { config, registry }
    }

    /// Like [`Self::new`], but rejects an invalid config.
    pub fn try_new(config: BattleConfig, registry: AbilityRegistry) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config, registry))
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    pub fn registry(&self) -> &AbilityRegistry {
        &self.registry
    }

    /// Creates a battle at tick 0 in `RUNNING`.
    ///
    /// Logs the `start` event and runs every `on_battle_start` hook. Uses
    /// `config.default_tick_limit` when `tick_limit` is `None`.
    pub fn new_battle(
        &self,
        players: Vec<UnitRuntime>,
        enemies: Vec<UnitRuntime>,
        seed: u64,
        tick_limit: Option<u32>,
    ) -> BattleState {
        let tick_limit = tick_limit.unwrap_or(self.config.default_tick_limit);
        Battle::start(&self.config, players, enemies, seed, tick_limit).into_state()
    }

    /// Runs until the next player pause or the end of the battle.
    ///
    /// Returns the state unchanged when it is `AWAIT_PLAYER` or `ENDED`.
    pub fn advance(&self, state: BattleState) -> Result<BattleState, SnapshotError> {
        let mut battle = Battle::hydrate(state, &self.config, &self.registry)?;
        battle.run_until_pause();
        Ok(battle.into_state())
    }

    /// Applies the awaiting unit's attack on `target` and resumes.
    ///
    /// Returns the state unchanged when it is not `AWAIT_PLAYER`. An invalid
    /// target only appends an `error` event.
    pub fn apply_player_action(
        &self,
        state: BattleState,
        target: TargetSelector,
    ) -> Result<BattleState, SnapshotError> {
        let mut battle = Battle::hydrate(state, &self.config, &self.registry)?;
        battle.apply_player_action(target);
        Ok(battle.into_state())
    }

    /// Plays a whole battle, choosing a random living enemy for every player
    /// turn, and computes rewards.
    pub fn run_battle(
        &self,
        players: Vec<UnitRuntime>,
        enemies: Vec<UnitRuntime>,
        seed: u64,
        tick_limit: Option<u32>,
    ) -> BattleOutcome {
        let tick_limit = tick_limit.unwrap_or(self.config.default_tick_limit);
        let mut battle = Battle::start(&self.config, players, enemies, seed, tick_limit);

        battle.run_until_pause();
        while battle.phase() == BattlePhase::AwaitPlayer {
            match battle.auto_target() {
                Some(target) => battle.apply_player_action(target),
                None => battle.resume(),
            }
        }

        let state = battle.into_state();
        let winner = state.winner.unwrap_or(Winner::Draw);
        let rewards = reward::report_for(&state, winner, &self.config.rewards);
        BattleOutcome { state, rewards }
    }

    /// Rewards for a finished battle, using this engine's reward config.
    pub fn rewards(&self, state: &BattleState) -> Option<RewardReport> {
        reward::calculate_rewards(state, &self.config.rewards)
    }
}

impl Default for BattleEngine {
    fn default() -> Self {
        Self::new(BattleConfig::default(), AbilityRegistry::default())
    }
}
