//! Deterministic, resumable hero battle engine.
//!
//! `battle-core` simulates tick-driven squad combat as pure state
//! transitions. A battle is created with [`BattleEngine::new_battle`], then
//! driven by [`BattleEngine::advance`] and [`BattleEngine::apply_player_action`]
//! across as many request/response round-trips as needed. Between calls the
//! battle exists only as a [`BattleState`], which serializes to JSON.
//!
//! Nothing here performs I/O. Diagnostics go through `tracing`; the battle
//! log in [`BattleState::log`] is domain output for the presentation layer.
pub mod abilities;
pub mod combat;
pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod reward;
pub mod rng;
pub mod roster;
pub mod snapshot;
pub mod state;
pub mod stats;
pub mod view;

pub use abilities::{Ability, AbilityKit, AbilityRegistry, TempMods};
pub use config::{BattleConfig, ConfigError, FormationConfig, RewardConfig};
pub use context::BattleContext;
pub use engine::{BattleEngine, BattleOutcome, TargetSelector};
pub use error::{BattleError, ErrorSeverity};
pub use reward::{Highlights, MvpSummary, RewardReport, calculate_rewards};
pub use rng::BattleRng;
pub use roster::{
    FormationMap, HeroDefinition, HeroTemplate, build_enemy_units, build_player_units,
};
pub use snapshot::{SnapshotError, UnitRecord, decode_state, encode_state};
pub use state::{
    BattleEvent, BattlePhase, BattleState, EventKind, Faction, HeroId, MetaValue, Position, Row,
    Side, UnitRuntime, UnitSeed, UnitTag, Winner,
};
pub use stats::{StatBundle, derive_stats};
pub use view::{BattleView, SideView, UnitView, snapshot_for_display};
