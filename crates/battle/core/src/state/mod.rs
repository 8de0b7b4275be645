//! Battle state types: the runtime unit, the event log and the persisted
//! battle record.
mod battle;
mod event;
mod unit;

pub use battle::{BattlePhase, BattleState, Winner};
pub use event::{BattleEvent, EventKind, MetaValue};
pub use unit::{Faction, HeroId, Position, Row, Side, UnitRuntime, UnitSeed, UnitTag};
