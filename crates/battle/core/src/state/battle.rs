//! Persisted battle state.
//!
//! [`BattleState`] is the only value that survives between invocations.
//! Units are stored as hook-free [`UnitRecord`]s; abilities are re-derived
//! from each record's faction on load.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

use super::event::BattleEvent;
use super::unit::{Side, UnitTag};
use crate::snapshot::UnitRecord;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum BattlePhase {
    Running,
    AwaitPlayer,
    Ended,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Winner {
    Player,
    Enemy,
    Draw,
}

impl From<Side> for Winner {
    fn from(side: Side) -> Self {
        match side {
            Side::Player => Self::Player,
            Side::Enemy => Self::Enemy,
        }
    }
}

impl Winner {
    /// Side that won, `None` on a draw.
    pub const fn side(self) -> Option<Side> {
        match self {
            Self::Player => Some(Side::Player),
            Self::Enemy => Some(Side::Enemy),
            Self::Draw => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleState {
    pub phase: BattlePhase,
    pub tick: u32,
    pub tick_limit: u32,
    pub seed: u64,
    /// Number of random draws consumed so far.
    pub rng_cursor: u64,
    /// Set iff `phase == Ended`.
    pub winner: Option<Winner>,
    /// Player unit waiting for a command. Set iff `phase == AwaitPlayer`.
    pub awaiting: Option<UnitTag>,
    pub log: Vec<BattleEvent>,
    pub player_units: Vec<UnitRecord>,
    pub enemy_units: Vec<UnitRecord>,
}

impl BattleState {
    pub fn is_ended(&self) -> bool {
        self.phase == BattlePhase::Ended
    }

    pub fn units(&self, side: Side) -> &[UnitRecord] {
        match side {
            Side::Player => &self.player_units,
            Side::Enemy => &self.enemy_units,
        }
    }

    pub fn all_units(&self) -> impl Iterator<Item = &UnitRecord> {
        self.player_units.iter().chain(self.enemy_units.iter())
    }

    pub fn find_unit(&self, tag: &UnitTag) -> Option<&UnitRecord> {
        self.all_units().find(|unit| &unit.tag == tag)
    }

    pub fn living(&self, side: Side) -> usize {
        self.units(side).iter().filter(|unit| unit.hp > 0).count()
    }
}
