//! Read-only presentation projection of a battle.

use serde::{Deserialize, Serialize};

use crate::snapshot::UnitRecord;
use crate::state::{BattleEvent, BattlePhase, BattleState, Faction, HeroId, Row, UnitTag, Winner};

/// Default number of log entries returned by [`snapshot_for_display`].
pub const DEFAULT_LOG_TAIL: usize = 40;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitView {
    pub tag: UnitTag,
    pub name: String,
    pub source_id: Option<HeroId>,
    pub faction: Faction,
    pub row: Row,
    pub slot: u8,
    pub level: u32,
    pub hp: u32,
    pub max_hp: u32,
    pub ap: u32,
    pub alive: bool,
    pub damage_dealt: u64,
    pub kills: u32,
}

/// One side's units grouped by row, each row ordered by slot.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideView {
    pub front: Vec<UnitView>,
    pub back: Vec<UnitView>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleView {
    pub tick: u32,
    pub tick_limit: u32,
    pub phase: BattlePhase,
    pub winner: Option<Winner>,
    pub awaiting: Option<UnitTag>,
    pub ended: bool,
    pub player: SideView,
    pub enemy: SideView,
    /// Last `log_tail` events, oldest first.
    pub log: Vec<BattleEvent>,
}

/// Builds the display projection. Never mutates `state`.
pub fn snapshot_for_display(state: &BattleState, log_tail: usize) -> BattleView {
    let start = state.log.len().saturating_sub(log_tail);
    BattleView {
        tick: state.tick,
        tick_limit: state.tick_limit,
        phase: state.phase,
        winner: state.winner,
        awaiting: state.awaiting.clone(),
        ended: state.is_ended(),
        player: side_view(&state.player_units),
        enemy: side_view(&state.enemy_units),
        log: state.log[start..].to_vec(),
    }
}

fn side_view(units: &[UnitRecord]) -> SideView {
    let mut view = SideView::default();
    for unit in units {
        let row = match unit.row {
            Row::Front => &mut view.front,
            Row::Back => &mut view.back,
        };
        row.push(unit_view(unit));
    }
    for row in [&mut view.front, &mut view.back] {
        row.sort_by(|a, b| {
            (a.slot, a.source_id, &a.name).cmp(&(b.slot, b.source_id, &b.name))
        });
    }
    view
}

fn unit_view(unit: &UnitRecord) -> UnitView {
    UnitView {
        tag: unit.tag.clone(),
        name: unit.name.clone(),
        source_id: unit.source_id,
        faction: unit.faction,
        row: unit.row,
        slot: unit.slot,
        level: unit.level,
        hp: unit.hp,
        max_hp: unit.max_hp,
        ap: unit.ap,
        alive: unit.is_alive(),
        damage_dealt: unit.damage_dealt,
        kills: unit.kills,
    }
}
