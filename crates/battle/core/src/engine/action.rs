//! Player commands.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::battle::{Battle, UnitRef};
use crate::combat::random_living;
use crate::state::{BattlePhase, EventKind, Position, Row, Side};

/// Formation cell the player wants to hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetSelector {
    pub side: Side,
    pub row: Row,
    pub slot: u8,
}

impl TargetSelector {
    pub const fn new(side: Side, position: Position) -> Self {
        Self {
            side,
            row: position.row,
            slot: position.slot,
        }
    }

    /// Targets an enemy-side cell.
    pub const fn enemy(position: Position) -> Self {
        Self::new(Side::Enemy, position)
    }

    pub const fn position(&self) -> Position {
        Position::new(self.row, self.slot)
    }
}

impl Battle<'_> {
    /// Resolves the awaiting unit's attack on `selector`, then resumes the
    /// tick loop until the next pause or the end of the battle.
    ///
    /// - Not paused: no-op.
    /// - Awaiting actor gone or not ready: resume without attacking.
    /// - Target not a living opposing unit at that cell: log an `error`
    ///   event and stay paused on the same actor.
    pub fn apply_player_action(&mut self, selector: TargetSelector) {
        if self.phase != BattlePhase::AwaitPlayer {
            return;
        }

        let threshold = self.config.turn_threshold;
        let actor = self
            .awaiting
            .as_ref()
            .and_then(|tag| self.find(tag))
            .filter(|&actor| self.unit(actor).is_some_and(|u| u.is_ready(threshold)));
        let Some(actor) = actor else {
            debug!(
                target: "battle::engine",
                tick = self.ctx.tick(),
                "awaiting actor cannot act, resuming"
            );
            self.resume();
            return;
        };

        let Some(target) = self.locate_target(actor, selector) else {
            self.reject_target(actor, selector);
            return;
        };

        self.strike(actor, target);
        self.resume();
    }

    /// Picks a uniformly random living opponent for the awaiting actor.
    pub fn auto_target(&mut self) -> Option<TargetSelector> {
        let actor = self.awaiting.as_ref().and_then(|tag| self.find(tag))?;
        let side = actor.side.opposite();
        let index = match side {
            Side::Player => random_living(&mut self.ctx, &self.players),
            Side::Enemy => random_living(&mut self.ctx, &self.enemies),
        }?;
        let unit = self.units(side).get(index)?;
        Some(TargetSelector::new(side, unit.position))
    }

    pub(super) fn resume(&mut self) {
        self.phase = BattlePhase::Running;
        self.awaiting = None;
        self.run_until_pause();
    }

    fn locate_target(&self, actor: UnitRef, selector: TargetSelector) -> Option<UnitRef> {
        if selector.side != actor.side.opposite() {
            return None;
        }
        let cell = selector.position();
        self.units(selector.side)
            .iter()
            .position(|unit| unit.is_alive() && unit.position == cell)
            .map(|index| UnitRef::new(selector.side, index))
    }

    fn reject_target(&mut self, actor: UnitRef, selector: TargetSelector) {
        let Some(tag) = self.unit(actor).map(|unit| unit.tag.clone()) else {
            return;
        };
        self.ctx.emit(
            self.ctx
                .event(EventKind::Error)
                .with_source(&tag)
                .with_meta("message", "invalid target")
                .with_meta("side", selector.side.to_string())
                .with_meta("row", selector.row.to_string())
                .with_meta("slot", u32::from(selector.slot)),
        );
        warn!(
            target: "battle::engine",
            tick = self.ctx.tick(),
            actor = %tag,
            side = %selector.side,
            cell = %selector.position(),
            "rejected player target"
        );
    }
}
