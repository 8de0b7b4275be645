//! Per-invocation battle context.
//!
//! Rebuilt from the persisted tick, log, seed and RNG cursor at the start of
//! every engine call, and folded back into the [`crate::BattleState`] at the
//! end. Everything that resolves combat receives it by `&mut`.

use crate::rng::BattleRng;
use crate::state::{BattleEvent, EventKind};

#[derive(Clone, Debug)]
pub struct BattleContext {
    tick: u32,
    rng: BattleRng,
    log: Vec<BattleEvent>,
}

impl BattleContext {
    pub fn new(tick: u32, rng: BattleRng, log: Vec<BattleEvent>) -> Self {
        Self { tick, rng, log }
    }

    pub const fn tick(&self) -> u32 {
        self.tick
    }

    pub(crate) fn advance_tick(&mut self) {
        self.tick += 1;
    }

    pub fn rng(&mut self) -> &mut BattleRng {
        &mut self.rng
    }

    /// Starts an event stamped with the current tick.
    pub fn event(&self, kind: EventKind) -> BattleEvent {
        BattleEvent::new(self.tick, kind)
    }

    /// Appends an event to the log.
    pub fn emit(&mut self, event: BattleEvent) {
        self.log.push(event);
    }

    pub fn log(&self) -> &[BattleEvent] {
        &self.log
    }

    pub(crate) fn into_parts(self) -> (u32, BattleRng, Vec<BattleEvent>) {
        (self.tick, self.rng, self.log)
    }
}
