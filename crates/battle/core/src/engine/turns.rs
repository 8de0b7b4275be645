//! Tick scheduling: AP growth, turn order, pauses and victory detection.

use tracing::{debug, info};

use super::battle::{Battle, UnitRef};
use crate::combat::{choose_target, settle_death};
use crate::state::{BattlePhase, EventKind, Side, Winner};

impl Battle<'_> {
    /// Runs ticks until a player unit must act, the battle is decided, or the
    /// tick limit is reached. No-op unless the phase is `Running`.
    ///
    /// Per tick:
    /// 1. victory check
    /// 2. `on_tick` for every living unit
    /// 3. AP growth, clamped to the threshold
    /// 4. ready units act in order; enemies act, a player pauses the loop
    ///
    /// Units already ready when the call starts (e.g. enemies that shared the
    /// tick of a player action) are resolved before the clock moves.
    pub fn run_until_pause(&mut self) {
        if self.phase != BattlePhase::Running {
            return;
        }
        if self.resolve_ready() {
            return;
        }

        while self.ctx.tick() < self.tick_limit {
            self.ctx.advance_tick();
            if self.finish_if_decided() {
                return;
            }
            self.dispatch_on_tick();
            self.grow_ap();
            if self.resolve_ready() {
                return;
            }
        }

        self.finish(Winner::Draw);
    }

    /// Acts out every ready unit. Returns true when the pass must yield.
    fn resolve_ready(&mut self) -> bool {
        loop {
            if self.finish_if_decided() {
                return true;
            }
            let Some(next) = self.next_ready() else {
                return false;
            };
            match next.side {
                Side::Player => {
                    self.pause(next);
                    return true;
                }
                Side::Enemy => self.auto_turn(next),
            }
        }
    }

    /// Highest-speed ready unit, ties broken by a seeded random key.
    ///
    /// Keys are drawn only when more than one unit is ready.
    fn next_ready(&mut self) -> Option<UnitRef> {
        let threshold = self.config.turn_threshold;
        let mut ready: Vec<(UnitRef, u32)> = Vec::new();
        for side in [Side::Player, Side::Enemy] {
            for (index, unit) in self.units(side).iter().enumerate() {
                if unit.is_ready(threshold) {
                    ready.push((UnitRef::new(side, index), unit.stats.speed));
                }
            }
        }

        if ready.len() <= 1 {
            return ready.first().map(|(unit, _)| *unit);
        }

        let rng = self.ctx.rng();
        ready
            .into_iter()
            .map(|(unit, speed)| (speed, rng.next_u32(), unit))
            .max_by_key(|&(speed, key, _)| (speed, key))
            .map(|(_, _, unit)| unit)
    }

    /// Automatic turn: weighted-random target on the opposing side.
    fn auto_turn(&mut self, actor: UnitRef) {
        let opponents = actor.side.opposite();
        let target = choose_target(
            &mut self.ctx,
            &self.config.formation,
            match opponents {
                Side::Player => &self.players,
                Side::Enemy => &self.enemies,
            },
        );

        match target {
            Some(index) => {
                self.strike(actor, UnitRef::new(opponents, index));
            }
            None => {
                if let Some(unit) = self.unit_mut(actor) {
                    unit.reset_ap();
                }
            }
        }
    }

    fn pause(&mut self, actor: UnitRef) {
        let Some(unit) = self.unit(actor) else {
            return;
        };
        let tag = unit.tag.clone();
        let ap = unit.ap();

        self.ctx
            .emit(self.ctx.event(EventKind::Pause).with_source(&tag).with_meta("ap", ap));
        debug!(
            target: "battle::engine",
            tick = self.ctx.tick(),
            actor = %tag,
            "awaiting player action"
        );
        self.phase = BattlePhase::AwaitPlayer;
        self.awaiting = Some(tag);
    }

    fn dispatch_on_tick(&mut self) {
        let Self {
            players,
            enemies,
            ctx,
            ..
        } = self;
        for unit in players.iter_mut().chain(enemies.iter_mut()) {
            if !unit.is_alive() {
                continue;
            }
            let kit = unit.abilities.clone();
            for ability in kit.iter() {
                ability.on_tick(ctx, unit);
                if !unit.is_alive() {
                    settle_death(ctx, unit, None);
                    break;
                }
            }
        }
    }

    fn grow_ap(&mut self) {
        let threshold = self.config.turn_threshold;
        let divisor = self.config.speed_divisor;
        for unit in self.players.iter_mut().chain(self.enemies.iter_mut()) {
            if unit.is_alive() {
                let gain = unit.ap_gain(divisor);
                unit.grow_ap(gain, threshold);
            }
        }
    }

    fn decided_winner(&self) -> Option<Winner> {
        match (self.living(Side::Player), self.living(Side::Enemy)) {
            (0, 0) => Some(Winner::Draw),
            (0, _) => Some(Winner::Enemy),
            (_, 0) => Some(Winner::Player),
            _ => None,
        }
    }

    fn finish_if_decided(&mut self) -> bool {
        match self.decided_winner() {
            Some(winner) => {
                self.finish(winner);
                true
            }
            None => false,
        }
    }

    pub(super) fn finish(&mut self, winner: Winner) {
        self.ctx.emit(
            self.ctx
                .event(EventKind::End)
                .with_meta("winner", winner.to_string()),
        );
        self.phase = BattlePhase::Ended;
        self.winner = Some(winner);
        self.awaiting = None;
        info!(
            target: "battle::engine",
            tick = self.ctx.tick(),
            %winner,
            "battle ended"
        );
    }
}
