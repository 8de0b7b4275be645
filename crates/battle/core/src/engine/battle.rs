//! Live battle: the runtime view of a [`BattleState`] for one invocation.

use tracing::info;

use crate::abilities::AbilityRegistry;
use crate::combat::{AttackReport, resolve_attack, settle_death};
use crate::config::BattleConfig;
use crate::context::BattleContext;
use crate::rng::BattleRng;
use crate::snapshot::{self, SnapshotError};
use crate::state::{
    BattlePhase, BattleState, EventKind, Side, UnitRuntime, UnitTag, Winner,
};

/// Index of a unit within its side's roster.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct UnitRef {
    pub side: Side,
    pub index: usize,
}

impl UnitRef {
    pub const fn new(side: Side, index: usize) -> Self {
        Self { side, index }
    }
}

/// Hydrated battle. Built at the start of an engine call and folded back
/// into a [`BattleState`] at the end.
pub(crate) struct Battle<'a> {
    pub(super) config: &'a BattleConfig,
    pub(super) phase: BattlePhase,
    pub(super) tick_limit: u32,
    pub(super) seed: u64,
    pub(super) winner: Option<Winner>,
    pub(super) awaiting: Option<UnitTag>,
    pub(super) players: Vec<UnitRuntime>,
    pub(super) enemies: Vec<UnitRuntime>,
    pub(super) ctx: BattleContext,
}

impl<'a> Battle<'a> {
    /// Fresh battle at tick 0: logs `start` and runs every `on_battle_start` hook.
    pub fn start(
        config: &'a BattleConfig,
        players: Vec<UnitRuntime>,
        enemies: Vec<UnitRuntime>,
        seed: u64,
        tick_limit: u32,
    ) -> Self {
        let mut ctx = BattleContext::new(0, BattleRng::new(seed, 0), Vec::new());
        ctx.emit(
            ctx.event(EventKind::Start)
                .with_meta("tick_limit", tick_limit)
                .with_meta("players", players.len())
                .with_meta("enemies", enemies.len()),
        );

        let mut battle = Self {
            config,
            phase: BattlePhase::Running,
            tick_limit,
            seed,
            winner: None,
            awaiting: None,
            players,
            enemies,
            ctx,
        };
        battle.dispatch_battle_start();

        info!(
            target: "battle::engine",
            seed,
            tick_limit,
            players = battle.players.len(),
            enemies = battle.enemies.len(),
            "battle created"
        );
        battle
    }

    /// Validates persisted state and rebuilds the runtime units.
    pub fn hydrate(
        state: BattleState,
        config: &'a BattleConfig,
        registry: &AbilityRegistry,
    ) -> Result<Self, SnapshotError> {
        snapshot::validate_state(&state, config)?;

        let players = state
            .player_units
            .iter()
            .map(|record| snapshot::from_record(record, registry))
            .collect();
        let enemies = state
            .enemy_units
            .iter()
            .map(|record| snapshot::from_record(record, registry))
            .collect();

        Ok(Self {
            config,
            phase: state.phase,
            tick_limit: state.tick_limit,
            seed: state.seed,
            winner: state.winner,
            awaiting: state.awaiting,
            players,
            enemies,
            ctx: BattleContext::new(
                state.tick,
                BattleRng::new(state.seed, state.rng_cursor),
                state.log,
            ),
        })
    }

    pub fn into_state(self) -> BattleState {
        let (tick, rng, log) = self.ctx.into_parts();
        BattleState {
            phase: self.phase,
            tick,
            tick_limit: self.tick_limit,
            seed: self.seed,
            rng_cursor: rng.cursor(),
            winner: self.winner,
            awaiting: self.awaiting,
            log,
            player_units: self.players.iter().map(snapshot::to_record).collect(),
            enemy_units: self.enemies.iter().map(snapshot::to_record).collect(),
        }
    }

    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    pub fn units(&self, side: Side) -> &[UnitRuntime] {
        match side {
            Side::Player => &self.players,
            Side::Enemy => &self.enemies,
        }
    }

    pub fn unit(&self, unit: UnitRef) -> Option<&UnitRuntime> {
        self.units(unit.side).get(unit.index)
    }

    pub fn unit_mut(&mut self, unit: UnitRef) -> Option<&mut UnitRuntime> {
        match unit.side {
            Side::Player => self.players.get_mut(unit.index),
            Side::Enemy => self.enemies.get_mut(unit.index),
        }
    }

    pub fn find(&self, tag: &UnitTag) -> Option<UnitRef> {
        [Side::Player, Side::Enemy].into_iter().find_map(|side| {
            self.units(side)
                .iter()
                .position(|unit| &unit.tag == tag)
                .map(|index| UnitRef::new(side, index))
        })
    }

    pub fn living(&self, side: Side) -> usize {
        self.units(side).iter().filter(|unit| unit.is_alive()).count()
    }

    /// Resets the attacker's AP and resolves one attack on an opposing unit.
    ///
    /// Returns `None` if either reference is stale or both sit on the same side.
    pub fn strike(&mut self, attacker: UnitRef, target: UnitRef) -> Option<AttackReport> {
        let config = self.config;
        let Self {
            players,
            enemies,
            ctx,
            ..
        } = self;
        let (actor, victim) = match (attacker.side, target.side) {
            (Side::Player, Side::Enemy) => (
                players.get_mut(attacker.index)?,
                enemies.get_mut(target.index)?,
            ),
            (Side::Enemy, Side::Player) => (
                enemies.get_mut(attacker.index)?,
                players.get_mut(target.index)?,
            ),
            _ => return None,
        };
        actor.reset_ap();
        Some(resolve_attack(ctx, config, actor, victim))
    }

    fn dispatch_battle_start(&mut self) {
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
                ability.on_battle_start(ctx, unit);
                if !unit.is_alive() {
                    settle_death(ctx, unit, None);
                    break;
                }
            }
        }
    }
}
