//! Built-in faction passives.

use super::{Ability, TempMods};
use crate::context::BattleContext;
use crate::state::{EventKind, Row, UnitRuntime};

/// Undead: +10% max HP at battle start, starting at full health.
#[derive(Clone, Copy, Debug, Default)]
pub struct UndeadResilience;

impl UndeadResilience {
    const BONUS_PERCENT: u64 = 110;
}

impl Ability for UndeadResilience {
    fn name(&self) -> &'static str {
        "Undead Resilience"
    }

    fn on_battle_start(&self, ctx: &mut BattleContext, unit: &mut UnitRuntime) {
        let boosted = u64::from(unit.max_hp()) * Self::BONUS_PERCENT / 100;
        unit.set_max_hp(u32::try_from(boosted).unwrap_or(u32::MAX));
        unit.restore_full();
        ctx.emit(
            ctx.event(EventKind::Passive)
                .with_source(&unit.tag)
                .with_meta("name", self.name())
                .with_meta("effect", "+10% max HP"),
        );
    }
}

/// Wild: +5% magic multiplier on each action taken from the back row.
///
/// Stacks with the back-row formation bonus.
#[derive(Clone, Copy, Debug, Default)]
pub struct BackRowChannel;

impl BackRowChannel {
    const MAGIC_PERMILLE: u32 = 1050;
}

impl Ability for BackRowChannel {
    fn name(&self) -> &'static str {
        "Back Row Channel"
    }

    fn on_action(
        &self,
        ctx: &mut BattleContext,
        unit: &UnitRuntime,
        _target: &UnitRuntime,
        mods: &mut TempMods,
    ) {
        if unit.position.row != Row::Back {
            return;
        }
        mods.scale_magic(Self::MAGIC_PERMILLE);
        ctx.emit(
            ctx.event(EventKind::Passive)
                .with_source(&unit.tag)
                .with_meta("name", self.name())
                .with_meta("effect", "+5% magic mult this action"),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abilities::AbilityKit;
    use crate::rng::BattleRng;
    use crate::state::{Faction, Position, Side, UnitSeed, UnitTag};
    use crate::stats::StatBundle;

    fn unit(row: Row, hp: u32) -> UnitRuntime {
        UnitRuntime::new(
            UnitSeed {
                tag: UnitTag::new("player#1"),
                name: "Wight".into(),
                source_id: Some(1),
                side: Side::Player,
                faction: Faction::Undead,
                position: Position::new(row, 0),
                level: 1,
                stats: StatBundle::new(hp, 10, 2, 4, 2, 50),
            },
            AbilityKit::default(),
        )
    }

    fn ctx() -> BattleContext {
        BattleContext::new(0, BattleRng::new(1, 0), Vec::new())
    }

    #[test]
    fn undead_resilience_boosts_max_hp_and_logs() {
        let mut ctx = ctx();
        let mut u = unit(Row::Front, 95);
        UndeadResilience.on_battle_start(&mut ctx, &mut u);

        // 95 * 1.10 = 104.5 → 104
        assert_eq!(u.max_hp(), 104);
        assert_eq!(u.hp(), 104);
        let event = &ctx.log()[0];
        assert_eq!(event.kind, EventKind::Passive);
        assert_eq!(event.meta_text("effect"), Some("+10% max HP"));
    }

    #[test]
    fn back_row_channel_only_fires_in_back_row() {
        let mut ctx = ctx();
        let target = unit(Row::Front, 50);

        let mut mods = TempMods::default();
        BackRowChannel.on_action(&mut ctx, &unit(Row::Front, 50), &target, &mut mods);
        assert_eq!(mods, TempMods::NEUTRAL);
        assert!(ctx.log().is_empty());

        BackRowChannel.on_action(&mut ctx, &unit(Row::Back, 50), &target, &mut mods);
        assert_eq!(mods.magic_permille, 1050);
        assert_eq!(ctx.log().len(), 1);
    }
}
