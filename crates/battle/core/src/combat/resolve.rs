//! Attack resolution.

use tracing::trace;

use super::damage::calculate_damage;
use crate::abilities::TempMods;
use crate::config::BattleConfig;
use crate::context::BattleContext;
use crate::state::{EventKind, UnitRuntime, UnitTag};

/// Outcome of a single attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttackReport {
    pub damage: u32,
    pub killed: bool,
}

/// Resolves one attack from `attacker` on `target`.
///
/// 1. Start from neutral [`TempMods`]
/// 2. `on_action` for every attacker ability
/// 3. Roll variance and compute damage (at least 1)
/// 4. Subtract from target hp, floored at 0
/// 5. Emit an `attack` event
/// 6. `on_hit` for every attacker ability
/// 7. Credit `damage_dealt`
/// 8. On a kill: credit the kill and settle the target's death
/// 9. If an `on_hit` hook dropped the attacker to 0 hp, settle its death too
pub fn resolve_attack(
    ctx: &mut BattleContext,
    config: &BattleConfig,
    attacker: &mut UnitRuntime,
    target: &mut UnitRuntime,
) -> AttackReport {
    let mut mods = TempMods::NEUTRAL;
    let kit = attacker.abilities.clone();
    for ability in kit.iter() {
        ability.on_action(ctx, attacker, target, &mut mods);
    }

    let variance = ctx.rng().variance_permille(config.damage_variance_pct);
    let damage = calculate_damage(config, attacker, target, mods, variance);
    target.take_damage(damage);

    ctx.emit(
        ctx.event(EventKind::Attack)
            .with_source(&attacker.tag)
            .with_target(&target.tag)
            .with_value(i64::from(damage))
            .with_meta("row", attacker.position.row.to_string())
            .with_meta("target_row", target.position.row.to_string())
            .with_meta("target_hp", target.hp()),
    );

    for ability in kit.iter() {
        ability.on_hit(ctx, attacker, target, damage);
        if !attacker.is_alive() {
            break;
        }
    }
    attacker.damage_dealt = attacker.damage_dealt.saturating_add(u64::from(damage));

    let killed = !target.is_alive();
    if killed {
        attacker.kills += 1;
        settle_death(ctx, target, Some(&attacker.tag));
    }
    if !attacker.is_alive() {
        settle_death(ctx, attacker, None);
    }

    trace!(
        target: "battle::combat",
        tick = ctx.tick(),
        attacker = %attacker.tag,
        defender = %target.tag,
        damage,
        killed,
        "attack resolved"
    );

    AttackReport { damage, killed }
}

/// Logs a `death` event for `unit` and runs its `on_death` hooks.
///
/// Call exactly once, right after the unit's hp reached 0.
pub fn settle_death(ctx: &mut BattleContext, unit: &mut UnitRuntime, killer: Option<&UnitTag>) {
    let mut event = ctx.event(EventKind::Death).with_source(&unit.tag);
    if let Some(killer) = killer {
        event = event.with_meta("killer", killer.as_str());
    }
    ctx.emit(event);

    let kit = unit.abilities.clone();
    for ability in kit.iter() {
        ability.on_death(ctx, unit);
    }
}
