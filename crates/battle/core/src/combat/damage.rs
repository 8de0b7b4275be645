//! Damage calculation.
//!
//! # Formula
//!
//! ```text
//! base   = max(atk - def * defense_factor, 1)
//! damage = base
//!        × row physical   (front row only)
//!        × temp physical
//!        × row magic      (back row only)
//!        × temp magic
//!        × variance       (1 ± damage_variance_pct)
//! damage = max(damage, 1)
//! ```
//!
//! Every multiplier is in permille and every step truncates, so the result
//! never rounds up and is identical on every platform.

use crate::abilities::TempMods;
use crate::config::BattleConfig;
use crate::state::{Row, UnitRuntime};

/// `max(atk - def * factor, 1)` with `factor` in permille.
pub fn base_damage(atk: u32, def: u32, defense_factor_permille: u32) -> u32 {
    let mitigation = u64::from(def) * u64::from(defense_factor_permille) / 1000;
    let raw = u64::from(atk).saturating_sub(mitigation);
    u32::try_from(raw).unwrap_or(u32::MAX).max(1)
}

/// Final damage for one attack. `variance_permille` is the pre-rolled
/// variance factor (1000 = no variance).
pub fn calculate_damage(
    config: &BattleConfig,
    attacker: &UnitRuntime,
    target: &UnitRuntime,
    mods: TempMods,
    variance_permille: u32,
) -> u32 {
    let formation = &config.formation;
    let (row_physical, row_magic) = match attacker.position.row {
        Row::Front => (formation.front_physical_permille, 1000),
        Row::Back => (1000, formation.back_magic_permille),
    };

    let base = base_damage(
        attacker.stats.atk,
        target.stats.def,
        config.defense_factor_permille,
    );

    [
        row_physical,
        mods.physical_permille,
        row_magic,
        mods.magic_permille,
        variance_permille,
    ]
    .into_iter()
    .fold(base, apply_permille)
    .max(1)
}

fn apply_permille(value: u32, permille: u32) -> u32 {
    let scaled = u64::from(value) * u64::from(permille) / 1000;
    u32::try_from(scaled).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abilities::AbilityKit;
    use crate::state::{Faction, Position, Side, UnitSeed, UnitTag};
    use crate::stats::StatBundle;

    fn unit(position: Position, atk: u32, def: u32) -> UnitRuntime {
        UnitRuntime::new(
            UnitSeed {
                tag: UnitTag::new("player#1"),
                name: "Unit".into(),
                source_id: Some(1),
                side: Side::Player,
                faction: Faction::Goblin,
                position,
                level: 1,
                stats: StatBundle::new(100, atk, def, 0, 0, 10),
            },
            AbilityKit::default(),
        )
    }

    #[test]
    fn base_damage_subtracts_half_defense() {
        assert_eq!(base_damage(20, 10, 500), 15);
        // 20 - 7.5 = 12.5 → mitigation truncates to 7 → 13
        assert_eq!(base_damage(20, 15, 500), 13);
    }

    #[test]
    fn base_damage_is_never_below_one() {
        assert_eq!(base_damage(5, 100, 500), 1);
        assert_eq!(base_damage(0, 0, 500), 1);
    }

    #[test]
    fn front_row_gets_physical_bonus() {
        let config = BattleConfig::default();
        let attacker = unit(Position::front(0), 20, 0);
        let target = unit(Position::front(0), 0, 0);

        // 20 × 1.15 = 23
        assert_eq!(
            calculate_damage(&config, &attacker, &target, TempMods::NEUTRAL, 1000),
            23
        );
    }

    #[test]
    fn back_row_gets_magic_bonus_and_stacks_temp_mods() {
        let config = BattleConfig::default();
        let attacker = unit(Position::back(0), 20, 0);
        let target = unit(Position::front(0), 0, 0);

        // 20 × 1.05 = 21
        assert_eq!(
            calculate_damage(&config, &attacker, &target, TempMods::NEUTRAL, 1000),
            21
        );

        let mut mods = TempMods::NEUTRAL;
        mods.scale_magic(1050);
        // 21 × 1.05 = 22.05 → 22
        assert_eq!(calculate_damage(&config, &attacker, &target, mods, 1000), 22);
    }

    #[test]
    fn variance_scales_after_multipliers() {
        let config = BattleConfig::default();
        let attacker = unit(Position::front(0), 20, 0);
        let target = unit(Position::front(0), 0, 0);

        // 23 × 0.9 = 20.7 → 20, 23 × 1.1 = 25.3 → 25
        assert_eq!(
            calculate_damage(&config, &attacker, &target, TempMods::NEUTRAL, 900),
            20
        );
        assert_eq!(
            calculate_damage(&config, &attacker, &target, TempMods::NEUTRAL, 1100),
            25
        );
    }

    #[test]
    fn heavy_mitigation_still_deals_one() {
        let config = BattleConfig::default();
        let attacker = unit(Position::back(0), 1, 0);
        let target = unit(Position::front(0), 0, 500);
        assert_eq!(
            calculate_damage(&config, &attacker, &target, TempMods::NEUTRAL, 900),
            1
        );
    }
}
