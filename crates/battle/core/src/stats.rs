//! Stat derivation.
//!
//! Heroes are stored as `(base, growth, level)`. The flat [`StatBundle`] used in
//! battle is computed once, when the unit enters the formation, and never
//! changes afterwards. Only `hp`/`max_hp` on the runtime unit move.

use serde::{Deserialize, Serialize};

/// The six combat attributes of a unit.
///
/// - **hp**: starting (and maximum) health
/// - **atk** / **def**: physical attack and defense
/// - **matk** / **mdef**: magic attack and defense
/// - **speed**: drives AP growth and turn order
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatBundle {
    pub hp: u32,
    pub atk: u32,
    pub def: u32,
    pub matk: u32,
    pub mdef: u32,
    pub speed: u32,
}

impl StatBundle {
    pub const fn new(hp: u32, atk: u32, def: u32, matk: u32, mdef: u32, speed: u32) -> Self {
        Self {
            hp,
            atk,
            def,
            matk,
            mdef,
            speed,
        }
    }

    /// `self + other * times`, saturating at `u32::MAX`.
    fn add_scaled(self, other: Self, times: u32) -> Self {
        let step = |base: u32, growth: u32| base.saturating_add(growth.saturating_mul(times));
        Self {
            hp: step(self.hp, other.hp),
            atk: step(self.atk, other.atk),
            def: step(self.def, other.def),
            matk: step(self.matk, other.matk),
            mdef: step(self.mdef, other.mdef),
            speed: step(self.speed, other.speed),
        }
    }
}

/// Computes `base + growth * (level - 1)` for every stat.
///
/// `level` is clamped to a minimum of 1, so level 0 yields the base stats.
pub fn derive_stats(base: StatBundle, growth: StatBundle, level: u32) -> StatBundle {
    let steps = level.max(1) - 1;
    base.add_scaled(growth, steps)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: StatBundle = StatBundle::new(100, 20, 8, 5, 6, 40);
    const GROWTH: StatBundle = StatBundle::new(10, 3, 1, 0, 1, 2);

    #[test]
    fn level_one_is_base() {
        assert_eq!(derive_stats(BASE, GROWTH, 1), BASE);
    }

    #[test]
    fn level_zero_is_clamped_to_one() {
        assert_eq!(derive_stats(BASE, GROWTH, 0), BASE);
    }

    #[test]
    fn growth_applies_per_level_above_one() {
        // Level 5 → four growth steps
        let stats = derive_stats(BASE, GROWTH, 5);
        assert_eq!(stats.hp, 140); // 100 + 10 * 4
        assert_eq!(stats.atk, 32); // 20 + 3 * 4
        assert_eq!(stats.def, 12);
        assert_eq!(stats.matk, 5);
        assert_eq!(stats.mdef, 10);
        assert_eq!(stats.speed, 48);
    }

    #[test]
    fn huge_levels_saturate() {
        let stats = derive_stats(BASE, GROWTH, u32::MAX);
        assert_eq!(stats.hp, u32::MAX);
        assert_eq!(stats.matk, 5);
    }
}
