//! Ability hooks.
//!
//! An ability is a small struct implementing [`Ability`]. Every callback has a
//! no-op default, so an ability only overrides the lifecycle points it cares
//! about. Kits are looked up by faction through [`AbilityRegistry`] and are
//! never persisted.
//!
//! Hook order during one attack:
//!
//! 1. `on_action` for every attacker ability (may adjust [`TempMods`])
//! 2. damage is computed and applied
//! 3. `on_hit` for every attacker ability
//! 4. `on_death` for every target ability, if the target dropped to 0 hp

mod kits;
mod registry;

pub use kits::{BackRowChannel, UndeadResilience};
pub use registry::AbilityRegistry;

use std::fmt;
use std::sync::Arc;

use crate::context::BattleContext;
use crate::state::UnitRuntime;

/// Lifecycle callbacks. Hooks must not fail; they no-op when not applicable.
pub trait Ability: Send + Sync {
    /// Display name, used in `passive` events.
    fn name(&self) -> &'static str;

    /// Once per unit when the battle is created.
    fn on_battle_start(&self, _ctx: &mut BattleContext, _unit: &mut UnitRuntime) {}

    /// Once per living unit per tick, before AP growth.
    fn on_tick(&self, _ctx: &mut BattleContext, _unit: &mut UnitRuntime) {}

    /// Once per attack, before damage. The only place `mods` may change.
    fn on_action(
        &self,
        _ctx: &mut BattleContext,
        _unit: &UnitRuntime,
        _target: &UnitRuntime,
        _mods: &mut TempMods,
    ) {
    }

    /// Once per attack, after damage was applied.
    fn on_hit(
        &self,
        _ctx: &mut BattleContext,
        _unit: &mut UnitRuntime,
        _target: &mut UnitRuntime,
        _damage: u32,
    ) {
    }

    /// Once, when this unit's hp reaches 0.
    fn on_death(&self, _ctx: &mut BattleContext, _unit: &mut UnitRuntime) {}
}

/// Per-attack multipliers in permille (1000 = ×1.0).
///
/// Created neutral at the start of every attack resolution and dropped when it
/// finishes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TempMods {
    pub physical_permille: u32,
    pub magic_permille: u32,
}

impl TempMods {
    pub const NEUTRAL: Self = Self {
        physical_permille: 1000,
        magic_permille: 1000,
    };

    pub fn scale_physical(&mut self, permille: u32) {
        self.physical_permille = scale_permille(self.physical_permille, permille);
    }

    pub fn scale_magic(&mut self, permille: u32) {
        self.magic_permille = scale_permille(self.magic_permille, permille);
    }
}

impl Default for TempMods {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

fn scale_permille(value: u32, permille: u32) -> u32 {
    let scaled = u64::from(value) * u64::from(permille) / 1000;
    u32::try_from(scaled).unwrap_or(u32::MAX)
}

/// Ordered list of abilities attached to one unit.
#[derive(Clone, Default)]
pub struct AbilityKit(Vec<Arc<dyn Ability>>);

impl AbilityKit {
    pub fn new(abilities: Vec<Arc<dyn Ability>>) -> Self {
        Self(abilities)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Ability>> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.0.iter().map(|ability| ability.name()).collect()
    }
}

impl fmt::Debug for AbilityKit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_mods_compound_multiplicatively() {
        let mut mods = TempMods::default();
        mods.scale_magic(1050);
        mods.scale_magic(1050);
        // 1000 → 1050 → 1102 (truncated)
        assert_eq!(mods.magic_permille, 1102);
        assert_eq!(mods.physical_permille, 1000);
    }

    #[test]
    fn kit_debug_lists_ability_names() {
        let kit = AbilityKit::new(vec![Arc::new(UndeadResilience), Arc::new(BackRowChannel)]);
        assert_eq!(
            format!("{kit:?}"),
            r#"["Undead Resilience", "Back Row Channel"]"#
        );
        assert_eq!(kit.len(), 2);
    }
}
