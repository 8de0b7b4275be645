//! Faction → ability kit lookup.

use std::collections::HashMap;
use std::sync::Arc;

use super::{Ability, AbilityKit, BackRowChannel, UndeadResilience};
use crate::state::Faction;

/// Maps each faction to one fixed, ordered kit.
///
/// Lookups are total: a faction without a registered kit gets an empty one.
#[derive(Clone, Debug)]
pub struct AbilityRegistry {
    kits: HashMap<Faction, AbilityKit>,
}

impl AbilityRegistry {
    /// Registry with no kits at all. Every unit fights without passives.
    pub fn empty() -> Self {
        Self {
            kits: HashMap::new(),
        }
    }

    /// Creates a registry with the default faction kits.
    ///
    /// - Undead: [`UndeadResilience`]
    /// - Wild: [`BackRowChannel`]
    /// - Goblin: none
    pub fn default_kits() -> Self {
        Self::empty()
            .with_kit(
                Faction::Undead,
                AbilityKit::new(vec![Arc::new(UndeadResilience) as Arc<dyn Ability>]),
            )
            .with_kit(
                Faction::Wild,
                AbilityKit::new(vec![Arc::new(BackRowChannel) as Arc<dyn Ability>]),
            )
    }

    /// Replaces the kit for `faction` (builder pattern).
    #[must_use]
    pub fn with_kit(mut self, faction: Faction, kit: AbilityKit) -> Self {
        self.register(faction, kit);
        self
    }

    pub fn register(&mut self, faction: Faction, kit: AbilityKit) {
        self.kits.insert(faction, kit);
    }

    /// Kit for `faction`, empty if none is registered.
    pub fn hooks_for(&self, faction: Faction) -> AbilityKit {
        self.kits.get(&faction).cloned().unwrap_or_default()
    }
}

impl Default for AbilityRegistry {
    fn default() -> Self {
        Self::default_kits()
    }
}
