//! Content data types.

use std::collections::BTreeMap;

use battle_core::{HeroId, HeroTemplate, Position};

/// Hero templates keyed by content id (e.g. `"bone_knight"`).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HeroCatalog {
    heroes: BTreeMap<String, HeroTemplate>,
}

impl HeroCatalog {
    pub fn from_entries(entries: impl IntoIterator<Item = (String, HeroTemplate)>) -> Self {
        Self {
            heroes: entries.into_iter().collect(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&HeroTemplate> {
        self.heroes.get(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.heroes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.heroes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heroes.is_empty()
    }
}

/// One owned hero placed in the player's formation.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SquadMember {
    /// Hero-instance id, used as the reward key.
    pub source_id: HeroId,
    /// Catalog id of the hero's template.
    pub hero: String,
    pub level: u32,
    pub position: Position,
}

/// The player's squad, already validated by whoever assembled it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SquadSpec {
    pub members: Vec<SquadMember>,
}

/// A scripted enemy lineup.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EncounterSpec {
    pub name: String,
    pub level: u32,
    /// Catalog ids, in placement order.
    pub enemies: Vec<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub tick_limit: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use battle_core::{Faction, StatBundle};

    #[test]
    fn catalog_lookup_by_id() {
        let catalog = HeroCatalog::from_entries([(
            "grub".to_owned(),
            HeroTemplate {
                name: "Grub".into(),
                faction: Faction::Goblin,
                base: StatBundle::new(50, 5, 0, 0, 0, 10),
                growth: StatBundle::default(),
            },
        )]);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("grub").map(|t| t.name.as_str()), Some("Grub"));
        assert!(catalog.get("dragon").is_none());
        assert_eq!(catalog.ids().collect::<Vec<_>>(), vec!["grub"]);
    }
}
