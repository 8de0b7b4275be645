//! Content factory for assembling battle inputs from data files.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use battle_core::{BattleConfig, FormationMap, HeroDefinition, HeroTemplate};
use tracing::debug;

use crate::catalog::{EncounterSpec, HeroCatalog, SquadSpec};
use crate::loaders::{ConfigLoader, EncounterLoader, HeroLoader, LoadResult, SquadLoader};

/// Content factory that loads all battle content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── battle.toml
/// ├── heroes.ron
/// ├── squad.ron
/// └── encounters.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load engine configuration from `battle.toml`.
    ///
    /// A missing file yields the default config.
    pub fn load_config(&self) -> LoadResult<BattleConfig> {
        let path = self.data_dir.join("battle.toml");
        if !path.exists() {
            debug!(target: "battle_content", path = %path.display(), "no config file, using defaults");
            return Ok(BattleConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load the hero catalog from `heroes.ron`.
    pub fn load_heroes(&self) -> LoadResult<HeroCatalog> {
        HeroLoader::load(&self.data_dir.join("heroes.ron"))
    }

    /// Load the player squad from `squad.ron`.
    pub fn load_squad(&self) -> LoadResult<SquadSpec> {
        SquadLoader::load(&self.data_dir.join("squad.ron"))
    }

    /// Load encounters from `encounters.ron`.
    pub fn load_encounters(&self) -> LoadResult<BTreeMap<String, EncounterSpec>> {
        EncounterLoader::load(&self.data_dir.join("encounters.ron"))
    }

    /// Load a single encounter by id.
    pub fn load_encounter(&self, id: &str) -> LoadResult<EncounterSpec> {
        let mut encounters = self.load_encounters()?;
        encounters.remove(id).ok_or_else(|| {
            let known: Vec<_> = encounters.keys().map(String::as_str).collect();
            anyhow::anyhow!("Unknown encounter '{}' (known: {})", id, known.join(", "))
        })
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

/// Resolves squad members against the catalog into hero definitions and the
/// formation map consumed by [`battle_core::build_player_units`].
pub fn resolve_squad(
    catalog: &HeroCatalog,
    squad: &SquadSpec,
) -> LoadResult<(Vec<HeroDefinition>, FormationMap)> {
    let mut definitions = Vec::with_capacity(squad.members.len());
    let mut formation = FormationMap::new();

    for member in &squad.members {
        let template = lookup(catalog, &member.hero)?;
        if formation.insert(member.source_id, member.position).is_some() {
            anyhow::bail!("Squad lists hero {} twice", member.source_id);
        }
        definitions.push(HeroDefinition {
            source_id: Some(member.source_id),
            level: member.level,
            template: template.clone(),
        });
    }

    debug!(target: "battle_content", heroes = definitions.len(), "resolved squad");
    Ok((definitions, formation))
}

/// Resolves an encounter's enemy ids against the catalog, in placement order.
pub fn resolve_encounter(
    catalog: &HeroCatalog,
    encounter: &EncounterSpec,
) -> LoadResult<Vec<HeroTemplate>> {
    let templates = encounter
        .enemies
        .iter()
        .map(|id| lookup(catalog, id).cloned())
        .collect::<LoadResult<Vec<_>>>()?;

    debug!(
        target: "battle_content",
        encounter = %encounter.name,
        enemies = templates.len(),
        "resolved encounter"
    );
    Ok(templates)
}

fn lookup<'a>(catalog: &'a HeroCatalog, id: &str) -> LoadResult<&'a HeroTemplate> {
    catalog
        .get(id)
        .ok_or_else(|| anyhow::anyhow!("Unknown hero '{}' in catalog", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SquadMember;
    use battle_core::{Faction, Position, StatBundle};

    fn catalog() -> HeroCatalog {
        HeroCatalog::from_entries([(
            "grub".to_owned(),
            HeroTemplate {
                name: "Grub".into(),
                faction: Faction::Goblin,
                base: StatBundle::new(50, 5, 0, 0, 0, 10),
                growth: StatBundle::default(),
            },
        )])
    }

    fn member(source_id: u64, hero: &str, position: Position) -> SquadMember {
        SquadMember {
            source_id,
            hero: hero.to_owned(),
            level: 2,
            position,
        }
    }

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn squad_resolves_to_definitions_and_formation() {
        let squad = SquadSpec {
            members: vec![
                member(7, "grub", Position::front(1)),
                member(8, "grub", Position::back(0)),
            ],
        };
        let (defs, formation) = resolve_squad(&catalog(), &squad).unwrap();

        assert_eq!(defs.len(), 2);
        assert_eq!(defs[0].source_id, Some(7));
        assert_eq!(defs[1].level, 2);
        assert_eq!(formation.get(&8), Some(&Position::back(0)));
    }

    #[test]
    fn unknown_or_duplicate_heroes_are_rejected() {
        let unknown = SquadSpec {
            members: vec![member(1, "dragon", Position::front(0))],
        };
        assert!(resolve_squad(&catalog(), &unknown).is_err());

        let twice = SquadSpec {
            members: vec![
                member(1, "grub", Position::front(0)),
                member(1, "grub", Position::front(1)),
            ],
        };
        assert!(resolve_squad(&catalog(), &twice).is_err());
    }

    #[test]
    fn encounter_keeps_placement_order() {
        let encounter = EncounterSpec {
            name: "Pit".into(),
            level: 1,
            enemies: vec!["grub".into(), "grub".into()],
            tick_limit: None,
        };
        let templates = resolve_encounter(&catalog(), &encounter).unwrap();
        assert_eq!(templates.len(), 2);

        let bad = EncounterSpec {
            enemies: vec!["dragon".into()],
            ..encounter
        };
        assert!(resolve_encounter(&catalog(), &bad).is_err());
    }
}
