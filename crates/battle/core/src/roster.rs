//! Building runtime units from external hero definitions.
//!
//! The data layer hands over already-validated heroes and formations; nothing
//! here rejects input. Stats are derived once, abilities come from the
//! registry.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::abilities::AbilityRegistry;
use crate::config::BattleConfig;
use crate::state::{Faction, HeroId, Position, Side, UnitRuntime, UnitSeed, UnitTag};
use crate::stats::{StatBundle, derive_stats};

/// Hero archetype: identity plus base and per-level growth stats.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroTemplate {
    pub name: String,
    pub faction: Faction,
    pub base: StatBundle,
    pub growth: StatBundle,
}

/// A hero entering battle: template, level and optional owner-side id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroDefinition {
    pub source_id: Option<HeroId>,
    pub level: u32,
    pub template: HeroTemplate,
}

/// Hero id → formation cell, as chosen by the player.
pub type FormationMap = BTreeMap<HeroId, Position>;

/// Cell used for a player hero missing from the formation map.
pub const FALLBACK_POSITION: Position = Position::back(0);

/// Builds a single unit.
pub fn build_unit(
    definition: &HeroDefinition,
    side: Side,
    position: Position,
    ordinal: usize,
    registry: &AbilityRegistry,
) -> UnitRuntime {
    let template = &definition.template;
    let seed = UnitSeed {
        tag: UnitTag::for_unit(side, definition.source_id, ordinal),
        name: template.name.clone(),
        source_id: definition.source_id,
        side,
        faction: template.faction,
        position,
        level: definition.level.max(1),
        stats: derive_stats(template.base, template.growth, definition.level),
    };
    UnitRuntime::new(seed, registry.hooks_for(template.faction))
}

/// Player units placed according to `formation`.
///
/// Heroes without an entry fall back to [`FALLBACK_POSITION`].
pub fn build_player_units(
    definitions: &[HeroDefinition],
    formation: &FormationMap,
    registry: &AbilityRegistry,
) -> Vec<UnitRuntime> {
    definitions
        .iter()
        .enumerate()
        .map(|(ordinal, definition)| {
            let position = definition
                .source_id
                .and_then(|id| formation.get(&id).copied())
                .unwrap_or(FALLBACK_POSITION);
            build_unit(definition, Side::Player, position, ordinal, registry)
        })
        .collect()
}

/// Enemy units at `level`, auto-placed.
///
/// At most [`BattleConfig::MAX_ENEMY_UNITS`]: the first two take front slots
/// 0 and 1, the rest fill the back row from slot 0.
pub fn build_enemy_units(
    templates: &[HeroTemplate],
    level: u32,
    registry: &AbilityRegistry,
) -> Vec<UnitRuntime> {
    templates
        .iter()
        .take(BattleConfig::MAX_ENEMY_UNITS)
        .enumerate()
        .map(|(ordinal, template)| {
            let definition = HeroDefinition {
                source_id: None,
                level,
                template: template.clone(),
            };
            build_unit(
                &definition,
                Side::Enemy,
                enemy_position(ordinal),
                ordinal,
                registry,
            )
        })
        .collect()
}

fn enemy_position(ordinal: usize) -> Position {
    const FRONT_SLOTS: usize = 2;
    let slot = |n: usize| u8::try_from(n).unwrap_or(u8::MAX);
    if ordinal < FRONT_SLOTS {
        Position::front(slot(ordinal))
    } else {
        Position::back(slot(ordinal - FRONT_SLOTS))
    }
}
