//! Target selection.

use crate::config::FormationConfig;
use crate::context::BattleContext;
use crate::state::{Row, UnitRuntime};

/// Picks a living unit from `candidates`, returning its index.
///
/// Each living unit is weighted by its row (`front_target_weight` or
/// `back_target_weight`), so the front row draws more fire without shielding
/// the back row entirely. Returns `None` when nobody is alive.
pub fn choose_target(
    ctx: &mut BattleContext,
    formation: &FormationConfig,
    candidates: &[UnitRuntime],
) -> Option<usize> {
    let living: Vec<usize> = living_indices(candidates);
    let weights: Vec<u32> = living
        .iter()
        .map(|&i| match candidates[i].position.row {
            Row::Front => formation.front_target_weight,
            Row::Back => formation.back_target_weight,
        })
        .collect();

    let pick = ctx.rng().weighted_index(&weights)?;
    living.get(pick).copied()
}

/// Uniformly random living unit from `candidates`.
pub fn random_living(ctx: &mut BattleContext, candidates: &[UnitRuntime]) -> Option<usize> {
    let living = living_indices(candidates);
    let pick = ctx.rng().pick_index(living.len())?;
    living.get(pick).copied()
}

fn living_indices(candidates: &[UnitRuntime]) -> Vec<usize> {
    candidates
        .iter()
        .enumerate()
        .filter(|(_, unit)| unit.is_alive())
        .map(|(i, _)| i)
        .collect()
}
