//! Experience payout and battle summary.
//!
//! # XP
//!
//! ```text
//! player win: win_base_xp + floor(damage_dealt × damage_xp_permille / 1000)
//!                         + kills × kill_xp
//! draw:       draw_xp
//! loss:       loss_xp
//! ```
//!
//! Only player units with a source id are paid. Units spawned without one
//! never appear in the XP map.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::RewardConfig;
use crate::snapshot::UnitRecord;
use crate::state::{BattleEvent, BattleState, EventKind, HeroId, Side, UnitTag, Winner};

/// Highest-damage unit on the winning side.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MvpSummary {
    pub tag: UnitTag,
    pub source_id: Option<HeroId>,
    pub name: String,
    pub side: Side,
    pub damage_dealt: u64,
}

/// Notable moments pulled from the event log.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Highlights {
    /// Largest single attack (earliest one on ties).
    pub biggest_hit: Option<BattleEvent>,
    pub first_death: Option<BattleEvent>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardReport {
    pub winner: Winner,
    /// XP earned, keyed by external hero id.
    pub xp: BTreeMap<HeroId, u32>,
    pub mvp: Option<MvpSummary>,
    pub highlights: Highlights,
}

impl RewardReport {
    pub fn total_xp(&self) -> u64 {
        self.xp.values().map(|&xp| u64::from(xp)).sum()
    }
}

/// Rewards for a finished battle. `None` while the battle is still running.
pub fn calculate_rewards(state: &BattleState, config: &RewardConfig) -> Option<RewardReport> {
    if !state.is_ended() {
        return None;
    }
    let winner = state.winner?;
    Some(report_for(state, winner, config))
}

pub(crate) fn report_for(state: &BattleState, winner: Winner, config: &RewardConfig) -> RewardReport {
    let xp = state
        .player_units
        .iter()
        .filter_map(|unit| Some((unit.source_id?, unit_xp(unit, winner, config))))
        .collect();

    RewardReport {
        winner,
        xp,
        mvp: select_mvp(state, winner),
        highlights: collect_highlights(&state.log),
    }
}

fn unit_xp(unit: &UnitRecord, winner: Winner, config: &RewardConfig) -> u32 {
    match winner {
        Winner::Player => {
            let from_damage = unit
                .damage_dealt
                .saturating_mul(u64::from(config.damage_xp_permille))
                / 1000;
            let from_damage = u32::try_from(from_damage).unwrap_or(u32::MAX);
            config
                .win_base_xp
                .saturating_add(from_damage)
                .saturating_add(unit.kills.saturating_mul(config.kill_xp))
        }
        Winner::Draw => config.draw_xp,
        Winner::Enemy => config.loss_xp,
    }
}

/// First unit with the highest `damage_dealt` on the winning side.
/// No MVP on a draw.
fn select_mvp(state: &BattleState, winner: Winner) -> Option<MvpSummary> {
    let side = winner.side()?;
    let mut best: Option<&UnitRecord> = None;
    for unit in state.units(side) {
        if best.is_none_or(|b| unit.damage_dealt > b.damage_dealt) {
            best = Some(unit);
        }
    }
    best.map(|unit| MvpSummary {
        tag: unit.tag.clone(),
        source_id: unit.source_id,
        name: unit.name.clone(),
        side: unit.side,
        damage_dealt: unit.damage_dealt,
    })
}

fn collect_highlights(log: &[BattleEvent]) -> Highlights {
    let mut biggest_hit: Option<&BattleEvent> = None;
    for event in log.iter().filter(|e| e.kind == EventKind::Attack) {
        let value = event.value.unwrap_or(0);
        if biggest_hit.is_none_or(|b| value > b.value.unwrap_or(0)) {
            biggest_hit = Some(event);
        }
    }

    Highlights {
        biggest_hit: biggest_hit.cloned(),
        first_death: log.iter().find(|e| e.kind == EventKind::Death).cloned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{BattlePhase, Faction, Row};
    use crate::stats::StatBundle;

    fn record(tag: &str, source_id: Option<HeroId>, side: Side, damage: u64, kills: u32) -> UnitRecord {
        UnitRecord {
            tag: UnitTag::new(tag),
            name: tag.to_owned(),
            source_id,
            side,
            faction: Faction::Goblin,
            row: Row::Front,
            slot: 0,
            level: 1,
            stats: StatBundle::new(50, 10, 0, 0, 0, 10),
            hp: 10,
            max_hp: 50,
            ap: 0,
            damage_dealt: damage,
            kills,
        }
    }

    fn ended(winner: Winner) -> BattleState {
        BattleState {
            phase: BattlePhase::Ended,
            tick: 30,
            tick_limit: 100,
            seed: 1,
            rng_cursor: 0,
            winner: Some(winner),
            awaiting: None,
            log: vec![
                BattleEvent::new(3, EventKind::Attack).with_value(12),
                BattleEvent::new(5, EventKind::Attack).with_value(30),
                BattleEvent::new(7, EventKind::Attack).with_value(30),
                BattleEvent::new(7, EventKind::Death).with_source(&UnitTag::new("enemy~0")),
            ],
            player_units: vec![
                record("player#1", Some(1), Side::Player, 250, 2),
                record("player#2", Some(2), Side::Player, 40, 0),
                record("player~2", None, Side::Player, 400, 1),
            ],
            enemy_units: vec![
                record("enemy~0", None, Side::Enemy, 70, 0),
                record("enemy~1", None, Side::Enemy, 70, 1),
            ],
        }
    }

    #[test]
    fn running_battle_has_no_rewards() {
        let mut state = ended(Winner::Player);
        state.phase = BattlePhase::Running;
        state.winner = None;
        assert!(calculate_rewards(&state, &RewardConfig::default()).is_none());
    }

    #[test]
    fn huge_damage_saturates_instead_of_overflowing() {
        let mut state = ended(Winner::Player);
        state.player_units[0].damage_dealt = u64::MAX / 2;
        state.player_units[0].kills = u32::MAX;

        let report = calculate_rewards(&state, &RewardConfig::default()).unwrap();
        assert_eq!(report.xp.get(&1), Some(&u32::MAX));
        assert_eq!(report.xp.get(&2), Some(&124));
    }

    #[test]
    fn win_pays_base_damage_and_kills() {
        let report = calculate_rewards(&ended(Winner::Player), &RewardConfig::default()).unwrap();

        // 120 + 250 × 0.1 + 2 × 25
        assert_eq!(report.xp.get(&1), Some(&195));
        // 120 + 40 × 0.1
        assert_eq!(report.xp.get(&2), Some(&124));
        assert_eq!(report.xp.len(), 2, "units without a source id are never paid");
    }

    #[test]
    fn draw_and_loss_pay_flat_baseline() {
        let config = RewardConfig::default();
        let draw = calculate_rewards(&ended(Winner::Draw), &config).unwrap();
        assert!(draw.xp.values().all(|&xp| xp == config.draw_xp));
        assert_eq!(draw.total_xp(), 2 * u64::from(config.draw_xp));

        let loss = calculate_rewards(&ended(Winner::Enemy), &config).unwrap();
        assert!(loss.xp.values().all(|&xp| xp == config.loss_xp));
    }

    #[test]
    fn mvp_is_top_damage_on_winning_side() {
        let report = calculate_rewards(&ended(Winner::Player), &RewardConfig::default()).unwrap();
        let mvp = report.mvp.unwrap();
        assert_eq!(mvp.tag.as_str(), "player~2");
        assert_eq!(mvp.damage_dealt, 400);
    }

    #[test]
    fn mvp_tie_goes_to_first_unit_in_roster_order() {
        let report = calculate_rewards(&ended(Winner::Enemy), &RewardConfig::default()).unwrap();
        assert_eq!(report.mvp.unwrap().tag.as_str(), "enemy~0");
    }

    #[test]
    fn draw_has_no_mvp() {
        let report = calculate_rewards(&ended(Winner::Draw), &RewardConfig::default()).unwrap();
        assert!(report.mvp.is_none());
    }

    #[test]
    fn highlights_pick_earliest_biggest_hit_and_first_death() {
        let report = calculate_rewards(&ended(Winner::Player), &RewardConfig::default()).unwrap();
        let hit = report.highlights.biggest_hit.unwrap();
        assert_eq!(hit.value, Some(30));
        assert_eq!(hit.tick, 5);
        assert_eq!(report.highlights.first_death.unwrap().tick, 7);
    }
}
