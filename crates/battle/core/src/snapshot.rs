//! Battle state serialization.
//!
//! Units cross the request boundary as flat [`UnitRecord`]s. Abilities and
//! per-attack scratch state are dropped on the way out; abilities come back
//! from the [`AbilityRegistry`] keyed by the record's faction.
//!
//! Decoding is strict. Persisted state that breaks an invariant is rejected
//! with a [`SnapshotError`] instead of being patched into something playable.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::abilities::AbilityRegistry;
use crate::config::BattleConfig;
use crate::error::{BattleError, ErrorSeverity};
use crate::state::{
    BattlePhase, BattleState, Faction, HeroId, Position, Row, Side, UnitRuntime, UnitSeed,
    UnitTag, Winner,
};
use crate::stats::StatBundle;

/// Hook-free, transport-safe form of a [`UnitRuntime`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitRecord {
    pub tag: UnitTag,
    pub name: String,
    pub source_id: Option<HeroId>,
    pub side: Side,
    pub faction: Faction,
    pub row: Row,
    pub slot: u8,
    pub level: u32,
    pub stats: StatBundle,
    pub hp: u32,
    pub max_hp: u32,
    pub ap: u32,
    pub damage_dealt: u64,
    pub kills: u32,
}

impl UnitRecord {
    pub const fn position(&self) -> Position {
        Position::new(self.row, self.slot)
    }

    pub const fn is_alive(&self) -> bool {
        self.hp > 0
    }
}

/// Errors raised when persisted battle state cannot be trusted.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("failed to decode battle state: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("failed to encode battle state: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("unit {tag}: hp {hp} outside 0..={max_hp}")]
    HpOutOfRange { tag: UnitTag, hp: u32, max_hp: u32 },

    #[error("unit {tag}: ap {ap} above threshold {threshold}")]
    ApOutOfRange { tag: UnitTag, ap: u32, threshold: u32 },

    #[error("unit {tag}: slot {slot} outside the formation")]
    SlotOutOfRange { tag: UnitTag, slot: u8 },

    #[error("unit {tag} is stored with the {expected} units but belongs to {actual}")]
    SideMismatch {
        tag: UnitTag,
        expected: Side,
        actual: Side,
    },

    #[error("unit tag {0} appears more than once")]
    DuplicateTag(UnitTag),

    #[error("phase {phase} is inconsistent: {detail}")]
    PhaseInvariant {
        phase: BattlePhase,
        detail: &'static str,
    },

    #[error("awaiting actor {0} is not a player unit")]
    UnknownAwaitingActor(UnitTag),

    #[error("tick {tick} is beyond tick limit {tick_limit}")]
    TickBeyondLimit { tick: u32, tick_limit: u32 },
}

impl BattleError for SnapshotError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Decode(_) => ErrorSeverity::Validation,
            Self::Encode(_) => ErrorSeverity::Internal,
            _ => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Decode(_) => "SNAPSHOT_DECODE",
            Self::Encode(_) => "SNAPSHOT_ENCODE",
            Self::HpOutOfRange { .. } => "SNAPSHOT_HP_OUT_OF_RANGE",
            Self::ApOutOfRange { .. } => "SNAPSHOT_AP_OUT_OF_RANGE",
            Self::SlotOutOfRange { .. } => "SNAPSHOT_SLOT_OUT_OF_RANGE",
            Self::SideMismatch { .. } => "SNAPSHOT_SIDE_MISMATCH",
            Self::DuplicateTag(_) => "SNAPSHOT_DUPLICATE_TAG",
            Self::PhaseInvariant { .. } => "SNAPSHOT_PHASE_INVARIANT",
            Self::UnknownAwaitingActor(_) => "SNAPSHOT_UNKNOWN_AWAITING_ACTOR",
            Self::TickBeyondLimit { .. } => "SNAPSHOT_TICK_BEYOND_LIMIT",
        }
    }
}

/// Flattens a runtime unit. Abilities are not persisted.
pub fn to_record(unit: &UnitRuntime) -> UnitRecord {
    UnitRecord {
        tag: unit.tag.clone(),
        name: unit.name.clone(),
        source_id: unit.source_id,
        side: unit.side,
        faction: unit.faction,
        row: unit.position.row,
        slot: unit.position.slot,
        level: unit.level,
        stats: unit.stats,
        hp: unit.hp(),
        max_hp: unit.max_hp(),
        ap: unit.ap(),
        damage_dealt: unit.damage_dealt,
        kills: unit.kills,
    }
}

/// Rebuilds a runtime unit, re-deriving its abilities from the faction.
///
/// Expects a record that passed [`validate_state`].
pub fn from_record(record: &UnitRecord, registry: &AbilityRegistry) -> UnitRuntime {
    let seed = UnitSeed {
        tag: record.tag.clone(),
        name: record.name.clone(),
        source_id: record.source_id,
        side: record.side,
        faction: record.faction,
        position: record.position(),
        level: record.level,
        stats: record.stats,
    };
    let mut unit = UnitRuntime::new(seed, registry.hooks_for(record.faction)).with_meters(
        record.hp,
        record.max_hp,
        record.ap,
    );
    unit.damage_dealt = record.damage_dealt;
    unit.kills = record.kills;
    unit
}

/// Serializes battle state to JSON.
pub fn encode_state(state: &BattleState) -> Result<String, SnapshotError> {
    serde_json::to_string(state).map_err(SnapshotError::Encode)
}

/// Parses and validates battle state from JSON.
pub fn decode_state(json: &str, config: &BattleConfig) -> Result<BattleState, SnapshotError> {
    let state: BattleState = serde_json::from_str(json)?;
    validate_state(&state, config)?;
    Ok(state)
}

/// Checks the structural invariants of persisted state.
pub fn validate_state(state: &BattleState, config: &BattleConfig) -> Result<(), SnapshotError> {
    validate_phase(state)?;

    if state.tick > state.tick_limit {
        return Err(SnapshotError::TickBeyondLimit {
            tick: state.tick,
            tick_limit: state.tick_limit,
        });
    }

    let mut seen = HashSet::new();
    for (expected, units) in [
        (Side::Player, &state.player_units),
        (Side::Enemy, &state.enemy_units),
    ] {
        for unit in units {
            validate_unit(unit, expected, config)?;
            if !seen.insert(&unit.tag) {
                return Err(SnapshotError::DuplicateTag(unit.tag.clone()));
            }
        }
    }

    validate_winner(state)?;

    if let Some(actor) = &state.awaiting {
        if !state.player_units.iter().any(|unit| &unit.tag == actor) {
            return Err(SnapshotError::UnknownAwaitingActor(actor.clone()));
        }
    }

    Ok(())
}

fn validate_phase(state: &BattleState) -> Result<(), SnapshotError> {
    let detail = match state.phase {
        BattlePhase::AwaitPlayer if state.awaiting.is_none() => "no awaiting actor",
        BattlePhase::Running | BattlePhase::Ended if state.awaiting.is_some() => {
            "awaiting actor outside AWAIT_PLAYER"
        }
        BattlePhase::Ended if state.winner.is_none() => "ended without a winner",
        BattlePhase::Running | BattlePhase::AwaitPlayer if state.winner.is_some() => {
            "winner set before the battle ended"
        }
        _ => return Ok(()),
    };
    warn!(target: "battle::snapshot", phase = %state.phase, detail, "rejecting battle state");
    Err(SnapshotError::PhaseInvariant {
        phase: state.phase,
        detail,
    })
}

/// The recorded winner must agree with who is still standing: a side wins
/// only when it has living units and the other has none, and a draw leaves
/// either both sides standing (tick limit) or both wiped out.
fn validate_winner(state: &BattleState) -> Result<(), SnapshotError> {
    let Some(winner) = state.winner else {
        return Ok(());
    };
    let players = state.living(Side::Player);
    let enemies = state.living(Side::Enemy);
    let consistent = match winner {
        Winner::Player => players > 0 && enemies == 0,
        Winner::Enemy => enemies > 0 && players == 0,
        Winner::Draw => (players == 0) == (enemies == 0),
    };
    if consistent {
        return Ok(());
    }

    let detail = "winner contradicts the living units";
    warn!(
        target: "battle::snapshot",
        %winner,
        players,
        enemies,
        detail,
        "rejecting battle state"
    );
    Err(SnapshotError::PhaseInvariant {
        phase: state.phase,
        detail,
    })
}

fn validate_unit(
    unit: &UnitRecord,
    expected: Side,
    config: &BattleConfig,
) -> Result<(), SnapshotError> {
    if unit.side != expected {
        return Err(SnapshotError::SideMismatch {
            tag: unit.tag.clone(),
            expected,
            actual: unit.side,
        });
    }
    if unit.max_hp == 0 || unit.hp > unit.max_hp {
        return Err(SnapshotError::HpOutOfRange {
            tag: unit.tag.clone(),
            hp: unit.hp,
            max_hp: unit.max_hp,
        });
    }
    if unit.ap > config.turn_threshold {
        return Err(SnapshotError::ApOutOfRange {
            tag: unit.tag.clone(),
            ap: unit.ap,
            threshold: config.turn_threshold,
        });
    }
    if unit.slot >= BattleConfig::MAX_SLOTS_PER_ROW {
        return Err(SnapshotError::SlotOutOfRange {
            tag: unit.tag.clone(),
            slot: unit.slot,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(tag: &str, side: Side, faction: Faction) -> UnitRecord {
        UnitRecord {
            tag: UnitTag::new(tag),
            name: "Bone Guard".into(),
            source_id: Some(4),
            side,
            faction,
            row: Row::Front,
            slot: 1,
            level: 3,
            stats: StatBundle::new(80, 12, 6, 2, 4, 35),
            hp: 40,
            max_hp: 88,
            ap: 70,
            damage_dealt: 120,
            kills: 2,
        }
    }

    fn state() -> BattleState {
        BattleState {
            phase: BattlePhase::Running,
            tick: 10,
            tick_limit: 50,
            seed: 1,
            rng_cursor: 4,
            winner: None,
            awaiting: None,
            log: Vec::new(),
            player_units: vec![record("player#4", Side::Player, Faction::Undead)],
            enemy_units: vec![record("enemy~0", Side::Enemy, Faction::Goblin)],
        }
    }

    #[test]
    fn record_round_trip_rederives_abilities() {
        let registry = AbilityRegistry::default();
        let original = record("player#4", Side::Player, Faction::Undead);

        let unit = from_record(&original, &registry);
        assert_eq!(unit.abilities.names(), vec!["Undead Resilience"]);
        assert_eq!(unit.hp(), 40);
        assert_eq!(unit.max_hp(), 88);
        assert_eq!(unit.ap(), 70);
        assert_eq!(unit.kills, 2);
        assert_eq!(to_record(&unit), original);
    }

    #[test]
    fn known_faction_without_kit_rehydrates_with_no_hooks() {
        let unit = from_record(
            &record("player#4", Side::Player, Faction::Goblin),
            &AbilityRegistry::default(),
        );
        assert!(unit.abilities.is_empty());
    }

    #[test]
    fn unknown_faction_tag_fails_to_decode() {
        let json = encode_state(&state())
            .unwrap()
            .replace("\"Goblin\"", "\"Dragon\"");
        let err = decode_state(&json, &BattleConfig::default()).unwrap_err();
        assert!(matches!(err, SnapshotError::Decode(_)));
        assert_eq!(err.error_code(), "SNAPSHOT_DECODE");
    }

    #[test]
    fn encoded_state_decodes_to_same_value() {
        let json = encode_state(&state()).unwrap();
        let back = decode_state(&json, &BattleConfig::default()).unwrap();
        assert_eq!(back, state());
    }

    #[test]
    fn hp_above_max_is_rejected() {
        let mut s = state();
        s.player_units[0].hp = 100;
        let err = validate_state(&s, &BattleConfig::default()).unwrap_err();
        assert!(matches!(err, SnapshotError::HpOutOfRange { hp: 100, .. }));
        assert_eq!(err.severity(), ErrorSeverity::Fatal);
    }

    #[test]
    fn ap_above_threshold_is_rejected() {
        let mut s = state();
        s.enemy_units[0].ap = 101;
        assert!(matches!(
            validate_state(&s, &BattleConfig::default()),
            Err(SnapshotError::ApOutOfRange { ap: 101, .. })
        ));
    }

    #[test]
    fn units_on_the_wrong_side_are_rejected() {
        let mut s = state();
        s.enemy_units[0].side = Side::Player;
        assert!(matches!(
            validate_state(&s, &BattleConfig::default()),
            Err(SnapshotError::SideMismatch { .. })
        ));
    }

    #[test]
    fn duplicate_tags_are_rejected() {
        let mut s = state();
        s.enemy_units[0].tag = UnitTag::new("player#4");
        assert!(matches!(
            validate_state(&s, &BattleConfig::default()),
            Err(SnapshotError::DuplicateTag(_))
        ));
    }

    #[test]
    fn phase_fields_must_agree() {
        let config = BattleConfig::default();

        let mut paused_without_actor = state();
        paused_without_actor.phase = BattlePhase::AwaitPlayer;
        assert!(matches!(
            validate_state(&paused_without_actor, &config),
            Err(SnapshotError::PhaseInvariant { .. })
        ));

        let mut ended_without_winner = state();
        ended_without_winner.phase = BattlePhase::Ended;
        assert!(matches!(
            validate_state(&ended_without_winner, &config),
            Err(SnapshotError::PhaseInvariant { .. })
        ));

        let mut early_winner = state();
        early_winner.winner = Some(Winner::Player);
        assert!(matches!(
            validate_state(&early_winner, &config),
            Err(SnapshotError::PhaseInvariant { .. })
        ));
    }

    #[test]
    fn winner_must_match_living_units() {
        let config = BattleConfig::default();
        let ended = |winner: Winner, player_hp: u32, enemy_hp: u32| {
            let mut s = state();
            s.phase = BattlePhase::Ended;
            s.winner = Some(winner);
            s.player_units[0].hp = player_hp;
            s.enemy_units[0].hp = enemy_hp;
            s
        };

        assert!(validate_state(&ended(Winner::Player, 40, 0), &config).is_ok());
        assert!(validate_state(&ended(Winner::Enemy, 0, 40), &config).is_ok());
        assert!(validate_state(&ended(Winner::Draw, 40, 40), &config).is_ok());
        assert!(validate_state(&ended(Winner::Draw, 0, 0), &config).is_ok());

        for impossible in [
            ended(Winner::Player, 0, 40),
            ended(Winner::Player, 0, 0),
            ended(Winner::Enemy, 40, 40),
            ended(Winner::Draw, 40, 0),
        ] {
            let err = validate_state(&impossible, &config).unwrap_err();
            assert!(matches!(err, SnapshotError::PhaseInvariant { .. }));
            assert_eq!(err.severity(), ErrorSeverity::Fatal);
        }

        let json = encode_state(&ended(Winner::Player, 0, 40)).unwrap();
        assert!(decode_state(&json, &config).is_err());
    }

    #[test]
    fn awaiting_actor_must_be_a_player_unit() {
        let mut s = state();
        s.phase = BattlePhase::AwaitPlayer;
        s.awaiting = Some(UnitTag::new("enemy~0"));
        assert!(matches!(
            validate_state(&s, &BattleConfig::default()),
            Err(SnapshotError::UnknownAwaitingActor(_))
        ));
    }

    #[test]
    fn tick_beyond_limit_is_rejected() {
        let mut s = state();
        s.tick = 51;
        assert!(matches!(
            validate_state(&s, &BattleConfig::default()),
            Err(SnapshotError::TickBeyondLimit { tick: 51, .. })
        ));
    }
}
