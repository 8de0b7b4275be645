//! Unit runtime model.
//!
//! A [`UnitRuntime`] lives for exactly one battle. `hp`, `max_hp` and `ap`
//! are private so every write goes through a clamping method and the
//! invariants `0 ≤ hp ≤ max_hp` and `0 ≤ ap ≤ threshold` hold at all times.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::abilities::AbilityKit;
use crate::stats::StatBundle;

/// External hero-instance identifier owned by the data layer.
pub type HeroId = u64;

/// Which team a unit fights for.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Side {
    Player,
    Enemy,
}

impl Side {
    pub const fn opposite(self) -> Self {
        match self {
            Self::Player => Self::Enemy,
            Self::Enemy => Self::Player,
        }
    }
}

/// Formation row. Front-row units hit harder physically and draw more fire;
/// back-row units get a small magic bonus.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Row {
    Front,
    Back,
}

/// Faction tag. The only thing persisted about a unit's abilities: the kit is
/// re-derived from it through the [`crate::AbilityRegistry`] on every load.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum Faction {
    Undead,
    Goblin,
    Wild,
}

/// Formation cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: Row,
    pub slot: u8,
}

impl Position {
    pub const fn new(row: Row, slot: u8) -> Self {
        Self { row, slot }
    }

    pub const fn front(slot: u8) -> Self {
        Self::new(Row::Front, slot)
    }

    pub const fn back(slot: u8) -> Self {
        Self::new(Row::Back, slot)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.row, self.slot)
    }
}

impl FromStr for Position {
    type Err = String;

    /// Parses `"<row>:<slot>"`, e.g. `front:0` or `Back:2`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (row, slot) = s
            .split_once(':')
            .ok_or_else(|| format!("expected <row>:<slot>, got '{s}'"))?;
        let row = row
            .trim()
            .parse::<Row>()
            .map_err(|_| format!("unknown row '{row}'"))?;
        let slot = slot
            .trim()
            .parse::<u8>()
            .map_err(|_| format!("invalid slot '{slot}'"))?;
        Ok(Self { row, slot })
    }
}

/// Stable unit identifier within one battle.
///
/// Owned units are tagged `"{side}#{source_id}"`; units without a source id
/// (spawned enemies) are tagged `"{side}~{ordinal}"`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitTag(String);

impl UnitTag {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn for_unit(side: Side, source_id: Option<HeroId>, ordinal: usize) -> Self {
        match source_id {
            Some(id) => Self(format!("{side}#{id}")),
            None => Self(format!("{side}~{ordinal}")),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UnitTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The mutable combat actor.
#[derive(Clone, Debug)]
pub struct UnitRuntime {
    pub tag: UnitTag,
    pub name: String,
    pub source_id: Option<HeroId>,
    pub side: Side,
    pub faction: Faction,
    pub position: Position,
    pub level: u32,
    /// Derived once from level; never changes during the battle.
    pub stats: StatBundle,
    hp: u32,
    max_hp: u32,
    ap: u32,
    pub damage_dealt: u64,
    pub kills: u32,
    pub abilities: AbilityKit,
}

/// Everything needed to place a unit on the field.
#[derive(Clone, Debug)]
pub struct UnitSeed {
    pub tag: UnitTag,
    pub name: String,
    pub source_id: Option<HeroId>,
    pub side: Side,
    pub faction: Faction,
    pub position: Position,
    pub level: u32,
    pub stats: StatBundle,
}

impl UnitRuntime {
    /// Fresh unit at full health with an empty AP bar.
    ///
    /// A seed with 0 hp yields a unit that is already dead (`hp == 0`,
    /// `max_hp == 1`); it never acts and is never targeted.
    pub fn new(seed: UnitSeed, abilities: AbilityKit) -> Self {
        let hp = seed.stats.hp;
        let max_hp = hp.max(1);
        Self {
            tag: seed.tag,
            name: seed.name,
            source_id: seed.source_id,
            side: seed.side,
            faction: seed.faction,
            position: seed.position,
            level: seed.level,
            stats: seed.stats,
            hp,
            max_hp,
            ap: 0,
            damage_dealt: 0,
            kills: 0,
            abilities,
        }
    }

    /// Restores the mutable meters from a validated snapshot record.
    pub(crate) fn with_meters(mut self, hp: u32, max_hp: u32, ap: u32) -> Self {
        self.max_hp = max_hp.max(1);
        self.hp = hp.min(self.max_hp);
        self.ap = ap;
        self
    }

    pub const fn hp(&self) -> u32 {
        self.hp
    }

    pub const fn max_hp(&self) -> u32 {
        self.max_hp
    }

    pub const fn ap(&self) -> u32 {
        self.ap
    }

    pub const fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub const fn is_ready(&self, threshold: u32) -> bool {
        self.is_alive() && self.ap >= threshold
    }

    /// Subtracts `amount` from hp, flooring at 0. Returns the hp actually lost.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let lost = amount.min(self.hp);
        self.hp -= lost;
        lost
    }

    /// Restores hp up to `max_hp`. Dead units stay dead.
    pub fn heal(&mut self, amount: u32) {
        if self.is_alive() {
            self.hp = self.hp.saturating_add(amount).min(self.max_hp);
        }
    }

    /// Sets `max_hp` (at least 1) and clamps current hp under it.
    pub fn set_max_hp(&mut self, max_hp: u32) {
        self.max_hp = max_hp.max(1);
        self.hp = self.hp.min(self.max_hp);
    }

    /// Refills hp to `max_hp`. Dead units stay dead.
    pub fn restore_full(&mut self) {
        if self.is_alive() {
            self.hp = self.max_hp;
        }
    }

    /// Adds AP, clamped to `threshold`.
    pub fn grow_ap(&mut self, amount: u32, threshold: u32) {
        self.ap = self.ap.saturating_add(amount).min(threshold);
    }

    pub fn reset_ap(&mut self) {
        self.ap = 0;
    }

    /// Per-tick AP gain: `max(1, speed / divisor)`.
    pub fn ap_gain(&self, speed_divisor: u32) -> u32 {
        (self.stats.speed / speed_divisor.max(1)).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(hp: u32, speed: u32) -> UnitRuntime {
        UnitRuntime::new(
            UnitSeed {
                tag: UnitTag::for_unit(Side::Player, Some(1), 0),
                name: "Tester".into(),
                source_id: Some(1),
                side: Side::Player,
                faction: Faction::Goblin,
                position: Position::front(0),
                level: 1,
                stats: StatBundle::new(hp, 10, 0, 0, 0, speed),
            },
            AbilityKit::default(),
        )
    }

    #[test]
    fn damage_floors_hp_at_zero() {
        let mut u = unit(30, 10);
        assert_eq!(u.take_damage(12), 12);
        assert_eq!(u.hp(), 18);
        assert_eq!(u.take_damage(100), 18);
        assert_eq!(u.hp(), 0);
        assert!(!u.is_alive());
    }

    #[test]
    fn zero_hp_seed_starts_dead() {
        let mut u = unit(0, 10);
        assert_eq!(u.hp(), 0);
        assert_eq!(u.max_hp(), 1);
        assert!(!u.is_alive());
        assert!(!u.is_ready(0));
        u.restore_full();
        assert_eq!(u.hp(), 0);
    }

    #[test]
    fn dead_units_cannot_be_healed() {
        let mut u = unit(10, 10);
        u.take_damage(10);
        u.heal(5);
        u.restore_full();
        assert_eq!(u.hp(), 0);
    }

    #[test]
    fn heal_and_max_hp_keep_hp_bounded() {
        let mut u = unit(50, 10);
        u.take_damage(20);
        u.heal(100);
        assert_eq!(u.hp(), 50);

        u.set_max_hp(40);
        assert_eq!(u.max_hp(), 40);
        assert_eq!(u.hp(), 40);

        u.set_max_hp(0);
        assert_eq!(u.max_hp(), 1);
        assert_eq!(u.hp(), 1);
    }

    #[test]
    fn ap_is_clamped_to_threshold() {
        let mut u = unit(10, 250);
        assert_eq!(u.ap_gain(10), 25);
        for _ in 0..10 {
            let gain = u.ap_gain(10);
            u.grow_ap(gain, 100);
        }
        assert_eq!(u.ap(), 100);
        assert!(u.is_ready(100));
        u.reset_ap();
        assert_eq!(u.ap(), 0);
    }

    #[test]
    fn slow_units_still_gain_one_ap() {
        let u = unit(10, 3);
        assert_eq!(u.ap_gain(10), 1);
        assert_eq!(u.ap_gain(0), 3);
    }

    #[test]
    fn tags_follow_source_id_or_ordinal() {
        assert_eq!(
            UnitTag::for_unit(Side::Player, Some(12), 3).as_str(),
            "player#12"
        );
        assert_eq!(UnitTag::for_unit(Side::Enemy, None, 3).as_str(), "enemy~3");
    }

    #[test]
    fn positions_parse_case_insensitively() {
        assert_eq!("front:2".parse::<Position>(), Ok(Position::front(2)));
        assert_eq!("Back:0".parse::<Position>(), Ok(Position::back(0)));
        assert!("middle:1".parse::<Position>().is_err());
        assert!("front".parse::<Position>().is_err());
        assert_eq!(Position::back(4).to_string(), "back:4");
    }

    #[test]
    fn faction_parses_from_content_names() {
        assert_eq!("undead".parse::<Faction>(), Ok(Faction::Undead));
        assert_eq!(Faction::Wild.to_string(), "Wild");
    }
}
