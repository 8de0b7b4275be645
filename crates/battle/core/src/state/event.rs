//! Battle event log entries.
//!
//! The log is the stable contract with the presentation layer. Each entry
//! serializes as `{tick, type, source, target, value, meta}`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

use super::unit::UnitTag;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EventKind {
    Start,
    Passive,
    Attack,
    Death,
    Pause,
    Error,
    End,
}

/// Free-form metadata value attached to an event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetaValue {
    Int(i64),
    Text(String),
}

impl MetaValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            Self::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v),
            Self::Int(_) => None,
        }
    }
}

impl From<i64> for MetaValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u32> for MetaValue {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<usize> for MetaValue {
    fn from(value: usize) -> Self {
        Self::Int(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<&str> for MetaValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for MetaValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleEvent {
    pub tick: u32,
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub source: Option<UnitTag>,
    pub target: Option<UnitTag>,
    pub value: Option<i64>,
    #[serde(default)]
    pub meta: BTreeMap<String, MetaValue>,
}

impl BattleEvent {
    pub fn new(tick: u32, kind: EventKind) -> Self {
        Self {
            tick,
            kind,
            source: None,
            target: None,
            value: None,
            meta: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_source(mut self, source: &UnitTag) -> Self {
        self.source = Some(source.clone());
        self
    }

    #[must_use]
    pub fn with_target(mut self, target: &UnitTag) -> Self {
        self.target = Some(target.clone());
        self
    }

    #[must_use]
    pub fn with_value(mut self, value: i64) -> Self {
        self.value = Some(value);
        self
    }

    #[must_use]
    pub fn with_meta(mut self, key: &str, value: impl Into<MetaValue>) -> Self {
        self.meta.insert(key.to_owned(), value.into());
        self
    }

    pub fn meta_text(&self, key: &str) -> Option<&str> {
        self.meta.get(key).and_then(MetaValue::as_text)
    }
}
