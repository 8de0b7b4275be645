//! Data-driven battle content and loaders.
//!
//! This crate houses the hero catalog, the default squad, scripted encounters
//! and the engine configuration, and provides loaders for their RON/TOML files:
//! - Hero templates (data-driven via RON)
//! - Player squad and formation (data-driven via RON)
//! - Encounters (data-driven via RON)
//! - Battle configuration (data-driven via TOML)
//!
//! Content feeds the roster builders of `battle-core`; it never appears in
//! battle state.

pub mod catalog;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use catalog::{EncounterSpec, HeroCatalog, SquadMember, SquadSpec};

#[cfg(feature = "loaders")]
pub use loaders::{
    ConfigLoader, ContentFactory, EncounterLoader, HeroLoader, LoadResult, SquadLoader,
    factory::{resolve_encounter, resolve_squad},
};

/// Directory holding the data files shipped with this crate.
pub fn bundled_data_dir() -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("data")
}
