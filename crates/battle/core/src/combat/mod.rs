//! Combat resolution.
//!
//! # Architecture
//!
//! - **Targeting**: weighted random pick over living candidates, biased by row
//! - **Damage**: pure integer formula, truncating at every step
//! - **Resolution**: the full attack sequence, including hook dispatch and
//!   log events
//!
//! All randomness comes from the [`BattleContext`](crate::BattleContext) RNG.

pub mod damage;
pub mod resolve;
pub mod targeting;

pub use damage::{base_damage, calculate_damage};
pub use resolve::{AttackReport, resolve_attack, settle_death};
pub use targeting::{choose_target, random_living};
