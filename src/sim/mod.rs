//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One `tick` per host frame, fixed per-tick integration
//! - Timers are explicit countdowns fed by the tick's `dt`
//! - Stable iteration order (block collection order)
//! - No rendering or platform dependencies

pub mod aabb;
pub mod autopilot;
pub mod collision;
pub mod combat;
pub mod state;
pub mod tick;

pub use aabb::Rect;
pub use collision::{Penetration, resolve_collisions};
pub use combat::{attack_box, sweep_attack};
pub use state::{AttackDirection, Block, GameEvent, GamePhase, GameState, Player, Tuning};
pub use tick::{TickInput, tick};
