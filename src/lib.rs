//! Flame Smash - a platformer built out of flame graphs
//!
//! Core modules:
//! - `sim`: Deterministic simulation (kinematics, collisions, combat)
//! - `level`: Flame-graph rectangles to playable block geometry
//! - `session`: Loading/running/complete state machine and best time
//! - `platform`: Input and render abstraction
//! - `persistence`: Best-time storage
//! - `settings`: Data-driven configuration

pub mod level;
pub mod persistence;
pub mod platform;
pub mod records;
pub mod session;
pub mod settings;
pub mod sim;

pub use records::BestTime;
pub use session::{Session, SessionEvent, SessionPhase};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Nominal frame spacing of the host scheduler (seconds)
    pub const NOMINAL_DT: f32 = 1.0 / 60.0;

    /// Downward acceleration added to velY every tick
    pub const GRAVITY: f32 = 0.5;
    /// Vertical velocity applied on jump (negative is up)
    pub const JUMP_FORCE: f32 = -16.0;
    /// Horizontal speed while a direction is held (velocity snaps, no accel)
    pub const MOVE_SPEED: f32 = 8.0;

    /// How long an attack stays active, in wall-clock milliseconds
    pub const ATTACK_DURATION_MS: f32 = 256.0;
    /// Reach of the machete hitbox in world units
    pub const ATTACK_RANGE: f32 = 50.0;

    /// Player AABB
    pub const PLAYER_WIDTH: f32 = 30.0;
    pub const PLAYER_HEIGHT: f32 = 50.0;

    /// Where the player appears on start/reset
    pub const SPAWN_X: f32 = 50.0;
    pub const SPAWN_Y: f32 = 0.0;

    /// Default playable canvas
    pub const WORLD_WIDTH: f32 = 1200.0;
    pub const WORLD_HEIGHT: f32 = 600.0;
}

/// Format seconds the way the HUD shows them (one decimal)
#[inline]
pub fn format_seconds(secs: f32) -> String {
    format!("{:.1}s", secs)
}
