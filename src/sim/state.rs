//! Game state and core simulation types
//!
//! Everything one level needs between ticks lives in [`GameState`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::aabb::Rect;
use crate::consts::*;

/// Which way the machete swings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttackDirection {
    Up,
    Down,
    Left,
    #[default]
    Right,
}

impl AttackDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttackDirection::Up => "up",
            AttackDirection::Down => "down",
            AttackDirection::Left => "left",
            AttackDirection::Right => "right",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "up" => Some(AttackDirection::Up),
            "down" => Some(AttackDirection::Down),
            "left" => Some(AttackDirection::Left),
            "right" => Some(AttackDirection::Right),
            _ => None,
        }
    }

    /// Horizontal direction matching a facing
    pub fn facing(facing_right: bool) -> Self {
        if facing_right {
            AttackDirection::Right
        } else {
            AttackDirection::Left
        }
    }
}

/// Physics tuning. Defaults reproduce the reference game.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub gravity: f32,
    pub jump_force: f32,
    pub move_speed: f32,
    pub attack_duration_ms: f32,
    pub attack_range: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            jump_force: JUMP_FORCE,
            move_speed: MOVE_SPEED,
            attack_duration_ms: ATTACK_DURATION_MS,
            attack_range: ATTACK_RANGE,
        }
    }
}

/// The player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner of the AABB
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    /// True unless resting on the floor or a block top
    pub is_jumping: bool,
    pub is_attacking: bool,
    /// Milliseconds left in the current attack window
    pub attack_timer_ms: f32,
    pub facing_right: bool,
    /// Sticky: only changed by aim or movement intents
    pub attack_direction: AttackDirection,
}

impl Default for Player {
    fn default() -> Self {
        Self::new(
            Vec2::new(SPAWN_X, SPAWN_Y),
            Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
        )
    }
}

impl Player {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            size,
            is_jumping: false,
            is_attacking: false,
            attack_timer_ms: 0.0,
            facing_right: true,
            attack_direction: AttackDirection::Right,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    /// Put the player back at the spawn point at rest
    pub fn respawn(&mut self, spawn: Vec2) {
        self.pos = spawn;
        self.vel = Vec2::ZERO;
        self.cancel_attack();
    }

    /// Drop any active attack together with its pending countdown
    pub fn cancel_attack(&mut self) {
        self.is_attacking = false;
        self.attack_timer_ms = 0.0;
    }
}

/// A destructible platform cut out of the flame graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub rect: Rect,
    /// Display color from the source document
    #[serde(default)]
    pub fill: Option<String>,
    /// Tooltip text (frame name), display only
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub destroyed: bool,
}

impl Block {
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            fill: None,
            title: None,
            destroyed: false,
        }
    }

    pub fn with_fill(mut self, fill: impl Into<String>) -> Self {
        self.fill = Some(fill.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Still part of the level (collides and can be hit)
    #[inline]
    pub fn is_active(&self) -> bool {
        !self.destroyed
    }

    /// Destroy the block. Returns false if it was already gone.
    pub fn destroy(&mut self) -> bool {
        if self.destroyed {
            return false;
        }
        self.destroyed = true;
        true
    }
}

/// Phase of a loaded level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Timer running, input accepted
    Running,
    /// Every block destroyed; terminal for this level
    Complete,
}

/// Things that happened during a tick, for audio/UI consumers
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Jumped,
    AttackStarted { direction: AttackDirection },
    BlocksDestroyed { count: u32, destroyed: u32, total: u32 },
    LevelComplete { elapsed: f32 },
}

/// Complete state of one level being played
#[derive(Debug, Clone)]
pub struct GameState {
    /// Playable canvas size
    pub world: Vec2,
    pub spawn: Vec2,
    pub tuning: Tuning,
    pub player: Player,
    /// Blocks in document order
    pub blocks: Vec<Block>,
    pub total_blocks: u32,
    pub destroyed_blocks: u32,
    pub phase: GamePhase,
    /// Elapsed play time in seconds
    pub elapsed: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    events: Vec<GameEvent>,
}

impl GameState {
    pub fn new(world: Vec2, spawn: Vec2, player_size: Vec2, tuning: Tuning, blocks: Vec<Block>) -> Self {
        let total_blocks = blocks.len() as u32;
        let destroyed_blocks = blocks.iter().filter(|b| b.destroyed).count() as u32;
        Self {
            world,
            spawn,
            tuning,
            player: Player::new(spawn, player_size),
            blocks,
            total_blocks,
            destroyed_blocks,
            phase: GamePhase::Running,
            elapsed: 0.0,
            time_ticks: 0,
            events: Vec::new(),
        }
    }

    /// Default world, spawn and tuning around the given blocks
    pub fn with_blocks(blocks: Vec<Block>) -> Self {
        Self::new(
            Vec2::new(WORLD_WIDTH, WORLD_HEIGHT),
            Vec2::new(SPAWN_X, SPAWN_Y),
            Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            Tuning::default(),
            blocks,
        )
    }

    /// Highest y the player's top edge may reach while standing on the floor
    pub fn floor_y(&self) -> f32 {
        self.world.y - self.player.size.y
    }

    pub fn remaining_blocks(&self) -> u32 {
        self.total_blocks - self.destroyed_blocks
    }

    pub fn active_blocks(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter().filter(|b| b.is_active())
    }

    pub fn is_complete(&self) -> bool {
        self.phase == GamePhase::Complete
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take the events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
