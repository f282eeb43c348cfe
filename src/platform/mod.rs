//! Platform abstraction layer
//!
//! The simulation never talks to a window, a keyboard or a speaker directly.
//! Hosts plug in here:
//! - Input: anything that yields a [`TickInput`] per frame
//! - Output: a [`RenderSink`] that observes a [`Frame`] snapshot

pub mod hud;
pub mod input;

use crate::sim::{Block, GameState, Player, TickInput};

pub use hud::Hud;
pub use input::{Autopilot, Key, KeyboardState, TouchButton};

/// Produces intents for the next tick
pub trait InputSource {
    fn poll(&mut self, state: &GameState) -> TickInput;
}

/// Read-only view of one frame for drawing
#[derive(Debug, Clone)]
pub struct Frame<'a> {
    pub player: &'a Player,
    /// All blocks including destroyed ones (draw only the active)
    pub blocks: &'a [Block],
    pub hud: Hud,
}

impl Frame<'_> {
    pub fn active_blocks(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter().filter(|b| b.is_active())
    }
}

/// Consumes snapshots; never feeds back into the simulation
pub trait RenderSink {
    fn present(&mut self, frame: &Frame<'_>);

    /// Level finished. Must not block.
    fn level_complete(&mut self, _elapsed: f32, _new_best: bool) {}
}

/// Writes the HUD to the log every `every` frames
#[derive(Debug, Clone)]
pub struct LogRenderSink {
    every: u64,
    frames: u64,
}

impl LogRenderSink {
    pub fn new(every: u64) -> Self {
        Self {
            every: every.max(1),
            frames: 0,
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl RenderSink for LogRenderSink {
    fn present(&mut self, frame: &Frame<'_>) {
        self.frames += 1;
        if self.frames % self.every == 0 {
            log::info!(
                "{} | {} | {} | player ({:.0}, {:.0})",
                frame.hud.level_label(),
                frame.hud.block_counter(),
                frame.hud.timer(),
                frame.player.pos.x,
                frame.player.pos.y
            );
        }
    }

    fn level_complete(&mut self, elapsed: f32, new_best: bool) {
        log::info!(
            "Level Complete! Time: {}{}",
            crate::format_seconds(elapsed),
            if new_best { " (new best)" } else { "" }
        );
    }
}
