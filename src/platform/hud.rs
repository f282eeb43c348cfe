//! HUD text

use crate::format_seconds;
use crate::records::BestTime;

/// Everything the HUD shows for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct Hud {
    pub level_name: String,
    pub destroyed: u32,
    pub total: u32,
    pub elapsed: f32,
    pub best: BestTime,
}

impl Hud {
    pub fn new(level_name: impl Into<String>, destroyed: u32, total: u32, elapsed: f32, best: BestTime) -> Self {
        Self {
            level_name: level_name.into(),
            destroyed,
            total,
            elapsed,
            best,
        }
    }

    pub fn block_counter(&self) -> String {
        format!("Blocks destroyed: {}/{}", self.destroyed, self.total)
    }

    pub fn timer(&self) -> String {
        format!("Time: {}", format_seconds(self.elapsed))
    }

    /// Hidden until a level has been completed once
    pub fn best_label(&self) -> Option<String> {
        self.best.seconds.map(|s| format!("Best: {}", format_seconds(s)))
    }

    pub fn level_label(&self) -> String {
        format!("Level: {}", self.level_name)
    }
}
