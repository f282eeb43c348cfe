//! Best completion time
//!
//! One process-wide record. Only a strictly faster completion replaces it.

use serde::{Deserialize, Serialize};

/// Best time record
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BestTime {
    /// Seconds; `None` until a level has been completed
    pub seconds: Option<f32>,
}

impl Default for BestTime {
    fn default() -> Self {
        Self::new()
    }
}

impl BestTime {
    pub fn new() -> Self {
        Self { seconds: None }
    }

    pub fn from_seconds(seconds: f32) -> Self {
        Self {
            seconds: Some(seconds),
        }
    }

    /// Best time with `+inf` standing in for "never completed"
    pub fn value(&self) -> f32 {
        self.seconds.unwrap_or(f32::INFINITY)
    }

    pub fn is_set(&self) -> bool {
        self.seconds.is_some()
    }

    /// Check if a completion time would become the new record
    pub fn qualifies(&self, elapsed: f32) -> bool {
        elapsed.is_finite() && elapsed < self.value()
    }

    /// Record a completion time. Returns true if it became the new best.
    pub fn submit(&mut self, elapsed: f32) -> bool {
        if !self.qualifies(elapsed) {
            return false;
        }
        self.seconds = Some(elapsed);
        true
    }
}
