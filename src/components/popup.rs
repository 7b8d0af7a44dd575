//! Floating score text.
//!
//! Spawned at award positions, drifts upward as its timer eases out, and is
//! despawned at zero by the popup system.

use bevy_ecs::prelude::Component;

#[derive(Component, Debug, Clone)]
pub struct ScorePopup {
    pub text: String,
    /// Remaining frames.
    pub timer: f32,
    pub max_timer: f32,
}

impl ScorePopup {
    pub fn new(text: impl Into<String>, frames: f32) -> Self {
        ScorePopup {
            text: text.into(),
            timer: frames,
            max_timer: frames,
        }
    }

    /// Progress through the popup's lifetime in [0, 1].
    pub fn progress(&self) -> f32 {
        (1.0 - self.timer / self.max_timer).clamp(0.0, 1.0)
    }
}
