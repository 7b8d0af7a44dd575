//! Score ledger and award constants.

use bevy_ecs::prelude::Resource;

pub const SCORE_HEART: u32 = 100;
pub const SCORE_STOMP: u32 = 200;
pub const SCORE_LEVEL: u32 = 1000;
/// Stomp combo multiplier ceiling.
pub const COMBO_CAP: u32 = 5;

/// Points for a stomp at the given post-increment combo count.
pub fn stomp_points(combo: u32) -> u32 {
    SCORE_STOMP * combo.min(COMBO_CAP)
}

/// Monotonic within a level; reset only when a new game starts.
#[derive(Resource, Clone, Copy, Default)]
pub struct ScoreBoard {
    score: u32,
}

impl ScoreBoard {
    pub fn get(&self) -> u32 {
        self.score
    }

    pub fn add(&mut self, points: u32) {
        self.score += points;
    }

    pub fn reset(&mut self) {
        self.score = 0;
    }
}
