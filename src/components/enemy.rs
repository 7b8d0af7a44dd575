//! Enemy component and behavior variants.
//!
//! Enemies are polymorphic over a tagged behavior enum rather than a kind
//! switch: patrollers walk between two bounds (optionally bobbing
//! vertically, a purely visual offset), stationary hazards never move and
//! cannot be stomped. A dead enemy stays in the world while its death timer
//! fades out, excluded from AI and collision.

use bevy_ecs::prelude::Component;
use raylib::prelude::{Color, Vector2};
use serde::{Deserialize, Serialize};

/// Frames a dead enemy keeps rendering while fading out.
pub const ENEMY_DEATH_FRAMES: f32 = 30.0;

/// Visual identity of an enemy, also used in level data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyKind {
    BrokenHeart,
    Teardrop,
    Thorn,
}

impl EnemyKind {
    /// Collision box size in pixels.
    pub fn size(self) -> Vector2 {
        match self {
            EnemyKind::BrokenHeart | EnemyKind::Teardrop => Vector2 { x: 12.0, y: 14.0 },
            EnemyKind::Thorn => Vector2 { x: 14.0, y: 16.0 },
        }
    }

    /// Patrol speed in pixels per frame-unit before difficulty scaling.
    pub fn base_speed(self) -> f32 {
        match self {
            EnemyKind::BrokenHeart => 0.6,
            EnemyKind::Teardrop => 1.0,
            EnemyKind::Thorn => 0.0,
        }
    }

    /// Whether this kind bobs vertically while patrolling.
    pub fn bobs(self) -> bool {
        matches!(self, EnemyKind::Teardrop)
    }

    /// Death burst particle color.
    pub fn burst_color(self) -> Color {
        match self {
            EnemyKind::BrokenHeart => Color::new(139, 0, 139, 255),
            EnemyKind::Teardrop => Color::new(68, 102, 170, 255),
            EnemyKind::Thorn => Color::new(70, 90, 70, 255),
        }
    }
}

/// Movement behavior of an enemy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Behavior {
    /// Walk at `speed` between the two x bounds, reversing at each.
    Patrol { left: f32, right: f32, speed: f32 },
    /// Never moves and cannot be eliminated by contact.
    Stationary,
}

/// Enemy runtime state.
#[derive(Component, Debug, Clone)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub behavior: Behavior,
    /// Walking direction, -1.0 or 1.0.
    pub facing: f32,
    pub alive: bool,
    /// Counts down after death; the entity fades while positive.
    pub death_timer: f32,
    /// Frame-unit counter driving animation and the bob oscillation.
    pub anim_frame: f32,
    /// Visual-only vertical offset (teardrop bounce). Never affects collision.
    pub bob_offset: f32,
}

impl Enemy {
    pub fn new(kind: EnemyKind, behavior: Behavior) -> Self {
        Enemy {
            kind,
            behavior,
            facing: 1.0,
            alive: true,
            death_timer: 0.0,
            anim_frame: 0.0,
            bob_offset: 0.0,
        }
    }

    /// Stationary hazards reject stomps.
    pub fn is_stationary_hazard(&self) -> bool {
        matches!(self.behavior, Behavior::Stationary)
    }

    /// Render opacity while dying, 1.0 when alive.
    pub fn fade_alpha(&self) -> f32 {
        if self.alive {
            1.0
        } else {
            (self.death_timer / ENEMY_DEATH_FRAMES).max(0.0)
        }
    }
}
