//! Kinematic body component.
//!
//! Stores the current velocity of an entity in pixels per frame-unit. The
//! physics, enemy, and particle systems each integrate it with their own
//! rules, so no generic force model is kept here.

use bevy_ecs::prelude::Component;
use raylib::prelude::Vector2;

/// Velocity carrier for moving entities.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct RigidBody {
    /// Current velocity in pixels per frame-unit.
    pub velocity: Vector2,
}

impl RigidBody {
    pub fn new() -> Self {
        Self {
            velocity: Vector2 { x: 0.0, y: 0.0 },
        }
    }

    pub fn with_velocity(x: f32, y: f32) -> Self {
        Self {
            velocity: Vector2 { x, y },
        }
    }

    /// Zero the velocity on both axes.
    pub fn halt(&mut self) {
        self.velocity = Vector2 { x: 0.0, y: 0.0 };
    }
}
