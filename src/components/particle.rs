//! Visual effect particle.
//!
//! Particles are full entities carrying a position, a velocity, and this
//! countdown component. The particle system integrates them with a small
//! constant downward pull and despawns them when life runs out; render
//! alpha is `life / max_life`.

use bevy_ecs::prelude::Component;
use raylib::prelude::{Color, Vector2};

use crate::components::mapposition::MapPosition;
use crate::components::rigidbody::RigidBody;

#[derive(Component, Debug, Clone)]
pub struct Particle {
    /// Remaining life in frame-units.
    pub life: f32,
    pub max_life: f32,
    /// Square side in pixels (shrinks with alpha when drawn).
    pub size: f32,
    pub color: Color,
    /// Draw as a tiny heart instead of a square.
    pub heart_shaped: bool,
}

impl Particle {
    /// Render opacity in [0, 1].
    pub fn alpha(&self) -> f32 {
        (self.life / self.max_life).clamp(0.0, 1.0)
    }

    /// Full spawn bundle for a particle entity.
    pub fn bundle(
        pos: Vector2,
        velocity: Vector2,
        life: f32,
        size: f32,
        color: Color,
        heart_shaped: bool,
    ) -> (MapPosition, RigidBody, Particle) {
        (
            MapPosition::new(pos.x, pos.y),
            RigidBody { velocity },
            Particle {
                life,
                max_life: life,
                size,
                color,
                heart_shaped,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alpha_is_life_fraction() {
        let p = Particle {
            life: 10.0,
            max_life: 40.0,
            size: 2.0,
            color: Color::WHITE,
            heart_shaped: false,
        };
        assert!((p.alpha() - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_alpha_clamps_at_zero() {
        let p = Particle {
            life: -1.0,
            max_life: 40.0,
            size: 2.0,
            color: Color::WHITE,
            heart_shaped: false,
        };
        assert_eq!(p.alpha(), 0.0);
    }
}
