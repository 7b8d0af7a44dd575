//! Particle simulation.
//!
//! Velocity integration plus a small constant downward pull, then a life
//! countdown; entities are despawned once life runs out.

use bevy_ecs::prelude::*;

use crate::components::mapposition::MapPosition;
use crate::components::particle::Particle;
use crate::components::rigidbody::RigidBody;
use crate::resources::worldtime::WorldTime;

/// Downward acceleration applied to every particle, per frame squared.
const PARTICLE_GRAVITY: f32 = 0.05;

pub fn particle_system(
    time: Res<WorldTime>,
    mut commands: Commands,
    mut query: Query<(Entity, &mut MapPosition, &mut RigidBody, &mut Particle)>,
) {
    let dt = time.frames();

    for (entity, mut pos, mut rb, mut particle) in query.iter_mut() {
        pos.pos.x += rb.velocity.x * dt;
        pos.pos.y += rb.velocity.y * dt;
        rb.velocity.y += PARTICLE_GRAVITY * dt;
        particle.life -= dt;

        if particle.life <= 0.0 {
            commands.entity(entity).try_despawn();
        }
    }
}
