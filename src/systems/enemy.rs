//! Enemy AI and player-enemy collision resolution.
//!
//! Patrollers walk between their bounds and reverse exactly at each; the
//! teardrop's bob is a render-only vertical offset. Dead enemies only count
//! down their fade timer. Contact with the player resolves into either a
//! stomp or a hit: the physics consequences are applied here, the score
//! and effect side effects go through events.

use bevy_ecs::prelude::*;
use raylib::prelude::Vector2;

use crate::components::boxcollider::BoxCollider;
use crate::components::enemy::{Behavior, ENEMY_DEATH_FRAMES, Enemy};
use crate::components::mapposition::MapPosition;
use crate::components::player::{Player, PlayerAnim};
use crate::components::rigidbody::RigidBody;
use crate::events::combat::{PlayerHitEvent, StompEvent};
use crate::resources::worldtime::WorldTime;
use crate::systems::physics::{INVINCIBLE_FRAMES, JUMP_FORCE};

/// Upward impulse fraction granted by bouncing off a stomped enemy.
const STOMP_BOUNCE: f32 = 0.6;

pub fn enemy_ai(time: Res<WorldTime>, mut query: Query<(&mut MapPosition, &mut Enemy)>) {
    let dt = time.frames();

    for (mut pos, mut enemy) in query.iter_mut() {
        if !enemy.alive {
            enemy.death_timer -= dt;
            continue;
        }

        enemy.anim_frame += dt;

        let Behavior::Patrol { left, right, speed } = enemy.behavior else {
            continue;
        };

        pos.pos.x += speed * dt * enemy.facing;

        if pos.pos.x <= left {
            pos.pos.x = left;
            enemy.facing = 1.0;
        } else if pos.pos.x >= right {
            pos.pos.x = right;
            enemy.facing = -1.0;
        }

        if enemy.kind.bobs() {
            enemy.bob_offset = (enemy.anim_frame * 0.08).sin() * 0.8;
        }
    }
}

/// Resolve player contact against every living enemy.
///
/// A downward-moving player whose bottom edge is above the enemy's vertical
/// midpoint stomps any non-stationary enemy; every other overlap is a hit
/// unless the player is invincible. Hits teleport the player back to the
/// last safe position, so later enemies in the same pass are tested against
/// the recovered position.
pub fn enemy_player_collision(
    mut commands: Commands,
    mut players: Query<
        (&mut MapPosition, &mut RigidBody, &mut Player, &BoxCollider),
        Without<Enemy>,
    >,
    mut enemies: Query<(&MapPosition, &mut Enemy, &BoxCollider), Without<Player>>,
) {
    let Some((mut p_pos, mut p_rb, mut player, p_col)) = players.iter_mut().next() else {
        return;
    };

    for (e_pos, mut enemy, e_col) in enemies.iter_mut() {
        if !enemy.alive {
            continue;
        }
        if !p_col.overlaps(p_pos.pos, e_col, e_pos.pos) {
            continue;
        }

        let size = enemy.kind.size();
        let player_bottom = p_pos.pos.y + p_col.size.y;
        let is_stomp =
            p_rb.velocity.y > 0.0 && player_bottom < e_pos.pos.y + size.y * 0.5;

        if is_stomp && !enemy.is_stationary_hazard() {
            enemy.alive = false;
            enemy.death_timer = ENEMY_DEATH_FRAMES;

            p_rb.velocity.y = JUMP_FORCE * STOMP_BOUNCE;
            player.combo += 1;
            player.squash = Vector2 { x: 1.4, y: 0.6 };
            player.anim = PlayerAnim::Jump;

            commands.trigger(StompEvent {
                pos: Vector2 {
                    x: e_pos.pos.x + size.x / 2.0,
                    y: e_pos.pos.y + size.y / 2.0,
                },
                kind: enemy.kind,
                combo: player.combo,
            });
        } else if !player.is_invincible() {
            p_pos.pos = player.last_safe;
            p_rb.halt();
            player.invincible_timer = INVINCIBLE_FRAMES;

            commands.trigger(PlayerHitEvent {
                pos: Player::center(p_pos.pos),
            });
        }
    }
}
