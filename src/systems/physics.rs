//! Player movement and tile collision.
//!
//! One pass per active frame, in a fixed order: input shaping, jump
//! resolution (coyote time + jump buffer + variable height), gravity,
//! axis-separated tile collision with vertical sub-stepping, landing and
//! respawn edges, and the per-frame feedback (squash relaxation, dust).
//!
//! All tuning constants are per-frame values at the nominal 60 Hz tick;
//! `dt` is the frame delta in frame-units (clamped upstream).

use bevy_ecs::prelude::*;
use fastrand::Rng;
use raylib::prelude::{Color, Vector2};

use crate::components::mapposition::MapPosition;
use crate::components::particle::Particle;
use crate::components::player::{PLAYER_H, PLAYER_W, Player, PlayerAnim};
use crate::components::rigidbody::RigidBody;
use crate::events::audio::{AudioCmd, SfxKind};
use crate::resources::effects::ScreenShake;
use crate::resources::input::InputState;
use crate::resources::level::{ActiveLevel, TILE_SIZE, Tilemap};
use crate::resources::worldtime::WorldTime;

pub const GRAVITY: f32 = 0.4;
pub const JUMP_FORCE: f32 = -7.0;
pub const MOVE_SPEED: f32 = 2.3;
pub const MAX_FALL: f32 = 7.0;
/// Per-frame horizontal velocity retention with no input.
pub const FRICTION: f32 = 0.82;

/// Frames a jump stays possible after walking off a ledge.
pub const COYOTE_FRAMES: f32 = 7.0;
/// Frames an early jump press is remembered before landing.
pub const JUMP_BUFFER_FRAMES: f32 = 8.0;
/// Frames of immunity after taking a hit.
pub const INVINCIBLE_FRAMES: f32 = 90.0;
/// Per-frame rate at which squash scale relaxes back to 1.
const SQUASH_RETURN: f32 = 0.12;

const DUST: Color = Color { r: 204, g: 187, b: 153, a: 255 };
const WALL_DUST: Color = Color { r: 187, g: 170, b: 136, a: 255 };
const PINK: Color = Color { r: 255, g: 105, b: 180, a: 255 };

pub fn player_physics(
    time: Res<WorldTime>,
    input: Res<InputState>,
    level: Option<Res<ActiveLevel>>,
    mut shake: ResMut<ScreenShake>,
    mut audio: MessageWriter<AudioCmd>,
    mut commands: Commands,
    mut rng: Local<Rng>,
    mut query: Query<(&mut MapPosition, &mut RigidBody, &mut Player)>,
) {
    let dt = time.frames();
    let Some(level) = level else { return };
    let Some((mut pos, mut rb, mut player)) = query.iter_mut().next() else {
        return;
    };
    if dt <= 0.0 {
        return;
    }
    let map = &level.tilemap;

    let was_on_ground = player.on_ground;

    // Jump buffer: remember the press, spend it on landing.
    if input.jump.just_pressed {
        player.jump_buffer_timer = JUMP_BUFFER_FRAMES;
    }
    if player.jump_buffer_timer > 0.0 {
        player.jump_buffer_timer = (player.jump_buffer_timer - dt).max(0.0);
    }

    // Horizontal: accelerate toward max speed, or decay to rest.
    let mut move_dir = 0.0;
    if input.move_left.active {
        move_dir = -1.0;
    }
    if input.move_right.active {
        move_dir = 1.0;
    }

    if move_dir != 0.0 {
        rb.velocity.x += move_dir * MOVE_SPEED * 0.3 * dt;
        rb.velocity.x = rb.velocity.x.clamp(-MOVE_SPEED, MOVE_SPEED);
        player.facing = move_dir;
        player.anim = if player.on_ground {
            PlayerAnim::Run
        } else if rb.velocity.y < 0.0 {
            PlayerAnim::Jump
        } else {
            PlayerAnim::Fall
        };
    } else {
        rb.velocity.x *= FRICTION.powf(dt);
        if rb.velocity.x.abs() < 0.1 {
            rb.velocity.x = 0.0;
        }
        if player.on_ground {
            player.anim = PlayerAnim::Idle;
        }
    }

    // Jump execution: grounded or inside the coyote window, pressed now or
    // buffered shortly before landing.
    let can_jump = player.on_ground || player.coyote_timer > 0.0;
    let wants_jump = input.jump.just_pressed || player.jump_buffer_timer > 0.0;

    if wants_jump && can_jump {
        rb.velocity.y = JUMP_FORCE;
        player.on_ground = false;
        player.coyote_timer = 0.0;
        player.jump_buffer_timer = 0.0;
        player.anim = PlayerAnim::Jump;
        player.squash = Vector2 { x: 0.75, y: 1.25 };
        audio.write(AudioCmd::PlaySfx {
            kind: SfxKind::Jump,
        });

        for _ in 0..5 {
            commands.spawn(Particle::bundle(
                Vector2 {
                    x: pos.pos.x + PLAYER_W / 2.0 + (rng.f32() - 0.5) * 8.0,
                    y: pos.pos.y + PLAYER_H,
                },
                Vector2 {
                    x: (rng.f32() - 0.5) * 2.5,
                    y: -rng.f32() * 1.5,
                },
                18.0,
                1.0 + rng.f32(),
                DUST,
                false,
            ));
        }
    }

    // Variable jump height: releasing early truncates the ascent. The
    // release edge makes this apply once per jump.
    if input.jump.just_released && rb.velocity.y < -1.0 {
        rb.velocity.y *= 0.5;
    }

    if !player.on_ground {
        player.anim = if rb.velocity.y < 0.0 {
            PlayerAnim::Jump
        } else {
            PlayerAnim::Fall
        };
    }

    // Gravity, clamped to terminal fall speed.
    rb.velocity.y += GRAVITY * dt;
    if rb.velocity.y > MAX_FALL {
        rb.velocity.y = MAX_FALL;
    }

    // Move X, then resolve against the grid on that axis alone.
    let vx_before = rb.velocity.x;
    let intended_x = pos.pos.x + rb.velocity.x * dt;
    pos.pos.x = intended_x;
    resolve_collision_x(&mut pos.pos, &mut rb.velocity.x, map);

    if (pos.pos.x - intended_x).abs() > f32::EPSILON && vx_before.abs() > 1.0 {
        for _ in 0..3 {
            commands.spawn(Particle::bundle(
                Vector2 {
                    x: pos.pos.x + if vx_before > 0.0 { PLAYER_W } else { 0.0 },
                    y: pos.pos.y + PLAYER_H * 0.3 + rng.f32() * PLAYER_H * 0.4,
                },
                Vector2 {
                    x: -player.facing * (0.5 + rng.f32()),
                    y: -rng.f32() * 1.5,
                },
                12.0,
                1.0,
                WALL_DUST,
                false,
            ));
        }
    }

    // Move Y in sub-steps bounded by a fraction of tile size so high fall
    // speeds cannot tunnel through one-tile-thick rows.
    let vy_step = rb.velocity.y * dt;
    let steps = ((vy_step.abs() / (TILE_SIZE * 0.8)).ceil() as i32).max(1);
    let per_step = vy_step / steps as f32;
    player.on_ground = false;
    for _ in 0..steps {
        pos.pos.y += per_step;
        resolve_collision_y(&mut pos.pos, &mut rb.velocity.y, &mut player.on_ground, map);
        if rb.velocity.y == 0.0 {
            break;
        }
    }

    // Coyote time arms only when walking off an edge, never off a jump.
    if was_on_ground && !player.on_ground && rb.velocity.y > 0.0 {
        player.coyote_timer = COYOTE_FRAMES;
    }
    if player.coyote_timer > 0.0 && !player.on_ground {
        player.coyote_timer = (player.coyote_timer - dt).max(0.0);
    }
    if player.on_ground {
        player.coyote_timer = 0.0;
    }

    // Landing edge.
    if !was_on_ground && player.on_ground {
        player.squash = Vector2 { x: 1.3, y: 0.7 };
        if player.combo > 0 {
            player.combo = 0;
        }
        audio.write(AudioCmd::PlaySfx {
            kind: SfxKind::Land,
        });

        for _ in 0..6 {
            commands.spawn(Particle::bundle(
                Vector2 {
                    x: pos.pos.x + PLAYER_W / 2.0 + (rng.f32() - 0.5) * 12.0,
                    y: pos.pos.y + PLAYER_H,
                },
                Vector2 {
                    x: (rng.f32() - 0.5) * 3.0,
                    y: -rng.f32() * 1.2,
                },
                16.0,
                1.0 + rng.f32() * 0.5,
                DUST,
                false,
            ));
        }
    }

    // Squash relaxes back toward unit scale.
    player.squash.x += (1.0 - player.squash.x) * SQUASH_RETURN * dt;
    player.squash.y += (1.0 - player.squash.y) * SQUASH_RETURN * dt;

    if player.invincible_timer > 0.0 {
        player.invincible_timer = (player.invincible_timer - dt).max(0.0);
    }

    player.anim_timer += dt;
    if player.anim_timer > 5.0 {
        player.anim_timer = 0.0;
        player.anim_frame = player.anim_frame.wrapping_add(1);
    }

    // Horizontal level bounds.
    if pos.pos.x < 0.0 {
        pos.pos.x = 0.0;
        rb.velocity.x = 0.0;
    }
    let max_x = map.width_px() - PLAYER_W;
    if pos.pos.x > max_x {
        pos.pos.x = max_x;
        rb.velocity.x = 0.0;
    }

    // Fell out of the level: scripted respawn, not an error.
    if pos.pos.y > map.height_px() + 32.0 {
        pos.pos = player.last_safe;
        rb.halt();
        player.invincible_timer = INVINCIBLE_FRAMES * 0.5;
        shake.raise(3.0);

        let center = Player::center(pos.pos);
        for _ in 0..10 {
            commands.spawn(Particle::bundle(
                center,
                Vector2 {
                    x: (rng.f32() - 0.5) * 4.0,
                    y: (rng.f32() - 0.5) * 4.0,
                },
                30.0,
                2.0,
                PINK,
                false,
            ));
        }
    }

    // Last safe position only updates while grounded.
    if player.on_ground {
        player.last_safe = pos.pos;
    }

    // Heart trail while running.
    if player.anim == PlayerAnim::Run && time.frame_count % 10 == 0 {
        commands.spawn(Particle::bundle(
            Vector2 {
                x: pos.pos.x + PLAYER_W / 2.0 - player.facing * 4.0,
                y: pos.pos.y + PLAYER_H / 2.0,
            },
            Vector2 {
                x: -player.facing * 0.4,
                y: -0.5 - rng.f32() * 0.5,
            },
            25.0,
            2.0,
            PINK,
            true,
        ));
    }
}

/// Push the player out of any overlapped solid tile along X and kill the
/// horizontal velocity on contact.
fn resolve_collision_x(pos: &mut Vector2, vx: &mut f32, map: &Tilemap) {
    let left = (pos.x / TILE_SIZE).floor() as i32;
    let right = ((pos.x + PLAYER_W - 1.0) / TILE_SIZE).floor() as i32;
    let top = (pos.y / TILE_SIZE).floor() as i32;
    let bottom = ((pos.y + PLAYER_H - 1.0) / TILE_SIZE).floor() as i32;

    for row in top..=bottom {
        for col in left..=right {
            if !map.is_solid(col, row) {
                continue;
            }
            if *vx > 0.0 {
                pos.x = col as f32 * TILE_SIZE - PLAYER_W;
                *vx = 0.0;
            } else if *vx < 0.0 {
                pos.x = (col + 1) as f32 * TILE_SIZE;
                *vx = 0.0;
            } else {
                // Not moving: push out of the nearest edge.
                let overlap_left = (pos.x + PLAYER_W) - col as f32 * TILE_SIZE;
                let overlap_right = (col + 1) as f32 * TILE_SIZE - pos.x;
                if overlap_left < overlap_right {
                    pos.x = col as f32 * TILE_SIZE - PLAYER_W;
                } else {
                    pos.x = (col + 1) as f32 * TILE_SIZE;
                }
            }
        }
    }
}

/// Resolve Y overlap: downward contact grounds the player and zeroes the
/// fall; upward contact (head bump) only zeroes the rise.
///
/// The downward scan includes the pixel row directly under the feet, so a
/// player resting flush on a surface stays grounded instead of re-entering
/// the airborne state on every gravity tick.
fn resolve_collision_y(pos: &mut Vector2, vy: &mut f32, on_ground: &mut bool, map: &Tilemap) {
    let left = (pos.x / TILE_SIZE).floor() as i32;
    let right = ((pos.x + PLAYER_W - 1.0) / TILE_SIZE).floor() as i32;
    let top = (pos.y / TILE_SIZE).floor() as i32;

    if *vy > 0.0 {
        let bottom = ((pos.y + PLAYER_H) / TILE_SIZE).floor() as i32;
        // The highest overlapped solid row wins; anything below it would
        // re-snap the player into the ground.
        'down: for row in top..=bottom {
            for col in left..=right {
                if map.is_solid(col, row) {
                    pos.y = row as f32 * TILE_SIZE - PLAYER_H;
                    *vy = 0.0;
                    *on_ground = true;
                    break 'down;
                }
            }
        }
    } else if *vy < 0.0 {
        let bottom = ((pos.y + PLAYER_H - 1.0) / TILE_SIZE).floor() as i32;
        for row in top..=bottom {
            for col in left..=right {
                if map.is_solid(col, row) {
                    pos.y = (row + 1) as f32 * TILE_SIZE;
                    *vy = 0.0;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_map() -> Tilemap {
        Tilemap::from_rows(&["", "", "##########"])
    }

    #[test]
    fn test_x_resolution_pushes_out_and_stops() {
        let map = Tilemap::from_rows(&["  #"]);
        // Moving right into the tile at col 2 (x 32..48).
        let mut pos = Vector2 { x: 25.0, y: 0.0 };
        let mut vx = 2.0;
        resolve_collision_x(&mut pos, &mut vx, &map);
        assert_eq!(pos.x, 32.0 - PLAYER_W);
        assert_eq!(vx, 0.0);
    }

    #[test]
    fn test_y_resolution_grounds_on_downward_contact() {
        let map = flat_map();
        let mut pos = Vector2 { x: 4.0, y: 20.0 };
        let mut vy = 5.0;
        let mut on_ground = false;
        resolve_collision_y(&mut pos, &mut vy, &mut on_ground, &map);
        assert!(on_ground);
        assert_eq!(vy, 0.0);
        assert_eq!(pos.y, 2.0 * TILE_SIZE - PLAYER_H);
    }

    #[test]
    fn test_head_bump_does_not_ground() {
        let map = Tilemap::from_rows(&["####", "", ""]);
        let mut pos = Vector2 { x: 4.0, y: 14.0 };
        let mut vy = -3.0;
        let mut on_ground = false;
        resolve_collision_y(&mut pos, &mut vy, &mut on_ground, &map);
        assert!(!on_ground);
        assert_eq!(vy, 0.0);
        assert_eq!(pos.y, TILE_SIZE);
    }

    #[test]
    fn test_no_solid_overlap_after_resolution() {
        let map = flat_map();
        let mut pos = Vector2 { x: 50.0, y: 30.0 };
        let mut vy = MAX_FALL;
        let mut on_ground = false;
        resolve_collision_y(&mut pos, &mut vy, &mut on_ground, &map);
        // Every cell the player box now touches must be non-solid.
        let left = (pos.x / TILE_SIZE).floor() as i32;
        let right = ((pos.x + PLAYER_W - 1.0) / TILE_SIZE).floor() as i32;
        let top = (pos.y / TILE_SIZE).floor() as i32;
        let bottom = ((pos.y + PLAYER_H - 1.0) / TILE_SIZE).floor() as i32;
        for row in top..=bottom {
            for col in left..=right {
                assert!(!map.is_solid(col, row));
            }
        }
    }
}
