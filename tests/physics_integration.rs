//! Platforming feel integration tests: collision, coyote time, jump
//! buffering, variable jump height, and respawn.

use bevy_ecs::prelude::*;
use raylib::prelude::Vector2;

use heartrush::components::boxcollider::BoxCollider;
use heartrush::components::mapposition::MapPosition;
use heartrush::components::player::{PLAYER_H, PLAYER_W, Player, PlayerAnim};
use heartrush::components::rigidbody::RigidBody;
use heartrush::events::audio::{AudioCmd, Theme};
use heartrush::resources::effects::ScreenShake;
use heartrush::resources::input::InputState;
use heartrush::resources::level::{ActiveLevel, TILE_SIZE, Tilemap};
use heartrush::resources::worldtime::WorldTime;
use heartrush::systems::physics::{
    COYOTE_FRAMES, GRAVITY, JUMP_BUFFER_FRAMES, JUMP_FORCE, player_physics,
};

const EPSILON: f32 = 1e-3;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn make_world(rows: &[&str]) -> World {
    let tilemap = Tilemap::from_rows(rows);
    let mut world = World::new();
    world.insert_resource(WorldTime {
        delta: 1.0 / 60.0,
        ..Default::default()
    });
    world.insert_resource(InputState::default());
    world.insert_resource(ScreenShake::default());
    world.insert_resource(ActiveLevel {
        index: 0,
        title: "Test".into(),
        theme: Theme::Sky,
        total_hearts: tilemap.count_hearts(),
        tilemap,
    });
    world.init_resource::<Messages<AudioCmd>>();
    world
}

fn spawn_player(world: &mut World, x: f32, y: f32) -> Entity {
    world
        .spawn((
            MapPosition::new(x, y),
            RigidBody::new(),
            BoxCollider::new(PLAYER_W, PLAYER_H),
            Player::new(Vector2 { x, y }),
        ))
        .id()
}

fn tick(world: &mut World) {
    {
        let mut time = world.resource_mut::<WorldTime>();
        time.frame_count += 1;
    }
    let mut schedule = Schedule::default();
    schedule.add_systems(player_physics);
    schedule.run(world);
}

fn set_jump(world: &mut World, active: bool, just_pressed: bool, just_released: bool) {
    let mut input = world.resource_mut::<InputState>();
    input.jump.active = active;
    input.jump.just_pressed = just_pressed;
    input.jump.just_released = just_released;
}

fn set_right(world: &mut World, active: bool) {
    world.resource_mut::<InputState>().move_right.active = active;
}

fn player(world: &mut World, id: Entity) -> Player {
    world.get::<Player>(id).unwrap().clone()
}

fn velocity(world: &mut World, id: Entity) -> Vector2 {
    world.get::<RigidBody>(id).unwrap().velocity
}

fn position(world: &mut World, id: Entity) -> Vector2 {
    world.get::<MapPosition>(id).unwrap().pos
}

/// Flat ground at row 5 (y 80); flush standing height is 65.
const FLAT: &[&str] = &["", "", "", "", "", "####################"];

fn settle(world: &mut World, id: Entity) {
    for _ in 0..5 {
        tick(world);
    }
    assert!(player(world, id).on_ground, "player failed to settle");
}

#[test]
fn idle_frame_leaves_player_at_rest() {
    let mut world = make_world(FLAT);
    let id = spawn_player(&mut world, 32.0, 65.0);
    settle(&mut world, id);

    tick(&mut world);

    let p = player(&mut world, id);
    let v = velocity(&mut world, id);
    assert!(p.on_ground);
    assert_eq!(p.anim, PlayerAnim::Idle);
    assert_eq!(v.x, 0.0);
    assert_eq!(v.y, 0.0);
    assert!(approx_eq(position(&mut world, id).y, 65.0));
}

#[test]
fn friction_decays_vx_to_exact_zero() {
    let mut world = make_world(FLAT);
    let id = spawn_player(&mut world, 32.0, 65.0);
    settle(&mut world, id);

    world.get_mut::<RigidBody>(id).unwrap().velocity.x = 2.0;
    tick(&mut world);
    let after_one = velocity(&mut world, id).x;
    assert!(after_one > 0.0 && after_one < 2.0);

    for _ in 0..40 {
        tick(&mut world);
    }
    assert_eq!(velocity(&mut world, id).x, 0.0);
}

#[test]
fn jump_applies_impulse_exactly_once() {
    let mut world = make_world(FLAT);
    let id = spawn_player(&mut world, 32.0, 65.0);
    settle(&mut world, id);

    set_jump(&mut world, true, true, false);
    tick(&mut world);
    // Impulse then one tick of gravity.
    let vy1 = velocity(&mut world, id).y;
    assert!(approx_eq(vy1, JUMP_FORCE + GRAVITY));
    assert!(!player(&mut world, id).on_ground);
    assert!(player(&mut world, id).squash.y > 1.1);

    // Second frame with jump still held: no second impulse.
    set_jump(&mut world, true, false, false);
    tick(&mut world);
    let vy2 = velocity(&mut world, id).y;
    assert!(approx_eq(vy2, vy1 + GRAVITY));
}

#[test]
fn releasing_jump_early_halves_ascent_once() {
    let mut world = make_world(FLAT);
    let id = spawn_player(&mut world, 32.0, 65.0);
    settle(&mut world, id);

    set_jump(&mut world, true, true, false);
    tick(&mut world);
    let vy1 = velocity(&mut world, id).y;

    set_jump(&mut world, false, false, true);
    tick(&mut world);
    let vy2 = velocity(&mut world, id).y;
    assert!(approx_eq(vy2, vy1 * 0.5 + GRAVITY));

    // The cut is edge-triggered: it does not keep halving.
    set_jump(&mut world, false, false, false);
    tick(&mut world);
    assert!(approx_eq(velocity(&mut world, id).y, vy2 + GRAVITY));
}

/// Ground only under columns 0..=4; walking right falls off at x = 80.
const LEDGE: &[&str] = &["", "", "", "", "", "#####"];

fn walk_off_ledge(world: &mut World, id: Entity) {
    set_right(world, true);
    for _ in 0..60 {
        tick(world);
        if !player(world, id).on_ground {
            break;
        }
    }
    set_right(world, false);
    assert!(!player(world, id).on_ground, "player never left the ledge");
}

#[test]
fn coyote_jump_works_after_walking_off() {
    let mut world = make_world(LEDGE);
    let id = spawn_player(&mut world, 40.0, 65.0);
    settle(&mut world, id);
    walk_off_ledge(&mut world, id);

    let p = player(&mut world, id);
    assert!(p.coyote_timer > 0.0 && p.coyote_timer <= COYOTE_FRAMES);

    set_jump(&mut world, true, true, false);
    tick(&mut world);
    assert!(velocity(&mut world, id).y < JUMP_FORCE + 1.0);
    assert_eq!(player(&mut world, id).coyote_timer, 0.0);
}

#[test]
fn late_jump_after_coyote_window_is_ignored() {
    let mut world = make_world(LEDGE);
    let id = spawn_player(&mut world, 40.0, 65.0);
    settle(&mut world, id);
    walk_off_ledge(&mut world, id);

    for _ in 0..(COYOTE_FRAMES as usize + 1) {
        tick(&mut world);
        let p = player(&mut world, id);
        assert!(p.coyote_timer >= 0.0 && p.coyote_timer <= COYOTE_FRAMES);
    }
    assert_eq!(player(&mut world, id).coyote_timer, 0.0);

    set_jump(&mut world, true, true, false);
    tick(&mut world);
    // Still falling: the late press did not execute a jump.
    assert!(velocity(&mut world, id).y > 0.0);
}

#[test]
fn buffered_jump_fires_on_landing() {
    let mut world = make_world(FLAT);
    let id = spawn_player(&mut world, 32.0, 20.0);

    for _ in 0..10 {
        tick(&mut world);
    }
    assert!(!player(&mut world, id).on_ground);

    // Press while airborne, shortly before landing.
    set_jump(&mut world, true, true, false);
    tick(&mut world);
    set_jump(&mut world, true, false, false);

    let mut min_vy = f32::MAX;
    for _ in 0..(JUMP_BUFFER_FRAMES as usize + 2) {
        tick(&mut world);
        let p = player(&mut world, id);
        assert!(p.jump_buffer_timer >= 0.0 && p.jump_buffer_timer <= JUMP_BUFFER_FRAMES);
        min_vy = min_vy.min(velocity(&mut world, id).y);
    }
    assert!(min_vy < JUMP_FORCE + 1.5, "buffered jump never fired");
}

#[test]
fn expired_buffer_does_not_jump() {
    let mut world = make_world(FLAT);
    let id = spawn_player(&mut world, 32.0, 0.0);

    // Press immediately; the fall takes longer than the buffer window.
    set_jump(&mut world, true, true, false);
    tick(&mut world);
    set_jump(&mut world, true, false, false);

    let mut min_vy = f32::MAX;
    for _ in 0..40 {
        tick(&mut world);
        min_vy = min_vy.min(velocity(&mut world, id).y);
    }
    assert!(min_vy > -1.0);
    assert!(player(&mut world, id).on_ground);
}

#[test]
fn landing_resets_combo_same_frame() {
    let mut world = make_world(FLAT);
    let id = spawn_player(&mut world, 32.0, 30.0);
    world.get_mut::<Player>(id).unwrap().combo = 5;

    for _ in 0..30 {
        let was_grounded = player(&mut world, id).on_ground;
        tick(&mut world);
        let p = player(&mut world, id);
        if !was_grounded && p.on_ground {
            assert_eq!(p.combo, 0, "combo must reset on the landing frame");
            return;
        }
        assert_eq!(p.combo, 5);
    }
    panic!("player never landed");
}

#[test]
fn falling_out_of_the_level_respawns_at_last_safe() {
    // A single ground tile; walking right drops into the void.
    let mut world = make_world(&["", "", "#"]);
    let id = spawn_player(&mut world, 3.0, 17.0);
    settle(&mut world, id);
    let safe = player(&mut world, id).last_safe;

    set_right(&mut world, true);
    for _ in 0..8 {
        tick(&mut world);
    }
    set_right(&mut world, false);

    let mut respawned = false;
    for _ in 0..120 {
        tick(&mut world);
        let p = player(&mut world, id);
        if p.invincible_timer > 0.0 {
            let pos = position(&mut world, id);
            assert!(approx_eq(pos.y, safe.y));
            assert!(world.resource::<ScreenShake>().intensity > 0.0);
            respawned = true;
            break;
        }
    }
    assert!(respawned, "player never fell back to the safe position");
}

#[test]
fn player_never_ends_a_frame_inside_solid_tiles() {
    let map = &[
        "",
        "",
        "     ===",
        "",
        "#",
        "####################",
    ];
    let mut world = make_world(map);
    let id = spawn_player(&mut world, 32.0, 65.0);
    settle(&mut world, id);

    for frame in 0..240 {
        {
            let mut input = world.resource_mut::<InputState>();
            input.move_left.active = frame % 80 >= 40;
            input.move_right.active = frame % 80 < 40;
            let jump_now = frame % 30 == 0;
            input.jump.active = jump_now;
            input.jump.just_pressed = jump_now;
            input.jump.just_released = frame % 30 == 5;
        }
        tick(&mut world);

        let pos = position(&mut world, id);
        let map = &world.resource::<ActiveLevel>().tilemap;
        let left = (pos.x / TILE_SIZE).floor() as i32;
        let right = ((pos.x + PLAYER_W - 1.0) / TILE_SIZE).floor() as i32;
        let top = (pos.y / TILE_SIZE).floor() as i32;
        let bottom = ((pos.y + PLAYER_H - 1.0) / TILE_SIZE).floor() as i32;
        for row in top..=bottom {
            for col in left..=right {
                assert!(
                    !map.is_solid(col, row),
                    "frame {}: player box at ({}, {}) overlaps solid tile ({}, {})",
                    frame,
                    pos.x,
                    pos.y,
                    col,
                    row
                );
            }
        }

        let p = player(&mut world, id);
        assert!(p.coyote_timer >= 0.0 && p.coyote_timer <= COYOTE_FRAMES);
        assert!(p.jump_buffer_timer >= 0.0 && p.jump_buffer_timer <= JUMP_BUFFER_FRAMES);
    }
}
