//! Scoring, combat outcomes, camera clamping, and transient effects.

use bevy_ecs::observer::Observer;
use bevy_ecs::prelude::*;
use bevy_ecs::schedule::IntoScheduleConfigs;
use bevy_ecs::system::ScheduleSystem;
use raylib::prelude::Vector2;

use heartrush::components::boxcollider::BoxCollider;
use heartrush::components::enemy::{Behavior, Enemy, EnemyKind};
use heartrush::components::mapposition::MapPosition;
use heartrush::components::particle::Particle;
use heartrush::components::player::{PLAYER_H, PLAYER_W, Player};
use heartrush::components::popup::ScorePopup;
use heartrush::components::rigidbody::RigidBody;
use heartrush::events::audio::{AudioCmd, Theme};
use heartrush::events::combat::{StompEvent, observe_player_hit, observe_stomp};
use heartrush::events::pickup::{HeartCollectedEvent, observe_heart_collected};
use heartrush::resources::camera::ScrollCamera;
use heartrush::resources::effects::{ComboPopup, ScreenShake};
use heartrush::resources::input::InputState;
use heartrush::resources::level::{ActiveLevel, CollectedHearts, Tilemap};
use heartrush::resources::score::{SCORE_HEART, ScoreBoard, stomp_points};
use heartrush::resources::screensize::ScreenSize;
use heartrush::resources::worldtime::WorldTime;
use heartrush::systems::camera::camera_follow;
use heartrush::systems::enemy::{enemy_ai, enemy_player_collision};
use heartrush::systems::particles::particle_system;
use heartrush::systems::physics::{INVINCIBLE_FRAMES, JUMP_FORCE};
use heartrush::systems::pickup::heart_collection;
use heartrush::systems::popups::popup_system;
use heartrush::systems::shake::shake_system;

fn make_world() -> World {
    let mut world = World::new();
    world.insert_resource(WorldTime {
        delta: 1.0 / 60.0,
        ..Default::default()
    });
    world.insert_resource(InputState::default());
    world.insert_resource(ScoreBoard::default());
    world.insert_resource(ScreenShake::default());
    world.insert_resource(ComboPopup::default());
    world.insert_resource(CollectedHearts::default());
    world.insert_resource(ScreenSize { w: 400, h: 240 });
    world.insert_resource(ScrollCamera::default());
    world.init_resource::<Messages<AudioCmd>>();

    world.spawn(Observer::new(observe_stomp));
    world.spawn(Observer::new(observe_player_hit));
    world.spawn(Observer::new(observe_heart_collected));
    world.flush();
    world
}

fn insert_level(world: &mut World, rows: &[&str]) {
    let tilemap = Tilemap::from_rows(rows);
    world.insert_resource(ActiveLevel {
        index: 0,
        title: "Test".into(),
        theme: Theme::Istanbul,
        total_hearts: tilemap.count_hearts(),
        tilemap,
    });
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

fn run<M>(world: &mut World, system: impl IntoScheduleConfigs<ScheduleSystem, M>) {
    let mut schedule = Schedule::default();
    schedule.add_systems(system);
    schedule.run(world);
}

#[test]
fn stomp_scoring_uses_capped_combo_multiplier() {
    let mut world = make_world();

    world.trigger(StompEvent {
        pos: Vector2 { x: 50.0, y: 50.0 },
        kind: EnemyKind::BrokenHeart,
        combo: 3,
    });
    world.flush();
    assert_eq!(world.resource::<ScoreBoard>().get(), stomp_points(3));
    assert_eq!(world.resource::<ScoreBoard>().get(), 600);

    // A seventh consecutive stomp still pays the capped multiplier.
    world.trigger(StompEvent {
        pos: Vector2 { x: 50.0, y: 50.0 },
        kind: EnemyKind::Teardrop,
        combo: 7,
    });
    world.flush();
    assert_eq!(world.resource::<ScoreBoard>().get(), 600 + 1000);

    // Both stomps left a floating score popup; the multi-stomp also put up
    // a combo popup and raised the shake.
    let mut popups = world.query::<&ScorePopup>();
    assert_eq!(popups.iter(&world).count(), 2);
    assert!(world.resource::<ComboPopup>().active());
    assert!(world.resource::<ScreenShake>().intensity >= 3.0 + 7.0 * 1.5);
}

#[test]
fn stomp_through_collision_system() {
    let mut world = make_world();
    // Enemy on the ground; the player falls onto its top half.
    let enemy = world
        .spawn((
            MapPosition::new(100.0, 100.0),
            RigidBody::new(),
            BoxCollider::new(12.0, 14.0),
            Enemy::new(
                EnemyKind::BrokenHeart,
                Behavior::Patrol {
                    left: 90.0,
                    right: 120.0,
                    speed: 0.6,
                },
            ),
        ))
        .id();
    let player = spawn_player(&mut world, 101.0, 88.0);
    world.get_mut::<RigidBody>(player).unwrap().velocity.y = 2.0;

    run(&mut world, enemy_player_collision);

    let e = world.get::<Enemy>(enemy).unwrap();
    assert!(!e.alive);
    assert!(e.death_timer > 0.0);
    let p = world.get::<Player>(player).unwrap();
    assert_eq!(p.combo, 1);
    let vy = world.get::<RigidBody>(player).unwrap().velocity.y;
    assert!((vy - JUMP_FORCE * 0.6).abs() < 1e-4);
    // Observer awarded base points for a first stomp.
    assert_eq!(world.resource::<ScoreBoard>().get(), stomp_points(1));

    // Dead enemies are excluded from further collision and AI movement.
    run(&mut world, enemy_player_collision);
    assert_eq!(world.resource::<ScoreBoard>().get(), stomp_points(1));
}

#[test]
fn thorn_rejects_stomp_and_hits_instead() {
    let mut world = make_world();
    let thorn = world
        .spawn((
            MapPosition::new(100.0, 100.0),
            RigidBody::new(),
            BoxCollider::new(14.0, 16.0),
            Enemy::new(EnemyKind::Thorn, Behavior::Stationary),
        ))
        .id();
    let player = spawn_player(&mut world, 101.0, 87.0);
    {
        let mut p = world.get_mut::<Player>(player).unwrap();
        p.last_safe = Vector2 { x: 10.0, y: 20.0 };
    }
    world.get_mut::<RigidBody>(player).unwrap().velocity.y = 2.0;

    run(&mut world, enemy_player_collision);

    // The stomp was rejected and the contact resolved as a hit.
    assert!(world.get::<Enemy>(thorn).unwrap().alive);
    let p = world.get::<Player>(player).unwrap();
    assert_eq!(p.combo, 0);
    assert!((p.invincible_timer - INVINCIBLE_FRAMES).abs() < 1e-4);
    let pos = world.get::<MapPosition>(player).unwrap().pos;
    assert_eq!(pos.x, 10.0);
    assert_eq!(pos.y, 20.0);
    assert_eq!(world.get::<RigidBody>(player).unwrap().velocity.y, 0.0);
    assert!(world.resource::<ScreenShake>().intensity >= 6.0);
    assert_eq!(world.resource::<ScoreBoard>().get(), 0);
}

#[test]
fn invincibility_ignores_hits() {
    let mut world = make_world();
    world.spawn((
        MapPosition::new(100.0, 100.0),
        RigidBody::new(),
        BoxCollider::new(14.0, 16.0),
        Enemy::new(EnemyKind::Thorn, Behavior::Stationary),
    ));
    let player = spawn_player(&mut world, 101.0, 98.0);
    {
        let mut p = world.get_mut::<Player>(player).unwrap();
        p.invincible_timer = 30.0;
        p.last_safe = Vector2 { x: 10.0, y: 20.0 };
    }

    run(&mut world, enemy_player_collision);

    // Untouched: no teleport, no shake.
    let pos = world.get::<MapPosition>(player).unwrap().pos;
    assert_eq!(pos.x, 101.0);
    assert_eq!(world.resource::<ScreenShake>().intensity, 0.0);
}

#[test]
fn hearts_award_exactly_once() {
    let mut world = make_world();
    insert_level(&mut world, &["", "  H", "#####"]);
    let player = spawn_player(&mut world, 32.0, 17.0);

    run(&mut world, heart_collection);
    assert_eq!(world.resource::<ScoreBoard>().get(), SCORE_HEART);
    assert_eq!(world.get::<Player>(player).unwrap().hearts_collected, 1);
    assert!(world.resource::<CollectedHearts>().contains(2, 1));

    // Standing on the same tile again pays nothing.
    run(&mut world, heart_collection);
    run(&mut world, heart_collection);
    assert_eq!(world.resource::<ScoreBoard>().get(), SCORE_HEART);
    assert_eq!(world.get::<Player>(player).unwrap().hearts_collected, 1);
}

#[test]
fn score_is_monotonic_across_award_sources() {
    let mut world = make_world();
    let mut last = 0;
    world.trigger(HeartCollectedEvent {
        pos: Vector2 { x: 0.0, y: 0.0 },
    });
    world.flush();
    let score = world.resource::<ScoreBoard>().get();
    assert!(score >= last);
    last = score;

    for combo in 1..=8 {
        world.trigger(StompEvent {
            pos: Vector2 { x: 0.0, y: 0.0 },
            kind: EnemyKind::Teardrop,
            combo,
        });
        world.flush();
        let score = world.resource::<ScoreBoard>().get();
        assert!(score >= last);
        last = score;
    }
}

#[test]
fn camera_stays_inside_level_bounds() {
    let mut world = make_world();
    // 30 tiles wide: 480 px of world for a 400 px view.
    insert_level(&mut world, &["", "", "##############################"]);
    let player = spawn_player(&mut world, 0.0, 17.0);
    world.get_mut::<Player>(player).unwrap().facing = -1.0;

    for _ in 0..120 {
        run(&mut world, camera_follow);
        let x = world.resource::<ScrollCamera>().x;
        assert!((0.0..=80.0).contains(&x));
    }
    assert_eq!(world.resource::<ScrollCamera>().x, 0.0);

    // Far right edge: the camera saturates at the scroll limit.
    world.get_mut::<MapPosition>(player).unwrap().pos.x = 470.0;
    world.get_mut::<Player>(player).unwrap().facing = 1.0;
    for _ in 0..600 {
        run(&mut world, camera_follow);
        let x = world.resource::<ScrollCamera>().x;
        assert!((0.0..=80.0).contains(&x));
    }
    assert!((world.resource::<ScrollCamera>().x - 80.0).abs() < 0.5);
}

#[test]
fn teardrop_bob_is_render_only() {
    let mut world = make_world();
    let enemy = world
        .spawn((
            MapPosition::new(100.0, 100.0),
            RigidBody::new(),
            BoxCollider::new(12.0, 14.0),
            Enemy::new(
                EnemyKind::Teardrop,
                Behavior::Patrol {
                    left: 80.0,
                    right: 130.0,
                    speed: 1.0,
                },
            ),
        ))
        .id();

    for _ in 0..30 {
        run(&mut world, enemy_ai);
    }
    // The bob oscillates but the collision position's y never moves.
    let e = world.get::<Enemy>(enemy).unwrap();
    assert!(e.bob_offset.abs() <= 0.8);
    assert_eq!(world.get::<MapPosition>(enemy).unwrap().pos.y, 100.0);
}

#[test]
fn shake_decays_to_exact_zero() {
    let mut world = make_world();
    world.resource_mut::<ScreenShake>().raise(5.0);

    let mut saw_offset = false;
    for _ in 0..200 {
        run(&mut world, shake_system);
        let shake = *world.resource::<ScreenShake>();
        if shake.intensity > 0.0 {
            assert!(shake.offset.x.abs() <= 5.0);
            assert!(shake.offset.y.abs() <= 5.0);
            if shake.offset.x != 0.0 {
                saw_offset = true;
            }
        }
    }
    let shake = *world.resource::<ScreenShake>();
    assert_eq!(shake.intensity, 0.0);
    assert_eq!(shake.offset.x, 0.0);
    assert_eq!(shake.offset.y, 0.0);
    assert!(saw_offset);
}

#[test]
fn particles_and_popups_expire() {
    let mut world = make_world();
    world.spawn(Particle::bundle(
        Vector2 { x: 10.0, y: 10.0 },
        Vector2 { x: 1.0, y: -1.0 },
        3.0,
        2.0,
        raylib::prelude::Color::WHITE,
        false,
    ));
    world.spawn((MapPosition::new(0.0, 0.0), ScorePopup::new("+100", 2.0)));

    for _ in 0..2 {
        run(&mut world, particle_system);
        run(&mut world, popup_system);
    }
    {
        let mut particles = world.query::<&Particle>();
        assert_eq!(particles.iter(&world).count(), 1);
    }

    for _ in 0..3 {
        run(&mut world, particle_system);
        run(&mut world, popup_system);
    }
    let mut particles = world.query::<&Particle>();
    assert_eq!(particles.iter(&world).count(), 0);
    let mut popups = world.query::<&ScorePopup>();
    assert_eq!(popups.iter(&world).count(), 0);
}
