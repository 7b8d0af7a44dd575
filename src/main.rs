//! Heartrush main entry point.
//!
//! A 2D side-scrolling platformer written in Rust using:
//! - **raylib** for windowing, graphics, input, and the audio device
//! - **bevy_ecs** for entity-component-system architecture
//!
//! # Main Loop
//!
//! 1. Initialize the raylib window, ECS world, and resources
//! 2. Spawn the audio thread (its own clock, bridged by channels)
//! 3. Register observers and state-enter hooks
//! 4. Run the frame loop:
//!    - Update input, game flow, physics, enemies, pickups, camera, effects
//!    - Render into the fixed-resolution target and blit letterboxed
//! 5. Join the audio thread on exit
//!
//! # Running
//!
//! ```sh
//! cargo run --release
//! ```

// Do not create console on Windows
#![cfg_attr(target_os = "windows", windows_subsystem = "windows")]

mod components;
mod events;
mod game;
mod resources;
mod systems;

use std::path::PathBuf;

use bevy_ecs::observer::Observer;
use bevy_ecs::prelude::*;
use clap::Parser;

use crate::components::persistent::Persistent;
use crate::events::audio::AudioCmd;
use crate::events::combat::{observe_player_hit, observe_stomp};
use crate::events::gamestate::observe_gamestate_change;
use crate::events::level::observe_portal_reached;
use crate::events::pickup::observe_heart_collected;
use crate::resources::audio::{Muted, setup_audio, shutdown_audio};
use crate::resources::camera::ScrollCamera;
use crate::resources::effects::{ComboPopup, ScreenShake};
use crate::resources::gameconfig::GameConfig;
use crate::resources::gamestate::{GameState, GameStates, NextGameState};
use crate::resources::input::InputState;
use crate::resources::level::{CollectedHearts, CurrentLevel, LevelStore};
use crate::resources::rendertarget::RenderTarget;
use crate::resources::score::ScoreBoard;
use crate::resources::screensize::ScreenSize;
use crate::resources::systemsstore::SystemsStore;
use crate::resources::transition::{PendingBgm, Transition};
use crate::resources::worldtime::WorldTime;
use crate::systems::audio::{
    forward_audio_cmds, poll_audio_messages, update_bevy_audio_cmds, update_bevy_audio_messages,
};
use crate::systems::camera::camera_follow;
use crate::systems::enemy::{enemy_ai, enemy_player_collision};
use crate::systems::gameflow::gameflow;
use crate::systems::gamestate::{check_pending_state, state_is_playing};
use crate::systems::input::update_input_state;
use crate::systems::particles::particle_system;
use crate::systems::physics::player_physics;
use crate::systems::pickup::{heart_collection, portal_check};
use crate::systems::popups::popup_system;
use crate::systems::render::render_system;
use crate::systems::shake::shake_system;
use crate::systems::time::update_world_time;

/// Heartrush: a 2D platformer with a procedural chiptune heart.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Path to an alternate configuration file (default: ./config.ini).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Load a JSON level pack instead of the built-in levels.
    #[arg(long, value_name = "PATH")]
    levels: Option<PathBuf>,

    /// Start with audio muted.
    #[arg(long)]
    muted: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => GameConfig::with_path(path),
        None => GameConfig::new(),
    };
    config.load_from_file().ok(); // ignore errors, use defaults
    if cli.muted {
        config.start_muted = true;
    }

    // --------------- Raylib window & render target ---------------
    let (mut rl, thread) = raylib::init()
        .size(config.window_width as i32, config.window_height as i32)
        .resizable()
        .title("Heartrush")
        .build();
    rl.set_target_fps(config.target_fps);

    let render_target =
        RenderTarget::new(&mut rl, &thread, config.render_width, config.render_height)
            .expect("Failed to create render target");

    // --------------- ECS world + resources ---------------
    let mut world = World::new();
    world.insert_resource(WorldTime::default());
    world.insert_resource(ScreenSize {
        w: config.render_width as i32,
        h: config.render_height as i32,
    });
    world.insert_resource(InputState::default());
    world.insert_resource(ScrollCamera::default());
    world.insert_resource(ScoreBoard::default());
    world.insert_resource(ScreenShake::default());
    world.insert_resource(ComboPopup::default());
    world.insert_resource(Transition::default());
    world.insert_resource(PendingBgm::default());
    world.insert_resource(CollectedHearts::default());
    world.insert_resource(CurrentLevel::default());
    world.insert_resource(LevelStore::load_or_builtin(cli.levels.as_deref()));
    world.insert_resource(Muted(config.start_muted));
    world.insert_resource(GameState::new());
    world.insert_resource(NextGameState::new());

    // Spawns the audio thread; must go before the first audio commands.
    setup_audio(&mut world);
    {
        let mut cmds = world.resource_mut::<Messages<AudioCmd>>();
        cmds.write(AudioCmd::SetVolume(config.master_volume));
        if config.start_muted {
            cmds.write(AudioCmd::SetMuted(true));
        }
    }

    world.insert_resource(config);
    world.insert_non_send_resource(render_target);
    world.insert_non_send_resource(rl);
    world.insert_non_send_resource(thread);

    // --------------- Observers ---------------
    world.spawn((Observer::new(observe_gamestate_change), Persistent));
    world.spawn((Observer::new(observe_stomp), Persistent));
    world.spawn((Observer::new(observe_player_hit), Persistent));
    world.spawn((Observer::new(observe_heart_collected), Persistent));
    world.spawn((Observer::new(observe_portal_reached), Persistent));

    // --------------- State-enter hooks ---------------
    // NOTE: registered systems are stored as entities; mark them Persistent
    // so they survive level cleanup.
    let mut systems_store = SystemsStore::new();

    let id = world.register_system(game::enter_title);
    world.entity_mut(id.entity()).insert(Persistent);
    systems_store.set_enter(GameStates::Title, id);

    let id = world.register_system(game::load_level);
    world.entity_mut(id.entity()).insert(Persistent);
    systems_store.set_enter(GameStates::LevelIntro, id);

    let id = world.register_system(game::enter_play);
    world.entity_mut(id.entity()).insert(Persistent);
    systems_store.set_enter(GameStates::Playing, id);

    let id = world.register_system(game::enter_level_complete);
    world.entity_mut(id.entity()).insert(Persistent);
    systems_store.set_enter(GameStates::LevelComplete, id);

    let id = world.register_system(game::enter_memory_card);
    world.entity_mut(id.entity()).insert(Persistent);
    systems_store.set_enter(GameStates::MemoryCard, id);

    let id = world.register_system(game::enter_finale);
    world.entity_mut(id.entity()).insert(Persistent);
    systems_store.set_enter(GameStates::Finale, id);

    let id = world.register_system(game::clean_level_entities);
    world.entity_mut(id.entity()).insert(Persistent);
    systems_store.set_cleanup(id);

    world.insert_resource(systems_store);
    world.flush();

    // --------------- Schedule ---------------
    let mut update = Schedule::default();
    update.add_systems(update_input_state);
    update.add_systems(check_pending_state.after(update_input_state));
    update.add_systems(
        // audio bridge systems must run together, in order
        (
            update_bevy_audio_cmds,
            forward_audio_cmds,
            poll_audio_messages,
            update_bevy_audio_messages,
        )
            .chain(),
    );
    update.add_systems(gameflow.after(check_pending_state));
    update.add_systems(shake_system);
    update.add_systems(popup_system);
    update.add_systems(player_physics.run_if(state_is_playing).after(gameflow));
    update.add_systems(enemy_ai.run_if(state_is_playing).after(player_physics));
    update.add_systems(
        enemy_player_collision
            .run_if(state_is_playing)
            .after(enemy_ai),
    );
    update.add_systems(
        heart_collection
            .run_if(state_is_playing)
            .after(enemy_player_collision),
    );
    update.add_systems(portal_check.run_if(state_is_playing).after(heart_collection));
    update.add_systems(camera_follow.run_if(state_is_playing).after(player_physics));
    update.add_systems(particle_system.after(player_physics));
    update.add_systems(
        render_system
            .after(gameflow)
            .after(camera_follow)
            .after(particle_system)
            .after(shake_system)
            .after(popup_system),
    );

    update
        .initialize(&mut world)
        .expect("Failed to initialize schedule");

    // --------------- Main loop ---------------
    while !world
        .non_send_resource::<raylib::RaylibHandle>()
        .window_should_close()
    {
        let dt = world
            .non_send_resource::<raylib::RaylibHandle>()
            .get_frame_time();
        update_world_time(&mut world, dt);

        update.run(&mut world);

        world.clear_trackers(); // Clear changed components for next frame
    }
    shutdown_audio(&mut world);
}
