//! Level loading and state-enter hooks.
//!
//! These systems are registered in the
//! [`SystemsStore`](crate::resources::systemsstore::SystemsStore) at startup
//! and run by the gamestate observer when the matching state is entered.

use bevy_ecs::prelude::*;
use log::warn;
use raylib::prelude::Vector2;

use crate::components::boxcollider::BoxCollider;
use crate::components::enemy::{Behavior, Enemy};
use crate::components::mapposition::MapPosition;
use crate::components::persistent::Persistent;
use crate::components::player::{PLAYER_H, PLAYER_W, Player};
use crate::components::rigidbody::RigidBody;
use crate::events::audio::{AudioCmd, SfxKind, Theme};
use crate::resources::camera::ScrollCamera;
use crate::resources::effects::ComboPopup;
use crate::resources::level::{
    ActiveLevel, CollectedHearts, CurrentLevel, LevelStore, TILE_SIZE, Tilemap,
};
use crate::resources::screensize::ScreenSize;
use crate::resources::transition::{FINALE_BGM_DELAY_FRAMES, PendingBgm};

/// Patrol speed multiplier growth per level index.
const DIFFICULTY_STEP: f32 = 0.15;

/// Despawn every level-scoped entity. Observers and registered systems are
/// marked [`Persistent`] and survive.
pub fn clean_level_entities(
    mut commands: Commands,
    query: Query<Entity, (Without<Persistent>, Without<bevy_ecs::observer::Observer>)>,
) {
    for entity in query.iter() {
        commands.entity(entity).try_despawn();
    }
}

/// Build the active level: parse the grid, spawn the player and enemies,
/// reset camera and per-level collections. Runs on entering the level
/// intro; also fires the intro sound and silences the previous theme.
pub fn load_level(
    mut commands: Commands,
    levels: Res<LevelStore>,
    current: Res<CurrentLevel>,
    screen: Res<ScreenSize>,
    mut camera: ResMut<ScrollCamera>,
    mut collected: ResMut<CollectedHearts>,
    mut combo_popup: ResMut<ComboPopup>,
    mut audio: MessageWriter<AudioCmd>,
) {
    let Some(data) = levels.get(current.0) else {
        warn!("No level at index {}", current.0);
        return;
    };

    let tilemap = Tilemap::from_rows(&data.map);
    let start = Vector2 {
        x: data.player_start.0 as f32 * TILE_SIZE,
        y: data.player_start.1 as f32 * TILE_SIZE,
    };

    commands.spawn((
        MapPosition::new(start.x, start.y),
        RigidBody::new(),
        BoxCollider::new(PLAYER_W, PLAYER_H),
        Player::new(start),
    ));

    let difficulty = 1.0 + current.0 as f32 * DIFFICULTY_STEP;
    for def in &data.enemies {
        let size = def.kind.size();
        let behavior = if def.kind.base_speed() > 0.0 {
            Behavior::Patrol {
                left: def.patrol_left.unwrap_or(def.x) as f32 * TILE_SIZE,
                right: def.patrol_right.unwrap_or(def.x) as f32 * TILE_SIZE,
                speed: def.kind.base_speed() * difficulty,
            }
        } else {
            Behavior::Stationary
        };
        commands.spawn((
            MapPosition::new(
                def.x as f32 * TILE_SIZE,
                def.y as f32 * TILE_SIZE - size.y + TILE_SIZE,
            ),
            RigidBody::new(),
            BoxCollider::new(size.x, size.y),
            Enemy::new(def.kind, behavior),
        ));
    }

    camera.x = (start.x - screen.w as f32 / 2.0).max(0.0);
    collected.clear();
    combo_popup.timer = 0.0;

    commands.insert_resource(ActiveLevel {
        index: current.0,
        title: data.title.clone(),
        theme: data.theme,
        total_hearts: tilemap.count_hearts(),
        tilemap,
    });

    audio.write(AudioCmd::StopBgm);
    audio.write(AudioCmd::PlaySfx {
        kind: SfxKind::Portal,
    });
}

pub fn enter_title(mut audio: MessageWriter<AudioCmd>) {
    audio.write(AudioCmd::PlayBgm {
        theme: Theme::Title,
    });
}

pub fn enter_play(level: Option<Res<ActiveLevel>>, mut audio: MessageWriter<AudioCmd>) {
    if let Some(level) = level {
        audio.write(AudioCmd::PlayBgm { theme: level.theme });
    }
}

pub fn enter_level_complete(mut audio: MessageWriter<AudioCmd>) {
    audio.write(AudioCmd::PlaySfx {
        kind: SfxKind::LevelComplete,
    });
    audio.write(AudioCmd::StopBgm);
}

pub fn enter_memory_card(mut audio: MessageWriter<AudioCmd>) {
    audio.write(AudioCmd::StopBgm);
    audio.write(AudioCmd::PlayBgm {
        theme: Theme::Memory,
    });
}

/// The finale fires its fanfare immediately; the background music start is
/// deferred so the fanfare can ring out, and cancelled if the state changes
/// again before it fires.
pub fn enter_finale(mut pending_bgm: ResMut<PendingBgm>, mut audio: MessageWriter<AudioCmd>) {
    audio.write(AudioCmd::StopBgm);
    audio.write(AudioCmd::PlaySfx {
        kind: SfxKind::Finale,
    });
    pending_bgm.arm(Theme::Finale, FINALE_BGM_DELAY_FRAMES);
}
