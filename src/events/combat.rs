//! Stomp and player-hit outcomes of enemy contact.
//!
//! The enemy collision system resolves the physics of each contact (bounce,
//! teleport, timers) and triggers these events; the observers here handle
//! the decoupled side effects: score, popups, shake, particles, and sound.

use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use fastrand::Rng;
use raylib::prelude::{Color, Vector2};

use crate::components::enemy::EnemyKind;
use crate::components::particle::Particle;
use crate::components::popup::ScorePopup;
use crate::components::mapposition::MapPosition;
use crate::events::audio::{AudioCmd, SfxKind};
use crate::resources::effects::{ComboPopup, ScreenShake};
use crate::resources::score::{ScoreBoard, stomp_points};

/// A non-hazard enemy was stomped. `pos` is the enemy's center; `combo` is
/// the post-increment combo count.
#[derive(Event, Debug, Clone, Copy)]
pub struct StompEvent {
    pub pos: Vector2,
    pub kind: EnemyKind,
    pub combo: u32,
}

/// The player took a damaging hit. `pos` is the player's center at impact.
#[derive(Event, Debug, Clone, Copy)]
pub struct PlayerHitEvent {
    pub pos: Vector2,
}

pub fn observe_stomp(
    trigger: On<StompEvent>,
    mut commands: Commands,
    mut score: ResMut<ScoreBoard>,
    mut shake: ResMut<ScreenShake>,
    mut combo_popup: ResMut<ComboPopup>,
    mut audio: MessageWriter<AudioCmd>,
    mut rng: Local<Rng>,
) {
    let ev = trigger.event();
    let top = Vector2 {
        x: ev.pos.x,
        y: ev.pos.y - ev.kind.size().y / 2.0,
    };

    let points = stomp_points(ev.combo);
    score.add(points);
    commands.spawn((
        MapPosition::new(top.x, top.y),
        ScorePopup::new(format!("+{}", points), 40.0),
    ));

    if ev.combo > 1 {
        combo_popup.show(
            format!("{}x COMBO!", ev.combo),
            Vector2 {
                x: top.x,
                y: top.y - 15.0,
            },
        );
        audio.write(AudioCmd::PlaySfx {
            kind: SfxKind::Combo(ev.combo),
        });
    }

    shake.raise(3.0 + ev.combo as f32 * 1.5);
    audio.write(AudioCmd::PlaySfx {
        kind: SfxKind::Stomp,
    });

    // Radial death burst in the enemy's color.
    let color = ev.kind.burst_color();
    for j in 0..12 {
        let angle = (j as f32 / 12.0) * std::f32::consts::TAU;
        let speed = 2.0 + rng.f32() * 2.0;
        commands.spawn(Particle::bundle(
            ev.pos,
            Vector2 {
                x: angle.cos() * speed,
                y: angle.sin() * speed - 1.0,
            },
            25.0 + rng.f32() * 10.0,
            2.0,
            color,
            false,
        ));
    }
}

pub fn observe_player_hit(
    trigger: On<PlayerHitEvent>,
    mut commands: Commands,
    mut shake: ResMut<ScreenShake>,
    mut audio: MessageWriter<AudioCmd>,
) {
    let pos = trigger.event().pos;

    shake.raise(6.0);
    audio.write(AudioCmd::PlaySfx {
        kind: SfxKind::Hurt,
    });

    for j in 0..12 {
        let angle = (j as f32 / 12.0) * std::f32::consts::TAU;
        let color = if j % 2 == 0 {
            Color::new(255, 0, 0, 255)
        } else {
            Color::new(255, 68, 68, 255)
        };
        commands.spawn(Particle::bundle(
            pos,
            Vector2 {
                x: angle.cos() * 3.0,
                y: angle.sin() * 3.0,
            },
            30.0,
            2.0,
            color,
            false,
        ));
    }
}
