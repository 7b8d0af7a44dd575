//! Heart collection event and observer.

use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use raylib::prelude::{Color, Vector2};

use crate::components::mapposition::MapPosition;
use crate::components::particle::Particle;
use crate::components::popup::ScorePopup;
use crate::events::audio::{AudioCmd, SfxKind};
use crate::resources::score::{SCORE_HEART, ScoreBoard};

/// A heart tile was consumed. `pos` is the tile center.
#[derive(Event, Debug, Clone, Copy)]
pub struct HeartCollectedEvent {
    pub pos: Vector2,
}

const SPARKLE_COLORS: [Color; 4] = [
    Color { r: 255, g: 20, b: 147, a: 255 },
    Color { r: 255, g: 105, b: 180, a: 255 },
    Color { r: 255, g: 215, b: 0, a: 255 },
    Color { r: 255, g: 255, b: 255, a: 255 },
];

pub fn observe_heart_collected(
    trigger: On<HeartCollectedEvent>,
    mut commands: Commands,
    mut score: ResMut<ScoreBoard>,
    mut audio: MessageWriter<AudioCmd>,
) {
    let pos = trigger.event().pos;

    score.add(SCORE_HEART);
    commands.spawn((
        MapPosition::new(pos.x, pos.y),
        ScorePopup::new(format!("+{}", SCORE_HEART), 35.0),
    ));
    audio.write(AudioCmd::PlaySfx {
        kind: SfxKind::Heart,
    });

    // Circular sparkle burst.
    for i in 0..12 {
        let angle = (i as f32 / 12.0) * std::f32::consts::TAU;
        commands.spawn(Particle::bundle(
            pos,
            Vector2 {
                x: angle.cos() * 2.5,
                y: angle.sin() * 2.5,
            },
            30.0,
            2.0,
            SPARKLE_COLORS[i % 4],
            i % 3 == 0,
        ));
    }
}
