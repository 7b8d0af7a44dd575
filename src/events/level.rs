//! Portal reached: level completion.

use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use fastrand::Rng;
use raylib::prelude::{Color, Vector2};

use crate::components::particle::Particle;
use crate::events::gamestate::GameStateChangedEvent;
use crate::resources::effects::ScreenShake;
use crate::resources::gamestate::{GameStates, NextGameState};
use crate::resources::score::{SCORE_LEVEL, ScoreBoard};

/// The player reached the level portal. `pos` is the player's position.
#[derive(Event, Debug, Clone, Copy)]
pub struct PortalReachedEvent {
    pub pos: Vector2,
}

const CELEBRATION_COLORS: [Color; 8] = [
    Color { r: 255, g: 20, b: 147, a: 255 },
    Color { r: 255, g: 105, b: 180, a: 255 },
    Color { r: 255, g: 215, b: 0, a: 255 },
    Color { r: 255, g: 110, b: 180, a: 255 },
    Color { r: 255, g: 255, b: 255, a: 255 },
    Color { r: 255, g: 68, b: 102, a: 255 },
    Color { r: 255, g: 182, b: 193, a: 255 },
    Color { r: 255, g: 165, b: 0, a: 255 },
];

/// Awards the completion bonus, fires the celebration, and switches state
/// immediately so completion cannot trigger twice.
pub fn observe_portal_reached(
    trigger: On<PortalReachedEvent>,
    mut commands: Commands,
    mut score: ResMut<ScoreBoard>,
    mut shake: ResMut<ScreenShake>,
    mut next_state: ResMut<NextGameState>,
    mut rng: Local<Rng>,
) {
    let pos = trigger.event().pos;

    score.add(SCORE_LEVEL);
    shake.raise(5.0);

    for _ in 0..60 {
        let angle = rng.f32() * std::f32::consts::TAU;
        let speed = 2.0 + rng.f32() * 5.0;
        commands.spawn(Particle::bundle(
            pos,
            Vector2 {
                x: angle.cos() * speed,
                y: angle.sin() * speed - 3.0,
            },
            80.0 + rng.f32() * 50.0,
            2.0 + rng.f32() * 2.0,
            CELEBRATION_COLORS[rng.usize(0..CELEBRATION_COLORS.len())],
            rng.f32() > 0.4,
        ));
    }

    next_state.set(GameStates::LevelComplete);
    commands.trigger(GameStateChangedEvent {});
}
