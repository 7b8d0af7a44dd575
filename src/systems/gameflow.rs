//! Game flow driver.
//!
//! One system advances everything the state machine owns per frame: the
//! state timer, timer-driven transitions, input-driven transitions, the
//! wipe transition, the deferred finale-music start, and the mute toggle.
//! Actual state application happens in the gamestate observer; this system
//! only requests transitions.

use bevy_ecs::prelude::*;
use log::debug;

use crate::events::audio::AudioCmd;
use crate::resources::audio::Muted;
use crate::resources::gamestate::{GameState, GameStates, NextGameState};
use crate::resources::input::InputState;
use crate::resources::level::{CurrentLevel, LevelStore};
use crate::resources::score::ScoreBoard;
use crate::resources::transition::{PendingBgm, Transition, TransitionAction};
use crate::resources::worldtime::WorldTime;

/// Frames the loading screen stays up before the title appears.
pub const LOADING_FRAMES: f32 = 110.0;
/// Frames the level intro stays up before play begins.
pub const LEVEL_INTRO_FRAMES: f32 = 150.0;
/// Frames of the level-complete overlay before the memory card wipes in.
pub const LEVEL_COMPLETE_FRAMES: f32 = 120.0;
/// Frames into the finale before the replay action is accepted.
pub const REPLAY_UNLOCK_FRAMES: f32 = 180.0;

pub fn gameflow(
    time: Res<WorldTime>,
    input: Res<InputState>,
    mut game_state: ResMut<GameState>,
    mut next_state: ResMut<NextGameState>,
    mut transition: ResMut<Transition>,
    mut pending_bgm: ResMut<PendingBgm>,
    mut current_level: ResMut<CurrentLevel>,
    mut score: ResMut<ScoreBoard>,
    mut muted: ResMut<Muted>,
    levels: Res<LevelStore>,
    mut audio: MessageWriter<AudioCmd>,
) {
    let dt = time.frames();
    game_state.state_timer += dt;

    // Mute toggle works in every state.
    if input.toggle_mute.just_pressed {
        muted.0 = !muted.0;
        audio.write(AudioCmd::SetMuted(muted.0));
    }

    // Deferred music start armed by the finale; cancelled by any transition.
    if let Some((theme, remaining)) = pending_bgm.0 {
        let remaining = remaining - dt;
        if remaining <= 0.0 {
            audio.write(AudioCmd::PlayBgm { theme });
            pending_bgm.0 = None;
        } else {
            pending_bgm.0 = Some((theme, remaining));
        }
    }

    // Wipe progression; the action fires once, fully covered.
    if let Some(action) = transition.tick(dt) {
        match action {
            TransitionAction::StartGame => {
                score.reset();
                current_level.0 = 0;
                next_state.set(GameStates::LevelIntro);
            }
            TransitionAction::AdvanceLevel => {
                if current_level.0 + 1 < levels.len() {
                    current_level.0 += 1;
                    next_state.set(GameStates::LevelIntro);
                } else {
                    next_state.set(GameStates::Finale);
                }
            }
            TransitionAction::ShowMemoryCard => {
                next_state.set(GameStates::MemoryCard);
            }
            TransitionAction::ReplayTitle => {
                next_state.set(GameStates::Title);
            }
        }
        debug!("Wipe transition applied: {:?}", action);
    }

    match game_state.get() {
        GameStates::Loading => {
            if game_state.state_timer > LOADING_FRAMES {
                next_state.set(GameStates::Title);
            }
        }
        GameStates::Title => {
            if input.action_start.just_pressed
                && transition.begin(TransitionAction::StartGame)
            {
                audio.write(AudioCmd::StopBgm);
            }
        }
        GameStates::LevelIntro => {
            if game_state.state_timer > LEVEL_INTRO_FRAMES {
                next_state.set(GameStates::Playing);
            }
        }
        GameStates::Playing => {
            // Driven by collisions and the portal observer.
        }
        GameStates::LevelComplete => {
            if game_state.state_timer > LEVEL_COMPLETE_FRAMES && !transition.active() {
                transition.begin(TransitionAction::ShowMemoryCard);
            }
        }
        GameStates::MemoryCard => {
            if input.action_start.just_pressed {
                transition.begin(TransitionAction::AdvanceLevel);
            }
        }
        GameStates::Finale => {
            if input.action_start.just_pressed
                && game_state.state_timer > REPLAY_UNLOCK_FRAMES
                && transition.begin(TransitionAction::ReplayTitle)
            {
                pending_bgm.cancel();
                audio.write(AudioCmd::StopBgm);
            }
        }
    }
}
