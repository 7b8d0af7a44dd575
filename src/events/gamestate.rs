//! Game state transition event and observer.
//!
//! Systems request a change to the high-level [`GameStates`] by updating
//! [`NextGameState`]. Emitting a [`GameStateChangedEvent`] then triggers
//! the observer in this module, which applies the transition to
//! [`GameState`], cancels any deferred music start owned by the state being
//! left, and invokes the enter hook registered in
//! [`crate::resources::systemsstore::SystemsStore`].

use crate::resources::gamestate::NextGameStates::{Pending, Unchanged};
use crate::resources::gamestate::{GameState, GameStates, NextGameState};
use crate::resources::systemsstore::SystemsStore;
use crate::resources::transition::PendingBgm;
use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use log::{debug, info, warn};

/// Event used to indicate that a pending game state transition should be
/// applied. With no pending transition, triggering it is a no-op.
#[derive(Event, Debug, Clone, Copy)]
pub struct GameStateChangedEvent {}

/// Observer that applies a pending game state transition.
///
/// Contract
/// - Reads the intention from [`NextGameState`].
/// - If pending: copies the new value into [`GameState`] (restarting its
///   timer), clears the request, cancels any deferred BGM start, then runs
///   the enter hook for the new state. Entering `LevelIntro` additionally
///   runs the level cleanup hook first so stale entities never leak into
///   the next level.
/// - If any required resource is missing, logs a diagnostic and returns.
pub fn observe_gamestate_change(
    _trigger: On<GameStateChangedEvent>,
    mut commands: Commands,
    mut next_game_state: Option<ResMut<NextGameState>>,
    mut game_state: Option<ResMut<GameState>>,
    mut pending_bgm: Option<ResMut<PendingBgm>>,
    systems_store: Res<SystemsStore>,
) {
    let (Some(next_game_state), Some(game_state)) =
        (next_game_state.as_deref_mut(), game_state.as_deref_mut())
    else {
        warn!("Game state resources missing in observe_gamestate_change");
        return;
    };

    match next_game_state.get() {
        Pending(new_state) => {
            let old_state = game_state.get();
            info!("Transitioning from {:?} to {:?}", old_state, new_state);
            game_state.set(new_state);
            next_game_state.reset();

            // A deferred music start belongs to the state that armed it.
            if let Some(pending) = pending_bgm.as_deref_mut() {
                pending.cancel();
            }

            if new_state == GameStates::LevelIntro {
                if let Some(cleanup) = systems_store.cleanup_hook() {
                    commands.run_system(cleanup);
                }
            }
            if let Some(hook) = systems_store.enter_hook(new_state) {
                commands.run_system(hook);
            } else {
                debug!("No enter hook for {:?}", new_state);
            }
        }
        Unchanged => {
            debug!("No state change pending.");
        }
    }
}
