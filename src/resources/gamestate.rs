//! High-level game flow resources.
//!
//! [`GameState`] tracks the authoritative current state and the frame-unit
//! timer since entry; [`NextGameState`] holds a requested transition. See
//! `crate::events::gamestate::observe_gamestate_change` for how a pending
//! transition is applied and enter hooks are invoked.

use bevy_ecs::prelude::Resource;

/// Discrete states of the game flow machine.
///
/// Loading is initial; there is no terminal state, Finale loops back to
/// Title on replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GameStates {
    #[default]
    Loading,
    Title,
    LevelIntro,
    Playing,
    LevelComplete,
    MemoryCard,
    Finale,
}

/// Representation of a requested next state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NextGameStates {
    #[default]
    Unchanged,
    Pending(GameStates),
}

/// Authoritative current game state plus time since entry.
#[derive(Resource, Debug, Clone)]
pub struct GameState {
    current: GameStates,
    /// Frame-units elapsed since the current state was entered.
    pub state_timer: f32,
}

impl GameState {
    pub fn new() -> Self {
        GameState {
            current: GameStates::Loading,
            state_timer: 0.0,
        }
    }

    pub fn get(&self) -> GameStates {
        self.current
    }

    /// Apply a transition immediately and restart the state timer.
    ///
    /// Prefer requesting transitions via [`NextGameState`] so the observer
    /// runs enter hooks; this is the primitive the observer itself uses.
    pub fn set(&mut self, state: GameStates) {
        self.current = state;
        self.state_timer = 0.0;
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

/// Intent to change to a new game state.
#[derive(Resource, Debug, Clone, Default)]
pub struct NextGameState {
    next: NextGameStates,
}

impl NextGameState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> NextGameStates {
        self.next
    }

    /// Request a transition to `next` by marking it as pending. The
    /// gamestate observer will apply it and clear the request.
    pub fn set(&mut self, next: GameStates) {
        self.next = NextGameStates::Pending(next);
    }

    pub fn reset(&mut self) {
        self.next = NextGameStates::Unchanged;
    }
}
