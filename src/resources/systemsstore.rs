//! Registry of state-enter hook systems.
//!
//! The gamestate observer cannot reference concrete systems without tight
//! coupling, so hooks are registered by state at startup and looked up by
//! [`bevy_ecs::system::SystemId`] when a transition is applied.

use bevy_ecs::prelude::Resource;
use bevy_ecs::system::SystemId;
use rustc_hash::FxHashMap;

use crate::resources::gamestate::GameStates;

#[derive(Resource, Default)]
pub struct SystemsStore {
    enter: FxHashMap<GameStates, SystemId>,
    cleanup: Option<SystemId>,
}

impl SystemsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the system to run when `state` is entered.
    pub fn set_enter(&mut self, state: GameStates, id: SystemId) {
        self.enter.insert(state, id);
    }

    pub fn enter_hook(&self, state: GameStates) -> Option<SystemId> {
        self.enter.get(&state).copied()
    }

    /// Register the level-entity cleanup system, run before a level loads.
    pub fn set_cleanup(&mut self, id: SystemId) {
        self.cleanup = Some(id);
    }

    pub fn cleanup_hook(&self) -> Option<SystemId> {
        self.cleanup
    }
}
