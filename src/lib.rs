//! Heartrush library.
//!
//! A 2D side-scrolling platformer core: physics with coyote time and jump
//! buffering, a game-flow state machine, enemy behavior, transient effects,
//! and a procedural chiptune sequencer on its own clock. This module tree
//! is exposed for integration tests and reuse.

pub mod components;
pub mod events;
pub mod game;
pub mod resources;
pub mod systems;
