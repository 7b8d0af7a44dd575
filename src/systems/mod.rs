//! Game systems.
//!
//! This module groups all ECS systems that advance simulation, input, and
//! rendering.
//!
//! Submodules overview
//! - [`audio`] – audio thread, sequencer, synth, and the bridge systems
//! - [`camera`] – look-ahead smoothed scroll camera
//! - [`enemy`] – patrol AI and player-enemy collision resolution
//! - [`gameflow`] – state timers, input-driven transitions, wipe progression
//! - [`gamestate`] – pending-transition check and run conditions
//! - [`input`] – read hardware input into [`crate::resources::input::InputState`]
//! - [`particles`] – integrate and cull effect particles
//! - [`physics`] – player movement, tile collision, platforming feel
//! - [`pickup`] – heart collection and portal detection
//! - [`popups`] – score and combo popup countdowns
//! - [`render`] – draw the world into the fixed-resolution target
//! - [`shake`] – screen shake decay and jitter
//! - [`time`] – update simulation time and delta

pub mod audio;
pub mod camera;
pub mod enemy;
pub mod gameflow;
pub mod gamestate;
pub mod input;
pub mod particles;
pub mod physics;
pub mod pickup;
pub mod popups;
pub mod render;
pub mod shake;
pub mod time;
