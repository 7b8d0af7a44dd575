//! ECS resources: shared state owned by the frame loop.
//!
//! Submodules overview:
//! - [`audio`] – bridge to the background audio thread, mute flag
//! - [`camera`] – horizontal scroll camera
//! - [`effects`] – screen shake and the combo popup slot
//! - [`gameconfig`] – INI-backed window/render/audio configuration
//! - [`gamestate`] – current game flow state and pending transition
//! - [`input`] – per-frame keyboard action state
//! - [`level`] – tile grids, level data, collected-heart tracking
//! - [`rendertarget`] – fixed-resolution framebuffer
//! - [`score`] – monotonic score ledger
//! - [`screensize`] – internal render resolution
//! - [`systemsstore`] – state-enter hook registry
//! - [`transition`] – wipe transition and deferred music start
//! - [`worldtime`] – frame clock with catch-up clamping

pub mod audio;
pub mod camera;
pub mod effects;
pub mod gameconfig;
pub mod gamestate;
pub mod input;
pub mod level;
pub mod rendertarget;
pub mod score;
pub mod screensize;
pub mod systemsstore;
pub mod transition;
pub mod worldtime;
