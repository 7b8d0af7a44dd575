//! ECS components for entities.
//!
//! This module groups all component types that can be attached to entities in
//! the game world.
//!
//! Submodules overview:
//! - [`boxcollider`] – axis-aligned rectangular collider for collision tests
//! - [`enemy`] – enemy behavior state (patrol or stationary hazard)
//! - [`mapposition`] – world-space position for an entity
//! - [`particle`] – short-lived visual effect particle
//! - [`persistent`] – marker for entities that survive level changes
//! - [`player`] – the player's movement, timers, and feedback state
//! - [`popup`] – floating score text
//! - [`rigidbody`] – simple kinematic body storing velocity

pub mod boxcollider;
pub mod enemy;
pub mod mapposition;
pub mod particle;
pub mod persistent;
pub mod player;
pub mod popup;
pub mod rigidbody;
