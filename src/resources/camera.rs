//! Horizontal scroll camera.
//!
//! The world only scrolls on the x axis, so the camera is a single clamped
//! offset rather than a full 2D transform. The camera system smooths it
//! toward a look-ahead target each frame; the render system subtracts it
//! from world positions.

use bevy_ecs::prelude::Resource;

#[derive(Resource, Clone, Copy, Default)]
pub struct ScrollCamera {
    /// Left edge of the visible world slice, in pixels.
    pub x: f32,
}

impl ScrollCamera {
    /// Snap to a target, clamped to the level's scrollable range.
    pub fn snap_to(&mut self, target: f32, max_scroll: f32) {
        self.x = target.clamp(0.0, max_scroll.max(0.0));
    }
}
