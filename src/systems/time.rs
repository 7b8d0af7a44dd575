//! Time update system.
//!
//! Updates the shared [`WorldTime`](crate::resources::worldtime::WorldTime)
//! resource once per frame, applying `time_scale` and the catch-up clamp to
//! the provided delta.

use bevy_ecs::prelude::*;

use crate::resources::worldtime::{MAX_FRAME_DELTA, WorldTime};

/// Update elapsed and delta seconds on the `WorldTime` resource.
///
/// `dt` is expected to be the unscaled frame delta in seconds. The delta is
/// clamped so a stalled tab or debugger pause never produces a huge
/// catch-up step.
pub fn update_world_time(world: &mut World, dt: f32) {
    let mut wt = world.resource_mut::<WorldTime>();
    let scaled_dt = (dt * wt.time_scale).min(MAX_FRAME_DELTA);
    wt.elapsed += scaled_dt;
    wt.delta = scaled_dt;
    wt.frame_count += 1;
}
