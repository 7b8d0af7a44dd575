use bevy_ecs::prelude::Resource;

/// Nominal simulation tick rate. All tuning constants are per-frame values
/// at this rate; the frame delta is converted with [`WorldTime::frames`].
pub const NOMINAL_FPS: f32 = 60.0;

/// Largest delta a single frame may consume, in seconds. Caps catch-up
/// after a stall (tab resume, debugger pause) at three nominal frames.
pub const MAX_FRAME_DELTA: f32 = 3.0 / NOMINAL_FPS;

#[derive(Resource, Clone, Copy)]
pub struct WorldTime {
    pub elapsed: f32,
    /// Scaled, clamped frame delta in seconds.
    pub delta: f32,
    pub time_scale: f32,
    pub frame_count: u64,
}

impl Default for WorldTime {
    fn default() -> Self {
        WorldTime {
            elapsed: 0.0,
            delta: 0.0,
            time_scale: 1.0,
            frame_count: 0,
        }
    }
}

impl WorldTime {
    /// Frame delta expressed in 60 Hz frame-units. Grace windows (coyote,
    /// jump buffer, invincibility) deliberately tick in these units rather
    /// than wall-clock time, matching per-frame tuning under frame-rate
    /// variance.
    pub fn frames(&self) -> f32 {
        self.delta * NOMINAL_FPS
    }
}
