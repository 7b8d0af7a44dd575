//! Screen shake decay and jitter.
//!
//! Intensity decays geometrically each frame; while above the threshold the
//! offset is re-randomized every frame, below it everything snaps to zero.

use bevy_ecs::prelude::*;
use fastrand::Rng;
use raylib::prelude::Vector2;

use crate::resources::effects::{SHAKE_DECAY, SHAKE_MIN, ScreenShake};
use crate::resources::worldtime::WorldTime;

pub fn shake_system(time: Res<WorldTime>, mut shake: ResMut<ScreenShake>, mut rng: Local<Rng>) {
    if shake.intensity > SHAKE_MIN {
        shake.offset = Vector2 {
            x: (rng.f32() - 0.5) * shake.intensity * 2.0,
            y: (rng.f32() - 0.5) * shake.intensity * 2.0,
        };
        shake.intensity *= SHAKE_DECAY.powf(time.frames());
    } else {
        shake.offset = Vector2 { x: 0.0, y: 0.0 };
        shake.intensity = 0.0;
    }
}
