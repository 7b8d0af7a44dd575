//! Camera follow system.
//!
//! The target leads the player in the facing direction; the camera eases
//! toward it with a single-pole filter scaled by dt, then clamps to the
//! level's scrollable range so the view never leaves the world.

use bevy_ecs::prelude::*;

use crate::components::mapposition::MapPosition;
use crate::components::player::{PLAYER_W, Player};
use crate::resources::camera::ScrollCamera;
use crate::resources::level::ActiveLevel;
use crate::resources::screensize::ScreenSize;
use crate::resources::worldtime::WorldTime;

/// Pixels of look-ahead bias in the facing direction.
pub const CAM_LOOK_AHEAD: f32 = 25.0;
/// Per-frame smoothing factor toward the target.
pub const CAM_SMOOTH: f32 = 0.08;

pub fn camera_follow(
    time: Res<WorldTime>,
    screen: Res<ScreenSize>,
    level: Option<Res<ActiveLevel>>,
    mut camera: ResMut<ScrollCamera>,
    query: Query<(&MapPosition, &Player)>,
) {
    let Some(level) = level else { return };
    let Some((pos, player)) = query.iter().next() else {
        return;
    };

    let view_w = screen.w as f32;
    let target =
        pos.pos.x - view_w / 2.0 + PLAYER_W / 2.0 + player.facing * CAM_LOOK_AHEAD;
    let smoothed = camera.x + (target - camera.x) * CAM_SMOOTH * time.frames();
    camera.snap_to(smoothed, level.tilemap.width_px() - view_w);
}
