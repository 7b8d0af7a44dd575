use bevy_ecs::prelude::Resource;

/// The game's internal render resolution in pixels.
#[derive(Resource, Clone, Copy)]
pub struct ScreenSize {
    pub w: i32,
    pub h: i32,
}
