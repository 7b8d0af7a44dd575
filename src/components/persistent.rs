use bevy_ecs::prelude::Component;

/// Marker for entities that must survive level cleanup (observers and
/// registered systems).
#[derive(Component)]
pub struct Persistent;
