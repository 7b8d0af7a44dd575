//! Score and combo popup countdowns.

use bevy_ecs::prelude::*;

use crate::components::popup::ScorePopup;
use crate::resources::effects::ComboPopup;
use crate::resources::worldtime::WorldTime;

pub fn popup_system(
    time: Res<WorldTime>,
    mut commands: Commands,
    mut combo: ResMut<ComboPopup>,
    mut query: Query<(Entity, &mut ScorePopup)>,
) {
    let dt = time.frames();

    for (entity, mut popup) in query.iter_mut() {
        popup.timer -= dt;
        if popup.timer <= 0.0 {
            commands.entity(entity).try_despawn();
        }
    }

    if combo.timer > 0.0 {
        combo.timer -= dt;
    }
}
