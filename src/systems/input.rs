//! Input system.
//!
//! [`update_input_state`] reads hardware input from Raylib each frame and
//! writes level and edge state into
//! [`crate::resources::input::InputState`]. Either of an action's two
//! bindings activates it.

use bevy_ecs::prelude::*;
use raylib::prelude::KeyboardKey;

use crate::resources::input::{BoolState, InputState};

fn poll(state: &mut BoolState, rl: &raylib::RaylibHandle) {
    let down = |key: KeyboardKey| key != KeyboardKey::KEY_NULL && rl.is_key_down(key);
    let pressed = |key: KeyboardKey| key != KeyboardKey::KEY_NULL && rl.is_key_pressed(key);
    let released = |key: KeyboardKey| key != KeyboardKey::KEY_NULL && rl.is_key_released(key);

    let was_active = state.active;
    state.active = down(state.key_binding) || down(state.alt_binding);
    state.just_pressed =
        (pressed(state.key_binding) || pressed(state.alt_binding)) && !was_active;
    state.just_released = (released(state.key_binding) || released(state.alt_binding))
        && !state.active
        && was_active;
}

/// Poll Raylib for keyboard input and update the `InputState` resource.
pub fn update_input_state(
    mut input: ResMut<InputState>,
    rl: NonSendMut<raylib::RaylibHandle>,
) {
    let input = &mut *input;
    let rl = &*rl;
    poll(&mut input.move_left, &rl);
    poll(&mut input.move_right, &rl);
    poll(&mut input.jump, &rl);
    poll(&mut input.action_start, &rl);
    poll(&mut input.toggle_mute, &rl);
}
