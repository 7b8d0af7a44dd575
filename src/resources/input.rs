//! Per-frame keyboard input resource.
//!
//! Captures the subset of keyboard state the game cares about and exposes
//! it to systems via the [`InputState`] resource. Each action carries a
//! primary and an alternate binding so arrows and WASD both work.

use bevy_ecs::prelude::*;
use raylib::prelude::*;

/// Boolean action state with its keyboard bindings.
#[derive(Debug, Clone, Copy)]
pub struct BoolState {
    /// Whether the action is held this frame.
    pub active: bool,
    /// Whether the action was just pressed this frame.
    pub just_pressed: bool,
    /// Whether the action was just released this frame.
    pub just_released: bool,

    pub key_binding: KeyboardKey,
    /// Secondary binding; `KEY_NULL` when unused.
    pub alt_binding: KeyboardKey,
}

impl BoolState {
    fn bound(key: KeyboardKey, alt: KeyboardKey) -> Self {
        Self {
            active: false,
            just_pressed: false,
            just_released: false,
            key_binding: key,
            alt_binding: alt,
        }
    }
}

impl Default for BoolState {
    fn default() -> Self {
        Self::bound(KeyboardKey::KEY_NULL, KeyboardKey::KEY_NULL)
    }
}

/// Resource capturing the per-frame keyboard state relevant to gameplay.
#[derive(Resource, Debug, Clone)]
pub struct InputState {
    pub move_left: BoolState,
    pub move_right: BoolState,
    pub jump: BoolState,
    /// Confirm action on menus (start game, continue, replay).
    pub action_start: BoolState,
    pub toggle_mute: BoolState,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            move_left: BoolState::bound(KeyboardKey::KEY_A, KeyboardKey::KEY_LEFT),
            move_right: BoolState::bound(KeyboardKey::KEY_D, KeyboardKey::KEY_RIGHT),
            jump: BoolState::bound(KeyboardKey::KEY_SPACE, KeyboardKey::KEY_UP),
            action_start: BoolState::bound(KeyboardKey::KEY_ENTER, KeyboardKey::KEY_SPACE),
            toggle_mute: BoolState::bound(KeyboardKey::KEY_M, KeyboardKey::KEY_NULL),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_all_inactive() {
        let input = InputState::default();
        assert!(!input.move_left.active);
        assert!(!input.move_right.active);
        assert!(!input.jump.active);
        assert!(!input.action_start.active);
        assert!(!input.toggle_mute.active);
    }

    #[test]
    fn test_default_key_bindings() {
        let input = InputState::default();
        assert_eq!(input.move_left.key_binding, KeyboardKey::KEY_A);
        assert_eq!(input.move_left.alt_binding, KeyboardKey::KEY_LEFT);
        assert_eq!(input.move_right.key_binding, KeyboardKey::KEY_D);
        assert_eq!(input.jump.key_binding, KeyboardKey::KEY_SPACE);
        assert_eq!(input.jump.alt_binding, KeyboardKey::KEY_UP);
        assert_eq!(input.action_start.key_binding, KeyboardKey::KEY_ENTER);
        assert_eq!(input.toggle_mute.key_binding, KeyboardKey::KEY_M);
    }

    #[test]
    fn test_no_edges_on_default() {
        let input = InputState::default();
        assert!(!input.jump.just_pressed);
        assert!(!input.jump.just_released);
        assert!(!input.action_start.just_pressed);
    }
}
