//! Screen shake and the combo popup slot.

use bevy_ecs::prelude::Resource;
use raylib::prelude::Vector2;

/// Per-frame geometric decay factor of the shake intensity.
pub const SHAKE_DECAY: f32 = 0.82;
/// Below this intensity the offset snaps to exactly zero.
pub const SHAKE_MIN: f32 = 0.1;

/// Screen shake state. Intensity is only ever raised to the max of the
/// current and requested value, never set directly.
#[derive(Resource, Clone, Copy, Default)]
pub struct ScreenShake {
    pub intensity: f32,
    /// Offset applied to the whole scene this frame.
    pub offset: Vector2,
}

impl ScreenShake {
    pub fn raise(&mut self, intensity: f32) {
        self.intensity = self.intensity.max(intensity);
    }
}

/// Frames a combo popup stays on screen.
pub const COMBO_POPUP_FRAMES: f32 = 70.0;

/// Single combo popup slot; a newer combo overwrites the previous one.
#[derive(Resource, Clone, Default)]
pub struct ComboPopup {
    pub text: String,
    pub pos: Vector2,
    /// Remaining frames; inactive at zero.
    pub timer: f32,
}

impl ComboPopup {
    pub fn show(&mut self, text: impl Into<String>, pos: Vector2) {
        self.text = text.into();
        self.pos = pos;
        self.timer = COMBO_POPUP_FRAMES;
    }

    pub fn active(&self) -> bool {
        self.timer > 0.0
    }

    /// Progress through the popup's lifetime in [0, 1].
    pub fn progress(&self) -> f32 {
        (1.0 - self.timer / COMBO_POPUP_FRAMES).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raise_keeps_max() {
        let mut shake = ScreenShake::default();
        shake.raise(5.0);
        shake.raise(3.0);
        assert_eq!(shake.intensity, 5.0);
        shake.raise(8.0);
        assert_eq!(shake.intensity, 8.0);
    }

    #[test]
    fn test_combo_popup_overwrites() {
        let mut popup = ComboPopup::default();
        assert!(!popup.active());
        popup.show("2x COMBO!", Vector2 { x: 10.0, y: 20.0 });
        popup.timer = 5.0;
        popup.show("3x COMBO!", Vector2 { x: 30.0, y: 40.0 });
        assert_eq!(popup.timer, COMBO_POPUP_FRAMES);
        assert_eq!(popup.text, "3x COMBO!");
    }
}
