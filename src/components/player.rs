//! Player state component.
//!
//! Everything the platforming feel needs to remember between frames lives
//! here: grounded flag, facing, the coyote/jump-buffer/invincibility timers,
//! squash-and-stretch scale, and the stomp combo counter. The component is
//! reset at level load and mutated by the physics and enemy systems; the
//! entity itself is never destroyed mid-level.

use bevy_ecs::prelude::Component;
use raylib::prelude::Vector2;

/// Player collision box width in pixels.
pub const PLAYER_W: f32 = 10.0;
/// Player collision box height in pixels.
pub const PLAYER_H: f32 = 15.0;

/// Discrete animation state the renderer keys off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayerAnim {
    #[default]
    Idle,
    Run,
    Jump,
    Fall,
}

/// The player's per-frame movement and feedback state.
#[derive(Component, Debug, Clone)]
pub struct Player {
    /// Whether the player ended the last vertical resolution on solid ground.
    pub on_ground: bool,
    /// Facing direction, -1.0 or 1.0.
    pub facing: f32,
    pub anim: PlayerAnim,
    pub hearts_collected: u32,
    /// Last grounded position, used for hit and fall recovery.
    pub last_safe: Vector2,
    /// Frames of post-ledge jump grace remaining.
    pub coyote_timer: f32,
    /// Frames of pre-landing jump input memory remaining.
    pub jump_buffer_timer: f32,
    /// Frames of damage immunity remaining.
    pub invincible_timer: f32,
    /// Transient non-uniform scale, relaxing back toward (1, 1).
    pub squash: Vector2,
    /// Consecutive stomps without touching the ground.
    pub combo: u32,
    pub anim_timer: f32,
    pub anim_frame: u32,
}

impl Player {
    /// Fresh player state at a level start position.
    pub fn new(start: Vector2) -> Self {
        Player {
            on_ground: false,
            facing: 1.0,
            anim: PlayerAnim::Idle,
            hearts_collected: 0,
            last_safe: start,
            coyote_timer: 0.0,
            jump_buffer_timer: 0.0,
            invincible_timer: 0.0,
            squash: Vector2 { x: 1.0, y: 1.0 },
            combo: 0,
            anim_timer: 0.0,
            anim_frame: 0,
        }
    }

    pub fn is_invincible(&self) -> bool {
        self.invincible_timer > 0.0
    }

    /// Center of the player's collision box for a given position.
    pub fn center(pos: Vector2) -> Vector2 {
        Vector2 {
            x: pos.x + PLAYER_W / 2.0,
            y: pos.y + PLAYER_H / 2.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_starts_neutral() {
        let p = Player::new(Vector2 { x: 32.0, y: 144.0 });
        assert!(!p.on_ground);
        assert_eq!(p.facing, 1.0);
        assert_eq!(p.anim, PlayerAnim::Idle);
        assert_eq!(p.combo, 0);
        assert_eq!(p.squash.x, 1.0);
        assert_eq!(p.squash.y, 1.0);
        assert_eq!(p.last_safe.x, 32.0);
        assert_eq!(p.last_safe.y, 144.0);
    }

    #[test]
    fn test_invincibility_flag() {
        let mut p = Player::new(Vector2::zero());
        assert!(!p.is_invincible());
        p.invincible_timer = 1.0;
        assert!(p.is_invincible());
    }
}
