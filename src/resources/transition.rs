//! Wipe transition and deferred music start.
//!
//! A transition covers the screen with an opaque wipe, performs its action
//! while fully covered, then uncovers. Only one transition may be in flight;
//! requests made while one is active are ignored.

use bevy_ecs::prelude::Resource;

use crate::events::audio::Theme;

/// Frames the wipe takes to fully cover the screen.
pub const WIPE_COVER_FRAMES: f32 = 27.0;
/// Frames the wipe lingers before fully revealing again.
pub const WIPE_UNCOVER_FRAMES: f32 = 7.0;

/// Frames between entering the finale and its background music starting.
pub const FINALE_BGM_DELAY_FRAMES: f32 = 120.0;

/// What to do at the fully-covered midpoint of a wipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionAction {
    /// Reset score, load the first level, show its intro.
    StartGame,
    /// Next level's intro, or the finale after the last level.
    AdvanceLevel,
    /// Leave the memory card for the level complete summary screen.
    ShowMemoryCard,
    /// Back to the title screen from the finale.
    ReplayTitle,
}

#[derive(Debug, Clone, Copy)]
enum WipePhase {
    Cover(f32),
    Uncover(f32),
}

/// Wipe transition state machine.
#[derive(Resource, Default)]
pub struct Transition {
    phase: Option<WipePhase>,
    action: Option<TransitionAction>,
}

impl Transition {
    /// Start a wipe. Returns false (and does nothing) if one is in flight.
    pub fn begin(&mut self, action: TransitionAction) -> bool {
        if self.phase.is_some() {
            return false;
        }
        self.phase = Some(WipePhase::Cover(WIPE_COVER_FRAMES));
        self.action = Some(action);
        true
    }

    pub fn active(&self) -> bool {
        self.phase.is_some()
    }

    /// Advance by `dt` frames. Returns the action exactly once, at the
    /// moment the screen is fully covered.
    pub fn tick(&mut self, dt: f32) -> Option<TransitionAction> {
        match self.phase {
            Some(WipePhase::Cover(remaining)) => {
                let remaining = remaining - dt;
                if remaining <= 0.0 {
                    self.phase = Some(WipePhase::Uncover(WIPE_UNCOVER_FRAMES));
                    self.action.take()
                } else {
                    self.phase = Some(WipePhase::Cover(remaining));
                    None
                }
            }
            Some(WipePhase::Uncover(remaining)) => {
                let remaining = remaining - dt;
                self.phase = if remaining <= 0.0 {
                    None
                } else {
                    Some(WipePhase::Uncover(remaining))
                };
                None
            }
            None => None,
        }
    }

    /// Opacity of the wipe overlay in [0, 1].
    pub fn overlay_alpha(&self) -> f32 {
        match self.phase {
            Some(WipePhase::Cover(remaining)) => {
                (1.0 - remaining / WIPE_COVER_FRAMES).clamp(0.0, 1.0)
            }
            Some(WipePhase::Uncover(remaining)) => {
                (remaining / WIPE_UNCOVER_FRAMES).clamp(0.0, 1.0)
            }
            None => 0.0,
        }
    }
}

/// A background-music start scheduled for a few frames from now.
///
/// Owned by the state that armed it; any state transition cancels it so a
/// stale start can never fire into a different state.
#[derive(Resource, Default)]
pub struct PendingBgm(pub Option<(Theme, f32)>);

impl PendingBgm {
    pub fn arm(&mut self, theme: Theme, delay_frames: f32) {
        self.0 = Some((theme, delay_frames));
    }

    pub fn cancel(&mut self) {
        self.0 = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_transition_in_flight() {
        let mut t = Transition::default();
        assert!(t.begin(TransitionAction::StartGame));
        assert!(!t.begin(TransitionAction::ReplayTitle));
        assert!(t.active());
    }

    #[test]
    fn test_action_fires_once_at_cover() {
        let mut t = Transition::default();
        t.begin(TransitionAction::ShowMemoryCard);
        assert_eq!(t.tick(WIPE_COVER_FRAMES / 2.0), None);
        assert_eq!(
            t.tick(WIPE_COVER_FRAMES),
            Some(TransitionAction::ShowMemoryCard)
        );
        // Uncovering yields nothing and eventually clears.
        assert_eq!(t.tick(WIPE_UNCOVER_FRAMES + 1.0), None);
        assert!(!t.active());
    }

    #[test]
    fn test_overlay_alpha_ramps() {
        let mut t = Transition::default();
        assert_eq!(t.overlay_alpha(), 0.0);
        t.begin(TransitionAction::StartGame);
        t.tick(WIPE_COVER_FRAMES / 2.0);
        let mid = t.overlay_alpha();
        assert!(mid > 0.4 && mid < 0.6);
        t.tick(WIPE_COVER_FRAMES);
        assert_eq!(t.overlay_alpha(), 1.0);
    }

    #[test]
    fn test_pending_bgm_cancel() {
        let mut pending = PendingBgm::default();
        pending.arm(Theme::Finale, FINALE_BGM_DELAY_FRAMES);
        assert!(pending.0.is_some());
        pending.cancel();
        assert!(pending.0.is_none());
    }
}
