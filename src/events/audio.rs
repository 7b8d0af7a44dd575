//! Audio boundary types.
//!
//! The frame loop never touches the audio device; it sends [`AudioCmd`]
//! messages across the bridge and the audio thread answers with
//! [`AudioMessage`]. Themes and sound-effect kinds are plain identifiers
//! here; the synthesis recipes live on the audio thread.

use bevy_ecs::message::Message;
use serde::{Deserialize, Serialize};

/// Background music themes. Levels name one; title, memory, and finale are
/// fixed to the matching flow states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Title,
    Istanbul,
    Baku,
    Cappadocia,
    Sky,
    Memory,
    Finale,
}

/// One-shot sound effects, synthesized ad hoc by the audio thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SfxKind {
    Jump,
    Land,
    Stomp,
    Hurt,
    /// Carries the combo count; higher combos chime at a higher pitch.
    Combo(u32),
    Heart,
    LevelComplete,
    Portal,
    Finale,
}

/// Commands sent *to* the audio thread.
#[derive(Message, Debug, Clone)]
pub enum AudioCmd {
    PlayBgm { theme: Theme },
    StopBgm,
    PlaySfx { kind: SfxKind },
    SetMuted(bool),
    SetVolume(f32),
    Shutdown,
}

/// Messages sent *back* from the audio thread.
#[derive(Message, Debug, Clone)]
pub enum AudioMessage {
    BgmStarted { theme: Theme },
    BgmStopped,
    MuteChanged(bool),
    /// The audio device failed to initialize; playback is a silent no-op.
    DeviceUnavailable,
}
