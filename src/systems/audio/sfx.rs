//! One-shot sound effect descriptors.
//!
//! Every effect is a small declarative list of tones (delay, duration,
//! waveform, frequency curve, envelope) consumed by one generic scheduling
//! function, instead of bespoke synthesis code per effect.

use crate::events::audio::SfxKind;
use crate::systems::audio::synth::{Envelope, FreqCurve, Mixer, Voice, Waveform};

/// Effects channel gain.
const SFX_AMP: f32 = 0.6;

/// One tone of a sound effect.
#[derive(Debug, Clone)]
pub struct ToneSpec {
    /// Seconds after the effect start this tone begins.
    pub delay: f32,
    pub duration: f32,
    pub wave: Waveform,
    pub freq: FreqCurve,
    pub env: Envelope,
}

fn fade(level: f32, duration: f32) -> Envelope {
    vec![(0.0, level), (duration, 0.001)]
}

fn tone(delay: f32, duration: f32, wave: Waveform, freq: FreqCurve, level: f32) -> ToneSpec {
    ToneSpec {
        delay,
        duration,
        wave,
        freq,
        env: fade(level, duration),
    }
}

/// The tone list for an effect.
pub fn descriptors(kind: SfxKind) -> Vec<ToneSpec> {
    use FreqCurve::{Const, ExpRamp};
    use Waveform::{Sawtooth, Sine, Square, Triangle};

    match kind {
        SfxKind::Jump => vec![tone(
            0.0,
            0.15,
            Square,
            ExpRamp {
                from: 250.0,
                to: 600.0,
            },
            0.3,
        )],
        SfxKind::Stomp => vec![tone(
            0.0,
            0.25,
            Square,
            ExpRamp {
                from: 500.0,
                to: 80.0,
            },
            0.4,
        )],
        SfxKind::Hurt => vec![tone(
            0.0,
            0.35,
            Sawtooth,
            ExpRamp {
                from: 400.0,
                to: 100.0,
            },
            0.3,
        )],
        SfxKind::Land => vec![tone(
            0.0,
            0.1,
            Triangle,
            ExpRamp {
                from: 120.0,
                to: 50.0,
            },
            0.12,
        )],
        SfxKind::Combo(level) => {
            // Higher combos chime higher.
            let level = level.clamp(2, 6);
            let base = 500.0 + (level - 1) as f32 * 120.0;
            vec![
                tone(
                    0.0,
                    0.15,
                    Square,
                    ExpRamp {
                        from: base,
                        to: base * 1.5,
                    },
                    0.25,
                ),
                tone(
                    0.08,
                    0.14,
                    Square,
                    ExpRamp {
                        from: base * 1.5,
                        to: base * 2.0,
                    },
                    0.2,
                ),
            ]
        }
        SfxKind::Heart => vec![
            tone(0.0, 0.2, Square, Const(660.0), 0.3),
            tone(0.1, 0.2, Square, Const(880.0), 0.3),
        ],
        SfxKind::LevelComplete => [523.25, 659.26, 783.99, 1046.50]
            .iter()
            .enumerate()
            .map(|(i, &freq)| tone(i as f32 * 0.15, 0.4, Square, Const(freq), 0.3))
            .collect(),
        SfxKind::Portal => (0..8)
            .map(|i| {
                tone(
                    i as f32 * 0.06,
                    0.3,
                    Sine,
                    Const(400.0 + i as f32 * 100.0),
                    0.2,
                )
            })
            .collect(),
        SfxKind::Finale => [
            (523.25, 0.0),
            (659.26, 0.2),
            (783.99, 0.4),
            (1046.50, 0.6),
            (783.99, 1.0),
            (1046.50, 1.2),
            (1318.51, 1.5),
        ]
        .iter()
        .map(|&(freq, delay)| tone(delay, 0.5, Square, Const(freq), 0.25))
        .collect(),
    }
}

/// Schedule every tone of an effect from "now" on the mixer clock.
pub fn schedule_sfx(mixer: &mut Mixer, kind: SfxKind) {
    let now = mixer.clock();
    for spec in descriptors(kind) {
        mixer.schedule(Voice::new(
            now + spec.delay as f64,
            spec.duration,
            spec.wave,
            spec.freq,
            spec.env,
            SFX_AMP,
        ));
    }
}
