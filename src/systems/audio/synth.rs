//! Software synthesizer: voices, envelopes, and the PCM mixer.
//!
//! The mixer renders every active voice into mono 16-bit samples. Its
//! sample counter is the audio clock everything on the audio thread
//! schedules against; one second of clock is exactly `sample_rate` rendered
//! samples, independent of the frame loop.

use std::f32::consts::TAU;

/// Mixer output sample rate in Hz.
pub const SAMPLE_RATE: u32 = 22_050;

/// Fixed pre-volume headroom, so a handful of voices cannot clip.
const MASTER_GAIN: f32 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Square,
    Triangle,
    Sine,
    Sawtooth,
}

impl Waveform {
    /// One sample at a phase in [0, 1).
    pub fn sample(self, phase: f32) -> f32 {
        match self {
            Waveform::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Triangle => 4.0 * (phase - 0.5).abs() - 1.0,
            Waveform::Sine => (phase * TAU).sin(),
            Waveform::Sawtooth => 2.0 * phase - 1.0,
        }
    }
}

/// Frequency over a voice's lifetime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FreqCurve {
    Const(f32),
    /// Exponential sweep from one frequency to another across the voice.
    ExpRamp { from: f32, to: f32 },
}

impl FreqCurve {
    /// Frequency at normalized progress `t` in [0, 1].
    pub fn at(self, t: f32) -> f32 {
        match self {
            FreqCurve::Const(f) => f,
            FreqCurve::ExpRamp { from, to } => {
                let from = from.max(1.0);
                let to = to.max(1.0);
                from * (to / from).powf(t.clamp(0.0, 1.0))
            }
        }
    }
}

/// Gain breakpoints as (seconds-from-start, gain) pairs with exponential
/// ramps between them. Gain is zero after the last breakpoint.
pub type Envelope = Vec<(f32, f32)>;

/// Evaluate an envelope at `t` seconds from the voice start.
pub fn envelope_gain(env: &[(f32, f32)], t: f32) -> f32 {
    let Some(&(first_t, first_g)) = env.first() else {
        return 0.0;
    };
    if t < 0.0 {
        return 0.0;
    }
    if t <= first_t {
        return first_g;
    }
    for pair in env.windows(2) {
        let (t0, g0) = pair[0];
        let (t1, g1) = pair[1];
        if t < t1 {
            let k = (t - t0) / (t1 - t0).max(1e-6);
            let g0 = g0.max(1e-4);
            let g1 = g1.max(1e-4);
            return g0 * (g1 / g0).powf(k);
        }
    }
    0.0
}

/// The standard note envelope: fast attack, decay to a sustain level, and
/// a near-silent tail before the note ends.
pub fn note_envelope(duration: f32) -> Envelope {
    vec![
        (0.0, 0.001),
        (0.01, 0.8),
        (duration * 0.3, 0.4),
        (duration * 0.95, 0.001),
    ]
}

/// One scheduled tone.
#[derive(Debug, Clone)]
pub struct Voice {
    /// Start time in seconds on the mixer clock.
    pub start: f64,
    pub duration: f32,
    pub wave: Waveform,
    pub freq: FreqCurve,
    pub env: Envelope,
    /// Channel gain (music vs effect level).
    pub amp: f32,
    phase: f32,
}

impl Voice {
    pub fn new(
        start: f64,
        duration: f32,
        wave: Waveform,
        freq: FreqCurve,
        env: Envelope,
        amp: f32,
    ) -> Self {
        Voice {
            start,
            duration,
            wave,
            freq,
            env,
            amp,
            phase: 0.0,
        }
    }

    fn ended_by(&self, clock: f64) -> bool {
        self.start + self.duration as f64 <= clock
    }
}

/// Mixes scheduled voices into mono i16 PCM and owns the audio clock.
pub struct Mixer {
    sample_rate: u32,
    samples_rendered: u64,
    volume: f32,
    voices: Vec<Voice>,
}

impl Mixer {
    pub fn new(sample_rate: u32) -> Self {
        Mixer {
            sample_rate,
            samples_rendered: 0,
            volume: 1.0,
            voices: Vec::new(),
        }
    }

    /// Seconds of audio rendered so far.
    pub fn clock(&self) -> f64 {
        self.samples_rendered as f64 / self.sample_rate as f64
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    pub fn schedule(&mut self, voice: Voice) {
        self.voices.push(voice);
    }

    pub fn voice_count(&self) -> usize {
        self.voices.len()
    }

    /// Render the next `out.len()` samples, advancing the clock.
    pub fn render(&mut self, out: &mut [i16]) {
        let dt = 1.0 / self.sample_rate as f32;
        let gain = MASTER_GAIN * self.volume;

        for sample in out.iter_mut() {
            let t = self.samples_rendered as f64 / self.sample_rate as f64;
            let mut acc = 0.0f32;
            for voice in self.voices.iter_mut() {
                let local = (t - voice.start) as f32;
                if local < 0.0 || local >= voice.duration {
                    continue;
                }
                let freq = voice.freq.at(local / voice.duration);
                voice.phase = (voice.phase + freq * dt).fract();
                acc += voice.wave.sample(voice.phase)
                    * envelope_gain(&voice.env, local)
                    * voice.amp;
            }
            *sample = ((acc * gain).clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
            self.samples_rendered += 1;
        }

        let clock = self.clock();
        self.voices.retain(|v| !v.ended_by(clock));
    }

    /// Advance the clock without synthesizing, for when no audio device is
    /// available. Keeps scheduling bounded and voice cleanup running.
    pub fn advance_silently(&mut self, samples: u64) {
        self.samples_rendered += samples;
        let clock = self.clock();
        self.voices.retain(|v| !v.ended_by(clock));
    }
}
