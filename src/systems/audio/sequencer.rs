//! Background music sequencer.
//!
//! Starting a theme schedules every note of both voices at absolute offsets
//! on the mixer clock, then arms a restart at `now + loop length`. The loop
//! length is derived from the scheduled lead-voice span; when that
//! computation yields zero or a non-finite value, it falls back to summing
//! the beat counts directly, and is always floored so a degenerate melody
//! can never cause runaway rescheduling.
//!
//! Muting suppresses scheduling but the restart clock keeps advancing, so
//! a period already in flight is never cancelled. Stopping clears the
//! session and current theme without cancelling voices already scheduled.

use crate::events::audio::Theme;
use crate::systems::audio::melodies::{Melody, melody_for};
use crate::systems::audio::synth::{FreqCurve, Mixer, Voice, Waveform, note_envelope};

/// Smallest allowed loop period in seconds.
pub const MIN_LOOP_SECS: f64 = 1.0;
/// Scheduling lead-in so the first note never lands in the past.
const LEAD_IN_SECS: f64 = 0.1;
/// Music channel gain.
const BGM_AMP: f32 = 0.4;

struct BgmSession {
    theme: Theme,
    next_restart: f64,
    loop_len: f64,
}

/// BGM playback state on the audio thread.
pub struct Sequencer {
    session: Option<BgmSession>,
    muted: bool,
}

impl Sequencer {
    pub fn new() -> Self {
        Sequencer {
            session: None,
            muted: false,
        }
    }

    pub fn muted(&self) -> bool {
        self.muted
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn current_theme(&self) -> Option<Theme> {
        self.session.as_ref().map(|s| s.theme)
    }

    /// Start a theme, replacing any current session.
    pub fn play(&mut self, theme: Theme, mixer: &mut Mixer) {
        self.stop();

        let melody = melody_for(theme);
        let span = if self.muted {
            0.0
        } else {
            schedule_melody(&melody, mixer)
        };
        let loop_len = loop_duration(span, &melody);

        self.session = Some(BgmSession {
            theme,
            next_restart: mixer.clock() + loop_len,
            loop_len,
        });
    }

    /// Clear the repeating restart and the current-theme marker. Voices
    /// already scheduled play out.
    pub fn stop(&mut self) {
        self.session = None;
    }

    /// Re-schedule the full sequence each time the clock passes the restart
    /// mark. While muted the mark still advances, scheduling nothing.
    pub fn pump(&mut self, mixer: &mut Mixer) {
        let muted = self.muted;
        if let Some(session) = self.session.as_mut() {
            while mixer.clock() >= session.next_restart {
                if !muted {
                    let melody = melody_for(session.theme);
                    schedule_melody(&melody, mixer);
                }
                session.next_restart += session.loop_len;
            }
        }
    }
}

impl Default for Sequencer {
    fn default() -> Self {
        Self::new()
    }
}

/// Schedule both voices at absolute offsets from now. Returns the total
/// lead-voice span in seconds.
fn schedule_melody(melody: &Melody, mixer: &mut Mixer) -> f64 {
    let beat = 60.0 / melody.tempo as f64;
    let start = mixer.clock() + LEAD_IN_SECS;

    let mut t = start;
    for &(freq, beats) in &melody.lead {
        let dur = beats as f64 * beat;
        if freq > 0.0 {
            let note_len = (dur * 0.9) as f32;
            mixer.schedule(Voice::new(
                t,
                note_len,
                Waveform::Square,
                FreqCurve::Const(freq),
                note_envelope(note_len),
                BGM_AMP,
            ));
        }
        t += dur;
    }
    let span = t - start;

    let mut tb = start;
    for &(freq, beats) in &melody.bass {
        let dur = beats as f64 * beat;
        if freq > 0.0 {
            let note_len = (dur * 0.85) as f32;
            mixer.schedule(Voice::new(
                tb,
                note_len,
                Waveform::Triangle,
                FreqCurve::Const(freq),
                note_envelope(note_len),
                BGM_AMP,
            ));
        }
        tb += dur;
    }

    span
}

/// Loop period for a melody given the scheduled lead span. Falls back to
/// the beat-count sum when the span is zero or not finite, then floors.
pub fn loop_duration(span: f64, melody: &Melody) -> f64 {
    let span = if span.is_finite() && span > 0.0 {
        span
    } else {
        melody.lead.iter().map(|&(_, beats)| beats as f64).sum::<f64>() * 60.0
            / melody.tempo as f64
    };
    span.max(MIN_LOOP_SECS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::audio::synth::SAMPLE_RATE;

    fn beats_total(melody: &Melody) -> f64 {
        melody.lead.iter().map(|&(_, b)| b as f64).sum::<f64>() * 60.0 / melody.tempo as f64
    }

    #[test]
    fn test_play_schedules_both_voices() {
        let mut mixer = Mixer::new(SAMPLE_RATE);
        let mut seq = Sequencer::new();
        seq.play(Theme::Title, &mut mixer);

        let melody = melody_for(Theme::Title);
        let audible = melody.lead.iter().chain(&melody.bass).filter(|&&(f, _)| f > 0.0).count();
        assert_eq!(mixer.voice_count(), audible);
        assert_eq!(seq.current_theme(), Some(Theme::Title));
    }

    #[test]
    fn test_rests_schedule_nothing_but_advance_time() {
        // Istanbul's lead contains rests; the loop length must still cover
        // the full beat count including them.
        let mut mixer = Mixer::new(SAMPLE_RATE);
        let mut seq = Sequencer::new();
        seq.play(Theme::Istanbul, &mut mixer);

        let melody = melody_for(Theme::Istanbul);
        let audible_lead = melody.lead.iter().filter(|&&(f, _)| f > 0.0).count();
        assert!(audible_lead < melody.lead.len());

        let session = seq.session.as_ref().unwrap();
        assert!((session.loop_len - beats_total(&melody)).abs() < 1e-6);
    }

    #[test]
    fn test_restart_is_armed_at_now_plus_duration() {
        let mut mixer = Mixer::new(SAMPLE_RATE);
        let mut seq = Sequencer::new();
        seq.play(Theme::Memory, &mut mixer);

        let melody = melody_for(Theme::Memory);
        let session = seq.session.as_ref().unwrap();
        assert!((session.next_restart - beats_total(&melody)).abs() < 1e-6);
    }

    #[test]
    fn test_zero_span_falls_back_to_beat_sum() {
        let melody = melody_for(Theme::Title);
        let expected = beats_total(&melody);
        assert!((loop_duration(0.0, &melody) - expected).abs() < 1e-9);
        assert!((loop_duration(f64::NAN, &melody) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_melody_floors_at_minimum() {
        let empty = Melody {
            tempo: 120.0,
            lead: vec![],
            bass: vec![],
        };
        assert_eq!(loop_duration(0.0, &empty), MIN_LOOP_SECS);
    }

    #[test]
    fn test_stop_clears_theme_but_not_scheduled_voices() {
        let mut mixer = Mixer::new(SAMPLE_RATE);
        let mut seq = Sequencer::new();
        seq.play(Theme::Sky, &mut mixer);
        let scheduled = mixer.voice_count();

        seq.stop();
        assert_eq!(seq.current_theme(), None);
        assert_eq!(mixer.voice_count(), scheduled);
    }

    #[test]
    fn test_muted_play_uses_fallback_and_schedules_nothing() {
        let mut mixer = Mixer::new(SAMPLE_RATE);
        let mut seq = Sequencer::new();
        seq.set_muted(true);
        seq.play(Theme::Title, &mut mixer);

        assert_eq!(mixer.voice_count(), 0);
        let melody = melody_for(Theme::Title);
        let session = seq.session.as_ref().unwrap();
        assert!((session.loop_len - beats_total(&melody)).abs() < 1e-6);
    }

    #[test]
    fn test_pump_reschedules_after_period() {
        let mut mixer = Mixer::new(1000);
        let mut seq = Sequencer::new();
        seq.play(Theme::Memory, &mut mixer);
        let first_batch = mixer.voice_count();
        let loop_len = seq.session.as_ref().unwrap().loop_len;

        // Cross the restart mark on the audio clock. The pump only acts on
        // its own clock, so the restart can trail the frame loop by up to
        // one loop period; it must never reschedule early.
        mixer.advance_silently((loop_len * 1000.0).ceil() as u64 + 1);
        seq.pump(&mut mixer);
        assert!(mixer.voice_count() >= first_batch);
        let session = seq.session.as_ref().unwrap();
        assert!(session.next_restart > mixer.clock());
    }

    #[test]
    fn test_muted_pump_advances_without_scheduling() {
        let mut mixer = Mixer::new(1000);
        let mut seq = Sequencer::new();
        seq.play(Theme::Memory, &mut mixer);
        let loop_len = seq.session.as_ref().unwrap().loop_len;
        seq.set_muted(true);

        mixer.advance_silently((loop_len * 1000.0).ceil() as u64 + 1);
        seq.pump(&mut mixer);
        // All previously scheduled voices have ended and nothing new came in.
        assert_eq!(mixer.voice_count(), 0);
        let session = seq.session.as_ref().unwrap();
        assert!(session.next_restart > mixer.clock());
    }
}
