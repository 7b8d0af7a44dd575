//! Background music note tables.
//!
//! Each theme is two voices of (frequency, duration-in-beats) pairs. A
//! frequency of 0 encodes a rest: it advances time but schedules nothing.

use crate::events::audio::Theme;

/// Rest marker inside a note sequence.
pub const REST: f32 = 0.0;

/// One theme's melody: tempo plus lead and bass note sequences.
#[derive(Debug, Clone)]
pub struct Melody {
    /// Beats per minute.
    pub tempo: f32,
    pub lead: Vec<(f32, f32)>,
    pub bass: Vec<(f32, f32)>,
}

/// Equal-temperament frequency for a note name and octave (A4 = 440 Hz).
/// Unknown names read as a rest.
pub fn note(name: &str, octave: i32) -> f32 {
    let semitone = match name {
        "C" => 0,
        "C#" => 1,
        "D" => 2,
        "D#" => 3,
        "E" => 4,
        "F" => 5,
        "F#" => 6,
        "G" => 7,
        "G#" => 8,
        "A" => 9,
        "A#" => 10,
        "B" => 11,
        _ => return REST,
    };
    440.0 * 2f32.powf((semitone - 9) as f32 / 12.0 + (octave - 4) as f32)
}

/// The melody for a theme.
pub fn melody_for(theme: Theme) -> Melody {
    let n = note;
    match theme {
        Theme::Title => Melody {
            tempo: 140.0,
            lead: vec![
                (n("E", 4), 0.5), (n("G", 4), 0.5), (n("B", 4), 0.5), (n("E", 5), 1.0),
                (n("D", 5), 0.5), (n("B", 4), 0.5), (n("G", 4), 1.0),
                (n("C", 4), 0.5), (n("E", 4), 0.5), (n("G", 4), 0.5), (n("C", 5), 1.0),
                (n("B", 4), 0.5), (n("G", 4), 0.5), (n("E", 4), 1.0),
                (n("A", 3), 0.5), (n("C", 4), 0.5), (n("E", 4), 0.5), (n("A", 4), 1.0),
                (n("G", 4), 0.5), (n("E", 4), 0.5), (n("C", 4), 1.0),
                (n("F", 4), 0.5), (n("A", 4), 0.5), (n("C", 5), 0.5), (n("B", 4), 1.5),
            ],
            bass: vec![
                (n("E", 2), 2.0), (n("E", 2), 2.0),
                (n("C", 2), 2.0), (n("C", 2), 2.0),
                (n("A", 1), 2.0), (n("A", 1), 2.0),
                (n("F", 2), 2.0), (n("G", 2), 2.0),
            ],
        },
        Theme::Istanbul => Melody {
            tempo: 130.0,
            lead: vec![
                (n("E", 4), 1.0), (n("F", 4), 0.5), (n("G", 4), 0.5), (n("A", 4), 1.5), (REST, 0.5),
                (n("G", 4), 0.5), (n("F", 4), 0.5), (n("E", 4), 1.0), (n("D", 4), 1.5), (REST, 0.5),
                (n("C", 4), 0.5), (n("D", 4), 0.5), (n("E", 4), 1.0), (n("G", 4), 0.5), (n("F", 4), 0.5),
                (n("E", 4), 1.0), (n("D", 4), 0.5), (n("E", 4), 1.5),
            ],
            bass: vec![
                (n("A", 1), 2.0), (n("E", 2), 2.0),
                (n("A", 1), 2.0), (n("D", 2), 2.0),
                (n("F", 2), 2.0), (n("C", 2), 2.0),
                (n("G", 2), 2.0), (n("A", 1), 2.0),
            ],
        },
        Theme::Baku => Melody {
            tempo: 140.0,
            lead: vec![
                (n("A", 4), 1.0), (n("B", 4), 0.5), (n("C", 5), 0.5), (n("B", 4), 1.0), (n("A", 4), 1.0),
                (n("G", 4), 1.0), (n("A", 4), 0.5), (n("B", 4), 0.5), (n("A", 4), 2.0),
                (n("E", 4), 0.5), (n("G", 4), 0.5), (n("A", 4), 1.0), (n("C", 5), 1.0),
                (n("B", 4), 0.5), (n("A", 4), 0.5), (n("G", 4), 1.0), (n("A", 4), 1.5), (REST, 0.5),
            ],
            bass: vec![
                (n("A", 1), 2.0), (n("E", 2), 2.0),
                (n("A", 1), 2.0), (n("C", 2), 2.0),
                (n("F", 2), 2.0), (n("G", 2), 2.0),
                (n("A", 1), 2.0), (n("E", 2), 2.0),
            ],
        },
        Theme::Cappadocia => Melody {
            tempo: 125.0,
            lead: vec![
                (n("G", 4), 1.0), (n("A", 4), 0.5), (n("B", 4), 0.5), (n("C", 5), 1.5), (REST, 0.5),
                (n("B", 4), 0.5), (n("A", 4), 0.5), (n("G", 4), 1.0), (n("E", 4), 1.5), (REST, 0.5),
                (n("F", 4), 0.5), (n("G", 4), 0.5), (n("A", 4), 1.0), (n("G", 4), 0.5), (n("F", 4), 0.5),
                (n("E", 4), 1.0), (n("D", 4), 0.5), (n("E", 4), 1.5),
            ],
            bass: vec![
                (n("C", 2), 2.0), (n("G", 2), 2.0),
                (n("A", 1), 2.0), (n("E", 2), 2.0),
                (n("F", 2), 2.0), (n("C", 2), 2.0),
                (n("G", 2), 2.0), (n("C", 2), 2.0),
            ],
        },
        Theme::Sky => Melody {
            tempo: 110.0,
            lead: vec![
                (n("E", 5), 1.5), (n("D", 5), 0.5), (n("C", 5), 1.0), (n("B", 4), 1.0),
                (n("C", 5), 1.5), (n("B", 4), 0.5), (n("A", 4), 1.0), (n("G", 4), 1.0),
                (n("A", 4), 1.0), (n("B", 4), 0.5), (n("C", 5), 0.5), (n("D", 5), 1.0),
                (n("E", 5), 1.5), (n("C", 5), 0.5), (n("G", 4), 2.0),
                (n("F", 4), 0.5), (n("A", 4), 0.5), (n("C", 5), 1.0), (n("E", 5), 1.0),
                (n("D", 5), 0.5), (n("B", 4), 0.5), (n("G", 4), 1.0), (n("C", 5), 2.0),
            ],
            bass: vec![
                (n("C", 2), 2.0), (n("G", 2), 2.0),
                (n("A", 1), 2.0), (n("E", 2), 2.0),
                (n("F", 2), 2.0), (n("G", 2), 2.0),
                (n("C", 2), 2.0), (n("C", 2), 2.0),
            ],
        },
        Theme::Memory => Melody {
            tempo: 100.0,
            lead: vec![
                (n("E", 4), 1.5), (n("G", 4), 0.5), (n("A", 4), 1.5), (REST, 0.5),
                (n("G", 4), 1.0), (n("E", 4), 0.5), (n("D", 4), 0.5), (n("C", 4), 2.0),
                (n("D", 4), 1.0), (n("E", 4), 0.5), (n("F", 4), 0.5), (n("E", 4), 2.0),
                (n("C", 4), 1.0), (n("D", 4), 0.5), (n("E", 4), 0.5), (n("C", 4), 2.0),
            ],
            bass: vec![
                (n("A", 1), 2.0), (n("C", 2), 2.0),
                (n("F", 2), 2.0), (n("G", 2), 2.0),
                (n("A", 1), 2.0), (n("E", 2), 2.0),
                (n("F", 2), 2.0), (n("C", 2), 2.0),
            ],
        },
        Theme::Finale => Melody {
            tempo: 95.0,
            lead: vec![
                (n("C", 4), 1.0), (n("E", 4), 1.0), (n("G", 4), 1.0), (n("C", 5), 2.0),
                (n("B", 4), 0.5), (n("A", 4), 0.5), (n("G", 4), 1.0), (n("E", 4), 1.5), (REST, 0.5),
                (n("F", 4), 1.0), (n("A", 4), 1.0), (n("C", 5), 1.0), (n("E", 5), 2.0),
                (n("D", 5), 0.5), (n("C", 5), 0.5), (n("B", 4), 1.0), (n("C", 5), 2.0), (REST, 1.0),
                (n("A", 4), 1.0), (n("C", 5), 1.0), (n("E", 5), 2.0),
                (n("D", 5), 1.0), (n("C", 5), 1.0), (n("A", 4), 1.0), (n("G", 4), 2.0),
                (n("F", 4), 1.0), (n("E", 4), 1.0), (n("D", 4), 1.0), (n("C", 4), 3.0),
            ],
            bass: vec![
                (n("C", 2), 2.0), (n("E", 2), 2.0),
                (n("F", 2), 2.0), (n("C", 2), 2.0),
                (n("F", 2), 2.0), (n("A", 1), 2.0),
                (n("G", 2), 2.0), (n("C", 2), 2.0),
                (n("A", 1), 2.0), (n("F", 2), 2.0),
                (n("G", 2), 2.0), (n("C", 2), 4.0),
            ],
        },
    }
}
