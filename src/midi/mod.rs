//! Short emotion-themed melodies rendered as Standard MIDI Files.

use anyhow::{Context, Result};
use midly::num::{u15, u24, u28, u4, u7};
use midly::{Format, Header, MetaMessage, MidiMessage, Smf, Timing, TrackEvent, TrackEventKind};

pub const TICKS_PER_BEAT: u16 = 960;
const VELOCITY: u8 = 100;
const CHANNEL: u8 = 0;

/// Tempo and (pitch, duration in beats) sequence for one emotion.
#[derive(Debug, PartialEq)]
pub struct EmotionMusic {
    pub tempo_bpm: u32,
    pub notes: &'static [(u8, f32)],
}

const HAPPY: EmotionMusic = EmotionMusic {
    tempo_bpm: 130,
    notes: &[
        (60, 1.0), (62, 1.0), (64, 1.0), (65, 1.0), (67, 2.0), (69, 1.0), (71, 1.0), (72, 2.0),
        (60, 1.0), (64, 1.0), (67, 1.0), (65, 1.0), (69, 2.0), (71, 1.0), (74, 1.0), (72, 2.0),
        (74, 1.0), (72, 1.0), (69, 1.0), (67, 1.0), (65, 2.0), (64, 1.0), (62, 1.0), (60, 2.0),
    ],
};

const SAD: EmotionMusic = EmotionMusic {
    tempo_bpm: 70,
    notes: &[
        (60, 2.0), (62, 2.0), (63, 2.0), (65, 2.0), (67, 2.0), (68, 2.0), (70, 2.0), (72, 2.0),
        (67, 2.0), (65, 2.0), (63, 2.0), (62, 2.0), (60, 2.0), (58, 2.0), (60, 2.0), (62, 2.0),
        (63, 2.0), (65, 2.0), (67, 2.0), (68, 2.0), (70, 2.0), (72, 2.0), (70, 2.0), (67, 2.0),
    ],
};

const ANGRY: EmotionMusic = EmotionMusic {
    tempo_bpm: 150,
    notes: &[
        (60, 0.5), (61, 0.5), (63, 0.5), (64, 0.5), (65, 0.5), (66, 0.5), (68, 0.5), (69, 0.5),
        (70, 0.5), (72, 0.5), (74, 0.5), (76, 0.5), (77, 0.5), (79, 0.5), (81, 0.5), (82, 0.5),
        (84, 0.5), (86, 0.5), (88, 0.5), (89, 0.5), (91, 0.5), (93, 0.5), (95, 0.5), (96, 0.5),
    ],
};

const NEUTRAL: EmotionMusic = EmotionMusic {
    tempo_bpm: 100,
    notes: &[
        (60, 1.0), (62, 1.0), (64, 1.0), (65, 1.0), (67, 1.0), (69, 1.0), (71, 1.0), (72, 1.0),
        (74, 1.0), (76, 1.0), (77, 1.0), (79, 1.0), (81, 1.0), (83, 1.0), (85, 1.0), (86, 1.0),
        (88, 1.0), (89, 1.0), (91, 1.0), (93, 1.0), (95, 1.0), (97, 1.0), (99, 1.0), (101, 1.0),
    ],
};

const FEAR: EmotionMusic = EmotionMusic {
    tempo_bpm: 80,
    notes: &[
        (60, 1.0), (61, 1.0), (63, 1.0), (64, 1.0), (65, 1.0), (66, 1.0), (68, 1.0), (69, 1.0),
        (71, 1.0), (72, 1.0), (74, 1.0), (75, 1.0), (77, 1.0), (78, 1.0), (80, 1.0), (81, 1.0),
        (83, 1.0), (84, 1.0), (86, 1.0), (87, 1.0), (89, 1.0), (90, 1.0), (92, 1.0), (93, 1.0),
        (95, 1.0), (96, 1.0), (98, 1.0), (99, 1.0), (101, 1.0), (102, 1.0), (104, 1.0), (105, 1.0),
    ],
};

const FALLBACK: EmotionMusic = EmotionMusic {
    tempo_bpm: 90,
    notes: &[(60, 1.0)],
};

/// Music for a lowercase emotion label. Labels without a melody of their own
/// (including surprise and disgust) get a single middle C.
pub fn music_for(label: &str) -> &'static EmotionMusic {
    match label {
        "happy" => &HAPPY,
        "sad" => &SAD,
        "angry" => &ANGRY,
        "neutral" => &NEUTRAL,
        "fear" => &FEAR,
        _ => &FALLBACK,
    }
}

/// `"<Label> Music"` with the first letter upper-cased.
pub fn track_name(label: &str) -> String {
    let mut chars = label.chars();
    let capitalized = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
        None => String::new(),
    };
    format!("{} Music", capitalized)
}

/// Attachment name for a generated file. Characters outside `[A-Za-z0-9_-]`
/// are replaced so the label can't escape a directory.
pub fn download_filename(label: &str) -> String {
    let safe: String = label
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("generated_music_{}.mid", safe)
}

fn beats_to_ticks(beats: f32) -> u32 {
    (beats * TICKS_PER_BEAT as f32).round() as u32
}

/// Renders the melody for `label` as a format-1, single-track SMF. The output
/// depends only on the label.
pub fn generate(label: &str) -> Result<Vec<u8>> {
    let music = music_for(label);
    let name = track_name(label);

    let mut track: Vec<TrackEvent> = Vec::with_capacity(music.notes.len() * 2 + 3);
    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::TrackName(name.as_bytes())),
    });
    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::Tempo(u24::new(
            60_000_000 / music.tempo_bpm,
        ))),
    });

    for &(key, beats) in music.notes {
        track.push(TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Midi {
                channel: u4::new(CHANNEL),
                message: MidiMessage::NoteOn {
                    key: u7::new(key),
                    vel: u7::new(VELOCITY),
                },
            },
        });
        track.push(TrackEvent {
            delta: u28::new(beats_to_ticks(beats)),
            kind: TrackEventKind::Midi {
                channel: u4::new(CHANNEL),
                message: MidiMessage::NoteOff {
                    key: u7::new(key),
                    vel: u7::new(VELOCITY),
                },
            },
        });
    }
    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });

    let smf = Smf {
        header: Header::new(Format::Parallel, Timing::Metrical(u15::new(TICKS_PER_BEAT))),
        tracks: vec![track],
    };
    let mut bytes = Vec::new();
    smf.write_std(&mut bytes)
        .with_context(|| format!("Failed to encode MIDI for '{}'", label))?;
    Ok(bytes)
}
