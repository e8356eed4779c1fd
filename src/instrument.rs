use std::fmt;

use midly::{num::u7, MetaMessage, MidiMessage, TrackEvent, TrackEventKind};

/// Channel reserved for percussion by General MIDI (channel 10, zero-based 9).
pub const PERCUSSION_CHANNEL: u8 = 9;

/// The instrument assigned to one part of a score.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Instrument {
    /// Taken verbatim from an Instrument Name meta event.
    Named(String),
    /// General MIDI program number from a Program Change message.
    Program(u7),
    /// All notes sit on the percussion channel, where the melodic program
    /// table does not apply.
    Percussion,
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instrument::Named(name) => f.write_str(name),
            Instrument::Program(program) => f.write_str(program_name(*program)),
            Instrument::Percussion => f.write_str("Percussion"),
        }
    }
}

/// Resolves the instrument of a part backed by a whole track. The track's
/// own Instrument Name meta event wins over channel-level signals.
pub fn resolve_track_instrument(events: &[TrackEvent<'_>]) -> Option<Instrument> {
    if let Some(name) = instrument_name_meta(events) {
        return Some(Instrument::Named(name));
    }
    if percussion_only(events) {
        return Some(Instrument::Percussion);
    }
    first_program_change(events, None).map(Instrument::Program)
}

/// Resolves the instrument of a part backed by one channel of a
/// single-track file. Channel-scoped signals are authoritative there and
/// the track-wide name meta is only a fallback.
pub fn resolve_channel_instrument(events: &[TrackEvent<'_>], channel: u8) -> Option<Instrument> {
    if channel == PERCUSSION_CHANNEL {
        return Some(Instrument::Percussion);
    }
    if let Some(program) = first_program_change(events, Some(channel)) {
        return Some(Instrument::Program(program));
    }
    instrument_name_meta(events).map(Instrument::Named)
}

fn instrument_name_meta(events: &[TrackEvent<'_>]) -> Option<String> {
    events.iter().find_map(|event| match event.kind {
        TrackEventKind::Meta(MetaMessage::InstrumentName(raw)) => {
            let name = String::from_utf8_lossy(raw);
            let name = name.trim();
            if name.is_empty() {
                None
            } else {
                Some(name.to_owned())
            }
        }
        _ => None,
    })
}

fn first_program_change(events: &[TrackEvent<'_>], channel: Option<u8>) -> Option<u7> {
    events.iter().find_map(|event| match event.kind {
        TrackEventKind::Midi {
            channel: c,
            message: MidiMessage::ProgramChange { program },
        } => match channel {
            Some(wanted) if c.as_int() != wanted => None,
            _ => Some(program),
        },
        _ => None,
    })
}

/// Whether the events play notes exclusively on the percussion channel.
/// False for an all-rest part.
fn percussion_only(events: &[TrackEvent<'_>]) -> bool {
    let mut heard_any = false;
    for event in events {
        if let TrackEventKind::Midi {
            channel,
            message: MidiMessage::NoteOn { vel, .. },
        } = event.kind
        {
            if vel.as_int() == 0 {
                continue;
            }
            if channel.as_int() != PERCUSSION_CHANNEL {
                return false;
            }
            heard_any = true;
        }
    }
    heard_any
}

/// Name of a General MIDI level 1 program, zero-based.
pub fn program_name(program: u7) -> &'static str {
    GM_PROGRAM_NAMES[program.as_int() as usize]
}

const GM_PROGRAM_NAMES: [&str; 128] = [
    "Acoustic Grand Piano",
    "Bright Acoustic Piano",
    "Electric Grand Piano",
    "Honky-tonk Piano",
    "Electric Piano 1",
    "Electric Piano 2",
    "Harpsichord",
    "Clavinet",
    "Celesta",
    "Glockenspiel",
    "Music Box",
    "Vibraphone",
    "Marimba",
    "Xylophone",
    "Tubular Bells",
    "Dulcimer",
    "Drawbar Organ",
    "Percussive Organ",
    "Rock Organ",
    "Church Organ",
    "Reed Organ",
    "Accordion",
    "Harmonica",
    "Tango Accordion",
    "Acoustic Guitar (nylon)",
    "Acoustic Guitar (steel)",
    "Electric Guitar (jazz)",
    "Electric Guitar (clean)",
    "Electric Guitar (muted)",
    "Overdriven Guitar",
    "Distortion Guitar",
    "Guitar Harmonics",
    "Acoustic Bass",
    "Electric Bass (finger)",
    "Electric Bass (pick)",
    "Fretless Bass",
    "Slap Bass 1",
    "Slap Bass 2",
    "Synth Bass 1",
    "Synth Bass 2",
    "Violin",
    "Viola",
    "Cello",
    "Contrabass",
    "Tremolo Strings",
    "Pizzicato Strings",
    "Orchestral Harp",
    "Timpani",
    "String Ensemble 1",
    "String Ensemble 2",
    "Synth Strings 1",
    "Synth Strings 2",
    "Choir Aahs",
    "Voice Oohs",
    "Synth Voice",
    "Orchestra Hit",
    "Trumpet",
    "Trombone",
    "Tuba",
    "Muted Trumpet",
    "French Horn",
    "Brass Section",
    "Synth Brass 1",
    "Synth Brass 2",
    "Soprano Sax",
    "Alto Sax",
    "Tenor Sax",
    "Baritone Sax",
    "Oboe",
    "English Horn",
    "Bassoon",
    "Clarinet",
    "Piccolo",
    "Flute",
    "Recorder",
    "Pan Flute",
    "Blown Bottle",
    "Shakuhachi",
    "Whistle",
    "Ocarina",
    "Lead 1 (square)",
    "Lead 2 (sawtooth)",
    "Lead 3 (calliope)",
    "Lead 4 (chiff)",
    "Lead 5 (charang)",
    "Lead 6 (voice)",
    "Lead 7 (fifths)",
    "Lead 8 (bass + lead)",
    "Pad 1 (new age)",
    "Pad 2 (warm)",
    "Pad 3 (polysynth)",
    "Pad 4 (choir)",
    "Pad 5 (bowed)",
    "Pad 6 (metallic)",
    "Pad 7 (halo)",
    "Pad 8 (sweep)",
    "FX 1 (rain)",
    "FX 2 (soundtrack)",
    "FX 3 (crystal)",
    "FX 4 (atmosphere)",
    "FX 5 (brightness)",
    "FX 6 (goblins)",
    "FX 7 (echoes)",
    "FX 8 (sci-fi)",
    "Sitar",
    "Banjo",
    "Shamisen",
    "Koto",
    "Kalimba",
    "Bag Pipe",
    "Fiddle",
    "Shanai",
    "Tinkle Bell",
    "Agogo",
    "Steel Drums",
    "Woodblock",
    "Taiko Drum",
    "Melodic Tom",
    "Synth Drum",
    "Reverse Cymbal",
    "Guitar Fret Noise",
    "Breath Noise",
    "Seashore",
    "Bird Tweet",
    "Telephone Ring",
    "Helicopter",
    "Applause",
    "Gunshot",
];
