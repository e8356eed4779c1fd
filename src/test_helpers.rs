use midly::{
    num::u28, Format, Header, MetaMessage, MidiMessage, Smf, Timing, TrackEvent, TrackEventKind,
};

/// Pulses per quarter note used by all fixtures.
pub const PPQ: u16 = 480;

/// Encodes a complete in-memory SMF, so tests need no files on disk.
pub fn smf_bytes(format: Format, tracks: Vec<Vec<TrackEvent<'static>>>) -> Vec<u8> {
    let smf = Smf {
        header: Header::new(format, Timing::Metrical(PPQ.into())),
        tracks,
    };
    let mut bytes = Vec::new();
    smf.write_std(&mut bytes)
        .expect("writing to a Vec cannot fail");
    bytes
}

pub fn event(delta: u32, kind: TrackEventKind<'static>) -> TrackEvent<'static> {
    TrackEvent {
        delta: u28::from(delta),
        kind,
    }
}

pub fn meta(delta: u32, message: MetaMessage<'static>) -> TrackEvent<'static> {
    event(delta, TrackEventKind::Meta(message))
}

pub fn midi(delta: u32, channel: u8, message: MidiMessage) -> TrackEvent<'static> {
    event(
        delta,
        TrackEventKind::Midi {
            channel: channel.into(),
            message,
        },
    )
}

pub fn note_on(delta: u32, channel: u8, key: u8) -> TrackEvent<'static> {
    midi(
        delta,
        channel,
        MidiMessage::NoteOn {
            key: key.into(),
            vel: 100.into(),
        },
    )
}

pub fn note_off(delta: u32, channel: u8, key: u8) -> TrackEvent<'static> {
    midi(
        delta,
        channel,
        MidiMessage::NoteOff {
            key: key.into(),
            vel: 0.into(),
        },
    )
}

pub fn program_change(delta: u32, channel: u8, program: u8) -> TrackEvent<'static> {
    midi(
        delta,
        channel,
        MidiMessage::ProgramChange {
            program: program.into(),
        },
    )
}

/// A note-free first track carrying tempo and meter, the way sequencers
/// write conductor tracks.
pub fn conductor_track() -> Vec<TrackEvent<'static>> {
    vec![
        meta(0, MetaMessage::Tempo(500_000.into())),
        meta(0, MetaMessage::TimeSignature(4, 2, 24, 8)),
        meta(0, MetaMessage::EndOfTrack),
    ]
}

/// A track holding one named instrument playing a quarter note per key.
pub fn instrument_track(name: &'static [u8], channel: u8, keys: &[u8]) -> Vec<TrackEvent<'static>> {
    let mut track = vec![meta(0, MetaMessage::InstrumentName(name))];
    for &key in keys {
        track.push(note_on(0, channel, key));
        track.push(note_off(PPQ.into(), channel, key));
    }
    track.push(meta(0, MetaMessage::EndOfTrack));
    track
}
