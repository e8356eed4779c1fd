use std::{fmt, fs, path::Path, time::Duration};

use log::{debug, info};
use midi_reader_writer::{midly_0_5::merge_tracks, ConvertTicksToMicroseconds};
use midly::{num::u28, Format, Header, MidiMessage, Smf, TrackEvent, TrackEventKind};

use crate::{
    error::VizError,
    instrument::{resolve_channel_instrument, resolve_track_instrument, Instrument},
};

/// Parses a file into a [`Score`]. The seam lets tests and future formats
/// swap the backing parser without touching the visualization flow.
pub trait ScoreSource {
    fn parse(&self, path: &Path) -> Result<Score, VizError>;
}

/// The `midly`-backed source for Standard MIDI Files.
pub struct MidiScoreSource;

impl ScoreSource for MidiScoreSource {
    fn parse(&self, path: &Path) -> Result<Score, VizError> {
        let data = fs::read(path)?;
        Score::from_bytes(data)
    }
}

/// Where a part's events come from in the underlying file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PartSource {
    /// A whole track of a multi-track file.
    Track(usize),
    /// One channel of a single-track file.
    Channel(u8),
}

/// One instrument line of a score, in file order.
#[derive(Clone, Debug)]
pub struct Part {
    index: usize,
    source: PartSource,
    instrument: Option<Instrument>,
}

impl Part {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn instrument(&self) -> Option<&Instrument> {
        self.instrument.as_ref()
    }

    /// The instrument name shown in listings. An unresolved instrument is
    /// shown as the literal string `None`.
    pub fn instrument_label(&self) -> String {
        match &self.instrument {
            Some(instrument) => instrument.to_string(),
            None => "None".to_owned(),
        }
    }
}

impl fmt::Display for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Part #{} (Instrument '{}')", self.index, self.instrument_label())
    }
}

/// A parsed MIDI file together with its derived parts.
///
/// The raw bytes are kept and re-parsed on demand. `midly` borrows event
/// payloads from the buffer it parses, so exports work on a fresh parse of
/// data that is already known to be valid.
pub struct Score {
    data: Vec<u8>,
    header: Header,
    track_count: usize,
    parts: Vec<Part>,
}

impl Score {
    /// Parses SMF bytes and derives the part sequence.
    ///
    /// Multi-track files yield one part per note-carrying track, so a
    /// conductor track with nothing but tempo and meter events is not
    /// listed. A single-track file is split into one part per
    /// note-carrying channel, in channel order.
    pub fn from_bytes(data: Vec<u8>) -> Result<Score, VizError> {
        let smf = Smf::parse(&data)?;
        let header = smf.header;
        let track_count = smf.tracks.len();
        let parts = derive_parts(header.format, &smf.tracks);
        info!("parsed {} track(s) into {} part(s)", track_count, parts.len());
        Ok(Score {
            data,
            header,
            track_count,
            parts,
        })
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// Rebuilds a standalone SMF holding the whole score or one part.
    ///
    /// A track-backed part is exported together with the conductor track,
    /// if there is one, so tempo and meter survive the cut. A
    /// channel-backed part keeps every meta event of its original track
    /// for the same reason, with delta times recomputed around the
    /// dropped channels.
    pub fn export_smf(&self, part: Option<usize>) -> Result<Smf<'_>, VizError> {
        let smf = Smf::parse(&self.data)?;
        let selected = match part {
            None => return Ok(smf),
            Some(index) => &self.parts[index],
        };
        match selected.source {
            PartSource::Channel(channel) => {
                let events = filter_events(&smf.tracks[0], |kind| match kind {
                    TrackEventKind::Midi { channel: c, .. } => c.as_int() == channel,
                    TrackEventKind::Meta(_) => true,
                    _ => false,
                });
                Ok(Smf {
                    header: Header::new(Format::SingleTrack, self.header.timing),
                    tracks: vec![events],
                })
            }
            PartSource::Track(track_index) => {
                let mut tracks = Vec::with_capacity(2);
                if self.has_conductor_track() {
                    tracks.push(smf.tracks[0].clone());
                }
                tracks.push(smf.tracks[track_index].clone());
                Ok(Smf {
                    header: Header::new(Format::Parallel, self.header.timing),
                    tracks,
                })
            }
        }
    }

    /// Note counts and wall-clock end times per part. Metrical files
    /// follow the tempo map; SMPTE-timed files tick at the fixed rate
    /// their header encodes.
    pub fn part_stats(&self) -> Result<Vec<PartStats>, VizError> {
        let smf = Smf::parse(&self.data)?;
        let mut ticks_to_microseconds = ConvertTicksToMicroseconds::try_from(smf.header)
            .map_err(|_| VizError::ZeroTickDivision)?;
        let mut stats = vec![PartStats::default(); self.parts.len()];
        for (ticks, track_index, event) in merge_tracks(&smf.tracks) {
            let micros = ticks_to_microseconds.convert(ticks, &event);
            if let Some(part_index) = self.part_index_for(track_index, &event) {
                let entry = &mut stats[part_index];
                if is_note_on(&event) {
                    entry.notes += 1;
                }
                entry.end = Duration::from_micros(micros);
            }
        }
        Ok(stats)
    }

    /// Track 0 counts as a conductor when it produced no part of its own.
    fn has_conductor_track(&self) -> bool {
        self.track_count > 0
            && !self
                .parts
                .iter()
                .any(|part| part.source == PartSource::Track(0))
    }

    fn part_index_for(&self, track_index: usize, event: &TrackEventKind<'_>) -> Option<usize> {
        self.parts.iter().find_map(|part| match part.source {
            PartSource::Track(t) if t == track_index => Some(part.index),
            PartSource::Channel(channel) => match event {
                TrackEventKind::Midi { channel: c, .. } if c.as_int() == channel => {
                    Some(part.index)
                }
                _ => None,
            },
            _ => None,
        })
    }
}

/// Per-part totals reported by [`Score::part_stats`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PartStats {
    /// Note On events with non-zero velocity.
    pub notes: usize,
    /// Wall-clock time of the part's last event.
    pub end: Duration,
}

fn derive_parts(format: Format, tracks: &[Vec<TrackEvent<'_>>]) -> Vec<Part> {
    match format {
        Format::SingleTrack => match tracks.first() {
            Some(track) => split_channels(track),
            None => Vec::new(),
        },
        Format::Parallel | Format::Sequential => {
            let mut parts = Vec::new();
            for (track_index, track) in tracks.iter().enumerate() {
                if !has_notes(track) {
                    debug!("track {} carries no notes, skipping", track_index);
                    continue;
                }
                parts.push(Part {
                    index: parts.len(),
                    source: PartSource::Track(track_index),
                    instrument: resolve_track_instrument(track),
                });
            }
            parts
        }
    }
}

fn split_channels(track: &[TrackEvent<'_>]) -> Vec<Part> {
    let mut parts = Vec::new();
    for channel in 0..16 {
        if !has_notes_on_channel(track, channel) {
            continue;
        }
        parts.push(Part {
            index: parts.len(),
            source: PartSource::Channel(channel),
            instrument: resolve_channel_instrument(track, channel),
        });
    }
    parts
}

/// Copies the events selected by `keep`, recomputing delta times so the
/// result stands alone as a complete track. A dropped gap too long for
/// one delta saturates at the largest expressible delta.
fn filter_events<'a>(
    track: &[TrackEvent<'a>],
    keep: impl Fn(&TrackEventKind<'a>) -> bool,
) -> Vec<TrackEvent<'a>> {
    let mut events = Vec::new();
    let mut pending: u64 = 0;
    for event in track {
        pending += u64::from(event.delta.as_int());
        if keep(&event.kind) {
            let delta = pending.min(u64::from(u28::max_value().as_int()));
            events.push(TrackEvent {
                delta: u28::from(delta as u32),
                kind: event.kind,
            });
            pending = 0;
        }
    }
    events
}

fn is_note_on(kind: &TrackEventKind<'_>) -> bool {
    matches!(
        kind,
        TrackEventKind::Midi {
            message: MidiMessage::NoteOn { vel, .. },
            ..
        } if vel.as_int() > 0
    )
}

fn has_notes(track: &[TrackEvent<'_>]) -> bool {
    track.iter().any(|event| is_note_on(&event.kind))
}

fn has_notes_on_channel(track: &[TrackEvent<'_>], channel: u8) -> bool {
    track.iter().any(|event| match event.kind {
        TrackEventKind::Midi {
            channel: c,
            message: MidiMessage::NoteOn { vel, .. },
        } => c.as_int() == channel && vel.as_int() > 0,
        _ => false,
    })
}
