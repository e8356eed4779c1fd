use std::path::PathBuf;

use structopt::StructOpt;

use crate::error::VizError;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "midiviz",
    about = "Shows MIDI file contents in MuseScore. \
             Visualize a track if specified, otherwise show the whole score.\n\
             Example: midiviz example.mid            -> show entire score\n\
             Example: midiviz example.mid --track 2  -> show third track"
)]
pub struct Cli {
    /// MIDI file path
    #[structopt(parse(try_from_str = existing_file))]
    pub midi_file: PathBuf,
    /// Track number to examine
    #[structopt(short = "t", long = "track", allow_hyphen_values = true)]
    pub track: Option<i64>,
}

/// Validates the path while arguments are parsed, so a bad path fails
/// with a usage error instead of surfacing later as a read failure.
fn existing_file(src: &str) -> Result<PathBuf, VizError> {
    let path = PathBuf::from(src);
    if path.is_file() {
        Ok(path)
    } else {
        Err(VizError::InputNotFound(path))
    }
}

pub fn parse_args() -> Cli {
    Cli::from_args()
}
