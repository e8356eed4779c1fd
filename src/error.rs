use std::{io, path::PathBuf};

use thiserror::Error;

/// Everything that can go wrong while loading, exporting or displaying a
/// score. Out-of-range track selectors are not an error; they fall back to
/// showing the whole score.
#[derive(Debug, Error)]
pub enum VizError {
    /// The given path does not name an existing regular file. Raised during
    /// argument validation, before any parsing is attempted.
    #[error("file not found: {}", .0.display())]
    InputNotFound(PathBuf),
    /// The parsing collaborator rejected the file contents. Passed through
    /// untranslated.
    #[error(transparent)]
    ParseFailure(#[from] midly::Error),
    /// The external notation viewer could not be launched.
    #[error("cannot launch notation viewer `{program}`: {source}")]
    DisplayFailure {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Io(#[from] io::Error),
    /// The header's tick division is zero, so no event has a wall-clock
    /// time. Both metrical and SMPTE headers can carry a zero division.
    #[error("the timing header has a zero tick division")]
    ZeroTickDivision,
}
