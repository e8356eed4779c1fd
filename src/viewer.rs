use std::{
    env,
    ffi::OsString,
    path::PathBuf,
    process::{self, Command},
    sync::atomic::{AtomicU64, Ordering},
};

use log::{debug, info};

use crate::{error::VizError, score::Score};

/// Program launched on the exported file when none is configured.
/// MuseScore imports Standard MIDI Files directly.
const DEFAULT_PROGRAM: &str = "musescore";

/// Distinguishes export files written during one process run.
static EXPORT_SEQ: AtomicU64 = AtomicU64::new(0);

/// File format handed to the viewer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShowFormat {
    Midi,
}

impl ShowFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ShowFormat::Midi => "mid",
        }
    }
}

/// Renders a score, or one part of it, for the user. Implementations
/// block until the user is done looking.
pub trait ScoreViewer {
    fn show(&self, score: &Score, part: Option<usize>, format: ShowFormat)
        -> Result<(), VizError>;
}

/// Launches an external notation application on an exported copy of the
/// selection.
pub struct NotationViewer {
    program: OsString,
    export_dir: PathBuf,
}

impl Default for NotationViewer {
    fn default() -> Self {
        NotationViewer {
            program: OsString::from(DEFAULT_PROGRAM),
            export_dir: env::temp_dir(),
        }
    }
}

impl NotationViewer {
    pub fn new(program: impl Into<OsString>, export_dir: impl Into<PathBuf>) -> Self {
        NotationViewer {
            program: program.into(),
            export_dir: export_dir.into(),
        }
    }

    /// Writes the selection to a fresh file in the export directory and
    /// returns its path. The file is handed over to the viewer and never
    /// cleaned up here; the viewer may still hold it open when we return.
    pub fn export(
        &self,
        score: &Score,
        part: Option<usize>,
        format: ShowFormat,
    ) -> Result<PathBuf, VizError> {
        let filename = format!(
            "midiviz-{}-{}.{}",
            process::id(),
            EXPORT_SEQ.fetch_add(1, Ordering::Relaxed),
            format.extension()
        );
        let path = self.export_dir.join(filename);
        let smf = score.export_smf(part)?;
        smf.save(&path)?;
        debug!("exported {} track(s) to {}", smf.tracks.len(), path.display());
        Ok(path)
    }
}

impl ScoreViewer for NotationViewer {
    fn show(
        &self,
        score: &Score,
        part: Option<usize>,
        format: ShowFormat,
    ) -> Result<(), VizError> {
        let path = self.export(score, part, format)?;
        info!(
            "launching {} on {}",
            self.program.to_string_lossy(),
            path.display()
        );
        let status = Command::new(&self.program)
            .arg(&path)
            .status()
            .map_err(|source| VizError::DisplayFailure {
                program: self.program.to_string_lossy().into_owned(),
                source,
            })?;
        // The viewer's exit status is not ours to judge.
        debug!("viewer exited with {}", status);
        Ok(())
    }
}
