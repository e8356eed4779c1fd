pub mod cmdline;
pub mod error;
pub mod instrument;
pub mod score;
pub mod viewer;

#[cfg(test)]
mod test_helpers;

use std::fmt;
use std::io::Write;

use log::debug;

pub use crate::error::VizError;
use crate::{
    score::Score,
    viewer::{ScoreViewer, ShowFormat},
};

/// Outcome of applying the track selection policy to a score.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackSelection {
    /// No selector was given; the whole score is shown.
    EntireScore,
    /// The selector names an existing part, by zero-based index.
    Part(usize),
    /// The selector is out of range. The whole score is shown instead;
    /// this is an informational fallback, not an error.
    Unknown(i64),
}

impl fmt::Display for TrackSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackSelection::EntireScore => {
                write!(f, "Track not selected - visualizing entire score")
            }
            TrackSelection::Part(index) => {
                write!(f, "Track #{} selected to be visualized", index)
            }
            TrackSelection::Unknown(selector) => {
                write!(f, "Unknown track #{} - visualizing entire score", selector)
            }
        }
    }
}

/// Applies the track selection policy. Exactly one branch matches:
/// * no selector shows the entire score,
/// * a selector in `0..part_count` picks that part,
/// * any other selector, negative ones included, falls back to the
///   entire score.
pub fn select_track(selector: Option<i64>, part_count: usize) -> TrackSelection {
    match selector {
        None => TrackSelection::EntireScore,
        Some(track) if track >= 0 && (track as u64) < part_count as u64 => {
            TrackSelection::Part(track as usize)
        }
        Some(track) => TrackSelection::Unknown(track),
    }
}

/// Lists the score's parts, announces the selection, and hands the
/// selection to the viewer.
///
/// # Example
///
/// For a three-part score and selector 5 the console shows
///
/// | Found the following tracks:
/// | Part #0 (Instrument 'Piano')
/// | Part #1 (Instrument 'Violin')
/// | Part #2 (Instrument 'None')
/// | Unknown track #5 - visualizing entire score
///
/// and the viewer opens on the whole score.
///
/// # Arguments
///
/// * score - The parsed score whose parts are listed
/// * selector - Zero-based part index from the command line, if any
/// * viewer - Where the selection is rendered; blocks until done
/// * out - Sink for the listing, stdout in production
///
/// # Errors
///
/// Fails when the listing cannot be written, when the export of the
/// selection fails, or when the viewer cannot be launched. An
/// out-of-range selector is not an error.
pub fn visualize_track<W: Write>(
    score: &Score,
    selector: Option<i64>,
    viewer: &dyn ScoreViewer,
    out: &mut W,
) -> Result<(), VizError> {
    writeln!(out, "Found the following tracks:")?;
    for part in score.parts() {
        writeln!(out, "{}", part)?;
    }
    let selection = select_track(selector, score.parts().len());
    debug!("selector {:?} resolved to {:?}", selector, selection);
    writeln!(out, "{}", selection)?;
    match selection {
        TrackSelection::Part(index) => viewer.show(score, Some(index), ShowFormat::Midi),
        TrackSelection::EntireScore | TrackSelection::Unknown(_) => {
            viewer.show(score, None, ShowFormat::Midi)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use midly::Format;
    use rstest::rstest;

    use super::*;
    use crate::test_helpers::{conductor_track, instrument_track, smf_bytes};

    /// Records which selections reach the viewer instead of launching
    /// anything.
    struct RecordingViewer {
        shown: RefCell<Vec<Option<usize>>>,
    }

    impl RecordingViewer {
        fn new() -> Self {
            RecordingViewer {
                shown: RefCell::new(Vec::new()),
            }
        }
    }

    impl ScoreViewer for RecordingViewer {
        fn show(
            &self,
            _score: &Score,
            part: Option<usize>,
            _format: ShowFormat,
        ) -> Result<(), VizError> {
            self.shown.borrow_mut().push(part);
            Ok(())
        }
    }

    fn trio() -> Score {
        let bytes = smf_bytes(
            Format::Parallel,
            vec![
                conductor_track(),
                instrument_track(b"Piano", 0, &[60, 64, 67]),
                instrument_track(b"Violin", 1, &[69]),
                instrument_track(b"Drum", 9, &[35]),
            ],
        );
        Score::from_bytes(bytes).unwrap()
    }

    fn run(score: &Score, selector: Option<i64>) -> (String, Vec<Option<usize>>) {
        let viewer = RecordingViewer::new();
        let mut out = Vec::new();
        visualize_track(score, selector, &viewer, &mut out).unwrap();
        (String::from_utf8(out).unwrap(), viewer.shown.into_inner())
    }

    #[rstest(selector, part_count, expect,
        case(None, 3, TrackSelection::EntireScore),
        case(Some(0), 3, TrackSelection::Part(0)),
        case(Some(2), 3, TrackSelection::Part(2)),
        case(Some(3), 3, TrackSelection::Unknown(3)),
        case(Some(-1), 3, TrackSelection::Unknown(-1)),
        case(Some(i64::MAX), 3, TrackSelection::Unknown(i64::MAX)),
        case(Some(i64::MIN), 3, TrackSelection::Unknown(i64::MIN)),
        case(Some(0), 0, TrackSelection::Unknown(0)),
        case(None, 0, TrackSelection::EntireScore),
    )]
    fn exactly_one_selection_branch_matches(
        selector: Option<i64>,
        part_count: usize,
        expect: TrackSelection,
    ) {
        assert_eq!(select_track(selector, part_count), expect);
    }

    #[rstest(selection, expect,
        case(TrackSelection::EntireScore, "Track not selected - visualizing entire score"),
        case(TrackSelection::Part(2), "Track #2 selected to be visualized"),
        case(TrackSelection::Unknown(5), "Unknown track #5 - visualizing entire score"),
        case(TrackSelection::Unknown(-1), "Unknown track #-1 - visualizing entire score"),
    )]
    fn selection_announcements(selection: TrackSelection, expect: &str) {
        assert_eq!(selection.to_string(), expect);
    }

    #[test]
    fn without_a_selector_the_whole_score_is_shown() {
        let score = trio();
        let (printed, shown) = run(&score, None);
        assert_eq!(
            printed,
            "Found the following tracks:\n\
             Part #0 (Instrument 'Piano')\n\
             Part #1 (Instrument 'Violin')\n\
             Part #2 (Instrument 'Drum')\n\
             Track not selected - visualizing entire score\n"
        );
        assert_eq!(shown, [None]);
    }

    #[test]
    fn an_in_range_selector_shows_just_that_part() {
        let score = trio();
        let (printed, shown) = run(&score, Some(1));
        assert!(printed.ends_with("Track #1 selected to be visualized\n"));
        assert_eq!(shown, [Some(1)]);
    }

    #[test]
    fn track_zero_is_selectable() {
        let score = trio();
        let (printed, shown) = run(&score, Some(0));
        assert!(printed.ends_with("Track #0 selected to be visualized\n"));
        assert_eq!(shown, [Some(0)]);
    }

    #[test]
    fn an_out_of_range_selector_falls_back_to_the_whole_score() {
        let score = trio();
        let (printed, shown) = run(&score, Some(5));
        assert_eq!(
            printed,
            "Found the following tracks:\n\
             Part #0 (Instrument 'Piano')\n\
             Part #1 (Instrument 'Violin')\n\
             Part #2 (Instrument 'Drum')\n\
             Unknown track #5 - visualizing entire score\n"
        );
        assert_eq!(shown, [None]);
    }

    #[test]
    fn a_negative_selector_takes_the_fallback_branch() {
        let score = trio();
        let (printed, shown) = run(&score, Some(-1));
        assert!(printed.ends_with("Unknown track #-1 - visualizing entire score\n"));
        assert_eq!(shown, [None]);
    }

    #[test]
    fn listing_the_same_score_twice_prints_identical_output() {
        let score = trio();
        let (first, _) = run(&score, None);
        let (second, _) = run(&score, None);
        assert_eq!(first, second);
    }
}
