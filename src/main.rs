use std::{io, process};

use anyhow::Context;
use midiviz::cmdline::parse_args;
use midiviz::score::{MidiScoreSource, ScoreSource};
use midiviz::viewer::NotationViewer;
use midiviz::visualize_track;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {:#}", err);
        process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let args = parse_args();
    let score = MidiScoreSource
        .parse(&args.midi_file)
        .with_context(|| format!("cannot load score from {}", args.midi_file.display()))?;
    visualize_track(
        &score,
        args.track,
        &NotationViewer::default(),
        &mut io::stdout(),
    )?;
    Ok(())
}
