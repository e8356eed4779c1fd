use std::{env, path::Path};

use midiviz::score::{MidiScoreSource, ScoreSource};

fn main() {
    let args: Vec<String> = env::args().collect();
    let path = Path::new(&args[1]);
    let score = MidiScoreSource.parse(path).expect("cannot load MIDI file");
    let stats = score.part_stats().expect("cannot compute part timings");

    // One line per derived part:
    println!("part;instrument;notes;seconds");
    for (part, stat) in score.parts().iter().zip(stats.iter()) {
        println!(
            "{};{};{};{:.3}",
            part.index(),
            part.instrument_label(),
            stat.notes,
            stat.end.as_secs_f32()
        );
    }
}
