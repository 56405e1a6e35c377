//! Free-hand drawing example for ferrite-digits.
//!
//! Replays a pointer drag across a 280×280 drawing surface (a "7"), shows the
//! feathered 28×28 canvas, then stores it as a labelled correction and
//! summarizes the correction file.
//!
//! Run with:
//!   cargo run --example draw [corrections.csv]

use ferrite_digits::dataset::{average_intensity, describe};
use ferrite_digits::{CorrectionStore, Pipeline};

const SURFACE: u32 = 280;

/// Pointer positions for a "7": a top bar then a diagonal down-left.
fn seven_stroke() -> Vec<(i32, i32)> {
    let mut points: Vec<(i32, i32)> = (60..=220).step_by(5).map(|x| (x, 60)).collect();
    points.extend((0..=36).map(|i| (220 - i * 3, 60 + i * 5)));
    points
}

fn main() {
    let path = std::env::args().nth(1).unwrap_or_else(|| "data/user_corrections.csv".to_owned());

    let pipeline = Pipeline::default();
    let mut renderer = pipeline.renderer();
    for (x, y) in seven_stroke() {
        renderer.paint_at_pointer(x, y, SURFACE, SURFACE);
    }

    let mut sample = pipeline.sample_from_canvas(&renderer);
    for row in 0..sample.pixels().rows() {
        let line: String = sample
            .pixels()
            .row(row)
            .iter()
            .map(|&v| if v >= 0.5 { '#' } else if v > 0.0 { '.' } else { ' ' })
            .collect();
        println!("{}", line);
    }
    println!("Mean intensity: {:.4}", average_intensity(&sample));

    // No classifier in this example; the user supplies the label directly.
    sample.set_label(7);
    let store = CorrectionStore::new(&path);
    if let Err(e) = store.append(&sample) {
        eprintln!("Could not save correction to '{}': {}", path, e);
        return;
    }
    println!("Saved correction to '{}'", store.path().display());

    match store.load() {
        Ok(samples) => println!("{}", describe(&samples)),
        Err(e) => eprintln!("Could not read corrections back: {}", e),
    }
}
