//! Multi-digit scan example for ferrite-digits.
//!
//! Decodes an image of handwritten digits written side by side, splits it
//! into columns of ink and prints each canonical 28×28 sample as ASCII art.
//!
//! Run with:
//!   cargo run --example scan -- path/to/digits.png [pipeline.json]
//!
//! The optional second argument is a pipeline config written by
//! `PipelineConfig::save_json`; defaults are used otherwise.

use std::process::ExitCode;

use ferrite_digits::io::decode_scan;
use ferrite_digits::{find_latest_model, Pipeline, PipelineConfig, PixelMatrix};

// ---------------------------------------------------------------------------
// Rendering helpers
// ---------------------------------------------------------------------------

/// One character per cell, darker glyphs for more ink.
fn ascii(m: &PixelMatrix) -> String {
    const RAMP: &[u8] = b" .:-=+*#%@";
    let mut out = String::with_capacity(m.rows() * (m.cols() + 1));
    for row in 0..m.rows() {
        for &v in m.row(row) {
            let idx = (v * (RAMP.len() - 1) as f64).round() as usize;
            out.push(RAMP[idx] as char);
        }
        out.push('\n');
    }
    out
}

fn run(image_path: &str, config_path: Option<&str>) -> ferrite_digits::Result<()> {
    let config = match config_path {
        Some(path) => {
            println!("Loading pipeline config from '{}'...", path);
            PipelineConfig::load_json(path)?
        }
        None => PipelineConfig::default(),
    };
    let pipeline = Pipeline::new(config)?;

    let bytes = std::fs::read(image_path)?;
    let height = pipeline.config().contrast.size as u32;
    let buf = decode_scan(&bytes, height)?;
    println!("Decoded '{}' → {}x{} grayscale", image_path, buf.width, buf.height);

    let scan = pipeline.read_scan(&buf.bytes, buf.width, buf.height)?;
    println!("\nNormalized scan:\n{}", ascii(&scan.normalized.pixels));

    println!("Found {} digit(s):", scan.spans.len());
    for (i, (span, sample)) in scan.spans.iter().zip(&scan.samples).enumerate() {
        println!(
            "\n── Digit {} · columns {}..={} ({} wide) ──",
            i + 1, span.start, span.end, span.width()
        );
        print!("{}", ascii(sample.pixels()));
    }

    match find_latest_model("trained_models", "json") {
        Some(path) => println!("\nLatest model on disk: {}", path.display()),
        None => println!("\nNo trained model found; skipping prediction."),
    }
    Ok(())
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(image_path) = args.first() else {
        eprintln!("usage: scan <image> [pipeline.json]");
        return ExitCode::from(2);
    };

    match run(image_path, args.get(1).map(String::as_str)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("scan failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
