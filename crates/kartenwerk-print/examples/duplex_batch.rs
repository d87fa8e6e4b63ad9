// SPDX-License-Identifier: MIT
//
// End-to-end demo: build a small editing session with synthetic card
// images, run the enhancement and layout pipeline, and write a duplex-ready
// batch PDF to the system temp directory.
//
// Run with `cargo run -p kartenwerk-print --example duplex_batch`.
// Set RUST_LOG=debug to watch the pipeline.

use image::Rgba;
use kartenwerk_core::session::EditorSession;
use kartenwerk_core::types::{Bitmap, CardSide, ScanMode};
use kartenwerk_image::set_scan_mode;
use kartenwerk_print::{BatchPdfWriter, layout, totals};
use tracing_subscriber::EnvFilter;

fn synthetic_card(seed: u8) -> Bitmap {
    Bitmap::from_fn(350, 220, |x, y| {
        let stripe = if (x / 24) % 2 == 0 { 200 } else { 60 };
        Rgba([stripe, seed.wrapping_mul(3), (y % 256) as u8, 255])
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let mut session = EditorSession::new();
    let first = session.designs()[0].id;
    session.set_image(first, CardSide::Front, synthetic_card(1))?;
    session.set_image(first, CardSide::Back, synthetic_card(2))?;
    session.set_copies(first, 5)?;

    let second = session.add_design()?;
    session.set_image(second, CardSide::Front, synthetic_card(7))?;
    session.set_copies(second, 4)?;

    // Gray-scale the first design's front, as a scanner operator would.
    set_scan_mode(session.design_mut(first)?, CardSide::Front, ScanMode::Gray);

    let t = totals(session.designs());
    println!(
        "{} front cards, {} back cards, {} sheets",
        t.front_cards, t.back_cards, t.sheets
    );

    let pages = layout(session.designs());
    let path = std::env::temp_dir().join("kartenwerk_duplex_batch.pdf");
    BatchPdfWriter::new().write_to_file(&pages, &path)?;
    println!("Wrote {}", path.display());

    Ok(())
}
