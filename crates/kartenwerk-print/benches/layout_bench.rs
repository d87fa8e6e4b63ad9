// SPDX-License-Identifier: MIT
//
// Criterion benchmarks for the kartenwerk-print crate. Benchmarks the
// layout pass (expansion plus duplex pagination) on a full ten-design
// session and the PDF render of the resulting page sequence.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::Rgba;

use kartenwerk_core::types::{Bitmap, CardDesign};
use kartenwerk_print::{BatchPdfWriter, layout};

fn synthetic_card(seed: u8) -> Bitmap {
    Bitmap::from_fn(350, 220, |x, y| {
        let v = ((x * 5 + y * 3) % 256) as u8;
        Rgba([v.wrapping_add(seed), v, seed, 255])
    })
}

/// A session's worth of designs, every side populated, maximum copies.
fn full_batch() -> Vec<CardDesign> {
    (0..10u8)
        .map(|i| {
            let mut d = CardDesign::new();
            d.front_image = Some(synthetic_card(i));
            d.back_image = Some(synthetic_card(i.wrapping_add(128)));
            d.copies = 8;
            d
        })
        .collect()
}

/// Benchmark expansion and duplex pagination of 80 duplex cards.
fn bench_layout(c: &mut Criterion) {
    let designs = full_batch();
    c.bench_function("layout (10 designs x 8 copies, duplex)", |b| {
        b.iter(|| {
            black_box(layout(black_box(&designs)));
        });
    });
}

/// Benchmark the PDF render of a 20-page batch, image embedding included.
fn bench_render(c: &mut Criterion) {
    let designs = full_batch();
    let pages = layout(&designs);
    let writer = BatchPdfWriter::new();
    c.bench_function("render batch PDF (20 pages)", |b| {
        b.iter(|| {
            black_box(writer.render(black_box(&pages)).unwrap());
        });
    });
}

criterion_group!(benches, bench_layout, bench_render);
criterion_main!(benches);
