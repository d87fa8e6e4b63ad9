// SPDX-License-Identifier: MIT
//
// kartenwerk-print — Print layout for the Kartenwerk card-print engine.
//
// Expands card designs by their copy counts, paginates them onto A4 pages
// (8 card slots, 2 columns x 4 rows) with back-side pages horizontally
// mirrored so a long-edge duplex flip keeps each physical card's front and
// back aligned, and renders the page sequence to a batch PDF.

pub mod document;
pub mod layout;

pub use document::BatchPdfWriter;
pub use layout::{PrintPage, PrintTotals, layout, totals};
