// SPDX-License-Identifier: MIT
//
// Print page geometry configuration.

use serde::{Deserialize, Serialize};

/// Fixed A4 page and card-slot geometry for batch PDF output.
///
/// All dimensions are millimetres. The defaults reproduce the tuned layout
/// used for duplex card printing: zero page margins, card slots anchored
/// 10 mm from each horizontal edge, first row 10 mm from the top, 5 mm gap
/// between stacked cards, and an 88.9 x 55.88 mm card slot.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PageGeometry {
    /// Page width in mm (A4 portrait).
    pub page_width_mm: f32,
    /// Page height in mm (A4 portrait).
    pub page_height_mm: f32,
    /// Distance from the top page edge to the first card row.
    pub top_margin_mm: f32,
    /// Distance from each horizontal page edge to its column of cards.
    pub column_margin_mm: f32,
    /// Vertical gap between stacked cards within a column.
    pub row_gap_mm: f32,
    /// Width of a single card slot.
    pub card_width_mm: f32,
    /// Height of a single card slot.
    pub card_height_mm: f32,
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self {
            page_width_mm: 210.0,
            page_height_mm: 297.0,
            top_margin_mm: 10.0,
            column_margin_mm: 10.0,
            row_gap_mm: 5.0,
            card_width_mm: 88.9,
            card_height_mm: 55.88,
        }
    }
}

impl PageGeometry {
    /// X offset of the left column's card slots.
    pub fn left_column_x_mm(&self) -> f32 {
        self.column_margin_mm
    }

    /// X offset of the right column's card slots (anchored to the right edge).
    pub fn right_column_x_mm(&self) -> f32 {
        self.page_width_mm - self.column_margin_mm - self.card_width_mm
    }

    /// Y offset (from the top edge) of the card slot in the given row.
    pub fn row_y_mm(&self, row: usize) -> f32 {
        self.top_margin_mm + row as f32 * (self.card_height_mm + self.row_gap_mm)
    }
}
