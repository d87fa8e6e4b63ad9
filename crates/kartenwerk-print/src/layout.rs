// SPDX-License-Identifier: MIT
//
// Print layout — deterministic expansion and pagination of card designs
// with duplex mirroring.
//
// Front pages interleave slots left/right/left/right in card order; back
// pages use the same slot indices with the column assignment mirrored, so
// that after a long-edge duplex flip the back image at (mirrored column,
// same row) lands on the same physical card as its front.

use kartenwerk_core::types::{Bitmap, CARDS_PER_PAGE, CardDesign, CardSide, PageSide};
use tracing::{debug, info, instrument};

/// One printable page: up to four card slots per column, rows top to bottom.
///
/// Pages borrow the session's bitmaps; they are recomputed from the designs
/// on every print call and never persisted.
#[derive(Debug)]
pub struct PrintPage<'a> {
    pub side: PageSide,
    pub left: Vec<&'a Bitmap>,
    pub right: Vec<&'a Bitmap>,
}

impl PrintPage<'_> {
    /// Number of card slots filled on this page.
    pub fn slot_count(&self) -> usize {
        self.left.len() + self.right.len()
    }
}

/// Print-ready totals for host-side credit accounting and UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrintTotals {
    /// Physical front-side cards after copy expansion.
    pub front_cards: usize,
    /// Physical back-side cards after copy expansion.
    pub back_cards: usize,
    /// Physical sheets (each emitted as a front page plus a back page).
    pub sheets: usize,
}

/// Expand one side of every design by its copy count, in design order.
///
/// A design without an image on the requested side contributes nothing, so
/// front and back sequences may legitimately differ in length. The side's
/// processed image is used when present, the raw upload otherwise.
fn expand_side(designs: &[CardDesign], side: CardSide) -> Vec<&Bitmap> {
    let mut cards = Vec::new();
    for design in designs {
        if let Some(image) = design.printable_image(side) {
            for _ in 0..design.copies {
                cards.push(image);
            }
        }
    }
    cards
}

/// Number of sheets needed for the given front/back card counts.
fn sheet_count(front: usize, back: usize) -> usize {
    front.max(back).div_ceil(CARDS_PER_PAGE)
}

/// Build one page from a slice of expanded cards.
///
/// Slot `i` within the page goes to the left column when `i` is even on a
/// front page, and to the right column when `i` is even on a back page (the
/// duplex mirror). Rows fill top to bottom in slot order.
fn build_page<'a>(cards: &[&'a Bitmap], side: PageSide) -> PrintPage<'a> {
    let mut left = Vec::new();
    let mut right = Vec::new();
    for (i, &card) in cards.iter().enumerate() {
        let even = i % 2 == 0;
        let to_left = match side {
            PageSide::Front => even,
            PageSide::Back => !even,
        };
        if to_left {
            left.push(card);
        } else {
            right.push(card);
        }
    }
    PrintPage { side, left, right }
}

/// Lay out the given designs into an ordered print-page sequence.
///
/// Each sheet's front page is emitted immediately before its back page.
/// Designs with no images anywhere produce an empty sequence; refusing to
/// print in that case is the host's call, not the engine's.
#[instrument(skip(designs), fields(design_count = designs.len()))]
pub fn layout(designs: &[CardDesign]) -> Vec<PrintPage<'_>> {
    let front_cards = expand_side(designs, CardSide::Front);
    let back_cards = expand_side(designs, CardSide::Back);

    let sheets = sheet_count(front_cards.len(), back_cards.len());
    info!(
        front = front_cards.len(),
        back = back_cards.len(),
        sheets,
        "Laying out card batch"
    );

    let mut pages = Vec::with_capacity(sheets * 2);
    for sheet in 0..sheets {
        let start = sheet * CARDS_PER_PAGE;
        let front_slice = slice_page(&front_cards, start);
        let back_slice = slice_page(&back_cards, start);

        debug!(
            sheet,
            front_slots = front_slice.len(),
            back_slots = back_slice.len(),
            "Sheet built"
        );

        pages.push(build_page(front_slice, PageSide::Front));
        pages.push(build_page(back_slice, PageSide::Back));
    }
    pages
}

fn slice_page<'a, 'b>(cards: &'b [&'a Bitmap], start: usize) -> &'b [&'a Bitmap] {
    let end = (start + CARDS_PER_PAGE).min(cards.len());
    if start >= cards.len() {
        &[]
    } else {
        &cards[start..end]
    }
}

/// Print-ready totals for the given designs.
pub fn totals(designs: &[CardDesign]) -> PrintTotals {
    let front = expand_side(designs, CardSide::Front).len();
    let back = expand_side(designs, CardSide::Back).len();
    PrintTotals {
        front_cards: front,
        back_cards: back,
        sheets: sheet_count(front, back),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    /// A 2x2 bitmap tagged by its red channel, so slot assignments can be
    /// identified in the output.
    fn tagged(tag: u8) -> Bitmap {
        Bitmap::from_pixel(2, 2, Rgba([tag, 0, 0, 255]))
    }

    fn tag_of(bitmap: &Bitmap) -> u8 {
        bitmap.get_pixel(0, 0).0[0]
    }

    fn design_with(front: Option<Bitmap>, back: Option<Bitmap>, copies: u32) -> CardDesign {
        let mut d = CardDesign::new();
        d.front_image = front;
        d.back_image = back;
        d.copies = copies;
        d
    }

    /// Eight tagged fronts F0..F7 and backs B0..B7 on one sheet: the front
    /// page interleaves left/right, the back page mirrors the columns so a
    /// long-edge flip aligns each back with its front.
    #[test]
    fn duplex_mirror_assignment() {
        let designs: Vec<CardDesign> = (0..8)
            .map(|i| design_with(Some(tagged(i)), Some(tagged(100 + i)), 1))
            .collect();

        let pages = layout(&designs);
        assert_eq!(pages.len(), 2);

        let front = &pages[0];
        assert_eq!(front.side, PageSide::Front);
        let left: Vec<u8> = front.left.iter().map(|b| tag_of(b)).collect();
        let right: Vec<u8> = front.right.iter().map(|b| tag_of(b)).collect();
        assert_eq!(left, vec![0, 2, 4, 6]);
        assert_eq!(right, vec![1, 3, 5, 7]);

        let back = &pages[1];
        assert_eq!(back.side, PageSide::Back);
        let left: Vec<u8> = back.left.iter().map(|b| tag_of(b)).collect();
        let right: Vec<u8> = back.right.iter().map(|b| tag_of(b)).collect();
        assert_eq!(left, vec![101, 103, 105, 107]);
        assert_eq!(right, vec![100, 102, 104, 106]);
    }

    /// Nine cards per side spill onto a second sheet whose single slot is
    /// mirrored the same way as the first.
    #[test]
    fn ninth_card_spills_with_mirroring() {
        let designs: Vec<CardDesign> = (0..9)
            .map(|i| design_with(Some(tagged(i)), Some(tagged(100 + i)), 1))
            .collect();

        let pages = layout(&designs);
        assert_eq!(pages.len(), 4);

        // Sheet 1 front: F8 alone in the left column.
        let front = &pages[2];
        assert_eq!(front.side, PageSide::Front);
        assert_eq!(front.left.len(), 1);
        assert_eq!(tag_of(front.left[0]), 8);
        assert!(front.right.is_empty());

        // Sheet 1 back: B8 mirrored into the right column.
        let back = &pages[3];
        assert_eq!(back.side, PageSide::Back);
        assert!(back.left.is_empty());
        assert_eq!(back.right.len(), 1);
        assert_eq!(tag_of(back.right[0]), 108);
    }

    /// A single design with three copies and only a front image expands to
    /// exactly three front cards and zero back cards.
    #[test]
    fn copy_expansion_front_only() {
        let designs = vec![design_with(Some(tagged(7)), None, 3)];

        let t = totals(&designs);
        assert_eq!(t.front_cards, 3);
        assert_eq!(t.back_cards, 0);
        assert_eq!(t.sheets, 1);

        let pages = layout(&designs);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].slot_count(), 3);
        assert_eq!(pages[1].slot_count(), 0);
    }

    /// Seventeen front cards need three sheets; the last front page holds a
    /// single card in the left column.
    #[test]
    fn seventeen_cards_need_three_sheets() {
        let designs = vec![
            design_with(Some(tagged(1)), None, 8),
            design_with(Some(tagged(2)), None, 8),
            design_with(Some(tagged(3)), None, 1),
        ];

        let t = totals(&designs);
        assert_eq!(t.front_cards, 17);
        assert_eq!(t.sheets, 3);

        let pages = layout(&designs);
        assert_eq!(pages.len(), 6);

        let last_front = &pages[4];
        assert_eq!(last_front.side, PageSide::Front);
        assert_eq!(last_front.left.len(), 1);
        assert!(last_front.right.is_empty());
        assert_eq!(tag_of(last_front.left[0]), 3);
    }

    /// No designs, or designs without images, produce an empty sequence.
    #[test]
    fn empty_design_set_yields_no_pages() {
        assert!(layout(&[]).is_empty());

        let empty = vec![design_with(None, None, 4)];
        assert!(layout(&empty).is_empty());
        assert_eq!(totals(&empty).sheets, 0);
    }

    /// Expansion order follows design order, with each design's copies
    /// contiguous.
    #[test]
    fn expansion_preserves_design_order() {
        let designs = vec![
            design_with(Some(tagged(1)), None, 2),
            design_with(Some(tagged(2)), None, 1),
        ];
        let pages = layout(&designs);
        let front = &pages[0];
        // Slots: [1, 1, 2] -> left gets slots 0 and 2, right gets slot 1.
        let left: Vec<u8> = front.left.iter().map(|b| tag_of(b)).collect();
        let right: Vec<u8> = front.right.iter().map(|b| tag_of(b)).collect();
        assert_eq!(left, vec![1, 2]);
        assert_eq!(right, vec![1]);
    }

    /// The print engine places the processed image when one exists.
    #[test]
    fn processed_image_wins_over_upload() {
        let mut design = design_with(Some(tagged(1)), None, 1);
        design.front_settings.processed = Some(tagged(9));

        let pages = layout(std::slice::from_ref(&design));
        assert_eq!(tag_of(pages[0].left[0]), 9);
    }
}
