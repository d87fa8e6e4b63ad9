// SPDX-License-Identifier: MIT
//
// Batch PDF writer — renders a laid-out page sequence to a print-ready A4
// PDF.
//
// Each print page becomes one `printpdf::PdfPage` carrying the op list that
// places its card images; the whole document is serialised in a single
// `save` at the end. Card slots sit at fixed absolute positions from the
// page geometry, and the images carry no scaling beyond fitting the slot
// exactly.

use std::path::Path;

use kartenwerk_core::config::PageGeometry;
use kartenwerk_core::error::{KartenwerkError, Result};
use kartenwerk_core::types::Bitmap;
use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, RawImage, RawImageData,
    RawImageFormat, XObjectTransform,
};
use tracing::{debug, info, instrument};

use crate::layout::PrintPage;

/// Pixel density the card images are embedded at.
const EMBED_DPI: f32 = 300.0;

/// Renders print-page sequences into duplex-ready A4 PDF documents.
pub struct BatchPdfWriter {
    geometry: PageGeometry,
    title: Option<String>,
}

impl BatchPdfWriter {
    /// A writer with the default A4 card-batch geometry.
    pub fn new() -> Self {
        Self {
            geometry: PageGeometry::default(),
            title: None,
        }
    }

    /// A writer with custom page geometry.
    pub fn with_geometry(geometry: PageGeometry) -> Self {
        Self {
            geometry,
            title: None,
        }
    }

    /// Set a title for the PDF metadata.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    /// Render the page sequence into PDF bytes.
    ///
    /// Every [`PrintPage`] becomes one A4 page; an empty sequence produces a
    /// single blank page so the output stays viewable.
    #[instrument(skip(self, pages), fields(page_count = pages.len()))]
    pub fn render(&self, pages: &[PrintPage<'_>]) -> Result<Vec<u8>> {
        let title = self.title.as_deref().unwrap_or("Kartenwerk Card Batch");
        info!(title, "Rendering card batch PDF");

        let page_w = Mm(self.geometry.page_width_mm);
        let page_h = Mm(self.geometry.page_height_mm);

        let mut doc = PdfDocument::new(title);
        let mut pdf_pages: Vec<PdfPage> = Vec::with_capacity(pages.len().max(1));

        for page in pages {
            let mut ops: Vec<Op> = Vec::new();

            let columns = [
                (self.geometry.left_column_x_mm(), &page.left),
                (self.geometry.right_column_x_mm(), &page.right),
            ];
            for (x_mm, column) in columns {
                for (row, bitmap) in column.iter().enumerate() {
                    ops.push(self.place_card(&mut doc, bitmap, x_mm, row)?);
                }
            }

            debug!(side = ?page.side, slots = page.slot_count(), "Page rendered");
            pdf_pages.push(PdfPage::new(page_w, page_h, ops));
        }

        if pdf_pages.is_empty() {
            pdf_pages.push(PdfPage::new(page_w, page_h, Vec::new()));
        }

        doc.with_pages(pdf_pages);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let output = doc.save(&PdfSaveOptions::default(), &mut warnings);
        if !warnings.is_empty() {
            debug!(warning_count = warnings.len(), "PDF serialiser warnings");
        }

        debug!(bytes = output.len(), "Card batch PDF complete");
        Ok(output)
    }

    /// Render and write directly to a file.
    pub fn write_to_file(&self, pages: &[PrintPage<'_>], path: impl AsRef<Path>) -> Result<()> {
        let bytes = self.render(pages)?;
        std::fs::write(path.as_ref(), &bytes)?;
        info!("Wrote card batch PDF to {}", path.as_ref().display());
        Ok(())
    }

    /// Embed one card image and build the op placing it in its slot.
    fn place_card(
        &self,
        doc: &mut PdfDocument,
        bitmap: &Bitmap,
        x_mm: f32,
        row: usize,
    ) -> Result<Op> {
        let (px_w, px_h) = bitmap.dimensions();
        if px_w == 0 || px_h == 0 {
            return Err(KartenwerkError::PdfError(
                "cannot embed a zero-area card image".into(),
            ));
        }

        // printpdf wants RGB8; drop the alpha channel against white.
        let rgb = image::DynamicImage::ImageRgba8(bitmap.clone()).to_rgb8();
        let raw = RawImage {
            pixels: RawImageData::U8(rgb.into_raw()),
            width: px_w as usize,
            height: px_h as usize,
            data_format: RawImageFormat::RGB8,
            tag: Vec::new(),
        };
        let xobject_id = doc.add_image(&raw);

        // Scale the image so it fills the card slot exactly. At EMBED_DPI
        // the image's base size in pt is px / dpi * 72.
        let base_w_pt = px_w as f32 / EMBED_DPI * 72.0;
        let base_h_pt = px_h as f32 / EMBED_DPI * 72.0;
        let slot_w_pt = Mm(self.geometry.card_width_mm).into_pt().0;
        let slot_h_pt = Mm(self.geometry.card_height_mm).into_pt().0;

        // PDF origin is bottom-left; the geometry speaks top-down.
        let y_mm = self.geometry.page_height_mm
            - self.geometry.row_y_mm(row)
            - self.geometry.card_height_mm;

        Ok(Op::UseXobject {
            id: xobject_id,
            transform: XObjectTransform {
                translate_x: Some(Mm(x_mm).into_pt()),
                translate_y: Some(Mm(y_mm).into_pt()),
                scale_x: Some(slot_w_pt / base_w_pt),
                scale_y: Some(slot_h_pt / base_h_pt),
                dpi: Some(EMBED_DPI),
                rotate: None,
            },
        })
    }
}

impl Default for BatchPdfWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::layout;
    use image::Rgba;
    use kartenwerk_core::types::{CardDesign, CardSide, ScanMode};
    use kartenwerk_core::session::EditorSession;

    fn design(front: Option<Bitmap>, back: Option<Bitmap>, copies: u32) -> CardDesign {
        let mut d = CardDesign::new();
        d.front_image = front;
        d.back_image = back;
        d.copies = copies;
        d
    }

    fn card_bitmap() -> Bitmap {
        Bitmap::from_fn(40, 25, |x, y| {
            Rgba([(x * 6) as u8, (y * 10) as u8, 90, 255])
        })
    }

    /// A populated batch renders to a non-trivial PDF.
    #[test]
    fn renders_pdf_bytes() {
        let designs = vec![design(Some(card_bitmap()), Some(card_bitmap()), 3)];
        let pages = layout(&designs);

        let mut writer = BatchPdfWriter::new();
        writer.set_title("test batch");
        let bytes = writer.render(&pages).unwrap();

        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 500);
    }

    /// An empty page sequence still yields a viewable (blank) PDF.
    #[test]
    fn empty_batch_renders_blank_page() {
        let bytes = BatchPdfWriter::new().render(&[]).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    /// write_to_file produces the same bytes on disk.
    #[test]
    fn writes_pdf_to_file() {
        let designs = vec![design(Some(card_bitmap()), None, 1)];
        let pages = layout(&designs);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("batch.pdf");
        BatchPdfWriter::new().write_to_file(&pages, &path).unwrap();

        let written = std::fs::read(&path).unwrap();
        assert!(written.starts_with(b"%PDF"));
    }

    /// Full pipeline: upload into a session, enhance, lay out, render.
    #[test]
    fn session_to_pdf_pipeline() {
        let mut session = EditorSession::new();
        let id = session.designs()[0].id;
        session
            .set_image(id, CardSide::Front, card_bitmap())
            .unwrap();
        session
            .set_image(id, CardSide::Back, card_bitmap())
            .unwrap();
        session.set_copies(id, 4).unwrap();

        {
            let d = session.design_mut(id).unwrap();
            kartenwerk_image::set_scan_mode(d, CardSide::Front, ScanMode::Gray);
            kartenwerk_image::set_brightness(d, CardSide::Back, 20);
        }

        let pages = layout(session.designs());
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].slot_count(), 4);
        assert_eq!(pages[1].slot_count(), 4);

        // The gray-mode front bitmaps really are the processed ones.
        let front_px = pages[0].left[0].get_pixel(0, 0).0;
        assert_eq!(front_px[0], front_px[1]);
        assert_eq!(front_px[1], front_px[2]);

        let bytes = BatchPdfWriter::new().render(&pages).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
