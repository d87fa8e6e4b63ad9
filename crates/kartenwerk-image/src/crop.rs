// SPDX-License-Identifier: MIT
//
// Rotation-aware crop — bakes an interactive crop box (display coordinates,
// optional rotation about the box centre) into a new bitmap of exactly the
// box's displayed size.

use image::Rgba;
use image::imageops::{self, FilterType};
use imageproc::geometric_transformations::{Interpolation, Projection, warp_into};
use kartenwerk_core::error::{KartenwerkError, Result};
use kartenwerk_core::types::Bitmap;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Rotation angles below this magnitude (radians) take the direct crop path.
pub const ANGLE_EPSILON: f32 = 0.01;

/// A user-manipulated crop rectangle in display coordinates.
///
/// `x`/`y` are the top-left corner relative to the displayed image's
/// bounding box; `angle` is radians, signed, accumulated by drag gestures
/// and unbounded (multiple full turns are allowed).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub angle: f32,
}

impl CropBox {
    /// Centre point of the box.
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Crop `source` according to `bx`, returning a bitmap of exactly
/// `round(bx.width) x round(bx.height)` pixels.
///
/// `display` is the on-screen size of the image the crop box was drawn
/// over — for a rotated box that is the rotated image's bounding box, which
/// is what the display layer reports. The display-to-natural scale is
/// derived per axis from this size.
///
/// For near-zero angles the crop rectangle is mapped straight into natural
/// pixel coordinates and sampled. Otherwise the whole source is first
/// rendered into an intermediate buffer rotated about its own centre and
/// sized to the rotated bounding box (so no corner is clipped), and the
/// rectangle is sampled from there. Mapped rectangles are clamped to the
/// buffer bounds by shrinking, never by producing out-of-bounds reads.
#[instrument(skip(source, display), fields(width = source.width(), height = source.height()))]
pub fn crop(source: &Bitmap, bx: &CropBox, display: (f32, f32)) -> Result<Bitmap> {
    if source.width() == 0 || source.height() == 0 {
        return Err(KartenwerkError::RenderSurface(
            "source bitmap has zero area".into(),
        ));
    }
    if display.0 <= 0.0 || display.1 <= 0.0 {
        return Err(KartenwerkError::RenderSurface(format!(
            "invalid display size {}x{}",
            display.0, display.1
        )));
    }

    let out_w = bx.width.round().max(1.0) as u32;
    let out_h = bx.height.round().max(1.0) as u32;

    if bx.angle.abs() <= ANGLE_EPSILON {
        // Direct path: map display coordinates to natural pixels per axis.
        let scale_x = source.width() as f32 / display.0;
        let scale_y = source.height() as f32 / display.1;
        debug!(scale_x, scale_y, "Direct crop");
        return sample_region(
            source,
            bx.x * scale_x,
            bx.y * scale_y,
            bx.width * scale_x,
            bx.height * scale_y,
            out_w,
            out_h,
        );
    }

    // Rotated path: render the whole source into a buffer sized to the
    // rotated bounding box, rotated about the image centre.
    let (w, h) = (source.width() as f32, source.height() as f32);
    let (cos, sin) = (bx.angle.cos().abs(), bx.angle.sin().abs());
    let rot_w = (w * cos + h * sin).ceil().max(1.0);
    let rot_h = (w * sin + h * cos).ceil().max(1.0);

    let projection = Projection::translate(rot_w / 2.0, rot_h / 2.0)
        * Projection::rotate(bx.angle)
        * Projection::translate(-w / 2.0, -h / 2.0);

    let mut rotated = Bitmap::new(rot_w as u32, rot_h as u32);
    warp_into(
        source,
        &projection,
        Interpolation::Bilinear,
        Rgba([255, 255, 255, 0]),
        &mut rotated,
    );
    debug!(rot_w, rot_h, angle = bx.angle, "Source rotated into bounding box");

    // The displayed image is the rotated bounding box, so the scale ratio is
    // rotated-buffer size over displayed size.
    let scale_x = rot_w / display.0;
    let scale_y = rot_h / display.1;

    sample_region(
        &rotated,
        bx.x * scale_x,
        bx.y * scale_y,
        bx.width * scale_x,
        bx.height * scale_y,
        out_w,
        out_h,
    )
}

/// Sample a (possibly fractional, possibly out-of-bounds) rectangle from a
/// bitmap into an `out_w x out_h` buffer.
///
/// The rectangle is clamped to the source bounds JS-canvas style: the origin
/// is pulled back inside first, then the extents are shrunk to fit.
fn sample_region(
    src: &Bitmap,
    x: f32,
    y: f32,
    w: f32,
    h: f32,
    out_w: u32,
    out_h: u32,
) -> Result<Bitmap> {
    let (src_w, src_h) = (src.width() as f32, src.height() as f32);

    let x = x.min(src_w - w).max(0.0);
    let y = y.min(src_h - h).max(0.0);
    let w = w.min(src_w - x);
    let h = h.min(src_h - y);

    if w < 1.0 || h < 1.0 {
        return Err(KartenwerkError::RenderSurface(format!(
            "crop rectangle degenerated to {}x{} pixels",
            w, h
        )));
    }

    let sx = x.round() as u32;
    let sy = y.round() as u32;
    let sw = (w.round() as u32).min(src.width() - sx).max(1);
    let sh = (h.round() as u32).min(src.height() - sy).max(1);

    let region = imageops::crop_imm(src, sx, sy, sw, sh).to_image();
    if (sw, sh) == (out_w, out_h) {
        return Ok(region);
    }
    Ok(imageops::resize(&region, out_w, out_h, FilterType::Triangle))
}
