// SPDX-License-Identifier: MIT
//
// Scan-mode enhancement — pointwise pixel transforms applied to a card side
// before printing. Every mode is pointwise (no convolution or blur), which
// preserves edge sharpness for printed ID text.

use image::Rgba;
use kartenwerk_core::error::{KartenwerkError, Result};
use kartenwerk_core::types::{Bitmap, CardDesign, CardSide, ImageSettings, ScanMode};
use tracing::{debug, info, instrument, warn};

/// Rec. 601 luminance of an RGB triple.
fn luminance(r: f32, g: f32, b: f32) -> f32 {
    r * 0.299 + g * 0.587 + b * 0.114
}

/// Mean luminance of a bitmap after applying the user brightness factor.
///
/// Used by the `Auto` and `BlackWhite` modes to pick their gain/threshold
/// buckets from the image the user is actually looking at.
fn mean_luminance(source: &Bitmap, brightness_factor: f32) -> f32 {
    let pixel_count = (source.width() as u64 * source.height() as u64).max(1);
    let mut total = 0.0f64;
    for Rgba([r, g, b, _]) in source.pixels() {
        let r = (*r as f32 * brightness_factor).clamp(0.0, 255.0);
        let g = (*g as f32 * brightness_factor).clamp(0.0, 255.0);
        let b = (*b as f32 * brightness_factor).clamp(0.0, 255.0);
        total += luminance(r, g, b) as f64;
    }
    (total / pixel_count as f64) as f32
}

/// Bi-level threshold for a given mean luminance.
///
/// Conservative bucket table tuned to keep scanned text legible across dark
/// and bright originals.
fn bw_threshold(mean: f32) -> f32 {
    if mean < 50.0 {
        105.0
    } else if mean < 80.0 {
        115.0
    } else if mean < 110.0 {
        125.0
    } else if mean < 140.0 {
        135.0
    } else if mean < 170.0 {
        145.0
    } else {
        160.0
    }
}

/// Brightness gain for `Auto` mode, keyed by mean luminance.
///
/// Bucket order matters: images in (160, 220] fall through to the 1.15 arm.
fn auto_gain(mean: f32) -> f32 {
    if mean < 80.0 {
        1.6
    } else if mean < 120.0 {
        1.4
    } else if mean < 160.0 {
        1.25
    } else if mean > 220.0 {
        1.0
    } else {
        1.15
    }
}

/// Apply a scan mode and brightness offset to a bitmap, producing a new one.
///
/// `brightness` is a percentage offset in [-50, 50]; it scales every channel
/// by `1 + brightness/100` before the mode-specific transform. The source is
/// never mutated, so enhancement can always be re-derived from the original
/// upload. Alpha is passed through untouched.
#[instrument(skip(source), fields(width = source.width(), height = source.height()))]
pub fn enhance(source: &Bitmap, mode: ScanMode, brightness: i32) -> Bitmap {
    let factor = 1.0 + brightness.clamp(-50, 50) as f32 / 100.0;

    // Pass 1 for the adaptive modes: mean luminance of the brightened image.
    let mean = match mode {
        ScanMode::Auto | ScanMode::BlackWhite => mean_luminance(source, factor),
        _ => 0.0,
    };
    if matches!(mode, ScanMode::Auto | ScanMode::BlackWhite) {
        debug!(mean, "Mean luminance computed");
    }

    let gain = auto_gain(mean);
    let threshold = bw_threshold(mean);

    let mut output = Bitmap::new(source.width(), source.height());
    for (dst, src) in output.pixels_mut().zip(source.pixels()) {
        let Rgba([r, g, b, a]) = *src;
        let r = (r as f32 * factor).clamp(0.0, 255.0);
        let g = (g as f32 * factor).clamp(0.0, 255.0);
        let b = (b as f32 * factor).clamp(0.0, 255.0);

        *dst = match mode {
            ScanMode::Original => Rgba([r as u8, g as u8, b as u8, a]),
            ScanMode::Gray => {
                // Brighten the grayscale by 20% for legibility on card stock.
                let l = (luminance(r, g, b) * 1.2).clamp(0.0, 255.0) as u8;
                Rgba([l, l, l, a])
            }
            ScanMode::BlackWhite => {
                let mut l = luminance(r, g, b);
                // Mild lift for very dark pixels so thin text survives the cut.
                if l < 35.0 {
                    l = (l * 1.12).min(255.0);
                }
                // Hard cutoff: crisp bi-level output, no dithering.
                let bw = if l > threshold { 255u8 } else { 0u8 };
                Rgba([bw, bw, bw, a])
            }
            ScanMode::Auto => {
                let mut r = (r * gain).clamp(0.0, 255.0);
                let mut g = (g * gain).clamp(0.0, 255.0);
                let mut b = (b * gain).clamp(0.0, 255.0);

                // Restricted contrast boost: mid-tones only, so near-black and
                // near-white pixels are left alone and no banding is introduced.
                let normalized = luminance(r, g, b) / 255.0;
                if normalized > 0.2 && normalized < 0.8 {
                    let boost = |c: f32| (128.0 + (c - 128.0) * 1.1).clamp(0.0, 255.0);
                    r = boost(r);
                    g = boost(g);
                    b = boost(b);
                }
                Rgba([r as u8, g as u8, b as u8, a])
            }
        };
    }

    output
}

/// Enhance raw encoded image bytes, returning PNG bytes.
///
/// Undecodable input is returned unchanged rather than raised: the user may
/// still want to print an unmodified scan, so enhancement treats a decode
/// failure as a pass-through.
#[instrument(skip(data), fields(data_len = data.len()))]
pub fn enhance_bytes(data: &[u8], mode: ScanMode, brightness: i32) -> Result<Vec<u8>> {
    let decoded = match image::load_from_memory(data) {
        Ok(img) => img.to_rgba8(),
        Err(err) => {
            warn!(%err, "Source bytes did not decode; passing through unchanged");
            return Ok(data.to_vec());
        }
    };

    let enhanced = enhance(&decoded, mode, brightness);

    let mut buffer = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut buffer);
    image::DynamicImage::ImageRgba8(enhanced)
        .write_to(&mut cursor, image::ImageFormat::Png)
        .map_err(|err| KartenwerkError::Encode(format!("PNG encoding failed: {}", err)))?;

    info!(out_len = buffer.len(), "Enhancement complete");
    Ok(buffer)
}

/// Apply a side's current settings to its original upload.
pub fn apply_settings(original: &Bitmap, settings: &ImageSettings) -> Bitmap {
    enhance(original, settings.scan_mode, settings.brightness)
}

/// Re-apply a side's current settings to its original upload, refreshing
/// the cached processed image. A side with no upload is left untouched.
///
/// This is the sanctioned re-derivation path for hosts that mutate a side's
/// settings directly rather than going through the setters.
pub fn refresh_side(design: &mut CardDesign, side: CardSide) {
    let processed = design
        .image(side)
        .map(|original| apply_settings(original, design.settings(side)));
    if processed.is_none() {
        return;
    }
    design.settings_mut(side).processed = processed;
}

/// Switch a side's scan mode, recomputing the processed image from the
/// original upload. A side with no upload is left untouched.
pub fn set_scan_mode(design: &mut CardDesign, side: CardSide, mode: ScanMode) {
    if design.image(side).is_none() {
        return;
    }
    design.settings_mut(side).scan_mode = mode;
    refresh_side(design, side);
}

/// Adjust a side's brightness, recomputing the processed image from the
/// original upload. A side with no upload is left untouched.
pub fn set_brightness(design: &mut CardDesign, side: CardSide, brightness: i32) {
    if design.image(side).is_none() {
        return;
    }
    design.settings_mut(side).brightness = brightness.clamp(-50, 50);
    refresh_side(design, side);
}
