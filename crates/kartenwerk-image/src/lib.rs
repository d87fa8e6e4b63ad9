// SPDX-License-Identifier: MIT
//
// kartenwerk-image — Image pipeline for the Kartenwerk card-print engine.
//
// Provides per-pixel scan-mode enhancement (brightness scaling, grayscale,
// adaptive black/white thresholding, auto gain), a rotation-aware crop that
// bakes an interactive crop box into a new bitmap, and the crop-gesture
// state machine with its tuned resize/rotate hit thresholds.

pub mod crop;
pub mod enhance;
pub mod gesture;

pub use crop::{CropBox, crop};
pub use enhance::{
    apply_settings, enhance, enhance_bytes, refresh_side, set_brightness, set_scan_mode,
};
pub use gesture::{CropGesture, DragState, GestureIntent, Handle, Rect, seed_crop_box};
