// SPDX-License-Identifier: MIT
//
// Crop-gesture state machine — disambiguates drag, resize and rotate from
// pointer positions using the tuned hit thresholds, and applies the
// resulting geometry changes to the crop box.

use kartenwerk_core::types::CARD_ASPECT_RATIO;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::crop::CropBox;

/// Pointer distance (display px) within which a corner press resizes.
pub const RESIZE_RADIUS: f32 = 15.0;

/// Outer pointer distance for the corner rotation band: presses landing in
/// (RESIZE_RADIUS, ROTATE_RADIUS) rotate. Together with [`RESIZE_RADIUS`]
/// this hysteresis band is a tuned usability contract.
pub const ROTATE_RADIUS: f32 = 40.0;

/// Minimum crop box dimension in display pixels.
pub const MIN_BOX_DIM: f32 = 50.0;

/// Axis-aligned rectangle in display coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// A resize handle on the crop box outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Handle {
    N,
    S,
    E,
    W,
    Nw,
    Ne,
    Se,
    Sw,
}

impl Handle {
    const CORNERS: [Handle; 4] = [Handle::Nw, Handle::Ne, Handle::Se, Handle::Sw];
    const EDGES: [Handle; 4] = [Handle::N, Handle::S, Handle::E, Handle::W];

    pub fn is_corner(self) -> bool {
        matches!(self, Handle::Nw | Handle::Ne | Handle::Se | Handle::Sw)
    }

    /// Handle centre position on a crop box.
    pub fn position(self, bx: &CropBox) -> (f32, f32) {
        let (cx, cy) = bx.center();
        match self {
            Handle::Nw => (bx.x, bx.y),
            Handle::N => (cx, bx.y),
            Handle::Ne => (bx.x + bx.width, bx.y),
            Handle::E => (bx.x + bx.width, cy),
            Handle::Se => (bx.x + bx.width, bx.y + bx.height),
            Handle::S => (cx, bx.y + bx.height),
            Handle::Sw => (bx.x, bx.y + bx.height),
            Handle::W => (bx.x, cy),
        }
    }
}

/// What a pointer position over the crop dialog would do if pressed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureIntent {
    Resize(Handle),
    Rotate(Handle),
    Drag,
    Miss,
}

/// Current gesture, with the data needed to continue it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragState {
    Idle,
    /// Moving the whole box; grab offset from the box origin.
    Dragging { grab_x: f32, grab_y: f32 },
    /// Resizing via one handle; last pointer position.
    Resizing { handle: Handle },
    /// Rotating about a fixed centre captured at press time.
    Rotating { cx: f32, cy: f32 },
}

/// Seed a crop box centred on the displayed image at the nominal ID-card
/// aspect ratio, sized to 80% of the displayed width but leaving 100 px of
/// working margin inside the dialog.
pub fn seed_crop_box(bounds: Rect, image_rect: Rect) -> CropBox {
    let width = (image_rect.width * 0.8).min(bounds.width - 100.0);
    let height = width / CARD_ASPECT_RATIO;
    let (cx, cy) = image_rect.center();
    CropBox {
        x: cx - width / 2.0,
        y: cy - height / 2.0,
        width,
        height,
        angle: 0.0,
    }
}

/// Interactive crop gesture over a single crop box.
///
/// The host feeds pointer events in display coordinates; the machine owns
/// the box until [`CropGesture::release`] hands it back. `bounds` is the
/// working area the box may occupy (the crop dialog, which can extend past
/// the displayed image).
#[derive(Debug, Clone)]
pub struct CropGesture {
    crop_box: CropBox,
    bounds: Rect,
    state: DragState,
    last: (f32, f32),
}

impl CropGesture {
    pub fn new(crop_box: CropBox, bounds: Rect) -> Self {
        Self {
            crop_box,
            bounds,
            state: DragState::Idle,
            last: (0.0, 0.0),
        }
    }

    pub fn crop_box(&self) -> &CropBox {
        &self.crop_box
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    /// Classify a pointer position without changing state (hover feedback).
    ///
    /// Corner handles win over edges; a press within [`RESIZE_RADIUS`] of a
    /// corner resizes, within the (15, 40) band rotates, and at 40 px or
    /// beyond falls through to the edge/interior checks.
    pub fn hit_test(&self, x: f32, y: f32) -> GestureIntent {
        let nearest_corner = Handle::CORNERS
            .iter()
            .map(|&h| (h, distance(h.position(&self.crop_box), (x, y))))
            .min_by(|a, b| a.1.total_cmp(&b.1));

        if let Some((corner, dist)) = nearest_corner {
            if dist <= RESIZE_RADIUS {
                return GestureIntent::Resize(corner);
            }
            if dist < ROTATE_RADIUS {
                return GestureIntent::Rotate(corner);
            }
        }

        for handle in Handle::EDGES {
            if distance(handle.position(&self.crop_box), (x, y)) <= RESIZE_RADIUS {
                return GestureIntent::Resize(handle);
            }
        }

        let bx = &self.crop_box;
        if x >= bx.x && x <= bx.x + bx.width && y >= bx.y && y <= bx.y + bx.height {
            return GestureIntent::Drag;
        }
        GestureIntent::Miss
    }

    /// Begin a gesture at a pointer position. A miss leaves the machine idle.
    pub fn press(&mut self, x: f32, y: f32) -> &DragState {
        self.last = (x, y);
        self.state = match self.hit_test(x, y) {
            GestureIntent::Resize(handle) => DragState::Resizing { handle },
            GestureIntent::Rotate(_) => {
                let (cx, cy) = self.crop_box.center();
                DragState::Rotating { cx, cy }
            }
            GestureIntent::Drag => DragState::Dragging {
                grab_x: x - self.crop_box.x,
                grab_y: y - self.crop_box.y,
            },
            GestureIntent::Miss => DragState::Idle,
        };
        debug!(state = ?self.state, "Gesture press");
        &self.state
    }

    /// Continue the active gesture to a new pointer position.
    pub fn drag(&mut self, x: f32, y: f32) {
        match self.state {
            DragState::Idle => {}
            DragState::Dragging { grab_x, grab_y } => {
                let bx = &mut self.crop_box;
                bx.x = (x - grab_x)
                    .min(self.bounds.right() - bx.width)
                    .max(self.bounds.x);
                bx.y = (y - grab_y)
                    .min(self.bounds.bottom() - bx.height)
                    .max(self.bounds.y);
                self.last = (x, y);
            }
            DragState::Rotating { cx, cy } => {
                // Accumulate the pointer's angular delta about the centre
                // captured at press time; the angle is unbounded.
                let prev = (self.last.1 - cy).atan2(self.last.0 - cx);
                let next = (y - cy).atan2(x - cx);
                self.crop_box.angle += next - prev;
                self.last = (x, y);
            }
            DragState::Resizing { handle } => {
                let dx = x - self.last.0;
                let dy = y - self.last.1;
                self.resize(handle, dx, dy);
                self.last = (x, y);
            }
        }
    }

    /// Finish the gesture, returning the final box.
    pub fn release(&mut self) -> CropBox {
        self.state = DragState::Idle;
        self.crop_box
    }

    /// Apply a resize delta for one handle.
    ///
    /// Corner handles resize both dimensions independently (free resize, no
    /// aspect lock); edge handles resize one. The moving edge is clamped to
    /// the working bounds by shrinking, and the 50 px floor re-anchors the
    /// moving edge rather than shifting the opposite one.
    fn resize(&mut self, handle: Handle, dx: f32, dy: f32) {
        let bx = &mut self.crop_box;

        // Horizontal component.
        match handle {
            Handle::E | Handle::Ne | Handle::Se => {
                bx.width += dx;
            }
            Handle::W | Handle::Nw | Handle::Sw => {
                bx.width -= dx;
                bx.x += dx;
            }
            _ => {}
        }
        // Vertical component.
        match handle {
            Handle::S | Handle::Se | Handle::Sw => {
                bx.height += dy;
            }
            Handle::N | Handle::Ne | Handle::Nw => {
                bx.height -= dy;
                bx.y += dy;
            }
            _ => {}
        }

        // Clamp to working bounds by shrinking the overhanging edge.
        if bx.x < self.bounds.x {
            bx.width += bx.x - self.bounds.x;
            bx.x = self.bounds.x;
        }
        if bx.y < self.bounds.y {
            bx.height += bx.y - self.bounds.y;
            bx.y = self.bounds.y;
        }
        if bx.x + bx.width > self.bounds.right() {
            bx.width = self.bounds.right() - bx.x;
        }
        if bx.y + bx.height > self.bounds.bottom() {
            bx.height = self.bounds.bottom() - bx.y;
        }

        // Enforce the minimum size, re-anchoring the edge that moved.
        if bx.width < MIN_BOX_DIM {
            if matches!(handle, Handle::W | Handle::Nw | Handle::Sw) {
                bx.x += bx.width - MIN_BOX_DIM;
            }
            bx.width = MIN_BOX_DIM;
        }
        if bx.height < MIN_BOX_DIM {
            if matches!(handle, Handle::N | Handle::Nw | Handle::Ne) {
                bx.y += bx.height - MIN_BOX_DIM;
            }
            bx.height = MIN_BOX_DIM;
        }
    }
}

fn distance(a: (f32, f32), b: (f32, f32)) -> f32 {
    ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt()
}
