// SPDX-License-Identifier: MIT
//
// Core domain types for the Kartenwerk card-print engine.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Decoded sRGB 8-bit pixel buffer used throughout the engine.
///
/// Bitmaps are immutable once produced: every transform allocates a new
/// buffer rather than mutating in place, so a side's enhancement can always
/// be re-derived from the original upload.
pub type Bitmap = image::RgbaImage;

/// Maximum number of card designs a session may hold.
pub const MAX_DESIGNS: usize = 10;

/// Valid copy-count range for a single card design.
pub const MIN_COPIES: u32 = 1;
pub const MAX_COPIES: u32 = 8;

/// Physical card slots per printed A4 page (2 columns x 4 rows).
pub const CARDS_PER_PAGE: usize = 8;

/// Nominal ID-card aspect ratio (3.5in x 2.2in) used to seed the crop box.
pub const CARD_ASPECT_RATIO: f32 = 3.5 / 2.2;

/// Unique identifier for a card design.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DesignId(pub Uuid);

impl DesignId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DesignId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for DesignId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which physical side of a card an image or setting belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardSide {
    Front,
    Back,
}

/// Named pixel-transform preset applied to a card side before printing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScanMode {
    /// Brightness scaling only.
    #[default]
    Original,
    /// Mean-luminance driven gain plus a restricted mid-tone contrast boost.
    Auto,
    /// Luminance grayscale, brightened for legibility.
    Gray,
    /// Adaptive-threshold bi-level output for scanned text.
    BlackWhite,
}

/// Per-side enhancement settings.
///
/// `processed`, when present, is always the result of applying the current
/// `scan_mode`/`brightness` to the side's *original* upload — never to a
/// previously processed bitmap, so repeated adjustments cannot compound.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImageSettings {
    pub scan_mode: ScanMode,
    /// Brightness offset in percent, valid range [-50, 50].
    pub brightness: i32,
    /// Cached enhancement output, derived from the original upload.
    #[serde(skip)]
    pub processed: Option<Bitmap>,
}

/// One front/back image pair plus a copy count — the unit the print engine
/// expands into individual physical card slots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardDesign {
    pub id: DesignId,
    #[serde(skip)]
    pub front_image: Option<Bitmap>,
    #[serde(skip)]
    pub back_image: Option<Bitmap>,
    pub front_settings: ImageSettings,
    pub back_settings: ImageSettings,
    /// Physical copies to print, clamped to [1, 8].
    pub copies: u32,
}

impl CardDesign {
    /// A fresh design with no images and a single copy.
    pub fn new() -> Self {
        Self {
            id: DesignId::new(),
            front_image: None,
            back_image: None,
            front_settings: ImageSettings::default(),
            back_settings: ImageSettings::default(),
            copies: MIN_COPIES,
        }
    }

    /// The original upload for a side, if any.
    pub fn image(&self, side: CardSide) -> Option<&Bitmap> {
        match side {
            CardSide::Front => self.front_image.as_ref(),
            CardSide::Back => self.back_image.as_ref(),
        }
    }

    /// The enhancement settings for a side.
    pub fn settings(&self, side: CardSide) -> &ImageSettings {
        match side {
            CardSide::Front => &self.front_settings,
            CardSide::Back => &self.back_settings,
        }
    }

    pub fn settings_mut(&mut self, side: CardSide) -> &mut ImageSettings {
        match side {
            CardSide::Front => &mut self.front_settings,
            CardSide::Back => &mut self.back_settings,
        }
    }

    /// The bitmap the print engine should place for a side: the processed
    /// image when one exists, otherwise the raw upload.
    pub fn printable_image(&self, side: CardSide) -> Option<&Bitmap> {
        self.settings(side)
            .processed
            .as_ref()
            .or_else(|| self.image(side))
    }

    /// Whether either side carries an image.
    pub fn has_image(&self) -> bool {
        self.front_image.is_some() || self.back_image.is_some()
    }
}

impl Default for CardDesign {
    fn default() -> Self {
        Self::new()
    }
}

/// Which duplex side a print page carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSide {
    Front,
    Back,
}
