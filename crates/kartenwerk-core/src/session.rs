// SPDX-License-Identifier: MIT
//
// Editor session — the explicit value object owning the ordered list of card
// designs. The engine never reads ambient state; every pipeline call receives
// its inputs from a session held by the host.

use crate::error::{KartenwerkError, Result};
use crate::types::{
    Bitmap, CardDesign, CardSide, DesignId, ImageSettings, MAX_COPIES, MAX_DESIGNS, MIN_COPIES,
};

/// An editing session holding 1 to 10 card designs in creation order.
///
/// The session owns all bitmaps; the print engine only ever borrows them for
/// the duration of a layout call.
#[derive(Debug, Clone)]
pub struct EditorSession {
    designs: Vec<CardDesign>,
}

impl EditorSession {
    /// A new session starts with one empty design.
    pub fn new() -> Self {
        Self {
            designs: vec![CardDesign::new()],
        }
    }

    /// Read-only view of the designs in order.
    pub fn designs(&self) -> &[CardDesign] {
        &self.designs
    }

    /// Append a fresh empty design, returning its id.
    ///
    /// Fails once the session already holds [`MAX_DESIGNS`] designs.
    pub fn add_design(&mut self) -> Result<DesignId> {
        if self.designs.len() >= MAX_DESIGNS {
            return Err(KartenwerkError::DesignLimit(MAX_DESIGNS));
        }
        let design = CardDesign::new();
        let id = design.id;
        self.designs.push(design);
        Ok(id)
    }

    /// Remove a design. The last remaining design cannot be removed.
    pub fn remove_design(&mut self, id: DesignId) -> Result<()> {
        if self.designs.len() <= 1 {
            return Err(KartenwerkError::LastDesign);
        }
        let before = self.designs.len();
        self.designs.retain(|d| d.id != id);
        if self.designs.len() == before {
            return Err(KartenwerkError::UnknownDesign(id.to_string()));
        }
        Ok(())
    }

    /// Look up a design by id.
    pub fn design(&self, id: DesignId) -> Result<&CardDesign> {
        self.designs
            .iter()
            .find(|d| d.id == id)
            .ok_or_else(|| KartenwerkError::UnknownDesign(id.to_string()))
    }

    /// Mutable lookup by id.
    pub fn design_mut(&mut self, id: DesignId) -> Result<&mut CardDesign> {
        self.designs
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| KartenwerkError::UnknownDesign(id.to_string()))
    }

    /// Set the copy count for a design, silently clamped to [1, 8].
    pub fn set_copies(&mut self, id: DesignId, copies: u32) -> Result<()> {
        let design = self.design_mut(id)?;
        design.copies = copies.clamp(MIN_COPIES, MAX_COPIES);
        Ok(())
    }

    /// Install a freshly uploaded bitmap for one side of a design.
    ///
    /// The side's settings are reset to defaults with the upload as the
    /// initial processed image, so the preview shows the untouched original.
    pub fn set_image(&mut self, id: DesignId, side: CardSide, bitmap: Bitmap) -> Result<()> {
        let design = self.design_mut(id)?;
        *design.settings_mut(side) = ImageSettings {
            processed: Some(bitmap.clone()),
            ..ImageSettings::default()
        };
        match side {
            CardSide::Front => design.front_image = Some(bitmap),
            CardSide::Back => design.back_image = Some(bitmap),
        }
        Ok(())
    }

    /// Remove the image (and settings) for one side of a design.
    pub fn clear_image(&mut self, id: DesignId, side: CardSide) -> Result<()> {
        let design = self.design_mut(id)?;
        *design.settings_mut(side) = ImageSettings::default();
        match side {
            CardSide::Front => design.front_image = None,
            CardSide::Back => design.back_image = None,
        }
        Ok(())
    }

    /// Total physical cards across all designs (the figure the host charges
    /// print credits against).
    pub fn total_copies(&self) -> u32 {
        self.designs.iter().map(|d| d.copies).sum()
    }

    /// Whether any design carries at least one image. The host refuses to
    /// print when this is false; the layout engine itself just emits an
    /// empty page sequence.
    pub fn has_printable_image(&self) -> bool {
        self.designs.iter().any(CardDesign::has_image)
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_bitmap() -> Bitmap {
        Bitmap::from_pixel(4, 4, image::Rgba([10, 20, 30, 255]))
    }

    /// A new session holds exactly one empty design.
    #[test]
    fn new_session_has_one_empty_design() {
        let session = EditorSession::new();
        assert_eq!(session.designs().len(), 1);
        assert!(!session.has_printable_image());
        assert_eq!(session.total_copies(), 1);
    }

    /// Adding past the ten-design limit is rejected.
    #[test]
    fn add_design_enforces_limit() {
        let mut session = EditorSession::new();
        for _ in 0..MAX_DESIGNS - 1 {
            session.add_design().unwrap();
        }
        assert_eq!(session.designs().len(), MAX_DESIGNS);
        assert!(matches!(
            session.add_design(),
            Err(KartenwerkError::DesignLimit(_))
        ));
    }

    /// The last remaining design cannot be removed.
    #[test]
    fn remove_design_keeps_at_least_one() {
        let mut session = EditorSession::new();
        let only = session.designs()[0].id;
        assert!(matches!(
            session.remove_design(only),
            Err(KartenwerkError::LastDesign)
        ));

        let second = session.add_design().unwrap();
        session.remove_design(second).unwrap();
        assert_eq!(session.designs().len(), 1);
    }

    /// Copy counts are silently clamped to [1, 8].
    #[test]
    fn copies_are_clamped() {
        let mut session = EditorSession::new();
        let id = session.designs()[0].id;

        session.set_copies(id, 0).unwrap();
        assert_eq!(session.design(id).unwrap().copies, MIN_COPIES);

        session.set_copies(id, 99).unwrap();
        assert_eq!(session.design(id).unwrap().copies, MAX_COPIES);
    }

    /// Installing an upload resets the side's settings and seeds the
    /// processed image with the untouched original.
    #[test]
    fn set_image_resets_side_settings() {
        let mut session = EditorSession::new();
        let id = session.designs()[0].id;

        session
            .design_mut(id)
            .unwrap()
            .front_settings
            .brightness = 25;

        session
            .set_image(id, CardSide::Front, tiny_bitmap())
            .unwrap();

        let design = session.design(id).unwrap();
        assert_eq!(design.front_settings.brightness, 0);
        assert!(design.front_image.is_some());
        assert!(design.front_settings.processed.is_some());
        assert!(design.has_image());
    }

    /// Clearing a side drops both the upload and its settings.
    #[test]
    fn clear_image_drops_side() {
        let mut session = EditorSession::new();
        let id = session.designs()[0].id;
        session
            .set_image(id, CardSide::Back, tiny_bitmap())
            .unwrap();

        session.clear_image(id, CardSide::Back).unwrap();
        let design = session.design(id).unwrap();
        assert!(design.back_image.is_none());
        assert!(design.back_settings.processed.is_none());
    }
}
