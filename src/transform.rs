//! Placement state of one edited overlay asset.

use crate::core::math::Vector2;
use crate::geo::{Corner, GeoPoint, GeoRect};
use crate::projection::PlaneProjection;
use image::RgbaImage;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Placement of one overlay asset on the map.
///
/// Invariant: `bounds` is always axis-aligned and unrotated. The visual
/// rotation is the rotation *of* `bounds` around `pivot` (defaulting to the
/// bounds center when absent) — `bounds` is never stored "already rotated".
///
/// A model is created when an asset enters edit mode, replaced wholesale by
/// the editor, alignment solver, or crop operations, and committed by the
/// caller only on explicit finalize.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "camelCase")
)]
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TransformModel {
    /// Axis-aligned, unrotated geographic placement rectangle.
    pub bounds: GeoRect,
    /// Visual rotation applied to `bounds` around the pivot, in degrees.
    pub rotation_deg: f64,
    /// Rotation/scale pivot. `None` means the bounds geometric center.
    pub pivot: Option<GeoPoint>,
}

impl TransformModel {
    /// Create an unrotated placement with the default (center) pivot.
    #[inline]
    pub fn new(bounds: GeoRect) -> Self {
        TransformModel {
            bounds,
            rotation_deg: 0.0,
            pivot: None,
        }
    }

    #[inline]
    pub fn center(&self) -> GeoPoint {
        self.bounds.center()
    }

    /// The point rotation and pivot-relative scaling happen around.
    #[inline]
    pub fn effective_pivot(&self) -> GeoPoint {
        self.pivot.unwrap_or_else(|| self.bounds.center())
    }

    /// Planar position of the effective pivot at the frame given.
    #[inline]
    pub fn pivot_plane(&self, projection: &dyn PlaneProjection) -> Vector2 {
        projection.to_plane(self.effective_pivot())
    }

    /// Planar position of a corner as the user sees it: the unrotated corner
    /// rotated by `rotation_deg` around the effective pivot.
    pub fn visual_corner_plane(&self, corner: Corner, projection: &dyn PlaneProjection) -> Vector2 {
        let unrotated = projection.to_plane(self.bounds.corner(corner));
        unrotated.rotate_about_deg(self.pivot_plane(projection), self.rotation_deg)
    }

    /// Planar position of the bounds center as the user sees it (the center
    /// itself moves when rotating around an off-center pivot).
    pub fn visual_center_plane(&self, projection: &dyn PlaneProjection) -> Vector2 {
        let unrotated = projection.to_plane(self.bounds.center());
        unrotated.rotate_about_deg(self.pivot_plane(projection), self.rotation_deg)
    }
}

/// Immutable raster overlay data (RGBA8).
///
/// Crop operations produce a brand-new asset; nothing in the engine edits one
/// in place.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterAsset {
    image: RgbaImage,
}

impl RasterAsset {
    /// Create an asset from raw RGBA8 bytes. Returns `None` if the byte
    /// length does not match `width_px * height_px * 4` or either dimension
    /// is zero.
    pub fn from_rgba8(width_px: u32, height_px: u32, bytes: Vec<u8>) -> Option<Self> {
        if width_px == 0 || height_px == 0 {
            return None;
        }
        RgbaImage::from_raw(width_px, height_px, bytes).map(|image| RasterAsset { image })
    }

    #[inline]
    pub fn from_image(image: RgbaImage) -> Self {
        RasterAsset { image }
    }

    #[inline]
    pub fn width_px(&self) -> u32 {
        self.image.width()
    }

    #[inline]
    pub fn height_px(&self) -> u32 {
        self.image.height()
    }

    /// Raw RGBA8 bytes, row-major.
    #[inline]
    pub fn bytes(&self) -> &[u8] {
        self.image.as_raw()
    }

    #[inline]
    pub fn as_image(&self) -> &RgbaImage {
        &self.image
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::MercatorProjection;

    #[test]
    fn raster_asset_rejects_mismatched_buffer() {
        assert!(RasterAsset::from_rgba8(4, 4, vec![0; 4 * 4 * 4]).is_some());
        assert!(RasterAsset::from_rgba8(4, 4, vec![0; 10]).is_none());
        assert!(RasterAsset::from_rgba8(0, 4, Vec::new()).is_none());
    }

    #[test]
    fn visual_corner_matches_unrotated_at_zero_rotation() {
        let proj = MercatorProjection::new(15.0);
        let model = TransformModel::new(GeoRect::from_points(
            GeoPoint::new(10.0, 50.0),
            GeoPoint::new(10.01, 50.01),
        ));
        for c in Corner::ALL {
            let visual = model.visual_corner_plane(c, &proj);
            let plain = proj.to_plane(model.bounds.corner(c));
            assert_eq!(visual, plain);
        }
    }

    #[test]
    fn effective_pivot_defaults_to_center() {
        let bounds = GeoRect::from_points(GeoPoint::new(0.0, 0.0), GeoPoint::new(2.0, 2.0));
        let mut model = TransformModel::new(bounds);
        assert!(model.effective_pivot().fuzzy_eq(GeoPoint::new(1.0, 1.0)));

        model.pivot = Some(GeoPoint::new(0.0, 0.0));
        assert!(model.effective_pivot().fuzzy_eq(GeoPoint::new(0.0, 0.0)));
    }
}
