//! Rotation-aware cropping: project a crop region drawn on the map back into
//! the untransformed source-asset pixel space and cut a new asset out of it.
//!
//! Both variants return a brand-new [RasterAsset] plus a replacement
//! [TransformModel]; the source asset is never modified and no partial asset
//! is ever produced on error.

use crate::core::math::{Vector2, point_in_polygon, vec2};
use crate::geo::{Corner, GeoPoint, GeoRect};
use crate::projection::PlaneProjection;
use crate::transform::{RasterAsset, TransformModel};
use image::{Rgba, RgbaImage, imageops};
use thiserror::Error;

// planar extent below which the asset rectangle is too degenerate to map
// fractions through
const MIN_ASSET_EXTENT_PX: f64 = 1.0e-9;

/// Crop failures. Blocking: the caller keeps the original asset and model.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CropError {
    /// The crop region has non-positive pixel dimensions, lies entirely
    /// outside the source asset, or (for lasso) has fewer than 3 vertices.
    #[error("crop region does not overlap the source asset")]
    InvalidCropRegion,
}

// maps visual planar points into the asset's source pixel space via the
// common unrotated frame
struct SourceSpace {
    center: Vector2,
    rotation_deg: f64,
    top_left: Vector2,
    px_per_plane_x: f64,
    px_per_plane_y: f64,
}

impl SourceSpace {
    fn new(
        asset: &RasterAsset,
        model: &TransformModel,
        projection: &dyn PlaneProjection,
    ) -> Result<Self, CropError> {
        let top_left = projection.to_plane(model.bounds.corner(Corner::NorthWest));
        let bottom_right = projection.to_plane(model.bounds.corner(Corner::SouthEast));
        let extent_x = bottom_right.x - top_left.x;
        let extent_y = bottom_right.y - top_left.y;
        if extent_x.abs() < MIN_ASSET_EXTENT_PX || extent_y.abs() < MIN_ASSET_EXTENT_PX {
            return Err(CropError::InvalidCropRegion);
        }

        Ok(SourceSpace {
            center: projection.to_plane(model.bounds.center()),
            rotation_deg: model.rotation_deg,
            top_left,
            px_per_plane_x: asset.width_px() as f64 / extent_x,
            px_per_plane_y: asset.height_px() as f64 / extent_y,
        })
    }

    // visual plane -> un-rotated frame -> fraction of the asset rectangle ->
    // source pixels
    fn to_source_px(&self, visual: Vector2) -> Vector2 {
        let unrotated = visual.rotate_about_deg(self.center, -self.rotation_deg);
        vec2(
            (unrotated.x - self.top_left.x) * self.px_per_plane_x,
            (unrotated.y - self.top_left.y) * self.px_per_plane_y,
        )
    }

    // inverse of [SourceSpace::to_source_px]: source pixels back to the
    // visual plane
    fn to_visual_plane(&self, px: Vector2) -> Vector2 {
        let unrotated = vec2(
            self.top_left.x + px.x / self.px_per_plane_x,
            self.top_left.y + px.y / self.px_per_plane_y,
        );
        unrotated.rotate_about_deg(self.center, self.rotation_deg)
    }
}

// pixel boundaries within this of an integer are treated as exactly on it,
// so projection round-trip noise cannot grow a crop by a row of pixels
const PX_SNAP_EPS: f64 = 1.0e-6;

// clamp a floating source-pixel span to the asset and convert to an integer
// pixel rectangle; None when the clamped span is empty
fn clamp_pixel_rect(
    min: Vector2,
    max: Vector2,
    width_px: u32,
    height_px: u32,
) -> Option<(u32, u32, u32, u32)> {
    let x0 = (min.x + PX_SNAP_EPS).floor().max(0.0);
    let y0 = (min.y + PX_SNAP_EPS).floor().max(0.0);
    let x1 = (max.x - PX_SNAP_EPS).ceil().min(width_px as f64);
    let y1 = (max.y - PX_SNAP_EPS).ceil().min(height_px as f64);
    if x1 - x0 < 1.0 || y1 - y0 < 1.0 {
        return None;
    }

    let x0 = x0 as u32;
    let y0 = y0 as u32;
    Some((x0, y0, x1 as u32 - x0, y1 as u32 - y0))
}

/// Rectangular crop.
///
/// The crop rectangle's diagonal corners are taken in the same visual space
/// as the asset's rotated corners and un-rotated about the asset center into
/// the common unrotated frame; the crop's position and size as fractions of
/// the unrotated asset rectangle then select the source pixels. The resulting
/// placement is re-leveled (rotation reset to 0) over the region the cut
/// pixels actually came from, which is the crop rectangle itself except where
/// clamping to the source bounds shrank it.
pub fn crop_rectangular(
    asset: &RasterAsset,
    model: &TransformModel,
    crop_bounds: GeoRect,
    projection: &dyn PlaneProjection,
) -> Result<(RasterAsset, TransformModel), CropError> {
    let space = SourceSpace::new(asset, model, projection)?;

    let c0 = space.to_source_px(projection.to_plane(crop_bounds.corner(Corner::NorthWest)));
    let c1 = space.to_source_px(projection.to_plane(crop_bounds.corner(Corner::SouthEast)));
    let min = vec2(c0.x.min(c1.x), c0.y.min(c1.y));
    let max = vec2(c0.x.max(c1.x), c0.y.max(c1.y));

    let (x, y, width, height) = clamp_pixel_rect(min, max, asset.width_px(), asset.height_px())
        .ok_or(CropError::InvalidCropRegion)?;

    let cropped = imageops::crop_imm(asset.as_image(), x, y, width, height).to_image();

    // the placement covers the pixels actually cut, so a crop rect hanging
    // off the asset does not stretch the clamped content over the overhang
    let p0 = space.to_visual_plane(vec2(x as f64, y as f64));
    let p1 = space.to_visual_plane(vec2((x + width) as f64, (y + height) as f64));
    let bounds = GeoRect::from_points(projection.to_geo(p0), projection.to_geo(p1));
    let new_model = TransformModel::new(bounds);

    Ok((RasterAsset::from_image(cropped), new_model))
}

/// Freehand (lasso) crop.
///
/// Each lasso vertex goes geographic -> planar -> un-rotated relative to the
/// asset center -> source pixels; the polygon's pixel bounding box intersected
/// with the source bounds is cut out, with pixels outside the polygon path
/// cleared to transparent. The new placement covers exactly the geographic
/// bounding box of the drawn polygon, re-leveled to rotation 0.
pub fn crop_lasso(
    asset: &RasterAsset,
    model: &TransformModel,
    lasso: &[GeoPoint],
    projection: &dyn PlaneProjection,
) -> Result<(RasterAsset, TransformModel), CropError> {
    if lasso.len() < 3 {
        return Err(CropError::InvalidCropRegion);
    }

    let space = SourceSpace::new(asset, model, projection)?;
    let ring: Vec<Vector2> = lasso
        .iter()
        .map(|&v| space.to_source_px(projection.to_plane(v)))
        .collect();

    let mut min = ring[0];
    let mut max = ring[0];
    for p in &ring[1..] {
        min = vec2(min.x.min(p.x), min.y.min(p.y));
        max = vec2(max.x.max(p.x), max.y.max(p.y));
    }

    let (x, y, width, height) = clamp_pixel_rect(min, max, asset.width_px(), asset.height_px())
        .ok_or(CropError::InvalidCropRegion)?;

    let source = asset.as_image();
    let mut cropped = RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 0]));
    for out_y in 0..height {
        for out_x in 0..width {
            let src_x = x + out_x;
            let src_y = y + out_y;
            // sample at the pixel center
            let sample = vec2(src_x as f64 + 0.5, src_y as f64 + 0.5);
            if point_in_polygon(&ring, sample) {
                cropped.put_pixel(out_x, out_y, *source.get_pixel(src_x, src_y));
            }
        }
    }

    // placement covers exactly the drawn shape
    let bounds = GeoRect::bounding(lasso).ok_or(CropError::InvalidCropRegion)?;
    let new_model = TransformModel::new(bounds);

    Ok((RasterAsset::from_image(cropped), new_model))
}
