#![allow(dead_code)]

use overlay_placement::{
    GeoPoint, GeoRect, MercatorProjection, PlaneProjection, RasterAsset, TransformModel, Vector2,
};

/// Fixed-frame projection used across tests.
pub fn test_projection() -> MercatorProjection {
    MercatorProjection::new(17.0)
}

/// Unrotated model placed near the equator (where mercator distortion is
/// negligible, keeping planar expectations tight).
pub fn equator_model(width_deg: f64, height_deg: f64) -> TransformModel {
    TransformModel::new(GeoRect::from_center_and_size_deg(
        GeoPoint::new(30.0, 0.0),
        width_deg,
        height_deg,
    ))
}

/// The geographic point at a planar offset from another geographic point.
pub fn geo_at_plane_offset(
    projection: &dyn PlaneProjection,
    base: GeoPoint,
    dx: f64,
    dy: f64,
) -> GeoPoint {
    projection.to_geo(projection.to_plane(base) + Vector2::new(dx, dy))
}

/// Asset whose pixel values encode their own position, so crops can be
/// checked for offset correctness: pixel (x, y) = [x, y, x ^ y, 255].
pub fn position_coded_asset(width_px: u32, height_px: u32) -> RasterAsset {
    let mut bytes = Vec::with_capacity((width_px * height_px * 4) as usize);
    for y in 0..height_px {
        for x in 0..width_px {
            bytes.extend_from_slice(&[x as u8, y as u8, (x ^ y) as u8, 255]);
        }
    }
    RasterAsset::from_rgba8(width_px, height_px, bytes).unwrap()
}

/// Pixel at (x, y) as raw RGBA.
pub fn pixel_at(asset: &RasterAsset, x: u32, y: u32) -> [u8; 4] {
    asset.as_image().get_pixel(x, y).0
}
