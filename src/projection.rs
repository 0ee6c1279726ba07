//! Projection between geographic coordinates and the transient planar pixel
//! space of a map viewport.
//!
//! A projection instance is only valid for the frame it was created for: pan
//! and zoom change the mapping, so callers pass the current frame's projection
//! into every engine call instead of caching one.

use crate::core::math::Vector2;
use crate::geo::GeoPoint;

/// Highest latitude representable in the square web mercator plane.
pub const MAX_MERCATOR_LATITUDE: f64 = 85.051_128_779_806_6;

const TILE_SIZE: f64 = 256.0;

/// Conversion between geographic coordinates and planar pixel coordinates for
/// one viewport frame.
///
/// Both directions are total over finite inputs; there are no error
/// conditions. Implementations must be exact inverses of each other within
/// floating point epsilon.
pub trait PlaneProjection {
    /// Project a geographic point into planar pixel space.
    fn to_plane(&self, geo: GeoPoint) -> Vector2;

    /// Unproject a planar pixel point back to geographic space.
    fn to_geo(&self, point: Vector2) -> GeoPoint;
}

/// Spherical web mercator projection into world pixel coordinates at a fixed
/// zoom level (256px tiles, y grows south), the same plane slippy-map hosts
/// use.
#[derive(Debug, Copy, Clone)]
pub struct MercatorProjection {
    zoom: f64,
    world_size: f64,
}

impl MercatorProjection {
    pub fn new(zoom: f64) -> Self {
        MercatorProjection {
            zoom,
            world_size: TILE_SIZE * 2f64.powf(zoom),
        }
    }

    #[inline]
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Pixels per degree of longitude at this zoom, useful for converting
    /// pixel thresholds into geographic search ranges.
    #[inline]
    pub fn pixels_per_degree_lng(&self) -> f64 {
        self.world_size / 360.0
    }
}

impl PlaneProjection for MercatorProjection {
    fn to_plane(&self, geo: GeoPoint) -> Vector2 {
        let lat = geo.lat.clamp(-MAX_MERCATOR_LATITUDE, MAX_MERCATOR_LATITUDE);
        let sin_lat = lat.to_radians().sin();

        let x = (geo.lng + 180.0) / 360.0 * self.world_size;
        let y = (0.5 - ((1.0 + sin_lat) / (1.0 - sin_lat)).ln() / (4.0 * std::f64::consts::PI))
            * self.world_size;

        Vector2::new(x, y)
    }

    fn to_geo(&self, point: Vector2) -> GeoPoint {
        let lng = point.x / self.world_size * 360.0 - 180.0;
        let merc_y = std::f64::consts::PI * (1.0 - 2.0 * point.y / self.world_size);
        let lat = merc_y.sinh().atan().to_degrees();

        GeoPoint::new(lng, lat)
    }
}
