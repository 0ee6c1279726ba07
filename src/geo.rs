//! Geographic coordinate types and degree/meter conversions.
//!
//! Geographic space is WGS84 lng/lat degrees. Real-world sizes use a spherical
//! earth model with the web mercator radius, which is plenty of accuracy for
//! placement editing at building scale.

use crate::core::math::min_max;
use crate::core::traits::FuzzyEq;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Spherical earth radius in meters (web mercator datum).
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Meters spanned by one degree of latitude (and one degree of longitude at
/// the equator) on the spherical model.
pub const METERS_PER_DEGREE: f64 = EARTH_RADIUS_M * std::f64::consts::PI / 180.0;

/// Geographic point (longitude/latitude in degrees).
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "camelCase")
)]
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct GeoPoint {
    pub lng: f64,
    pub lat: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lng: f64, lat: f64) -> Self {
        GeoPoint { lng, lat }
    }

    /// Fuzzy equal comparison with another point using `fuzzy_epsilon` given.
    #[inline]
    pub fn fuzzy_eq_eps(&self, other: Self, fuzzy_epsilon: f64) -> bool {
        self.lng.fuzzy_eq_eps(other.lng, fuzzy_epsilon)
            && self.lat.fuzzy_eq_eps(other.lat, fuzzy_epsilon)
    }

    /// Fuzzy equal comparison with another point using the default fuzzy epsilon.
    #[inline]
    pub fn fuzzy_eq(&self, other: Self) -> bool {
        self.fuzzy_eq_eps(other, f64::fuzzy_epsilon())
    }
}

/// Corners of an unrotated placement rectangle.
///
/// Closed set: every drag handle and alignment reference point is one of
/// these four, dispatched with exhaustive matches.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "camelCase")
)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Corner {
    NorthWest,
    NorthEast,
    SouthEast,
    SouthWest,
}

impl Corner {
    /// All four corners in a fixed order (NW, NE, SE, SW).
    pub const ALL: [Corner; 4] = [
        Corner::NorthWest,
        Corner::NorthEast,
        Corner::SouthEast,
        Corner::SouthWest,
    ];

    /// The diagonally opposite corner (the fixed point of a corner resize).
    #[inline]
    pub fn opposite(self) -> Corner {
        match self {
            Corner::NorthWest => Corner::SouthEast,
            Corner::NorthEast => Corner::SouthWest,
            Corner::SouthEast => Corner::NorthWest,
            Corner::SouthWest => Corner::NorthEast,
        }
    }
}

/// Axis-aligned geographic rectangle (`min` is the southwest corner, `max`
/// the northeast corner).
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "camelCase")
)]
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct GeoRect {
    pub min: GeoPoint,
    pub max: GeoPoint,
}

impl GeoRect {
    /// Create a rectangle from two arbitrary diagonal points, normalizing so
    /// `min <= max` on both axes.
    #[inline]
    pub fn from_points(a: GeoPoint, b: GeoPoint) -> Self {
        let (min_lng, max_lng) = min_max(a.lng, b.lng);
        let (min_lat, max_lat) = min_max(a.lat, b.lat);
        GeoRect {
            min: GeoPoint::new(min_lng, min_lat),
            max: GeoPoint::new(max_lng, max_lat),
        }
    }

    /// Create a rectangle centered at `center` with the degree extents given.
    #[inline]
    pub fn from_center_and_size_deg(center: GeoPoint, width_deg: f64, height_deg: f64) -> Self {
        let half_w = width_deg / 2.0;
        let half_h = height_deg / 2.0;
        GeoRect {
            min: GeoPoint::new(center.lng - half_w, center.lat - half_h),
            max: GeoPoint::new(center.lng + half_w, center.lat + half_h),
        }
    }

    /// Create a rectangle centered at `center` with real-world extents in
    /// meters, converted to degrees at the center's latitude.
    #[inline]
    pub fn from_center_and_size_meters(center: GeoPoint, width_m: f64, height_m: f64) -> Self {
        let width_deg = width_m / meters_per_degree_lng(center.lat);
        let height_deg = height_m / METERS_PER_DEGREE;
        Self::from_center_and_size_deg(center, width_deg, height_deg)
    }

    #[inline]
    pub fn width_deg(&self) -> f64 {
        self.max.lng - self.min.lng
    }

    #[inline]
    pub fn height_deg(&self) -> f64 {
        self.max.lat - self.min.lat
    }

    /// Real-world (width, height) in meters at the rectangle's own latitude.
    #[inline]
    pub fn size_meters(&self) -> (f64, f64) {
        let center = self.center();
        (
            self.width_deg() * meters_per_degree_lng(center.lat),
            self.height_deg() * METERS_PER_DEGREE,
        )
    }

    #[inline]
    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.min.lng + self.max.lng) / 2.0,
            (self.min.lat + self.max.lat) / 2.0,
        )
    }

    /// Position of the given corner.
    #[inline]
    pub fn corner(&self, corner: Corner) -> GeoPoint {
        match corner {
            Corner::NorthWest => GeoPoint::new(self.min.lng, self.max.lat),
            Corner::NorthEast => GeoPoint::new(self.max.lng, self.max.lat),
            Corner::SouthEast => GeoPoint::new(self.max.lng, self.min.lat),
            Corner::SouthWest => GeoPoint::new(self.min.lng, self.min.lat),
        }
    }

    /// Bounding box of a set of points. Returns `None` for an empty slice.
    pub fn bounding(points: &[GeoPoint]) -> Option<Self> {
        let first = points.first()?;
        let mut min = *first;
        let mut max = *first;
        for p in &points[1..] {
            min.lng = min.lng.min(p.lng);
            min.lat = min.lat.min(p.lat);
            max.lng = max.lng.max(p.lng);
            max.lat = max.lat.max(p.lat);
        }
        Some(GeoRect { min, max })
    }

    /// Fuzzy equal comparison with another rectangle using the default fuzzy epsilon.
    #[inline]
    pub fn fuzzy_eq(&self, other: Self) -> bool {
        self.min.fuzzy_eq(other.min) && self.max.fuzzy_eq(other.max)
    }
}

/// Meters spanned by one degree of longitude at the latitude given.
#[inline]
pub fn meters_per_degree_lng(lat_deg: f64) -> f64 {
    METERS_PER_DEGREE * lat_deg.to_radians().cos()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_points_normalizes() {
        let r = GeoRect::from_points(GeoPoint::new(5.0, -2.0), GeoPoint::new(1.0, 3.0));
        assert_eq!(r.min, GeoPoint::new(1.0, -2.0));
        assert_eq!(r.max, GeoPoint::new(5.0, 3.0));
    }

    #[test]
    fn corners_and_opposites() {
        let r = GeoRect::from_points(GeoPoint::new(0.0, 0.0), GeoPoint::new(2.0, 1.0));
        assert_eq!(r.corner(Corner::NorthWest), GeoPoint::new(0.0, 1.0));
        assert_eq!(r.corner(Corner::SouthEast), GeoPoint::new(2.0, 0.0));
        for c in Corner::ALL {
            assert_eq!(c.opposite().opposite(), c);
        }
    }

    #[test]
    fn meter_round_trip() {
        let center = GeoPoint::new(11.57, 48.14);
        let r = GeoRect::from_center_and_size_meters(center, 250.0, 100.0);
        let (w, h) = r.size_meters();
        assert!(w.fuzzy_eq_eps(250.0, 1e-6));
        assert!(h.fuzzy_eq_eps(100.0, 1e-6));
        assert!(r.center().fuzzy_eq(center));
    }

    #[test]
    fn bounding_box_of_points() {
        let pts = [
            GeoPoint::new(2.0, 7.0),
            GeoPoint::new(-1.0, 4.0),
            GeoPoint::new(0.5, 9.0),
        ];
        let r = GeoRect::bounding(&pts).unwrap();
        assert_eq!(r.min, GeoPoint::new(-1.0, 4.0));
        assert_eq!(r.max, GeoPoint::new(2.0, 9.0));
        assert!(GeoRect::bounding(&[]).is_none());
    }
}
