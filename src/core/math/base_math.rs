use super::Vector2;
use crate::core::traits::FuzzyEq;

/// Returns the (min, max) values from `v1` and `v2`.
#[inline]
pub fn min_max<T>(v1: T, v2: T) -> (T, T)
where
    T: PartialOrd,
{
    if v1 < v2 { (v1, v2) } else { (v2, v1) }
}

/// Distance squared between the points `p0` and `p1`.
#[inline]
pub fn dist_squared(p0: Vector2, p1: Vector2) -> f64 {
    let d = p0 - p1;
    d.dot(d)
}

/// Angle of the direction vector described by `p0` to `p1`.
#[inline]
pub fn angle(p0: Vector2, p1: Vector2) -> f64 {
    f64::atan2(p1.y - p0.y, p1.x - p0.x)
}

/// Midpoint of a line segment defined by `p0` to `p1`.
#[inline]
pub fn midpoint(p0: Vector2, p1: Vector2) -> Vector2 {
    Vector2::new((p0.x + p1.x) / 2.0, (p0.y + p1.y) / 2.0)
}

/// Returns the closest point on the line segment from `p0` to `p1` to the `point` given.
#[inline]
pub fn line_seg_closest_point(p0: Vector2, p1: Vector2, point: Vector2) -> Vector2 {
    // Dot product used to find angles
    // See: http://geomalgorithms.com/a02-_lines.html
    let v = p1 - p0;
    let w = point - p0;
    let c1 = w.dot(v);
    if c1 < f64::fuzzy_epsilon() {
        return p0;
    }

    let c2 = v.length_squared();
    if c2 < c1 + f64::fuzzy_epsilon() {
        return p1;
    }

    let b = c1 / c2;
    p0 + v.scale(b)
}

/// Returns true if `point` lies inside the closed polygon described by `ring`
/// using the even-odd (ray casting) rule.
///
/// The ring is implicitly closed (last vertex connects back to the first).
/// Points exactly on an edge may land on either side.
pub fn point_in_polygon(ring: &[Vector2], point: Vector2) -> bool {
    if ring.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let pi = ring[i];
        let pj = ring[j];
        let crosses = (pi.y > point.y) != (pj.y > point.y)
            && point.x < (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x;
        if crosses {
            inside = !inside;
        }
        j = i;
    }

    inside
}
