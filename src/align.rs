//! Point-correspondence alignment: fit a similarity transform (rotation +
//! uniform scale + translation, no shear) mapping the asset's reference
//! corners onto user-picked target points, and rebuild the placement from it
//! in one shot — no dragging involved.

use crate::core::math::{Vector2, vec2};
use crate::geo::{Corner, GeoPoint, GeoRect};
use crate::projection::PlaneProjection;
use crate::transform::TransformModel;
use thiserror::Error;

// below this squared planar spread the source points are effectively
// coincident/collinear and the solve is singular
const DEGENERATE_SPREAD_SQ: f64 = 1.0e-9;

/// One reference pairing: an asset corner (unrotated local reference point)
/// and where on the map it should land.
#[derive(Debug, Copy, Clone)]
pub struct Correspondence {
    pub corner: Corner,
    pub target: GeoPoint,
}

impl Correspondence {
    #[inline]
    pub fn new(corner: Corner, target: GeoPoint) -> Self {
        Correspondence { corner, target }
    }
}

/// Alignment failures. Both are blocking: the prior model is left untouched
/// and the caller must have the user reselect points.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AlignError {
    /// Source reference points are coincident (2-point) or collinear enough
    /// to make the least-squares system singular (3-point).
    #[error("source reference points are coincident or collinear")]
    DegenerateInput,
    /// Alignment accepts exactly 2 or 3 correspondences.
    #[error("alignment requires exactly 2 or 3 correspondences, got {0}")]
    UnsupportedPointCount(usize),
}

// rotation + uniform scale as the complex number a + bi, plus translation
#[derive(Debug, Copy, Clone)]
struct Similarity {
    a: f64,
    b: f64,
    t: Vector2,
}

impl Similarity {
    #[inline]
    fn apply(&self, p: Vector2) -> Vector2 {
        vec2(self.a * p.x - self.b * p.y, self.b * p.x + self.a * p.y) + self.t
    }

    #[inline]
    fn scale(&self) -> f64 {
        (self.a * self.a + self.b * self.b).sqrt()
    }
}

/// Solve a new placement from 2 or 3 corner-to-map correspondences.
///
/// The solve happens in planar space at the frame supplied (projected once at
/// solve time). With 2 points the similarity is the exact closed-form
/// conformal transform; with 3 points it is the closed-form least-squares
/// (Procrustes) fit. The result's pivot is reset to the new geometric center.
pub fn solve_alignment(
    model: &TransformModel,
    correspondences: &[Correspondence],
    projection: &dyn PlaneProjection,
) -> Result<TransformModel, AlignError> {
    let sources: Vec<Vector2> = correspondences
        .iter()
        .map(|c| model.visual_corner_plane(c.corner, projection))
        .collect();
    let targets: Vec<Vector2> = correspondences
        .iter()
        .map(|c| projection.to_plane(c.target))
        .collect();

    let similarity = match correspondences.len() {
        2 => solve_conformal(sources[0], sources[1], targets[0], targets[1])?,
        3 => solve_procrustes(&sources, &targets)?,
        n => return Err(AlignError::UnsupportedPointCount(n)),
    };

    Ok(rebuild_model(model, &similarity, projection))
}

/// Exact 2-point conformal solve via 2D complex division:
/// `(a + bi) = Δdst / Δsrc`, translation from the first pair.
fn solve_conformal(
    s1: Vector2,
    s2: Vector2,
    d1: Vector2,
    d2: Vector2,
) -> Result<Similarity, AlignError> {
    let dsrc = s2 - s1;
    let ddst = d2 - d1;

    let denom = dsrc.length_squared();
    if denom < DEGENERATE_SPREAD_SQ {
        return Err(AlignError::DegenerateInput);
    }

    let a = ddst.dot(dsrc) / denom;
    let b = dsrc.perp_dot(ddst) / denom;
    let t = d1 - vec2(a * s1.x - b * s1.y, b * s1.x + a * s1.y);

    Ok(Similarity { a, b, t })
}

/// Closed-form least-squares similarity (Procrustes) fit on centered
/// coordinates, translation recovered from the centroids.
fn solve_procrustes(sources: &[Vector2], targets: &[Vector2]) -> Result<Similarity, AlignError> {
    let n = sources.len() as f64;
    let src_centroid = sources
        .iter()
        .fold(Vector2::zero(), |acc, p| acc + p)
        .scale(1.0 / n);
    let dst_centroid = targets
        .iter()
        .fold(Vector2::zero(), |acc, p| acc + p)
        .scale(1.0 / n);

    let mut dot_sum = 0.0;
    let mut cross_sum = 0.0;
    let mut denom = 0.0;
    for (s, d) in sources.iter().zip(targets) {
        let sc = s - src_centroid;
        let dc = d - dst_centroid;
        dot_sum += sc.dot(dc);
        cross_sum += sc.perp_dot(dc);
        denom += sc.length_squared();
    }

    if denom < DEGENERATE_SPREAD_SQ {
        return Err(AlignError::DegenerateInput);
    }

    let a = dot_sum / denom;
    let b = cross_sum / denom;
    let t = dst_centroid
        - vec2(
            a * src_centroid.x - b * src_centroid.y,
            b * src_centroid.x + a * src_centroid.y,
        );

    Ok(Similarity { a, b, t })
}

fn rebuild_model(
    model: &TransformModel,
    similarity: &Similarity,
    projection: &dyn PlaneProjection,
) -> TransformModel {
    // new rotation from the direction of the transformed top edge
    let top_left = similarity.apply(model.visual_corner_plane(Corner::NorthWest, projection));
    let top_right = similarity.apply(model.visual_corner_plane(Corner::NorthEast, projection));
    let edge = top_right - top_left;
    let rotation_deg = f64::atan2(edge.y, edge.x).to_degrees();

    // uniform scale on the original degree extents, center from the
    // transformed visual center
    let scale = similarity.scale();
    let center_plane = similarity.apply(model.visual_center_plane(projection));
    let bounds = GeoRect::from_center_and_size_deg(
        projection.to_geo(center_plane),
        model.bounds.width_deg() * scale,
        model.bounds.height_deg() * scale,
    );

    TransformModel {
        bounds,
        rotation_deg,
        pivot: None,
    }
}
