//! Interactive drag editing of a [TransformModel]: move, corner resize
//! (opposite-corner or pivot-relative), rotate about the pivot, and pivot
//! relocation.
//!
//! The editor is a pure function of the drag-start snapshot: every
//! [DragSession::update] recomputes the model from the state captured at
//! pointer-down and the current pointer, never from the live model, so
//! intermediate float error cannot compound across frames. At most one
//! session is live at a time; cancel and commit both reduce to "the last
//! valid in-flight model stands".

mod lock;

pub use lock::*;

use crate::core::math::{Vector2, angle, dist_squared};
use crate::geo::{Corner, GeoPoint, GeoRect};
use crate::projection::PlaneProjection;
use crate::snap::{SnapIndex, SnapOptions};
use crate::transform::TransformModel;

/// Pixel radius within which a dragged pivot snaps to a bounds corner or the
/// bounds center.
pub const PIVOT_SNAP_THRESHOLD_PX: f64 = 8.0;

/// Floor for the pivot-relative resize scale factor. Near-singular drags
/// (pointer crossing the pivot) clamp here instead of erroring so the
/// interaction stays continuous.
pub const MIN_PIVOT_RESIZE_SCALE: f64 = 0.05;

// planar extents below this are treated as degenerate and the update is not
// applied
const MIN_RESIZE_EXTENT_PX: f64 = 1.0e-6;

/// Which handle a drag started on. Closed set, dispatched exhaustively.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DragHandle {
    Move,
    Resize(Corner),
    Rotate,
    Pivot,
}

/// Per-drag configuration captured at pointer-down.
#[derive(Debug, Copy, Clone, Default)]
pub struct DragConfig {
    /// Lock corner resizes to the bounds' aspect ratio at drag start.
    pub aspect_locked: bool,
    /// Snapping options applied to the pointer before any drag math.
    pub snap_options: SnapOptions,
}

/// One in-flight drag: the handle, the model snapshot and pointer position at
/// drag start, and the last applied model.
///
/// Ephemeral by design — created on pointer-down, consumed by
/// [DragSession::end] on pointer-up or cancel, never persisted. Holding a
/// session keeps the optional [InteractionLock] acquired; dropping it (on any
/// path) releases the lock.
pub struct DragSession<'a> {
    handle: DragHandle,
    config: DragConfig,
    start_model: TransformModel,
    start_pointer: GeoPoint,
    current: TransformModel,
    _lock: Option<LockGuard<'a>>,
}

impl<'a> DragSession<'a> {
    /// Begin a drag on `handle` at `pointer`. `lock` (when given) is acquired
    /// for the session's lifetime.
    pub fn begin(
        model: &TransformModel,
        handle: DragHandle,
        pointer: GeoPoint,
        config: DragConfig,
        lock: Option<&'a dyn InteractionLock>,
    ) -> Self {
        DragSession {
            handle,
            config,
            start_model: *model,
            start_pointer: pointer,
            current: *model,
            _lock: lock.map(LockGuard::acquire),
        }
    }

    #[inline]
    pub fn handle(&self) -> DragHandle {
        self.handle
    }

    /// The last applied model (the drag-start model until the first update).
    #[inline]
    pub fn model(&self) -> &TransformModel {
        &self.current
    }

    /// Apply a pointer-move. Returns the new model, or the previous one when
    /// the update would be degenerate (no operation here raises an error).
    ///
    /// `projection` must be the current frame's projection; snapping (when a
    /// [SnapIndex] is supplied) adjusts the query point before any drag math,
    /// for every handle kind alike.
    pub fn update(
        &mut self,
        pointer: GeoPoint,
        projection: &dyn PlaneProjection,
        snap: Option<&SnapIndex>,
    ) -> TransformModel {
        let mut query = projection.to_plane(pointer);
        if let Some(snap_index) = snap
            && let Some(snapped) = snap_index.query(query, &self.config.snap_options, projection)
        {
            query = snapped.point;
        }

        let updated = match self.handle {
            DragHandle::Move => self.update_move(query, projection),
            DragHandle::Resize(corner) => match self.start_model.pivot {
                None => self.update_resize(corner, query, projection),
                Some(pivot) => self.update_resize_about_pivot(corner, pivot, query, projection),
            },
            DragHandle::Rotate => self.update_rotate(query, projection),
            DragHandle::Pivot => self.update_pivot(query, projection),
        };

        if let Some(model) = updated {
            self.current = model;
        }
        self.current
    }

    /// End the drag, returning the last applied model. Pointer-up,
    /// pointer-cancel, and loss of capture all take this same path; any held
    /// interaction lock is released on drop.
    pub fn end(self) -> TransformModel {
        self.current
    }

    fn update_move(
        &self,
        query: Vector2,
        projection: &dyn PlaneProjection,
    ) -> Option<TransformModel> {
        let start = &self.start_model;
        let delta = query - projection.to_plane(self.start_pointer);

        let min = projection.to_plane(start.bounds.min) + delta;
        let max = projection.to_plane(start.bounds.max) + delta;
        let bounds = GeoRect::from_points(projection.to_geo(min), projection.to_geo(max));

        // a custom pivot rides along so the shape stays rigid under the drag
        let pivot = start.pivot.map(|p| {
            let moved = projection.to_plane(p) + delta;
            projection.to_geo(moved)
        });

        Some(TransformModel {
            bounds,
            rotation_deg: start.rotation_deg,
            pivot,
        })
    }

    fn update_resize(
        &self,
        corner: Corner,
        query: Vector2,
        projection: &dyn PlaneProjection,
    ) -> Option<TransformModel> {
        let start = &self.start_model;
        let center = projection.to_plane(start.bounds.center());

        // bring the pointer into the asset's unrotated frame, where the
        // stored bounds live
        let unrotated = query.rotate_about_deg(center, -start.rotation_deg);
        let opposite = projection.to_plane(start.bounds.corner(corner.opposite()));

        let mut offset = unrotated - opposite;
        if self.config.aspect_locked {
            let nw = projection.to_plane(start.bounds.corner(Corner::NorthWest));
            let se = projection.to_plane(start.bounds.corner(Corner::SouthEast));
            let width = (se.x - nw.x).abs();
            let height = (se.y - nw.y).abs();
            if height > MIN_RESIZE_EXTENT_PX && width > MIN_RESIZE_EXTENT_PX {
                // force the dragged corner onto the aspect diagonal, keeping
                // the vertical delta's sign
                offset.y = offset.y.signum() * offset.x.abs() * height / width;
            }
        }

        if offset.x.abs() < MIN_RESIZE_EXTENT_PX || offset.y.abs() < MIN_RESIZE_EXTENT_PX {
            // degenerate zero-size bounds, keep the previous model
            return None;
        }

        let dragged = opposite + offset;
        let bounds = GeoRect::from_points(projection.to_geo(dragged), projection.to_geo(opposite));

        Some(TransformModel {
            bounds,
            rotation_deg: start.rotation_deg,
            pivot: start.pivot,
        })
    }

    fn update_resize_about_pivot(
        &self,
        corner: Corner,
        pivot: GeoPoint,
        query: Vector2,
        projection: &dyn PlaneProjection,
    ) -> Option<TransformModel> {
        let start = &self.start_model;
        let pivot_plane = projection.to_plane(pivot);

        // scale factor is the projection of the pointer's offset from the
        // pivot onto the drag-start handle's offset from the pivot
        let handle_offset = start.visual_corner_plane(corner, projection) - pivot_plane;
        let pointer_offset = query - pivot_plane;
        let denom = handle_offset.length_squared();
        let scale = if denom < MIN_RESIZE_EXTENT_PX {
            1.0
        } else {
            (pointer_offset.dot(handle_offset) / denom).max(MIN_PIVOT_RESIZE_SCALE)
        };

        // scale the real-world size and the center's offset from the pivot
        let (width_m, height_m) = start.bounds.size_meters();
        let center_plane = projection.to_plane(start.bounds.center());
        let scaled_center = pivot_plane + (center_plane - pivot_plane).scale(scale);
        let bounds = GeoRect::from_center_and_size_meters(
            projection.to_geo(scaled_center),
            width_m * scale,
            height_m * scale,
        );

        Some(TransformModel {
            bounds,
            rotation_deg: start.rotation_deg,
            pivot: start.pivot,
        })
    }

    fn update_rotate(
        &self,
        query: Vector2,
        projection: &dyn PlaneProjection,
    ) -> Option<TransformModel> {
        let start = &self.start_model;
        let pivot_plane = start.pivot_plane(projection);
        let start_pointer_plane = projection.to_plane(self.start_pointer);

        let delta_rad = angle(pivot_plane, query) - angle(pivot_plane, start_pointer_plane);

        // rotation pivots the center too, never just the angle field, so the
        // stored bounds stay consistent with an off-center pivot
        let center_plane = projection.to_plane(start.bounds.center());
        let new_center = projection.to_geo(center_plane.rotate_about(pivot_plane, delta_rad));
        let bounds = GeoRect::from_center_and_size_deg(
            new_center,
            start.bounds.width_deg(),
            start.bounds.height_deg(),
        );

        Some(TransformModel {
            bounds,
            rotation_deg: start.rotation_deg + delta_rad.to_degrees(),
            pivot: start.pivot,
        })
    }

    fn update_pivot(
        &self,
        query: Vector2,
        projection: &dyn PlaneProjection,
    ) -> Option<TransformModel> {
        let start = &self.start_model;
        let threshold_sq = PIVOT_SNAP_THRESHOLD_PX * PIVOT_SNAP_THRESHOLD_PX;

        // snap targets in priority order: the four visual corners, then the
        // visual center
        let mut target = query;
        let candidates = Corner::ALL
            .into_iter()
            .map(|c| start.visual_corner_plane(c, projection))
            .chain(std::iter::once(start.visual_center_plane(projection)));
        for candidate in candidates {
            if dist_squared(candidate, query) <= threshold_sq {
                target = candidate;
                break;
            }
        }

        Some(TransformModel {
            bounds: start.bounds,
            rotation_deg: start.rotation_deg,
            pivot: Some(projection.to_geo(target)),
        })
    }
}

/// Gate coalescing pointer-move updates to at most one applied update per
/// rendering frame. Redundant intermediate events within a frame are dropped,
/// not queued.
///
/// # Examples
///
/// ```
/// # use overlay_placement::editor::FrameGate;
/// let mut gate = FrameGate::default();
/// assert!(gate.admit(1));
/// assert!(!gate.admit(1)); // same frame, dropped
/// assert!(gate.admit(2));
/// ```
#[derive(Debug, Default)]
pub struct FrameGate {
    last_applied: Option<u64>,
}

impl FrameGate {
    /// Returns true if an update for `frame` should be applied, recording it
    /// as applied.
    pub fn admit(&mut self, frame: u64) -> bool {
        if self.last_applied == Some(frame) {
            return false;
        }
        self.last_applied = Some(frame);
        true
    }
}
