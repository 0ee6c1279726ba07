//! Nearest-vertex/nearest-edge snapping against a reference polygon dataset
//! (building footprints or similar).
//!
//! The index holds polygon outlines for the current viewport, cached by a
//! coarse-rounded viewport key and refreshed through a debounced ticket
//! protocol driven by the host (the engine performs no I/O itself). Snapping
//! is purely advisory: a query either returns an adjusted point or nothing,
//! and a failed dataset fetch degrades to "no candidates" instead of failing
//! the editor.

use crate::core::math::{Vector2, dist_squared, line_seg_closest_point};
use crate::geo::{GeoPoint, GeoRect};
use crate::projection::PlaneProjection;
use static_aabb2d_index::{StaticAABB2DIndex, StaticAABB2DIndexBuilder};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Zoom below which snapping is inert (candidates would be sub-pixel).
pub const DEFAULT_MIN_EFFECTIVE_ZOOM: f64 = 17.0;

/// How long viewport movement must settle before a refresh is requested.
pub const DEFAULT_REFRESH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Coarse rounding applied to viewport coordinates for the cache key, in
/// thousandths of a degree. Small pans inside the same coarse cell reuse the
/// cached dataset.
const CACHE_KEY_SCALE: f64 = 1.0e3;

/// One closed polygon outline in geographic coordinates. The ring is
/// implicitly closed (last vertex connects back to the first).
#[derive(Debug, Clone)]
pub struct SnapPolygon {
    pub ring: Vec<GeoPoint>,
}

/// Which feature types a query may snap to and within what pixel distance.
#[derive(Debug, Copy, Clone)]
pub struct SnapOptions {
    pub vertices: bool,
    pub edges: bool,
    pub threshold_px: f64,
}

impl Default for SnapOptions {
    fn default() -> Self {
        SnapOptions {
            vertices: true,
            edges: true,
            threshold_px: 10.0,
        }
    }
}

/// What a snapped point landed on.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SnapKind {
    Vertex,
    Edge,
}

/// A successful snap: the adjusted planar point and what it snapped to.
#[derive(Debug, Copy, Clone)]
pub struct SnapResult {
    pub point: Vector2,
    pub kind: SnapKind,
}

/// Dataset fetch failure reported by the host. Logged and degraded, never
/// surfaced to the editor as an error.
#[derive(Debug, Error)]
#[error("snap dataset fetch failed: {0}")]
pub struct SnapFetchError(pub String);

/// A due refresh request handed to the host. The host fetches polygon
/// outlines covering [FetchTicket::viewport] and hands the result back to
/// [SnapIndex::install]. Tickets from superseded viewports are discarded on
/// install.
#[derive(Debug, Clone, Copy)]
pub struct FetchTicket {
    generation: u64,
    key: CacheKey,
    viewport: GeoRect,
}

impl FetchTicket {
    #[inline]
    pub fn viewport(&self) -> GeoRect {
        self.viewport
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CacheKey {
    min_lng: i64,
    min_lat: i64,
    max_lng: i64,
    max_lat: i64,
}

impl CacheKey {
    fn from_viewport(viewport: GeoRect) -> Self {
        let r = |v: f64| (v * CACHE_KEY_SCALE).round() as i64;
        CacheKey {
            min_lng: r(viewport.min.lng),
            min_lat: r(viewport.min.lat),
            max_lng: r(viewport.max.lng),
            max_lat: r(viewport.max.lat),
        }
    }
}

// (polygon index, segment start vertex index)
type SegmentRef = (usize, usize);

/// Spatial snapping index over a per-viewport polygon dataset.
pub struct SnapIndex {
    min_zoom: f64,
    debounce: Duration,
    zoom: f64,
    noted_key: Option<CacheKey>,
    cached_key: Option<CacheKey>,
    pending: Option<(CacheKey, GeoRect, Instant)>,
    generation: u64,
    polygons: Vec<SnapPolygon>,
    segments: Vec<SegmentRef>,
    aabb_index: Option<StaticAABB2DIndex<f64>>,
}

impl SnapIndex {
    pub fn new(min_zoom: f64, debounce: Duration) -> Self {
        SnapIndex {
            min_zoom,
            debounce,
            zoom: 0.0,
            noted_key: None,
            cached_key: None,
            pending: None,
            generation: 0,
            polygons: Vec::new(),
            segments: Vec::new(),
            aabb_index: None,
        }
    }

    /// True when the current zoom is high enough for snapping to make sense.
    /// Below the minimum zoom both refreshes and queries are inert and the UI
    /// can advertise snapping as unavailable.
    #[inline]
    pub fn is_effective(&self) -> bool {
        self.zoom >= self.min_zoom
    }

    #[inline]
    pub fn polygon_count(&self) -> usize {
        self.polygons.len()
    }

    /// Number of indexed outline segments across all polygons.
    #[inline]
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Record a viewport movement. A changed coarse viewport key schedules a
    /// debounced refresh; any pending or in-flight fetch for an older
    /// viewport is superseded (its result will be discarded on install).
    pub fn note_viewport(&mut self, viewport: GeoRect, zoom: f64, now: Instant) {
        self.zoom = zoom;

        let key = self.is_effective().then(|| CacheKey::from_viewport(viewport));
        if key == self.noted_key {
            // still on the same coarse cell, leave any scheduled or in-flight
            // fetch alone
            return;
        }
        self.noted_key = key;

        // movement supersedes whatever was scheduled or already handed out;
        // an in-flight ticket (pending taken by poll_fetch) must not be
        // installable after the viewport has moved on
        self.generation += 1;
        self.pending = None;

        let Some(key) = key else {
            return;
        };
        if self.cached_key == Some(key) {
            // moved back onto the cached region, no refresh needed
            return;
        }

        self.pending = Some((key, viewport, now + self.debounce));
    }

    /// Take the refresh request once its debounce window has elapsed. Returns
    /// `None` while movement has not settled or nothing is scheduled.
    pub fn poll_fetch(&mut self, now: Instant) -> Option<FetchTicket> {
        let (key, viewport, due) = self.pending?;
        if now < due {
            return None;
        }
        self.pending = None;
        Some(FetchTicket {
            generation: self.generation,
            key,
            viewport,
        })
    }

    /// Install a completed fetch. Results from superseded tickets are
    /// discarded, never merged; a failed fetch clears the candidate set and
    /// logs, leaving snapping silently unavailable for this viewport.
    pub fn install(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<SnapPolygon>, SnapFetchError>,
    ) {
        if ticket.generation != self.generation {
            log::debug!("discarding superseded snap dataset fetch");
            return;
        }

        self.cached_key = Some(ticket.key);
        match result {
            Ok(polygons) => {
                self.polygons = polygons;
                self.rebuild_index();
                log::debug!(
                    "snap dataset refreshed: {} polygons, {} segments",
                    self.polygons.len(),
                    self.segments.len()
                );
            }
            Err(err) => {
                log::warn!("{err}, snapping degraded to no candidates");
                self.polygons.clear();
                self.segments.clear();
                self.aabb_index = None;
            }
        }
    }

    fn rebuild_index(&mut self) {
        self.segments.clear();
        for (poly_i, polygon) in self.polygons.iter().enumerate() {
            let vertex_count = polygon.ring.len();
            if vertex_count < 2 {
                continue;
            }
            // for a two-vertex ring the implicit closing segment would
            // duplicate the only edge reversed
            let segment_count = if vertex_count == 2 { 1 } else { vertex_count };
            for start in 0..segment_count {
                self.segments.push((poly_i, start));
            }
        }

        if self.segments.is_empty() {
            self.aabb_index = None;
            return;
        }

        let mut builder = StaticAABB2DIndexBuilder::new(self.segments.len());
        for &(poly_i, start) in &self.segments {
            let ring = &self.polygons[poly_i].ring;
            let a = ring[start];
            let b = ring[(start + 1) % ring.len()];
            builder.add(
                a.lng.min(b.lng),
                a.lat.min(b.lat),
                a.lng.max(b.lng),
                a.lat.max(b.lat),
            );
        }

        self.aabb_index = builder.build().ok();
    }

    /// Find the snap target nearest to `point` (planar pixels at the frame
    /// given), if any qualifies within the pixel threshold.
    ///
    /// Priority rule: a vertex within the threshold always wins over an edge
    /// point, even when the edge point is closer; edges are only considered
    /// when no vertex qualifies. Returns `None` when nothing qualifies, the
    /// dataset is empty, or the zoom is below the effective minimum — the
    /// caller then keeps its unsnapped point.
    pub fn query(
        &self,
        point: Vector2,
        options: &SnapOptions,
        projection: &dyn PlaneProjection,
    ) -> Option<SnapResult> {
        if !self.is_effective() || (!options.vertices && !options.edges) {
            return None;
        }
        let aabb_index = self.aabb_index.as_ref()?;

        // convert the pixel threshold into a geographic search box around the
        // query point
        let t = options.threshold_px;
        let g0 = projection.to_geo(point - Vector2::new(t, t));
        let g1 = projection.to_geo(point + Vector2::new(t, t));
        let search = GeoRect::from_points(g0, g1);

        let candidates = aabb_index.query(
            search.min.lng,
            search.min.lat,
            search.max.lng,
            search.max.lat,
        );

        let mut best_vertex: Option<(f64, Vector2)> = None;
        let mut best_edge: Option<(f64, Vector2)> = None;
        for seg_i in candidates {
            let (poly_i, start) = self.segments[seg_i];
            let ring = &self.polygons[poly_i].ring;
            let a = projection.to_plane(ring[start]);
            let b = projection.to_plane(ring[(start + 1) % ring.len()]);

            if options.vertices {
                for v in [a, b] {
                    let d = dist_squared(v, point);
                    if best_vertex.is_none_or(|(best, _)| d < best) {
                        best_vertex = Some((d, v));
                    }
                }
            }

            if options.edges {
                let closest = line_seg_closest_point(a, b, point);
                let d = dist_squared(closest, point);
                if best_edge.is_none_or(|(best, _)| d < best) {
                    best_edge = Some((d, closest));
                }
            }
        }

        let threshold_sq = options.threshold_px * options.threshold_px;
        if let Some((d, v)) = best_vertex
            && d <= threshold_sq
        {
            return Some(SnapResult {
                point: v,
                kind: SnapKind::Vertex,
            });
        }
        if let Some((d, e)) = best_edge
            && d <= threshold_sq
        {
            return Some(SnapResult {
                point: e,
                kind: SnapKind::Edge,
            });
        }

        None
    }
}

impl Default for SnapIndex {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_EFFECTIVE_ZOOM, DEFAULT_REFRESH_DEBOUNCE)
    }
}
