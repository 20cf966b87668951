//! Reference floor: a regular cell grid with line-segment barriers.
//!
//! # Data layout
//!
//! Cells are numbered row-major from the floor's `origin` (lower-left
//! corner): `CellId(row * columns + col)`.  A per-cell `walkable` flag marks
//! the field; cells outside it still have ids but are excluded from
//! [`SpatialEnvironment::field_cells`].
//!
//! # Spatial index
//!
//! Barrier segments live in an R-tree (via `rstar`).  Nearest-barrier
//! queries are a single `nearest_neighbor` lookup; collision and sight-line
//! queries only test the segments whose envelopes intersect the swept box.
//!
//! The builder always adds the four perimeter walls, so every location on
//! the grid has a nearest barrier.

use rstar::{AABB, PointDistance, RTree, RTreeObject};
use rustc_hash::FxHashMap;

use ped_core::{AgentState, CellId, Vec2};

use crate::{BarrierProximity, Contact, Region, SpatialEnvironment, SpatialError, SpatialResult};

// ── R-tree barrier entry ──────────────────────────────────────────────────────

/// One barrier segment stored in the R-tree.
#[derive(Clone, Debug)]
struct BarrierEdge {
    from: Vec2,
    to:   Vec2,
}

impl BarrierEdge {
    /// Closest point of the segment to `p`.
    fn closest_point(&self, p: Vec2) -> Vec2 {
        let d = self.to - self.from;
        let len_sq = d.length_squared();
        if len_sq == 0.0 {
            return self.from;
        }
        let t = ((p - self.from).dot(d) / len_sq).clamp(0.0, 1.0);
        self.from + d * t
    }

    fn direction(&self) -> Vec2 {
        (self.to - self.from).normalized().unwrap_or(Vec2::new(1.0, 0.0))
    }
}

impl RTreeObject for BarrierEdge {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners([self.from.x, self.from.y], [self.to.x, self.to.y])
    }
}

impl PointDistance for BarrierEdge {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let p = Vec2::new(point[0], point[1]);
        (p - self.closest_point(p)).length_squared()
    }
}

// ── GridFloor ─────────────────────────────────────────────────────────────────

/// Regular grid floor with barrier segments and named per-cell data fields.
///
/// Do not construct directly; use [`GridFloorBuilder`].
pub struct GridFloor {
    origin:    Vec2,
    cell_size: f64,
    columns:   u32,
    rows:      u32,
    walkable:  Vec<bool>,
    barriers:  RTree<BarrierEdge>,
    fields:    FxHashMap<String, FxHashMap<CellId, f64>>,
}

impl GridFloor {
    // ── Dimensions ────────────────────────────────────────────────────────

    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    pub fn cell_count(&self) -> usize {
        self.walkable.len()
    }

    pub fn barrier_count(&self) -> usize {
        self.barriers.size()
    }

    // ── Cells ─────────────────────────────────────────────────────────────

    /// Id of the cell at (`col`, `row`), or `None` off the grid.
    pub fn cell(&self, col: u32, row: u32) -> Option<CellId> {
        (col < self.columns && row < self.rows).then(|| CellId(row * self.columns + col))
    }

    /// Centre point of `cell`.
    pub fn cell_center(&self, cell: CellId) -> Vec2 {
        let col = cell.0 % self.columns;
        let row = cell.0 / self.columns;
        Vec2::new(
            self.origin.x + (col as f64 + 0.5) * self.cell_size,
            self.origin.y + (row as f64 + 0.5) * self.cell_size,
        )
    }

    pub fn is_walkable(&self, cell: CellId) -> bool {
        self.walkable.get(cell.index()).copied().unwrap_or(false)
    }

    /// All walkable cells whose centres lie within `radius` of `center`.
    pub fn region_around(&self, center: Vec2, radius: f64) -> Region {
        (0..self.walkable.len() as u32)
            .map(CellId)
            .filter(|&c| self.walkable[c.index()] && self.cell_center(c).distance(center) <= radius)
            .collect()
    }

    // ── Data fields ───────────────────────────────────────────────────────

    /// Set the value of data field `field` at `cell`.
    pub fn set_field_value(&mut self, field: &str, cell: CellId, value: f64) -> SpatialResult<()> {
        if cell.index() >= self.walkable.len() {
            return Err(SpatialError::CellOutOfRange(cell));
        }
        self.fields.entry(field.to_owned()).or_default().insert(cell, value);
        Ok(())
    }

    // ── Geometry helpers ──────────────────────────────────────────────────

    /// Barrier segments whose bounding boxes intersect the box spanned by
    /// `a` and `b`, grown by `margin`.
    fn barriers_near(&self, a: Vec2, b: Vec2, margin: f64) -> impl Iterator<Item = &BarrierEdge> {
        let envelope = AABB::from_corners(
            [a.x.min(b.x) - margin, a.y.min(b.y) - margin],
            [a.x.max(b.x) + margin, a.y.max(b.y) + margin],
        );
        self.barriers.locate_in_envelope_intersecting(&envelope)
    }

    /// `true` when no barrier crosses the straight line from `from` to `to`.
    fn sight_line_clear(&self, from: Vec2, to: Vec2) -> bool {
        !self
            .barriers_near(from, to, 0.0)
            .any(|edge| segments_intersect(from, to, edge.from, edge.to))
    }
}

impl SpatialEnvironment for GridFloor {
    fn cell_at(&self, location: Vec2) -> Option<CellId> {
        let fx = (location.x - self.origin.x) / self.cell_size;
        let fy = (location.y - self.origin.y) / self.cell_size;
        if !(fx >= 0.0 && fy >= 0.0) {
            return None;
        }
        self.cell(fx.floor() as u32, fy.floor() as u32)
    }

    fn field_cells(&self) -> Vec<CellId> {
        (0..self.walkable.len() as u32)
            .map(CellId)
            .filter(|c| self.walkable[c.index()])
            .collect()
    }

    fn nearest_barrier(&self, location: Vec2) -> Option<BarrierProximity> {
        let edge = self.barriers.nearest_neighbor(&[location.x, location.y])?;
        let closest = edge.closest_point(location);
        let offset = location - closest;
        let distance = offset.length();
        // Standing on the barrier: fall back to the segment's left normal.
        let normal = offset.normalized().unwrap_or_else(|| edge.direction().perp());
        Some(BarrierProximity { distance, normal })
    }

    fn segment_collision(
        &self,
        old:            &AgentState,
        new:            &AgentState,
        half_body_size: f64,
        tolerance:      f64,
    ) -> Option<Contact> {
        let p0 = old.location;
        let motion = new.location - p0;

        let mut best: Option<(f64, &BarrierEdge)> = None;
        for edge in self.barriers_near(p0, new.location, half_body_size + tolerance) {
            if let Some(t) = edge_contact_time(edge, p0, motion, half_body_size, tolerance) {
                if best.is_none_or(|(b, _)| t < b) {
                    best = Some((t, edge));
                }
            }
        }

        let (t, edge) = best?;
        if t > 1.0 + tolerance {
            return None;
        }
        let t = t.min(1.0);
        let point = p0 + motion * t;
        let normal = (point - edge.closest_point(point))
            .normalized()
            .unwrap_or_else(|| edge.direction().perp());
        Some(Contact { point, time_fraction: t, normal })
    }

    fn field_of_view(&self, state: &AgentState, cosine_half_angle: f64, region: &Region) -> bool {
        region.sorted_cells().into_iter().any(|cell| {
            let center = self.cell_center(cell);
            let offset = center - state.location;
            match offset.normalized() {
                // Standing inside the region.
                None => true,
                Some(dir) => {
                    dir.dot(state.direction) >= cosine_half_angle
                        && self.sight_line_clear(state.location, center)
                }
            }
        })
    }

    fn visible_from(&self, location: Vec2, region: &Region) -> bool {
        region
            .sorted_cells()
            .into_iter()
            .any(|cell| self.sight_line_clear(location, self.cell_center(cell)))
    }

    fn field_value(&self, field: &str, cell: CellId) -> Option<f64> {
        self.fields.get(field)?.get(&cell).copied()
    }
}

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Earliest `t ≥ 0` at which `p0 + t·motion` comes within `radius` of the
/// segment, given that it starts farther away than `radius - tolerance`.
///
/// The `radius` neighbourhood of a segment is a capsule: two offset lines
/// plus a circle around each endpoint.  The first entry into the capsule is
/// the smallest entry time over those pieces.  A start already inside by at
/// most `tolerance` and moving deeper is in contact at `t = 0`.
fn edge_contact_time(
    edge:      &BarrierEdge,
    p0:        Vec2,
    motion:    Vec2,
    radius:    f64,
    tolerance: f64,
) -> Option<f64> {
    let axis = edge.to - edge.from;
    let length = axis.length();
    let skin = radius - tolerance;
    let mut best: Option<f64> = None;
    let mut consider = |t: f64| {
        if t >= 0.0 && best.is_none_or(|b| t < b) {
            best = Some(t);
        }
    };

    if let Some(u) = axis.normalized() {
        let n = u.perp();
        let s0 = (p0 - edge.from).dot(n);
        let ds = motion.dot(n);
        let t = if s0 > skin && ds < 0.0 {
            Some(((s0 - radius) / -ds).max(0.0))
        } else if s0 < -skin && ds > 0.0 {
            Some(((-radius - s0) / ds).max(0.0))
        } else {
            None
        };
        if let Some(t) = t {
            let along = (p0 + motion * t - edge.from).dot(u);
            if (0.0..=length).contains(&along) {
                consider(t);
            }
        }
    }

    for end in [edge.from, edge.to] {
        let w = p0 - end;
        let a = motion.length_squared();
        let b = 2.0 * w.dot(motion);
        let c = w.length_squared() - radius * radius;
        if a == 0.0 || w.length() <= skin {
            continue;
        }
        if c <= 0.0 {
            if b < 0.0 {
                consider(0.0);
            }
            continue;
        }
        let disc = b * b - 4.0 * a * c;
        if disc >= 0.0 {
            consider((-b - disc.sqrt()) / (2.0 * a));
        }
    }

    best
}

/// Closed-segment intersection test (touching counts).
fn segments_intersect(p1: Vec2, p2: Vec2, q1: Vec2, q2: Vec2) -> bool {
    let d1 = (p2 - p1).cross(q1 - p1);
    let d2 = (p2 - p1).cross(q2 - p1);
    let d3 = (q2 - q1).cross(p1 - q1);
    let d4 = (q2 - q1).cross(p2 - q1);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }

    let on_segment = |a: Vec2, b: Vec2, p: Vec2| {
        p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
    };
    (d1 == 0.0 && on_segment(p1, p2, q1))
        || (d2 == 0.0 && on_segment(p1, p2, q2))
        || (d3 == 0.0 && on_segment(q1, q2, p1))
        || (d4 == 0.0 && on_segment(q1, q2, p2))
}

// ── GridFloorBuilder ──────────────────────────────────────────────────────────

/// Construct a [`GridFloor`] incrementally, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use ped_core::Vec2;
/// use ped_spatial::{GridFloorBuilder, SpatialEnvironment};
///
/// let mut b = GridFloorBuilder::new(10.0, 6.0, 0.5);
/// b.add_wall(Vec2::new(5.0, 0.0), Vec2::new(5.0, 4.0));
/// let floor = b.build().unwrap();
/// assert_eq!(floor.cell_count(), 20 * 12);
/// assert_eq!(floor.barrier_count(), 5); // one wall + four perimeter walls
/// assert!(floor.nearest_barrier(Vec2::new(4.0, 2.0)).is_some());
/// ```
pub struct GridFloorBuilder {
    origin:    Vec2,
    width:     f64,
    height:    f64,
    cell_size: f64,
    walls:     Vec<(Vec2, Vec2)>,
    excluded:  Vec<(Vec2, Vec2)>,
}

impl GridFloorBuilder {
    /// A `width × height` floor with its lower-left corner at the origin.
    pub fn new(width: f64, height: f64, cell_size: f64) -> Self {
        Self {
            origin: Vec2::ZERO,
            width,
            height,
            cell_size,
            walls: Vec::new(),
            excluded: Vec::new(),
        }
    }

    pub fn origin(mut self, origin: Vec2) -> Self {
        self.origin = origin;
        self
    }

    /// Add an interior barrier segment.
    pub fn add_wall(&mut self, from: Vec2, to: Vec2) -> &mut Self {
        self.walls.push((from, to));
        self
    }

    /// Add the four sides of the axis-aligned rectangle `min`–`max` as
    /// barriers and remove its cells from the walkable field.
    pub fn add_obstacle(&mut self, min: Vec2, max: Vec2) -> &mut Self {
        let (a, b, c, d) = (min, Vec2::new(max.x, min.y), max, Vec2::new(min.x, max.y));
        self.walls.extend([(a, b), (b, c), (c, d), (d, a)]);
        self.excluded.push((min, max));
        self
    }

    /// Consume the builder and produce a [`GridFloor`].
    pub fn build(self) -> SpatialResult<GridFloor> {
        if !(self.cell_size > 0.0 && self.width >= self.cell_size && self.height >= self.cell_size) {
            return Err(SpatialError::InvalidGrid(format!(
                "{} x {} floor cannot hold cells of size {}",
                self.width, self.height, self.cell_size
            )));
        }
        let columns = (self.width / self.cell_size).ceil() as u32;
        let rows = (self.height / self.cell_size).ceil() as u32;

        let o = self.origin;
        let (w, h) = (columns as f64 * self.cell_size, rows as f64 * self.cell_size);
        let corners = [o, o + Vec2::new(w, 0.0), o + Vec2::new(w, h), o + Vec2::new(0.0, h)];

        let mut edges = Vec::with_capacity(self.walls.len() + 4);
        for (from, to) in self.walls {
            if from.distance(to) == 0.0 {
                return Err(SpatialError::DegenerateBarrier { from, to });
            }
            edges.push(BarrierEdge { from, to });
        }
        for i in 0..4 {
            edges.push(BarrierEdge { from: corners[i], to: corners[(i + 1) % 4] });
        }

        let mut floor = GridFloor {
            origin: o,
            cell_size: self.cell_size,
            columns,
            rows,
            walkable: vec![true; (columns * rows) as usize],
            barriers: RTree::bulk_load(edges),
            fields: FxHashMap::default(),
        };

        for (min, max) in &self.excluded {
            for i in 0..floor.walkable.len() {
                let c = floor.cell_center(CellId(i as u32));
                if c.x >= min.x && c.x <= max.x && c.y >= min.y && c.y <= max.y {
                    floor.walkable[i] = false;
                }
            }
        }

        Ok(floor)
    }
}
