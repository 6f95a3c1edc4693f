use crate::event_queue::SiteId;
use crate::geometry::{Point, Ray, bisector};

/// Index of an edge record in the [`DiagramBuilder`].
pub type EdgeId = usize;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Role {
    /// A self-contained edge.
    Whole,
    /// First half of a site-event pair; takes over its twin's end when the sweep finishes.
    Primary(EdgeId),
    /// Second half of a site-event pair.
    Twin,
    /// Superseded before the sweep finished; not reported.
    Discarded,
}

/// A piece of the bisector of `left` and `right` in the unbounded diagram.
///
/// The edge runs along `direction` from `start` to `end`. A missing `start` extends the edge
/// to infinity against the direction, a missing `end` makes it an open ray.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeRecord {
    pub left: SiteId,
    pub right: SiteId,
    /// Point on the supporting line, parameter `0`.
    pub anchor: Point,
    /// Direction the edge was traced in while the sweep moved down.
    pub direction: Point,
    pub start: Option<Point>,
    pub end: Option<Point>,
    role: Role,
}

impl EdgeRecord {
    fn new(left: SiteId, right: SiteId, sites: &[Point], anchor: Point, start: Option<Point>, role: Role) -> Self {
        Self {
            left,
            right,
            anchor,
            direction: bisector(sites[left], sites[right]).direction,
            start,
            end: None,
            role,
        }
    }

    pub fn supporting_ray(&self) -> Ray {
        Ray {
            origin: self.anchor,
            direction: self.direction,
        }
    }

    /// Parameter interval along [`EdgeRecord::supporting_ray`], infinite where unbounded.
    pub fn parameter_range(&self) -> (f64, f64) {
        let ray = self.supporting_ray();
        let t0 = self.start.map_or(f64::NEG_INFINITY, |p| ray.parameter_of(p));
        let t1 = self.end.map_or(f64::INFINITY, |p| ray.parameter_of(p));
        (t0, t1)
    }

    pub fn is_bounded(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }
}

/// Records the edges of the unbounded diagram as the beachline creates and closes them.
#[derive(Debug, Default)]
pub struct DiagramBuilder {
    edges: Vec<EdgeRecord>,
}

impl DiagramBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            edges: Vec::with_capacity(capacity),
        }
    }

    /// Edge starting at a known vertex, e.g. a circle event center.
    pub fn start_edge(&mut self, left: SiteId, right: SiteId, sites: &[Point], at: Point) -> EdgeId {
        self.push(EdgeRecord::new(left, right, sites, at, Some(at), Role::Whole))
    }

    /// The two breakpoints born when an arc of `left` is split by a new arc of `right`.
    ///
    /// Both halves start at `at` and trace the same bisector in opposite directions; they are
    /// reported as one edge owned by (`left`, `right`).
    pub fn start_twin_edges(&mut self, left: SiteId, right: SiteId, sites: &[Point], at: Point) -> (EdgeId, EdgeId) {
        let twin = self.edges.len() + 1;
        let primary = self.push(EdgeRecord::new(left, right, sites, at, Some(at), Role::Primary(twin)));
        let twin = self.push(EdgeRecord::new(right, left, sites, at, Some(at), Role::Twin));
        (primary, twin)
    }

    /// Bisector of two sites born on the same sweep row: a full line through `anchor` with no
    /// start vertex.
    pub fn start_line(&mut self, left: SiteId, right: SiteId, sites: &[Point], anchor: Point) -> EdgeId {
        self.push(EdgeRecord::new(left, right, sites, anchor, None, Role::Whole))
    }

    /// Closes an edge at a diagram vertex.
    pub fn finish_edge(&mut self, id: EdgeId, at: Point) {
        let edge = &mut self.edges[id];
        debug_assert!(edge.end.is_none(), "edge {} finished twice", id);
        edge.end = Some(at);
    }

    /// Drops a line that turned out not to be part of the diagram, e.g. the bisector of two
    /// row sites once a third site lands between them.
    pub fn discard_edge(&mut self, id: EdgeId) {
        let edge = &mut self.edges[id];
        debug_assert!(edge.role == Role::Whole && edge.start.is_none(), "discarding bounded edge {}", id);
        edge.role = Role::Discarded;
    }

    pub fn edge(&self, id: EdgeId) -> &EdgeRecord {
        &self.edges[id]
    }

    /// Number of records, twin halves counted separately.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Merges twin halves and returns the edges of the unbounded diagram.
    pub fn finish(self) -> Vec<EdgeRecord> {
        let mut out = Vec::with_capacity(self.edges.len());
        for edge in &self.edges {
            match edge.role {
                Role::Whole => out.push(*edge),
                Role::Primary(twin) => {
                    let mut merged = *edge;
                    merged.start = self.edges[twin].end;
                    merged.role = Role::Whole;
                    out.push(merged);
                }
                Role::Twin | Role::Discarded => {}
            }
        }
        out
    }

    fn push(&mut self, edge: EdgeRecord) -> EdgeId {
        self.edges.push(edge);
        self.edges.len() - 1
    }
}
