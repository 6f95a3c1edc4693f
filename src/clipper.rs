use crate::bounds::BoundingBox;
use crate::builder::EdgeRecord;
use crate::event_queue::SiteId;
use crate::geometry::{Point, clip_line};
use crate::tessellation::Edge;
use rayon::prelude::*;
use tracing::trace;

/// Clips the unbounded diagram to `bounds`.
///
/// Edges outside the rectangle or reduced to a point are dropped. Output order follows input
/// order.
pub fn clip_edges(edges: &[EdgeRecord], bounds: &BoundingBox, eps: f64) -> Vec<Edge> {
    edges
        .par_iter()
        .filter_map(|edge| clip_edge(edge, bounds, eps))
        .collect()
}

/// Clips a single edge, keeping its original vertices where they lie inside the rectangle.
pub fn clip_edge(edge: &EdgeRecord, bounds: &BoundingBox, eps: f64) -> Option<Edge> {
    let (t0, t1) = edge.parameter_range();
    let Some((lo, hi)) = clip_line(edge.anchor, edge.direction, t0, t1, bounds, eps) else {
        trace!(left = edge.left, right = edge.right, "edge outside bounds");
        return None;
    };

    let ray = edge.supporting_ray();
    let start = match edge.start {
        Some(p) if lo == t0 => p,
        _ => ray.at(lo),
    };
    let end = match edge.end {
        Some(p) if hi == t1 => p,
        _ => ray.at(hi),
    };
    let start = bounds.snap(start, eps);
    let end = bounds.snap(end, eps);

    if start.distance(end) <= eps {
        trace!(left = edge.left, right = edge.right, "dropping degenerate edge");
        return None;
    }

    Some(Edge {
        start,
        end,
        left: Some(edge.left),
        right: Some(edge.right),
    })
}

/// A cut point on the outline with the owners of the clipped edges ending there.
struct Stop {
    position: f64,
    point: Point,
    owners: Vec<SiteId>,
}

/// Closes the cells along the rectangle.
///
/// The outline is cut at the corners and at every clipped edge endpoint on it, then walked
/// counterclockwise. A piece starting at a cut belongs to whichever owner of the edges ending
/// there is nearest its midpoint, a piece starting at a bare corner continues the previous
/// cell. The owner is reported as `left` since the cell lies left of a counterclockwise walk.
pub fn border_edges(edges: &[Edge], sites: &[Point], bounds: &BoundingBox, eps: f64) -> Vec<Edge> {
    if sites.is_empty() {
        return Vec::new();
    }

    let corners = bounds.corners().into_iter().map(|p| (p, Vec::new()));
    let endpoints = edges.iter().flat_map(|e| {
        let owners: Vec<SiteId> = e.left.into_iter().chain(e.right).collect();
        [(e.start, owners.clone()), (e.end, owners)]
    });
    let mut stops: Vec<Stop> = corners
        .chain(endpoints)
        .filter_map(|(point, owners)| {
            bounds
                .perimeter_position(point, eps)
                .map(|position| Stop { position, point, owners })
        })
        .collect();
    stops.sort_by(|a, b| a.position.total_cmp(&b.position));
    stops.dedup_by(|current, previous| {
        let same = (current.position - previous.position).abs() <= eps;
        if same {
            previous.owners.append(&mut current.owners);
        }
        same
    });

    let perimeter = bounds.perimeter();
    if stops.len() > 1 && stops.last().is_some_and(|s| perimeter - s.position <= eps) {
        if let Some(mut wrapped) = stops.pop() {
            stops[0].owners.append(&mut wrapped.owners);
        }
    }

    let n = stops.len();
    let piece = |i: usize| (stops[i].point, stops[(i + 1) % n].point);
    let mut owners: Vec<Option<SiteId>> = vec![None; n];
    match stops.iter().position(|s| !s.owners.is_empty()) {
        Some(first) => {
            let mut current = None;
            for k in 0..n {
                let i = (first + k) % n;
                if !stops[i].owners.is_empty() {
                    let (a, b) = piece(i);
                    current = nearest_of(&stops[i].owners, sites, a.midpoint(b));
                }
                owners[i] = current;
            }
        }
        None => {
            // No edge reaches the outline: one cell covers all of it.
            let (a, b) = piece(0);
            owners.fill(nearest_site(sites, a.midpoint(b)));
        }
    }

    (0..n)
        .filter_map(|i| {
            let (a, b) = piece(i);
            if a.distance(b) <= eps {
                return None;
            }
            Some(Edge {
                start: a,
                end: b,
                left: owners[i],
                right: None,
            })
        })
        .collect()
}

/// The candidate closest to `p`, the lowest index on ties.
fn nearest_of(candidates: &[SiteId], sites: &[Point], p: Point) -> Option<SiteId> {
    candidates
        .iter()
        .copied()
        .min_by(|&a, &b| sites[a].distance_sq(p).total_cmp(&sites[b].distance_sq(p)).then(a.cmp(&b)))
}

/// Index of the site closest to `p`, the lowest index on ties.
pub fn nearest_site(sites: &[Point], p: Point) -> Option<SiteId> {
    let mut best: Option<(SiteId, f64)> = None;
    for (i, s) in sites.iter().enumerate() {
        let d = s.distance_sq(p);
        if best.is_none_or(|(_, bd)| d < bd) {
            best = Some((i, d));
        }
    }
    best.map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::DiagramBuilder;

    const EPS: f64 = 1e-9;

    fn square() -> BoundingBox {
        BoundingBox::new([0.0, 0.0], [1000.0, 1000.0])
    }

    #[test]
    fn test_clip_full_line() {
        let sites = [Point::new(500.0, 700.0), Point::new(500.0, 300.0)];
        let mut builder = DiagramBuilder::new();
        builder.start_twin_edges(0, 1, &sites, Point::new(500.0, 500.0));
        let edges = builder.finish();

        let clipped = clip_edges(&edges, &square(), EPS);
        assert_eq!(clipped.len(), 1);
        let e = clipped[0];
        // Traced toward -x: starts on the right side.
        assert_eq!(e.start, Point::new(1000.0, 500.0));
        assert_eq!(e.end, Point::new(0.0, 500.0));
        assert_eq!((e.left, e.right), (Some(0), Some(1)));
    }

    #[test]
    fn test_clip_keeps_inner_vertex() {
        let sites = [Point::new(300.0, 300.0), Point::new(700.0, 300.0)];
        let mut builder = DiagramBuilder::new();
        builder.start_edge(0, 1, &sites, Point::new(500.0, 500.0));
        let clipped = clip_edges(&builder.finish(), &square(), EPS);
        assert_eq!(clipped.len(), 1);
        assert_eq!(clipped[0].start, Point::new(500.0, 500.0));
        assert_eq!(clipped[0].end, Point::new(500.0, 0.0));
    }

    #[test]
    fn test_clip_drops_outside_and_degenerate() {
        let sites = [Point::new(300.0, 300.0), Point::new(700.0, 300.0)];
        let mut builder = DiagramBuilder::new();
        // Segment above the box.
        let outside = builder.start_edge(0, 1, &sites, Point::new(500.0, 2000.0));
        builder.finish_edge(outside, Point::new(500.0, 1500.0));
        // Zero length.
        let point = builder.start_edge(0, 1, &sites, Point::new(500.0, 500.0));
        builder.finish_edge(point, Point::new(500.0, 500.0));
        // Ray pointing away from the box.
        builder.start_edge(0, 1, &sites, Point::new(500.0, -10.0));

        assert!(clip_edges(&builder.finish(), &square(), EPS).is_empty());
    }

    #[test]
    fn test_clip_edge_on_boundary_keeps_owners() {
        // Sites mirrored across the bottom side: the bisector is the side itself.
        let sites = [Point::new(500.0, 100.0), Point::new(500.0, -100.0)];
        let mut builder = DiagramBuilder::new();
        builder.start_twin_edges(0, 1, &sites, Point::new(500.0, 0.0));
        let clipped = clip_edges(&builder.finish(), &square(), EPS);
        assert_eq!(clipped.len(), 1);
        assert_eq!(clipped[0].left, Some(0));
        assert_eq!(clipped[0].right, Some(1));
        assert_eq!(clipped[0].start.y, 0.0);
        assert_eq!(clipped[0].end.y, 0.0);
    }

    #[test]
    fn test_border_edges_close_outline() {
        let sites = [Point::new(500.0, 700.0), Point::new(500.0, 300.0)];
        let inner = vec![Edge {
            start: Point::new(1000.0, 500.0),
            end: Point::new(0.0, 500.0),
            left: Some(0),
            right: Some(1),
        }];
        let border = border_edges(&inner, &sites, &square(), EPS);
        // Bottom, right (two pieces), top, left (two pieces).
        assert_eq!(border.len(), 6);

        let total: f64 = border.iter().map(|e| e.length()).sum();
        assert!((total - 4000.0).abs() < 1e-9);

        for e in &border {
            assert!(e.right.is_none());
            let mid = e.midpoint();
            let expected = if mid.y > 500.0 { 0 } else { 1 };
            assert_eq!(e.left, Some(expected), "{:?}", e);
        }
        // Pieces chain counterclockwise.
        for i in 0..border.len() {
            assert_eq!(border[i].end, border[(i + 1) % border.len()].start);
        }
    }

    #[test]
    fn test_border_owners_from_cut_points() {
        // Three cells meet on the bottom side at (500, 0).
        let sites = [Point::new(440.0, 80.0), Point::new(500.0, 100.0), Point::new(560.0, 80.0)];
        let vertex = Point::new(500.0, 0.0);
        let inner = vec![
            Edge {
                start: vertex,
                end: Point::new(1000.0 / 6.0, 1000.0),
                left: Some(0),
                right: Some(1),
            },
            Edge {
                start: vertex,
                end: Point::new(5000.0 / 6.0, 1000.0),
                left: Some(1),
                right: Some(2),
            },
        ];
        let border = border_edges(&inner, &sites, &square(), EPS);
        assert_eq!(border.len(), 7);
        assert_eq!(border[0].start, Point::new(0.0, 0.0));

        let owners: Vec<Option<SiteId>> = border.iter().map(|e| e.left).collect();
        let expected: Vec<Option<SiteId>> = [0, 2, 2, 2, 1, 0, 0].into_iter().map(Some).collect();
        assert_eq!(owners, expected);
        for e in &border {
            assert_eq!(e.left, nearest_site(&sites, e.midpoint()), "{:?}", e);
        }
    }

    #[test]
    fn test_border_single_cell_covers_outline() {
        // The bisector passes far outside the box.
        let sites = [Point::new(500.0, 500.0), Point::new(5000.0, 5000.0)];
        let border = border_edges(&[], &sites, &square(), EPS);
        assert_eq!(border.len(), 4);
        assert!(border.iter().all(|e| e.left == Some(0)));
    }

    #[test]
    fn test_nearest_site_ties_pick_lowest_index() {
        let sites = [Point::new(0.0, 0.0), Point::new(2.0, 0.0), Point::new(0.0, 0.0)];
        assert_eq!(nearest_site(&sites, Point::new(1.0, 0.0)), Some(0));
        assert_eq!(nearest_site(&sites, Point::new(1.5, 0.0)), Some(1));
        assert_eq!(nearest_site(&[], Point::new(1.5, 0.0)), None);
    }
}
