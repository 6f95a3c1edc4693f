use crate::beachline::{ArcId, Beachline};
use crate::builder::{DiagramBuilder, EdgeId, EdgeRecord};
use crate::event_queue::{Event, EventQueue, SiteId};
use crate::geometry::{Point, bisector_at_y, breakpoint_x, circumcircle, orientation, parabola_y};
use tracing::{debug, trace};

/// Counters collected during one sweep.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SweepStats {
    pub site_events: usize,
    pub circle_events: usize,
    pub duplicate_sites: usize,
    pub stale_events: usize,
}

/// Fortune's sweep over one set of sites.
///
/// The sweep line moves from the topmost site downward. Each call owns its queue, beachline
/// and builder, nothing is shared between sweeps.
pub struct Sweep<'a> {
    sites: &'a [Point],
    eps: f64,
    queue: EventQueue,
    beachline: Beachline,
    builder: DiagramBuilder,
    last_site: Option<Point>,
    stats: SweepStats,
}

impl<'a> Sweep<'a> {
    pub fn new(sites: &'a [Point], eps: f64) -> Self {
        let n = sites.len();
        Self {
            sites,
            eps,
            queue: EventQueue::with_capacity(3 * n),
            beachline: Beachline::with_capacity(2 * n),
            builder: DiagramBuilder::with_capacity(3 * n),
            last_site: None,
            stats: SweepStats::default(),
        }
    }

    /// Processes all events and returns the edges of the unbounded diagram.
    pub fn run(mut self) -> (Vec<EdgeRecord>, SweepStats) {
        for (site, &point) in self.sites.iter().enumerate() {
            self.queue.push(Event::Site { site, point });
        }

        while let Some(event) = self.queue.pop_min() {
            let sweep_y = event.sweep_position().y;
            match event {
                Event::Site { site, .. } => {
                    self.stats.site_events += 1;
                    self.insert_site(site, sweep_y);
                }
                Event::Circle { arc, center, .. } => {
                    self.stats.circle_events += 1;
                    self.remove_arc(arc, center, sweep_y);
                }
            }
        }

        self.stats.stale_events = self.queue.stale_skipped();
        debug!(
            sites = self.sites.len(),
            site_events = self.stats.site_events,
            circle_events = self.stats.circle_events,
            stale_events = self.stats.stale_events,
            edge_records = self.builder.len(),
            "sweep finished"
        );
        (self.builder.finish(), self.stats)
    }

    /// Adds the arc of `site` to the beachline with the sweep line at `sweep_y`.
    pub fn insert_site(&mut self, site: SiteId, sweep_y: f64) {
        let point = self.sites[site];

        // Coincident sites pop back to back; only the first one gets an arc.
        if self.last_site.is_some_and(|last| last.approx_eq(point, self.eps)) {
            trace!(site, "skipping duplicate site");
            self.stats.duplicate_sites += 1;
            return;
        }
        self.last_site = Some(point);

        let Some(arc) = self.beachline.locate(point.x, sweep_y, self.sites, self.eps) else {
            trace!(site, "first arc");
            self.beachline.insert_first(site);
            return;
        };

        let arc_focus = self.focus(arc);
        if arc_focus.approx_eq(point, self.eps) {
            trace!(site, "skipping duplicate of located arc");
            self.stats.duplicate_sites += 1;
            return;
        }
        if (arc_focus.y - sweep_y).abs() <= self.eps {
            self.insert_on_row(arc, site, sweep_y);
            return;
        }

        let (prev, next) = self.beachline.neighbors(arc);
        if let Some(next) = next {
            let bx = breakpoint_x(arc_focus, self.focus(next), sweep_y, self.eps);
            if (point.x - bx).abs() <= self.eps {
                self.insert_at_breakpoint(arc, next, site, sweep_y);
                return;
            }
        }
        if let Some(prev) = prev {
            let bx = breakpoint_x(self.focus(prev), arc_focus, sweep_y, self.eps);
            if (point.x - bx).abs() <= self.eps {
                self.insert_at_breakpoint(prev, arc, site, sweep_y);
                return;
            }
        }

        self.split_arc(arc, site, sweep_y);
    }

    /// Handles the circle event of `arc`: closes its two edges at `center`, removes it and
    /// starts the edge between its former neighbors.
    pub fn remove_arc(&mut self, arc: ArcId, center: Point, sweep_y: f64) {
        debug_assert!(self.beachline.is_alive(arc), "circle event for removed arc {}", arc);
        if !self.beachline.is_alive(arc) {
            return;
        }
        let (Some(left), Some(right)) = self.beachline.neighbors(arc) else {
            debug_assert!(false, "circle event for boundary arc {}", arc);
            return;
        };
        trace!(arc, x = center.x, y = center.y, "circle event");

        self.beachline.arc_mut(arc).circle_event = None;
        let (left_edge, right_edge) = {
            let a = self.beachline.arc(arc);
            (a.left_edge, a.right_edge)
        };
        if let Some(e) = left_edge {
            self.builder.finish_edge(e, center);
        }
        if let Some(e) = right_edge {
            self.builder.finish_edge(e, center);
        }

        self.invalidate_circle_event(left);
        self.invalidate_circle_event(right);
        self.beachline.remove(arc);

        let (ls, rs) = (self.site_of(left), self.site_of(right));
        let edge = self.builder.start_edge(ls, rs, self.sites, center);
        self.beachline.arc_mut(left).right_edge = Some(edge);
        self.beachline.arc_mut(right).left_edge = Some(edge);

        self.check_circle_event(left, sweep_y);
        self.check_circle_event(right, sweep_y);
    }

    /// Immediate left and right arcs of `arc`.
    pub fn neighbors(&self, arc: ArcId) -> (Option<ArcId>, Option<ArcId>) {
        self.beachline.neighbors(arc)
    }

    /// General case: the new arc splits `arc` in two.
    fn split_arc(&mut self, arc: ArcId, site: SiteId, sweep_y: f64) {
        let point = self.sites[site];
        let arc_site = self.site_of(arc);
        let touch = match parabola_y(self.sites[arc_site], sweep_y, point.x, self.eps) {
            Some(y) => Point::new(point.x, y),
            None => self.sites[arc_site].midpoint(point),
        };
        trace!(site, split = arc_site, x = touch.x, y = touch.y, "split arc");

        self.invalidate_circle_event(arc);
        let (middle, right) = self.beachline.split(arc, site);
        let (primary, twin) = self.builder.start_twin_edges(arc_site, site, self.sites, touch);

        self.beachline.arc_mut(arc).right_edge = Some(primary);
        self.beachline.arc_mut(middle).left_edge = Some(primary);
        self.beachline.arc_mut(middle).right_edge = Some(twin);
        self.beachline.arc_mut(right).left_edge = Some(twin);

        self.check_circle_event(arc, sweep_y);
        self.check_circle_event(right, sweep_y);
    }

    /// The new site lies exactly below the breakpoint of `left` and `right`: the breakpoint's
    /// edge ends at a vertex and two edges start there.
    fn insert_at_breakpoint(&mut self, left: ArcId, right: ArcId, site: SiteId, sweep_y: f64) {
        let point = self.sites[site];
        let (ls, rs) = (self.site_of(left), self.site_of(right));
        let vertex = match circumcircle(self.sites[ls], self.sites[rs], point, self.eps) {
            Some((center, _)) => center,
            None => {
                let y = parabola_y(self.sites[ls], sweep_y, point.x, self.eps).unwrap_or(point.y);
                Point::new(point.x, y)
            }
        };
        trace!(site, left = ls, right = rs, "site below breakpoint");

        self.invalidate_circle_event(left);
        self.invalidate_circle_event(right);
        if let Some(e) = self.beachline.arc(left).right_edge {
            self.builder.finish_edge(e, vertex);
        }

        let middle = self.beachline.insert_after(left, site);
        let e_left = self.builder.start_edge(ls, site, self.sites, vertex);
        let e_right = self.builder.start_edge(site, rs, self.sites, vertex);

        self.beachline.arc_mut(left).right_edge = Some(e_left);
        self.beachline.arc_mut(middle).left_edge = Some(e_left);
        self.beachline.arc_mut(middle).right_edge = Some(e_right);
        self.beachline.arc_mut(right).left_edge = Some(e_right);

        self.check_circle_event(left, sweep_y);
        self.check_circle_event(right, sweep_y);
    }

    /// Sites sharing the sweep row with `arc`'s site (only possible before the sweep line has
    /// left the topmost row). Their bisectors are vertical lines without a start vertex.
    ///
    /// Sites within `eps` of the row do not pop in x order, so the new arc may land between two
    /// row arcs. Their bisector then never becomes part of the diagram and is replaced by the two
    /// lines through the new arc.
    fn insert_on_row(&mut self, arc: ArcId, site: SiteId, sweep_y: f64) {
        let point = self.sites[site];
        let new = if point.x > self.focus(arc).x {
            self.beachline.insert_after(arc, site)
        } else {
            self.beachline.insert_before(arc, site)
        };
        let (left, right) = self.beachline.neighbors(new);
        trace!(site, beside = self.site_of(arc), "site on the same row");

        let separated = left.and_then(|l| self.beachline.arc(l).right_edge);
        if let Some(e) = separated {
            trace!(edge = e, "row bisector superseded");
            self.builder.discard_edge(e);
        }

        if let Some(left) = left {
            let edge = self.start_row_line(self.site_of(left), site, sweep_y);
            self.beachline.arc_mut(left).right_edge = Some(edge);
            self.beachline.arc_mut(new).left_edge = Some(edge);
            self.check_circle_event(left, sweep_y);
        }
        if let Some(right) = right {
            let edge = self.start_row_line(site, self.site_of(right), sweep_y);
            self.beachline.arc_mut(new).right_edge = Some(edge);
            self.beachline.arc_mut(right).left_edge = Some(edge);
            self.check_circle_event(right, sweep_y);
        }
        self.check_circle_event(new, sweep_y);
    }

    fn start_row_line(&mut self, left: SiteId, right: SiteId, sweep_y: f64) -> EdgeId {
        let (a, b) = (self.sites[left], self.sites[right]);
        let anchor = bisector_at_y(a, b, sweep_y, self.eps).unwrap_or_else(|| a.midpoint(b));
        self.builder.start_line(left, right, self.sites, anchor)
    }

    /// Schedules the circle event of `arc` if its breakpoints converge below the sweep line.
    fn check_circle_event(&mut self, arc: ArcId, sweep_y: f64) {
        self.invalidate_circle_event(arc);
        let (Some(left), Some(right)) = self.beachline.neighbors(arc) else {
            return;
        };
        let (ls, ms, rs) = (self.site_of(left), self.site_of(arc), self.site_of(right));
        if ls == rs {
            return;
        }
        let (a, b, c) = (self.sites[ls], self.sites[ms], self.sites[rs]);

        // Breakpoints only converge for a clockwise triple.
        if orientation(a, b, c) >= -self.eps {
            return;
        }
        let Some((center, radius)) = circumcircle(a, b, c, self.eps) else {
            return;
        };
        if center.y - radius > sweep_y + self.eps {
            return;
        }

        let id = self.queue.push(Event::Circle { arc, center, radius });
        self.beachline.arc_mut(arc).circle_event = Some(id);
    }

    fn invalidate_circle_event(&mut self, arc: ArcId) {
        if let Some(id) = self.beachline.arc_mut(arc).circle_event.take() {
            self.queue.invalidate(id);
        }
    }

    fn site_of(&self, arc: ArcId) -> SiteId {
        self.beachline.arc(arc).site
    }

    fn focus(&self, arc: ArcId) -> Point {
        self.sites[self.site_of(arc)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn run(sites: &[Point]) -> Vec<EdgeRecord> {
        Sweep::new(sites, EPS).run().0
    }

    #[test]
    fn test_no_sites() {
        assert!(run(&[]).is_empty());
    }

    #[test]
    fn test_single_site() {
        assert!(run(&[Point::new(1.0, 1.0)]).is_empty());
    }

    #[test]
    fn test_two_sites_one_line() {
        let edges = run(&[Point::new(500.0, 700.0), Point::new(500.0, 300.0)]);
        assert_eq!(edges.len(), 1);
        let e = edges[0];
        assert_eq!((e.left, e.right), (0, 1));
        assert!(e.start.is_none() && e.end.is_none());
        assert!((e.anchor.y - 500.0).abs() < 1e-9);
        assert_eq!(e.direction.y, 0.0);
    }

    #[test]
    fn test_row_sites() {
        let sites = [Point::new(0.0, 5.0), Point::new(10.0, 5.0), Point::new(20.0, 5.0)];
        let edges = run(&sites);
        assert_eq!(edges.len(), 2);
        assert!((edges[0].anchor.x - 5.0).abs() < 1e-9);
        assert!((edges[1].anchor.x - 15.0).abs() < 1e-9);
        for e in &edges {
            assert!(e.start.is_none() && e.end.is_none());
        }
    }

    #[test]
    fn test_row_sites_out_of_x_order() {
        // Within eps of one row, popped by y: the last site lands between the first two.
        let sites = [Point::new(0.0, 5.0), Point::new(20.0, 5.0 - 1e-11), Point::new(8.0, 5.0 - 2e-11)];
        let mut sweep = Sweep::new(&sites, EPS);
        for (site, &point) in sites.iter().enumerate() {
            sweep.queue.push(Event::Site { site, point });
        }
        while let Some(event) = sweep.queue.pop_min() {
            let y = event.sweep_position().y;
            match event {
                Event::Site { site, .. } => sweep.insert_site(site, y),
                Event::Circle { arc, center, .. } => sweep.remove_arc(arc, center, y),
            }
            sweep.beachline.assert_consistent();
        }
        assert_eq!(sweep.beachline.sites(), vec![0, 2, 1]);

        let edges = sweep.builder.finish();
        assert_eq!(edges.len(), 2);
        let mut pairs: Vec<(usize, usize)> = edges.iter().map(|e| (e.left, e.right)).collect();
        pairs.sort();
        assert_eq!(pairs, vec![(0, 2), (2, 1)]);
        for e in &edges {
            let expected = (sites[e.left].x + sites[e.right].x) / 2.0;
            assert!((e.anchor.x - expected).abs() < 1e-6, "anchor {:?}", e.anchor);
        }
    }

    #[test]
    fn test_near_duplicate_of_located_arc() {
        // The second copy is not consumed right after the first one.
        let sites = [
            Point::new(100.0, 500.0 + 2e-10),
            Point::new(700.0, 500.0 + 1e-10),
            Point::new(100.0 + 1e-10, 500.0),
            Point::new(300.0, 100.0),
        ];
        let (edges, stats) = Sweep::new(&sites, EPS).run();
        assert_eq!(stats.duplicate_sites, 1);
        assert!(edges.iter().all(|e| e.left != 2 && e.right != 2));
    }

    #[test]
    fn test_triangle_vertex() {
        let sites = [Point::new(0.0, 1.0), Point::new(-1.0, 0.0), Point::new(1.0, 0.0)];
        let (edges, stats) = Sweep::new(&sites, EPS).run();
        assert_eq!(stats.circle_events, 1);
        assert_eq!(edges.len(), 3);

        let vertex = Point::new(0.0, 0.0);
        for e in &edges {
            let touches = e.start.is_some_and(|p| p.approx_eq(vertex, 1e-9))
                || e.end.is_some_and(|p| p.approx_eq(vertex, 1e-9));
            assert!(touches, "{:?}", e);
        }
    }

    #[test]
    fn test_duplicates_are_skipped() {
        let sites = [Point::new(1.0, 1.0), Point::new(1.0, 1.0), Point::new(3.0, 0.0)];
        let (edges, stats) = Sweep::new(&sites, EPS).run();
        assert_eq!(stats.duplicate_sites, 1);
        assert_eq!(edges.len(), 1);
    }

    #[test]
    fn test_site_below_breakpoint() {
        // The third site lies exactly under the breakpoint of the first two at its sweep row.
        let sites = [Point::new(-1.0, 2.0), Point::new(1.0, 2.0), Point::new(0.0, 0.0)];
        let edges = run(&sites);
        assert_eq!(edges.len(), 3);
        let ends_at_vertex = edges
            .iter()
            .filter(|e| e.end.is_some() || e.start.is_some())
            .count();
        assert_eq!(ends_at_vertex, 3);
    }

    #[test]
    fn test_beachline_stays_consistent() {
        let sites: Vec<Point> = (0..40)
            .map(|i| {
                let t = i as f64 * 0.7;
                Point::new(500.0 + 400.0 * t.cos() * (i as f64 / 40.0), 500.0 + 300.0 * (t * 1.3).sin())
            })
            .collect();
        let mut sweep = Sweep::new(&sites, EPS);
        for (site, &point) in sites.iter().enumerate() {
            sweep.queue.push(Event::Site { site, point });
        }
        while let Some(event) = sweep.queue.pop_min() {
            let y = event.sweep_position().y;
            match event {
                Event::Site { site, .. } => sweep.insert_site(site, y),
                Event::Circle { arc, center, .. } => sweep.remove_arc(arc, center, y),
            }
            sweep.beachline.assert_consistent();
        }
        // Hull sites keep their arcs after the last event.
        assert!(!sweep.beachline.is_empty());
    }
}
