use crate::builder::EdgeId;
use crate::event_queue::{EventId, SiteId};
use crate::geometry::{Point, breakpoint_x};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// Stable index of an arc in the beachline arena. Slots are never reused within one sweep.
pub type ArcId = usize;

// Tree shape does not affect the diagram, a fixed seed only keeps runs comparable.
const TREAP_SEED: u64 = 0x5eed_f047_u64;

/// One parabolic arc of the beachline.
#[derive(Clone, Debug)]
pub struct BeachArc {
    pub site: SiteId,
    /// Left neighbor on the beachline.
    pub prev: Option<ArcId>,
    /// Right neighbor on the beachline.
    pub next: Option<ArcId>,
    /// Edge traced by the breakpoint with `prev`.
    pub left_edge: Option<EdgeId>,
    /// Edge traced by the breakpoint with `next`.
    pub right_edge: Option<EdgeId>,
    /// The circle event predicted for this arc as the middle of a triple, if any.
    pub circle_event: Option<EventId>,
    alive: bool,
    parent: Option<ArcId>,
    left: Option<ArcId>,
    right: Option<ArcId>,
    priority: u64,
}

/// The ordered sequence of arcs at the current sweep position.
///
/// Arcs live in an arena and are linked twice: a doubly linked list for neighbor queries and a
/// treap (in-order = beachline order) for locating the arc above a new site. Breakpoints are
/// never stored, the tree is searched by computing them for the current sweep line.
pub struct Beachline {
    arcs: Vec<BeachArc>,
    root: Option<ArcId>,
    len: usize,
    rng: StdRng,
}

impl Default for Beachline {
    fn default() -> Self {
        Self::new()
    }
}

impl Beachline {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            arcs: Vec::with_capacity(capacity),
            root: None,
            len: 0,
            rng: StdRng::seed_from_u64(TREAP_SEED),
        }
    }

    /// Number of arcs currently on the beachline.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn arc(&self, id: ArcId) -> &BeachArc {
        &self.arcs[id]
    }

    pub fn arc_mut(&mut self, id: ArcId) -> &mut BeachArc {
        &mut self.arcs[id]
    }

    /// An arc handle is live until the arc is removed.
    pub fn is_alive(&self, id: ArcId) -> bool {
        self.arcs.get(id).is_some_and(|a| a.alive)
    }

    /// Immediate left and right neighbors.
    pub fn neighbors(&self, id: ArcId) -> (Option<ArcId>, Option<ArcId>) {
        let arc = &self.arcs[id];
        (arc.prev, arc.next)
    }

    /// Leftmost arc.
    pub fn first(&self) -> Option<ArcId> {
        let mut node = self.root?;
        while let Some(left) = self.arcs[node].left {
            node = left;
        }
        Some(node)
    }

    /// Arcs from left to right.
    pub fn iter(&self) -> impl Iterator<Item = ArcId> + '_ {
        std::iter::successors(self.first(), move |&id| self.arcs[id].next)
    }

    /// Sites of the arcs from left to right.
    pub fn sites(&self) -> Vec<SiteId> {
        self.iter().map(|id| self.arcs[id].site).collect()
    }

    /// Starts the beachline with a single arc. Must only be called when empty.
    pub fn insert_first(&mut self, site: SiteId) -> ArcId {
        debug_assert!(self.root.is_none(), "beachline already has arcs");
        let id = self.new_arc(site);
        self.root = Some(id);
        id
    }

    /// Inserts a new arc for `site` directly right of `at`.
    pub fn insert_after(&mut self, at: ArcId, site: SiteId) -> ArcId {
        let id = self.new_arc(site);

        let next = self.arcs[at].next;
        self.arcs[id].prev = Some(at);
        self.arcs[id].next = next;
        if let Some(n) = next {
            self.arcs[n].prev = Some(id);
        }
        self.arcs[at].next = Some(id);

        match self.arcs[at].right {
            None => {
                self.arcs[at].right = Some(id);
                self.arcs[id].parent = Some(at);
            }
            Some(mut node) => {
                while let Some(left) = self.arcs[node].left {
                    node = left;
                }
                self.arcs[node].left = Some(id);
                self.arcs[id].parent = Some(node);
            }
        }

        self.sift_up(id);
        id
    }

    /// Inserts a new arc for `site` directly left of `at`.
    pub fn insert_before(&mut self, at: ArcId, site: SiteId) -> ArcId {
        let id = self.new_arc(site);

        let prev = self.arcs[at].prev;
        self.arcs[id].next = Some(at);
        self.arcs[id].prev = prev;
        if let Some(p) = prev {
            self.arcs[p].next = Some(id);
        }
        self.arcs[at].prev = Some(id);

        match self.arcs[at].left {
            None => {
                self.arcs[at].left = Some(id);
                self.arcs[id].parent = Some(at);
            }
            Some(mut node) => {
                while let Some(right) = self.arcs[node].right {
                    node = right;
                }
                self.arcs[node].right = Some(id);
                self.arcs[id].parent = Some(node);
            }
        }

        self.sift_up(id);
        id
    }

    /// Splits `at` around a new arc for `site`: `at` keeps the left part, a copy of it is
    /// inserted as the right part and inherits `at`'s right edge.
    ///
    /// Returns `(new_arc, right_part)`.
    pub fn split(&mut self, at: ArcId, site: SiteId) -> (ArcId, ArcId) {
        let middle = self.insert_after(at, site);
        let right = self.insert_after(middle, self.arcs[at].site);
        self.arcs[right].right_edge = self.arcs[at].right_edge.take();
        (middle, right)
    }

    /// Unlinks the arc. Its handle stays valid but [`Beachline::is_alive`] turns false.
    pub fn remove(&mut self, id: ArcId) {
        debug_assert!(self.arcs[id].alive, "removing dead arc {}", id);

        // Rotate down until it is a leaf.
        loop {
            let child = match (self.arcs[id].left, self.arcs[id].right) {
                (None, None) => break,
                (Some(c), None) | (None, Some(c)) => c,
                (Some(l), Some(r)) => {
                    if self.arcs[l].priority > self.arcs[r].priority { l } else { r }
                }
            };
            self.rotate_up(child);
        }

        match self.arcs[id].parent {
            None => self.root = None,
            Some(p) => {
                if self.arcs[p].left == Some(id) {
                    self.arcs[p].left = None;
                } else {
                    self.arcs[p].right = None;
                }
            }
        }

        let prev = self.arcs[id].prev;
        let next = self.arcs[id].next;
        if let Some(p) = prev {
            self.arcs[p].next = next;
        }
        if let Some(n) = next {
            self.arcs[n].prev = prev;
        }

        let arc = &mut self.arcs[id];
        arc.alive = false;
        arc.parent = None;
        arc.prev = None;
        arc.next = None;
        self.len -= 1;
    }

    /// Finds the arc above `x` with the sweep line at `sweep_y`.
    ///
    /// A point exactly on a breakpoint resolves to the arc left of it.
    pub fn locate(&self, x: f64, sweep_y: f64, sites: &[Point], eps: f64) -> Option<ArcId> {
        let mut node = self.root?;
        loop {
            let arc = &self.arcs[node];
            let focus = sites[arc.site];

            if let Some(prev) = arc.prev {
                let bx = breakpoint_x(sites[self.arcs[prev].site], focus, sweep_y, eps);
                if x < bx {
                    match arc.left {
                        Some(left) => {
                            node = left;
                            continue;
                        }
                        None => return Some(node),
                    }
                }
            }

            if let Some(next) = arc.next {
                let bx = breakpoint_x(focus, sites[self.arcs[next].site], sweep_y, eps);
                if x > bx {
                    match arc.right {
                        Some(right) => {
                            node = right;
                            continue;
                        }
                        None => return Some(node),
                    }
                }
            }

            return Some(node);
        }
    }

    fn new_arc(&mut self, site: SiteId) -> ArcId {
        let id = self.arcs.len();
        let priority = self.rng.next_u64();
        self.arcs.push(BeachArc {
            site,
            prev: None,
            next: None,
            left_edge: None,
            right_edge: None,
            circle_event: None,
            alive: true,
            parent: None,
            left: None,
            right: None,
            priority,
        });
        self.len += 1;
        id
    }

    fn sift_up(&mut self, id: ArcId) {
        while let Some(parent) = self.arcs[id].parent {
            if self.arcs[parent].priority >= self.arcs[id].priority {
                break;
            }
            self.rotate_up(id);
        }
    }

    /// Rotates `x` above its parent, preserving in-order.
    fn rotate_up(&mut self, x: ArcId) {
        let Some(p) = self.arcs[x].parent else {
            return;
        };
        let grand = self.arcs[p].parent;

        if self.arcs[p].left == Some(x) {
            let inner = self.arcs[x].right;
            self.arcs[p].left = inner;
            if let Some(c) = inner {
                self.arcs[c].parent = Some(p);
            }
            self.arcs[x].right = Some(p);
        } else {
            let inner = self.arcs[x].left;
            self.arcs[p].right = inner;
            if let Some(c) = inner {
                self.arcs[c].parent = Some(p);
            }
            self.arcs[x].left = Some(p);
        }

        self.arcs[p].parent = Some(x);
        self.arcs[x].parent = grand;

        match grand {
            None => self.root = Some(x),
            Some(g) => {
                if self.arcs[g].left == Some(p) {
                    self.arcs[g].left = Some(x);
                } else {
                    self.arcs[g].right = Some(x);
                }
            }
        }
    }

    /// Checks tree links, heap order and that the in-order walk matches the neighbor list.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        fn walk(b: &Beachline, node: Option<ArcId>, parent: Option<ArcId>, out: &mut Vec<ArcId>) {
            let Some(n) = node else { return };
            let arc = &b.arcs[n];
            assert!(arc.alive);
            assert_eq!(arc.parent, parent, "parent link of {}", n);
            if let Some(p) = parent {
                assert!(b.arcs[p].priority >= arc.priority, "heap order at {}", n);
            }
            walk(b, arc.left, Some(n), out);
            out.push(n);
            walk(b, arc.right, Some(n), out);
        }

        let mut in_order = Vec::new();
        walk(self, self.root, None, &mut in_order);
        let listed: Vec<ArcId> = self.iter().collect();
        assert_eq!(in_order, listed);
        assert_eq!(listed.len(), self.len);
        for w in listed.windows(2) {
            assert_eq!(self.arcs[w[1]].prev, Some(w[0]));
        }
    }
}
