use crate::beachline::ArcId;
use crate::geometry::Point;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use tracing::trace;

/// Index of a site in the input slice.
pub type SiteId = usize;

/// Handle returned by [`EventQueue::push`], used to invalidate circle events.
pub type EventId = usize;

/// A sweep event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Event {
    /// The sweep line reaches a site.
    Site { site: SiteId, point: Point },
    /// The arc `arc` shrinks to a point at `center`. The sweep line reaches the event when it
    /// touches the bottom of the circle.
    Circle { arc: ArcId, center: Point, radius: f64 },
}

impl Event {
    /// Position of the sweep line (y) and the x tie-breaker at which the event becomes active.
    pub fn sweep_position(&self) -> Point {
        match *self {
            Event::Site { point, .. } => point,
            Event::Circle { center, radius, .. } => Point::new(center.x, center.y - radius),
        }
    }
}

#[derive(Debug)]
struct Queued {
    y: f64,
    x: f64,
    id: EventId,
    event: Event,
}

impl PartialEq for Queued {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Queued {}

impl PartialOrd for Queued {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Queued {
    // BinaryHeap pops the greatest element: highest y, then lowest x, then oldest.
    fn cmp(&self, other: &Self) -> Ordering {
        self.y
            .total_cmp(&other.y)
            .then_with(|| other.x.total_cmp(&self.x))
            .then_with(|| other.id.cmp(&self.id))
    }
}

/// Priority queue of site and circle events, ordered by `(y desc, x asc, sequence asc)`.
///
/// Circle events are invalidated in place and discarded lazily when they reach the head.
#[derive(Debug, Default)]
pub struct EventQueue {
    heap: BinaryHeap<Queued>,
    // Indexed by EventId; false once popped or invalidated.
    live: Vec<bool>,
    stale_skipped: usize,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(capacity),
            live: Vec::with_capacity(capacity),
            stale_skipped: 0,
        }
    }

    pub fn push(&mut self, event: Event) -> EventId {
        let id = self.live.len();
        let pos = event.sweep_position();
        self.live.push(true);
        self.heap.push(Queued { y: pos.y, x: pos.x, id, event });
        id
    }

    /// Removes and returns the next live event.
    pub fn pop_min(&mut self) -> Option<Event> {
        self.discard_stale();
        let queued = self.heap.pop()?;
        self.live[queued.id] = false;
        Some(queued.event)
    }

    /// Returns the next live event without removing it.
    pub fn peek_min(&mut self) -> Option<&Event> {
        self.discard_stale();
        self.heap.peek().map(|q| &q.event)
    }

    /// Marks an event as stale. Invalidating a popped or unknown event is a no-op.
    pub fn invalidate(&mut self, id: EventId) {
        if let Some(live) = self.live.get_mut(id) {
            *live = false;
        }
    }

    pub fn is_live(&self, id: EventId) -> bool {
        self.live.get(id).copied().unwrap_or(false)
    }

    pub fn is_empty(&mut self) -> bool {
        self.peek_min().is_none()
    }

    /// Total number of events ever pushed.
    pub fn pushed(&self) -> usize {
        self.live.len()
    }

    /// Number of invalidated events discarded so far.
    pub fn stale_skipped(&self) -> usize {
        self.stale_skipped
    }

    fn discard_stale(&mut self) {
        while let Some(head) = self.heap.peek() {
            let id = head.id;
            if self.live[id] {
                break;
            }
            trace!(id, "skipping stale event");
            self.heap.pop();
            self.stale_skipped += 1;
        }
    }
}
