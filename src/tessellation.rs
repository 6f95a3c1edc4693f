use crate::bounds::BoundingBox;
use crate::clipper::{border_edges, clip_edges};
use crate::error::TessellationError;
use crate::event_queue::SiteId;
use crate::geometry::{DEFAULT_EPSILON, Point};
use crate::sweep::Sweep;
use rand::prelude::*;
use rand::rngs::StdRng;
use rayon::prelude::*;
use tracing::debug;

/// Whether the clipper closes boundary cells with edges along the rectangle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BorderEdgeGeneration {
    /// Only internal edges; cells touching the boundary stay open.
    #[default]
    DoNotMakeBorderEdges,
    /// Additionally emit counterclockwise pieces of the outline, one owner each.
    MakeBorderEdges,
}

/// Options for one tessellation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TessellationConfig {
    /// Tolerance for every coincidence test of the sweep and the clipper.
    pub epsilon: f64,
    pub border: BorderEdgeGeneration,
}

impl Default for TessellationConfig {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
            border: BorderEdgeGeneration::default(),
        }
    }
}

impl TessellationConfig {
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_border(mut self, border: BorderEdgeGeneration) -> Self {
        self.border = border;
        self
    }

    pub fn validate(&self) -> Result<(), TessellationError> {
        if !self.epsilon.is_finite() || self.epsilon < 0.0 {
            return Err(TessellationError::InvalidEpsilon(self.epsilon));
        }
        Ok(())
    }
}

/// An input point with its insertion index.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Site {
    pub id: SiteId,
    pub position: Point,
}

/// A clipped edge of the diagram, separating the cells of `left` and `right`.
///
/// Internal edges always carry both owners. Border edges carry only `left`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge {
    pub start: Point,
    pub end: Point,
    pub left: Option<SiteId>,
    pub right: Option<SiteId>,
}

impl Edge {
    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }

    pub fn midpoint(&self) -> Point {
        self.start.midpoint(self.end)
    }

    /// Synthesized along the rectangle by [`BorderEdgeGeneration::MakeBorderEdges`].
    pub fn is_border(&self) -> bool {
        self.left.is_none() || self.right.is_none()
    }

    pub fn touches(&self, site: SiteId) -> bool {
        self.left == Some(site) || self.right == Some(site)
    }

    /// The owner on the other side of `site`, if `site` owns this edge.
    pub fn other(&self, site: SiteId) -> Option<SiteId> {
        if self.left == Some(site) {
            self.right
        } else if self.right == Some(site) {
            self.left
        } else {
            None
        }
    }
}

/// Result of one tessellation: the sites and their clipped edges.
///
/// Internal edges come first, border edges (if requested) after them.
#[derive(Clone, Debug)]
pub struct Diagram {
    bounds: BoundingBox,
    sites: Vec<Site>,
    edges: Vec<Edge>,
    internal: usize,
}

impl Diagram {
    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn into_edges(self) -> Vec<Edge> {
        self.edges
    }

    pub fn internal_edges(&self) -> &[Edge] {
        &self.edges[..self.internal]
    }

    pub fn border_edges(&self) -> &[Edge] {
        &self.edges[self.internal..]
    }

    /// Edges owned by `site`, internal and border.
    pub fn edges_of(&self, site: SiteId) -> impl Iterator<Item = &Edge> + '_ {
        self.edges.iter().filter(move |e| e.touches(site))
    }

    /// Sites sharing an internal edge with `site`, sorted and without repeats.
    pub fn neighbors(&self, site: SiteId) -> Vec<SiteId> {
        let mut out: Vec<SiteId> = self
            .internal_edges()
            .iter()
            .filter_map(|e| e.other(site))
            .collect();
        out.sort_unstable();
        out.dedup();
        out
    }
}

/// Computes the Voronoi edges of `sites` clipped to `bounds`.
///
/// # Example
///
/// ```
/// use vorosweep::{tessellate, BorderEdgeGeneration, BoundingBox, Point};
///
/// let sites = [Point::new(500.0, 700.0), Point::new(500.0, 300.0)];
/// let bounds = BoundingBox::new([0.0, 0.0], [1000.0, 1000.0]);
/// let edges = tessellate(&sites, bounds, BorderEdgeGeneration::DoNotMakeBorderEdges).unwrap();
/// assert_eq!(edges.len(), 1);
/// ```
pub fn tessellate(
    sites: &[Point],
    bounds: BoundingBox,
    border: BorderEdgeGeneration,
) -> Result<Vec<Edge>, TessellationError> {
    let config = TessellationConfig::default().with_border(border);
    tessellate_with(sites, bounds, &config).map(Diagram::into_edges)
}

/// Like [`tessellate`] with explicit options, returning the full [`Diagram`].
pub fn tessellate_with(
    sites: &[Point],
    bounds: BoundingBox,
    config: &TessellationConfig,
) -> Result<Diagram, TessellationError> {
    bounds.validate()?;
    config.validate()?;
    if let Some((index, p)) = sites.iter().enumerate().find(|(_, p)| !p.is_finite()) {
        return Err(TessellationError::NonFiniteSite { index, x: p.x, y: p.y });
    }

    let eps = config.epsilon;
    let diagram_sites: Vec<Site> = sites
        .iter()
        .enumerate()
        .map(|(id, &position)| Site { id, position })
        .collect();

    debug!(sites = sites.len(), border = ?config.border, "tessellating");
    let (swept, stats) = Sweep::new(sites, eps).run();

    // A single cell has no separators, however many copies of its site were given.
    if stats.site_events - stats.duplicate_sites < 2 {
        debug!(duplicates = stats.duplicate_sites, "single cell");
        return Ok(Diagram {
            bounds,
            sites: diagram_sites,
            edges: Vec::new(),
            internal: 0,
        });
    }

    let mut edges = clip_edges(&swept, &bounds, eps);
    let internal = edges.len();

    if config.border == BorderEdgeGeneration::MakeBorderEdges {
        let border = border_edges(&edges, sites, &bounds, eps);
        edges.extend(border);
    }
    debug!(
        swept = swept.len(),
        duplicates = stats.duplicate_sites,
        internal,
        border = edges.len() - internal,
        "tessellation finished"
    );

    Ok(Diagram {
        bounds,
        sites: diagram_sites,
        edges,
        internal,
    })
}

/// Tessellates independent site sets in parallel, one result per set in input order.
pub fn tessellate_batch(
    site_sets: &[Vec<Point>],
    bounds: BoundingBox,
    config: &TessellationConfig,
) -> Vec<Result<Diagram, TessellationError>> {
    site_sets
        .par_iter()
        .map(|sites| tessellate_with(sites, bounds, config))
        .collect()
}

/// Container holding sites, options and the last computed diagram.
pub struct Tessellation {
    pub bounds: BoundingBox,
    pub config: TessellationConfig,
    sites: Vec<Point>,
    diagram: Option<Diagram>,
}

impl Tessellation {
    pub fn new(bounds: BoundingBox) -> Self {
        Self::with_config(bounds, TessellationConfig::default())
    }

    pub fn with_config(bounds: BoundingBox, config: TessellationConfig) -> Self {
        Self {
            bounds,
            config,
            sites: Vec::new(),
            diagram: None,
        }
    }

    /// Replaces all sites.
    ///
    /// # Arguments
    /// * `sites` - A flat array of coordinates `[x, y, x, y, ...]`.
    pub fn set_sites(&mut self, sites: &[f64]) -> Result<(), TessellationError> {
        if sites.len() % 2 != 0 {
            return Err(TessellationError::OddCoordinateCount(sites.len()));
        }
        self.sites = sites.chunks_exact(2).map(|c| Point::new(c[0], c[1])).collect();
        self.diagram = None;
        Ok(())
    }

    pub fn set_points(&mut self, sites: Vec<Point>) {
        self.sites = sites;
        self.diagram = None;
    }

    pub fn add_site(&mut self, site: Point) -> SiteId {
        self.sites.push(site);
        self.diagram = None;
        self.sites.len() - 1
    }

    /// Replaces the sites by `count` points drawn uniformly inside the bounds.
    pub fn random_sites(&mut self, count: usize) {
        self.random_sites_seeded(count, get_seed());
    }

    pub fn random_sites_seeded(&mut self, count: usize, seed: u64) {
        let mut rng = StdRng::seed_from_u64(seed);
        let w = self.bounds.width();
        let h = self.bounds.height();
        self.sites = (0..count)
            .map(|_| {
                let x = self.bounds.min[0] + rng.r#gen::<f64>() * w;
                let y = self.bounds.min[1] + rng.r#gen::<f64>() * h;
                Point::new(x, y)
            })
            .collect();
        self.diagram = None;
    }

    /// Runs the sweep and clipping for the current sites.
    pub fn calculate(&mut self) -> Result<(), TessellationError> {
        self.diagram = Some(tessellate_with(&self.sites, self.bounds, &self.config)?);
        Ok(())
    }

    pub fn sites(&self) -> &[Point] {
        &self.sites
    }

    /// Edges of the last calculation, empty before [`Tessellation::calculate`].
    pub fn edges(&self) -> &[Edge] {
        self.diagram.as_ref().map(|d| d.edges()).unwrap_or(&[])
    }

    pub fn diagram(&self) -> Option<&Diagram> {
        self.diagram.as_ref()
    }

    pub fn count_sites(&self) -> usize {
        self.sites.len()
    }

    pub fn count_edges(&self) -> usize {
        self.edges().len()
    }

    pub fn clear(&mut self) {
        self.sites.clear();
        self.diagram = None;
    }
}

fn get_seed() -> u64 {
    #[cfg(target_arch = "wasm32")]
    {
        (js_sys::Math::random() * 4294967296.0) as u64
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        123456789
    }
}
