//! # vorosweep
//!
//! `vorosweep` computes planar Voronoi diagrams with Fortune's sweep-line algorithm and clips
//! them to an axis-aligned rectangle. It is designed to be used in Rust as well as compiled to
//! WebAssembly (WASM).
//!
//! ## Features
//!
//! - **Sweep-line**: `O(n log n)` construction with a balanced beachline and lazily invalidated circle events.
//! - **Clipping**: Every edge is cut to the bounding rectangle; cells along the outline can be closed with border edges.
//! - **Ownership**: Each edge reports the sites on either side, so cells and neighbours are recoverable.
//! - **WASM-first**: Built with `wasm-bindgen` for seamless integration with JavaScript and TypeScript.
//!
//! ## Example
//!
//! ```
//! use vorosweep::{tessellate, BorderEdgeGeneration, BoundingBox, Point};
//!
//! let sites = [
//!     Point::new(300.0, 700.0),
//!     Point::new(300.0, 300.0),
//!     Point::new(700.0, 300.0),
//!     Point::new(700.0, 700.0),
//! ];
//! let bounds = BoundingBox::new([0.0, 0.0], [1000.0, 1000.0]);
//! let edges = tessellate(&sites, bounds, BorderEdgeGeneration::DoNotMakeBorderEdges).unwrap();
//! assert_eq!(edges.len(), 4);
//! ```
//!
//! See the `demos/` directory for SVG plotting.
//!
//! ## Main Interface
//!
//! [`tessellate`] is the one-shot entry point. [`Tessellation`] keeps sites and the last
//! [`Diagram`] together for incremental use.

mod beachline;
mod bounds;
mod builder;
mod clipper;
mod error;
mod event_queue;
pub mod geometry;
mod sweep;
mod tessellation;
pub mod wasm;

pub use beachline::{ArcId, Beachline};
pub use bounds::{BorderLocation, BoundingBox};
pub use builder::{DiagramBuilder, EdgeId, EdgeRecord};
pub use clipper::{border_edges, clip_edge, clip_edges, nearest_site};
pub use error::TessellationError;
pub use event_queue::{Event, EventId, EventQueue, SiteId};
pub use geometry::{DEFAULT_EPSILON, Point, Ray};
pub use sweep::{Sweep, SweepStats};
pub use tessellation::{
    BorderEdgeGeneration, Diagram, Edge, Site, Tessellation, TessellationConfig, tessellate,
    tessellate_batch, tessellate_with,
};
