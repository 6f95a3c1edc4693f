use crate::bounds::BoundingBox;
use crate::geometry::Point;
use crate::tessellation::{BorderEdgeGeneration, Edge, Tessellation, TessellationConfig};
use js_sys::Array;
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen_rayon::init_thread_pool;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn init_threads(n: usize) -> js_sys::Promise {
    init_thread_pool(n)
}

#[wasm_bindgen(typescript_custom_section)]
const TS_CONSTANTS_SITES: &'static str = r#"
export const NO_SITE = -1;
"#;

// --- Bounding Box ---

#[wasm_bindgen]
#[derive(Clone, Copy, Debug)]
pub struct BoundingBox2D {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

#[wasm_bindgen]
impl BoundingBox2D {
    #[wasm_bindgen(constructor)]
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> BoundingBox2D {
        BoundingBox2D { min_x, min_y, max_x, max_y }
    }
}

impl From<BoundingBox2D> for BoundingBox {
    fn from(b: BoundingBox2D) -> Self {
        BoundingBox::from_extents(b.min_x, b.min_y, b.max_x, b.max_y)
    }
}

/// Reads `[x, y]` from a JS array.
pub fn parse_js_point(val: &JsValue) -> Option<Point> {
    let arr = val.dyn_ref::<Array>()?;
    if arr.length() < 2 {
        return None;
    }
    Some(Point::new(arr.get(0).as_f64()?, arr.get(1).as_f64()?))
}

fn to_js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn site_to_js(site: Option<usize>) -> i32 {
    site.map_or(-1, |s| s as i32)
}

// --- Tessellation ---

#[wasm_bindgen(js_name = Tessellation2D)]
pub struct Tessellation2D {
    inner: Tessellation,
}

#[wasm_bindgen(js_class = Tessellation2D)]
impl Tessellation2D {
    #[wasm_bindgen(constructor)]
    pub fn new(bounds: BoundingBox2D, border_edges: bool) -> Tessellation2D {
        let border = if border_edges {
            BorderEdgeGeneration::MakeBorderEdges
        } else {
            BorderEdgeGeneration::DoNotMakeBorderEdges
        };
        let config = TessellationConfig::default().with_border(border);
        Tessellation2D { inner: Tessellation::with_config(bounds.into(), config) }
    }

    /// Flat `[x, y, x, y, ...]` coordinates.
    #[wasm_bindgen(js_name = setSites)]
    pub fn set_sites(&mut self, sites: &[f64]) -> Result<(), JsValue> {
        self.inner.set_sites(sites).map_err(to_js_error)
    }

    /// An array of `[x, y]` pairs.
    #[wasm_bindgen(js_name = setSitesFromArray)]
    pub fn set_sites_from_array(&mut self, sites: &Array) -> Result<(), JsValue> {
        let points = sites
            .iter()
            .enumerate()
            .map(|(i, v)| parse_js_point(&v).ok_or_else(|| JsValue::from_str(&format!("site {} is not an [x, y] pair", i))))
            .collect::<Result<Vec<_>, _>>()?;
        self.inner.set_points(points);
        Ok(())
    }

    #[wasm_bindgen(js_name = addSite)]
    pub fn add_site(&mut self, x: f64, y: f64) -> usize {
        self.inner.add_site(Point::new(x, y))
    }

    #[wasm_bindgen(js_name = randomSites)]
    pub fn random_sites(&mut self, count: usize) {
        self.inner.random_sites(count);
    }

    pub fn calculate(&mut self) -> Result<(), JsValue> {
        self.inner.calculate().map_err(to_js_error)
    }

    #[wasm_bindgen(getter, js_name = countSites)]
    pub fn count_sites(&self) -> usize {
        self.inner.count_sites()
    }

    #[wasm_bindgen(getter, js_name = countEdges)]
    pub fn count_edges(&self) -> usize {
        self.inner.count_edges()
    }

    #[wasm_bindgen(getter)]
    pub fn sites(&self) -> Vec<f64> {
        self.inner.sites().iter().flat_map(|p| [p.x, p.y]).collect()
    }

    /// Flat `[sx, sy, ex, ey, ...]` per edge.
    #[wasm_bindgen(getter)]
    pub fn edges(&self) -> Vec<f64> {
        self.inner
            .edges()
            .iter()
            .flat_map(|e: &Edge| [e.start.x, e.start.y, e.end.x, e.end.y])
            .collect()
    }

    /// Flat `[left, right, ...]` per edge, `NO_SITE` where missing.
    #[wasm_bindgen(getter, js_name = edgeSites)]
    pub fn edge_sites(&self) -> Vec<i32> {
        self.inner
            .edges()
            .iter()
            .flat_map(|e| [site_to_js(e.left), site_to_js(e.right)])
            .collect()
    }

    /// Sites sharing an edge with `site`, empty before `calculate`.
    pub fn neighbors(&self, site: usize) -> Vec<u32> {
        self.inner
            .diagram()
            .map(|d| d.neighbors(site).into_iter().map(|s| s as u32).collect())
            .unwrap_or_default()
    }
}
