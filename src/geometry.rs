//! Geometry kernel for the sweep.
//!
//! Everything in here is a pure function of its inputs. Degenerate configurations are reported
//! through `Option` instead of panicking, and every coincidence test takes the tolerance as an
//! explicit `eps` argument.

use crate::bounds::BoundingBox;
use std::ops::{Add, Mul, Sub};

/// Default tolerance for coincidence tests (shared coordinates, collinear triples,
/// zero-length edges, points on the boundary).
pub const DEFAULT_EPSILON: f64 = 1e-9;

/// A point (or vector) in the plane.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn dot(&self, other: Point) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// z-component of the 3D cross product.
    pub fn cross(&self, other: Point) -> f64 {
        self.x * other.y - self.y * other.x
    }

    pub fn length_sq(&self) -> f64 {
        self.dot(*self)
    }

    pub fn distance_sq(&self, other: Point) -> f64 {
        (*self - other).length_sq()
    }

    pub fn distance(&self, other: Point) -> f64 {
        self.distance_sq(other).sqrt()
    }

    pub fn midpoint(&self, other: Point) -> Point {
        Point::new((self.x + other.x) * 0.5, (self.y + other.y) * 0.5)
    }

    /// Rotates the vector by -90 degrees.
    pub fn rotate_cw(&self) -> Point {
        Point::new(self.y, -self.x)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Both coordinates agree within `eps`.
    pub fn approx_eq(&self, other: Point, eps: f64) -> bool {
        (self.x - other.x).abs() <= eps && (self.y - other.y).abs() <= eps
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl From<[f64; 2]> for Point {
    fn from(p: [f64; 2]) -> Self {
        Point::new(p[0], p[1])
    }
}

impl From<Point> for [f64; 2] {
    fn from(p: Point) -> Self {
        [p.x, p.y]
    }
}

/// A half-line `origin + t * direction`, `t >= 0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Point,
    pub direction: Point,
}

impl Ray {
    pub fn at(&self, t: f64) -> Point {
        self.origin + self.direction * t
    }

    /// Parameter of the orthogonal projection of `p` onto the supporting line.
    pub fn parameter_of(&self, p: Point) -> f64 {
        (p - self.origin).dot(self.direction) / self.direction.length_sq()
    }
}

/// Twice the signed area of the triangle `a, b, c`. Positive for a counterclockwise turn.
pub fn orientation(a: Point, b: Point, c: Point) -> f64 {
    (b - a).cross(c - a)
}

/// Perpendicular bisector of `left` and `right`, anchored at their midpoint.
///
/// The direction is the one in which the breakpoint between a `left` arc and a `right` arc
/// travels while the sweep line moves down.
pub fn bisector(left: Point, right: Point) -> Ray {
    Ray {
        origin: left.midpoint(right),
        direction: (right - left).rotate_cw(),
    }
}

/// Intersection of the bisector of `a` and `b` with the horizontal line at `y`.
///
/// Returns `None` when `a` and `b` share their x-coordinate, the bisector is then horizontal.
pub fn bisector_at_y(a: Point, b: Point, y: f64, eps: f64) -> Option<Point> {
    let dx = b.x - a.x;
    if dx.abs() <= eps {
        return None;
    }
    let x = (b.length_sq() - a.length_sq() - 2.0 * y * (b.y - a.y)) / (2.0 * dx);
    Some(Point::new(x, y))
}

/// Height of the parabola with the given focus and the directrix `y = sweep_y` at `x`.
///
/// Returns `None` when the focus lies on the directrix, the parabola is then a vertical ray.
pub fn parabola_y(focus: Point, sweep_y: f64, x: f64, eps: f64) -> Option<f64> {
    let d = focus.y - sweep_y;
    if d.abs() <= eps {
        return None;
    }
    let dx = x - focus.x;
    Some((dx * dx + focus.y * focus.y - sweep_y * sweep_y) / (2.0 * d))
}

/// x-coordinate of the breakpoint between the arc of `left` and the arc of `right` on the
/// beachline with the sweep line at `sweep_y`.
///
/// Of the two parabola intersections, the one with the `left` arc on its left is selected.
pub fn breakpoint_x(left: Point, right: Point, sweep_y: f64, eps: f64) -> f64 {
    let dl = left.y - sweep_y;
    let dr = right.y - sweep_y;
    let left_flat = dl.abs() <= eps;
    let right_flat = dr.abs() <= eps;

    match (left_flat, right_flat) {
        (true, true) => return (left.x + right.x) * 0.5,
        (true, false) => return left.x,
        (false, true) => return right.x,
        (false, false) => {}
    }

    if (left.y - right.y).abs() <= eps {
        return (left.x + right.x) * 0.5;
    }

    let il = 1.0 / (2.0 * dl);
    let ir = 1.0 / (2.0 * dr);
    let a = il - ir;
    let b = -2.0 * (left.x * il - right.x * ir);
    let c = left.x * left.x * il - right.x * right.x * ir + (left.y - right.y) * 0.5;

    let disc = (b * b - 4.0 * a * c).max(0.0);
    let root = disc.sqrt();
    // (-b + root) / 2a, rearranged to avoid cancellation
    if b > 0.0 {
        2.0 * c / (-b - root)
    } else {
        (-b + root) / (2.0 * a)
    }
}

/// Center and radius of the circle through `a`, `b` and `c`.
///
/// Returns `None` for (nearly) collinear points.
pub fn circumcircle(a: Point, b: Point, c: Point, eps: f64) -> Option<(Point, f64)> {
    let ab = b - a;
    let ac = c - a;
    let d = 2.0 * ab.cross(ac);
    if d.abs() <= eps {
        return None;
    }
    let ab2 = ab.length_sq();
    let ac2 = ac.length_sq();
    let ux = (ac.y * ab2 - ab.y * ac2) / d;
    let uy = (ab.x * ac2 - ac.x * ab2) / d;
    let offset = Point::new(ux, uy);
    Some((a + offset, offset.length_sq().sqrt()))
}

/// Liang–Barsky clipping of the parametric line `origin + t * direction`, `t` in `[t0, t1]`,
/// against `bounds`. Either limit may be infinite.
///
/// Returns the clipped parameter interval or `None` if the line misses the rectangle.
/// A line running exactly along a side is kept.
pub fn clip_line(
    origin: Point,
    direction: Point,
    t0: f64,
    t1: f64,
    bounds: &BoundingBox,
    eps: f64,
) -> Option<(f64, f64)> {
    let mut lo = t0;
    let mut hi = t1;

    let constraints = [
        (-direction.x, origin.x - bounds.min[0]),
        (direction.x, bounds.max[0] - origin.x),
        (-direction.y, origin.y - bounds.min[1]),
        (direction.y, bounds.max[1] - origin.y),
    ];

    for (p, q) in constraints {
        if p == 0.0 {
            if q < -eps {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > hi {
                return None;
            }
            if r > lo {
                lo = r;
            }
        } else {
            if r < lo {
                return None;
            }
            if r < hi {
                hi = r;
            }
        }
    }

    if !lo.is_finite() || !hi.is_finite() || lo > hi {
        return None;
    }
    Some((lo, hi))
}
