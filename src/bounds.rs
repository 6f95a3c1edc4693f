use crate::error::TessellationError;
use crate::geometry::Point;

/// Where a point lies relative to a [`BoundingBox`].
///
/// Corners are reported separately from the sides they join.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BorderLocation {
    Inside,
    Outside,
    Left,
    Right,
    Bottom,
    Top,
    BottomLeft,
    BottomRight,
    TopRight,
    TopLeft,
}

impl BorderLocation {
    /// The point lies on the rectangle's outline (side or corner).
    pub fn is_border(&self) -> bool {
        !matches!(self, BorderLocation::Inside | BorderLocation::Outside)
    }

    pub fn is_corner(&self) -> bool {
        matches!(
            self,
            BorderLocation::BottomLeft
                | BorderLocation::BottomRight
                | BorderLocation::TopRight
                | BorderLocation::TopLeft
        )
    }
}

/// Axis-aligned rectangle `[min[0], max[0]] x [min[1], max[1]]` the diagram is clipped to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub min: [f64; 2],
    pub max: [f64; 2],
}

impl BoundingBox {
    pub fn new(min: [f64; 2], max: [f64; 2]) -> Self {
        Self { min, max }
    }

    /// Rectangle from its extents, in the `(xmin, ymin, xmax, ymax)` order.
    pub fn from_extents(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self::new([min_x, min_y], [max_x, max_y])
    }

    /// Checks that all extents are finite and strictly positive.
    pub fn validate(&self) -> Result<(), TessellationError> {
        let finite = self.min.iter().chain(self.max.iter()).all(|v| v.is_finite());
        if !finite || self.min[0] >= self.max[0] || self.min[1] >= self.max[1] {
            return Err(TessellationError::InvalidBounds {
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }

    pub fn width(&self) -> f64 {
        self.max[0] - self.min[0]
    }

    pub fn height(&self) -> f64 {
        self.max[1] - self.min[1]
    }

    pub fn center(&self) -> Point {
        Point::new((self.min[0] + self.max[0]) * 0.5, (self.min[1] + self.max[1]) * 0.5)
    }

    /// Inclusive containment test with tolerance `eps`.
    pub fn contains(&self, p: Point, eps: f64) -> bool {
        p.x >= self.min[0] - eps
            && p.x <= self.max[0] + eps
            && p.y >= self.min[1] - eps
            && p.y <= self.max[1] + eps
    }

    /// Classifies `p` against the rectangle's outline.
    pub fn locate(&self, p: Point, eps: f64) -> BorderLocation {
        if !self.contains(p, eps) {
            return BorderLocation::Outside;
        }
        let left = (p.x - self.min[0]).abs() <= eps;
        let right = (p.x - self.max[0]).abs() <= eps;
        let bottom = (p.y - self.min[1]).abs() <= eps;
        let top = (p.y - self.max[1]).abs() <= eps;

        match (left, right, bottom, top) {
            (true, _, true, _) => BorderLocation::BottomLeft,
            (_, true, true, _) => BorderLocation::BottomRight,
            (_, true, _, true) => BorderLocation::TopRight,
            (true, _, _, true) => BorderLocation::TopLeft,
            (true, _, _, _) => BorderLocation::Left,
            (_, true, _, _) => BorderLocation::Right,
            (_, _, true, _) => BorderLocation::Bottom,
            (_, _, _, true) => BorderLocation::Top,
            _ => BorderLocation::Inside,
        }
    }

    /// Corners in counterclockwise order, starting at the bottom-left one.
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.min[0], self.min[1]),
            Point::new(self.max[0], self.min[1]),
            Point::new(self.max[0], self.max[1]),
            Point::new(self.min[0], self.max[1]),
        ]
    }

    pub fn perimeter(&self) -> f64 {
        2.0 * (self.width() + self.height())
    }

    /// Arc-length position of a border point along the outline, walking counterclockwise from
    /// the bottom-left corner. Returns `None` for points not on the outline.
    pub fn perimeter_position(&self, p: Point, eps: f64) -> Option<f64> {
        let w = self.width();
        let h = self.height();
        match self.locate(p, eps) {
            BorderLocation::BottomLeft => Some(0.0),
            BorderLocation::BottomRight => Some(w),
            BorderLocation::TopRight => Some(w + h),
            BorderLocation::TopLeft => Some(2.0 * w + h),
            BorderLocation::Bottom => Some(p.x - self.min[0]),
            BorderLocation::Right => Some(w + (p.y - self.min[1])),
            BorderLocation::Top => Some(w + h + (self.max[0] - p.x)),
            BorderLocation::Left => Some(2.0 * w + h + (self.max[1] - p.y)),
            BorderLocation::Inside | BorderLocation::Outside => None,
        }
    }

    /// Clamps `p` into the rectangle and pulls coordinates within `eps` of a side onto it.
    pub fn snap(&self, p: Point, eps: f64) -> Point {
        let snap_axis = |v: f64, lo: f64, hi: f64| {
            let v = v.clamp(lo, hi);
            if (v - lo).abs() <= eps {
                lo
            } else if (v - hi).abs() <= eps {
                hi
            } else {
                v
            }
        };
        Point::new(
            snap_axis(p.x, self.min[0], self.max[0]),
            snap_axis(p.y, self.min[1], self.max[1]),
        )
    }
}
