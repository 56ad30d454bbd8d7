//! Geometric primitives for network layout and rendering.
//!
//! This module provides the geometric types used to position case nodes and
//! to size the rendered network.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate in layout space
//! - [`Size`] - Width and height dimensions
//! - [`Bounds`] - A rectangular bounding box defined by minimum and maximum coordinates
//!
//! # Coordinate System
//!
//! Layout coordinates follow the SVG convention:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! - **Origin**: Top-left corner at `(0, 0)`
//! - **X-axis**: Increases rightward
//! - **Y-axis**: Increases downward
//!
//! Angles are measured in radians from the positive X axis. Because Y grows
//! downward, increasing angles proceed clockwise on screen and `-π/2` points
//! straight up.

use serde::{Deserialize, Serialize};

/// A 2D point representing a position in layout coordinate space.
///
/// # Examples
///
/// ```
/// # use outbreak_core::geometry::Point;
/// let center = Point::new(400.0, 300.0);
/// let moved = center.add_point(Point::new(-60.0, 0.0));
/// assert_eq!(moved.x(), 340.0);
/// assert_eq!(moved.y(), 300.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Creates the point at `angle` radians on the circle of `radius` around `center`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use outbreak_core::geometry::Point;
    /// use std::f32::consts::FRAC_PI_2;
    ///
    /// let top = Point::on_circle(Point::new(400.0, 300.0), 220.0, -FRAC_PI_2);
    /// assert!((top.x() - 400.0).abs() < 1e-3);
    /// assert!((top.y() - 80.0).abs() < 1e-3);
    /// ```
    pub fn on_circle(center: Point, radius: f32, angle: f32) -> Self {
        Self {
            x: center.x + radius * angle.cos(),
            y: center.y + radius * angle.sin(),
        }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f32 {
        self.y
    }

    /// Adds another point to this point, returning a new point.
    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Subtracts another point from this point, returning a new point
    pub fn sub_point(self, other: Point) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    /// Calculates the midpoint between this point and another point
    pub fn midpoint(self, other: Point) -> Self {
        Self {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }

    /// Calculates the hypotenuse (Euclidean distance from origin)
    pub fn hypot(self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Euclidean distance to another point
    pub fn distance(self, other: Point) -> f32 {
        self.sub_point(other).hypot()
    }

    /// Angle in radians of the vector from `origin` to this point, in `(-π, π]`.
    pub fn angle_from(self, origin: Point) -> f32 {
        let delta = self.sub_point(origin);
        delta.y.atan2(delta.x)
    }

    /// Multiplies both coordinates by the given factor.
    pub fn scale(self, factor: f32) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }

    /// Converts a point and size into a bounds rectangle
    ///
    /// The point is treated as the center of the bounds.
    pub fn to_bounds(self, size: Size) -> Bounds {
        Bounds::new_from_center(self, size)
    }
}

/// Represents the dimensions of an element with width and height
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns the width dimension of this size
    pub fn width(self) -> f32 {
        self.width
    }

    /// Returns the height dimension of this size
    pub fn height(self) -> f32 {
        self.height
    }

    /// Returns a new size grown by `margin` on every side
    pub fn add_margin(self, margin: f32) -> Self {
        Self {
            width: margin.mul_add(2.0, self.width),
            height: margin.mul_add(2.0, self.height),
        }
    }
}

/// Represents a rectangular bounding box with minimum and maximum coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Bounds {
    /// Creates a new bounds from a center point and a size
    pub fn new_from_center(center: Point, size: Size) -> Self {
        let half_width = size.width / 2.0;
        let half_height = size.height / 2.0;
        Self {
            min_x: center.x - half_width,
            min_y: center.y - half_height,
            max_x: center.x + half_width,
            max_y: center.y + half_height,
        }
    }

    /// Returns the minimum x-coordinate of the bounds
    pub fn min_x(self) -> f32 {
        self.min_x
    }

    /// Returns the minimum y-coordinate of the bounds
    pub fn min_y(self) -> f32 {
        self.min_y
    }

    /// Returns the maximum x-coordinate of the bounds
    pub fn max_x(self) -> f32 {
        self.max_x
    }

    /// Returns the maximum y-coordinate of the bounds
    pub fn max_y(self) -> f32 {
        self.max_y
    }

    /// Returns the center point of the bounds
    pub fn center(self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Returns the width of the bounds
    pub fn width(self) -> f32 {
        self.max_x - self.min_x
    }

    /// Returns the height of the bounds
    pub fn height(self) -> f32 {
        self.max_y - self.min_y
    }

    /// Returns the top-left corner as a Point
    pub fn min_point(self) -> Point {
        Point::new(self.min_x, self.min_y)
    }

    /// Converts bounds to a Size object
    pub fn to_size(self) -> Size {
        Size::new(self.width(), self.height())
    }

    /// Checks whether a point lies inside or on the edge of the bounds
    pub fn contains(self, point: Point) -> bool {
        point.x >= self.min_x
            && point.x <= self.max_x
            && point.y >= self.min_y
            && point.y <= self.max_y
    }

    /// Merges two bounds to create a larger bounds that contains both.
    ///
    /// # Examples
    ///
    /// ```
    /// # use outbreak_core::geometry::{Bounds, Point, Size};
    /// let hub = Point::new(400.0, 300.0).to_bounds(Size::new(160.0, 64.0));
    /// let ring = Point::new(400.0, 80.0).to_bounds(Size::new(160.0, 64.0));
    ///
    /// let combined = hub.merge(&ring);
    /// assert_eq!(combined.min_y(), 48.0);
    /// assert_eq!(combined.max_y(), 332.0);
    /// ```
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Finds where the segment from the center of these bounds toward
    /// `external` leaves the rectangle.
    ///
    /// Returns the center itself when `external` coincides with it.
    pub fn edge_toward(self, external: Point) -> Point {
        let center = self.center();
        let delta = external.sub_point(center);
        if delta.x == 0.0 && delta.y == 0.0 {
            return center;
        }

        let half_width = self.width() / 2.0;
        let half_height = self.height() / 2.0;

        let scale_x = if delta.x == 0.0 {
            f32::INFINITY
        } else {
            half_width / delta.x.abs()
        };
        let scale_y = if delta.y == 0.0 {
            f32::INFINITY
        } else {
            half_height / delta.y.abs()
        };

        // Never step past the external point itself
        let factor = scale_x.min(scale_y).min(1.0);
        center.add_point(delta.scale(factor))
    }
}


#[cfg(test)]
mod proptest_tests {
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    use super::*;

    fn point_strategy() -> impl Strategy<Value = Point> {
        (-1000.0f32..1000.0, -1000.0f32..1000.0).prop_map(|(x, y)| Point::new(x, y))
    }

    fn bounds_strategy() -> impl Strategy<Value = Bounds> {
        (point_strategy(), 1.0f32..500.0, 1.0f32..500.0)
            .prop_map(|(center, w, h)| center.to_bounds(Size::new(w, h)))
    }

    /// A point placed on a circle is at exactly `radius` from the center.
    fn check_on_circle_distance(
        center: Point,
        radius: f32,
        angle: f32,
    ) -> Result<(), TestCaseError> {
        let p = Point::on_circle(center, radius, angle);
        prop_assert!(approx_eq!(f32, p.distance(center), radius, epsilon = 0.05));
        Ok(())
    }

    /// Merged bounds contain both inputs' corners.
    fn check_merge_contains_both(b1: Bounds, b2: Bounds) -> Result<(), TestCaseError> {
        let merged = b1.merge(&b2);
        for b in [b1, b2] {
            prop_assert!(merged.contains(b.min_point()));
            prop_assert!(merged.contains(Point::new(b.max_x(), b.max_y())));
        }
        Ok(())
    }

    /// The edge point lies on the rectangle and on the center-to-target ray.
    fn check_edge_toward_on_boundary(bounds: Bounds, target: Point) -> Result<(), TestCaseError> {
        prop_assume!(!bounds.contains(target));
        let edge = bounds.edge_toward(target);

        let on_vertical = approx_eq!(f32, edge.x(), bounds.min_x(), epsilon = 0.01)
            || approx_eq!(f32, edge.x(), bounds.max_x(), epsilon = 0.01);
        let on_horizontal = approx_eq!(f32, edge.y(), bounds.min_y(), epsilon = 0.01)
            || approx_eq!(f32, edge.y(), bounds.max_y(), epsilon = 0.01);
        prop_assert!(on_vertical || on_horizontal);

        let center = bounds.center();
        prop_assert!(edge.distance(center) <= target.distance(center) + 0.01);
        Ok(())
    }

    proptest! {
        #[test]
        fn on_circle_distance(center in point_strategy(), radius in 1.0f32..500.0, angle in -7.0f32..7.0) {
            check_on_circle_distance(center, radius, angle)?;
        }

        #[test]
        fn merge_contains_both(b1 in bounds_strategy(), b2 in bounds_strategy()) {
            check_merge_contains_both(b1, b2)?;
        }

        #[test]
        fn edge_toward_on_boundary(bounds in bounds_strategy(), target in point_strategy()) {
            check_edge_toward_on_boundary(bounds, target)?;
        }
    }
}
