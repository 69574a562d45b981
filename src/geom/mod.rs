//! Geometry kernel
//!
//! Points are `glam::Vec2` values compared by exact floating-point equality.
//! Shapes validate their invariants at construction and every transform
//! returns a new instance, so a constructed shape is always well-formed.

pub mod circle;
pub mod polygon;
pub mod segment;
pub mod shape;

pub use circle::Circle;
pub use polygon::Polygon;
pub use segment::Segment;
pub use shape::Shape;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::{cartesian_to_polar, normalize_degrees, polar_to_cartesian};

/// The kernel's point type
pub type Point = Vec2;

/// Polar accessors for points
pub trait PointExt {
    /// Distance from the origin
    fn radius(self) -> f32;
    /// Angle from the positive x axis, degrees in [0, 360)
    fn angle(self) -> f32;
    /// Rotate around `pivot` by `degrees` counterclockwise
    fn rotate_about(self, pivot: Point, degrees: f32) -> Point;
}

impl PointExt for Point {
    #[inline]
    fn radius(self) -> f32 {
        cartesian_to_polar(self).0
    }

    #[inline]
    fn angle(self) -> f32 {
        cartesian_to_polar(self).1
    }

    fn rotate_about(self, pivot: Point, degrees: f32) -> Point {
        let offset = self - pivot;
        if offset == Vec2::ZERO {
            return self;
        }
        let (r, theta) = cartesian_to_polar(offset);
        pivot + polar_to_cartesian(r, normalize_degrees(theta + degrees))
    }
}

/// 2D cross product (z component of a × b)
#[inline]
pub(crate) fn cross(a: Vec2, b: Vec2) -> f32 {
    a.perp_dot(b)
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Bounds {
    /// Smallest box enclosing all points (`None` for an empty iterator)
    pub fn enclosing(points: impl IntoIterator<Item = Point>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Some(Self { min, max })
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Point {
        (self.min + self.max) * 0.5
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Grow the box by `margin` on every side
    pub fn expanded(&self, margin: f32) -> Self {
        Self {
            min: self.min - Vec2::splat(margin),
            max: self.max + Vec2::splat(margin),
        }
    }
}
