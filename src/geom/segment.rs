//! Line segments and the segment intersection tests

use serde::{Deserialize, Serialize};

use super::{Circle, Point, cross};
use crate::consts::GEOM_EPSILON;
use crate::error::GeometryError;

/// Parametric distance from an endpoint treated as touching it
const PARAM_EPSILON: f32 = 1e-4;

/// An ordered pair of distinct points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    start: Point,
    end: Point,
}

impl Segment {
    pub fn new(start: Point, end: Point) -> Result<Self, GeometryError> {
        if start == end {
            return Err(GeometryError::DuplicateEndpoints { x: start.x, y: start.y });
        }
        Ok(Self { start, end })
    }

    #[inline]
    pub fn start(&self) -> Point {
        self.start
    }

    #[inline]
    pub fn end(&self) -> Point {
        self.end
    }

    /// Vector from start to end
    #[inline]
    pub fn direction(&self) -> Point {
        self.end - self.start
    }

    pub fn length(&self) -> f32 {
        self.direction().length()
    }

    pub fn is_perpendicular(&self, other: &Segment) -> bool {
        let (a, b) = (self.direction(), other.direction());
        a.dot(b).abs() <= GEOM_EPSILON * a.length() * b.length()
    }

    /// Whether `point` lies on the infinite line through this segment
    pub fn is_collinear(&self, point: Point) -> bool {
        let d = self.direction();
        let v = point - self.start;
        cross(d, v).abs() <= GEOM_EPSILON * d.length() * v.length().max(1.0)
    }

    /// Whether `point` lies on the segment itself (endpoints included)
    pub fn contains_point(&self, point: Point) -> bool {
        if !self.is_collinear(point) {
            return false;
        }
        let d = self.direction();
        let t = (point - self.start).dot(d) / d.length_squared();
        (0.0..=1.0).contains(&t)
    }

    /// Proper intersection test between two segments.
    ///
    /// Solves `start + alpha * d1 = other.start + beta * d2`. Parallel or
    /// collinear segments never intersect, and a crossing located at an
    /// endpoint of either segment does not count, so adjacent polygon sides
    /// sharing a vertex are not reported.
    pub fn intersects(&self, other: &Segment) -> bool {
        let d1 = self.direction();
        let d2 = other.direction();
        let det = cross(d1, d2);
        if det.abs() <= f32::EPSILON * d1.length() * d2.length() {
            return false;
        }

        let offset = other.start - self.start;
        let alpha = cross(offset, d2) / det;
        let beta = cross(offset, d1) / det;
        if !(0.0..=1.0).contains(&alpha) || !(0.0..=1.0).contains(&beta) {
            return false;
        }

        // a parameter of 0 or 1 puts the crossing on an endpoint
        let at_endpoint = |t: f32| t <= PARAM_EPSILON || t >= 1.0 - PARAM_EPSILON;
        !at_endpoint(alpha) && !at_endpoint(beta)
    }

    /// Whether the segment crosses the circle's boundary.
    ///
    /// A segment lying wholly inside the circle has no boundary crossing and
    /// is reported as not intersecting; containment is the caller's concern.
    pub fn intersects_circle(&self, circle: &Circle) -> bool {
        let d = self.direction();
        let f = self.start - circle.center();
        let a = d.dot(d);
        let b = 2.0 * f.dot(d);
        let c = f.dot(f) - circle.radius() * circle.radius();

        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return false;
        }

        let root = discriminant.sqrt();
        let t1 = (-b - root) / (2.0 * a);
        let t2 = (-b + root) / (2.0 * a);
        (0.0..=1.0).contains(&t1) || (0.0..=1.0).contains(&t2)
    }

    pub fn translate(&self, offset: Point) -> Segment {
        Segment {
            start: self.start + offset,
            end: self.end + offset,
        }
    }
}
