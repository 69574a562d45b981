//! Circles

use serde::{Deserialize, Serialize};

use super::{Bounds, Point};
use crate::error::GeometryError;

/// A circle with strictly positive radius
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CircleRecord")]
pub struct Circle {
    center: Point,
    radius: f32,
}

/// Unvalidated circle as it appears in configuration
#[derive(Deserialize)]
struct CircleRecord {
    center: Point,
    radius: f32,
}

impl TryFrom<CircleRecord> for Circle {
    type Error = GeometryError;

    fn try_from(record: CircleRecord) -> Result<Self, Self::Error> {
        Circle::new(record.center, record.radius)
    }
}

impl Circle {
    pub fn new(center: Point, radius: f32) -> Result<Self, GeometryError> {
        // also rejects NaN
        if !(radius > 0.0) {
            return Err(GeometryError::NonPositiveRadius(radius));
        }
        Ok(Self { center, radius })
    }

    #[inline]
    pub fn center(&self) -> Point {
        self.center
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Strict overlap: touching circles do not intersect
    pub fn intersects(&self, other: &Circle) -> bool {
        self.center.distance(other.center) < self.radius + other.radius
    }

    pub fn contains(&self, point: Point) -> bool {
        self.center.distance(point) < self.radius
    }

    pub fn perimeter(&self) -> f32 {
        std::f32::consts::TAU * self.radius
    }

    pub fn bounds(&self) -> Bounds {
        Bounds {
            min: self.center - Point::splat(self.radius),
            max: self.center + Point::splat(self.radius),
        }
    }

    pub fn translate(&self, offset: Point) -> Circle {
        Circle {
            center: self.center + offset,
            radius: self.radius,
        }
    }

    /// Scale about the center; non-positive factors leave the circle unchanged
    pub fn scale(&self, factor: f32) -> Circle {
        if factor > 0.0 {
            Circle {
                center: self.center,
                radius: self.radius * factor,
            }
        } else {
            *self
        }
    }
}
