//! Closed set of collision shapes

use serde::{Deserialize, Serialize};

use super::{Bounds, Circle, Point, Polygon};

/// A polygon or a circle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shape {
    Polygon { polygon: Polygon },
    Circle { circle: Circle },
}

impl From<Polygon> for Shape {
    fn from(polygon: Polygon) -> Self {
        Shape::Polygon { polygon }
    }
}

impl From<Circle> for Shape {
    fn from(circle: Circle) -> Self {
        Shape::Circle { circle }
    }
}

impl Shape {
    /// Dispatch on the shape pairing
    pub fn intersects(&self, other: &Shape) -> bool {
        match (self, other) {
            (Shape::Polygon { polygon: a }, Shape::Polygon { polygon: b }) => a.intersects(b),
            (Shape::Polygon { polygon }, Shape::Circle { circle })
            | (Shape::Circle { circle }, Shape::Polygon { polygon }) => polygon.intersects_circle(circle),
            (Shape::Circle { circle: a }, Shape::Circle { circle: b }) => a.intersects(b),
        }
    }

    pub fn contains(&self, point: Point) -> bool {
        match self {
            Shape::Polygon { polygon } => polygon.contains(point),
            Shape::Circle { circle } => circle.contains(point),
        }
    }

    pub fn centroid(&self) -> Point {
        match self {
            Shape::Polygon { polygon } => polygon.centroid(),
            Shape::Circle { circle } => circle.center(),
        }
    }

    pub fn bounds(&self) -> Bounds {
        match self {
            Shape::Polygon { polygon } => polygon.bounds(),
            Shape::Circle { circle } => circle.bounds(),
        }
    }

    pub fn perimeter(&self) -> f32 {
        match self {
            Shape::Polygon { polygon } => polygon.perimeter(),
            Shape::Circle { circle } => circle.perimeter(),
        }
    }

    pub fn translate(&self, offset: Point) -> Shape {
        match self {
            Shape::Polygon { polygon } => polygon.translate(offset).into(),
            Shape::Circle { circle } => circle.translate(offset).into(),
        }
    }

    /// Rotate about the shape's own centroid (circles are unaffected)
    pub fn rotate(&self, degrees: f32) -> Shape {
        match self {
            Shape::Polygon { polygon } => polygon.rotate(degrees).into(),
            Shape::Circle { .. } => self.clone(),
        }
    }

    pub fn scale(&self, factor: f32) -> Shape {
        match self {
            Shape::Polygon { polygon } => polygon.scale(factor).into(),
            Shape::Circle { circle } => circle.scale(factor).into(),
        }
    }
}
