//! Simple polygons
//!
//! A polygon is an ordered ring of vertices plus the sides joining them
//! (the last side closes the loop). Construction rejects repeated vertices,
//! vertices collinear with their neighbours and self-intersecting rings.

use serde::{Deserialize, Serialize};

use super::{Bounds, Circle, Point, PointExt, Segment, cross};
use crate::consts::GEOM_EPSILON;
use crate::error::GeometryError;

/// A simple (non self-intersecting) polygon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Point>", into = "Vec<Point>")]
pub struct Polygon {
    vertices: Vec<Point>,
    sides: Vec<Segment>,
}

impl Polygon {
    pub fn new(vertices: Vec<Point>) -> Result<Self, GeometryError> {
        let n = vertices.len();
        if n < 3 {
            return Err(GeometryError::TooFewVertices(n));
        }
        for i in 0..n {
            if vertices[..i].contains(&vertices[i]) {
                return Err(GeometryError::DuplicateVertex(i));
            }
        }

        let sides = (0..n)
            .map(|i| Segment::new(vertices[i], vertices[(i + 1) % n]))
            .collect::<Result<Vec<_>, _>>()?;

        // vertex i sits between side i-1 and side i
        for i in 0..n {
            let prev = &sides[(i + n - 1) % n];
            if prev.is_collinear(sides[i].end()) {
                return Err(GeometryError::CollinearVertex(i));
            }
        }

        for i in 0..n {
            for j in (i + 2)..n {
                // first and last sides are adjacent through vertex 0
                if i == 0 && j == n - 1 {
                    continue;
                }
                if sides[i].intersects(&sides[j]) {
                    return Err(GeometryError::SelfIntersecting(i, j));
                }
            }
        }

        Ok(Self { vertices, sides })
    }

    /// Three distinct, non-collinear points
    pub fn triangle(a: Point, b: Point, c: Point) -> Result<Self, GeometryError> {
        Self::new(vec![a, b, c])
    }

    /// Four vertices with equal opposite sides and right angles
    pub fn rectangle(vertices: Vec<Point>) -> Result<Self, GeometryError> {
        if vertices.len() != 4 {
            return Err(GeometryError::NotRectangle);
        }
        let polygon = Self::new(vertices)?;
        let s = &polygon.sides;
        let tolerance = GEOM_EPSILON * polygon.perimeter().max(1.0);
        let opposite_equal = (s[0].length() - s[2].length()).abs() <= tolerance
            && (s[1].length() - s[3].length()).abs() <= tolerance;
        let right_angles = (0..4).all(|i| s[i].is_perpendicular(&s[(i + 1) % 4]));
        if !opposite_equal || !right_angles {
            return Err(GeometryError::NotRectangle);
        }
        Ok(polygon)
    }

    /// Axis-aligned rectangle centred on `center`
    pub fn rect(center: Point, width: f32, height: f32) -> Result<Self, GeometryError> {
        if !(width > 0.0 && height > 0.0) {
            return Err(GeometryError::InvalidDimensions { width, height });
        }
        let (hw, hh) = (width / 2.0, height / 2.0);
        Self::rectangle(vec![
            center + Point::new(-hw, -hh),
            center + Point::new(hw, -hh),
            center + Point::new(hw, hh),
            center + Point::new(-hw, hh),
        ])
    }

    #[inline]
    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    #[inline]
    pub fn sides(&self) -> &[Segment] {
        &self.sides
    }

    pub fn perimeter(&self) -> f32 {
        self.sides.iter().map(Segment::length).sum()
    }

    /// Shoelace signed area (positive for counterclockwise winding)
    pub fn signed_area(&self) -> f32 {
        self.sides.iter().map(|s| cross(s.start(), s.end())).sum::<f32>() * 0.5
    }

    pub fn area(&self) -> f32 {
        self.signed_area().abs()
    }

    /// Area centroid
    pub fn centroid(&self) -> Point {
        let area = self.signed_area();
        let sum = self.sides.iter().fold(Point::ZERO, |acc, s| {
            let (a, b) = (s.start(), s.end());
            acc + (a + b) * cross(a, b)
        });
        let c = sum / (6.0 * area);
        // -0.0 + 0.0 == 0.0
        Point::new(c.x + 0.0, c.y + 0.0)
    }

    pub fn bounds(&self) -> Bounds {
        let first = self.vertices[0];
        let (min, max) = self
            .vertices
            .iter()
            .fold((first, first), |(min, max), &p| (min.min(p), max.max(p)));
        Bounds { min, max }
    }

    /// Ray-casting parity test (points on the boundary may go either way)
    pub fn contains(&self, point: Point) -> bool {
        let mut inside = false;
        for side in &self.sides {
            let (a, b) = (side.start(), side.end());
            if (a.y > point.y) != (b.y > point.y) {
                let x_cross = a.x + (point.y - a.y) / (b.y - a.y) * (b.x - a.x);
                if point.x < x_cross {
                    inside = !inside;
                }
            }
        }
        inside
    }

    /// Inside and not on any side
    pub fn strictly_contains(&self, point: Point) -> bool {
        self.contains(point) && !self.sides.iter().any(|s| s.contains_point(point))
    }

    /// Vertices, side midpoints and the centroid
    fn probe_points(&self) -> impl Iterator<Item = Point> + '_ {
        self.vertices
            .iter()
            .copied()
            .chain(self.sides.iter().map(|s| (s.start() + s.end()) * 0.5))
            .chain(std::iter::once(self.centroid()))
    }

    /// Sides cross, or one polygon reaches into the other's interior.
    ///
    /// Endpoint touches never count as crossings, so overlaps whose sides
    /// only meet at vertices (aligned edges, identical polygons) are found by
    /// probing vertices, side midpoints and centroids against the interior.
    /// Full containment is the case where every vertex probe lands inside.
    pub fn intersects(&self, other: &Polygon) -> bool {
        let sides_cross = self
            .sides
            .iter()
            .any(|a| other.sides.iter().any(|b| a.intersects(b)));
        sides_cross
            || other.vertices.iter().all(|&v| self.strictly_contains(v))
            || self.vertices.iter().all(|&v| other.strictly_contains(v))
            || other.probe_points().any(|p| self.strictly_contains(p))
            || self.probe_points().any(|p| other.strictly_contains(p))
    }

    /// A side crosses the circle, or one shape lies entirely inside the other
    pub fn intersects_circle(&self, circle: &Circle) -> bool {
        if self.sides.iter().any(|s| s.intersects_circle(circle)) {
            return true;
        }
        // no boundary crossing: either disjoint or nested
        if self.contains(circle.center()) {
            return true;
        }
        self.vertices.iter().all(|&v| circle.contains(v))
    }

    fn map_vertices(&self, f: impl Fn(Point) -> Point) -> Polygon {
        let vertices: Vec<Point> = self.vertices.iter().map(|&v| f(v)).collect();
        let n = vertices.len();
        let sides = (0..n)
            .map(|i| {
                // rigid transforms and positive scales preserve distinctness
                Segment::new(vertices[i], vertices[(i + 1) % n]).unwrap_or(self.sides[i])
            })
            .collect();
        Polygon { vertices, sides }
    }

    pub fn translate(&self, offset: Point) -> Polygon {
        self.map_vertices(|v| v + offset)
    }

    /// Rotate counterclockwise about the polygon's own centroid
    pub fn rotate(&self, degrees: f32) -> Polygon {
        let pivot = self.centroid();
        self.map_vertices(|v| v.rotate_about(pivot, degrees))
    }

    /// Scale about the centroid; non-positive factors leave the polygon unchanged
    pub fn scale(&self, factor: f32) -> Polygon {
        if !(factor > 0.0) {
            return self.clone();
        }
        let pivot = self.centroid();
        self.map_vertices(|v| pivot + (v - pivot) * factor)
    }
}

impl TryFrom<Vec<Point>> for Polygon {
    type Error = GeometryError;

    fn try_from(vertices: Vec<Point>) -> Result<Self, Self::Error> {
        Polygon::new(vertices)
    }
}

impl From<Polygon> for Vec<Point> {
    fn from(polygon: Polygon) -> Self {
        polygon.vertices
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn p(x: f32, y: f32) -> Point {
        Point::new(x, y)
    }

    fn square(x: f32, y: f32, size: f32) -> Polygon {
        Polygon::new(vec![p(x, y), p(x + size, y), p(x + size, y + size), p(x, y + size)]).unwrap()
    }

    #[test]
    fn test_construction_rejects_degenerate_input() {
        assert_eq!(
            Polygon::new(vec![p(0.0, 0.0), p(1.0, 0.0)]),
            Err(GeometryError::TooFewVertices(2))
        );
        assert_eq!(
            Polygon::new(vec![p(0.0, 0.0), p(1.0, 0.0), p(0.0, 0.0)]),
            Err(GeometryError::DuplicateVertex(2))
        );
        assert!(matches!(
            Polygon::new(vec![p(0.0, 0.0), p(1.0, 0.0), p(2.0, 0.0), p(1.0, 1.0)]),
            Err(GeometryError::CollinearVertex(_))
        ));
        assert!(Polygon::triangle(p(0.0, 0.0), p(1.0, 1.0), p(2.0, 2.0)).is_err());
    }

    #[test]
    fn test_bowtie_is_self_intersecting() {
        let bowtie = Polygon::new(vec![p(0.0, 0.0), p(2.0, 2.0), p(2.0, 0.0), p(0.0, 2.0)]);
        assert_eq!(bowtie, Err(GeometryError::SelfIntersecting(0, 2)));
    }

    #[test]
    fn test_rectangle_validation() {
        assert!(Polygon::rect(p(0.0, 0.0), 4.0, 2.0).is_ok());
        assert!(Polygon::rect(p(0.0, 0.0), 0.0, 2.0).is_err());
        // a rhombus has equal opposite sides but no right angles
        let rhombus = vec![p(0.0, 0.0), p(2.0, 0.0), p(3.0, 1.0), p(1.0, 1.0)];
        assert_eq!(Polygon::rectangle(rhombus), Err(GeometryError::NotRectangle));
        let tilted = vec![p(0.0, 0.0), p(1.0, 1.0), p(0.0, 2.0), p(-1.0, 1.0)];
        assert!(Polygon::rectangle(tilted).is_ok());
    }

    #[test]
    fn test_perimeter_area_centroid() {
        let sq = square(0.0, 0.0, 2.0);
        assert!((sq.perimeter() - 8.0).abs() < 1e-6);
        assert!((sq.area() - 4.0).abs() < 1e-6);
        assert_eq!(sq.centroid(), p(1.0, 1.0));

        let centered = square(-1.0, -1.0, 2.0);
        let c = centered.centroid();
        assert_eq!(c, p(0.0, 0.0));
        assert!(c.x.is_sign_positive() && c.y.is_sign_positive());
    }

    #[test]
    fn test_contains() {
        let sq = square(0.0, 0.0, 2.0);
        assert!(sq.contains(p(1.0, 1.0)));
        assert!(!sq.contains(p(3.0, 1.0)));
        assert!(!sq.contains(p(-0.5, 1.0)));
    }

    #[test]
    fn test_polygon_polygon_intersection() {
        let a = square(0.0, 0.0, 2.0);
        assert!(a.intersects(&square(1.0, 1.0, 2.0)));
        assert!(!a.intersects(&square(5.0, 5.0, 1.0)));
        // nested without crossing sides
        let inner = square(0.5, 0.5, 0.5);
        assert!(a.intersects(&inner));
        assert!(inner.intersects(&a));
    }

    #[test]
    fn test_aligned_and_identical_overlaps() {
        let a = Polygon::rect(p(0.0, 0.0), 2.0, 1.0).unwrap();
        let shifted = Polygon::rect(p(1.5, 0.0), 2.0, 1.0).unwrap();
        assert!(a.intersects(&shifted));
        assert!(a.intersects(&a.clone()));
    }

    #[test]
    fn test_edge_touching_squares_do_not_intersect() {
        let a = square(0.0, 0.0, 2.0);
        let b = square(2.0, 0.0, 2.0);
        assert!(!a.intersects(&b));
        assert!(!b.intersects(&a));
    }

    #[test]
    fn test_polygon_circle_intersection() {
        let sq = square(0.0, 0.0, 2.0);
        let crossing = Circle::new(p(2.0, 1.0), 0.5).unwrap();
        let inside = Circle::new(p(1.0, 1.0), 0.25).unwrap();
        let around = Circle::new(p(1.0, 1.0), 5.0).unwrap();
        let apart = Circle::new(p(10.0, 1.0), 1.0).unwrap();
        assert!(sq.intersects_circle(&crossing));
        assert!(sq.intersects_circle(&inside));
        assert!(sq.intersects_circle(&around));
        assert!(!sq.intersects_circle(&apart));
    }

    #[test]
    fn test_transforms_return_new_shapes() {
        let sq = square(0.0, 0.0, 2.0);
        let moved = sq.translate(p(3.0, 0.0));
        assert_eq!(moved.centroid(), p(4.0, 1.0));
        assert_eq!(sq.centroid(), p(1.0, 1.0));

        let rotated = sq.rotate(45.0);
        assert!((rotated.centroid() - p(1.0, 1.0)).length() < 1e-5);
        let top = rotated.vertices().iter().map(|v| v.y).fold(f32::MIN, f32::max);
        assert!((top - (1.0 + 2f32.sqrt())).abs() < 1e-4);

        let scaled = sq.scale(2.0);
        assert!((scaled.area() - 16.0).abs() < 1e-4);
        assert!((scaled.centroid() - p(1.0, 1.0)).length() < 1e-5);
    }

    #[test]
    fn test_serde_validates() {
        let json = "[[0.0,0.0],[1.0,0.0],[2.0,0.0]]";
        assert!(serde_json::from_str::<Polygon>(json).is_err());
        let json = "[[0.0,0.0],[1.0,0.0],[0.0,1.0]]";
        assert!(serde_json::from_str::<Polygon>(json).is_ok());
    }

    proptest! {
        #[test]
        fn prop_regular_polygons_build_and_adjacent_sides_do_not_intersect(
            n in 3usize..12,
            radius in 0.5f32..50.0,
            cx in -100.0f32..100.0,
            cy in -100.0f32..100.0,
            phase in 0.0f32..360.0,
        ) {
            let center = Point::new(cx, cy);
            let vertices: Vec<Point> = (0..n)
                .map(|i| center + crate::polar_to_cartesian(radius, phase + 360.0 * i as f32 / n as f32))
                .collect();
            let polygon = Polygon::new(vertices).unwrap();
            let sides = polygon.sides();
            for i in 0..n {
                let next = &sides[(i + 1) % n];
                prop_assert!(!sides[i].intersects(next));
                prop_assert!(!next.intersects(&sides[i]));
            }
        }
    }
}
