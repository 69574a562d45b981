//! Entities and spawn records
//!
//! Entities are addressed through generational handles: a handle to a
//! retired entity stays invalid even after its slot is reused, so behaviors
//! and delayed actions can hold handles without extending any lifetime.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::behavior::Behavior;
use super::collider::Collider;
use super::transform::Transform;
use crate::error::GeometryError;
use crate::geom::{Circle, Point, Polygon, Shape};
use crate::platform::{AssetCatalog, FrameHandle, FrameSequence};

/// Generational handle to an entity in the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId {
    index: u32,
    generation: u32,
}

impl EntityId {
    /// Handle of an entity not (yet) registered in a world
    pub const NULL: EntityId = EntityId {
        index: u32::MAX,
        generation: 0,
    };

    pub(crate) fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    #[inline]
    pub fn index(&self) -> u32 {
        self.index
    }

    #[inline]
    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn is_null(&self) -> bool {
        self.index == u32::MAX
    }
}

impl Default for EntityId {
    fn default() -> Self {
        EntityId::NULL
    }
}

/// Kinematic state of an entity, mutated by its behavior once per frame
#[derive(Debug, Clone)]
pub struct Body {
    pub transform: Transform,
    pub collider: Collider,
    /// Displacement applied per frame
    pub velocity: Vec2,
    /// Layer change applied per frame
    pub layer_delta: i32,
    /// Rotation applied per frame (degrees)
    pub rotation_speed: f32,
    /// Scale change applied per frame
    pub scale_delta: f32,
    pub frames: FrameSequence,
    /// Simulation time at which `frames` started playing
    pub frames_started: f32,
}

impl Body {
    pub fn new(transform: Transform, local_shape: Shape) -> Self {
        let collider = Collider::new(local_shape, &transform);
        Self {
            transform,
            collider,
            velocity: Vec2::ZERO,
            layer_delta: 0,
            rotation_speed: 0.0,
            scale_delta: 0.0,
            frames: FrameSequence::default(),
            frames_started: 0.0,
        }
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.transform.position
    }

    /// Zero every per-frame motion scalar
    pub fn halt(&mut self) {
        self.velocity = Vec2::ZERO;
        self.layer_delta = 0;
        self.rotation_speed = 0.0;
        self.scale_delta = 0.0;
    }

    /// Start playing a new frame sequence
    pub fn play(&mut self, frames: FrameSequence, now: f32) {
        self.frames = frames;
        self.frames_started = now;
    }

    pub fn current_frame(&self, now: f32) -> Option<FrameHandle> {
        self.frames.frame_at(now - self.frames_started)
    }
}

/// The aggregate simulated object
#[derive(Debug, Clone)]
pub struct Entity {
    /// Assigned when the entity is added to a world
    pub id: EntityId,
    /// Category name; entities sharing a name never collide with each other
    pub name: String,
    pub body: Body,
    pub behavior: Behavior,
}

impl Entity {
    pub fn new(name: impl Into<String>, body: Body, behavior: Behavior) -> Self {
        Self {
            id: EntityId::NULL,
            name: name.into(),
            body,
            behavior,
        }
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.behavior.is_enabled()
    }

    #[inline]
    pub fn layer(&self) -> i32 {
        self.body.transform.layer
    }
}

/// Collider shape description, authored facing angle 0 around the origin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShapeSpec {
    Circle { radius: f32 },
    Rect { width: f32, height: f32 },
    /// Isosceles triangle whose apex points along +x
    Triangle { length: f32, width: f32 },
    Polygon { points: Vec<Point> },
}

impl ShapeSpec {
    /// Build the local shape, turned to `angle` degrees
    pub fn build(&self, angle: f32) -> Result<Shape, GeometryError> {
        let shape: Shape = match self {
            ShapeSpec::Circle { radius } => Circle::new(Point::ZERO, *radius)?.into(),
            ShapeSpec::Rect { width, height } => Polygon::rect(Point::ZERO, *width, *height)?.into(),
            ShapeSpec::Triangle { length, width } => {
                if !(*length > 0.0 && *width > 0.0) {
                    return Err(GeometryError::InvalidDimensions {
                        width: *width,
                        height: *length,
                    });
                }
                // centroid at the origin
                Polygon::triangle(
                    Point::new(length * 2.0 / 3.0, 0.0),
                    Point::new(-length / 3.0, width / 2.0),
                    Point::new(-length / 3.0, -width / 2.0),
                )?
                .into()
            }
            ShapeSpec::Polygon { points } => Polygon::new(points.clone())?.into(),
        };
        Ok(if angle != 0.0 { shape.rotate(angle) } else { shape })
    }
}

fn default_scale() -> f32 {
    1.0
}

/// Plain initial-state record for one entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySpec {
    pub name: String,
    pub position: Vec2,
    #[serde(default)]
    pub layer: i32,
    #[serde(default)]
    pub angle: f32,
    #[serde(default = "default_scale")]
    pub scale: f32,
    pub shape: ShapeSpec,
    #[serde(default)]
    pub velocity: Vec2,
    #[serde(default)]
    pub layer_delta: i32,
    #[serde(default)]
    pub rotation_speed: f32,
    #[serde(default)]
    pub scale_delta: f32,
    /// Asset name of the idle frame sequence
    #[serde(default)]
    pub frames: Option<String>,
}

impl EntitySpec {
    pub fn new(name: impl Into<String>, position: Vec2, angle: f32, shape: ShapeSpec) -> Self {
        Self {
            name: name.into(),
            position,
            layer: 0,
            angle,
            scale: 1.0,
            shape,
            velocity: Vec2::ZERO,
            layer_delta: 0,
            rotation_speed: 0.0,
            scale_delta: 0.0,
            frames: None,
        }
    }

    pub fn with_layer(mut self, layer: i32) -> Self {
        self.layer = layer;
        self
    }

    pub fn with_frames(mut self, asset: impl Into<String>) -> Self {
        self.frames = Some(asset.into());
        self
    }

    /// Assemble an unregistered entity driven by `behavior`
    pub fn build(
        &self,
        behavior: Behavior,
        assets: &dyn AssetCatalog,
    ) -> Result<Entity, GeometryError> {
        let mut transform = Transform::new(self.position, self.layer, self.angle);
        transform.set_scale(self.scale);
        let mut body = Body::new(transform, self.shape.build(self.angle)?);
        body.velocity = self.velocity;
        body.layer_delta = self.layer_delta;
        body.rotation_speed = self.rotation_speed;
        body.scale_delta = self.scale_delta;
        if let Some(frames) = self.frames.as_deref().and_then(|name| assets.frames(name)) {
            body.frames = frames;
        }
        Ok(Entity::new(self.name.clone(), body, behavior))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::StaticAssets;

    #[test]
    fn test_null_handle() {
        assert!(EntityId::NULL.is_null());
        assert!(EntityId::default().is_null());
        assert!(!EntityId::new(0, 0).is_null());
    }

    #[test]
    fn test_triangle_spec_points_along_angle() {
        let shape = ShapeSpec::Triangle { length: 3.0, width: 2.0 }.build(90.0).unwrap();
        let Shape::Polygon { polygon } = shape else {
            panic!("triangle spec should build a polygon");
        };
        let apex = polygon.vertices()[0];
        assert!((apex - Point::new(0.0, 2.0)).length() < 1e-4);
    }

    #[test]
    fn test_invalid_specs_fail() {
        assert!(ShapeSpec::Circle { radius: 0.0 }.build(0.0).is_err());
        assert!(ShapeSpec::Rect { width: -1.0, height: 1.0 }.build(0.0).is_err());
        assert!(ShapeSpec::Triangle { length: 0.0, width: 1.0 }.build(0.0).is_err());
        let collinear = ShapeSpec::Polygon {
            points: vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0), Point::new(2.0, 2.0)],
        };
        assert!(matches!(collinear.build(0.0), Err(GeometryError::CollinearVertex(_))));
    }

    #[test]
    fn test_entity_spec_from_json() {
        let json = r#"{
            "name": "player",
            "position": [30.0, 5.0],
            "angle": 90.0,
            "shape": { "kind": "rect", "width": 3.0, "height": 2.0 },
            "frames": "player_idle"
        }"#;
        let spec: EntitySpec = serde_json::from_str(json).unwrap();
        assert_eq!(spec.scale, 1.0);
        let entity = spec.build(Behavior::basic(), &StaticAssets::default()).unwrap();
        assert!(entity.id.is_null());
        assert_eq!(entity.body.position(), Vec2::new(30.0, 5.0));
        assert_eq!(entity.body.transform.angle(), 90.0);
        // rect authored along +x, turned to face up
        assert!((entity.body.collider.width() - 2.0).abs() < 1e-4);
        assert!(entity.body.current_frame(0.0).is_some());
    }
}
