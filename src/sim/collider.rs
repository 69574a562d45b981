//! Collision shape kept in step with an entity transform
//!
//! The collider caches its world-space shape and applies only what changed
//! since the last sync, instead of rebuilding the shape every frame.

use glam::Vec2;

use super::transform::Transform;
use crate::geom::{Bounds, Shape};

#[derive(Debug, Clone, PartialEq)]
pub struct Collider {
    /// World-space shape
    shape: Shape,
    /// Transform state the shape currently reflects
    synced_position: Vec2,
    synced_angle: f32,
    synced_scale: f32,
}

impl Collider {
    /// Place a shape authored around the local origin onto `transform`.
    ///
    /// The authored orientation is taken to match the transform's angle.
    pub fn new(local_shape: Shape, transform: &Transform) -> Self {
        let mut collider = Self {
            shape: local_shape.translate(transform.position),
            synced_position: transform.position,
            synced_angle: transform.angle(),
            synced_scale: 1.0,
        };
        collider.update_scale(transform);
        collider
    }

    #[inline]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Apply the rotation accumulated since the last sync
    pub fn update_rotation(&mut self, transform: &Transform) {
        let delta = crate::shortest_rotation(self.synced_angle, transform.angle());
        if delta != 0.0 {
            self.shape = self.shape.rotate(delta);
        }
        self.synced_angle = transform.angle();
    }

    pub fn update_position(&mut self, transform: &Transform) {
        let offset = transform.position - self.synced_position;
        if offset != Vec2::ZERO {
            self.shape = self.shape.translate(offset);
        }
        self.synced_position = transform.position;
    }

    /// Follow the transform's scale, never shrinking below authored size
    pub fn update_scale(&mut self, transform: &Transform) {
        let target = transform.scale().max(1.0);
        if target != self.synced_scale {
            self.shape = self.shape.scale(target / self.synced_scale);
            self.synced_scale = target;
        }
    }

    /// Rotation, then position, then scale
    pub fn sync_all(&mut self, transform: &Transform) {
        self.update_rotation(transform);
        self.update_position(transform);
        self.update_scale(transform);
    }

    pub fn intersects(&self, other: &Collider) -> bool {
        self.shape.intersects(&other.shape)
    }

    pub fn bounds(&self) -> Bounds {
        self.shape.bounds()
    }

    /// Logical width for renderers
    pub fn width(&self) -> f32 {
        self.bounds().width()
    }

    /// Logical height for renderers
    pub fn height(&self) -> f32 {
        self.bounds().height()
    }

    /// Debug overlay hook; drawing belongs to the rendering collaborator
    pub fn debug_draw(&self) {}
}
