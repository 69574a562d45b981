//! Per-entity spatial state

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::{normalize_degrees, polar_to_cartesian, shortest_rotation};

/// Position, layer, orientation and scale of an entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec2,
    pub layer: i32,
    /// Orientation in degrees, always in [0, 360)
    angle: f32,
    /// Orientation before the most recent rotation
    previous_angle: f32,
    /// Uniform scale factor (1.0 = authored size)
    scale: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self::new(Vec2::ZERO, 0, 0.0)
    }
}

impl Transform {
    pub fn new(position: Vec2, layer: i32, angle: f32) -> Self {
        let angle = normalize_degrees(angle);
        Self {
            position,
            layer,
            angle,
            previous_angle: angle,
            scale: 1.0,
        }
    }

    #[inline]
    pub fn angle(&self) -> f32 {
        self.angle
    }

    #[inline]
    pub fn previous_angle(&self) -> f32 {
        self.previous_angle
    }

    #[inline]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Signed change applied by the most recent rotation
    pub fn rotation_delta(&self) -> f32 {
        shortest_rotation(self.previous_angle, self.angle)
    }

    /// Unit vector along the current orientation
    pub fn facing(&self) -> Vec2 {
        polar_to_cartesian(1.0, self.angle)
    }

    pub fn move_by(&mut self, delta: Vec2) {
        self.position += delta;
    }

    pub fn move_to(&mut self, position: Vec2) {
        self.position = position;
    }

    pub fn rotate(&mut self, degrees: f32) {
        self.previous_angle = self.angle;
        self.angle = normalize_degrees(self.angle + degrees);
    }

    pub fn set_angle(&mut self, degrees: f32) {
        self.previous_angle = self.angle;
        self.angle = normalize_degrees(degrees);
    }

    /// Grow (or shrink) by an additive delta; scale never drops below zero
    pub fn scale_by(&mut self, delta: f32) {
        self.scale = (self.scale + delta).max(0.0);
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale.max(0.0);
    }

    pub fn shift_layer(&mut self, delta: i32) {
        self.layer += delta;
    }
}
