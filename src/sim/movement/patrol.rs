//! Circular patrol: a chain of sub-circles, small then large then small then
//! a return loop, followed by a straight homing run back to the origin.

use glam::Vec2;

use super::{Side, steer};
use crate::polar_to_cartesian;
use crate::sim::entity::Body;

/// (radius, swept degrees) per sub-circle
const LEGS: [(f32, f32); 4] = [(4.0, 180.0), (9.0, 180.0), (4.0, 180.0), (6.0, 90.0)];
/// Degrees swept per call
const ANGULAR_STEP: f32 = 3.0;
const HOMING_SPEED: f32 = 0.4;
const HOMING_EPSILON: f32 = 1e-3;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Leg {
    Circle {
        index: usize,
        center: Vec2,
        radius: f32,
        /// Angle of the body as seen from `center`
        angle: f32,
        swept: f32,
    },
    Homing,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CircularPatrol {
    side: Side,
    active: bool,
    /// Total degrees swept since activation
    t: f32,
    origin: Option<Vec2>,
    leg: Option<Leg>,
}

impl CircularPatrol {
    pub fn new(side: Side) -> Self {
        Self {
            side,
            active: false,
            t: 0.0,
            origin: None,
            leg: None,
        }
    }

    pub fn activate(&mut self, active: bool) {
        self.active = active;
        if !active {
            self.t = 0.0;
            self.origin = None;
            self.leg = None;
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn origin(&self) -> Option<Vec2> {
        self.origin
    }

    /// Degrees swept across all sub-circles so far
    pub fn swept(&self) -> f32 {
        self.t
    }

    /// Left patrols dive clockwise off the right of their first circle,
    /// right patrols mirror that.
    fn direction(&self) -> f32 {
        -self.side.sign()
    }

    fn first_leg(&self, origin: Vec2) -> Leg {
        let (radius, _) = LEGS[0];
        let s = self.side.sign();
        Leg::Circle {
            index: 0,
            center: origin - Vec2::new(s * radius, 0.0),
            radius,
            angle: if s > 0.0 { 0.0 } else { 180.0 },
            swept: 0.0,
        }
    }

    pub fn advance(&mut self, body: &mut Body) {
        if !self.active {
            return;
        }
        let origin = *self.origin.get_or_insert(body.position());
        let leg = match self.leg {
            Some(leg) => leg,
            None => self.first_leg(origin),
        };

        self.leg = Some(match leg {
            Leg::Circle {
                index,
                center,
                radius,
                angle,
                swept,
            } => {
                let sweep = LEGS[index].1;
                let step = ANGULAR_STEP.min(sweep - swept);
                let next_angle = angle + self.direction() * step;
                let p0 = center + polar_to_cartesian(radius, angle);
                let p1 = center + polar_to_cartesian(radius, next_angle);
                steer(body, p0, p1);
                self.t += step;

                if swept + step < sweep {
                    Leg::Circle {
                        index,
                        center,
                        radius,
                        angle: next_angle,
                        swept: swept + step,
                    }
                } else if let Some(&(next_radius, _)) = LEGS.get(index + 1) {
                    // same radial line, so the hand-off is tangent-continuous
                    let inward = (center - p1).normalize_or_zero();
                    Leg::Circle {
                        index: index + 1,
                        center: p1 + inward * next_radius,
                        radius: next_radius,
                        angle: next_angle,
                        swept: 0.0,
                    }
                } else {
                    Leg::Homing
                }
            }
            Leg::Homing => {
                let position = body.position();
                let remaining = origin - position;
                let distance = remaining.length();
                if distance <= HOMING_EPSILON {
                    body.velocity = Vec2::ZERO;
                    body.rotation_speed = 0.0;
                    self.activate(false);
                    return;
                }
                let step = remaining / distance * distance.min(HOMING_SPEED);
                steer(body, position, position + step);
                Leg::Homing
            }
        });
    }
}
