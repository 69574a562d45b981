//! Time-driven movement strategies
//!
//! Every strategy is a small state machine over motion phases. It owns a
//! local clock advanced by a fixed increment per call (never wall time), so
//! a given call sequence always replays identically. Positions come from a
//! closed-form or piecewise function of that clock and the body's velocity
//! is the finite difference `position(t + step) - position(t)`: the behavior
//! then moves the body by exactly that amount, which keeps every phase
//! change continuous in position.
//!
//! Deactivating a strategy clears its clock and anchors; the next
//! activation re-anchors on wherever the body is at that moment.

mod arc_entry;
mod patrol;
mod side_entry;
mod sweep;
mod zigzag;

pub use arc_entry::ArcEntry;
pub use patrol::CircularPatrol;
pub use side_entry::SideEntry;
pub use sweep::TopDownSweep;
pub use zigzag::Zigzag;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::Body;
use crate::consts::{ANGLE_EPSILON, MAX_TURN_PER_FRAME};
use crate::{heading_degrees, shortest_rotation};

/// Clock increment per call for the phased strategies
pub const TIME_STEP: f32 = 1.0 / 60.0;

/// Remaining rotation (degrees) below which a turn counts as finished
const SETTLED_EPSILON: f32 = 1e-3;

/// Which side of the arena a mirrored pattern starts from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// +1 for patterns travelling rightwards from the left edge, -1 otherwise
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Side::Left => 1.0,
            Side::Right => -1.0,
        }
    }

    pub fn mirrored(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// Closed set of movement strategies
#[derive(Debug, Clone, PartialEq)]
pub enum MovementStrategy {
    ArcEntry(ArcEntry),
    SideEntry(SideEntry),
    CircularPatrol(CircularPatrol),
    Zigzag(Zigzag),
    TopDownSweep(TopDownSweep),
}

impl MovementStrategy {
    pub fn activate(&mut self, active: bool) {
        match self {
            MovementStrategy::ArcEntry(s) => s.activate(active),
            MovementStrategy::SideEntry(s) => s.activate(active),
            MovementStrategy::CircularPatrol(s) => s.activate(active),
            MovementStrategy::Zigzag(s) => s.activate(active),
            MovementStrategy::TopDownSweep(s) => s.activate(active),
        }
    }

    pub fn is_active(&self) -> bool {
        match self {
            MovementStrategy::ArcEntry(s) => s.is_active(),
            MovementStrategy::SideEntry(s) => s.is_active(),
            MovementStrategy::CircularPatrol(s) => s.is_active(),
            MovementStrategy::Zigzag(s) => s.is_active(),
            MovementStrategy::TopDownSweep(s) => s.is_active(),
        }
    }

    /// Set the body's velocity and rotation speed for this frame
    pub fn advance(&mut self, body: &mut Body) {
        match self {
            MovementStrategy::ArcEntry(s) => s.advance(body),
            MovementStrategy::SideEntry(s) => s.advance(body),
            MovementStrategy::CircularPatrol(s) => s.advance(body),
            MovementStrategy::Zigzag(s) => s.advance(body),
            MovementStrategy::TopDownSweep(s) => s.advance(body),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            MovementStrategy::ArcEntry(_) => "arc_entry",
            MovementStrategy::SideEntry(_) => "side_entry",
            MovementStrategy::CircularPatrol(_) => "circular_patrol",
            MovementStrategy::Zigzag(_) => "zigzag",
            MovementStrategy::TopDownSweep(_) => "top_down_sweep",
        }
    }

    pub fn is_zigzag(&self) -> bool {
        matches!(self, MovementStrategy::Zigzag(_))
    }

    /// Start in the active state
    pub fn activated(mut self) -> Self {
        self.activate(true);
        self
    }
}

/// Move along `p0 -> p1` this frame and face the direction of travel
pub(crate) fn steer(body: &mut Body, p0: Vec2, p1: Vec2) {
    let velocity = p1 - p0;
    body.velocity = velocity;
    body.rotation_speed = if velocity.length_squared() > 1e-12 {
        shortest_rotation(body.transform.angle(), heading_degrees(p0, p1))
    } else {
        0.0
    };
}

/// Hold position and turn towards `target` at a bounded rate.
///
/// The last correction lands exactly on the target. Returns true only once
/// the body already faces it, with the rotation speed zeroed so nothing
/// keeps turning after the caller hands the body back.
pub(crate) fn turn_towards(body: &mut Body, target: f32) -> bool {
    body.velocity = Vec2::ZERO;
    let delta = shortest_rotation(body.transform.angle(), target);
    if delta.abs() <= SETTLED_EPSILON {
        body.rotation_speed = 0.0;
        return true;
    }
    body.rotation_speed = delta.clamp(-MAX_TURN_PER_FRAME, MAX_TURN_PER_FRAME);
    false
}

/// Whether the body faces `target` within `ANGLE_EPSILON`
pub(crate) fn is_facing(body: &Body, target: f32) -> bool {
    shortest_rotation(body.transform.angle(), target).abs() <= ANGLE_EPSILON
}
