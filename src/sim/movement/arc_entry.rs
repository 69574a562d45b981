//! Arc entry: quarter-circle ascent, a full lasso loop, then a straight
//! run into the formation slot.

use glam::Vec2;

use super::{TIME_STEP, Side, steer, turn_towards};
use crate::consts::FACING_DOWN;
use crate::polar_to_cartesian;
use crate::sim::entity::Body;

const ASCENT_RADIUS: f32 = 10.0;
const LOOP_RADIUS: f32 = 6.0;
const ASCENT_DURATION: f32 = 1.0;
const LOOP_DURATION: f32 = 1.5;
const APPROACH_DURATION: f32 = 1.0;

#[derive(Debug, Clone, PartialEq)]
pub struct ArcEntry {
    side: Side,
    target: Vec2,
    active: bool,
    t: f32,
    anchor: Option<Vec2>,
}

impl ArcEntry {
    pub fn new(side: Side, target: Vec2) -> Self {
        Self {
            side,
            target,
            active: false,
            t: 0.0,
            anchor: None,
        }
    }

    pub fn target(&self) -> Vec2 {
        self.target
    }

    pub fn total_duration() -> f32 {
        ASCENT_DURATION + LOOP_DURATION + APPROACH_DURATION
    }

    pub fn activate(&mut self, active: bool) {
        self.active = active;
        if !active {
            self.t = 0.0;
            self.anchor = None;
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Position on the path `t` time units after leaving `anchor`
    fn position_at(&self, anchor: Vec2, t: f32) -> Vec2 {
        let s = self.side.sign();
        let ascent_center = anchor + Vec2::new(s * ASCENT_RADIUS, 0.0);
        // anchor sits on the ascent circle's outer side
        let base = if s > 0.0 { 180.0 } else { 0.0 };
        if t < ASCENT_DURATION {
            let u = t / ASCENT_DURATION;
            return ascent_center + polar_to_cartesian(ASCENT_RADIUS, base - s * 90.0 * u);
        }

        let top = ascent_center + Vec2::new(0.0, ASCENT_RADIUS);
        let t = t - ASCENT_DURATION;
        if t < LOOP_DURATION {
            let u = t / LOOP_DURATION;
            let loop_center = top - Vec2::new(0.0, LOOP_RADIUS);
            return loop_center + polar_to_cartesian(LOOP_RADIUS, 90.0 - s * 360.0 * u);
        }

        let u = ((t - LOOP_DURATION) / APPROACH_DURATION).min(1.0);
        top.lerp(self.target, u)
    }

    pub fn advance(&mut self, body: &mut Body) {
        if !self.active {
            return;
        }
        let anchor = *self.anchor.get_or_insert(body.position());

        if self.t >= Self::total_duration() {
            // settle orientation before handing the body back
            if turn_towards(body, FACING_DOWN) {
                self.activate(false);
            }
            return;
        }

        let p0 = self.position_at(anchor, self.t);
        let p1 = self.position_at(anchor, self.t + TIME_STEP);
        steer(body, p0, p1);
        self.t += TIME_STEP;
    }
}
