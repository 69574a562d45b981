//! Side entry: diagonal slide in from a side, a lasso loop tangent to the
//! slide, then an eased approach to the formation slot. Orientation tracks
//! the heading throughout and is squared up before the strategy finishes.

use glam::Vec2;

use super::{TIME_STEP, Side, steer, turn_towards};
use crate::consts::FACING_DOWN;
use crate::polar_to_cartesian;
use crate::sim::entity::Body;

const SLIDE_OFFSET: Vec2 = Vec2::new(20.0, 15.0);
const LASSO_RADIUS: f32 = 7.0;
const SLIDE_DURATION: f32 = 1.0;
const LASSO_DURATION: f32 = 1.5;
const APPROACH_DURATION: f32 = 1.2;

#[derive(Debug, Clone, PartialEq)]
pub struct SideEntry {
    side: Side,
    target: Vec2,
    active: bool,
    t: f32,
    anchor: Option<Vec2>,
}

impl SideEntry {
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
        SLIDE_DURATION + LASSO_DURATION + APPROACH_DURATION
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

    fn position_at(&self, anchor: Vec2, t: f32) -> Vec2 {
        let s = self.side.sign();
        let slide = Vec2::new(s * SLIDE_OFFSET.x, SLIDE_OFFSET.y);
        let slide_end = anchor + slide;
        if t < SLIDE_DURATION {
            return anchor.lerp(slide_end, t / SLIDE_DURATION);
        }

        let t = t - SLIDE_DURATION;
        if t < LASSO_DURATION {
            // left entries loop counter-clockwise, right entries clockwise
            let heading = slide.normalize_or_zero();
            let center = slide_end + heading.perp() * LASSO_RADIUS * s;
            let start = (slide_end - center).to_angle().to_degrees();
            let u = t / LASSO_DURATION;
            return center + polar_to_cartesian(LASSO_RADIUS, start + s * 360.0 * u);
        }

        let u = ((t - LASSO_DURATION) / APPROACH_DURATION).min(1.0);
        let eased = 1.0 - (1.0 - u) * (1.0 - u);
        slide_end.lerp(self.target, eased)
    }

    pub fn advance(&mut self, body: &mut Body) {
        if !self.active {
            return;
        }
        let anchor = *self.anchor.get_or_insert(body.position());

        if self.t >= Self::total_duration() {
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
