//! Top-down sweep: two sinusoidal descent phases, then an optional run to a
//! target. The body is squared up to face down between phases.

use std::f32::consts::TAU;

use glam::Vec2;

use super::{TIME_STEP, is_facing, steer, turn_towards};
use crate::consts::FACING_DOWN;
use crate::sim::entity::Body;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Wave {
    duration: f32,
    amplitude: f32,
    /// Full oscillations over the phase
    cycles: f32,
    drop: f32,
}

impl Wave {
    fn offset(&self, t: f32) -> Vec2 {
        let u = (t / self.duration).min(1.0);
        Vec2::new(self.amplitude * (TAU * self.cycles * u).sin(), -self.drop * u)
    }
}

const DESCENT: Wave = Wave {
    duration: 1.5,
    amplitude: 6.0,
    cycles: 1.0,
    drop: 20.0,
};
const WEAVE: Wave = Wave {
    duration: 1.5,
    amplitude: 3.0,
    cycles: 2.0,
    drop: 15.0,
};
const APPROACH_DURATION: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Descent,
    Weave,
    Approach,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TopDownSweep {
    target: Option<Vec2>,
    active: bool,
    phase: Phase,
    /// Time within the current phase
    t: f32,
    anchor: Option<Vec2>,
}

impl TopDownSweep {
    pub fn new(target: Option<Vec2>) -> Self {
        Self {
            target,
            active: false,
            phase: Phase::Descent,
            t: 0.0,
            anchor: None,
        }
    }

    pub fn activate(&mut self, active: bool) {
        self.active = active;
        if !active {
            self.phase = Phase::Descent;
            self.t = 0.0;
            self.anchor = None;
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    fn duration(&self) -> f32 {
        match self.phase {
            Phase::Descent => DESCENT.duration,
            Phase::Weave => WEAVE.duration,
            Phase::Approach => APPROACH_DURATION,
        }
    }

    fn position_at(&self, anchor: Vec2, t: f32) -> Vec2 {
        match self.phase {
            Phase::Descent => anchor + DESCENT.offset(t),
            Phase::Weave => anchor + WEAVE.offset(t),
            Phase::Approach => {
                let target = self.target.unwrap_or(anchor);
                anchor.lerp(target, (t / APPROACH_DURATION).min(1.0))
            }
        }
    }

    fn next_phase(&self) -> Option<Phase> {
        match self.phase {
            Phase::Descent => Some(Phase::Weave),
            Phase::Weave => self.target.map(|_| Phase::Approach),
            Phase::Approach => None,
        }
    }

    pub fn advance(&mut self, body: &mut Body) {
        if !self.active {
            return;
        }
        let anchor = *self.anchor.get_or_insert(body.position());

        if self.t >= self.duration() {
            if !is_facing(body, FACING_DOWN) {
                turn_towards(body, FACING_DOWN);
                return;
            }
            match self.next_phase() {
                Some(phase) => {
                    self.phase = phase;
                    self.t = 0.0;
                    self.anchor = None;
                    self.advance(body);
                }
                None => {
                    body.velocity = Vec2::ZERO;
                    body.rotation_speed = 0.0;
                    self.activate(false);
                }
            }
            return;
        }

        let p0 = self.position_at(anchor, self.t);
        let p1 = self.position_at(anchor, self.t + TIME_STEP);
        steer(body, p0, p1);
        self.t += TIME_STEP;
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::super::MovementStrategy;
    use super::*;

    #[test]
    fn test_sweep_descends_and_reaches_target() {
        let start = Vec2::new(30.0, 70.0);
        let target = Vec2::new(30.0, 70.0);
        let mut body = body_at(start, FACING_DOWN);
        let mut strategy = MovementStrategy::TopDownSweep(TopDownSweep::new(Some(target))).activated();

        let mut lowest = start.y;
        for _ in 0..2_000 {
            if !strategy.is_active() {
                break;
            }
            strategy.advance(&mut body);
            apply(&mut body);
            lowest = lowest.min(body.position().y);
        }
        assert!(!strategy.is_active());
        assert!(lowest <= start.y - DESCENT.drop - WEAVE.drop + 1.0);
        assert!((body.position() - target).length() < 1e-2);
    }

    #[test]
    fn test_phase_change_waits_for_canonical_orientation() {
        let mut body = body_at(Vec2::new(30.0, 70.0), FACING_DOWN);
        let mut strategy = TopDownSweep::new(None);
        strategy.activate(true);
        while strategy.phase == Phase::Descent && strategy.t < DESCENT.duration {
            strategy.advance(&mut body);
            apply(&mut body);
        }
        // knock the body off the canonical facing at the boundary
        body.transform.set_angle(200.0);
        strategy.advance(&mut body);
        assert_eq!(strategy.phase, Phase::Descent);
        assert_eq!(body.velocity, Vec2::ZERO);
        while strategy.phase == Phase::Descent {
            strategy.advance(&mut body);
            apply(&mut body);
        }
        assert_eq!(strategy.phase, Phase::Weave);
    }

    #[test]
    fn test_sweep_without_target_stops_after_weave() {
        let mut body = body_at(Vec2::new(10.0, 70.0), FACING_DOWN);
        let mut strategy = MovementStrategy::TopDownSweep(TopDownSweep::new(None)).activated();
        let frames = run_to_completion(&mut strategy, &mut body, 2_000);
        assert!(frames < 2_000);
        assert!((body.position().y - (70.0 - DESCENT.drop - WEAVE.drop)).abs() < 0.1);
    }
}
