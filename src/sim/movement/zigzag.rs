//! Zigzag: lateral two-beat oscillation around the current position, used
//! to shake a settled formation. Vertical position is never touched.

use glam::Vec2;

use crate::sim::entity::Body;

/// Abstract time added per call
const STEP: f32 = 45.0;
const PERIOD: f32 = 90.0;
const AMPLITUDE: f32 = 0.5;

/// Two-beat lateral oscillation; never moves vertically
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Zigzag {
    active: bool,
    t: f32,
}

impl Zigzag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn activate(&mut self, active: bool) {
        self.active = active;
        if !active {
            self.t = 0.0;
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn advance(&mut self, body: &mut Body) {
        if !self.active {
            return;
        }
        let phase = self.t.rem_euclid(PERIOD);
        let sign = if phase < PERIOD / 2.0 { 1.0 } else { -1.0 };
        body.velocity = Vec2::new(sign * AMPLITUDE, 0.0);
        body.rotation_speed = 0.0;
        self.t += STEP;
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::super::test_support::*;
    use super::*;

    #[test]
    fn test_two_beat_displacement() {
        let mut body = body_at(Vec2::new(1.0, 2.0), 90.0);
        let mut zigzag = Zigzag::new();
        zigzag.activate(true);
        let mut xs = Vec::new();
        for _ in 0..4 {
            zigzag.advance(&mut body);
            xs.push(body.velocity.x);
            apply(&mut body);
            assert!((body.position().x - 1.0).abs() <= AMPLITUDE + 1e-6);
            assert_eq!(body.position().y, 2.0);
        }
        assert_eq!(xs, vec![0.5, -0.5, 0.5, -0.5]);
        assert_eq!(body.transform.angle(), 90.0);
    }

    #[test]
    fn test_inactive_zigzag_leaves_body_alone() {
        let mut body = body_at(Vec2::new(1.0, 2.0), 90.0);
        body.velocity = Vec2::new(0.0, -1.0);
        let mut zigzag = Zigzag::new();
        zigzag.advance(&mut body);
        assert_eq!(body.velocity, Vec2::new(0.0, -1.0));
    }

    proptest! {
        #[test]
        fn prop_vertical_coordinate_is_invariant(
            x in -100.0f32..100.0,
            y in -100.0f32..100.0,
            calls in 1usize..200,
        ) {
            let mut body = body_at(Vec2::new(x, y), 90.0);
            let mut zigzag = Zigzag::new();
            zigzag.activate(true);
            for _ in 0..calls {
                zigzag.advance(&mut body);
                apply(&mut body);
                prop_assert_eq!(body.position().y, y);
            }
        }
    }
}
