//! Attack strategies
//!
//! Straight and homing attacks spawn a projectile entity that the caller
//! inserts into the world. The kamikaze attack spawns nothing: it takes over
//! the attacker's own motion, winding up on one full circle and then
//! charging straight at the target.

use glam::Vec2;

use super::behavior::Behavior;
use super::entity::{Body, Entity, EntityId};
use super::movement::steer;
use super::transform::Transform;
use crate::consts::{KAMIKAZE_CHARGE_SPEED, PROJECTILE_RADIUS, PROJECTILE_SPAWN_OFFSET};
use crate::error::{AttackError, GeometryError};
use crate::geom::{Circle, Point, Shape};
use crate::platform::FrameSequence;
use crate::{heading_degrees, polar_to_cartesian};

/// Radius of the kamikaze wind-up loop
const WIND_UP_RADIUS: f32 = 5.0;
/// Degrees of wind-up swept per call
const WIND_UP_STEP: f32 = 6.0;

/// The entity performing an attack
#[derive(Debug)]
pub struct Attacker<'a> {
    pub id: EntityId,
    pub body: &'a mut Body,
}

/// Where the attack is aimed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
    pub id: EntityId,
    pub position: Vec2,
}

/// Everything needed to spawn one projectile
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectileTemplate {
    name: String,
    shape: Shape,
    speed: f32,
    frames: FrameSequence,
}

impl ProjectileTemplate {
    /// `name` should be the shooter's category so friendly fire is skipped
    pub fn new(
        name: impl Into<String>,
        speed: f32,
        frames: FrameSequence,
    ) -> Result<Self, GeometryError> {
        Ok(Self {
            name: name.into(),
            shape: Circle::new(Point::ZERO, PROJECTILE_RADIUS)?.into(),
            speed,
            frames,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Spawn a projectile ahead of `origin`, travelling along `heading`
    pub fn fire(&self, origin: &Transform, heading: f32, now: f32) -> Entity {
        let position = origin.position + polar_to_cartesian(PROJECTILE_SPAWN_OFFSET, heading);
        let mut body = Body::new(Transform::new(position, origin.layer, heading), self.shape.clone());
        body.velocity = polar_to_cartesian(self.speed, heading);
        body.play(self.frames.clone(), now);
        Entity::new(self.name.clone(), body, Behavior::basic())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KamikazePhase {
    WindUp,
    Charge,
}

/// Two-state suicide run
#[derive(Debug, Clone, PartialEq)]
pub struct Kamikaze {
    phase: KamikazePhase,
    /// Degrees of wind-up completed
    swept: f32,
    center: Option<Vec2>,
}

impl Default for Kamikaze {
    fn default() -> Self {
        Self {
            phase: KamikazePhase::WindUp,
            swept: 0.0,
            center: None,
        }
    }
}

impl Kamikaze {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_charging(&self) -> bool {
        self.phase == KamikazePhase::Charge
    }

    pub fn swept(&self) -> f32 {
        self.swept
    }

    /// Whether the run has started and owns the body's motion
    pub fn is_engaged(&self) -> bool {
        self.is_charging() || self.swept > 0.0
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn advance(&mut self, body: &mut Body, target: Vec2) {
        match self.phase {
            KamikazePhase::WindUp => {
                // the body starts at the top of the loop
                let center = *self
                    .center
                    .get_or_insert(body.position() - Vec2::new(0.0, WIND_UP_RADIUS));
                let a0 = 90.0 + self.swept;
                let a1 = a0 + WIND_UP_STEP;
                steer(
                    body,
                    center + polar_to_cartesian(WIND_UP_RADIUS, a0),
                    center + polar_to_cartesian(WIND_UP_RADIUS, a1),
                );
                self.swept += WIND_UP_STEP;
                if self.swept >= 360.0 {
                    self.phase = KamikazePhase::Charge;
                }
            }
            KamikazePhase::Charge => {
                let position = body.position();
                let direction = (target - position).normalize_or_zero();
                steer(body, position, position + direction * KAMIKAZE_CHARGE_SPEED);
            }
        }
    }
}

/// Closed set of attack strategies
#[derive(Debug, Clone, PartialEq)]
pub enum AttackStrategy {
    /// Fire along the attacker's facing
    Straight(ProjectileTemplate),
    /// Fire along the line to the target, aimed once at spawn
    Homing(ProjectileTemplate),
    Kamikaze(Kamikaze),
}

impl AttackStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            AttackStrategy::Straight(_) => "straight",
            AttackStrategy::Homing(_) => "homing",
            AttackStrategy::Kamikaze(_) => "kamikaze",
        }
    }

    /// Whether this attack currently drives the attacker's movement
    pub fn controls_motion(&self) -> bool {
        matches!(self, AttackStrategy::Kamikaze(k) if k.is_engaged())
    }

    /// Run one attack step.
    ///
    /// Returns the spawned projectile, if any; it is not yet part of any
    /// world. A missing attacker or target, or an attacker aimed at itself,
    /// is rejected.
    pub fn execute(
        &mut self,
        attacker: Option<Attacker<'_>>,
        target: Option<Target>,
        now: f32,
    ) -> Result<Option<Entity>, AttackError> {
        let attacker = attacker.ok_or(AttackError::MissingAttacker)?;
        let target = target.ok_or(AttackError::MissingTarget)?;
        if attacker.id == target.id {
            return Err(AttackError::SelfTarget);
        }

        Ok(match self {
            AttackStrategy::Straight(projectile) => {
                let origin = &attacker.body.transform;
                Some(projectile.fire(origin, origin.angle(), now))
            }
            AttackStrategy::Homing(projectile) => {
                let origin = &attacker.body.transform;
                let heading = heading_degrees(origin.position, target.position);
                Some(projectile.fire(origin, heading, now))
            }
            AttackStrategy::Kamikaze(kamikaze) => {
                kamikaze.advance(attacker.body, target.position);
                None
            }
        })
    }
}
