//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by layer, then insertion)
//! - No rendering or platform dependencies beyond the `platform` traits

pub mod attack;
pub mod behavior;
pub mod collider;
pub mod entity;
pub mod formation;
pub mod movement;
pub mod state;
pub mod tick;
pub mod timers;
pub mod transform;

pub use attack::{AttackStrategy, Kamikaze, ProjectileTemplate};
pub use behavior::{Behavior, BehaviorKind, BehaviorState, EnemyBehavior, PlayerBehavior};
pub use collider::Collider;
pub use entity::{Body, Entity, EntityId, EntitySpec, ShapeSpec};
pub use formation::{FormationCoordinator, FormationGrid, FormationKind};
pub use movement::{MovementStrategy, Side};
pub use state::{SimEvent, World, arena_bounds};
pub use tick::tick;
pub use timers::{DelayedAction, Timers};
pub use transform::Transform;
