//! Galaxy Raid - simulation core for a formation-based arcade shooter
//!
//! Core modules:
//! - `geom`: Geometry kernel (segments, polygons, circles, rigid transforms)
//! - `sim`: Deterministic simulation (entities, behaviors, strategies, scheduler)
//! - `engine`: Fixed-budget run loop driving the simulation against wall-clock time
//! - `platform`: Input/asset/render collaborator interfaces
//! - `settings`: Data-driven configuration

pub mod engine;
pub mod error;
pub mod geom;
pub mod platform;
pub mod settings;
pub mod sim;

pub use engine::Engine;
pub use error::{AttackError, GeometryError, SettingsError};
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Wall-clock budget for one frame in milliseconds
    pub const FRAME_BUDGET_MS: f32 = 1000.0 / 60.0;
    /// Longest frame budget a settings file may ask for
    pub const MAX_FRAME_BUDGET_MS: f32 = 1000.0;

    /// Arena dimensions (world units, origin at bottom-left, y up)
    pub const ARENA_WIDTH: f32 = 60.0;
    pub const ARENA_HEIGHT: f32 = 80.0;
    /// Projectiles further than this outside the arena are retired
    pub const ARENA_CULL_MARGIN: f32 = 10.0;

    /// Orientation of the player ship
    pub const FACING_UP: f32 = 90.0;
    /// Canonical orientation of enemies settled in formation
    pub const FACING_DOWN: f32 = 270.0;
    /// Largest orientation correction applied in a single frame (degrees)
    pub const MAX_TURN_PER_FRAME: f32 = 6.0;
    /// Orientation is considered settled within this many degrees
    pub const ANGLE_EPSILON: f32 = 0.5;

    /// Tolerance for collinearity and degenerate determinants
    pub const GEOM_EPSILON: f32 = 1e-5;

    /// Player defaults
    pub const PLAYER_LIVES: i32 = 3;
    pub const PLAYER_SPEED: f32 = 0.45;
    /// Lateral speed multiplier while the evasive action is held
    pub const EVASIVE_BOOST: f32 = 2.5;
    pub const PLAYER_FIRE_COOLDOWN_FRAMES: u32 = 12;

    /// Projectile defaults
    pub const PROJECTILE_RADIUS: f32 = 0.3;
    pub const PROJECTILE_SPEED: f32 = 0.9;
    /// Distance in front of the attacker at which projectiles spawn
    pub const PROJECTILE_SPAWN_OFFSET: f32 = 2.0;

    /// Kamikaze charge speed (units per frame)
    pub const KAMIKAZE_CHARGE_SPEED: f32 = 1.0;
}

/// Normalize an angle in degrees to [0, 360)
#[inline]
pub fn normalize_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Shortest signed rotation (degrees, in (-180, 180]) taking `from` to `to`
#[inline]
pub fn shortest_rotation(from: f32, to: f32) -> f32 {
    let mut delta = normalize_degrees(to) - normalize_degrees(from);
    if delta > 180.0 {
        delta -= 360.0;
    } else if delta <= -180.0 {
        delta += 360.0;
    }
    delta
}

/// Convert polar (r, theta in degrees) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta_deg: f32) -> Vec2 {
    let theta = theta_deg.to_radians();
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Convert cartesian (x, y) to polar (r, theta in degrees, normalized)
#[inline]
pub fn cartesian_to_polar(pos: Vec2) -> (f32, f32) {
    (pos.length(), normalize_degrees(pos.y.atan2(pos.x).to_degrees()))
}

/// Heading in degrees from one point towards another
#[inline]
pub fn heading_degrees(from: Vec2, to: Vec2) -> f32 {
    let offset = to - from;
    normalize_degrees(offset.y.atan2(offset.x).to_degrees())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_degrees() {
        assert_eq!(normalize_degrees(0.0), 0.0);
        assert_eq!(normalize_degrees(360.0), 0.0);
        assert!((normalize_degrees(-90.0) - 270.0).abs() < 1e-4);
        assert!((normalize_degrees(725.0) - 5.0).abs() < 1e-3);
        assert!(normalize_degrees(-1e-9) < 360.0);
    }

    #[test]
    fn test_shortest_rotation_wraps() {
        assert!((shortest_rotation(350.0, 10.0) - 20.0).abs() < 1e-4);
        assert!((shortest_rotation(10.0, 350.0) + 20.0).abs() < 1e-4);
        assert!((shortest_rotation(90.0, 270.0) - 180.0).abs() < 1e-4);
    }

    #[test]
    fn test_polar_roundtrip() {
        let p = polar_to_cartesian(2.0, 135.0);
        let (r, theta) = cartesian_to_polar(p);
        assert!((r - 2.0).abs() < 1e-5);
        assert!((theta - 135.0).abs() < 1e-3);
    }

    #[test]
    fn test_heading_degrees() {
        let h = heading_degrees(Vec2::ZERO, Vec2::new(0.0, -1.0));
        assert!((h - 270.0).abs() < 1e-4);
    }
}
