//! Error types
//!
//! Geometry errors are configuration invariant violations: a scenario that
//! produces one cannot be reasoned about and its construction is aborted.
//! Attack errors are runtime argument violations the caller may retry.

use thiserror::Error;

/// A shape could not be constructed from the supplied description.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("segment endpoints must differ, got ({x}, {y}) twice")]
    DuplicateEndpoints { x: f32, y: f32 },
    #[error("polygon needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),
    #[error("polygon vertex {0} is repeated")]
    DuplicateVertex(usize),
    #[error("polygon vertex {0} is collinear with its neighbours")]
    CollinearVertex(usize),
    #[error("polygon sides {0} and {1} intersect")]
    SelfIntersecting(usize, usize),
    #[error("circle radius must be positive, got {0}")]
    NonPositiveRadius(f32),
    #[error("rectangle needs 4 vertices with equal opposite sides and right angles")]
    NotRectangle,
    #[error("invalid shape dimensions {width} x {height}")]
    InvalidDimensions { width: f32, height: f32 },
}

/// An attack strategy was invoked with an unusable attacker/target pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AttackError {
    #[error("invalid argument: attack requires an attacker")]
    MissingAttacker,
    #[error("invalid argument: attack requires a target")]
    MissingTarget,
    #[error("invalid argument: attacker cannot target itself")]
    SelfTarget,
}

/// Settings could not be loaded or saved.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings parse error: {0}")]
    Json(#[from] serde_json::Error),
}
