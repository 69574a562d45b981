//! Simulation settings
//!
//! Tuning knobs for timing, player resilience and formation pacing. Loaded
//! from a JSON file when one is supplied, otherwise the defaults apply.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SettingsError;
use crate::sim::formation::FormationKind;

/// Simulation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Run seed for reproducibility
    pub seed: u64,

    // === Timing ===
    /// Wall-clock budget per frame (ms); underrunning frames sleep the rest
    pub frame_budget_ms: f32,
    /// Simulation seconds advanced per frame
    pub sim_dt: f32,

    // === Player ===
    pub player_lives: i32,
    /// Seconds of invincibility after losing a life
    pub invincibility_secs: f32,

    // === Enemies ===
    /// Seconds an explosion plays before the enemy is removed
    pub explosion_secs: f32,
    /// Window (seconds) from which the attack re-arm delay is drawn
    pub rearm_min_secs: f32,
    pub rearm_max_secs: f32,
    pub projectile_speed: f32,

    // === Formation ===
    /// Enemies entering together as one group
    pub group_size: usize,
    /// Seconds between consecutive groups
    pub group_interval_secs: f32,
    /// Seconds between members of the same group
    pub entry_sub_delay_secs: f32,
    /// Seconds a zigzag sweep overrides the prior movement
    pub zigzag_override_secs: f32,
    /// Formation kinds cycled through wave by wave
    pub wave_cycle: Vec<FormationKind>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 0x5eed,

            frame_budget_ms: FRAME_BUDGET_MS,
            sim_dt: SIM_DT,

            player_lives: PLAYER_LIVES,
            invincibility_secs: 2.0,

            explosion_secs: 1.0,
            rearm_min_secs: 1.5,
            rearm_max_secs: 7.0,
            projectile_speed: PROJECTILE_SPEED,

            group_size: 4,
            group_interval_secs: 2.5,
            entry_sub_delay_secs: 0.2,
            zigzag_override_secs: 5.0,
            wave_cycle: vec![FormationKind::Standard, FormationKind::ZigzagSweep],
        }
    }
}

impl Settings {
    /// Parse settings from a JSON string; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        Ok(settings.sanitized())
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Save settings to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("Settings saved to {}", path.as_ref().display());
        Ok(())
    }

    /// Frame budget as a `Duration`, clamped to `[0, MAX_FRAME_BUDGET_MS]`
    pub fn frame_budget(&self) -> std::time::Duration {
        let ms = if self.frame_budget_ms.is_finite() {
            self.frame_budget_ms.clamp(0.0, MAX_FRAME_BUDGET_MS)
        } else {
            FRAME_BUDGET_MS
        };
        std::time::Duration::from_secs_f32(ms / 1000.0)
    }

    /// Clamp values that would stall or invert the simulation
    fn sanitized(mut self) -> Self {
        self.group_size = self.group_size.max(1);
        if self.rearm_max_secs < self.rearm_min_secs {
            std::mem::swap(&mut self.rearm_min_secs, &mut self.rearm_max_secs);
        }
        if self.wave_cycle.is_empty() {
            self.wave_cycle.push(FormationKind::Standard);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_budget_is_clamped() {
        let huge = Settings {
            frame_budget_ms: 1e30,
            ..Settings::default()
        };
        assert_eq!(huge.frame_budget().as_secs_f32(), MAX_FRAME_BUDGET_MS / 1000.0);

        let negative = Settings {
            frame_budget_ms: -5.0,
            ..Settings::default()
        };
        assert!(negative.frame_budget().is_zero());

        let infinite = Settings {
            frame_budget_ms: f32::INFINITY,
            ..Settings::default()
        };
        assert_eq!(infinite.frame_budget(), Settings::default().frame_budget());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{ "seed": 7, "player_lives": 5 }"#).unwrap();
        assert_eq!(settings.seed, 7);
        assert_eq!(settings.player_lives, 5);
        assert_eq!(settings.group_size, Settings::default().group_size);
    }

    #[test]
    fn test_sanitize_swaps_inverted_rearm_window() {
        let settings =
            Settings::from_json(r#"{ "rearm_min_secs": 9.0, "rearm_max_secs": 2.0, "group_size": 0 }"#)
                .unwrap();
        assert_eq!(settings.rearm_min_secs, 2.0);
        assert_eq!(settings.rearm_max_secs, 9.0);
        assert_eq!(settings.group_size, 1);
    }

    #[test]
    fn test_save_and_load_file() {
        let path = std::env::temp_dir().join(format!("galaxy_raid_settings_{}.json", std::process::id()));
        let mut settings = Settings::default();
        settings.seed = 42;
        settings.save(&path).unwrap();
        let loaded = Settings::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(matches!(Settings::from_json("{ nope"), Err(SettingsError::Json(_))));
    }
}
