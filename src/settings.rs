//! Gameplay tuning
//!
//! Every constant a match depends on lives here so a match can be tuned from
//! a JSON file without rebuilding. Missing keys fall back to the defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Errors raised while loading settings
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed settings JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid setting `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Match tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Hull ===
    /// Hull turn rate (degrees per second at full stick)
    pub rotation_speed: f32,
    /// Hull speed at full stick (pixels per tick)
    pub max_speed: f32,
    pub max_health: u32,

    // === Weapon ===
    /// Minimum time between shots (seconds)
    pub fire_cooldown: f32,
    pub projectile_damage: u32,
    /// Shell speed relative to the tank (pixels per second)
    pub muzzle_speed: f32,
    pub cannon_length: f32,
    /// Distance from spawn after which a shell burns out (pixels)
    pub projectile_range: f32,

    // === Match ===
    pub max_players: usize,
    /// Radius of the spawn circle around the map centre (pixels)
    pub spawn_radius: f32,

    // === Input ===
    /// Stick vectors shorter than this are treated as released
    pub deadzone: f32,

    // === Map ===
    /// Alpha above which a map pixel is wall
    pub wall_threshold: u8,
    /// Play field size; the wall bitmap is rescaled to it when set
    pub field_size: Option<[u32; 2]>,

    // === Driver ===
    pub target_fps: u32,
    /// Frame deltas are clamped to this (seconds)
    pub max_frame_dt: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rotation_speed: 100.0,
            max_speed: 2.0,
            max_health: 100,

            fire_cooldown: 0.5,
            projectile_damage: 10,
            muzzle_speed: 300.0,
            cannon_length: CANNON_LENGTH,
            projectile_range: 800.0,

            max_players: MAX_PLAYERS,
            spawn_radius: 350.0,

            deadzone: 0.1,

            wall_threshold: WALL_ALPHA_THRESHOLD,
            field_size: None,

            target_fps: TARGET_FPS,
            max_frame_dt: MAX_FRAME_DT,
        }
    }
}

impl Settings {
    /// Parse settings from a JSON document
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Write settings as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), json)?;
        log::info!("Settings saved to {}", path.as_ref().display());
        Ok(())
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), SettingsError> {
        let invalid = |field, reason| Err(SettingsError::Invalid { field, reason });

        if self.max_players == 0 || self.max_players > MAX_PLAYERS {
            return invalid("max_players", "must be between 1 and 8");
        }
        if self.max_health == 0 {
            return invalid("max_health", "must be positive");
        }
        if !(self.fire_cooldown >= 0.0) {
            return invalid("fire_cooldown", "must be zero or positive");
        }
        if !(self.projectile_range > 0.0) {
            return invalid("projectile_range", "must be positive");
        }
        if !(0.0..1.0).contains(&self.deadzone) {
            return invalid("deadzone", "must be in [0, 1)");
        }
        if self.target_fps == 0 {
            return invalid("target_fps", "must be positive");
        }
        if !(self.max_frame_dt > 0.0) {
            return invalid("max_frame_dt", "must be positive");
        }
        if let Some([w, h]) = self.field_size {
            if w == 0 || h == 0 {
                return invalid("field_size", "dimensions must be positive");
            }
            if w > MAX_FIELD_SIDE || h > MAX_FIELD_SIDE {
                return invalid("field_size", "dimensions exceed the largest supported field");
            }
        }
        Ok(())
    }

    /// Nominal frame delta for the configured frame rate (seconds)
    pub fn frame_dt(&self) -> f32 {
        1.0 / self.target_fps as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.max_players, 8);
        assert!((settings.frame_dt() - 1.0 / 60.0).abs() < 1e-6);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{ "max_speed": 3.5, "fire_cooldown": 0.25 }"#)
            .expect("valid settings");
        assert_eq!(settings.max_speed, 3.5);
        assert_eq!(settings.fire_cooldown, 0.25);
        assert_eq!(settings.projectile_damage, 10);
        assert_eq!(settings.field_size, None);
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = Settings::from_json(r#"{ "max_players": 0 }"#).unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Invalid {
                field: "max_players",
                ..
            }
        ));

        let err = Settings::from_json(r#"{ "deadzone": 1.5 }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid { field: "deadzone", .. }));

        let err = Settings::from_json(r#"{ "field_size": [65536, 65536] }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid { field: "field_size", .. }));

        let err = Settings::from_json("{ not json").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("tank-arena-settings-{}.json", std::process::id()));
        let settings = Settings {
            spawn_radius: 120.0,
            field_size: Some([640, 480]),
            ..Default::default()
        };
        settings.save(&path).expect("save");
        let loaded = Settings::load(&path).expect("load");
        let _ = fs::remove_file(&path);
        assert_eq!(loaded, settings);
    }
}
