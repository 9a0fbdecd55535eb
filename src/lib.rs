//! Tank Arena - local multiplayer tank combat
//!
//! Core modules:
//! - `sim`: Simulation core (vehicles, projectiles, masks, tick)
//! - `input`: Polled per-seat intents and deadzone handling
//! - `map`: Wall bitmap loading
//! - `snapshot`: Read-only per-frame state for renderers
//! - `settings`: Data-driven gameplay tuning

pub mod input;
pub mod map;
pub mod settings;
pub mod sim;
pub mod snapshot;

pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Target frame rate of the driver loop
    pub const TARGET_FPS: u32 = 60;
    /// Largest frame delta the driver will hand to `tick` (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Seats available in one match
    pub const MAX_PLAYERS: usize = 8;

    /// Hull footprint (pixels)
    pub const HULL_LENGTH: u32 = 60;
    pub const HULL_WIDTH: u32 = 30;
    /// Distance from hull centre to muzzle (pixels)
    pub const CANNON_LENGTH: f32 = 25.0;

    /// Projectile sprite is a small square
    pub const PROJECTILE_SIZE: u32 = 6;

    /// Largest map or field side accepted at load (pixels)
    pub const MAX_FIELD_SIDE: u32 = 8192;

    /// Alpha above which a wall bitmap pixel counts as solid
    pub const WALL_ALPHA_THRESHOLD: u8 = 127;
}

/// Normalize an angle in degrees to [0, 360)
#[inline]
pub fn normalize_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Unit vector pointing along `degrees` in screen space (Y grows downward)
#[inline]
pub fn heading(degrees: f32) -> Vec2 {
    let rad = degrees.to_radians();
    Vec2::new(rad.cos(), -rad.sin())
}

/// Screen-space direction vector to angle in degrees, normalized to [0, 360)
#[inline]
pub fn direction_to_degrees(dir: Vec2) -> f32 {
    normalize_degrees((-dir.y).atan2(dir.x).to_degrees())
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
    fn test_heading_screen_space() {
        // 0° points right, 90° points up (negative Y on screen)
        let right = heading(0.0);
        assert!((right - Vec2::X).length() < 1e-5);
        let up = heading(90.0);
        assert!((up - Vec2::new(0.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn test_direction_round_trip() {
        for deg in [0.0_f32, 45.0, 135.0, 200.0, 315.0] {
            let back = direction_to_degrees(heading(deg));
            assert!((back - deg).abs() < 1e-3, "{deg} -> {back}");
        }
    }
}
