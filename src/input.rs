//! Per-seat input
//!
//! Input devices are polled once per tick per seat. Providers hand back an
//! `Intent` with the deadzone already applied, so the simulation can treat
//! `None` as "stick released" and never sees near-zero noise.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::sim::VehicleId;

/// What one seat wants to do this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    /// Left stick: `x` turns the hull, `y` drives. Each axis in [-1, 1].
    pub move_direction: Option<Vec2>,
    /// Right stick: turret aim direction in screen space
    pub turret_direction: Option<Vec2>,
    pub fire: bool,
}

impl Intent {
    pub fn idle() -> Self {
        Self::default()
    }

    /// Clamp both sticks to [-1, 1] per axis and drop readings inside the deadzone
    pub fn sanitized(self, deadzone: f32) -> Self {
        let clean = |v: Option<Vec2>| {
            v.map(|v| v.clamp(Vec2::splat(-1.0), Vec2::ONE))
                .and_then(|v| apply_deadzone(v, deadzone))
        };
        Self {
            move_direction: clean(self.move_direction),
            turret_direction: clean(self.turret_direction),
            fire: self.fire,
        }
    }
}

/// Collapse a stick reading shorter than `deadzone` to `None`
#[inline]
pub fn apply_deadzone(value: Vec2, deadzone: f32) -> Option<Vec2> {
    if value.length() < deadzone {
        None
    } else {
        Some(value)
    }
}

/// Source of intents, polled by the driver once per seat per tick
pub trait InputProvider {
    fn poll(&mut self, seat: VehicleId) -> Intent;
}

/// Replays a fixed list of intents per seat, then goes idle
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    scripts: Vec<Vec<Intent>>,
    cursors: Vec<usize>,
}

impl ScriptedInput {
    pub fn new(scripts: Vec<Vec<Intent>>) -> Self {
        let cursors = vec![0; scripts.len()];
        Self { scripts, cursors }
    }
}

impl InputProvider for ScriptedInput {
    fn poll(&mut self, seat: VehicleId) -> Intent {
        let (Some(script), Some(cursor)) = (self.scripts.get(seat.0), self.cursors.get_mut(seat.0))
        else {
            return Intent::idle();
        };
        let intent = script.get(*cursor).copied().unwrap_or_default();
        *cursor += 1;
        intent
    }
}

/// Seeded stick-wiggling for headless soak runs.
///
/// Each seat holds a random stick position for a random number of ticks,
/// then picks a new one. Same seed, same match.
#[derive(Debug, Clone)]
pub struct RandomInput {
    rng: Pcg32,
    deadzone: f32,
    held: Vec<(Intent, u32)>,
}

impl RandomInput {
    pub fn new(seed: u64, seats: usize, deadzone: f32) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            deadzone,
            held: vec![(Intent::idle(), 0); seats],
        }
    }

    fn random_stick(&mut self) -> Vec2 {
        Vec2::new(self.rng.random_range(-1.0..=1.0), self.rng.random_range(-1.0..=1.0))
    }
}

impl InputProvider for RandomInput {
    fn poll(&mut self, seat: VehicleId) -> Intent {
        if seat.0 >= self.held.len() {
            return Intent::idle();
        }
        if self.held[seat.0].1 == 0 {
            let intent = Intent {
                move_direction: Some(self.random_stick()),
                turret_direction: Some(self.random_stick()),
                fire: self.rng.random_bool(0.3),
            }
            .sanitized(self.deadzone);
            let hold_ticks = self.rng.random_range(10..90);
            self.held[seat.0] = (intent, hold_ticks);
        }
        let (intent, ticks) = &mut self.held[seat.0];
        *ticks -= 1;
        *intent
    }
}
