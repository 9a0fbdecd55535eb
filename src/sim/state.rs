//! Match state
//!
//! Everything the tick mutates lives here: the seated tanks, the shells in
//! flight, and the match clock.

use std::f32::consts::TAU;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::arena::Arena;
use super::projectile::Projectile;
use super::vehicle::{Rgb, Vehicle, VehicleId};
use crate::consts::MAX_PLAYERS;
use crate::normalize_degrees;
use crate::settings::Settings;

/// Hull colours by seat
pub const PLAYER_COLORS: [Rgb; MAX_PLAYERS] = [
    Rgb(0x33, 0xdd, 0x33),
    Rgb(0xdd, 0x33, 0xdd),
    Rgb(0x55, 0x88, 0xff),
    Rgb(0xdd, 0x88, 0x33),
    Rgb(0xff, 0xdd, 0x33),
    Rgb(0x33, 0xff, 0xdd),
    Rgb(0xff, 0x33, 0xdd),
    Rgb(0x33, 0xdd, 0xff),
];

/// Shell colours by seat (a darker shade of the hull)
pub const PROJECTILE_COLORS: [Rgb; MAX_PLAYERS] = [
    Rgb(0x22, 0xaa, 0x22),
    Rgb(0xaa, 0x22, 0xaa),
    Rgb(0x22, 0x55, 0xaa),
    Rgb(0xaa, 0x55, 0x22),
    Rgb(0xaa, 0x99, 0x22),
    Rgb(0x22, 0xaa, 0xaa),
    Rgb(0xaa, 0x22, 0xaa),
    Rgb(0x22, 0xaa, 0xff),
];

/// Where a spent shell burst, for the renderer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Explosion {
    pub position: Vec2,
    pub color: Rgb,
}

/// Complete match state
#[derive(Debug, Clone, Default)]
pub struct MatchState {
    /// Tanks in seat order; a tank keeps its index for the whole match
    pub vehicles: Vec<Vehicle>,
    /// Shells in flight
    pub projectiles: Vec<Projectile>,
    /// Simulation clock (seconds), sum of all tick deltas
    pub elapsed: f64,
    /// Ticks simulated so far
    pub time_ticks: u64,
    pub match_over: bool,
    pub winner: Option<VehicleId>,
}

impl MatchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seat `count` tanks on the arena.
    ///
    /// A lone tank starts in the centre facing right. Otherwise tanks are
    /// spread evenly on a circle around the centre, hulls facing outward and
    /// turrets facing the centre.
    pub fn seat_players(arena: &Arena, count: usize, settings: &Settings) -> Self {
        let limit = settings.max_players.min(MAX_PLAYERS);
        let count = if count > limit {
            log::warn!("{} players requested, only {} seats available", count, limit);
            limit
        } else {
            count
        };

        let center = arena.center();
        let vehicles = (0..count)
            .map(|seat| {
                let (position, rotation) = if count == 1 {
                    (center, 0.0)
                } else {
                    let angle = seat as f32 * TAU / count as f32;
                    let offset = Vec2::new(angle.cos(), angle.sin()) * settings.spawn_radius;
                    (center + offset, -angle.to_degrees())
                };
                Vehicle::new(VehicleId(seat), position, rotation, settings)
                    .with_turret_rotation(normalize_degrees(rotation + 180.0))
                    .with_colors(PLAYER_COLORS[seat], PROJECTILE_COLORS[seat])
            })
            .collect();

        log::info!("Seated {} player(s) on a {}x{} arena", count, arena.width(), arena.height());

        Self {
            vehicles,
            ..Self::default()
        }
    }

    pub fn vehicle(&self, id: VehicleId) -> Option<&Vehicle> {
        self.vehicles.get(id.0)
    }

    pub fn vehicle_mut(&mut self, id: VehicleId) -> Option<&mut Vehicle> {
        self.vehicles.get_mut(id.0)
    }

    /// Seats still in the fight, in seat order
    pub fn alive(&self) -> Vec<VehicleId> {
        self.vehicles
            .iter()
            .filter(|v| v.is_alive())
            .map(Vehicle::id)
            .collect()
    }

    pub fn alive_count(&self) -> usize {
        self.vehicles.iter().filter(|v| v.is_alive()).count()
    }
}
