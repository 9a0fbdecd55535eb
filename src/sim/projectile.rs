//! Tank shells
//!
//! Shells fly in a straight line until they run out of range or hit
//! something. Collision against shells and hulls uses bounding rectangles;
//! against walls it uses the shell's pixel mask.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::arena::Arena;
use super::mask::{IRect, Mask};
use super::vehicle::{Rgb, Vehicle, VehicleId};
use crate::consts::PROJECTILE_SIZE;

/// A shell in flight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub position: Vec2,
    /// Where the shell was spawned; range is measured from here
    pub origin: Vec2,
    /// Pixels per second
    pub velocity: Vec2,
    pub max_range: f32,
    /// Seat of the tank that fired it. Shells never hit their own tank.
    pub owner: VehicleId,
    pub damage: u32,
    pub color: Rgb,
    destroyed: bool,
}

impl Projectile {
    pub fn new(
        position: Vec2,
        velocity: Vec2,
        owner: VehicleId,
        damage: u32,
        max_range: f32,
        color: Rgb,
    ) -> Self {
        Self {
            position,
            origin: position,
            velocity,
            max_range,
            owner,
            damage,
            color,
            destroyed: false,
        }
    }

    #[inline]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Mark the shell spent. Calling it again has no effect.
    pub fn destroy(&mut self) {
        self.destroyed = true;
    }

    /// Distance flown since spawn
    pub fn distance_travelled(&self) -> f32 {
        (self.position - self.origin).length()
    }

    /// Move along the velocity; burns out once the range is used up
    pub fn advance(&mut self, dt: f32) {
        if self.destroyed {
            return;
        }
        self.position += self.velocity * dt;
        if self.distance_travelled() >= self.max_range {
            self.destroy();
        }
    }

    pub fn bounding_rect(&self) -> IRect {
        IRect::from_center(self.position, PROJECTILE_SIZE, PROJECTILE_SIZE)
    }

    pub fn mask(&self) -> Mask {
        Mask::filled(PROJECTILE_SIZE, PROJECTILE_SIZE)
    }

    pub fn collides_with_projectile(&self, other: &Projectile) -> bool {
        self.bounding_rect().intersects(&other.bounding_rect())
    }

    pub fn collides_with_vehicle(&self, vehicle: &Vehicle) -> bool {
        vehicle.id() != self.owner && self.bounding_rect().intersects(&vehicle.bounding_rect())
    }

    /// Pixel test against the walls, placing the shell by its top-left corner
    pub fn collides_with_wall(&self, arena: &Arena) -> bool {
        arena.overlaps(&self.mask(), self.bounding_rect().top_left())
    }
}
