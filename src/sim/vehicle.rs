//! Tanks
//!
//! A tank carries two pieces of motion state. `CommittedState` is where the
//! tank really is. `ProposedState` is what the current tick's input asked
//! for. The tick either commits the proposal or rolls the tank back to its
//! last committed pose.

use std::fmt;

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::arena::Arena;
use super::mask::{IRect, Mask};
use super::projectile::Projectile;
use crate::consts::{HULL_LENGTH, HULL_WIDTH};
use crate::settings::Settings;
use crate::{direction_to_degrees, heading, normalize_degrees};

/// Seat index of a tank within its match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VehicleId(pub usize);

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0 + 1)
    }
}

/// Cosmetic colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
}

/// Pose the tank actually occupies
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CommittedState {
    pub position: Vec2,
    /// Hull heading, degrees in [0, 360)
    pub rotation: f32,
    /// Turret heading, degrees in [0, 360)
    pub turret_rotation: f32,
    /// Displacement applied by the last commit (pixels per tick)
    pub velocity: Vec2,
}

/// Motion requested this tick, not yet applied
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProposedState {
    pub velocity: Vec2,
    pub rotation: f32,
    pub turret_rotation: f32,
}

impl ProposedState {
    /// Proposal that keeps the tank exactly where it is
    pub fn hold(committed: &CommittedState) -> Self {
        Self {
            velocity: Vec2::ZERO,
            rotation: committed.rotation,
            turret_rotation: committed.turret_rotation,
        }
    }
}

/// Health bar colour band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthBand {
    Healthy,
    Wounded,
    Critical,
}

/// A player tank
#[derive(Debug, Clone)]
pub struct Vehicle {
    id: VehicleId,
    committed: CommittedState,
    proposed: ProposedState,
    last_position: Vec2,
    last_rotation: f32,

    health: u32,
    max_health: u32,

    /// Seconds
    fire_cooldown: f64,
    /// Simulation time of the last shot. Spawning counts as a shot at t = 0.
    last_fired: f64,

    rotation_speed: f32,
    max_speed: f32,
    cannon_length: f32,
    muzzle_speed: f32,
    projectile_damage: u32,
    projectile_range: f32,

    pub color: Rgb,
    pub projectile_color: Rgb,
}

impl Vehicle {
    /// New tank with its turret aligned to the hull
    pub fn new(id: VehicleId, position: Vec2, rotation: f32, settings: &Settings) -> Self {
        let rotation = normalize_degrees(rotation);
        let committed = CommittedState {
            position,
            rotation,
            turret_rotation: rotation,
            velocity: Vec2::ZERO,
        };
        Self {
            id,
            committed,
            proposed: ProposedState::hold(&committed),
            last_position: position,
            last_rotation: rotation,
            health: settings.max_health,
            max_health: settings.max_health,
            fire_cooldown: settings.fire_cooldown as f64,
            last_fired: 0.0,
            rotation_speed: settings.rotation_speed,
            max_speed: settings.max_speed,
            cannon_length: settings.cannon_length,
            muzzle_speed: settings.muzzle_speed,
            projectile_damage: settings.projectile_damage,
            projectile_range: settings.projectile_range,
            color: Rgb::BLACK,
            projectile_color: Rgb::BLACK,
        }
    }

    pub fn with_turret_rotation(mut self, degrees: f32) -> Self {
        self.committed.turret_rotation = normalize_degrees(degrees);
        self.proposed = ProposedState::hold(&self.committed);
        self
    }

    pub fn with_colors(mut self, color: Rgb, projectile_color: Rgb) -> Self {
        self.color = color;
        self.projectile_color = projectile_color;
        self
    }

    #[inline]
    pub fn id(&self) -> VehicleId {
        self.id
    }

    pub fn committed(&self) -> &CommittedState {
        &self.committed
    }

    pub fn proposed(&self) -> &ProposedState {
        &self.proposed
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.committed.position
    }

    #[inline]
    pub fn rotation(&self) -> f32 {
        self.committed.rotation
    }

    #[inline]
    pub fn turret_rotation(&self) -> f32 {
        self.committed.turret_rotation
    }

    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.committed.velocity
    }

    pub fn last_position(&self) -> Vec2 {
        self.last_position
    }

    pub fn last_rotation(&self) -> f32 {
        self.last_rotation
    }

    #[inline]
    pub fn health(&self) -> u32 {
        self.health
    }

    pub fn max_health(&self) -> u32 {
        self.max_health
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn health_fraction(&self) -> f32 {
        self.health as f32 / self.max_health as f32
    }

    pub fn health_band(&self) -> HealthBand {
        match self.health_fraction() {
            f if f < 0.3 => HealthBand::Critical,
            f if f < 0.6 => HealthBand::Wounded,
            _ => HealthBand::Healthy,
        }
    }

    /// Turn the stick into a proposal.
    ///
    /// `x` turns the hull (positive is clockwise on screen) and drags the
    /// turret along with it. `y` drives along the current hull heading.
    pub fn apply_movement_intent(&mut self, move_direction: Option<Vec2>, dt: f32) {
        let stick = move_direction.unwrap_or(Vec2::ZERO);
        let turn = stick.x * self.rotation_speed * dt;

        self.proposed.rotation = normalize_degrees(self.committed.rotation - turn);
        self.proposed.turret_rotation = normalize_degrees(self.committed.turret_rotation - turn);
        self.proposed.velocity = heading(self.committed.rotation) * stick.y * self.max_speed;
    }

    /// Point the turret straight at the stick direction (no turn rate)
    pub fn aim(&mut self, turret_direction: Option<Vec2>, _dt: f32) {
        if let Some(dir) = turret_direction {
            self.proposed.turret_rotation = direction_to_degrees(dir);
        }
    }

    /// Apply the proposal and remember the pose it started from
    pub fn commit_move(&mut self) {
        self.last_position = self.committed.position;
        self.last_rotation = self.committed.rotation;

        self.committed.velocity = self.proposed.velocity;
        self.committed.rotation = self.proposed.rotation;
        self.committed.turret_rotation = self.proposed.turret_rotation;
        self.committed.position += self.committed.velocity;

        self.proposed = ProposedState::hold(&self.committed);
    }

    /// Whether the last commit changed position or hull heading
    pub fn has_moved(&self) -> bool {
        self.committed.position != self.last_position || self.committed.rotation != self.last_rotation
    }

    /// Roll back to the pose before the last commit and drop the proposal.
    /// Turning in place counts as a move, since the hull footprint rotates.
    /// Does nothing if the tank has neither moved nor turned since.
    pub fn revert_move(&mut self) {
        if !self.has_moved() {
            return;
        }
        self.committed.position = self.last_position;
        self.committed.rotation = self.last_rotation;

        self.proposed.velocity = Vec2::ZERO;
        self.proposed.rotation = self.committed.rotation;
    }

    /// Fire a shell along the turret if the cooldown has elapsed.
    ///
    /// `now` is simulation time in seconds. A fresh tank must wait out one
    /// cooldown after spawning. The shell inherits the hull's velocity.
    pub fn fire(&mut self, now: f64) -> Option<Projectile> {
        if now - self.last_fired < self.fire_cooldown {
            return None;
        }
        self.last_fired = now;

        let direction = heading(self.committed.turret_rotation);
        let position = self.committed.position + direction * self.cannon_length;
        let velocity = direction * self.muzzle_speed + self.committed.velocity;

        log::debug!("{} fired at t={:.3}s from {:?}", self.id, now, position);

        Some(Projectile::new(
            position,
            velocity,
            self.id,
            self.projectile_damage,
            self.projectile_range,
            self.projectile_color,
        ))
    }

    /// Subtract health, flooring at zero
    pub fn apply_damage(&mut self, amount: u32) {
        self.health = self.health.saturating_sub(amount);
    }

    /// Size of the axis-aligned box around the rotated hull
    fn hull_extent(&self) -> (u32, u32) {
        let rad = self.committed.rotation.to_radians();
        let (sin, cos) = (rad.sin().abs(), rad.cos().abs());
        let (len, wid) = (HULL_LENGTH as f32, HULL_WIDTH as f32);
        // Trim float noise so axis-aligned hulls keep their exact size
        let w = (len * cos + wid * sin - 1e-3).ceil().max(1.0) as u32;
        let h = (len * sin + wid * cos - 1e-3).ceil().max(1.0) as u32;
        (w, h)
    }

    /// Axis-aligned box around the hull, centred on the position
    pub fn bounding_rect(&self) -> IRect {
        let (w, h) = self.hull_extent();
        IRect::from_center(self.committed.position, w, h)
    }

    /// Rasterized hull footprint at the current heading, sized to `bounding_rect`
    pub fn hull_mask(&self) -> Mask {
        let (w, h) = self.hull_extent();
        let forward = heading(self.committed.rotation);
        let side = forward.perp();
        let half_len = HULL_LENGTH as f32 / 2.0;
        let half_wid = HULL_WIDTH as f32 / 2.0;
        let center = Vec2::new(w as f32, h as f32) / 2.0;

        Mask::from_fn(w, h, |x, y| {
            let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5) - center;
            p.dot(forward).abs() <= half_len && p.dot(side).abs() <= half_wid
        })
    }

    /// Hull-on-hull pixel test
    pub fn collides_with_vehicle(&self, other: &Vehicle) -> bool {
        let offset = other.bounding_rect().top_left() - self.bounding_rect().top_left();
        self.hull_mask().overlaps(&other.hull_mask(), offset)
    }

    /// Hull-on-wall pixel test
    pub fn collides_with_wall(&self, arena: &Arena) -> bool {
        arena.overlaps(&self.hull_mask(), self.bounding_rect().top_left())
    }
}

/// Offset of `other`'s mask relative to `own`'s when both are anchored at
/// their bottom-left corners.
///
/// Kept for comparison only: bottom-left and top-left anchoring agree when
/// both boxes have the same height, and disagree by the height difference
/// otherwise.
pub fn bottom_left_offset(own: &IRect, other: &IRect) -> IVec2 {
    other.bottom_left() - own.bottom_left()
}
