//! Simulation core
//!
//! All gameplay logic lives here. This module has no rendering or device
//! dependencies:
//! - One tick per frame, driven with the measured frame delta
//! - Stable iteration order (by seat)
//! - Collisions resolved against frozen snapshots, then applied

pub mod arena;
pub mod mask;
pub mod projectile;
pub mod state;
pub mod tick;
pub mod vehicle;

pub use arena::Arena;
pub use mask::{IRect, Mask};
pub use projectile::Projectile;
pub use state::{Explosion, MatchState, PLAYER_COLORS, PROJECTILE_COLORS};
pub use tick::{FrameResult, poll_intents, tick};
pub use vehicle::{CommittedState, HealthBand, ProposedState, Rgb, Vehicle, VehicleId};
