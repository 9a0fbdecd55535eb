//! Read-only frame state for renderers
//!
//! The simulation never draws. After each tick the driver captures a
//! `FrameSnapshot` and hands it to whatever `FrameSink` is attached.

use std::io::{self, Write};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::{Explosion, FrameResult, HealthBand, MatchState, Rgb, VehicleId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleSnapshot {
    pub id: VehicleId,
    pub position: Vec2,
    pub rotation: f32,
    pub turret_rotation: f32,
    pub health: u32,
    pub max_health: u32,
    pub health_band: HealthBand,
    pub color: Rgb,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectileSnapshot {
    pub position: Vec2,
    pub destroyed: bool,
    pub color: Rgb,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub tick: u64,
    pub elapsed: f64,
    pub vehicles: Vec<VehicleSnapshot>,
    pub projectiles: Vec<ProjectileSnapshot>,
    pub explosions: Vec<Explosion>,
    pub match_over: bool,
    pub winner: Option<VehicleId>,
}

impl FrameSnapshot {
    pub fn capture(state: &MatchState, result: &FrameResult) -> Self {
        Self {
            tick: state.time_ticks,
            elapsed: state.elapsed,
            vehicles: state
                .vehicles
                .iter()
                .map(|v| VehicleSnapshot {
                    id: v.id(),
                    position: v.position(),
                    rotation: v.rotation(),
                    turret_rotation: v.turret_rotation(),
                    health: v.health(),
                    max_health: v.max_health(),
                    health_band: v.health_band(),
                    color: v.color,
                })
                .collect(),
            projectiles: state
                .projectiles
                .iter()
                .map(|p| ProjectileSnapshot {
                    position: p.position,
                    destroyed: p.is_destroyed(),
                    color: p.color,
                })
                .collect(),
            explosions: result.explosions.clone(),
            match_over: result.match_over,
            winner: result.winner,
        }
    }
}

/// Consumer of per-frame snapshots
pub trait FrameSink {
    fn present(&mut self, frame: &FrameSnapshot) -> io::Result<()>;
}

/// Discards every frame
#[derive(Debug, Default)]
pub struct NullSink;

impl FrameSink for NullSink {
    fn present(&mut self, _frame: &FrameSnapshot) -> io::Result<()> {
        Ok(())
    }
}

/// Writes one JSON object per frame
pub struct JsonLinesSink<W: Write> {
    out: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> FrameSink for JsonLinesSink<W> {
    fn present(&mut self, frame: &FrameSnapshot) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, frame)?;
        self.out.write_all(b"\n")
    }
}
