//! Per-frame simulation step
//!
//! One tick = one rendered frame. Order within a tick is fixed:
//! intents, shell collisions, shell flight, tank motion, match adjudication.
//! Both collision phases are resolve-then-apply against a frozen view of the
//! world, so seat order and shell order never change the outcome.

use serde::{Deserialize, Serialize};

use super::arena::Arena;
use super::mask::{IRect, Mask};
use super::state::{Explosion, MatchState};
use super::vehicle::VehicleId;
use crate::input::{InputProvider, Intent};

/// What the driver and renderer need to know after a tick
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameResult {
    pub alive_vehicles: Vec<VehicleId>,
    pub match_over: bool,
    pub winner: Option<VehicleId>,
    /// Shells removed this tick
    pub explosions: Vec<Explosion>,
}

/// Poll every seat once, in seat order, with the deadzone enforced
pub fn poll_intents(
    provider: &mut dyn InputProvider,
    state: &MatchState,
    deadzone: f32,
) -> Vec<Intent> {
    state
        .vehicles
        .iter()
        .map(|v| provider.poll(v.id()).sanitized(deadzone))
        .collect()
}

/// Advance the match by one frame.
///
/// `intents` is indexed by seat; missing entries count as idle. Once the
/// match is over further ticks change nothing.
pub fn tick(state: &mut MatchState, arena: &Arena, intents: &[Intent], dt: f32) -> FrameResult {
    if state.match_over {
        return frame_result(state, Vec::new());
    }

    state.time_ticks += 1;
    state.elapsed += dt as f64;
    let now = state.elapsed;

    // Intents become proposals; shots join the flight list immediately
    for vehicle in state.vehicles.iter_mut().filter(|v| v.is_alive()) {
        let intent = intents.get(vehicle.id().0).copied().unwrap_or_default();
        vehicle.apply_movement_intent(intent.move_direction, dt);
        vehicle.aim(intent.turret_direction, dt);
        if intent.fire {
            if let Some(shell) = vehicle.fire(now) {
                state.projectiles.push(shell);
            }
        }
    }

    let explosions = resolve_projectiles(state, arena);

    for shell in &mut state.projectiles {
        shell.advance(dt);
    }

    resolve_motion(state, arena);
    adjudicate(state);

    frame_result(state, explosions)
}

fn frame_result(state: &MatchState, explosions: Vec<Explosion>) -> FrameResult {
    FrameResult {
        alive_vehicles: state.alive(),
        match_over: state.match_over,
        winner: state.winner,
        explosions,
    }
}

/// Shell collisions against the population at the start of the pass.
///
/// Every shell is tested against every other shell, every live tank and the
/// walls before anything is applied. Spent shells (including ones that
/// burned out last frame) are then removed and reported.
fn resolve_projectiles(state: &mut MatchState, arena: &Arena) -> Vec<Explosion> {
    let shells = &state.projectiles;
    let mut spent: Vec<bool> = shells.iter().map(|s| s.is_destroyed()).collect();
    let mut damage: Vec<(VehicleId, u32)> = Vec::new();

    for i in 0..shells.len() {
        if shells[i].is_destroyed() {
            continue;
        }

        for j in (i + 1)..shells.len() {
            if !shells[j].is_destroyed() && shells[i].collides_with_projectile(&shells[j]) {
                spent[i] = true;
                spent[j] = true;
            }
        }

        for vehicle in &state.vehicles {
            if vehicle.is_alive() && shells[i].collides_with_vehicle(vehicle) {
                damage.push((vehicle.id(), shells[i].damage));
                spent[i] = true;
            }
        }

        if shells[i].collides_with_wall(arena) {
            spent[i] = true;
        }
    }

    let frame = state.time_ticks;
    for (id, amount) in damage {
        let Some(vehicle) = state.vehicle_mut(id) else {
            continue;
        };
        let was_alive = vehicle.is_alive();
        vehicle.apply_damage(amount);
        log::debug!("{} hit for {} ({} hp left)", vehicle.id(), amount, vehicle.health());
        if was_alive && !vehicle.is_alive() {
            log::info!("{} eliminated at tick {}", vehicle.id(), frame);
        }
    }

    let mut explosions = Vec::new();
    let mut flags = spent.into_iter();
    state.projectiles.retain_mut(|shell| {
        if flags.next().unwrap_or(false) {
            shell.destroy();
            explosions.push(Explosion {
                position: shell.position,
                color: shell.color,
            });
            false
        } else {
            true
        }
    });
    explosions
}

/// Commit or roll back every live tank.
///
/// A tank is blocked when its current hull overlaps a wall or any other
/// live hull. All overlaps are decided first, then applied.
fn resolve_motion(state: &mut MatchState, arena: &Arena) {
    let hulls: Vec<(usize, IRect, Mask)> = state
        .vehicles
        .iter()
        .enumerate()
        .filter(|(_, v)| v.is_alive())
        .map(|(index, v)| (index, v.bounding_rect(), v.hull_mask()))
        .collect();

    let blocked: Vec<bool> = hulls
        .iter()
        .map(|(index, rect, mask)| {
            let hits_wall = arena.overlaps(mask, rect.top_left());
            let hits_tank = hulls.iter().any(|(other, other_rect, other_mask)| {
                other != index
                    && rect.intersects(other_rect)
                    && mask.overlaps(other_mask, other_rect.top_left() - rect.top_left())
            });
            hits_wall || hits_tank
        })
        .collect();

    for ((index, _, _), blocked) in hulls.iter().zip(blocked) {
        let vehicle = &mut state.vehicles[*index];
        if blocked {
            vehicle.revert_move();
        } else {
            vehicle.commit_move();
        }
    }
}

/// Last tank standing. With two seats this is the same as "first death".
/// A lone-seat practice match never ends on its own.
fn adjudicate(state: &mut MatchState) {
    if state.vehicles.len() < 2 {
        return;
    }
    let alive = state.alive();
    if alive.len() <= 1 {
        state.match_over = true;
        state.winner = alive.first().copied();
        match state.winner {
            Some(winner) => log::info!("Match over after {} ticks: {} wins", state.time_ticks, winner),
            None => log::info!("Match over after {} ticks: no survivors", state.time_ticks),
        }
    }
}
