//! Whole-match behaviour driven through the public API

use glam::Vec2;
use proptest::prelude::*;

use tank_arena::Settings;
use tank_arena::input::{InputProvider, Intent, RandomInput, ScriptedInput};
use tank_arena::map::parse_text_map;
use tank_arena::sim::{
    Arena, MatchState, Projectile, Rgb, VehicleId, poll_intents, tick,
};
use tank_arena::snapshot::FrameSnapshot;

const DT: f32 = 1.0 / 60.0;

fn assert_invariants(state: &MatchState) {
    for v in &state.vehicles {
        assert!(v.health() <= v.max_health(), "{} over max health", v.id());
        for angle in [v.rotation(), v.turret_rotation(), v.last_rotation()] {
            assert!((0.0..360.0).contains(&angle), "{} angle {angle}", v.id());
        }
        if !v.is_alive() || v.position() == v.last_position() {
            continue;
        }
        // Right after a commit the proposal is at rest
        assert_eq!(v.proposed().velocity, Vec2::ZERO);
    }
    for shell in &state.projectiles {
        if !shell.is_destroyed() {
            assert!(shell.distance_travelled() < shell.max_range);
        }
    }
}

fn run_match(seed: u64, players: usize, frames: usize) -> (MatchState, Vec<FrameSnapshot>) {
    let settings = Settings::default();
    let arena = Arena::open(1200, 900);
    let mut state = MatchState::seat_players(&arena, players, &settings);
    let mut input = RandomInput::new(seed, players, settings.deadzone);
    let mut frames_out = Vec::new();

    for _ in 0..frames {
        let intents = poll_intents(&mut input, &state, settings.deadzone);
        let result = tick(&mut state, &arena, &intents, DT);
        assert_invariants(&state);
        frames_out.push(FrameSnapshot::capture(&state, &result));
        if result.match_over {
            break;
        }
    }
    (state, frames_out)
}

#[test]
fn test_duel_until_elimination() {
    let settings = Settings::default();
    let arena = Arena::open(1000, 1000);
    let mut state = MatchState::seat_players(&arena, 2, &settings);

    // Seat 0 sits right of centre with its turret toward seat 1 and keeps firing
    let fire = Intent {
        fire: true,
        ..Default::default()
    };
    let mut input = ScriptedInput::new(vec![vec![fire; 2000], vec![]]);

    let mut last = None;
    for _ in 0..2000 {
        let intents = poll_intents(&mut input, &state, settings.deadzone);
        let result = tick(&mut state, &arena, &intents, DT);
        assert_invariants(&state);
        if result.match_over {
            last = Some(result);
            break;
        }
    }

    let result = last.expect("match should end");
    assert_eq!(result.winner, Some(VehicleId(0)));
    assert_eq!(state.vehicles[1].health(), 0);
    assert_eq!(state.vehicles[0].health(), 100);
    // Spawn grace, ten shots at 0.5s spacing, plus flight time
    assert!(state.elapsed > 5.0 && state.elapsed < 8.0, "took {}s", state.elapsed);
}

#[test]
fn test_crossfire_shells_cancel_out() {
    let settings = Settings::default();
    let arena = Arena::open(1000, 1000);
    let mut state = MatchState::seat_players(&arena, 2, &settings);
    let fire = Intent {
        fire: true,
        ..Default::default()
    };

    // Trigger held through the spawn grace period: one volley each, and the
    // shells meet head-on in the middle
    let mut input = ScriptedInput::new(vec![vec![fire; 30], vec![fire; 30]]);
    let mut bursts = 0;
    for _ in 0..200 {
        let intents = poll_intents(&mut input, &state, settings.deadzone);
        bursts += tick(&mut state, &arena, &intents, DT).explosions.len();
    }
    assert_eq!(bursts, 2);
    assert!(state.projectiles.is_empty());
    assert_eq!(state.vehicles[0].health(), 100);
    assert_eq!(state.vehicles[1].health(), 100);
}

#[test]
fn test_walls_stop_tanks() {
    let settings = Settings::default();
    let walls = parse_text_map("##########\n#........#\n#........#\n#........#\n##########\n", 40)
        .expect("map");
    let arena = Arena::from_mask(walls);
    let mut state = MatchState::seat_players(&arena, 1, &settings);
    let drive = Intent {
        move_direction: Some(Vec2::new(0.0, 1.0)),
        ..Default::default()
    };

    for _ in 0..600 {
        tick(&mut state, &arena, &[drive], DT);
        assert_invariants(&state);
    }
    let tank = &state.vehicles[0];
    // Never more than one step into the wall, which gets undone next frame
    assert!(tank.position().x < 400.0 - 40.0 - 30.0 + 2.0 + 1e-3);
    assert!(tank.position().x > 300.0);
}

#[test]
fn test_soak_is_deterministic() {
    let (a_state, a_frames) = run_match(1234, 4, 3000);
    let (b_state, b_frames) = run_match(1234, 4, 3000);
    assert_eq!(a_frames, b_frames);
    assert_eq!(a_state.winner, b_state.winner);
}

#[test]
fn test_soak_many_seeds_keep_invariants() {
    for seed in 0..8 {
        let (state, frames) = run_match(seed, 8, 300);
        assert!(!frames.is_empty());
        if state.match_over {
            assert!(state.alive_count() <= 1);
        }
    }
}

proptest! {
    #[test]
    fn prop_health_stays_in_bounds(
        hits in proptest::collection::vec(0u32..60, 1..40),
    ) {
        let settings = Settings::default();
        let arena = Arena::open(1000, 1000);
        let mut state = MatchState::seat_players(&arena, 3, &settings);
        let target = state.vehicles[1].position();

        for damage in hits {
            state.projectiles.push(Projectile::new(
                target,
                Vec2::ZERO,
                VehicleId(0),
                damage,
                800.0,
                Rgb::BLACK,
            ));
            tick(&mut state, &arena, &[], DT);
            let v = &state.vehicles[1];
            prop_assert!(v.health() <= v.max_health());
        }
    }

    #[test]
    fn prop_shell_range_monotonic(
        vx in -500.0f32..500.0,
        vy in -500.0f32..500.0,
        range in 10.0f32..900.0,
        steps in proptest::collection::vec(0.001f32..0.1, 1..200),
    ) {
        prop_assume!(vx.abs() + vy.abs() > 1.0);
        let mut shell = Projectile::new(Vec2::ZERO, Vec2::new(vx, vy), VehicleId(0), 10, range, Rgb::BLACK);
        let mut last = 0.0;
        for dt in steps {
            shell.advance(dt);
            let dist = shell.distance_travelled();
            prop_assert!(dist >= last);
            if dist >= range {
                prop_assert!(shell.is_destroyed());
            }
            if !shell.is_destroyed() {
                prop_assert!(dist < range);
            }
            last = dist;
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_random_input_never_breaks_invariants(seed in any::<u64>(), players in 1usize..=8) {
        let settings = Settings::default();
        let arena = Arena::open(1200, 900);
        let mut state = MatchState::seat_players(&arena, players, &settings);
        let mut input = RandomInput::new(seed, players, settings.deadzone);
        for _ in 0..120 {
            let intents: Vec<Intent> = state
                .vehicles
                .iter()
                .map(|v| input.poll(v.id()))
                .collect();
            tick(&mut state, &arena, &intents, DT);
            assert_invariants(&state);
        }
    }
}
