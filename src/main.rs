//! Tank Arena entry point
//!
//! Headless driver: loads settings and a map, seats the players, feeds
//! them seeded random input and runs frames until one tank is left.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use tank_arena::Settings;
use tank_arena::consts::MAX_PLAYERS;
use tank_arena::input::{InputProvider, RandomInput};
use tank_arena::map::{self, TEXT_CELL_SIZE};
use tank_arena::sim::{Arena, MatchState, poll_intents, tick};
use tank_arena::snapshot::{FrameSink, FrameSnapshot, JsonLinesSink, NullSink};

const DEFAULT_MAP: &str = include_str!("../maps/arena.txt");

/// Headless tank arena: seeded random players fight until one tank is left.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Options {
    /// JSON settings file. Defaults apply to anything it leaves out.
    #[arg(long, value_name = "FILE")]
    settings: Option<PathBuf>,
    /// Map image (PNG, netpbm) or text art. Uses the built-in arena when omitted.
    #[arg(long, value_name = "FILE")]
    map: Option<PathBuf>,
    /// Number of tanks.
    #[arg(
        long,
        value_name = "COUNT",
        default_value_t = 2,
        value_parser = clap::value_parser!(u8).range(1..=MAX_PLAYERS as i64)
    )]
    players: u8,
    /// Seed for the random input.
    #[arg(long, default_value_t = 1)]
    seed: u64,
    /// Stop after this many frames even if the match is still running.
    #[arg(
        long = "frames",
        value_name = "COUNT",
        default_value_t = 60 * 60 * 5,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    max_frames: u64,
    /// Write one JSON snapshot per frame to this file.
    #[arg(long, value_name = "FILE")]
    snapshots: Option<PathBuf>,
    /// Run at wall-clock speed with measured frame deltas.
    #[arg(long)]
    realtime: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let opts = Options::parse();

    match run(&opts) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(opts: &Options) -> Result<()> {
    let settings = match &opts.settings {
        Some(path) => Settings::load(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => Settings::default(),
    };

    let arena = match &opts.map {
        Some(path) => map::load_map(path, &settings)
            .with_context(|| format!("loading map {}", path.display()))?,
        None => {
            let walls = map::parse_text_map(DEFAULT_MAP, TEXT_CELL_SIZE)
                .context("parsing the built-in map")?;
            map::fit_to_field(walls, &settings)
        }
    };

    let mut sink: Box<dyn FrameSink> = match &opts.snapshots {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating snapshot file {}", path.display()))?;
            Box::new(JsonLinesSink::new(BufWriter::new(file)))
        }
        None => Box::new(NullSink),
    };

    let mut state = MatchState::seat_players(&arena, usize::from(opts.players), &settings);
    let mut input = RandomInput::new(opts.seed, state.vehicles.len(), settings.deadzone);

    log::info!(
        "Tank Arena starting: {} players, seed {}, {}",
        state.vehicles.len(),
        opts.seed,
        if opts.realtime { "realtime" } else { "fixed step" }
    );

    play(&mut state, &arena, &mut input, sink.as_mut(), &settings, opts)
        .context("writing frame snapshots")?;

    match (state.match_over, state.winner.and_then(|id| state.vehicle(id))) {
        (true, Some(winner)) => println!(
            "{} wins after {} frames with {} hp left",
            winner.id(),
            state.time_ticks,
            winner.health()
        ),
        (true, None) => println!("No survivors after {} frames", state.time_ticks),
        (false, _) => println!(
            "Stopped after {} frames, {} tanks still standing",
            state.time_ticks,
            state.alive_count()
        ),
    }
    Ok(())
}

/// Frame loop: poll, tick, present. In realtime mode the delta is measured
/// wall-clock time, otherwise every frame gets the nominal frame delta.
fn play(
    state: &mut MatchState,
    arena: &Arena,
    input: &mut dyn InputProvider,
    sink: &mut dyn FrameSink,
    settings: &Settings,
    opts: &Options,
) -> std::io::Result<()> {
    let frame_budget = Duration::from_secs_f32(settings.frame_dt());
    let mut last = Instant::now();

    for _ in 0..opts.max_frames {
        let dt = if opts.realtime {
            let now = Instant::now();
            let measured = now.duration_since(last).as_secs_f32();
            last = now;
            measured.min(settings.max_frame_dt)
        } else {
            settings.frame_dt()
        };

        let intents = poll_intents(input, state, settings.deadzone);
        let result = tick(state, arena, &intents, dt);
        sink.present(&FrameSnapshot::capture(state, &result))?;

        if result.match_over {
            break;
        }

        if opts.realtime {
            let spent = last.elapsed();
            if spent < frame_budget {
                thread::sleep(frame_budget - spent);
            }
        }
    }
    Ok(())
}
