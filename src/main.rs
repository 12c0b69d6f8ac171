//! Bubble Arena headless runner
//!
//! Plays a level with a simple aiming policy and logs each shot. Useful for
//! eyeballing the engine without a renderer.

use std::process::ExitCode;

use clap::Parser;

use bubble_arena::consts::SIM_DT;
use bubble_arena::sim::{GridSession, TickResult};
use bubble_arena::{Level, SessionConfig, angle_of_direction};

#[derive(Debug, Parser)]
#[command(name = "bubble-arena", about = "Play a bubble arena level headlessly")]
struct Args {
    /// Built-in level number
    #[arg(short, long, default_value_t = 1)]
    level: u32,
    /// Seed for the board and the element queue
    #[arg(short, long, default_value_t = 0)]
    seed: u64,
    /// JSON session config
    #[arg(short, long)]
    config: Option<String>,
    /// Override the level's shot budget
    #[arg(long)]
    shots: Option<u32>,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => SessionConfig::load(path)?,
        None => SessionConfig::default(),
    };
    config.seed = args.seed;

    let mut level = Level::builtin(args.level).ok_or_else(|| format!("no level {}", args.level))?;
    if let Some(shots) = args.shots {
        level.max_shots = shots;
    }

    let mut session = GridSession::from_level(config, &level)?;
    log::info!("{}: {} bubbles on the board", level.name, session.lattice().len());

    while !session.phase().is_over() && session.shots_remaining() != Some(0) {
        let angle = choose_angle(&session);
        let handle = session.fire_queued(angle)?;
        let result = loop {
            match session.advance(SIM_DT) {
                TickResult::StillFlying => continue,
                other => break other,
            }
        };
        match result {
            TickResult::Settled { cell, removed } => log::info!(
                "{} settled at {cell}, removed {}, score {}",
                handle.id(),
                removed.len(),
                session.score()
            ),
            TickResult::PlacementExhausted => log::info!("{} found no room", handle.id()),
            TickResult::Idle | TickResult::StillFlying => {}
        }
        session.validate_invariants()?;
    }

    println!(
        "{}: {:?} with score {} after {} shots and {} ticks ({} bubbles left)",
        level.name,
        session.phase(),
        session.score(),
        session.shots_fired(),
        session.time_ticks(),
        session.lattice().len()
    );
    Ok(())
}

/// Aim at the lowest resident matching the queued element, else straight up
fn choose_angle(session: &GridSession) -> f32 {
    let launcher = session.launcher();
    let queued = session.queued_element();
    session
        .lattice()
        .iter()
        .filter(|(_, b)| b.element == queued)
        .max_by(|(a, _), (b, _)| a.row.cmp(&b.row).then(b.col.cmp(&a.col)))
        .map(|(_, b)| angle_of_direction(b.pos - launcher))
        .unwrap_or(std::f32::consts::FRAC_PI_2)
}
