#![forbid(unsafe_code)]

//! LIMBO in a terminal.
//!
//! Eight white keys appear; one flashes green. They shuffle 32 times, then
//! take on distinct colors. Click the key that flashed.
//!
//! Environment:
//! - `LIMBO_SEED` / `E2E_SEED`: pin the RNG seed
//! - `LIMBO_LOG_FILE`: append logs to this file
//! - `LIMBO_LOG`: log filter (default `info`)

mod logging;
mod punish;
mod seed;

use std::process::ExitCode;

use limbo_core::config::GameConfig;
use limbo_runtime::{Outcome, Program};
use limbo_tty::{TtyBackend, TtyError};

use crate::punish::SystemShutdown;

#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error("cannot open terminal: {0}")]
    Terminal(#[from] TtyError),
    #[error(transparent)]
    Runtime(#[from] limbo_runtime::Error),
}

/// What to tell the player after the terminal is restored.
struct Report {
    outcome: Option<Outcome>,
    intent: Option<String>,
}

fn run() -> Result<Report, AppError> {
    let (rng, pinned) = seed::rng();
    if let Some(seed) = pinned {
        tracing::info!(target: "limbo", seed, "seed pinned by environment");
    }

    let punisher = SystemShutdown::from_build();
    tracing::info!(target: "limbo", armed = punisher.is_armed(), "punitive action ready");

    let backend = TtyBackend::open()?;
    let mut program = Program::new(GameConfig::default(), backend, punisher, rng)?;
    let outcome = program.run()?;
    let intent = program.punisher().intent().map(str::to_owned);
    // Dropping the program drops the backend, which restores the terminal.
    drop(program);
    Ok(Report { outcome, intent })
}

fn main() -> ExitCode {
    match logging::init() {
        Ok(Some(path)) => {
            tracing::info!(target: "limbo", path = %path.display(), "logging started");
        }
        Ok(None) => {}
        Err(err) => eprintln!("limbo: logging disabled: {err}"),
    }

    match run() {
        Ok(report) => {
            match report.outcome {
                Some(Outcome::Win) => println!("You win."),
                Some(Outcome::Lose) => println!("Wrong key."),
                None => {}
            }
            if let Some(cmd) = report.intent {
                println!("(dry run) would have executed: {cmd}");
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(target: "limbo", error = %err, "fatal");
            eprintln!("limbo: {err}");
            ExitCode::FAILURE
        }
    }
}
