#![forbid(unsafe_code)]

//! Log sink.
//!
//! The game owns the terminal, so logs never go to stdout or stderr. Set
//! `LIMBO_LOG_FILE` to append them to a file; `LIMBO_LOG` takes an
//! `EnvFilter` directive and defaults to `info`.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

pub const LOG_FILE_ENV: &str = "LIMBO_LOG_FILE";
pub const LOG_FILTER_ENV: &str = "LIMBO_LOG";
const DEFAULT_FILTER: &str = "info";

#[derive(Debug, thiserror::Error)]
pub enum LogError {
    #[error("cannot open log file {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot install subscriber: {0}")]
    Install(String),
}

/// Filter from `LIMBO_LOG`, falling back to `info` when unset or invalid.
pub fn filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the file subscriber. Returns the log path, or `None` when
/// logging is off.
pub fn init() -> Result<Option<PathBuf>, LogError> {
    let Some(path) = std::env::var_os(LOG_FILE_ENV).map(PathBuf::from) else {
        return Ok(None);
    };
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|source| LogError::Open {
            path: path.clone(),
            source,
        })?;
    tracing_subscriber::fmt()
        .with_env_filter(filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|e| LogError::Install(e.to_string()))?;
    Ok(Some(path))
}
