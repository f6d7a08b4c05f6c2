//! Tracing subscriber setup for the binary.

use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::debug;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Where log lines go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    /// Appended to; the terminal UI owns stdout/stderr.
    File(PathBuf),
    Off,
}

/// `RUST_LOG` if set, else `default`.
pub fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Install the global subscriber. Calling it twice keeps the first one and
/// reports the second attempt at `debug` level through it.
pub fn init(default_filter: &str, target: LogTarget) -> io::Result<()> {
    let (writer, ansi) = match target {
        LogTarget::Off => return Ok(()),
        LogTarget::Stderr => (BoxMakeWriter::new(io::stderr), true),
        LogTarget::File(path) => {
            let file = OpenOptions::new().create(true).append(true).open(&path)?;
            (BoxMakeWriter::new(Mutex::new(file)), false)
        }
    };

    let fmt_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(ansi)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false);

    if let Err(err) = tracing_subscriber::registry()
        .with(env_filter(default_filter))
        .with(fmt_layer)
        .try_init()
    {
        debug!(%err, "tracing subscriber already installed, keeping it");
    }
    Ok(())
}
