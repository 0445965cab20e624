//! # rollog
//!
//! rollog is a leveled logger whose optional log file rotates itself. Once
//! the file grows past a configurable size (2,000,000 bytes by default) it is
//! moved aside to `<path>.prev`, replacing the previous backup, and logging
//! continues in a fresh file. At most two files ever exist on disk.
//!
//! Logging never fails the caller. If the log file is deleted underneath the
//! logger it is recreated on the next write; if it cannot be rotated it is
//! discarded rather than left to grow; if no file can be opened at all, lines
//! go to stderr (or another fallback writer) until the file system recovers.
//!
//! Every write, size check and rotation happens under one lock per logger,
//! so any number of threads can share a [`Logger`] without losing or
//! duplicating lines across a rotation.
//!
//! ## Example
//!
//! ```rust
//! use rollog::{error, info, Level, LoggerBuilder, RotationSize};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//! #  let dir = tempfile::tempdir()?;
//! #  let path = dir.path().join("app.log");
//!    let logger = LoggerBuilder::new()
//!        .level(Level::Info)
//!        .max_size(RotationSize::MB(2))
//!        .output(&path) // Rotated copy lives next to it as app.log.prev
//!        .build()?;
//!
//!    info!(logger, "This is an info message");
//!    error!(logger, "request {} failed after {} retries", "GET /health", 3);
//!
//!    logger.close_output()?;
//!    Ok(())
//! }
//! ```
//!
//! With the `tracing` feature a [`Logger`] also works as the writer of a
//! `tracing_subscriber::fmt` subscriber, so tracing events share the same
//! rotating file.

mod global;
mod level;
mod logger;
mod macros;
mod sink;
mod value;

use std::path::PathBuf;

pub use {
    global::{default_logger, init_default, shutdown_default},
    level::{Level, LevelFilter},
    logger::{Fatal, Logger, LoggerBuilder, TimeZone},
    sink::{prev_path, RotatingSink, RotationSize, DEFAULT_FILE_MODE, DEFAULT_MAX_SIZE},
    value::{interpolate, Value},
};

/// Errors returned when configuring a logger.
///
/// Writing a log line never returns an error; failures on that path are
/// reported on the fallback writer instead.
#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    #[error("Failed to create directory '{0}': {1}")]
    CreateDirectoryFailed(PathBuf, String),
    #[error("Unable to open log file '{0}': {1}")]
    OpenFailed(PathBuf, String),
    #[error("Maximum log size must be greater than zero")]
    InvalidMaxSize,
    #[error("Unknown log level '{0}'")]
    InvalidLevel(String),
    #[error("The default logger is already initialized")]
    AlreadyInitialized,
    #[error("File IO error: {0}")]
    FileIOError(#[from] std::io::Error),
}
