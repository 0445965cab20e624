//! The process-wide default [`Logger`].
//!
//! Nothing in this crate reaches for the default instance on its own; it
//! exists for applications that want one logger shared by every module
//! without threading a reference through. Install it once at startup with
//! [`init_default`], hand [`default_logger`] to the code that logs, and call
//! [`shutdown_default`] before exiting to flush and close the log file.
//!
//! ```no_run
//! use rollog::{info, init_default, shutdown_default, Level, LoggerBuilder};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let logger = init_default(LoggerBuilder::new().level(Level::Debug).output("./logs/app.log").build()?)?;
//!     info!(logger, "started");
//!     shutdown_default()?;
//!     Ok(())
//! }
//! ```

use {
    crate::{Level, Logger, LoggerError},
    std::sync::OnceLock,
};

static DEFAULT: OnceLock<Logger> = OnceLock::new();

/// Install `logger` as the default instance.
///
/// Fails with [`LoggerError::AlreadyInitialized`] if a default was already
/// installed, either by an earlier call or lazily by [`default_logger`].
pub fn init_default(logger: Logger) -> Result<&'static Logger, LoggerError> {
    DEFAULT.set(logger).map_err(|_| LoggerError::AlreadyInitialized)?;
    Ok(default_logger())
}

/// The default instance. If none was installed, an [`Level::Info`] logger
/// writing to stderr is installed on first use.
pub fn default_logger() -> &'static Logger {
    DEFAULT.get_or_init(|| Logger::new(Level::Info))
}

/// Flush and close the default instance's log file. Does nothing if no
/// default was installed; safe to call more than once.
pub fn shutdown_default() -> Result<(), LoggerError> {
    match DEFAULT.get() {
        Some(logger) => logger.close_output(),
        None => Ok(()),
    }
}
