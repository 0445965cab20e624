use {
    crate::{
        interpolate,
        sink::{RotatingSink, RotationSize, DEFAULT_FILE_MODE, DEFAULT_MAX_SIZE},
        Level, LevelFilter, LoggerError, Value,
    },
    chrono::{FixedOffset, Local, Utc},
    std::{
        io::{self, Write},
        path::{Path, PathBuf},
        sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
    },
};

/// Timestamp layout at the start of every line, e.g. `2025/04/01 19:55:02`.
const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Specifies the time zone used for the timestamp on each log line.
///
/// # Examples
/// ```
/// use rollog::TimeZone;
/// use chrono::FixedOffset;
///
/// // Use UTC time for global deployments
/// let utc = TimeZone::UTC;
///
/// // Use local system time zone (follows system settings, including DST)
/// let local = TimeZone::Local;
///
/// // Use a fixed offset for a specific region (e.g., UTC+8 for China)
/// let china = TimeZone::Fix(FixedOffset::east_opt(8 * 3600).unwrap());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub enum TimeZone {
    /// Use UTC time zone. Best for consistent timing in distributed systems
    /// or when deploying across multiple regions.
    UTC,
    /// Use the system's local time zone.
    #[default]
    Local,
    /// Use a fixed time zone offset.
    Fix(FixedOffset),
}

impl TimeZone {
    fn timestamp(&self) -> String {
        match self {
            TimeZone::UTC => Utc::now().format(TIMESTAMP_FORMAT).to_string(),
            TimeZone::Local => Local::now().format(TIMESTAMP_FORMAT).to_string(),
            TimeZone::Fix(offset) => Utc::now().with_timezone(offset).format(TIMESTAMP_FORMAT).to_string(),
        }
    }
}

/// Returned by [`Logger::panic`] once the message has been logged.
///
/// The caller decides how to stop: [`Fatal::raise`] panics with the message,
/// or the value can be propagated as an error with `?`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
#[must_use = "a Fatal should be raised or propagated"]
pub struct Fatal {
    message: String,
}

impl Fatal {
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Panic with the logged message.
    pub fn raise(self) -> ! {
        panic!("{}", self.message)
    }
}

/// Everything the lock in [`Logger`] protects.
#[derive(Debug)]
struct LoggerState {
    filter: LevelFilter,
    sink: RotatingSink,
}

/// A leveled logger writing to an optional self-rotating file.
///
/// Messages below the logger's level are dropped. Admitted messages are
/// rendered as `<timestamp> [<pid>] <LEVEL> <message>` and appended to the
/// log file, which is moved to `<path>.prev` whenever it grows past the
/// maximum size. Without a file, lines go to stderr.
///
/// A `Logger` is shared by reference (or `Arc`) between threads. Appending,
/// counting and rotating happen under one exclusive lock, so concurrent
/// writers never observe a half-rotated file and no line is lost or
/// duplicated across a rotation.
///
/// # Examples
/// ```
/// use rollog::{info, warn, Level, LoggerBuilder, RotationSize};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// # let dir = tempfile::tempdir()?;
/// # let path = dir.path().join("app.log");
/// let logger = LoggerBuilder::new()
///     .level(Level::Debug)
///     .max_size(RotationSize::MB(10))
///     .output(&path)
///     .build()?;
///
/// info!(logger, "listening on port {}", 8080);
/// warn!(logger, "cache miss ratio {}", 0.25);
/// logger.close_output()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Logger {
    state: RwLock<LoggerState>,
    time_zone: TimeZone,
}

impl Logger {
    /// A logger at `level` with no file sink.
    pub fn new(level: Level) -> Self {
        Logger::from_parts(LevelFilter::new(level), RotatingSink::new(), TimeZone::default())
    }

    fn from_parts(filter: LevelFilter, sink: RotatingSink, time_zone: TimeZone) -> Self {
        Logger {
            state: RwLock::new(LoggerState { filter, sink }),
            time_zone,
        }
    }

    fn read_state(&self) -> RwLockReadGuard<'_, LoggerState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, LoggerState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn level(&self) -> Level {
        self.read_state().filter.threshold()
    }

    pub fn set_level(&self, level: Level) {
        self.write_state().filter.set_threshold(level);
    }

    /// Whether a message at `level` would currently be written.
    pub fn should_log(&self, level: Level) -> bool {
        self.read_state().filter.should_log(level)
    }

    /// Write to `path` from now on, creating it if needed and appending if
    /// it exists. On error the previous output stays in place.
    pub fn set_output<P: AsRef<Path>>(&self, path: P) -> Result<(), LoggerError> {
        self.write_state().sink.configure(path)
    }

    /// Close the log file and go back to writing on stderr. Calling this
    /// without an open file is fine.
    pub fn close_output(&self) -> Result<(), LoggerError> {
        self.write_state().sink.detach()
    }

    pub fn set_max_size<S: Into<RotationSize>>(&self, size: S) -> Result<(), LoggerError> {
        self.write_state().sink.set_max_size(size)
    }

    pub fn max_size(&self) -> u64 {
        self.read_state().sink.max_size()
    }

    pub fn output_path(&self) -> Option<PathBuf> {
        self.read_state().sink.path().map(Path::to_path_buf)
    }

    /// Bytes in the current log file.
    pub fn written_size(&self) -> u64 {
        self.read_state().sink.written_size()
    }

    /// Rotate the log file now, regardless of its size.
    pub fn rotate(&self) {
        self.write_state().sink.rotate();
    }

    pub fn flush(&self) -> Result<(), LoggerError> {
        self.write_state().sink.flush()?;
        Ok(())
    }

    /// Log `template` rendered with `args` at `level`.
    pub fn log(&self, level: Level, template: &str, args: &[Value]) {
        if !self.should_log(level) {
            return;
        }
        let line = self.format_line(level, &interpolate(template, args));
        self.write_state().sink.write_line(&line);
    }

    pub fn trace(&self, template: &str, args: &[Value]) {
        self.log(Level::Trace, template, args);
    }

    pub fn debug(&self, template: &str, args: &[Value]) {
        self.log(Level::Debug, template, args);
    }

    pub fn info(&self, template: &str, args: &[Value]) {
        self.log(Level::Info, template, args);
    }

    pub fn warn(&self, template: &str, args: &[Value]) {
        self.log(Level::Warn, template, args);
    }

    pub fn error(&self, template: &str, args: &[Value]) {
        self.log(Level::Error, template, args);
    }

    pub fn critical(&self, template: &str, args: &[Value]) {
        self.log(Level::Critical, template, args);
    }

    /// Log at [`Level::Critical`] and hand back a [`Fatal`] for the caller
    /// to raise or propagate.
    ///
    /// ```should_panic
    /// use rollog::{Level, Logger, Value};
    ///
    /// let logger = Logger::new(Level::Critical);
    /// logger.panic("state corrupted: {}", &[Value::from("index out of sync")]).raise();
    /// ```
    pub fn panic(&self, template: &str, args: &[Value]) -> Fatal {
        let message = interpolate(template, args);
        let line = self.format_line(Level::Critical, &message);
        self.write_state().sink.write_line(&line);
        Fatal { message }
    }

    fn format_line(&self, level: Level, message: &str) -> String {
        format!(
            "{} [{}] {} {}",
            self.time_zone.timestamp(),
            std::process::id(),
            level,
            message
        )
    }
}

impl Default for Logger {
    fn default() -> Self {
        Logger::new(Level::default())
    }
}

/// Raw bytes written through a shared `Logger` bypass level filtering and
/// formatting and go straight to the sink, under the same lock as regular
/// log lines.
impl Write for &Logger {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_state().sink.write_record(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.write_state().sink.flush()
    }
}

#[cfg(feature = "tracing")]
impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for Logger {
    type Writer = &'a Logger;

    fn make_writer(&'a self) -> Self::Writer {
        self
    }
}

/// Provides a fluent interface for configuring a [`Logger`].
///
/// # Default Configuration
///
/// * Level [`Level::Info`]
/// * Rotation past 2,000,000 bytes
/// * No log file; lines go to stderr
/// * Local time zone for timestamps
/// * New files created with mode `0o600` (Unix only)
///
/// # Examples
/// ```rust
/// use rollog::{Level, LoggerBuilder, RotationSize, TimeZone};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// # let dir = tempfile::tempdir()?;
/// let logger = LoggerBuilder::new()
///     .level(Level::Warn)
///     .max_size(RotationSize::KB(256))
///     .time_zone(TimeZone::UTC)
///     .file_mode(0o640)
///     .output(dir.path().join("server.log"))
///     .build()?;
/// assert_eq!(logger.max_size(), 256 * 1024);
/// # Ok(())
/// # }
/// ```
pub struct LoggerBuilder {
    level: Level,
    max_size: RotationSize,
    output: Option<PathBuf>,
    time_zone: TimeZone,
    file_mode: Option<u32>,
    fallback: Option<Box<dyn Write + Send + Sync>>,
}

impl LoggerBuilder {
    pub fn new() -> Self {
        LoggerBuilder {
            level: Level::default(),
            max_size: RotationSize::Bytes(DEFAULT_MAX_SIZE),
            output: None,
            time_zone: TimeZone::default(),
            file_mode: Some(DEFAULT_FILE_MODE),
            fallback: None,
        }
    }

    /// Set the minimum level that gets logged.
    pub fn level(self, level: Level) -> Self {
        Self { level, ..self }
    }

    /// Set the size past which the log file is rotated.
    pub fn max_size<S: Into<RotationSize>>(self, max_size: S) -> Self {
        Self {
            max_size: max_size.into(),
            ..self
        }
    }

    /// Write to this file instead of stderr.
    pub fn output<P: AsRef<Path>>(self, path: P) -> Self {
        Self {
            output: Some(path.as_ref().to_path_buf()),
            ..self
        }
    }

    /// Set the time zone for line timestamps.
    pub fn time_zone(self, time_zone: TimeZone) -> Self {
        Self { time_zone, ..self }
    }

    /// Set the file permissions for newly created log files (Unix-like
    /// systems only), in octal notation like when using chmod.
    pub fn file_mode(self, mode: u32) -> Self {
        Self {
            file_mode: Some(mode),
            ..self
        }
    }

    /// Replace stderr as the destination used when there is no usable log
    /// file. Diagnostics about the log file go there too.
    pub fn fallback<W: Write + Send + Sync + 'static>(self, fallback: W) -> Self {
        Self {
            fallback: Some(Box::new(fallback)),
            ..self
        }
    }

    /// Build the logger, opening the output file if one was given.
    pub fn build(self) -> Result<Logger, LoggerError> {
        let mut sink = RotatingSink::new().with_file_mode(self.file_mode);
        if let Some(fallback) = self.fallback {
            sink = sink.with_fallback(fallback);
        }
        sink.set_max_size(self.max_size)?;
        if let Some(output) = &self.output {
            sink.configure(output)?;
        }
        Ok(Logger::from_parts(LevelFilter::new(self.level), sink, self.time_zone))
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        LoggerBuilder::new()
    }
}
