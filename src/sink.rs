use {
    crate::LoggerError,
    std::{
        ffi::OsString,
        fmt,
        fs,
        io::{self, Write},
        path::{Path, PathBuf},
    },
};

#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;

/// Size past which the active file is rotated, used when nothing else is
/// configured.
pub const DEFAULT_MAX_SIZE: u64 = 2_000_000;

/// Permission bits for newly created log files on Unix-like systems.
pub const DEFAULT_FILE_MODE: u32 = 0o600;

/// Defines the size threshold for rotating the log file in various units.
///
/// * `Bytes` - Direct byte count (e.g., 1048576 bytes)
/// * `KB` - Kilobytes (1 KB = 1024 bytes)
/// * `MB` - Megabytes (1 MB = 1024 KB)
/// * `GB` - Gigabytes (1 GB = 1024 MB)
///
/// A plain `u64` converts into [`RotationSize::Bytes`].
///
/// # Examples
/// ```
/// use rollog::{Level, Logger, RotationSize};
///
/// let logger = Logger::new(Level::Info);
/// logger.set_max_size(RotationSize::KB(512)).unwrap();
/// assert_eq!(logger.max_size(), 512 * 1024);
///
/// logger.set_max_size(10_000).unwrap();
/// assert_eq!(logger.max_size(), 10_000);
/// assert!(logger.set_max_size(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationSize {
    /// Raw byte count
    Bytes(u64),
    /// Kilobytes (1 KB = 1024 bytes)
    KB(u64),
    /// Megabytes (1 MB = 1024 KB = 1,048,576 bytes)
    MB(u64),
    /// Gigabytes (1 GB = 1024 MB = 1,073,741,824 bytes)
    GB(u64),
}

impl RotationSize {
    /// Get the threshold in bytes.
    pub fn bytes(&self) -> u64 {
        match self {
            RotationSize::Bytes(b) => *b,
            RotationSize::KB(kb) => kb.saturating_mul(1024),
            RotationSize::MB(mb) => mb.saturating_mul(1024 * 1024),
            RotationSize::GB(gb) => gb.saturating_mul(1024 * 1024 * 1024),
        }
    }
}

impl From<u64> for RotationSize {
    fn from(bytes: u64) -> Self {
        RotationSize::Bytes(bytes)
    }
}

/// Path of the single retained backup for `path`, i.e. `<path>.prev`.
pub fn prev_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".prev");
    PathBuf::from(name)
}

/// The file sink of a logger.
///
/// A `RotatingSink` owns at most one open log file. Every record appended to
/// it is counted, and once the count passes the configured maximum the file
/// is moved to `<path>.prev` (replacing any older backup) and a fresh file is
/// started at `<path>`.
///
/// Writing never fails. When no path is configured, or the file cannot be
/// used, records go to the fallback writer (stderr unless replaced) together
/// with a one-line diagnostic describing what went wrong.
///
/// The sink itself is not synchronized; [`crate::Logger`] wraps it in a lock
/// so that append, counting and rotation happen as one critical section.
pub struct RotatingSink {
    /// The configured log file, `None` when only the fallback is used.
    path: Option<PathBuf>,
    /// The open handle for `path`. `None` while no path is configured, after
    /// [`RotatingSink::close`], or when reopening failed.
    file: Option<fs::File>,
    /// Bytes in the current file, resynchronized from disk whenever the file
    /// is opened in append mode.
    written_size: u64,
    /// Rotation happens once `written_size` is strictly greater than this.
    max_size: u64,
    /// Permission bits applied when a log file is created (Unix only).
    file_mode: Option<u32>,
    /// Receives records and diagnostics when the file cannot.
    fallback: Box<dyn Write + Send + Sync>,
    /// Set while the file is unusable, so the diagnostic is written once per
    /// outage rather than once per record.
    degraded: bool,
}

impl RotatingSink {
    /// A sink with no file, the default maximum size and stderr as the
    /// fallback.
    pub fn new() -> Self {
        RotatingSink {
            path: None,
            file: None,
            written_size: 0,
            max_size: DEFAULT_MAX_SIZE,
            file_mode: Some(DEFAULT_FILE_MODE),
            fallback: Box::new(io::stderr()),
            degraded: false,
        }
    }

    /// Replace the fallback writer.
    pub fn with_fallback<W: Write + Send + Sync + 'static>(mut self, fallback: W) -> Self {
        self.fallback = Box::new(fallback);
        self
    }

    /// Set the permission bits for files this sink creates, or `None` to
    /// leave them to the process umask. Ignored on non-Unix platforms.
    pub fn with_file_mode(mut self, file_mode: Option<u32>) -> Self {
        self.file_mode = file_mode;
        self
    }

    /// The configured log file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn written_size(&self) -> u64 {
        self.written_size
    }

    pub fn max_size(&self) -> u64 {
        self.max_size
    }

    /// Whether a log file is currently open.
    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }

    /// Set the rotation threshold. A zero threshold is rejected and the
    /// previous value kept.
    pub fn set_max_size<S: Into<RotationSize>>(&mut self, size: S) -> Result<(), LoggerError> {
        let bytes = size.into().bytes();
        if bytes == 0 {
            return Err(LoggerError::InvalidMaxSize);
        }
        self.max_size = bytes;
        Ok(())
    }

    /// Direct output to `path`.
    ///
    /// The file is created if missing (along with its parent directories) and
    /// appended to if present; the byte count starts from its current size.
    /// Any previously open file is closed. If `path` cannot be opened the
    /// sink keeps its previous file, path and count.
    pub fn configure<P: AsRef<Path>>(&mut self, path: P) -> Result<(), LoggerError> {
        let path = path.as_ref().to_path_buf();
        let file = open_log_file(&path, OpenMode::Append, self.file_mode)?;

        if let Some(mut old) = self.file.take() {
            if let Err(err) = old.flush() {
                self.diagnostic(format_args!("failed to flush previous log file: {err}"));
            }
        }

        self.written_size = current_file_size(&path);
        self.file = Some(file);
        self.path = Some(path);
        self.degraded = false;
        Ok(())
    }

    /// True iff a path is configured and the current file has grown past the
    /// maximum size.
    pub fn needs_rotation(&self) -> bool {
        self.path.is_some() && self.written_size > self.max_size
    }

    /// Append `line` followed by a newline, rotating afterwards if the file
    /// has grown too large.
    pub fn write_line(&mut self, line: &str) {
        let mut record = String::with_capacity(line.len() + 1);
        record.push_str(line);
        record.push('\n');
        self.write_record(record.as_bytes());
    }

    /// Append `buf` verbatim with the same counting and rotation as
    /// [`RotatingSink::write_line`].
    pub fn write_record(&mut self, buf: &[u8]) {
        if self.path.is_none() {
            self.write_fallback(buf);
            return;
        }
        if !self.ensure_live() {
            self.write_fallback(buf);
            return;
        }

        let appended = match self.file.as_mut() {
            Some(file) => file.write_all(buf),
            None => Err(io::Error::from(io::ErrorKind::NotFound)),
        };
        match appended {
            Ok(()) => self.written_size += buf.len() as u64,
            Err(err) => {
                self.diagnostic(format_args!("failed to write to log file: {err}"));
                self.write_fallback(buf);
                return;
            }
        }

        if self.needs_rotation() {
            self.rotate();
        }
    }

    /// Move the current file to `<path>.prev` and start a new, empty one.
    ///
    /// If the file has disappeared it is simply recreated. If it cannot be
    /// renamed or copied it is deleted, since a logger that can still write
    /// is worth more than the old contents. If the new file cannot be opened
    /// the sink falls back until a later write manages to reopen it. None of
    /// these failures are returned; each one is reported on the fallback.
    pub fn rotate(&mut self) {
        let Some(path) = self.path.clone() else {
            return;
        };

        if let Err(err) = fs::metadata(&path) {
            self.diagnostic(format_args!("could not stat log file '{}': {err}", path.display()));
            self.recover();
            return;
        }

        if let Some(mut file) = self.file.take() {
            if let Err(err) = file.flush() {
                self.diagnostic(format_args!("failed to flush log file '{}': {err}", path.display()));
            }
        }

        let prev = prev_path(&path);
        match fs::remove_file(&prev) {
            Ok(()) => {}
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => self.diagnostic(format_args!("failed to remove '{}': {err}", prev.display())),
        }

        if let Err(err) = fs::rename(&path, &prev) {
            self.diagnostic(format_args!(
                "failed to rename '{}' to '{}': {err}",
                path.display(),
                prev.display()
            ));
            if let Err(err) = fs::copy(&path, &prev) {
                self.diagnostic(format_args!(
                    "failed to copy '{}' to '{}', discarding it: {err}",
                    path.display(),
                    prev.display()
                ));
                if let Err(err) = fs::remove_file(&path) {
                    self.diagnostic(format_args!("failed to remove '{}': {err}", path.display()));
                }
            }
        }

        self.open_fresh(&path);
    }

    /// Flush and release the open file. Closing a sink that has no open file
    /// does nothing. The path stays configured, so a later write opens it
    /// again.
    pub fn close(&mut self) -> Result<(), LoggerError> {
        if let Some(mut file) = self.file.take() {
            file.flush()?;
        }
        Ok(())
    }

    /// Close the file and forget the path; later records go to the
    /// fallback.
    pub fn detach(&mut self) -> Result<(), LoggerError> {
        let closed = self.close();
        self.path = None;
        self.written_size = 0;
        self.degraded = false;
        closed
    }

    /// Make sure a usable handle to the configured path is open.
    ///
    /// A file removed behind our back is recreated; a handle lost to
    /// [`RotatingSink::close`] or a failed rotation is reopened.
    fn ensure_live(&mut self) -> bool {
        let Some(path) = &self.path else {
            return false;
        };
        match fs::metadata(path) {
            Ok(_) if self.file.is_some() => return true,
            Ok(_) => self.reopen(),
            Err(err) => {
                if !self.degraded {
                    let path = path.display().to_string();
                    self.diagnostic(format_args!("could not stat log file '{path}': {err}"));
                }
                self.recover();
            }
        }
        self.file.is_some()
    }

    /// Drop the handle, clear whatever is left at the path and start over
    /// with an empty file.
    fn recover(&mut self) {
        let Some(path) = self.path.clone() else {
            return;
        };
        drop(self.file.take());
        match fs::remove_file(&path) {
            Ok(()) => {}
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => {
                if !self.degraded {
                    self.diagnostic(format_args!("failed to remove '{}': {err}", path.display()));
                }
            }
        }
        self.open_fresh(&path);
    }

    /// Reopen the existing file in append mode, picking up its size.
    fn reopen(&mut self) {
        let Some(path) = self.path.clone() else {
            return;
        };
        match open_log_file(&path, OpenMode::Append, self.file_mode) {
            Ok(file) => {
                self.written_size = current_file_size(&path);
                self.file = Some(file);
                self.degraded = false;
            }
            Err(err) => self.mark_degraded(err),
        }
    }

    fn open_fresh(&mut self, path: &Path) {
        match open_log_file(path, OpenMode::Truncate, self.file_mode) {
            Ok(file) => {
                self.file = Some(file);
                self.written_size = 0;
                self.degraded = false;
            }
            Err(err) => self.mark_degraded(err),
        }
    }

    fn mark_degraded(&mut self, err: LoggerError) {
        self.file = None;
        if !self.degraded {
            self.diagnostic(format_args!("log file unusable, writing to fallback: {err}"));
        }
        self.degraded = true;
    }

    fn write_fallback(&mut self, buf: &[u8]) {
        // Nowhere left to report a failing fallback.
        let _ = self.fallback.write_all(buf);
        let _ = self.fallback.flush();
    }

    fn diagnostic(&mut self, args: fmt::Arguments<'_>) {
        let _ = writeln!(self.fallback, "rollog: {args}");
        let _ = self.fallback.flush();
    }
}

impl Default for RotatingSink {
    fn default() -> Self {
        RotatingSink::new()
    }
}

impl fmt::Debug for RotatingSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RotatingSink")
            .field("path", &self.path)
            .field("open", &self.file.is_some())
            .field("written_size", &self.written_size)
            .field("max_size", &self.max_size)
            .field("file_mode", &self.file_mode)
            .field("degraded", &self.degraded)
            .finish_non_exhaustive()
    }
}

impl Drop for RotatingSink {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

/// Bytes are appended as given; a write always reports the whole buffer as
/// written because failures are absorbed by the fallback.
impl Write for RotatingSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_record(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.file.as_mut() {
            Some(file) => file.flush(),
            None => self.fallback.flush(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OpenMode {
    /// Keep existing contents and append to them.
    Append,
    /// Start from an empty file.
    Truncate,
}

/// Open a log file, creating it (and its directory) if needed.
fn open_log_file(path: &Path, mode: OpenMode, file_mode: Option<u32>) -> Result<fs::File, LoggerError> {
    let mut open_options = fs::OpenOptions::new();
    match mode {
        OpenMode::Append => open_options.append(true),
        OpenMode::Truncate => open_options.write(true).truncate(true),
    };
    open_options.create(true);

    #[cfg(unix)]
    {
        if let Some(file_mode) = file_mode {
            open_options.mode(file_mode);
        }
    }
    #[cfg(not(unix))]
    let _ = file_mode;

    let mut open_res = open_options.open(path);
    if open_res.is_err() {
        // Create the directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|err| LoggerError::CreateDirectoryFailed(parent.to_path_buf(), err.to_string()))?;
            open_res = open_options.open(path);
        }
    }

    open_res.map_err(|err| LoggerError::OpenFailed(path.to_path_buf(), err.to_string()))
}

/// Size of the file at `path`, or 0 if it cannot be determined.
fn current_file_size(path: &Path) -> u64 {
    fs::metadata(path).map_or(0, |m| m.len())
}
