use {
    crate::LoggerError,
    std::{fmt, str::FromStr},
};

/// Severity of a log message.
///
/// Levels are totally ordered from least to most severe:
/// `Trace < Debug < Info < Warn < Error < Critical`.
///
/// # Examples
/// ```
/// use rollog::Level;
///
/// assert!(Level::Warn > Level::Info);
/// assert_eq!("warning".parse::<Level>().unwrap(), Level::Warn);
/// assert_eq!(Level::Critical.to_string(), "CRITICAL");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    /// Very fine grained diagnostics, usually disabled.
    Trace,
    /// Information useful while developing.
    Debug,
    /// Normal operational messages. This is the default threshold.
    Info,
    /// Something unexpected that the program recovered from.
    Warn,
    /// A failed operation.
    Error,
    /// A failure the program probably cannot continue from.
    /// Critical messages are never suppressed.
    Critical,
}

impl Level {
    /// All levels, least severe first.
    pub const ALL: [Level; 6] = [
        Level::Trace,
        Level::Debug,
        Level::Info,
        Level::Warn,
        Level::Error,
        Level::Critical,
    ];

    /// The upper-case tag written into each log line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Trace => "TRACE",
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Critical => "CRITICAL",
        }
    }
}

impl Default for Level {
    fn default() -> Self {
        Level::Info
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(Level::Trace),
            "debug" => Ok(Level::Debug),
            "info" => Ok(Level::Info),
            "warn" | "warning" => Ok(Level::Warn),
            "error" => Ok(Level::Error),
            "critical" | "crit" | "fatal" => Ok(Level::Critical),
            _ => Err(LoggerError::InvalidLevel(s.to_string())),
        }
    }
}

/// Threshold check deciding which messages reach the sink.
///
/// The comparison is inclusive: a message exactly at the threshold is
/// logged. Synchronization is the owner's business; inside [`crate::Logger`]
/// the filter lives behind the logger's lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelFilter {
    threshold: Level,
}

impl LevelFilter {
    pub fn new(threshold: Level) -> Self {
        LevelFilter { threshold }
    }

    /// True iff a message of `level` should be forwarded to the sink.
    pub fn should_log(&self, level: Level) -> bool {
        level == Level::Critical || level >= self.threshold
    }

    pub fn threshold(&self) -> Level {
        self.threshold
    }

    pub fn set_threshold(&mut self, threshold: Level) {
        self.threshold = threshold;
    }
}

impl Default for LevelFilter {
    fn default() -> Self {
        LevelFilter::new(Level::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admits_exactly_the_levels_at_or_above_threshold() {
        for threshold in Level::ALL {
            let filter = LevelFilter::new(threshold);
            for level in Level::ALL {
                assert_eq!(
                    filter.should_log(level),
                    level >= threshold,
                    "threshold {threshold}, level {level}"
                );
            }
        }
    }

    #[test]
    fn critical_always_passes() {
        let mut filter = LevelFilter::default();
        filter.set_threshold(Level::Critical);
        assert!(filter.should_log(Level::Critical));
        assert!(!filter.should_log(Level::Error));
    }

    #[test]
    fn threshold_round_trips_through_setter() {
        let mut filter = LevelFilter::new(Level::Trace);
        assert_eq!(filter.threshold(), Level::Trace);
        filter.set_threshold(Level::Warn);
        assert_eq!(filter.threshold(), Level::Warn);
        assert!(!filter.should_log(Level::Info));
        assert!(filter.should_log(Level::Warn));
    }

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!("TRACE".parse::<Level>().unwrap(), Level::Trace);
        assert_eq!(" Info ".parse::<Level>().unwrap(), Level::Info);
        assert_eq!("Warning".parse::<Level>().unwrap(), Level::Warn);
        assert_eq!("crit".parse::<Level>().unwrap(), Level::Critical);
        assert!(matches!(
            "verbose".parse::<Level>(),
            Err(LoggerError::InvalidLevel(s)) if s == "verbose"
        ));
    }
}
