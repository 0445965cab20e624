/// Log a message at an explicit [`Level`](crate::Level).
///
/// The first argument is the logger (anything with a `log` method taking
/// `(Level, &str, &[Value])`), followed by the level, a template with `{}`
/// placeholders and the arguments. Each argument is converted with
/// [`Value::from`](crate::Value).
///
/// ```
/// use rollog::{log, Level, Logger};
///
/// let logger = Logger::new(Level::Info);
/// log!(logger, Level::Warn, "disk {} is {}% full", "/dev/sda1", 93);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $template:expr $(, $arg:expr)* $(,)?) => {
        $logger.log($level, $template, &[$($crate::Value::from($arg)),*])
    };
}

#[macro_export]
macro_rules! trace {
    ($logger:expr, $($rest:tt)+) => {
        $crate::log!($logger, $crate::Level::Trace, $($rest)+)
    };
}

#[macro_export]
macro_rules! debug {
    ($logger:expr, $($rest:tt)+) => {
        $crate::log!($logger, $crate::Level::Debug, $($rest)+)
    };
}

#[macro_export]
macro_rules! info {
    ($logger:expr, $($rest:tt)+) => {
        $crate::log!($logger, $crate::Level::Info, $($rest)+)
    };
}

#[macro_export]
macro_rules! warn {
    ($logger:expr, $($rest:tt)+) => {
        $crate::log!($logger, $crate::Level::Warn, $($rest)+)
    };
}

#[macro_export]
macro_rules! error {
    ($logger:expr, $($rest:tt)+) => {
        $crate::log!($logger, $crate::Level::Error, $($rest)+)
    };
}

#[macro_export]
macro_rules! critical {
    ($logger:expr, $($rest:tt)+) => {
        $crate::log!($logger, $crate::Level::Critical, $($rest)+)
    };
}

/// Log at critical level and evaluate to the [`Fatal`](crate::Fatal) the
/// caller must raise or propagate.
///
/// ```should_panic
/// use rollog::{fatal, Level, Logger};
///
/// let logger = Logger::new(Level::Info);
/// fatal!(logger, "lost connection to {}", "primary").raise();
/// ```
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $template:expr $(, $arg:expr)* $(,)?) => {
        $logger.panic($template, &[$($crate::Value::from($arg)),*])
    };
}
