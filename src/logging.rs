//! # Logging Setup
//!
//! Installs the global `tracing` subscriber: console output always, plus a
//! daily-rolled log file when `logging.dir` is configured.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;
use crate::error::{Result, TeleopError};

/// Log file name prefix inside `logging.dir`
pub const LOG_FILE_PREFIX: &str = "robot-teleop.log";

/// Parse a filter directive such as `info` or `robot_teleop=debug,warn`.
///
/// # Errors
///
/// Returns `Logging` if the directive does not parse.
pub fn filter_for(level: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(level)
        .map_err(|e| TeleopError::Logging(format!("Invalid log level '{}': {}", level, e)))
}

/// Install the global subscriber.
///
/// `RUST_LOG` overrides `logging.level`. The returned guard must live until
/// exit so buffered file output is flushed.
///
/// # Errors
///
/// Returns `Logging` if the level does not parse or a subscriber is already
/// installed.
pub fn init(logging: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => filter_for(&logging.level)?,
    };

    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer());

    let guard = match &logging.dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            registry
                .with(fmt::layer().with_ansi(false).with_writer(writer))
                .try_init()
                .map_err(|e| TeleopError::Logging(e.to_string()))?;
            Some(guard)
        }
        None => {
            registry
                .try_init()
                .map_err(|e| TeleopError::Logging(e.to_string()))?;
            None
        }
    };

    Ok(guard)
}

#[cfg(test)]
pub mod mocks {
    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    /// Shared in-memory log sink
    #[derive(Clone, Default)]
    pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl LogBuffer {
        pub fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for LogBuffer {
        type Writer = LogBuffer;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    /// Run `f` with a thread-local subscriber and return what it logged.
    pub fn capture_logs<R>(f: impl FnOnce() -> R) -> (R, String) {
        let buffer = LogBuffer::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(buffer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::TRACE)
            .finish();

        let result = tracing::subscriber::with_default(subscriber, f);
        (result, buffer.contents())
    }
}

#[cfg(test)]
mod tests {
    use super::mocks::capture_logs;
    use super::*;

    #[test]
    fn test_filter_for_valid_levels() {
        assert!(filter_for("info").is_ok());
        assert!(filter_for("warn,robot_teleop=debug").is_ok());
    }

    #[test]
    fn test_filter_for_invalid_level() {
        match filter_for("robot_teleop=loud") {
            Err(TeleopError::Logging(msg)) => assert!(msg.contains("robot_teleop=loud")),
            other => panic!("Expected Logging error, got: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_capture_logs_records_level_and_message() {
        let ((), logs) = capture_logs(|| tracing::warn!("servo stalled"));
        assert!(logs.contains("WARN"));
        assert!(logs.contains("servo stalled"));
    }
}
