//! Log backend that hands facade logs to the host's logger
//!
//! Hosts embedding the facade have no stderr worth reading. This backend
//! installs itself as the global `log` logger and forwards every enabled
//! record to a [`LogCallback`] so messages land in os_log or Logcat next to
//! the vendor SDK's own output.

use std::sync::{Arc, OnceLock, RwLock};

use log::{Level, Log, Metadata, Record, SetLoggerError};

use super::types::{FfiLogLevel, LogCallback};

static HOST_LOGGER: OnceLock<HostLogger> = OnceLock::new();

struct Sink {
    callback: Option<Arc<dyn LogCallback>>,
    /// Level the host asked for
    host_level: Level,
    /// Vendor debug logging is on; forward at least `Debug`
    debug: bool,
    max_level: Level,
}

impl Sink {
    fn apply(&mut self) -> Level {
        self.max_level = if self.debug {
            self.host_level.max(Level::Debug)
        } else {
            self.host_level
        };
        self.max_level
    }
}

struct HostLogger {
    sink: RwLock<Sink>,
}

impl HostLogger {
    fn new(max_level: Level) -> Self {
        Self {
            sink: RwLock::new(Sink {
                callback: None,
                host_level: max_level,
                debug: false,
                max_level,
            }),
        }
    }

    fn update(&self, f: impl FnOnce(&mut Sink)) {
        if let Ok(mut sink) = self.sink.write() {
            f(&mut sink);
        }
    }

    /// Recompute the forwarded level after a change; returns it
    fn update_level(&self, f: impl FnOnce(&mut Sink)) -> Option<Level> {
        let mut sink = self.sink.write().ok()?;
        f(&mut sink);
        Some(sink.apply())
    }
}

impl Log for HostLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.sink
            .read()
            .map(|sink| sink.callback.is_some() && metadata.level() <= sink.max_level)
            .unwrap_or(false)
    }

    fn log(&self, record: &Record) {
        // Clone the callback out so the lock is not held across the foreign call
        let callback = match self.sink.read() {
            Ok(sink) if record.level() <= sink.max_level => sink.callback.clone(),
            _ => None,
        };

        if let Some(callback) = callback {
            callback.on_log(
                FfiLogLevel::from(record.level()),
                record.target().to_string(),
                record.args().to_string(),
            );
        }
    }

    fn flush(&self) {}
}

/// Install the host logger as the process-wide `log` backend
///
/// Fails when another logger (env_logger in the beacon binary, for example)
/// was installed first. The callback is stored either way, so a later
/// successful install picks it up.
pub fn install_host_logger(
    callback: Option<Arc<dyn LogCallback>>,
    max_level: Level,
) -> Result<(), SetLoggerError> {
    let logger = HOST_LOGGER.get_or_init(|| HostLogger::new(max_level));
    let level = logger
        .update_level(|sink| {
            sink.callback = callback;
            sink.host_level = max_level;
        })
        .unwrap_or(max_level);

    log::set_logger(logger)?;
    log::set_max_level(level.to_level_filter());
    Ok(())
}

/// Swap the callback receiving log records; `None` silences the backend
pub fn set_log_callback(callback: Option<Arc<dyn LogCallback>>) {
    if let Some(logger) = HOST_LOGGER.get() {
        logger.update(|sink| sink.callback = callback);
    }
}

/// Change the verbosity the host asked for
///
/// While vendor debug logging is on, at least `Debug` is still forwarded.
pub fn set_log_level(level: Level) {
    if let Some(applied) = HOST_LOGGER
        .get()
        .and_then(|logger| logger.update_level(|sink| sink.host_level = level))
    {
        log::set_max_level(applied.to_level_filter());
    }
}

/// Follow the vendor debug switch: raise to `Debug` while on, back to the
/// host's level when off
pub fn set_debug_logging(enabled: bool) {
    if let Some(applied) = HOST_LOGGER
        .get()
        .and_then(|logger| logger.update_level(|sink| sink.debug = enabled))
    {
        log::set_max_level(applied.to_level_filter());
    }
}

/// Level the host logger currently forwards, if it was installed
pub fn current_log_level() -> Option<Level> {
    HOST_LOGGER
        .get()
        .and_then(|logger| logger.sink.read().ok().map(|sink| sink.max_level))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Capture(Mutex<Vec<(String, String)>>);

    impl LogCallback for Capture {
        fn on_log(&self, _level: FfiLogLevel, target: String, message: String) {
            self.0.lock().unwrap().push((target, message));
        }
    }

    #[test]
    fn test_records_below_level_are_dropped() {
        let capture = Arc::new(Capture::default());
        let logger = HostLogger::new(Level::Warn);
        logger.update(|sink| sink.callback = Some(capture.clone()));

        logger.log(
            &Record::builder()
                .level(Level::Debug)
                .target("marketingcloud::inbox")
                .args(format_args!("hidden"))
                .build(),
        );
        logger.log(
            &Record::builder()
                .level(Level::Warn)
                .target("marketingcloud::facade")
                .args(format_args!("shown {}", 1))
                .build(),
        );

        let seen = capture.0.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0], ("marketingcloud::facade".to_string(), "shown 1".to_string()));
    }

    #[test]
    fn test_debug_switch_restores_host_level() {
        let logger = HostLogger::new(Level::Error);

        assert_eq!(logger.update_level(|sink| sink.debug = true), Some(Level::Debug));
        assert_eq!(logger.update_level(|sink| sink.debug = false), Some(Level::Error));

        // A host already at Trace is not lowered by the debug switch
        logger.update_level(|sink| sink.host_level = Level::Trace);
        assert_eq!(logger.update_level(|sink| sink.debug = true), Some(Level::Trace));
    }

    #[test]
    fn test_host_level_change_keeps_debug_floor() {
        let logger = HostLogger::new(Level::Info);
        logger.update_level(|sink| sink.debug = true);

        assert_eq!(logger.update_level(|sink| sink.host_level = Level::Warn), Some(Level::Debug));
        assert_eq!(logger.update_level(|sink| sink.debug = false), Some(Level::Warn));
    }

    #[test]
    fn test_disabled_without_callback() {
        let logger = HostLogger::new(Level::Trace);
        let metadata = Metadata::builder().level(Level::Error).build();
        assert!(!logger.enabled(&metadata));
    }
}
