//! # daylog
//! Thread-safe daily log files, one folder per severity, written off the caller's thread.
//!
//! Every line lands in `<base>/<path>/<Info|Error>/<YYYYMMDD>.txt` as
//! `HH:mm:ss LEVEL message\r\n`. A new file starts at each local midnight.
//!
//! ## Usage
//! ```toml
//! // Cargo.toml
//! ...
//! [dependencies]
//! daylog = "0.1.0"
//! ```
//!
//! ```rust
//! use daylog::{LogSettings, logger_config};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let log = logger_config()
//!     .with_base_dir(dir.path())
//!     .with_settings(LogSettings::new("app-logs"))
//!     .build()
//!     .expect("Unable to start log writers");
//!
//! // fire and forget
//! drop(log.info("server started"));
//! // or wait for the line to hit the file
//! log.error("disk almost full").wait().unwrap();
//! ```
//!
//! ## Configuration
//! Settings are fixed by the first initialization, later ones are ignored.
//! They can come from a value, from the environment (`DAYLOG_LOG_PATH`), or
//! from any [`SettingsSource`].
//!
//! ```rust
//! use daylog::{Environment, LogSettings, logger_config};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let log = logger_config().with_base_dir(dir.path()).build().unwrap();
//! // falls back to "logs" if the environment cannot be read
//! log.initialize(&Environment).ok();
//! log.initialize(&LogSettings::new("ignored")).unwrap();
//! assert_ne!(log.logger().log_path(), "ignored");
//! ```
//!
//! ## `log` macros
//! ```rust
//! use daylog::logger_config;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let _guard = logger_config()
//!     .with_base_dir(dir.path())
//!     .build()
//!     .unwrap()
//!     .install_global()
//!     .expect("Another logger is already installed");
//! log::info!("goes to the Info folder");
//! log::error!("goes to the Error folder");
//! // guard ensures pending lines are written when dropped
//! ```

mod bridge;
mod dispatch;

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

pub use bridge::LoggerGuard;
pub use daylog_core::{
    Clock, ConfigError, DEFAULT_LOG_PATH, Environment, Fault, FromFn, LogEntry, LogError,
    LogSettings, Logger, ManualClock, SettingsSource, Severity, SystemClock, from_fn,
};
pub use dispatch::{WriteHandle, WritePool};

/// Number of writer threads unless told otherwise.
pub const DEFAULT_WORKERS: usize = 2;

/// A [`Logger`] whose writes run on a [`WritePool`].
pub struct DailyLog {
    logger: Arc<Logger>,
    pool: WritePool,
}

impl DailyLog {
    pub fn new(logger: Arc<Logger>, pool: WritePool) -> Self {
        Self { logger, pool }
    }

    /// See [`Logger::initialize`].
    pub fn initialize<S: SettingsSource + ?Sized>(&self, source: &S) -> Result<(), ConfigError> {
        self.logger.initialize(source)
    }

    pub fn logger(&self) -> &Arc<Logger> {
        &self.logger
    }

    pub fn info<M: Into<String>>(&self, message: M) -> WriteHandle {
        self.submit(Severity::Info, message.into())
    }

    pub fn error<M: Into<String>>(&self, message: M) -> WriteHandle {
        self.submit(Severity::Error, message.into())
    }

    pub fn fault<F: Into<Fault>>(&self, fault: F) -> WriteHandle {
        let logger = Arc::clone(&self.logger);
        let fault = fault.into();
        self.pool.submit(move || logger.log_fault(&fault))
    }

    pub fn submit(&self, severity: Severity, message: String) -> WriteHandle {
        let logger = Arc::clone(&self.logger);
        self.pool.submit(move || logger.log(severity, &message))
    }

    pub fn info_blocking(&self, message: &str) -> Result<(), LogError> {
        self.logger.log_info(message)
    }

    pub fn error_blocking(&self, message: &str) -> Result<(), LogError> {
        self.logger.log_error(message)
    }

    pub fn fault_blocking(&self, fault: &Fault) -> Result<(), LogError> {
        self.logger.log_fault(fault)
    }

    /// Waits for every submitted write, then stops the writer threads.
    /// Writes submitted afterwards fail with [`LogError::Dispatch`].
    pub fn shutdown(&self) {
        self.pool.shutdown();
    }
}

/// Builder for configuring and starting a [`DailyLog`].
pub struct ConfigBuilder {
    base_dir: Option<PathBuf>,
    workers: usize,
    clock: Option<Arc<dyn Clock>>,
    settings: Option<LogSettings>,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self {
            base_dir: None,
            workers: DEFAULT_WORKERS,
            clock: None,
            settings: None,
        }
    }
}

impl ConfigBuilder {
    /// Sets the directory the log sub-path is resolved against.
    pub fn with_base_dir<P: AsRef<Path>>(self, path: P) -> Self {
        Self {
            base_dir: Some(path.as_ref().to_path_buf()),
            ..self
        }
    }
    /// Sets the number of writer threads (at least one).
    pub fn with_workers(self, workers: usize) -> Self {
        Self { workers, ..self }
    }
    /// Sets the clock used for timestamps and day files.
    pub fn with_clock(self, clock: Arc<dyn Clock>) -> Self {
        Self {
            clock: Some(clock),
            ..self
        }
    }
    /// Initializes the logger with these settings on build.
    pub fn with_settings(self, settings: LogSettings) -> Self {
        Self {
            settings: Some(settings),
            ..self
        }
    }
    /// Maybe initializes the logger on build.
    pub fn maybe_with_settings(self, settings: Option<LogSettings>) -> Self {
        Self { settings, ..self }
    }
    /// Starts the writer threads.
    pub fn build(self) -> Result<DailyLog, std::io::Error> {
        let Self {
            base_dir,
            workers,
            clock,
            settings,
        } = self;
        let base_dir = base_dir.unwrap_or_else(default_base_dir);
        let logger = match clock {
            Some(clock) => Logger::with_clock(base_dir, clock),
            None => Logger::new(base_dir),
        };
        if let Some(settings) = settings {
            // A plain value cannot fail to read.
            let _ = logger.initialize(&settings);
        }
        Ok(DailyLog::new(Arc::new(logger), WritePool::new(workers)?))
    }
}

/// Directory of the running executable, else the working directory.
pub fn default_base_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns a default ConfigBuilder for configuring the logger.
pub fn logger_config() -> ConfigBuilder {
    ConfigBuilder::default()
}
