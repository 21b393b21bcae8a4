//! # daylog-tokio
//! Daily log files for tokio runtimes. Writes run on tokio's blocking pool so
//! async tasks never wait on disk I/O.
//!
//! ## Usage
//! ```toml
//! // Cargo.toml
//! ...
//! [dependencies]
//! daylog-tokio = "0.1.0"
//! tokio = {version = "1.40.0", features = ["full"]}
//! ```
//!
//! ```rust
//! use daylog_tokio::{AsyncDailyLog, LogSettings};
//!
//! #[tokio::main]
//! async fn main() {
//!     let dir = tempfile::tempdir().unwrap();
//!     let log = AsyncDailyLog::new(dir.path());
//!     log.initialize(&LogSettings::new("app-logs")).unwrap();
//!     log.info("Hello, world!").await.unwrap();
//!     assert!(dir.path().join("app-logs/Info").is_dir());
//! }
//! ```

use std::{path::PathBuf, sync::Arc};

pub use daylog_core::{
    Clock, ConfigError, DEFAULT_LOG_PATH, Environment, Fault, LogError, LogSettings, Logger,
    ManualClock, SettingsSource, Severity, SystemClock,
};
use tokio::task::{JoinHandle, spawn_blocking};

/// A [`Logger`] whose writes are awaited instead of blocking the task.
#[derive(Clone, Debug)]
pub struct AsyncDailyLog {
    logger: Arc<Logger>,
}

impl AsyncDailyLog {
    pub fn new<P: Into<PathBuf>>(base_dir: P) -> Self {
        Self::from_logger(Arc::new(Logger::new(base_dir)))
    }

    /// Shares an existing logger, e.g. one also used from plain threads.
    pub fn from_logger(logger: Arc<Logger>) -> Self {
        Self { logger }
    }

    /// See [`Logger::initialize`]. Performs no I/O, so it is not async.
    pub fn initialize<S: SettingsSource + ?Sized>(&self, source: &S) -> Result<(), ConfigError> {
        self.logger.initialize(source)
    }

    pub fn logger(&self) -> &Arc<Logger> {
        &self.logger
    }

    pub async fn info<M: Into<String>>(&self, message: M) -> Result<(), LogError> {
        self.log(Severity::Info, message).await
    }

    pub async fn error<M: Into<String>>(&self, message: M) -> Result<(), LogError> {
        self.log(Severity::Error, message).await
    }

    pub async fn fault<F: Into<Fault>>(&self, fault: F) -> Result<(), LogError> {
        let logger = Arc::clone(&self.logger);
        let fault = fault.into();
        join(spawn_blocking(move || logger.log_fault(&fault))).await
    }

    pub async fn log<M: Into<String>>(&self, severity: Severity, message: M) -> Result<(), LogError> {
        join(self.spawn(severity, message)).await
    }

    /// Starts the write without awaiting it. Dropping the handle detaches it.
    pub fn spawn<M: Into<String>>(
        &self,
        severity: Severity,
        message: M,
    ) -> JoinHandle<Result<(), LogError>> {
        let logger = Arc::clone(&self.logger);
        let message = message.into();
        spawn_blocking(move || logger.log(severity, &message))
    }
}

async fn join(handle: JoinHandle<Result<(), LogError>>) -> Result<(), LogError> {
    handle
        .await
        .unwrap_or_else(|e| Err(LogError::Dispatch(e.to_string())))
}
