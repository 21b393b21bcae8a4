//! # daylog-core
//! Core of daylog: per-day, per-severity, append-only text log files.
//!
//! A [`Logger`] owns a base directory and, once initialized, a log sub-path.
//! Every write lands in `<base>/<path>/<Info|Error>/<YYYYMMDD>.txt` as a single
//! `HH:mm:ss LEVEL message\r\n` line. Info and error writes are serialized by two
//! independent locks, so they never wait on each other.
//!
//! ```rust
//! use daylog_core::{LogSettings, Logger};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let logger = Logger::new(dir.path());
//! logger.initialize(&LogSettings::new("app-logs")).unwrap();
//! logger.log_info("server started").unwrap();
//! assert!(dir.path().join("app-logs").join("Info").is_dir());
//! ```

mod clock;
mod config;
mod entry;
mod error;
mod logger;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{DEFAULT_LOG_PATH, Environment, FromFn, LogSettings, SettingsSource, from_fn};
pub use entry::{Fault, LogEntry, Severity};
pub use error::{ConfigError, LogError};
pub use logger::Logger;
