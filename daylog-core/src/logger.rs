use std::{
    fmt,
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError},
};

use chrono::NaiveDate;
use log::{debug, warn};

use crate::{
    clock::{Clock, SystemClock},
    config::{DEFAULT_LOG_PATH, LogSettings, SettingsSource},
    entry::{Fault, LogEntry, Severity},
    error::{ConfigError, LogError},
};

/// Appends timestamped lines to `<base>/<path>/<Info|Error>/<YYYYMMDD>.txt`.
///
/// The logger starts uninitialized and writes under [`DEFAULT_LOG_PATH`]. The
/// first call to [`Logger::initialize`] fixes the sub-path for the rest of the
/// logger's life; later calls are ignored.
///
/// Writes of one severity are fully serialized, so lines are never torn. Info
/// and error writes go through separate locks and never wait on each other.
pub struct Logger {
    base_dir: PathBuf,
    settings: OnceLock<LogSettings>,
    info_lock: Mutex<()>,
    error_lock: Mutex<()>,
    clock: Arc<dyn Clock>,
}

impl Logger {
    pub fn new<P: Into<PathBuf>>(base_dir: P) -> Self {
        Self::with_clock(base_dir, Arc::new(SystemClock))
    }

    pub fn with_clock<P: Into<PathBuf>>(base_dir: P, clock: Arc<dyn Clock>) -> Self {
        Self {
            base_dir: base_dir.into(),
            settings: OnceLock::new(),
            info_lock: Mutex::new(()),
            error_lock: Mutex::new(()),
            clock,
        }
    }

    /// Fixes the log settings, first caller wins.
    ///
    /// Once initialized, this is a no-op that does not consult `source`. If the
    /// source fails, the default settings are stored anyway and the error is
    /// returned so the caller can decide whether it is fatal.
    pub fn initialize<S: SettingsSource + ?Sized>(&self, source: &S) -> Result<(), ConfigError> {
        if self.is_initialized() {
            debug!("logger already initialized, keeping \"{}\"", self.log_path());
            return Ok(());
        }
        let (settings, outcome) = match source.log_settings() {
            Ok(settings) => (settings, Ok(())),
            Err(e) => {
                warn!("{e}, falling back to \"{DEFAULT_LOG_PATH}\"");
                (LogSettings::default(), Err(e))
            }
        };
        match self.settings.set(settings) {
            Ok(()) => {
                debug!("logger initialized with \"{}\"", self.log_path());
                outcome
            }
            // Lost the race against a concurrent initialization.
            Err(_) => Ok(()),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.settings.get().is_some()
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Effective log sub-path.
    pub fn log_path(&self) -> &str {
        self.settings
            .get()
            .map_or(DEFAULT_LOG_PATH, LogSettings::path)
    }

    /// Folder holding the day files of `severity`.
    pub fn folder(&self, severity: Severity) -> PathBuf {
        self.base_dir.join(self.log_path()).join(severity.folder())
    }

    pub fn file_path(&self, severity: Severity, date: NaiveDate) -> PathBuf {
        self.folder(severity)
            .join(format!("{}.txt", date.format("%Y%m%d")))
    }

    pub fn log_info(&self, message: &str) -> Result<(), LogError> {
        self.log(Severity::Info, message)
    }

    pub fn log_error(&self, message: &str) -> Result<(), LogError> {
        self.log(Severity::Error, message)
    }

    /// Writes `HH:mm:ss ERROR message trace`. A missing trace leaves an empty segment.
    pub fn log_fault(&self, fault: &Fault) -> Result<(), LogError> {
        self.write(Severity::Error, |now| LogEntry::fault(now, fault))
    }

    pub fn log(&self, severity: Severity, message: &str) -> Result<(), LogError> {
        self.write(severity, |now| LogEntry::new(now, severity, message))
    }

    fn lock(&self, severity: Severity) -> MutexGuard<'_, ()> {
        let lock = match severity {
            Severity::Info => &self.info_lock,
            Severity::Error => &self.error_lock,
        };
        // The guarded data is `()`, a panic mid-write leaves nothing to repair.
        lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn write<'a, F>(&self, severity: Severity, entry: F) -> Result<(), LogError>
    where
        F: FnOnce(chrono::NaiveDateTime) -> LogEntry<'a>,
    {
        let folder = self.folder(severity);
        let _guard = self.lock(severity);
        fs::create_dir_all(&folder).map_err(io_error(&folder))?;
        let entry = entry(self.clock.now());
        let path = folder.join(entry.file_name());
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(io_error(&path))?;
        file.write_all(entry.render().as_bytes())
            .map_err(io_error(&path))
    }
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> LogError + '_ {
    move |source| LogError::Io {
        path: path.to_path_buf(),
        source,
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("base_dir", &self.base_dir)
            .field("log_path", &self.log_path())
            .field("initialized", &self.is_initialized())
            .finish()
    }
}
