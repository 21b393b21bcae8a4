use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use daylog_core::{LogError, Severity};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

use crate::DailyLog;

/// Routes `log` records into day files: errors to `Error`, everything else to `Info`.
struct DayLogger {
    log: Arc<DailyLog>,
    failure_reported: Arc<AtomicBool>,
}

impl Log for DayLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        // Our own diagnostics would feed back into the pool.
        !metadata.target().starts_with("daylog")
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let severity = match record.level() {
            Level::Error => Severity::Error,
            _ => Severity::Info,
        };
        // The guard is gone, nothing would run the write.
        if self.log.pool.is_stopped() {
            report_once(
                &self.failure_reported,
                &LogError::Dispatch("logger guard dropped, records are discarded".into()),
            );
            return;
        }
        let message = record.args().to_string();
        let logger = Arc::clone(self.log.logger());
        let failure_reported = Arc::clone(&self.failure_reported);
        drop(self.log.pool.submit(move || {
            let outcome = logger.log(severity, &message);
            if let Err(e) = &outcome {
                report_once(&failure_reported, e);
            }
            outcome
        }));
    }

    // Every write is a full open-append-close, nothing is buffered.
    fn flush(&self) {}
}

/// Only the first failure reaches stderr.
fn report_once(reported: &AtomicBool, e: &LogError) {
    if !reported.swap(true, Ordering::Relaxed) {
        eprintln!("daylog: {e}");
    }
}

/// Guard returned by [`DailyLog::install_global`].
/// Pending lines are written and the writer threads stopped when it is dropped.
#[must_use = "LoggerGuard must be kept alive to ensure logging works. Do \"let _guard = logger_config().build()?.install_global()?;\""]
pub struct LoggerGuard {
    log: Arc<DailyLog>,
}

impl LoggerGuard {
    pub fn log(&self) -> &DailyLog {
        &self.log
    }
}

impl Drop for LoggerGuard {
    fn drop(&mut self) {
        self.log.shutdown();
    }
}

impl DailyLog {
    /// Installs this log as the `log` crate's global logger.
    pub fn install_global(self) -> Result<LoggerGuard, SetLoggerError> {
        let log = Arc::new(self);
        log::set_boxed_logger(Box::new(DayLogger {
            log: Arc::clone(&log),
            failure_reported: Arc::new(AtomicBool::new(false)),
        }))?;
        log::set_max_level(LevelFilter::Trace);
        Ok(LoggerGuard { log })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger_config;

    fn day_logger(log: DailyLog) -> DayLogger {
        DayLogger {
            log: Arc::new(log),
            failure_reported: Arc::new(AtomicBool::new(false)),
        }
    }

    #[test]
    fn test_records_after_shutdown_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let log = logger_config().with_base_dir(dir.path()).build().unwrap();
        log.shutdown();
        let logger = day_logger(log);

        logger.log(
            &Record::builder()
                .args(format_args!("too late"))
                .level(Level::Info)
                .target("app")
                .build(),
        );
        assert!(logger.failure_reported.load(Ordering::Relaxed));
        assert!(!dir.path().join("logs").exists());
    }

    #[test]
    fn test_write_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "").unwrap();
        let logger = day_logger(
            logger_config()
                .with_base_dir(&blocker)
                .with_workers(1)
                .build()
                .unwrap(),
        );

        logger.log(
            &Record::builder()
                .args(format_args!("lost"))
                .level(Level::Error)
                .target("app")
                .build(),
        );
        logger.log.shutdown();
        assert!(logger.failure_reported.load(Ordering::Relaxed));
    }

    #[test]
    fn test_own_targets_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let logger = day_logger(logger_config().with_base_dir(dir.path()).build().unwrap());
        logger.log(
            &Record::builder()
                .args(format_args!("internal"))
                .level(Level::Warn)
                .target("daylog::dispatch")
                .build(),
        );
        logger.log.shutdown();
        assert!(!dir.path().join("logs").exists());
    }
}
