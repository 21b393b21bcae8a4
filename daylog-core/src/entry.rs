use std::{backtrace::Backtrace, error::Error, fmt};

use chrono::NaiveDateTime;

/// Classification of a line. Each severity has its own folder and lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Info,
    Error,
}

impl Severity {
    /// Folder name under the log sub-path.
    pub fn folder(self) -> &'static str {
        match self {
            Severity::Info => "Info",
            Severity::Error => "Error",
        }
    }

    /// Tag written after the time on each line.
    pub fn tag(self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Error => "ERROR",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// An error worth logging together with its trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fault {
    message: String,
    stack_trace: Option<String>,
}

impl Fault {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            stack_trace: None,
        }
    }

    pub fn with_stack_trace(self, stack_trace: impl Into<String>) -> Self {
        Self {
            stack_trace: Some(stack_trace.into()),
            ..self
        }
    }

    /// Uses the error's `source()` chain as the trace.
    pub fn from_error(err: &(dyn Error + 'static)) -> Self {
        let mut causes = Vec::new();
        let mut source = err.source();
        while let Some(cause) = source {
            causes.push(format!("caused by: {cause}"));
            source = cause.source();
        }
        Self {
            message: err.to_string(),
            stack_trace: (!causes.is_empty()).then(|| causes.join("; ")),
        }
    }

    /// Captures the current call stack as the trace, regardless of `RUST_BACKTRACE`.
    pub fn capture(err: &(dyn Error + 'static)) -> Self {
        Self::new(err.to_string()).with_stack_trace(Backtrace::force_capture().to_string())
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn stack_trace(&self) -> Option<&str> {
        self.stack_trace.as_deref()
    }
}

impl From<String> for Fault {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for Fault {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// One line about to be appended. Never kept past the write.
#[derive(Debug, Clone, Copy)]
pub struct LogEntry<'a> {
    pub timestamp: NaiveDateTime,
    pub severity: Severity,
    pub message: &'a str,
    /// `Some` for faults, even when the trace itself is empty.
    pub stack_trace: Option<&'a str>,
}

impl<'a> LogEntry<'a> {
    pub fn new(timestamp: NaiveDateTime, severity: Severity, message: &'a str) -> Self {
        Self {
            timestamp,
            severity,
            message,
            stack_trace: None,
        }
    }

    pub fn fault(timestamp: NaiveDateTime, fault: &'a Fault) -> Self {
        Self {
            timestamp,
            severity: Severity::Error,
            message: fault.message(),
            stack_trace: Some(fault.stack_trace().unwrap_or_default()),
        }
    }

    /// `HH:mm:ss LEVEL message[ trace]\r\n`
    pub fn render(&self) -> String {
        let time = self.timestamp.format("%H:%M:%S");
        let mut line = format!("{time} {} {}", self.severity.tag(), self.message);
        if let Some(stack_trace) = self.stack_trace {
            line.push(' ');
            line.push_str(stack_trace);
        }
        line.push_str("\r\n");
        line
    }

    /// `YYYYMMDD.txt`
    pub fn file_name(&self) -> String {
        format!("{}.txt", self.timestamp.format("%Y%m%d"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[derive(Debug)]
    struct Outer(std::io::Error);

    impl fmt::Display for Outer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("settings unavailable")
        }
    }

    impl Error for Outer {
        fn source(&self) -> Option<&(dyn Error + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn test_render_info() {
        let entry = LogEntry::new(at(10, 0, 0), Severity::Info, "server started");
        assert_eq!(entry.render(), "10:00:00 INFO server started\r\n");
        assert_eq!(entry.file_name(), "20240101.txt");
    }

    #[test]
    fn test_render_empty_message() {
        let entry = LogEntry::new(at(7, 5, 3), Severity::Error, "");
        assert_eq!(entry.render(), "07:05:03 ERROR \r\n");
    }

    #[test]
    fn test_render_fault() {
        let fault = Fault::new("boom").with_stack_trace("at main");
        let entry = LogEntry::fault(at(23, 59, 59), &fault);
        assert_eq!(entry.render(), "23:59:59 ERROR boom at main\r\n");

        let fault = Fault::new("boom");
        let entry = LogEntry::fault(at(23, 59, 59), &fault);
        assert_eq!(entry.render(), "23:59:59 ERROR boom \r\n");
    }

    #[test]
    fn test_fault_from_error_chain() {
        let err = Outer(std::io::Error::new(std::io::ErrorKind::NotFound, "no file"));
        let fault = Fault::from_error(&err);
        assert_eq!(fault.message(), "settings unavailable");
        assert_eq!(fault.stack_trace(), Some("caused by: no file"));

        let leaf = std::io::Error::other("leaf");
        assert_eq!(Fault::from_error(&leaf).stack_trace(), None);
    }

    #[test]
    fn test_fault_capture_has_trace() {
        let err = std::io::Error::other("disk gone");
        let fault = Fault::capture(&err);
        assert_eq!(fault.message(), "disk gone");
        assert!(fault.stack_trace().is_some_and(|t| !t.is_empty()));
    }
}
