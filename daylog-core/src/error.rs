use std::path::PathBuf;

/// Failure to read the log settings at initialization.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("log configuration is missing")]
    Missing,
    #[error("log configuration could not be read: {0}")]
    Unreadable(String),
}

/// Failure of a single write.
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    #[error("unable to write log file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The background worker or task running the write went away before answering.
    #[error("log write was lost before completion: {0}")]
    Dispatch(String),
}
