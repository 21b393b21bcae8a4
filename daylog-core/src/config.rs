use std::path::{Component, Path, PathBuf};

use derive_from_env::FromEnv;

use crate::error::ConfigError;

/// Sub-path used when no configuration was supplied or it was empty.
pub const DEFAULT_LOG_PATH: &str = "logs";

/// Settings of a [`Logger`](crate::Logger), fixed by its first initialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    path: String,
}

impl LogSettings {
    /// A blank `path` falls back to [`DEFAULT_LOG_PATH`].
    ///
    /// Only plain folder names are kept, so the path always stays under the
    /// logger's base directory: `/var/log/app` becomes `var/log/app` and
    /// `../escaped` becomes `escaped`.
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        let relative: PathBuf = Path::new(&path)
            .components()
            .filter_map(|component| match component {
                Component::Normal(part) => Some(part),
                _ => None,
            })
            .collect();
        let relative = relative.to_string_lossy();
        let path = if relative.trim().is_empty() {
            DEFAULT_LOG_PATH.to_string()
        } else {
            relative.into_owned()
        };
        Self { path }
    }

    /// Log sub-path, relative to the logger's base directory.
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl Default for LogSettings {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_PATH)
    }
}

/// Something [`Logger::initialize`](crate::Logger::initialize) can read settings from.
pub trait SettingsSource {
    fn log_settings(&self) -> Result<LogSettings, ConfigError>;
}

impl SettingsSource for LogSettings {
    fn log_settings(&self) -> Result<LogSettings, ConfigError> {
        Ok(self.clone())
    }
}

impl<S: SettingsSource> SettingsSource for Option<S> {
    fn log_settings(&self) -> Result<LogSettings, ConfigError> {
        self.as_ref()
            .ok_or(ConfigError::Missing)
            .and_then(SettingsSource::log_settings)
    }
}

#[derive(FromEnv)]
#[from_env(prefix = "DAYLOG")]
#[allow(non_snake_case)]
struct EnvSettings {
    #[from_env(default = "logs")]
    LOG_PATH: String,
}

/// Reads settings from the process environment (`DAYLOG_LOG_PATH`).
#[derive(Debug, Default, Clone, Copy)]
pub struct Environment;

impl SettingsSource for Environment {
    fn log_settings(&self) -> Result<LogSettings, ConfigError> {
        let env = EnvSettings::from_env().map_err(|e| ConfigError::Unreadable(format!("{e:?}")))?;
        Ok(LogSettings::new(env.LOG_PATH))
    }
}

/// Source backed by a closure, see [`from_fn`].
pub struct FromFn<F>(F);

/// Wraps a closure as a [`SettingsSource`].
pub fn from_fn<F>(f: F) -> FromFn<F>
where
    F: Fn() -> Result<LogSettings, ConfigError>,
{
    FromFn(f)
}

impl<F> SettingsSource for FromFn<F>
where
    F: Fn() -> Result<LogSettings, ConfigError>,
{
    fn log_settings(&self) -> Result<LogSettings, ConfigError> {
        (self.0)()
    }
}
