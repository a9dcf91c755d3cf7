use std::path::PathBuf;

use thiserror::Error;

/// Failures while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    /// The config file could not be read.
    #[error("failed to read configuration file {path}")]
    Io {
        /// File being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// An explicitly named config file does not exist.
    #[error("configuration file {path} does not exist")]
    MissingConfig {
        /// Requested path.
        path: PathBuf,
    },
    /// The config file is neither valid TOML nor valid JSON.
    #[error("failed to parse configuration file {path}: {message}")]
    Parse {
        /// File being parsed.
        path: PathBuf,
        /// Parser message.
        message: String,
    },
    /// The `.env` file exists but is malformed.
    #[error("failed to load .env file")]
    Dotenv(#[from] dotenvy::Error),
    /// A `LIVERY_*` variable could not be parsed.
    #[error("environment variable {key} has an invalid value `{value}`")]
    InvalidEnvValue {
        /// Variable name.
        key: &'static str,
        /// Raw value.
        value: String,
    },
    /// No themes are configured.
    #[error("at least one theme must be configured")]
    NoThemes,
    /// A theme name is empty or whitespace.
    #[error("theme names must not be blank")]
    BlankTheme,
    /// A theme is listed twice.
    #[error("theme `{name}` is listed more than once")]
    DuplicateTheme {
        /// Repeated theme.
        name: String,
    },
    /// The default theme is not in the theme list.
    #[error("default theme `{name}` is not one of the configured themes")]
    UnknownDefaultTheme {
        /// Configured default.
        name: String,
    },
    /// The cookie name is empty.
    #[error("cookie name must not be empty")]
    EmptyCookieName,
}
