/// Raw file and environment shapes.
pub mod sources;

use serde::{Deserialize, Serialize};
use std::{fmt, path::PathBuf, str::FromStr};

use crate::constants::{
    DEFAULT_COOKIE_LIFETIME, DEFAULT_COOKIE_NAME, DEFAULT_COOKIE_PATH,
};

/// Fully composed and validated configuration.
#[derive(Debug, Clone)]
pub struct LiveryConfig {
    /// Known theme names, in declaration order.
    pub themes: Vec<String>,
    /// Theme every request starts from before resolution.
    pub default_theme: String,
    /// `None` disables both the cookie read and the cookie write.
    pub cookie: Option<CookieSettings>,
    /// Device auto-detection strategy.
    pub autodetect: AutodetectMode,
    /// Classifier used by auto-detection.
    pub classifier: ClassifierKind,
    /// Where the values came from.
    pub metadata: ConfigMetadata,
}

impl LiveryConfig {
    /// Whether `name` is one of the configured themes.
    pub fn is_known_theme(&self, name: &str) -> bool {
        self.themes.iter().any(|theme| theme == name)
    }

    /// Whether any auto-detection runs.
    pub fn autodetect_enabled(&self) -> bool {
        self.autodetect != AutodetectMode::Off
    }
}

/// Attributes of the cookie carrying the chosen theme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieSettings {
    /// Cookie name.
    pub name: String,
    /// Seconds added to the current time to compute `Expires`.
    pub lifetime: u64,
    /// `Path` attribute.
    pub path: String,
    /// `Domain` attribute; host-only when `None`.
    pub domain: Option<String>,
    /// Emit the `Secure` flag.
    pub secure: bool,
    /// Emit the `HttpOnly` flag.
    pub http_only: bool,
    /// `SameSite` attribute; omitted when `None`.
    pub same_site: Option<SameSitePolicy>,
}

impl Default for CookieSettings {
    fn default() -> Self {
        Self {
            name: DEFAULT_COOKIE_NAME.to_string(),
            lifetime: DEFAULT_COOKIE_LIFETIME,
            path: DEFAULT_COOKIE_PATH.to_string(),
            domain: None,
            secure: false,
            http_only: false,
            same_site: None,
        }
    }
}

/// `SameSite` cookie attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SameSitePolicy {
    /// `SameSite=Strict`
    Strict,
    /// `SameSite=Lax`
    Lax,
    /// `SameSite=None`; requires `Secure`.
    None,
}

/// How the device type is derived when the request carries no theme cookie.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize,
)]
#[serde(rename_all = "snake_case")]
pub enum AutodetectMode {
    /// No auto-detection; requests without a cookie keep the default theme.
    #[default]
    Off,
    /// Classify the raw `User-Agent` header.
    UserAgent,
    /// Trust CloudFront device headers first, then fall back to the
    /// `User-Agent` header.
    EdgeSignals,
}

/// Backend used to turn a user-agent string into a device type.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierKind {
    /// The woothee user-agent database.
    #[default]
    Woothee,
    /// Substring matching on well-known tokens.
    Keywords,
}

/// Error returned when an enum value in the environment is not recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant(pub String);

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unrecognised value `{}`", self.0)
    }
}

impl std::error::Error for UnknownVariant {}

impl FromStr for SameSitePolicy {
    type Err = UnknownVariant;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "lax" => Ok(Self::Lax),
            "none" => Ok(Self::None),
            _ => Err(UnknownVariant(raw.to_string())),
        }
    }
}

impl FromStr for AutodetectMode {
    type Err = UnknownVariant;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "off" | "false" | "0" | "none" => Ok(Self::Off),
            "user_agent" | "ua" => Ok(Self::UserAgent),
            "edge_signals" | "edge" | "cloudfront" => Ok(Self::EdgeSignals),
            _ => Err(UnknownVariant(raw.to_string())),
        }
    }
}

impl FromStr for ClassifierKind {
    type Err = UnknownVariant;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "woothee" => Ok(Self::Woothee),
            "keywords" | "keyword" => Ok(Self::Keywords),
            _ => Err(UnknownVariant(raw.to_string())),
        }
    }
}

/// Where the effective configuration came from.
#[derive(Debug, Clone, Default)]
pub struct ConfigMetadata {
    /// Config file that was read, if any.
    pub config_path: Option<PathBuf>,
    /// Whether a `.env` file was loaded.
    pub env_file_loaded: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn autodetect_mode_accepts_aliases() {
        assert_eq!(
            "edge-signals".parse::<AutodetectMode>(),
            Ok(AutodetectMode::EdgeSignals)
        );
        assert_eq!("UA".parse::<AutodetectMode>(), Ok(AutodetectMode::UserAgent));
        assert_eq!("false".parse::<AutodetectMode>(), Ok(AutodetectMode::Off));
        assert!("sometimes".parse::<AutodetectMode>().is_err());
    }

    #[test]
    fn cookie_defaults_match_one_year_root_cookie() {
        let cookie = CookieSettings::default();
        assert_eq!(cookie.name, "theme");
        assert_eq!(cookie.lifetime, 31_536_000);
        assert_eq!(cookie.path, "/");
        assert!(cookie.domain.is_none());
        assert!(!cookie.secure);
        assert!(!cookie.http_only);
    }
}
