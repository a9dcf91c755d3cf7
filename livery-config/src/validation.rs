//! Guard rails applied to the composed configuration.

use std::{collections::HashSet, fmt};

use crate::{
    loader::error::ConfigLoadError,
    models::{LiveryConfig, SameSitePolicy},
};

/// Non-fatal findings surfaced alongside a successfully loaded config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// Browsers reject `SameSite=None` cookies that are not `Secure`.
    SameSiteNoneWithoutSecure,
    /// Detected themes are applied but never remembered across requests.
    AutodetectWithoutCookie,
    /// A zero lifetime makes the cookie expire as soon as it is set.
    ZeroCookieLifetime,
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SameSiteNoneWithoutSecure => {
                f.write_str("cookie same_site=none requires secure=true")
            }
            Self::AutodetectWithoutCookie => f.write_str(
                "autodetect is enabled but the theme cookie is disabled",
            ),
            Self::ZeroCookieLifetime => {
                f.write_str("cookie lifetime is 0; the cookie expires immediately")
            }
        }
    }
}

/// Warnings collected by [`validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigWarnings {
    /// Warnings in the order they were found.
    pub items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    /// No warnings were raised.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether `warning` was raised.
    pub fn contains(&self, warning: &ConfigWarning) -> bool {
        self.items.contains(warning)
    }

    fn push(&mut self, warning: ConfigWarning) {
        self.items.push(warning);
    }
}

/// Reject configurations the middleware cannot honour and collect warnings
/// for the ones it can but probably should not.
pub fn validate(
    config: &LiveryConfig,
) -> Result<ConfigWarnings, ConfigLoadError> {
    if config.themes.is_empty() {
        return Err(ConfigLoadError::NoThemes);
    }

    let mut seen = HashSet::with_capacity(config.themes.len());
    for theme in &config.themes {
        if theme.trim().is_empty() {
            return Err(ConfigLoadError::BlankTheme);
        }
        if !seen.insert(theme.as_str()) {
            return Err(ConfigLoadError::DuplicateTheme {
                name: theme.clone(),
            });
        }
    }

    if !config.is_known_theme(&config.default_theme) {
        return Err(ConfigLoadError::UnknownDefaultTheme {
            name: config.default_theme.clone(),
        });
    }

    let mut warnings = ConfigWarnings::default();

    match &config.cookie {
        Some(cookie) => {
            if cookie.name.trim().is_empty() {
                return Err(ConfigLoadError::EmptyCookieName);
            }
            if cookie.same_site == Some(SameSitePolicy::None) && !cookie.secure
            {
                warnings.push(ConfigWarning::SameSiteNoneWithoutSecure);
            }
            if cookie.lifetime == 0 {
                warnings.push(ConfigWarning::ZeroCookieLifetime);
            }
        }
        None if config.autodetect_enabled() => {
            warnings.push(ConfigWarning::AutodetectWithoutCookie);
        }
        None => {}
    }

    Ok(warnings)
}
