use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::{AutodetectMode, ClassifierKind, SameSitePolicy};
use crate::{
    constants::*,
    loader::error::ConfigLoadError,
    util::{non_blank, parse_bool, parse_csv},
};

/// Raw configuration as defined in a TOML or JSON file.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct FileConfig {
    /// Known themes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub themes: Vec<String>,
    /// Default theme; the first listed theme when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_theme: Option<String>,
    /// `[cookie]` table.
    #[serde(default)]
    pub cookie: FileCookieConfig,
    /// Auto-detection mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autodetect: Option<AutodetectMode>,
    /// Classifier backend.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classifier: Option<ClassifierKind>,
}

/// The `[cookie]` table of a config file.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileCookieConfig {
    /// `false` disables the theme cookie.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Cookie name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Lifetime in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lifetime: Option<u64>,
    /// `Path` attribute.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// `Domain` attribute.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    /// `Secure` flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secure: Option<bool>,
    /// `HttpOnly` flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_only: Option<bool>,
    /// `SameSite` attribute.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub same_site: Option<SameSitePolicy>,
}

/// Environment-derived configuration values.
#[derive(Debug, Default, Clone)]
pub struct EnvConfig {
    /// `LIVERY_CONFIG_PATH`
    pub config_path: Option<PathBuf>,
    /// `LIVERY_THEMES`
    pub themes: Option<Vec<String>>,
    /// `LIVERY_DEFAULT_THEME`
    pub default_theme: Option<String>,
    /// `LIVERY_COOKIE_DISABLED`
    pub cookie_disabled: Option<bool>,
    /// `LIVERY_COOKIE_NAME`
    pub cookie_name: Option<String>,
    /// `LIVERY_COOKIE_LIFETIME`
    pub cookie_lifetime: Option<u64>,
    /// `LIVERY_COOKIE_PATH`
    pub cookie_path: Option<String>,
    /// `LIVERY_COOKIE_DOMAIN`
    pub cookie_domain: Option<String>,
    /// `LIVERY_COOKIE_SECURE`
    pub cookie_secure: Option<bool>,
    /// `LIVERY_COOKIE_HTTP_ONLY`
    pub cookie_http_only: Option<bool>,
    /// `LIVERY_COOKIE_SAME_SITE`
    pub cookie_same_site: Option<SameSitePolicy>,
    /// `LIVERY_AUTODETECT`
    pub autodetect: Option<AutodetectMode>,
    /// `LIVERY_CLASSIFIER`
    pub classifier: Option<ClassifierKind>,
}

impl EnvConfig {
    /// Read every `LIVERY_*` variable from the process environment.
    pub fn gather() -> Result<Self, ConfigLoadError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Blank values count as unset;
    /// values that fail to parse are reported instead of ignored.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigLoadError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| non_blank(lookup(key));

        Ok(Self {
            config_path: get(ENV_CONFIG_PATH).map(PathBuf::from),
            themes: get(ENV_THEMES).map(|raw| parse_csv(&raw)),
            default_theme: get(ENV_DEFAULT_THEME)
                .map(|raw| raw.trim().to_string()),
            cookie_disabled: parse_with(
                ENV_COOKIE_DISABLED,
                get(ENV_COOKIE_DISABLED),
                parse_bool,
            )?,
            cookie_name: get(ENV_COOKIE_NAME),
            cookie_lifetime: parse_with(
                ENV_COOKIE_LIFETIME,
                get(ENV_COOKIE_LIFETIME),
                |raw| raw.trim().parse().ok(),
            )?,
            cookie_path: get(ENV_COOKIE_PATH),
            cookie_domain: get(ENV_COOKIE_DOMAIN),
            cookie_secure: parse_with(
                ENV_COOKIE_SECURE,
                get(ENV_COOKIE_SECURE),
                parse_bool,
            )?,
            cookie_http_only: parse_with(
                ENV_COOKIE_HTTP_ONLY,
                get(ENV_COOKIE_HTTP_ONLY),
                parse_bool,
            )?,
            cookie_same_site: parse_with(
                ENV_COOKIE_SAME_SITE,
                get(ENV_COOKIE_SAME_SITE),
                |raw| raw.parse().ok(),
            )?,
            autodetect: parse_with(
                ENV_AUTODETECT,
                get(ENV_AUTODETECT),
                |raw| raw.parse().ok(),
            )?,
            classifier: parse_with(
                ENV_CLASSIFIER,
                get(ENV_CLASSIFIER),
                |raw| raw.parse().ok(),
            )?,
        })
    }
}

fn parse_with<T>(
    key: &'static str,
    raw: Option<String>,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<Option<T>, ConfigLoadError> {
    match raw {
        None => Ok(None),
        Some(value) => parse(&value)
            .map(Some)
            .ok_or(ConfigLoadError::InvalidEnvValue { key, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(
        pairs: &[(&str, &str)],
    ) -> impl Fn(&str) -> Option<String> + use<> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn env_values_are_typed() {
        let env = EnvConfig::from_lookup(lookup(&[
            (ENV_THEMES, "light,dark"),
            (ENV_COOKIE_LIFETIME, "60"),
            (ENV_COOKIE_SECURE, "on"),
            (ENV_COOKIE_SAME_SITE, "Lax"),
            (ENV_AUTODETECT, "edge_signals"),
            (ENV_COOKIE_DOMAIN, "   "),
        ]))
        .unwrap();

        assert_eq!(
            env.themes,
            Some(vec!["light".to_string(), "dark".to_string()])
        );
        assert_eq!(env.cookie_lifetime, Some(60));
        assert_eq!(env.cookie_secure, Some(true));
        assert_eq!(env.cookie_same_site, Some(SameSitePolicy::Lax));
        assert_eq!(env.autodetect, Some(AutodetectMode::EdgeSignals));
        assert_eq!(env.cookie_domain, None);
    }

    #[test]
    fn unparsable_env_value_is_reported() {
        let err = EnvConfig::from_lookup(lookup(&[(
            ENV_COOKIE_LIFETIME,
            "a year",
        )]))
        .unwrap_err();

        match err {
            ConfigLoadError::InvalidEnvValue { key, value } => {
                assert_eq!(key, ENV_COOKIE_LIFETIME);
                assert_eq!(value, "a year");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
