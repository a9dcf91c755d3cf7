/// Loader errors.
pub mod error;

use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::{debug, warn};

use crate::{
    constants::DEFAULT_CONFIG_LOCATIONS,
    models::{
        ConfigMetadata, CookieSettings, LiveryConfig,
        sources::{EnvConfig, FileConfig},
    },
    validation::{self, ConfigWarnings},
};
use error::ConfigLoadError;

/// A validated configuration plus the warnings produced while composing it.
#[derive(Debug, Clone)]
pub struct ConfigLoad {
    /// The validated configuration.
    pub config: LiveryConfig,
    /// Non-fatal findings.
    pub warnings: ConfigWarnings,
}

/// Inputs for a [`ConfigLoader`].
#[derive(Debug, Default, Clone)]
pub struct ConfigLoaderOptions {
    /// Config file to read instead of probing the defaults.
    pub config_path: Option<PathBuf>,
    /// `.env` file to read instead of `./.env`.
    pub env_file: Option<PathBuf>,
    /// Skip `.env` handling entirely, including the implicit `./.env`.
    pub skip_env_file: bool,
}

/// Composes configuration from, in increasing precedence: built-in defaults,
/// the config file, and `LIVERY_*` environment variables (optionally seeded
/// from a `.env` file).
#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: ConfigLoaderOptions,
}

impl ConfigLoader {
    /// Loader with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loader with explicit options.
    pub fn with_options(options: ConfigLoaderOptions) -> Self {
        Self { options }
    }

    /// Read this config file.
    pub fn with_config_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.config_path = Some(path.into());
        self
    }

    /// Read this `.env` file.
    pub fn with_env_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.env_file = Some(path.into());
        self
    }

    /// Do not read any `.env` file.
    pub fn without_env_file(mut self) -> Self {
        self.options.skip_env_file = true;
        self
    }

    /// Load `.env`, the process environment and the config file.
    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let env_file_loaded = self.load_env_file()?;
        let env_config = EnvConfig::gather()?;
        self.load_with_env(env_config, env_file_loaded)
    }

    /// Like [`ConfigLoader::load`] but with an already gathered environment.
    pub fn load_with_env(
        &self,
        env_config: EnvConfig,
        env_file_loaded: bool,
    ) -> Result<ConfigLoad, ConfigLoadError> {
        let (file_config, config_path) = self.load_file_config(&env_config)?;

        let metadata = ConfigMetadata {
            config_path,
            env_file_loaded,
        };

        let load = compose(file_config.unwrap_or_default(), env_config, metadata)?;

        for warning in &load.warnings.items {
            warn!(%warning, "livery configuration warning");
        }

        Ok(load)
    }

    fn load_env_file(&self) -> Result<bool, ConfigLoadError> {
        if self.options.skip_env_file {
            return Ok(false);
        }

        let result = match &self.options.env_file {
            Some(path) => dotenvy::from_path(path),
            None => dotenvy::dotenv().map(|_| ()),
        };

        match result {
            Ok(()) => Ok(true),
            Err(dotenvy::Error::Io(_)) => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    fn load_file_config(
        &self,
        env_config: &EnvConfig,
    ) -> Result<(Option<FileConfig>, Option<PathBuf>), ConfigLoadError> {
        let explicit = self
            .options
            .config_path
            .clone()
            .or_else(|| env_config.config_path.clone());

        let path = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigLoadError::MissingConfig { path });
                }
                path
            }
            None => match DEFAULT_CONFIG_LOCATIONS
                .iter()
                .map(PathBuf::from)
                .find(|candidate| candidate.exists())
            {
                Some(path) => path,
                None => {
                    debug!("no livery config file found; using defaults");
                    return Ok((None, None));
                }
            },
        };

        let config = read_file_config(&path)?;
        debug!(path = %path.display(), "loaded livery config file");
        Ok((Some(config), Some(path)))
    }
}

/// Parse a config file, choosing the format from its extension. Files
/// without a known extension are tried as TOML first, then JSON.
pub fn read_file_config(path: &Path) -> Result<FileConfig, ConfigLoadError> {
    let contents =
        fs::read_to_string(path).map_err(|source| ConfigLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    let parse_error = |message: String| ConfigLoadError::Parse {
        path: path.to_path_buf(),
        message,
    };

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => serde_json::from_str(&contents)
            .map_err(|err| parse_error(err.to_string())),
        Some("toml") | Some("tml") => {
            toml::from_str(&contents).map_err(|err| parse_error(err.to_string()))
        }
        _ => toml::from_str(&contents).or_else(|toml_err| {
            serde_json::from_str(&contents).map_err(|json_err| {
                parse_error(format!(
                    "toml error: {toml_err}; json error: {json_err}"
                ))
            })
        }),
    }
}

/// Merge file values and environment overrides over the defaults, then
/// validate the result.
pub fn compose(
    file: FileConfig,
    env: EnvConfig,
    metadata: ConfigMetadata,
) -> Result<ConfigLoad, ConfigLoadError> {
    let themes: Vec<String> = env
        .themes
        .unwrap_or(file.themes)
        .into_iter()
        .map(|theme| theme.trim().to_string())
        .collect();

    let default_theme = env
        .default_theme
        .or(file.default_theme)
        .map(|theme| theme.trim().to_string())
        .or_else(|| themes.first().cloned())
        .ok_or(ConfigLoadError::NoThemes)?;

    let cookie_enabled = match env.cookie_disabled {
        Some(disabled) => !disabled,
        None => file.cookie.enabled.unwrap_or(true),
    };

    let cookie = cookie_enabled.then(|| {
        let defaults = CookieSettings::default();
        let file_cookie = file.cookie;
        CookieSettings {
            name: env
                .cookie_name
                .or(file_cookie.name)
                .unwrap_or(defaults.name),
            lifetime: env
                .cookie_lifetime
                .or(file_cookie.lifetime)
                .unwrap_or(defaults.lifetime),
            path: env
                .cookie_path
                .or(file_cookie.path)
                .unwrap_or(defaults.path),
            domain: env
                .cookie_domain
                .or(file_cookie.domain)
                .filter(|domain| !domain.trim().is_empty()),
            secure: env
                .cookie_secure
                .or(file_cookie.secure)
                .unwrap_or(defaults.secure),
            http_only: env
                .cookie_http_only
                .or(file_cookie.http_only)
                .unwrap_or(defaults.http_only),
            same_site: env.cookie_same_site.or(file_cookie.same_site),
        }
    });

    let config = LiveryConfig {
        themes,
        default_theme,
        cookie,
        autodetect: env.autodetect.or(file.autodetect).unwrap_or_default(),
        classifier: env.classifier.or(file.classifier).unwrap_or_default(),
        metadata,
    };

    let warnings = validation::validate(&config)?;

    Ok(ConfigLoad { config, warnings })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AutodetectMode, ClassifierKind, SameSitePolicy};

    fn file_with_themes(themes: &[&str]) -> FileConfig {
        FileConfig {
            themes: themes.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn defaults_fill_missing_values() {
        let load = compose(
            file_with_themes(&["light", "dark"]),
            EnvConfig::default(),
            ConfigMetadata::default(),
        )
        .unwrap();

        let config = load.config;
        assert_eq!(config.default_theme, "light");
        assert_eq!(config.cookie, Some(CookieSettings::default()));
        assert_eq!(config.autodetect, AutodetectMode::Off);
        assert_eq!(config.classifier, ClassifierKind::Woothee);
    }

    #[test]
    fn env_overrides_file() {
        let mut file = file_with_themes(&["light", "dark"]);
        file.default_theme = Some("light".into());
        file.cookie.name = Some("ui".into());
        file.cookie.secure = Some(false);

        let env = EnvConfig {
            default_theme: Some("dark".into()),
            cookie_secure: Some(true),
            cookie_same_site: Some(SameSitePolicy::Strict),
            ..Default::default()
        };

        let config = compose(file, env, ConfigMetadata::default())
            .unwrap()
            .config;
        let cookie = config.cookie.expect("cookie enabled");

        assert_eq!(config.default_theme, "dark");
        assert_eq!(cookie.name, "ui");
        assert!(cookie.secure);
        assert_eq!(cookie.same_site, Some(SameSitePolicy::Strict));
    }

    #[test]
    fn cookie_can_be_disabled() {
        let mut file = file_with_themes(&["light"]);
        file.cookie.enabled = Some(false);

        let config = compose(file, EnvConfig::default(), ConfigMetadata::default())
            .unwrap()
            .config;
        assert!(config.cookie.is_none());
    }

    #[test]
    fn file_default_theme_is_trimmed_like_themes() {
        let mut file = file_with_themes(&["light", " dark "]);
        file.default_theme = Some(" dark".into());

        let config = compose(file, EnvConfig::default(), ConfigMetadata::default())
            .unwrap()
            .config;

        assert_eq!(config.themes, vec!["light", "dark"]);
        assert_eq!(config.default_theme, "dark");
    }

    #[test]
    fn no_themes_is_an_error() {
        let err = compose(
            FileConfig::default(),
            EnvConfig::default(),
            ConfigMetadata::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigLoadError::NoThemes));
    }
}
