use std::fs;

use anyhow::Result;
use livery_config::{
    AutodetectMode, ClassifierKind, ConfigLoadError, ConfigLoader,
    ConfigWarning, SameSitePolicy, constants::ENV_KEYS,
    models::sources::EnvConfig,
};
use once_cell::sync::Lazy;
use tempfile::tempdir;
use tokio::sync::Mutex;

static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

fn clear_livery_env() {
    for key in ENV_KEYS {
        unsafe { std::env::remove_var(key) };
    }
}

const FULL_TOML: &str = r#"
themes = ["desktop", "tablet", "phone"]
default_theme = "desktop"
autodetect = "edge_signals"
classifier = "keywords"

[cookie]
name = "livery_theme"
lifetime = 3600
path = "/app"
domain = "example.com"
secure = true
http_only = true
same_site = "lax"
"#;

#[test]
fn loads_toml_file_without_touching_process_env() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("livery.toml");
    fs::write(&path, FULL_TOML)?;

    let load = ConfigLoader::new()
        .with_config_path(&path)
        .without_env_file()
        .load_with_env(EnvConfig::default(), false)?;

    let config = load.config;
    assert_eq!(config.themes, vec!["desktop", "tablet", "phone"]);
    assert_eq!(config.default_theme, "desktop");
    assert_eq!(config.autodetect, AutodetectMode::EdgeSignals);
    assert_eq!(config.classifier, ClassifierKind::Keywords);
    assert_eq!(config.metadata.config_path.as_deref(), Some(path.as_path()));

    let cookie = config.cookie.expect("cookie enabled");
    assert_eq!(cookie.name, "livery_theme");
    assert_eq!(cookie.lifetime, 3600);
    assert_eq!(cookie.path, "/app");
    assert_eq!(cookie.domain.as_deref(), Some("example.com"));
    assert!(cookie.secure);
    assert!(cookie.http_only);
    assert_eq!(cookie.same_site, Some(SameSitePolicy::Lax));
    assert!(load.warnings.is_empty());
    Ok(())
}

#[test]
fn loads_json_file() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("livery.json");
    fs::write(
        &path,
        r#"{"themes": ["light", "dark"], "cookie": {"enabled": false}}"#,
    )?;

    let load = ConfigLoader::new()
        .with_config_path(&path)
        .load_with_env(EnvConfig::default(), false)?;

    assert_eq!(load.config.default_theme, "light");
    assert!(load.config.cookie.is_none());
    Ok(())
}

#[test]
fn explicit_missing_file_is_an_error() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("absent.toml");

    let err = ConfigLoader::new()
        .with_config_path(&path)
        .load_with_env(EnvConfig::default(), false)
        .unwrap_err();

    assert!(
        matches!(err, ConfigLoadError::MissingConfig { path: p } if p == path)
    );
}

#[test]
fn malformed_file_reports_parse_error() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("livery.toml");
    fs::write(&path, "themes = [\"light\"\n").expect("write config");

    let err = ConfigLoader::new()
        .with_config_path(&path)
        .load_with_env(EnvConfig::default(), false)
        .unwrap_err();

    assert!(matches!(err, ConfigLoadError::Parse { .. }));
}

#[test]
fn file_default_theme_must_be_listed() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("livery.toml");
    fs::write(&path, "themes = [\"light\"]\ndefault_theme = \"dark\"\n")
        .expect("write config");

    let err = ConfigLoader::new()
        .with_config_path(&path)
        .load_with_env(EnvConfig::default(), false)
        .unwrap_err();

    assert!(
        matches!(err, ConfigLoadError::UnknownDefaultTheme { name } if name == "dark")
    );
}

#[tokio::test]
async fn env_file_and_process_env_override_config_file() {
    let _guard = ENV_LOCK.lock().await;
    clear_livery_env();

    let dir = tempdir().expect("tempdir");
    let config_path = dir.path().join("livery.toml");
    fs::write(&config_path, FULL_TOML).expect("write config");

    let env_path = dir.path().join(".env");
    fs::write(
        &env_path,
        "LIVERY_DEFAULT_THEME=phone\n\
         LIVERY_COOKIE_SAME_SITE=none\n\
         LIVERY_COOKIE_SECURE=false\n",
    )
    .expect("write env file");

    unsafe { std::env::set_var("LIVERY_AUTODETECT", "user_agent") };

    let load = ConfigLoader::new()
        .with_config_path(&config_path)
        .with_env_file(&env_path)
        .load()
        .expect("load config");

    clear_livery_env();

    assert!(load.config.metadata.env_file_loaded);
    assert_eq!(load.config.default_theme, "phone");
    assert_eq!(load.config.autodetect, AutodetectMode::UserAgent);
    assert!(
        load.warnings
            .contains(&ConfigWarning::SameSiteNoneWithoutSecure)
    );
}

#[tokio::test]
async fn missing_env_file_is_not_an_error() {
    let _guard = ENV_LOCK.lock().await;
    clear_livery_env();

    let dir = tempdir().expect("tempdir");
    unsafe { std::env::set_var("LIVERY_THEMES", "light,dark") };

    let load = ConfigLoader::new()
        .with_config_path({
            let path = dir.path().join("livery.toml");
            fs::write(&path, "").expect("write config");
            path
        })
        .with_env_file(dir.path().join("missing.env"))
        .load()
        .expect("load config");

    clear_livery_env();

    assert!(!load.config.metadata.env_file_loaded);
    assert_eq!(load.config.themes, vec!["light", "dark"]);
}
