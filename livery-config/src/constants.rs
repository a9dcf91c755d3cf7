//! Defaults and environment variable names.

/// Cookie name used when neither the config file nor the environment sets one.
pub const DEFAULT_COOKIE_NAME: &str = "theme";

/// One year, in seconds.
pub const DEFAULT_COOKIE_LIFETIME: u64 = 31_536_000;

/// Cookie path used when none is configured.
pub const DEFAULT_COOKIE_PATH: &str = "/";

/// Files tried, in order, when no explicit config path is given.
pub const DEFAULT_CONFIG_LOCATIONS: &[&str] = &[
    "livery.toml",
    "livery.json",
    "config/livery.toml",
    "config/livery.json",
];

/// Explicit path of the config file.
pub const ENV_CONFIG_PATH: &str = "LIVERY_CONFIG_PATH";
/// Comma separated list of known themes.
pub const ENV_THEMES: &str = "LIVERY_THEMES";
/// Theme requests start from.
pub const ENV_DEFAULT_THEME: &str = "LIVERY_DEFAULT_THEME";
/// Disables the theme cookie when truthy.
pub const ENV_COOKIE_DISABLED: &str = "LIVERY_COOKIE_DISABLED";
/// Theme cookie name.
pub const ENV_COOKIE_NAME: &str = "LIVERY_COOKIE_NAME";
/// Theme cookie lifetime in seconds.
pub const ENV_COOKIE_LIFETIME: &str = "LIVERY_COOKIE_LIFETIME";
/// Theme cookie path.
pub const ENV_COOKIE_PATH: &str = "LIVERY_COOKIE_PATH";
/// Theme cookie domain.
pub const ENV_COOKIE_DOMAIN: &str = "LIVERY_COOKIE_DOMAIN";
/// `Secure` flag of the theme cookie.
pub const ENV_COOKIE_SECURE: &str = "LIVERY_COOKIE_SECURE";
/// `HttpOnly` flag of the theme cookie.
pub const ENV_COOKIE_HTTP_ONLY: &str = "LIVERY_COOKIE_HTTP_ONLY";
/// `SameSite` policy of the theme cookie.
pub const ENV_COOKIE_SAME_SITE: &str = "LIVERY_COOKIE_SAME_SITE";
/// Device auto-detection mode.
pub const ENV_AUTODETECT: &str = "LIVERY_AUTODETECT";
/// User-agent classifier backend.
pub const ENV_CLASSIFIER: &str = "LIVERY_CLASSIFIER";

/// Every environment key read by [`crate::models::sources::EnvConfig`].
pub const ENV_KEYS: &[&str] = &[
    ENV_CONFIG_PATH,
    ENV_THEMES,
    ENV_DEFAULT_THEME,
    ENV_COOKIE_DISABLED,
    ENV_COOKIE_NAME,
    ENV_COOKIE_LIFETIME,
    ENV_COOKIE_PATH,
    ENV_COOKIE_DOMAIN,
    ENV_COOKIE_SECURE,
    ENV_COOKIE_HTTP_ONLY,
    ENV_COOKIE_SAME_SITE,
    ENV_AUTODETECT,
    ENV_CLASSIFIER,
];
