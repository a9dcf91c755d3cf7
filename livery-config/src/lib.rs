//! Shared configuration library for Livery.
//!
//! This crate loads the theme list, the theme cookie options and the device
//! auto-detection settings from a TOML (or JSON) file, an optional `.env`
//! file and `LIVERY_*` environment variables, then validates the composed
//! result. `livery-core` builds its middleware from the [`LiveryConfig`]
//! produced here.

pub mod constants;
/// Layered configuration loading.
pub mod loader;
/// Configuration types.
pub mod models;
/// Parsing helpers for raw values.
pub mod util;
pub mod validation;

pub use loader::{ConfigLoad, ConfigLoader, error::ConfigLoadError};
pub use models::{
    AutodetectMode, ClassifierKind, ConfigMetadata, CookieSettings,
    LiveryConfig, SameSitePolicy,
};
pub use validation::{ConfigWarning, ConfigWarnings};
