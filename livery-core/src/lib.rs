//! Per-request theme resolution for tower and axum services.
//!
//! Every request starts on the registry's default theme. [`ThemeLayer`]
//! then:
//! - reads the theme cookie, or auto-detects a device type when there is
//!   none ([`ThemeResolver`]),
//! - applies the candidate if it is a known theme and exposes the result to
//!   handlers as an [`ActiveTheme`] request extension,
//! - after the handler ran, writes the theme cookie back when it changed and
//!   the handler did not override it ([`CookieWriter`]).
//!
//! [`switch::switch_router`] adds an explicit `GET /theme/switch` endpoint.

/// Per-request theme state.
pub mod context;
/// Theme cookie attributes, parsing and serialization.
pub mod cookie;
pub mod detection;
/// Error types.
pub mod error;
pub mod middleware;
/// Known themes.
pub mod registry;
/// Inbound theme resolution.
pub mod resolver;
pub mod switch;
/// Outbound theme cookie writing.
pub mod writer;

pub use context::{ActiveTheme, RequestKind};
pub use self::cookie::CookieOptions;
pub use detection::{
    DeviceDetection, DeviceType, EdgeSignalDetection, KeywordClassifier,
    UserAgentClassifier, UserAgentDetection, WootheeClassifier,
};
pub use error::{RegistryError, ThemeError};
pub use middleware::{ThemeLayer, ThemeLayerBuilder, ThemeMiddleware};
pub use registry::ThemeRegistry;
pub use resolver::{Resolution, ResolutionSource, ThemeResolver};
pub use writer::{CookieWriter, WriteOutcome};
