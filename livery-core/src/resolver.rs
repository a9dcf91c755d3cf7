use std::{fmt, sync::Arc};

use axum::http::HeaderMap;
use tracing::debug;

use crate::{
    context::{ActiveTheme, RequestKind},
    cookie::CookieOptions,
    detection::DeviceDetection,
};

/// Where an accepted theme candidate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionSource {
    /// The theme cookie.
    Cookie,
    /// Device auto-detection.
    Detected,
}

/// Outcome of the inbound step, handed to [`crate::CookieWriter`] once the
/// response exists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pending: Option<String>,
    source: Option<ResolutionSource>,
}

impl Resolution {
    /// Nothing to persist.
    pub fn none() -> Self {
        Self::default()
    }

    /// Theme to persist, if any.
    pub fn pending(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    /// Where the applied theme came from.
    pub fn source(&self) -> Option<ResolutionSource> {
        self.source
    }

    /// Whether a theme is waiting to be persisted.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// Inbound half of theme handling: picks a candidate from the theme cookie
/// or, failing that, from device detection, and applies it to the request's
/// [`ActiveTheme`] when it names a known theme.
#[derive(Clone, Default)]
pub struct ThemeResolver {
    cookie: Option<Arc<CookieOptions>>,
    detection: Option<Arc<dyn DeviceDetection>>,
}

impl ThemeResolver {
    /// Resolver reading `cookie` and falling back to `detection`.
    pub fn new(
        cookie: Option<Arc<CookieOptions>>,
        detection: Option<Arc<dyn DeviceDetection>>,
    ) -> Self {
        Self { cookie, detection }
    }

    /// Configured cookie options.
    pub fn cookie(&self) -> Option<&Arc<CookieOptions>> {
        self.cookie.as_ref()
    }

    /// Apply a cookie or detected theme to `active`. Sub-requests are left
    /// alone.
    pub fn resolve(
        &self,
        kind: RequestKind,
        headers: &HeaderMap,
        active: &ActiveTheme,
    ) -> Resolution {
        if !kind.is_main() {
            return Resolution::none();
        }

        let mut candidate = self
            .cookie
            .as_ref()
            .and_then(|options| options.read(headers))
            .filter(|value| !value.is_empty())
            .map(|value| (value, ResolutionSource::Cookie));

        if candidate.is_none()
            && let Some(detection) = &self.detection
        {
            candidate = detection
                .detect(headers)
                .filter(|value| !value.is_empty())
                .map(|value| (value, ResolutionSource::Detected));
        }

        let Some((theme, source)) = candidate else {
            return Resolution::none();
        };

        if active.is(&theme) {
            return Resolution::none();
        }

        if active.set_name(&theme).is_err() {
            debug!(theme = %theme, ?source, "ignoring unknown theme candidate");
            return Resolution::none();
        }

        debug!(theme = %theme, ?source, "resolved request theme");

        Resolution {
            pending: self.cookie.is_some().then_some(theme),
            source: Some(source),
        }
    }
}

impl fmt::Debug for ThemeResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemeResolver")
            .field("cookie", &self.cookie)
            .field("detection", &self.detection.is_some())
            .finish()
    }
}
