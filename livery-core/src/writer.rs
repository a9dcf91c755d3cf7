use std::sync::Arc;

use axum::http::HeaderMap;
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::{
    context::{ActiveTheme, RequestKind},
    cookie::CookieOptions,
    resolver::Resolution,
};

/// What the response phase did with a [`Resolution`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// A `Set-Cookie` for the resolved theme was attached.
    Written,
    /// Nothing was attached.
    Skipped,
}

/// Outbound half of theme handling: persists a freshly resolved theme in the
/// theme cookie.
#[derive(Debug, Clone, Default)]
pub struct CookieWriter {
    options: Option<Arc<CookieOptions>>,
}

impl CookieWriter {
    /// Writer for the given cookie; `None` never writes.
    pub fn new(options: Option<Arc<CookieOptions>>) -> Self {
        Self { options }
    }

    /// Persist the pending theme on the response headers.
    pub fn write(
        &self,
        kind: RequestKind,
        resolution: &Resolution,
        active: &ActiveTheme,
        headers: &mut HeaderMap,
    ) -> WriteOutcome {
        self.write_at(Utc::now(), kind, resolution, active, headers)
    }

    /// [`CookieWriter::write`] with an explicit clock reading.
    ///
    /// The cookie is only written when the pending theme is still the active
    /// one. A handler that switched themes after resolution wins, and no
    /// cookie is written for the stale value. A `Set-Cookie` the handler
    /// added for the same name, path and domain is replaced.
    pub fn write_at(
        &self,
        now: DateTime<Utc>,
        kind: RequestKind,
        resolution: &Resolution,
        active: &ActiveTheme,
        headers: &mut HeaderMap,
    ) -> WriteOutcome {
        if !kind.is_main() {
            return WriteOutcome::Skipped;
        }

        let (Some(options), Some(pending)) =
            (&self.options, resolution.pending())
        else {
            return WriteOutcome::Skipped;
        };

        if !active.is(pending) {
            debug!(
                pending,
                active = %active.name(),
                "theme changed during request; not persisting"
            );
            return WriteOutcome::Skipped;
        }

        match options.set_in(headers, pending, now) {
            Ok(()) => {
                debug!(
                    theme = pending,
                    cookie = %options.name,
                    "persisted theme cookie"
                );
                WriteOutcome::Written
            }
            Err(err) => {
                warn!(
                    error = %err,
                    theme = pending,
                    "dropping unencodable theme cookie"
                );
                WriteOutcome::Skipped
            }
        }
    }
}
