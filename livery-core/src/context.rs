use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{Request, request::Parts},
};
use parking_lot::RwLock;

use crate::{error::ThemeError, registry::ThemeRegistry};

/// Whether a request came from the client or was forwarded internally.
///
/// Only [`RequestKind::Main`] requests are resolved and get a theme cookie.
/// Code that re-dispatches a request into the same service stack marks it by
/// inserting [`RequestKind::Sub`] into the request extensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestKind {
    /// A request from the client.
    #[default]
    Main,
    /// A request forwarded internally while handling another.
    Sub,
}

impl RequestKind {
    /// Kind recorded in the request extensions; `Main` when absent.
    pub fn of<B>(req: &Request<B>) -> Self {
        req.extensions().get::<Self>().copied().unwrap_or_default()
    }

    /// Whether this is a client request.
    pub fn is_main(self) -> bool {
        self == Self::Main
    }
}

/// The theme chosen for one request.
///
/// Clones share the same value, so a handler holding a clone can change the
/// theme and the response phase of [`crate::ThemeLayer`] observes it. The
/// name is always a member of the registry.
#[derive(Debug, Clone)]
pub struct ActiveTheme {
    registry: Arc<ThemeRegistry>,
    name: Arc<RwLock<String>>,
}

impl ActiveTheme {
    /// Starts on the registry's default theme.
    pub fn new(registry: Arc<ThemeRegistry>) -> Self {
        let name = registry.default_theme().to_string();
        Self {
            registry,
            name: Arc::new(RwLock::new(name)),
        }
    }

    /// Current theme name.
    pub fn name(&self) -> String {
        self.name.read().clone()
    }

    /// Whether the current theme is `name`.
    pub fn is(&self, name: &str) -> bool {
        *self.name.read() == name
    }

    /// Switch to `name`; unknown names are rejected and leave the theme
    /// unchanged.
    pub fn set_name(&self, name: &str) -> Result<(), ThemeError> {
        if !self.registry.contains(name) {
            return Err(ThemeError::UnknownTheme {
                name: name.to_string(),
            });
        }
        *self.name.write() = name.to_string();
        Ok(())
    }

    /// All known themes.
    pub fn themes(&self) -> &[String] {
        self.registry.themes()
    }

    /// The registry this theme is checked against.
    pub fn registry(&self) -> &Arc<ThemeRegistry> {
        &self.registry
    }
}

impl<S> FromRequestParts<S> for ActiveTheme
where
    S: Send + Sync,
{
    type Rejection = ThemeError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<ActiveTheme>()
            .cloned()
            .ok_or(ThemeError::MissingContext)
    }
}
