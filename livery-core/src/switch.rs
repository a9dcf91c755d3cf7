//! Explicit theme switching: `GET /theme/switch?theme=<name>` stores the
//! theme cookie and redirects back to the referring page. Only local paths
//! and same-host referers are followed; anything else redirects to `/`.

use std::sync::Arc;

use axum::{
    Extension, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, Uri, header},
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::debug;

use crate::{
    context::ActiveTheme, cookie::CookieOptions, error::ThemeError,
    middleware::ThemeLayer, registry::ThemeRegistry,
};

/// Route served by [`switch_router`].
pub const SWITCH_PATH: &str = "/theme/switch";

/// Query string of the switch endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct SwitchQuery {
    /// Theme to switch to.
    pub theme: String,
}

/// Shared state of the switch endpoint.
#[derive(Debug, Clone)]
pub struct SwitchState {
    registry: Arc<ThemeRegistry>,
    cookie: Option<Arc<CookieOptions>>,
}

impl SwitchState {
    /// State over a registry and optional cookie options.
    pub fn new(
        registry: Arc<ThemeRegistry>,
        cookie: Option<Arc<CookieOptions>>,
    ) -> Self {
        Self { registry, cookie }
    }

    /// Share the registry and cookie options of an installed layer.
    pub fn from_layer(layer: &ThemeLayer) -> Self {
        Self::new(layer.registry().clone(), layer.cookie_options().cloned())
    }
}

/// Router serving [`SWITCH_PATH`].
pub fn switch_router(state: SwitchState) -> Router {
    Router::new()
        .route(SWITCH_PATH, get(switch_theme))
        .with_state(state)
}

/// Switch the theme, persist it and redirect back.
pub async fn switch_theme(
    State(state): State<SwitchState>,
    active: Option<Extension<ActiveTheme>>,
    headers: HeaderMap,
    Query(query): Query<SwitchQuery>,
) -> Result<Response, ThemeError> {
    let theme = query.theme;
    if !state.registry.contains(&theme) {
        return Err(ThemeError::UnknownTheme { name: theme });
    }

    if let Some(Extension(active)) = active {
        active.set_name(&theme)?;
    }

    let target = redirect_target(&headers);

    let mut response =
        (StatusCode::FOUND, [(header::LOCATION, target)]).into_response();

    if let Some(options) = &state.cookie {
        options.set_in(response.headers_mut(), &theme, Utc::now())?;
    }

    debug!(theme = %theme, "switched theme on request");
    Ok(response)
}

/// The `Referer` when it is a local path or an http(s) URL on the request's
/// own host, `/` otherwise.
fn redirect_target(headers: &HeaderMap) -> String {
    let Some(referer) = headers
        .get(header::REFERER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.contains('\\'))
    else {
        return "/".to_string();
    };
    let Ok(uri) = referer.parse::<Uri>() else {
        return "/".to_string();
    };

    let allowed = match uri.authority() {
        None => referer.starts_with('/') && !referer.starts_with("//"),
        Some(authority) => {
            matches!(uri.scheme_str(), Some("http" | "https"))
                && headers
                    .get(header::HOST)
                    .and_then(|value| value.to_str().ok())
                    .is_some_and(|host| {
                        host.eq_ignore_ascii_case(authority.as_str())
                    })
        }
    };

    if allowed {
        referer.to_string()
    } else {
        "/".to_string()
    }
}
