use axum::{
    Json,
    http::{StatusCode, header::InvalidHeaderValue},
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Errors surfaced at the edges of theme handling. Resolution and cookie
/// writing inside [`crate::ThemeLayer`] never produce these; they degrade to
/// "no theme change" instead.
#[derive(Debug, Error)]
pub enum ThemeError {
    /// The name is not in the theme registry.
    #[error("unknown theme `{name}`")]
    UnknownTheme {
        /// Rejected name.
        name: String,
    },
    /// No [`crate::ActiveTheme`] in the request extensions.
    #[error("request has no active theme; is ThemeLayer installed?")]
    MissingContext,
    /// The cookie does not fit in a header value.
    #[error("theme cookie could not be encoded as a header value")]
    InvalidHeader(#[from] InvalidHeaderValue),
}

impl ThemeError {
    /// HTTP status reported for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::UnknownTheme { .. } => StatusCode::NOT_FOUND,
            Self::MissingContext | Self::InvalidHeader(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ThemeError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({
            "error": {
                "message": self.to_string(),
                "status": status.as_u16(),
            }
        }));

        (status, body).into_response()
    }
}

/// Rejected theme registry definitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// No themes were given.
    #[error("a theme registry needs at least one theme")]
    Empty,
    /// A theme name is empty or whitespace.
    #[error("theme names must not be blank")]
    BlankName,
    /// A theme is listed twice.
    #[error("theme `{name}` is listed more than once")]
    Duplicate {
        /// Repeated theme.
        name: String,
    },
    /// The default is not one of the themes.
    #[error("default theme `{name}` is not a registered theme")]
    UnknownDefault {
        /// Requested default.
        name: String,
    },
}
