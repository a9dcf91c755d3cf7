//! Device auto-detection.
//!
//! A [`DeviceDetection`] strategy decides *which* user-agent string describes
//! the request; a [`UserAgentClassifier`] turns that string into a device
//! type name. The device type name doubles as the theme candidate, so themes
//! are usually named after the classifier vocabulary (`desktop`, `tablet`,
//! `phone`).

mod classifier;
mod edge;
mod user_agent;

use std::{fmt, sync::Arc};

use axum::http::{HeaderMap, header};
use livery_config::{AutodetectMode, ClassifierKind};

pub use classifier::{KeywordClassifier, WootheeClassifier};
pub use edge::{
    CANONICAL_DESKTOP_USER_AGENT, CANONICAL_PHONE_USER_AGENT,
    CANONICAL_TABLET_USER_AGENT, DESKTOP_VIEWER_HEADER, EdgeSignalDetection,
    MOBILE_VIEWER_HEADER, TABLET_VIEWER_HEADER,
};
pub use user_agent::UserAgentDetection;

/// Coarse device category produced by the built-in classifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceType {
    /// Desktop or laptop browser.
    Desktop,
    /// Tablet.
    Tablet,
    /// Phone or feature phone.
    Phone,
    /// Anything else: crawlers, appliances, unparsable agents.
    Plain,
}

impl DeviceType {
    /// Name used as the theme candidate.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Desktop => "desktop",
            Self::Tablet => "tablet",
            Self::Phone => "phone",
            Self::Plain => "plain",
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps a user-agent string to a device type name.
pub trait UserAgentClassifier: Send + Sync {
    /// Device type name for `user_agent`.
    fn classify(&self, user_agent: &str) -> String;
}

impl<F> UserAgentClassifier for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn classify(&self, user_agent: &str) -> String {
        self(user_agent)
    }
}

/// Derives a theme candidate from request headers.
pub trait DeviceDetection: Send + Sync {
    /// Theme candidate for the request, if any.
    fn detect(&self, headers: &HeaderMap) -> Option<String>;
}

/// Raw `User-Agent` header, or an empty string when absent or not UTF-8.
pub fn user_agent(headers: &HeaderMap) -> &str {
    headers
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}

/// Build the configured detection strategy, or `None` when auto-detection
/// is switched off.
pub fn from_settings(
    mode: AutodetectMode,
    classifier: ClassifierKind,
) -> Option<Arc<dyn DeviceDetection>> {
    let classifier: Arc<dyn UserAgentClassifier> = match classifier {
        ClassifierKind::Woothee => Arc::new(WootheeClassifier::new()),
        ClassifierKind::Keywords => Arc::new(KeywordClassifier),
    };

    match mode {
        AutodetectMode::Off => None,
        AutodetectMode::UserAgent => {
            Some(Arc::new(UserAgentDetection::new(classifier)))
        }
        AutodetectMode::EdgeSignals => {
            Some(Arc::new(EdgeSignalDetection::new(classifier)))
        }
    }
}
