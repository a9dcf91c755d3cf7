use std::{fmt, sync::Arc};

use axum::http::HeaderMap;
use tracing::trace;

use super::{DeviceDetection, UserAgentClassifier, user_agent};

/// Set to `true` by CloudFront for tablets.
pub const TABLET_VIEWER_HEADER: &str = "cloudfront-is-tablet-viewer";
/// Set to `true` by CloudFront for phones.
pub const MOBILE_VIEWER_HEADER: &str = "cloudfront-is-mobile-viewer";
/// Set to `true` by CloudFront for desktops.
pub const DESKTOP_VIEWER_HEADER: &str = "cloudfront-is-desktop-viewer";

/// Stand-in user agent for an affirmative tablet header.
pub const CANONICAL_TABLET_USER_AGENT: &str = "Mozilla/5.0 (iPad; CPU OS 6_0 like Mac OS X) AppleWebKit/536.26 (KHTML, like Gecko) Version/6.0 Mobile/10A5355d Safari/8536.25";
/// Stand-in user agent for an affirmative mobile header.
pub const CANONICAL_PHONE_USER_AGENT: &str = "Mozilla/5.0 (iPhone; U; CPU iPhone OS 4_3_2 like Mac OS X; en-us) AppleWebKit/533.17.9 (KHTML, like Gecko) Version/5.0.2 Mobile/8H7 Safari/6533.18.5";
/// Stand-in user agent for an affirmative desktop header.
pub const CANONICAL_DESKTOP_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 6.1; WOW64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/38.0.2125.111 Safari/537.36";

/// Detection that trusts the CloudFront viewer headers before parsing the
/// real user agent.
///
/// CloudFront only answers yes/no per device class. To keep the result in
/// the classifier's own vocabulary, an affirmative header is replaced by a
/// representative user agent of that class and classified like any other.
/// Precedence is tablet, then mobile, then desktop; with no affirmative
/// header the request's `User-Agent` is classified.
#[derive(Clone)]
pub struct EdgeSignalDetection {
    classifier: Arc<dyn UserAgentClassifier>,
}

impl EdgeSignalDetection {
    /// Detection classifying with `classifier`.
    pub fn new(classifier: Arc<dyn UserAgentClassifier>) -> Self {
        Self { classifier }
    }

    /// The user agent that will be handed to the classifier.
    pub fn select_user_agent<'h>(&self, headers: &'h HeaderMap) -> &'h str {
        if is_affirmative(headers, TABLET_VIEWER_HEADER) {
            CANONICAL_TABLET_USER_AGENT
        } else if is_affirmative(headers, MOBILE_VIEWER_HEADER) {
            CANONICAL_PHONE_USER_AGENT
        } else if is_affirmative(headers, DESKTOP_VIEWER_HEADER) {
            CANONICAL_DESKTOP_USER_AGENT
        } else {
            user_agent(headers)
        }
    }
}

impl fmt::Debug for EdgeSignalDetection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EdgeSignalDetection").finish_non_exhaustive()
    }
}

impl DeviceDetection for EdgeSignalDetection {
    fn detect(&self, headers: &HeaderMap) -> Option<String> {
        let agent = self.select_user_agent(headers);
        trace!(user_agent = agent, "classifying edge-selected user agent");
        Some(self.classifier.classify(agent))
    }
}

fn is_affirmative(headers: &HeaderMap, name: &str) -> bool {
    headers
        .get(name)
        .is_some_and(|value| value.as_bytes() == b"true")
}
