use std::{fmt, sync::Arc};

use axum::http::HeaderMap;
use tracing::trace;

use super::{DeviceDetection, UserAgentClassifier, user_agent};

/// Detection that always parses the request's own `User-Agent` header.
#[derive(Clone)]
pub struct UserAgentDetection {
    classifier: Arc<dyn UserAgentClassifier>,
}

impl UserAgentDetection {
    /// Detection classifying with `classifier`.
    pub fn new(classifier: Arc<dyn UserAgentClassifier>) -> Self {
        Self { classifier }
    }
}

impl fmt::Debug for UserAgentDetection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserAgentDetection").finish_non_exhaustive()
    }
}

impl DeviceDetection for UserAgentDetection {
    fn detect(&self, headers: &HeaderMap) -> Option<String> {
        let agent = user_agent(headers);
        trace!(user_agent = agent, "classifying request user agent");
        Some(self.classifier.classify(agent))
    }
}
