use std::fmt;

use woothee::parser::Parser;

use super::{DeviceType, UserAgentClassifier};

/// Classifier backed by the woothee user-agent database.
///
/// woothee files tablets under `smartphone`; iPads and Android agents
/// without the `Mobile` token are reported as tablets instead.
pub struct WootheeClassifier {
    parser: Parser,
}

impl WootheeClassifier {
    /// Classifier with a fresh woothee parser.
    pub fn new() -> Self {
        Self {
            parser: Parser::new(),
        }
    }

    /// Device type of `user_agent`.
    pub fn device_type(&self, user_agent: &str) -> DeviceType {
        let Some(result) = self.parser.parse(user_agent) else {
            return DeviceType::Plain;
        };

        match result.category {
            "pc" => DeviceType::Desktop,
            "smartphone" if result.os == "iPad" => DeviceType::Tablet,
            "smartphone"
                if result.os == "Android" && !user_agent.contains("Mobile") =>
            {
                DeviceType::Tablet
            }
            "smartphone" | "mobilephone" => DeviceType::Phone,
            _ => DeviceType::Plain,
        }
    }
}

impl Default for WootheeClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for WootheeClassifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WootheeClassifier").finish_non_exhaustive()
    }
}

impl UserAgentClassifier for WootheeClassifier {
    fn classify(&self, user_agent: &str) -> String {
        self.device_type(user_agent).as_str().to_string()
    }
}

/// Dependency-free substring heuristics. Tablets are checked before phones
/// since tablet agents often carry phone keywords too.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordClassifier;

impl KeywordClassifier {
    /// Device type of `user_agent`.
    pub fn device_type(&self, user_agent: &str) -> DeviceType {
        let ua = user_agent.to_ascii_lowercase();

        if ua.contains("ipad")
            || ua.contains("tablet")
            || (ua.contains("android") && !ua.contains("mobile"))
        {
            return DeviceType::Tablet;
        }

        if ua.contains("iphone")
            || ua.contains("ipod")
            || ua.contains("android")
            || ua.contains("mobile")
            || ua.contains("phone")
        {
            return DeviceType::Phone;
        }

        if ua.contains("windows")
            || ua.contains("macintosh")
            || ua.contains("x11")
            || ua.contains("linux")
            || ua.contains("cros")
        {
            return DeviceType::Desktop;
        }

        DeviceType::Plain
    }
}

impl UserAgentClassifier for KeywordClassifier {
    fn classify(&self, user_agent: &str) -> String {
        self.device_type(user_agent).as_str().to_string()
    }
}
