//! Chat log records and the coarse device/platform metadata attached to
//! them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Device class derived from the user-agent string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    Mobile,
    Tablet,
    Desktop,
}

/// One conversation entry inside a [`ChatLog`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogTurn {
    pub role: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// Coarse client metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogMetadata {
    pub device_type: DeviceType,
    pub platform: String,
}

/// Log record built per message, shaped for the chat-log endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatLog {
    pub session_id: String,
    pub user_agent: String,
    /// Single-entry list: one record is built per appended message.
    pub conversation: Vec<LogTurn>,
    pub metadata: LogMetadata,
}

const TABLET_MARKERS: [&str; 4] = ["tablet", "ipad", "playbook", "silk"];
const MOBILE_MARKERS: [&str; 9] = [
    "mobile",
    "android",
    "iphone",
    "ipod",
    "iemobile",
    "blackberry",
    "kindle",
    "opera mini",
    "opera mobi",
];

/// Classifies the client device from its user-agent string.
///
/// Android without a `mobi` marker counts as a tablet, everything
/// unrecognized as desktop.
pub fn device_type_from_user_agent(ua: &str) -> DeviceType {
    let lower = ua.to_ascii_lowercase();
    if TABLET_MARKERS.iter().any(|m| lower.contains(m))
        || (lower.contains("android") && !lower.contains("mobi"))
    {
        return DeviceType::Tablet;
    }
    if MOBILE_MARKERS.iter().any(|m| lower.contains(m)) {
        return DeviceType::Mobile;
    }
    DeviceType::Desktop
}

/// Coarse platform name from the user-agent string.
pub fn platform_from_user_agent(ua: &str) -> String {
    let lower = ua.to_ascii_lowercase();
    let platform = if lower.contains("android") {
        "Android"
    } else if lower.contains("iphone") || lower.contains("ipad") || lower.contains("ipod") {
        "iOS"
    } else if lower.contains("windows") {
        "Windows"
    } else if lower.contains("mac os") || lower.contains("macintosh") {
        "macOS"
    } else if lower.contains("linux") {
        "Linux"
    } else {
        "unknown"
    };
    platform.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_common_user_agents() {
        let iphone =
            "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15 Mobile";
        assert_eq!(device_type_from_user_agent(iphone), DeviceType::Mobile);
        assert_eq!(platform_from_user_agent(iphone), "iOS");

        let ipad = "Mozilla/5.0 (iPad; CPU OS 16_0 like Mac OS X)";
        assert_eq!(device_type_from_user_agent(ipad), DeviceType::Tablet);

        let android_tablet = "Mozilla/5.0 (Linux; Android 13; SM-X200)";
        assert_eq!(
            device_type_from_user_agent(android_tablet),
            DeviceType::Tablet
        );

        let android_phone = "Mozilla/5.0 (Linux; Android 13; Pixel 7) Mobile";
        assert_eq!(
            device_type_from_user_agent(android_phone),
            DeviceType::Mobile
        );
        assert_eq!(platform_from_user_agent(android_phone), "Android");

        let desktop = "Mozilla/5.0 (Windows NT 10.0; Win64; x64)";
        assert_eq!(device_type_from_user_agent(desktop), DeviceType::Desktop);
        assert_eq!(platform_from_user_agent(desktop), "Windows");
    }
}
