//! User-agent classification.
//!
//! [`classify_client`] is a pure function over the lower-cased user-agent
//! string. Every dimension resolves to a closed enum with an explicit fallback,
//! so aggregation code can match exhaustively.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

static MOBILE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"mobile|android|iphone|ipad|phone|tablet").unwrap());

static BOT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"bot|crawler|spider|crawling").unwrap());

/// Form factor of the client device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DeviceClass {
    Desktop,
    Mobile,
    Tablet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Browser {
    Chrome,
    Firefox,
    Safari,
    Edge,
    Opera,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Os {
    Windows,
    MacOs,
    Linux,
    Android,
    Ios,
    Unknown,
}

impl DeviceClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceClass::Desktop => "Desktop",
            DeviceClass::Mobile => "Mobile",
            DeviceClass::Tablet => "Tablet",
        }
    }

    /// Parses a stored label, falling back to `Desktop` for anything unknown.
    pub fn from_label(label: &str) -> Self {
        match label {
            "Mobile" => DeviceClass::Mobile,
            "Tablet" => DeviceClass::Tablet,
            _ => DeviceClass::Desktop,
        }
    }
}

impl Browser {
    pub fn as_str(&self) -> &'static str {
        match self {
            Browser::Chrome => "Chrome",
            Browser::Firefox => "Firefox",
            Browser::Safari => "Safari",
            Browser::Edge => "Edge",
            Browser::Opera => "Opera",
            Browser::Unknown => "Unknown",
        }
    }

    pub fn from_label(label: &str) -> Self {
        match label {
            "Chrome" => Browser::Chrome,
            "Firefox" => Browser::Firefox,
            "Safari" => Browser::Safari,
            "Edge" => Browser::Edge,
            "Opera" => Browser::Opera,
            _ => Browser::Unknown,
        }
    }
}

impl Os {
    pub fn as_str(&self) -> &'static str {
        match self {
            Os::Windows => "Windows",
            Os::MacOs => "macOS",
            Os::Linux => "Linux",
            Os::Android => "Android",
            Os::Ios => "iOS",
            Os::Unknown => "Unknown",
        }
    }

    pub fn from_label(label: &str) -> Self {
        match label {
            "Windows" => Os::Windows,
            "macOS" => Os::MacOs,
            "Linux" => Os::Linux,
            "Android" => Os::Android,
            "iOS" => Os::Ios,
            _ => Os::Unknown,
        }
    }
}

impl fmt::Display for DeviceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Browser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derived classification of a raw user-agent string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientInfo {
    pub device: DeviceClass,
    pub browser: Browser,
    pub os: Os,
    pub is_mobile: bool,
    pub is_bot: bool,
}

/// Classifies a raw user-agent string.
///
/// Never fails. An empty or unrecognised agent yields
/// `Desktop`/`Unknown`/`Unknown` with both flags false.
///
/// # Examples
///
/// ```
/// use link_tracker::domain::enrichment::{Browser, DeviceClass, Os, classify_client};
///
/// let info = classify_client("Mozilla/5.0 (Linux; Android 13) Chrome/100.0 Mobile Safari/537.36");
/// assert_eq!(info.device, DeviceClass::Mobile);
/// assert_eq!(info.browser, Browser::Chrome);
/// assert_eq!(info.os, Os::Android);
/// ```
pub fn classify_client(user_agent: &str) -> ClientInfo {
    let ua = user_agent.to_lowercase();

    ClientInfo {
        device: detect_device(&ua),
        browser: detect_browser(&ua),
        os: detect_os(&ua),
        is_mobile: MOBILE_PATTERN.is_match(&ua),
        is_bot: BOT_PATTERN.is_match(&ua),
    }
}

// Edge and Opera both embed "chrome", and Chrome embeds "safari".
fn detect_browser(ua: &str) -> Browser {
    if ua.contains("edg") {
        Browser::Edge
    } else if ua.contains("opr") || ua.contains("opera") {
        Browser::Opera
    } else if ua.contains("chrome") || ua.contains("crios") {
        Browser::Chrome
    } else if ua.contains("firefox") || ua.contains("fxios") {
        Browser::Firefox
    } else if ua.contains("safari") {
        Browser::Safari
    } else {
        Browser::Unknown
    }
}

// Android agents carry "linux" and iOS agents carry "mac os x".
fn detect_os(ua: &str) -> Os {
    if ua.contains("iphone") || ua.contains("ipad") || ua.contains("ipod") {
        Os::Ios
    } else if ua.contains("android") {
        Os::Android
    } else if ua.contains("windows") {
        Os::Windows
    } else if ua.contains("mac os") || ua.contains("macintosh") {
        Os::MacOs
    } else if ua.contains("linux") {
        Os::Linux
    } else {
        Os::Unknown
    }
}

fn detect_device(ua: &str) -> DeviceClass {
    if ua.contains("ipad") || ua.contains("tablet") {
        DeviceClass::Tablet
    } else if ua.contains("mobile")
        || ua.contains("phone")
        || ua.contains("android")
        || ua.contains("iphone")
    {
        DeviceClass::Mobile
    } else {
        DeviceClass::Desktop
    }
}
