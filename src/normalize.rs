//! Turns the raw strings of a `build.zig.zon` dependency into display values.

use std::sync::OnceLock;

use regex_lite::Regex;

/// Version shown for a framework whose version cannot be determined.
pub const UNKNOWN_VERSION: &str = "unknown";

/// Extracts the package version embedded in a Zig package hash, e.g.
/// `httpz-0.14.1-PNVzrB...` gives `0.14.1`.
pub fn extract_version(hash: &str) -> String {
    static VERSION: OnceLock<Regex> = OnceLock::new();
    let re = VERSION.get_or_init(|| {
        Regex::new(
            r"^[a-z]+-([0-9]+\.[0-9]+\.[0-9]+(?:-(?:alpha|beta|canary|rc|dev)(?:\.[0-9]+)?)?)",
        )
        .unwrap()
    });

    re.captures(hash)
        .and_then(|c| c.get(1))
        .map_or_else(|| UNKNOWN_VERSION.to_string(), |m| m.as_str().to_string())
}

/// Strips the VCS scheme, the `.git` suffix and the `#ref` fragment from a
/// source locator such as `git+https://github.com/zon-dev/zinc.git#abcdef`.
///
/// Locators of any other shape are returned unchanged.
pub fn extract_repo_url(locator: &str) -> String {
    static LOCATOR: OnceLock<Regex> = OnceLock::new();
    let re = LOCATOR.get_or_init(|| Regex::new(r"^\w+\+(.+?)(?:\.git)?(?:#.*)?$").unwrap());

    re.captures(locator)
        .and_then(|c| c.get(1))
        .map_or_else(|| locator.to_string(), |m| m.as_str().to_string())
}
