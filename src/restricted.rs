/// Detection of browser-internal pages where no content script can run
use url::Url;

/// Schemes of pages that cannot host the overlay.
pub const RESTRICTED_PREFIXES: &[&str] = &[
    "chrome://",
    "chrome-extension://",
    "chrome-search://",
    "chrome-untrusted://",
    "devtools://",
    "edge://",
    "brave://",
    "about:",
    "view-source:",
];

/// Extension galleries as (host, path prefix). Scripts are blocked there too.
pub const RESTRICTED_GALLERIES: &[(&str, &str)] = &[
    ("chrome.google.com", "/webstore"),
    ("chromewebstore.google.com", "/"),
    ("microsoftedge.microsoft.com", "/addons"),
];

fn under_path(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => prefix.ends_with('/') || rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

fn is_gallery(url: &Url) -> bool {
    let Some(host) = url.host_str() else {
        return false;
    };
    RESTRICTED_GALLERIES
        .iter()
        .any(|(gallery, prefix)| host == *gallery && under_path(url.path(), prefix))
}

/// Check whether a tab URL is a restricted page.
///
/// The URL is normalized first (scheme and host lowercased) so
/// `HTTPS://ChromeWebStore.Google.com/` still matches. Galleries are matched
/// on the exact host, not a string prefix. A tab whose URL we can't see is
/// treated as a normal page: a click there is attempted and fails quietly if
/// nothing is listening.
pub fn is_restricted_url(url: Option<&str>) -> bool {
    let Some(raw) = url.map(str::trim).filter(|u| !u.is_empty()) else {
        return false;
    };

    let parsed = Url::parse(raw).ok();
    let normalized = match &parsed {
        Some(parsed) => parsed.as_str().to_string(),
        None => raw.to_lowercase(),
    };

    RESTRICTED_PREFIXES
        .iter()
        .any(|prefix| normalized.starts_with(prefix))
        || parsed.as_ref().is_some_and(is_gallery)
}
