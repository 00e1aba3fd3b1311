use url::Url;

/// Returns `true` if the status is one the downloader follows.
///
/// Only 301 and 302 are followed; anything else other than 200 fails the
/// download.
///
/// ```
/// use linterhub_fetch::is_redirect;
///
/// assert!(is_redirect(301));
/// assert!(is_redirect(302));
/// assert!(!is_redirect(307));
/// assert!(!is_redirect(200));
/// ```
pub fn is_redirect(status: u16) -> bool { matches!(status, 301 | 302) }

/// Split a URL into the host and the path plus query sent on the request
/// line.
pub fn request_options(url: &Url) -> (String, String) {
    let host = url.host_str().unwrap_or_default().to_string();
    let path = match url.query() {
        Some(query) => format!("{}?{query}", url.path()),
        None => url.path().to_string(),
    };
    (host, path)
}
