//! Minimal RFC 6265 cookie store used by the HTTP engine
//!
//! Only what a crawl needs: parse `Set-Cookie`, keep one cookie per
//! (name, domain, path), drop expired ones, and build the `Cookie` request
//! header.

use super::cookie::Cookie;
use crate::url::is_same_site;
use chrono::Utc;
use url::Url;

/// Parses one `Set-Cookie` header value received from `request_url`
///
/// Returns None if the header is malformed or names a domain the request host
/// may not set cookies for.
pub fn parse_set_cookie(header: &str, request_url: &Url) -> Option<Cookie> {
    let raw = ::cookie::Cookie::parse(header.to_string()).ok()?;
    let host = request_url.host_str()?.to_lowercase();

    let domain = match raw.domain() {
        Some(d) => {
            let d = d.trim_start_matches('.').to_lowercase();
            if d.is_empty() || d == host {
                host
            } else if !d.contains('.') {
                // No public-suffix list; a dotless Domain is at best a TLD
                tracing::debug!("Rejecting cookie {} for top-level domain {}", raw.name(), d);
                return None;
            } else if domain_matches(&host, &d) {
                d
            } else {
                tracing::debug!("Rejecting cookie {} for foreign domain {}", raw.name(), d);
                return None;
            }
        }
        None => host,
    };

    let path = match raw.path() {
        Some(p) if p.starts_with('/') => p.to_string(),
        _ => default_path(request_url),
    };

    let (expires, session) = expiry(&raw);

    Some(Cookie {
        name: raw.name().to_string(),
        value: raw.value().to_string(),
        domain,
        path,
        expires,
        http_only: raw.http_only().unwrap_or(false),
        secure: raw.secure().unwrap_or(false),
        same_site: raw.same_site().map(|s| s.to_string()),
        session,
    })
}

/// Max-Age wins over Expires; neither means a session cookie
fn expiry(raw: &::cookie::Cookie<'_>) -> (f64, bool) {
    if let Some(max_age) = raw.max_age() {
        let expires = Utc::now()
            .timestamp()
            .saturating_add(max_age.whole_seconds());
        return (expires as f64, false);
    }

    match raw.expires().and_then(|e| e.datetime()) {
        Some(dt) => (dt.unix_timestamp() as f64, false),
        None => (-1.0, true),
    }
}

/// Inserts `cookie`, replacing any cookie with the same identity
///
/// An already-expired cookie acts as a deletion.
pub fn store(jar: &mut Vec<Cookie>, cookie: Cookie) {
    let key = cookie.key();
    jar.retain(|c| c.key() != key);

    if !is_expired(&cookie) {
        jar.push(cookie);
    }
}

/// Returns true if a persistent cookie's expiry is in the past
pub fn is_expired(cookie: &Cookie) -> bool {
    !cookie.session && cookie.expires <= Utc::now().timestamp() as f64
}

/// Builds the `Cookie` request header for `url`, or None if nothing applies
pub fn cookie_header(jar: &[Cookie], url: &Url) -> Option<String> {
    let host = url.host_str()?.to_lowercase();
    let secure_channel = url.scheme() == "https";

    let pairs: Vec<String> = jar
        .iter()
        .filter(|c| !is_expired(c))
        .filter(|c| domain_matches(&host, &c.domain))
        .filter(|c| path_matches(url.path(), &c.path))
        .filter(|c| !c.secure || secure_channel)
        .map(|c| format!("{}={}", c.name, c.value))
        .collect();

    if pairs.is_empty() {
        None
    } else {
        Some(pairs.join("; "))
    }
}

/// Returns true if `host` may receive cookies scoped to `domain`
pub fn domain_matches(host: &str, domain: &str) -> bool {
    is_same_site(domain, host)
}

/// Returns true if `request_path` is within `cookie_path`
pub fn path_matches(request_path: &str, cookie_path: &str) -> bool {
    if request_path == cookie_path {
        return true;
    }

    request_path.starts_with(cookie_path)
        && (cookie_path.ends_with('/') || request_path[cookie_path.len()..].starts_with('/'))
}

/// Default cookie path: the request path up to, not including, its last `/`
pub fn default_path(url: &Url) -> String {
    let path = url.path();
    match path.rfind('/') {
        Some(0) | None => "/".to_string(),
        Some(i) => path[..i].to_string(),
    }
}
