//! URL handling module for Cookie-Ripple
//!
//! This module provides absolute-URL validation, domain extraction, link
//! resolution against a page's current address, and the domain-scoping policy
//! that keeps a crawl on the seed's site.
//!
//! URLs are compared by their string form exactly as the `url` crate
//! serializes them. No further canonicalization (tracking parameter removal,
//! `www.` stripping, etc.) is performed.

mod domain;
mod resolve;
mod scope;

use crate::{UrlError, UrlResult};
use url::Url;

// Re-export main functions
pub use domain::extract_domain;
pub use resolve::{resolve_link, resolve_links};
pub use scope::{is_same_site, ScopePolicy};

/// Parses a string as an absolute, crawlable URL
///
/// A crawlable URL uses the `http` or `https` scheme and has a host.
///
/// # Arguments
///
/// * `url_str` - The URL string to parse
///
/// # Returns
///
/// * `Ok(Url)` - The parsed URL
/// * `Err(UrlError)` - The string is not an absolute http(s) URL
///
/// # Examples
///
/// ```
/// use cookie_ripple::url::parse_absolute;
///
/// let url = parse_absolute("https://example.com/page").unwrap();
/// assert_eq!(url.host_str(), Some("example.com"));
///
/// assert!(parse_absolute("/relative/path").is_err());
/// assert!(parse_absolute("ftp://example.com/file").is_err());
/// ```
pub fn parse_absolute(url_str: &str) -> UrlResult<Url> {
    let url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingDomain);
    }

    Ok(url)
}
