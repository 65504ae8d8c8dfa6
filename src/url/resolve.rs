//! Resolution of raw link targets into absolute URLs

use url::Url;

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - fragment-only links
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
///
/// # Examples
///
/// ```
/// use cookie_ripple::url::resolve_link;
/// use url::Url;
///
/// let base = Url::parse("https://example.com/docs/intro").unwrap();
/// assert_eq!(
///     resolve_link("../pricing", &base),
///     Some("https://example.com/pricing".to_string())
/// );
/// assert_eq!(resolve_link("mailto:hi@example.com", &base), None);
/// ```
pub fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if lowered.starts_with("javascript:")
        || lowered.starts_with("mailto:")
        || lowered.starts_with("tel:")
        || lowered.starts_with("data:")
    {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) => {
            if (absolute_url.scheme() == "http" || absolute_url.scheme() == "https")
                && absolute_url.host_str().is_some()
            {
                Some(absolute_url.to_string())
            } else {
                None
            }
        }
        Err(_) => None,
    }
}

/// Resolves every href against `base_url`, silently dropping malformed ones
///
/// Order is preserved. Duplicates are kept; the frontier's claim step is the
/// single place where repeated URLs are discarded.
pub fn resolve_links<S: AsRef<str>>(hrefs: &[S], base_url: &Url) -> Vec<String> {
    hrefs
        .iter()
        .filter_map(|href| resolve_link(href.as_ref(), base_url))
        .collect()
}
