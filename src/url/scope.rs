//! Domain scoping policy
//!
//! When scoping is enabled, a URL is eligible for the crawl only if its host
//! is the seed host or a subdomain of it.

use super::domain::extract_domain;
use crate::{UrlError, UrlResult};
use url::Url;

/// Checks whether `candidate` is `seed_host` or one of its subdomains
///
/// # Examples
///
/// ```
/// use cookie_ripple::url::is_same_site;
///
/// assert!(is_same_site("example.com", "example.com"));
/// assert!(is_same_site("example.com", "shop.example.com"));
/// assert!(is_same_site("example.com", "a.b.example.com"));
/// assert!(!is_same_site("example.com", "badexample.com"));
/// assert!(!is_same_site("shop.example.com", "example.com"));
/// ```
pub fn is_same_site(seed_host: &str, candidate: &str) -> bool {
    candidate == seed_host || candidate.ends_with(&format!(".{}", seed_host))
}

/// Which URLs a crawl may visit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopePolicy {
    /// Any absolute http(s) URL is eligible
    Unrestricted,
    /// Only the seed host and its subdomains are eligible
    SameSite { seed_host: String },
}

impl ScopePolicy {
    /// Builds the policy for a crawl starting at `seed`
    ///
    /// # Arguments
    ///
    /// * `seed` - The seed URL of the crawl
    /// * `enabled` - Whether domain scoping is switched on
    pub fn for_seed(seed: &Url, enabled: bool) -> UrlResult<Self> {
        if !enabled {
            return Ok(Self::Unrestricted);
        }

        let seed_host = extract_domain(seed).ok_or(UrlError::MissingDomain)?;
        Ok(Self::SameSite { seed_host })
    }

    /// Returns true if the URL may be visited under this policy
    pub fn allows(&self, url: &Url) -> bool {
        match self {
            Self::Unrestricted => true,
            Self::SameSite { seed_host } => extract_domain(url)
                .map(|host| is_same_site(seed_host, &host))
                .unwrap_or(false),
        }
    }

    /// Like [`ScopePolicy::allows`], for a URL that has not been parsed yet
    ///
    /// Malformed URLs are never allowed.
    pub fn allows_str(&self, url: &str) -> bool {
        Url::parse(url).map(|u| self.allows(&u)).unwrap_or(false)
    }

    /// Returns true if domain scoping is switched on
    pub fn is_restricted(&self) -> bool {
        matches!(self, Self::SameSite { .. })
    }
}
