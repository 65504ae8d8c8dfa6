//! Cookie model shared by all engines

use serde::{Deserialize, Serialize};

/// A cookie as reported by the browsing engine
///
/// Serialized in camelCase so the result document reads like the cookie
/// objects browsers expose to automation tooling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub domain: String,
    pub path: String,

    /// Expiry as seconds since the Unix epoch, `-1` for session cookies
    pub expires: f64,

    pub http_only: bool,
    pub secure: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub same_site: Option<String>,

    pub session: bool,
}

impl Cookie {
    /// Creates a session cookie with the given identity and no flags
    pub fn new(
        name: impl Into<String>,
        value: impl Into<String>,
        domain: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: domain.into(),
            path: path.into(),
            expires: -1.0,
            http_only: false,
            secure: false,
            same_site: None,
            session: true,
        }
    }

    /// Returns the (name, domain, path) identity of this cookie
    pub fn key(&self) -> CookieKey {
        CookieKey {
            name: self.name.clone(),
            domain: self.domain.trim_start_matches('.').to_lowercase(),
            path: self.path.clone(),
        }
    }
}

/// Identity of a cookie within a cookie store
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CookieKey {
    pub name: String,
    pub domain: String,
    pub path: String,
}
