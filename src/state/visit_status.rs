/// Per-URL visit states
///
/// Every claimed URL carries one of these from the moment it enters the
/// frontier until its visit finishes.
use serde::Serialize;
use std::fmt;

/// Represents the current state of a claimed URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum VisitStatus {
    // ===== Active States =====
    /// Claimed and waiting in the frontier
    Pending,

    /// A visit task is running for this URL
    InFlight,

    // ===== Terminal States =====
    /// Visit completed (cookies captured, links harvested)
    Succeeded,

    /// Navigation, timeout or session error; the crawl continued without it
    Failed,

    /// Navigation ended up outside the seed's site after a redirect
    OutOfScope,
}

impl VisitStatus {
    /// Returns true if this is a terminal state (no further processing needed)
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending | Self::InFlight)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InFlight => "in-flight",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
            Self::OutOfScope => "out-of-scope",
        }
    }
}

impl fmt::Display for VisitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
