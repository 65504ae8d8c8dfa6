/// Lifecycle phases of a crawl
///
/// A crawl moves strictly forward: the seed is claimed, visits run until the
/// frontier is empty or the budget is spent, in-flight visits finish, and the
/// result is assembled.
use std::fmt;

/// Represents the current phase of a crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    /// Seed URL is being validated and claimed
    Seeding,

    /// Visits are being dispatched from the frontier
    Running,

    /// No more visits will be dispatched; waiting for in-flight visits
    Draining,

    /// All visits have finished and the result is final
    Done,
}

impl CrawlPhase {
    /// Returns true if moving from `self` to `next` is a legal transition
    ///
    /// A crawl whose budget is spent by the seed alone may skip straight from
    /// `Running` to `Draining`, and a crawl with nothing in flight may go from
    /// `Running` directly to `Done`.
    pub fn can_transition_to(&self, next: CrawlPhase) -> bool {
        matches!(
            (self, next),
            (Self::Seeding, Self::Running)
                | (Self::Running, Self::Draining)
                | (Self::Running, Self::Done)
                | (Self::Draining, Self::Done)
        )
    }

    /// Returns true once no further visits can be dispatched
    pub fn is_dispatch_closed(&self) -> bool {
        matches!(self, Self::Draining | Self::Done)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Seeding => "seeding",
            Self::Running => "running",
            Self::Draining => "draining",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
