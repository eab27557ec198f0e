//! Core data model for pull requests and CI check runs.
//!
//! Everything here is a plain value object derived once at the API boundary
//! and never mutated afterwards. The raw JSON payloads from GitHub are mapped
//! into these shapes in `github`; nothing downstream sees untyped maps.

/// A parsed reference to a GitHub pull request.
///
/// Derived once from a PR URL; `owner` and `repo` are non-empty path
/// segments and `number` is always >= 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestRef {
    pub owner: String,
    pub repo: String,
    pub number: u64,
}

/// Conclusion of a completed check run, as reported by GitHub.
///
/// Check runs that are still in progress have no conclusion; those map to
/// `Unknown`, as do any conclusion strings this crate does not know about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Conclusion {
    Success,
    Failure,
    Neutral,
    Cancelled,
    Skipped,
    TimedOut,
    ActionRequired,
    Stale,
    #[serde(other)]
    Unknown,
}

/// A single CI job result reported against a commit.
///
/// `provider_slug` identifies the GitHub App that produced the run (e.g.
/// `azure-pipelines`); `details_url` points at the provider's results page
/// and may be absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckRun {
    pub name: String,
    pub conclusion: Conclusion,
    pub provider_slug: String,
    pub details_url: Option<String>,
}

/// Coarse platform bucket a check run is classified into.
///
/// Derived from the run's name by substring matching. `Ord` so that maps
/// keyed by platform iterate deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PlatformKey {
    Linux,
    Osx,
}

impl PlatformKey {
    pub fn as_str(self) -> &'static str {
        match self {
            PlatformKey::Linux => "linux",
            PlatformKey::Osx => "osx",
        }
    }
}

impl std::fmt::Display for PlatformKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
