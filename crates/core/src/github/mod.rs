//! GitHub review API integration.
//!
//! This module owns the two read-only calls the tool makes against GitHub:
//! PR metadata (to get the head commit SHA) and the check-run list for that
//! commit. Responses are mapped into the typed shapes in [`crate::model`] at
//! this boundary; unknown or missing fields default rather than error.
//!
//! It also owns parsing of user-supplied PR URLs, so a malformed reference is
//! rejected before any network call happens.

use std::io::Read;

use thiserror::Error;

use crate::model::{CheckRun, Conclusion, PullRequestRef};

/// Base URL of the GitHub REST API.
pub const GITHUB_API_BASE: &str = "https://api.github.com";

/// Media type both requests declare acceptance of.
pub const GITHUB_MEDIA_TYPE: &str = "application/vnd.github.v3+json";

/// Error type for PR parsing and GitHub API calls.
#[derive(Debug, Error)]
pub enum GithubError {
    /// The user-supplied PR URL does not match the expected shape.
    #[error(
        "Invalid GitHub PR URL: {url}. Expected format: https://github.com/owner/repo/pull/number"
    )]
    InvalidReference { url: String },

    /// GitHub answered 403, which in practice means the unauthenticated rate
    /// limit was hit. Kept as its own variant so the hint reaches the user.
    #[error(
        "HTTP Error: 403 - {reason}. Note: GitHub API rate limit may be exceeded. \
         Consider using a GitHub token."
    )]
    RateLimited { reason: String },

    /// Any other non-success HTTP status.
    #[error("HTTP Error: {code} - {reason}")]
    Status { code: u16, reason: String },

    /// Connection-level failure (DNS, TLS, timeouts, ...).
    #[error("request to GitHub failed: {0}")]
    Transport(#[source] Box<ureq::Error>),

    /// The response body could not be read or was not the expected JSON.
    #[error("failed to decode GitHub API response: {0}")]
    Decode(#[from] std::io::Error),
}

/// Parse a GitHub PR URL into its owner, repo, and PR number.
///
/// The pattern is anchored at the start of the string:
/// `https://github.com/<owner>/<repo>/pull/<digits>`. Content after the
/// digits (trailing path, query string) is ignored, matching a prefix match.
pub fn parse_pr_url(url: &str) -> Result<PullRequestRef, GithubError> {
    let invalid = || GithubError::InvalidReference { url: url.to_string() };

    let rest = url.strip_prefix("https://github.com/").ok_or_else(invalid)?;
    let mut segments = rest.splitn(4, '/');

    let owner = segments.next().filter(|s| !s.is_empty()).ok_or_else(invalid)?;
    let repo = segments.next().filter(|s| !s.is_empty()).ok_or_else(invalid)?;
    if segments.next() != Some("pull") {
        return Err(invalid());
    }
    let tail = segments.next().ok_or_else(invalid)?;

    // Take the leading digit run; anything after it is tolerated.
    let digits: &str = &tail[..tail.chars().take_while(|c| c.is_ascii_digit()).count()];
    let number: u64 = digits.parse().map_err(|_| invalid())?;
    if number == 0 {
        return Err(invalid());
    }

    Ok(PullRequestRef { owner: owner.to_string(), repo: repo.to_string(), number })
}

/// Head-commit info extracted from the PR metadata response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestInfo {
    pub head_sha: String,
}

// Wire shapes. These mirror only the fields we consume; everything else in
// the payload is dropped during deserialization.

#[derive(Debug, serde::Deserialize)]
struct PullRequestWire {
    head: HeadWire,
}

#[derive(Debug, serde::Deserialize)]
struct HeadWire {
    sha: String,
}

#[derive(Debug, serde::Deserialize)]
struct CheckRunsWire {
    #[serde(default)]
    check_runs: Vec<CheckRunWire>,
}

#[derive(Debug, serde::Deserialize)]
struct CheckRunWire {
    #[serde(default)]
    name: String,
    conclusion: Option<Conclusion>,
    app: Option<AppWire>,
    details_url: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
struct AppWire {
    slug: Option<String>,
}

impl CheckRunWire {
    /// Map the wire shape into the domain model, defaulting absent fields.
    fn into_check_run(self) -> CheckRun {
        CheckRun {
            name: self.name,
            conclusion: self.conclusion.unwrap_or(Conclusion::Unknown),
            provider_slug: self.app.and_then(|app| app.slug).unwrap_or_default(),
            details_url: self.details_url,
        }
    }
}

/// Read-only client for the GitHub review API.
///
/// The API base is an explicit configuration value (default
/// [`GITHUB_API_BASE`]) so tests can point the client at a local server.
pub struct GithubClient {
    agent: ureq::Agent,
    api_base: String,
}

impl GithubClient {
    pub fn new() -> Self {
        Self::with_base(GITHUB_API_BASE)
    }

    pub fn with_base(api_base: impl Into<String>) -> Self {
        Self { agent: ureq::agent(), api_base: api_base.into() }
    }

    /// Fetch PR metadata and extract the head commit SHA.
    pub fn pull_request(&self, pr: &PullRequestRef) -> Result<PullRequestInfo, GithubError> {
        let url = format!("{}/repos/{}/{}/pulls/{}", self.api_base, pr.owner, pr.repo, pr.number);
        let wire: PullRequestWire = self.get_json(&url)?;
        Ok(PullRequestInfo { head_sha: wire.head.sha })
    }

    /// Fetch the check runs reported against a commit.
    pub fn check_runs(&self, pr: &PullRequestRef, sha: &str) -> Result<Vec<CheckRun>, GithubError> {
        let url = format!(
            "{}/repos/{}/{}/commits/{}/check-runs",
            self.api_base, pr.owner, pr.repo, sha
        );
        let wire: CheckRunsWire = self.get_json(&url)?;
        Ok(wire.check_runs.into_iter().map(CheckRunWire::into_check_run).collect())
    }

    fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, GithubError> {
        let response = match self.agent.get(url).set("Accept", GITHUB_MEDIA_TYPE).call() {
            Ok(response) => response,
            Err(ureq::Error::Status(403, response)) => {
                return Err(GithubError::RateLimited {
                    reason: response.status_text().to_string(),
                });
            }
            Err(ureq::Error::Status(code, response)) => {
                return Err(GithubError::Status {
                    code,
                    reason: response.status_text().to_string(),
                });
            }
            Err(err) => return Err(GithubError::Transport(Box::new(err))),
        };

        // Read the body manually so decode failures surface as Decode errors
        // with the serde cause attached.
        let mut body = String::new();
        response.into_reader().read_to_string(&mut body)?;
        serde_json::from_str(&body)
            .map_err(|err| GithubError::Decode(std::io::Error::new(std::io::ErrorKind::InvalidData, err)))
    }
}

impl Default for GithubClient {
    fn default() -> Self {
        Self::new()
    }
}
