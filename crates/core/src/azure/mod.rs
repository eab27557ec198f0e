//! Azure Pipelines log retrieval.
//!
//! The check runs GitHub reports carry an Azure "details" URL pointing at a
//! human results page, e.g.
//! `https://dev.azure.com/{org}/{project}/_build/results?buildId=...&view=logs&jobId=...`.
//! This module bridges that page URL to the log-listing API endpoint
//! `https://dev.azure.com/{org}/{project}/_apis/build/builds/{buildId}/logs`
//! and downloads the individual log segments it lists.

use std::io::Read;

use url::Url;

/// Slug of the GitHub App that reports Azure Pipelines check runs.
pub const PROVIDER_SLUG: &str = "azure-pipelines";

/// Host the details URL must live on.
const AZURE_HOST: &str = "dev.azure.com";

/// Build identifiers parsed from an Azure Pipelines details URL.
///
/// `org`, `project`, and `build_id` are required to reconstruct the log-list
/// endpoint; `job_id` is carried as metadata only when the URL has one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AzureBuildRef {
    pub org: String,
    pub project: String,
    pub build_id: String,
    pub job_id: Option<String>,
}

impl AzureBuildRef {
    /// The API endpoint listing this build's log segments.
    pub fn logs_endpoint(&self) -> String {
        format!(
            "https://{AZURE_HOST}/{}/{}/_apis/build/builds/{}/logs",
            self.org, self.project, self.build_id
        )
    }
}

/// Try to extract build identifiers from an Azure Pipelines details URL.
///
/// Returns `None` when the URL is missing either a `buildId` query parameter
/// with a leading digit run or the
/// `https://dev.azure.com/<org>/<project>/_build` path shape. Absence is an
/// expected outcome handled upstream, not an error.
pub fn parse_details_url(details_url: &str) -> Option<AzureBuildRef> {
    let parsed = Url::parse(details_url).ok()?;
    if parsed.scheme() != "https" || parsed.host_str() != Some(AZURE_HOST) {
        return None;
    }

    let mut segments = parsed.path_segments()?;
    let org = segments.next().filter(|s| !s.is_empty())?.to_string();
    let project = segments.next().filter(|s| !s.is_empty())?.to_string();
    if segments.next() != Some("_build") {
        return None;
    }

    let mut build_id = None;
    let mut job_id = None;
    for (key, value) in parsed.query_pairs() {
        match key.as_ref() {
            "buildId" if build_id.is_none() => {
                // Only the leading digit run counts; a value with no digit
                // prefix does not fill the build id.
                let digits: String = value.chars().take_while(|c| c.is_ascii_digit()).collect();
                if !digits.is_empty() {
                    build_id = Some(digits);
                }
            }
            "jobId" if job_id.is_none() && !value.is_empty() => {
                job_id = Some(value.into_owned());
            }
            _ => {}
        }
    }

    Some(AzureBuildRef { org, project, build_id: build_id?, job_id })
}

/// Log content assembled from a build's segments.
///
/// `skipped` counts segments that failed to download (or listed no URL) and
/// were dropped; partial success is still success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedLogs {
    pub content: String,
    pub fetched: usize,
    pub skipped: usize,
}

// Wire shapes for the log-list response.

#[derive(Debug, serde::Deserialize)]
struct LogListWire {
    #[serde(default)]
    value: Vec<LogDescriptorWire>,
}

#[derive(Debug, serde::Deserialize)]
struct LogDescriptorWire {
    url: Option<String>,
}

/// Fetch and concatenate the log segments listed at `endpoint`.
///
/// One GET retrieves the descriptor list, then each descriptor's `url` is
/// fetched in order. Segments that fail to download are skipped; the rest
/// are joined with newline separators. Returns `None` only when the listing
/// request fails or no segment could be retrieved at all. No retries.
pub fn fetch_build_logs(agent: &ureq::Agent, endpoint: &str) -> Option<FetchedLogs> {
    let listing: LogListWire = agent.get(endpoint).call().ok()?.into_json().ok()?;

    let mut parts: Vec<String> = Vec::new();
    let mut skipped = 0usize;
    for descriptor in listing.value {
        let Some(url) = descriptor.url.as_deref() else {
            skipped += 1;
            continue;
        };
        match fetch_text(agent, url) {
            Some(body) => parts.push(body),
            None => skipped += 1,
        }
    }

    if parts.is_empty() {
        return None;
    }
    Some(FetchedLogs { fetched: parts.len(), skipped, content: parts.join("\n") })
}

/// Download one segment as text, replacing invalid UTF-8 rather than failing.
fn fetch_text(agent: &ureq::Agent, url: &str) -> Option<String> {
    let response = agent.get(url).call().ok()?;
    let mut bytes = Vec::new();
    response.into_reader().read_to_end(&mut bytes).ok()?;
    Some(String::from_utf8_lossy(&bytes).into_owned())
}
