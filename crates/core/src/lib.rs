//! corpus-core
//!
//! Core library for assembling a labeled corpus of CI failure logs from
//! conda-forge pull requests.
//!
//! The pipeline is: parse a GitHub PR URL, find the failed Azure Pipelines
//! check runs on the PR's head commit, download and concatenate their logs,
//! and write each one out as a corpus entry (`error.log` + `input.yml` stub).
//! A separate validator checks existing `input.yml` files against the corpus
//! metadata schema.
//!
//! All substantive logic lives here so it is fully testable and reusable from
//! multiple frontends (CLI, future batch tooling, etc.).

pub mod azure;
pub mod corpus;
pub mod github;
pub mod model;
pub mod triage;
pub mod validate;

/// Returns the library version as encoded at compile time.
///
/// Useful for tests and for frontends to report consistent version info.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
