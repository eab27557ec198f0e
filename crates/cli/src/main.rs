use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use corpus_core::github::GithubClient;
use corpus_core::{azure, corpus, github, triage, validate};

/// Corpus-building CLI for conda-forge CI failures.
///
/// This CLI is a thin wrapper around `corpus-core` (exposed in code as
/// `corpus_core`). All substantive logic lives in the library so it can be
/// tested thoroughly and reused from other frontends.
#[derive(Parser, Debug)]
#[command(
    name = "cf-corpus",
    version = corpus_core::version(),
    about = "Download Azure Pipelines failure logs from conda-forge PRs into a labeled corpus",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Download the failed Azure Pipelines logs for a PR into the corpus.
    ///
    /// This will:
    /// - Look up the PR's head commit and its check runs on GitHub.
    /// - Pick the first failing Azure build per platform (linux, osx).
    /// - Download and concatenate each build's logs.
    /// - Write one corpus entry per build (`error.log` + `input.yml` stub).
    Fetch {
        /// GitHub PR URL (e.g., https://github.com/conda-forge/nomad-feedstock/pull/52).
        pr_url: String,

        /// Output directory for corpus entries.
        #[arg(short, long, default_value = "corpus")]
        output_dir: PathBuf,

        /// Category subdirectory for corpus entries.
        #[arg(short, long, default_value = "uncategorized")]
        category: String,
    },

    /// Validate every input.yml in a corpus directory against the schema.
    ///
    /// Exits non-zero when the corpus root is missing or any file fails
    /// validation; an empty corpus is only a warning.
    Validate {
        /// Corpus root directory to scan.
        #[arg(long, default_value = "corpus")]
        corpus_dir: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let outcome = match cli.command {
        Command::Fetch { pr_url, output_dir, category } => {
            fetch_command(&pr_url, &output_dir, &category)
        }
        Command::Validate { corpus_dir } => validate_command(&corpus_dir),
    };

    match outcome {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::FAILURE
        }
    }
}

/// Full fetch pipeline: PR -> head commit -> check runs -> logs -> entries.
fn fetch_command(pr_url: &str, output_dir: &Path, category: &str) -> Result<ExitCode> {
    let pr = github::parse_pr_url(pr_url)?;
    println!("Fetching PR info for {}/{}#{}...", pr.owner, pr.repo, pr.number);

    let client = GithubClient::new();
    let info = client.pull_request(&pr)?;
    println!("Head commit: {}", info.head_sha);

    println!("Fetching check runs...");
    let check_runs = client.check_runs(&pr, &info.head_sha)?;

    let failed = triage::select_failed_builds(&check_runs, azure::PROVIDER_SLUG);
    if failed.is_empty() {
        println!("No failed Azure Pipeline builds found for this PR.");
        return Ok(ExitCode::FAILURE);
    }

    let platforms: Vec<&str> = failed.keys().map(|p| p.as_str()).collect();
    println!("Found {} failed build(s): {}", failed.len(), platforms.join(", "));

    let feedstock = corpus::feedstock_name(&pr.repo);
    let output_base = output_dir.join(category);
    fs::create_dir_all(&output_base)
        .with_context(|| format!("Failed to create output dir: {}", output_base.display()))?;

    // One agent shared across all Azure requests in this run.
    let agent = ureq::agent();

    for (platform, run) in &failed {
        println!("\nProcessing {platform} build: {}", run.name);

        let build_name = triage::build_name(&run.name, *platform);
        println!("  Build name: {build_name}");

        let Some(details_url) = run.details_url.as_deref().filter(|url| !url.is_empty()) else {
            println!("  Warning: No details URL found for {platform} build");
            continue;
        };
        println!("  Details URL: {details_url}");

        // A failure to retrieve logs never aborts the run; the entry is
        // written with a placeholder body for manual follow-up.
        let log_content = match azure::parse_details_url(details_url) {
            Some(build_ref) => {
                println!("  Attempting to download logs from Azure API...");
                match azure::fetch_build_logs(&agent, &build_ref.logs_endpoint()) {
                    Some(logs) => {
                        println!(
                            "  Successfully downloaded logs ({} bytes, {} segment(s), {} skipped)",
                            logs.content.len(),
                            logs.fetched,
                            logs.skipped
                        );
                        logs.content
                    }
                    None => {
                        println!("  Warning: Could not download logs from Azure API");
                        corpus::placeholder_log("Could not download logs automatically", details_url)
                    }
                }
            }
            None => {
                println!("  Warning: Could not parse Azure log URL");
                corpus::placeholder_log("Could not parse Azure log URL", details_url)
            }
        };

        let entry_dir = corpus::write_entry(
            &output_base,
            feedstock,
            pr.number,
            &build_name,
            &log_content,
            pr_url,
        )
        .with_context(|| format!("Failed to write corpus entry for {build_name}"))?;
        println!("  Created entry directory: {}", entry_dir.display());
    }

    println!("\nDone!");
    Ok(ExitCode::SUCCESS)
}

/// Validate all input.yml files under the corpus root.
fn validate_command(corpus_dir: &Path) -> Result<ExitCode> {
    let report = match validate::validate_corpus(corpus_dir) {
        Ok(report) => report,
        Err(err @ validate::ValidateError::MissingRoot(_)) => {
            eprintln!("Error: {err}");
            return Ok(ExitCode::FAILURE);
        }
        Err(err) => return Err(err.into()),
    };

    if report.checked == 0 {
        eprintln!("Warning: No input.yml files found in {}", corpus_dir.display());
        return Ok(ExitCode::SUCCESS);
    }

    if report.is_clean() {
        println!("All {} input.yml files are valid", report.checked);
        return Ok(ExitCode::SUCCESS);
    }

    eprintln!("Validation errors found:");
    for (path, message) in &report.failures {
        eprintln!("\n{}:\n{message}", path.display());
    }
    Ok(ExitCode::FAILURE)
}
