use predicates::str::contains;
use tempfile::tempdir;

/// A malformed PR reference is rejected before any network call, with the
/// expected format in the message, and exits non-zero.
#[test]
fn fetch_rejects_malformed_pr_url() {
    let dir = tempdir().expect("tempdir");

    assert_cmd::cargo::cargo_bin_cmd!("cf-corpus")
        .current_dir(dir.path())
        .arg("fetch")
        .arg("https://gitlab.com/owner/repo/pull/12")
        .assert()
        .failure()
        .stderr(contains("Invalid GitHub PR URL"))
        .stderr(contains("https://github.com/owner/repo/pull/number"));

    // Nothing was written: the reference never parsed.
    assert!(!dir.path().join("corpus").exists());
}

#[test]
fn fetch_rejects_pr_url_with_leading_text() {
    assert_cmd::cargo::cargo_bin_cmd!("cf-corpus")
        .arg("fetch")
        .arg("see https://github.com/owner/repo/pull/12")
        .assert()
        .failure()
        .stderr(contains("Invalid GitHub PR URL"));
}

#[test]
fn fetch_requires_a_pr_url_argument() {
    assert_cmd::cargo::cargo_bin_cmd!("cf-corpus").arg("fetch").assert().failure();
}

/// The CLI reports the library's version so frontends stay consistent.
#[test]
fn version_flag_reports_library_version() {
    assert_cmd::cargo::cargo_bin_cmd!("cf-corpus")
        .arg("--version")
        .assert()
        .success()
        .stdout(contains(corpus_core::version()));
}

#[test]
fn help_lists_both_subcommands() {
    assert_cmd::cargo::cargo_bin_cmd!("cf-corpus")
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("fetch"))
        .stdout(contains("validate"));
}
