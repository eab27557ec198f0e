//! Check-run triage: pick one representative failure per platform.

use std::collections::BTreeMap;

use crate::model::{CheckRun, Conclusion, PlatformKey};

/// Select at most one failing check run per platform.
///
/// Runs are scanned in the order GitHub returned them. A run is considered
/// only when its conclusion is `failure` and its provider slug matches
/// `provider_slug`. The run's name classifies it: "linux" anywhere in the
/// lower-cased name maps to [`PlatformKey::Linux`], "osx" or "macos" to
/// [`PlatformKey::Osx`]; names matching neither are ignored.
///
/// The first match per platform wins; later failures of the same platform
/// are deliberately discarded ("pick one representative failure"). Scanning
/// stops early once both platforms are filled. An empty map is a valid
/// outcome meaning there is nothing to do.
pub fn select_failed_builds(
    check_runs: &[CheckRun],
    provider_slug: &str,
) -> BTreeMap<PlatformKey, CheckRun> {
    let mut selected: BTreeMap<PlatformKey, CheckRun> = BTreeMap::new();

    for run in check_runs {
        if run.conclusion != Conclusion::Failure {
            continue;
        }
        if run.provider_slug != provider_slug {
            continue;
        }

        let name = run.name.to_lowercase();

        // A name containing both markers fills both platforms.
        if name.contains("linux") {
            selected.entry(PlatformKey::Linux).or_insert_with(|| run.clone());
        }
        if name.contains("osx") || name.contains("macos") {
            selected.entry(PlatformKey::Osx).or_insert_with(|| run.clone());
        }

        if selected.len() >= 2 {
            break;
        }
    }

    selected
}

/// Map a check run's name to the conda-forge build name convention.
///
/// The result only feeds the corpus directory name; it carries no further
/// semantic meaning.
pub fn build_name(check_run_name: &str, platform: PlatformKey) -> String {
    let name = check_run_name.to_lowercase();
    let build = match platform {
        PlatformKey::Linux => {
            if name.contains("aarch64") || name.contains("arm64") {
                "linux_aarch64"
            } else {
                "linux_64"
            }
        }
        PlatformKey::Osx => {
            if name.contains("arm64") || name.contains("aarch64") {
                "osx_arm64"
            } else {
                "osx_64"
            }
        }
    };
    build.to_string()
}
