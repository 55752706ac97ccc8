// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Git branch introspection for raw download links.
///
/// The probe is advisory: any failure is logged and the caller falls back to
/// the default branch.
use std::{path::Path, process::Command};

use tracing::{debug, warn};

/// Determines the currently checked out branch of the repository at `workdir`.
///
/// Returns `None` and logs a warning when git is unavailable, the directory
/// is not a repository, or `HEAD` is detached.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
///
/// use scriptsmith::current_branch;
///
/// if let Some(branch) = current_branch(Path::new(".")) {
///     println!("building from {branch}");
/// }
/// ```
pub fn current_branch(workdir: &Path,) -> Option<String,>
{
    let output = match Command::new("git",)
        .args(["branch", "--show-current"],)
        .current_dir(workdir,)
        .output()
    {
        Ok(output,) => output,
        Err(error,) => {
            warn!("Failed to get current git branch: {error}");
            return None;
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr,);
        warn!("Failed to get current git branch: {}", stderr.trim());
        return None;
    }

    parse_branch_output(&output.stdout,)
}

fn parse_branch_output(stdout: &[u8],) -> Option<String,>
{
    let branch = String::from_utf8_lossy(stdout,).trim().to_string();
    if branch.is_empty() {
        warn!("Failed to get current git branch: HEAD is detached");
        None
    } else {
        debug!("Current git branch is {branch}");
        Some(branch,)
    }
}
