// git-branch-archiver: Git branch export and backup tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git backend abstraction layer.
//!
//! ```text
//! GitClient --> ShellBackend (git CLI, gix for is_repository)
//!           --> FakeGit      (tests, scripted refs and trees)
//! ```

use crate::error::{ArchiverResult, GitError, ProcessError};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tracing::{debug, trace};

/// The version-control operations the archiver depends on.
///
/// Implementors block until the underlying operation finishes.
pub trait GitClient {
    /// Check if `path` holds repository metadata (work tree or bare).
    fn is_repository(&self, path: &Path) -> bool;

    /// Mirror-clone `source` into the existing, empty directory `dest`.
    ///
    /// # Errors
    ///
    /// Returns `GitError::CloneFailed` if the clone does not succeed.
    fn mirror_clone(&self, source: &str, dest: &Path) -> ArchiverResult<()>;

    /// List full ref names under the given namespaces (e.g. `refs/heads`).
    ///
    /// # Errors
    ///
    /// Returns `GitError::RefQueryFailed` if the query does not succeed.
    fn list_refs(&self, repo: &Path, namespaces: &[&str]) -> ArchiverResult<Vec<String>>;

    /// Produce an uncompressed tar stream of the tree at `refname`.
    ///
    /// # Errors
    ///
    /// Returns `GitError::CommandFailed` if the archive cannot be produced.
    fn archive_tree(&self, repo: &Path, refname: &str) -> ArchiverResult<Vec<u8>>;
}

// --- ShellBackend Implementation (Git CLI) ---

/// Shell-based git backend using the git CLI.
#[derive(Debug, Clone)]
pub struct ShellBackend {
    program: PathBuf,
}

impl Default for ShellBackend {
    fn default() -> Self {
        Self::new("git")
    }
}

impl ShellBackend {
    /// Backend invoking `program` without checking it exists.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Backend for `program`, resolved through `PATH`.
    ///
    /// # Errors
    ///
    /// Returns `ProcessError::ExecutableNotFound` if `program` cannot be found.
    pub fn locate(program: &Path) -> ArchiverResult<Self> {
        let resolved = which::which(program).map_err(|_| ProcessError::ExecutableNotFound {
            name: program.display().to_string(),
        })?;
        debug!(git = %resolved.display(), "using git executable");
        Ok(Self::new(resolved))
    }

    /// Path of the git executable.
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    fn command_line(&self, args: &[&str]) -> String {
        format!("{} {}", self.program.display(), args.join(" "))
    }

    /// Execute a git command. Sets `GCM_INTERACTIVE=never` and `GIT_TERMINAL_PROMPT=0`.
    ///
    /// Only spawn failures are errors here; callers map the exit status to
    /// their own failure kind.
    fn output(&self, args: &[&str], cwd: &Path) -> ArchiverResult<Output> {
        let cmd_line = self.command_line(args);
        debug!(cmd = %cmd_line, cwd = %cwd.display(), "exec");

        let output = Command::new(&self.program)
            .args(args)
            .current_dir(cwd)
            .env("GCM_INTERACTIVE", "never")
            .env("GIT_TERMINAL_PROMPT", "0")
            .output()
            .map_err(|source| ProcessError::SpawnFailed {
                command: cmd_line.clone(),
                source,
            })?;

        trace!(cmd = %cmd_line, status = %output.status, "exited");
        Ok(output)
    }
}

/// Best description of a failed command: trimmed stderr, else the exit status.
fn failure_message(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    if stderr.is_empty() {
        format!("exited with {}", output.status)
    } else {
        stderr
    }
}

impl GitClient for ShellBackend {
    fn is_repository(&self, path: &Path) -> bool {
        path.join(".git").exists() || gix::open(path).is_ok()
    }

    fn mirror_clone(&self, source: &str, dest: &Path) -> ArchiverResult<()> {
        let dest_str = dest.to_str().ok_or_else(|| GitError::CloneFailed {
            url: source.to_string(),
            message: "invalid destination path".to_string(),
        })?;

        let parent = dest.parent().unwrap_or_else(|| Path::new("."));
        let output = self.output(&["clone", "--mirror", "--quiet", source, dest_str], parent)?;
        if !output.status.success() {
            return Err(GitError::CloneFailed {
                url: source.to_string(),
                message: failure_message(&output),
            }
            .into());
        }
        Ok(())
    }

    fn list_refs(&self, repo: &Path, namespaces: &[&str]) -> ArchiverResult<Vec<String>> {
        let mut args = vec!["for-each-ref", "--format=%(refname)"];
        args.extend_from_slice(namespaces);

        let output = self.output(&args, repo)?;
        if !output.status.success() {
            return Err(GitError::RefQueryFailed {
                repo: repo.display().to_string(),
                message: failure_message(&output),
            }
            .into());
        }

        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect())
    }

    fn archive_tree(&self, repo: &Path, refname: &str) -> ArchiverResult<Vec<u8>> {
        let args = ["archive", "--format=tar", refname];
        let output = self.output(&args, repo)?;
        if !output.status.success() {
            return Err(GitError::CommandFailed {
                command: self.command_line(&args),
                message: failure_message(&output),
            }
            .into());
        }
        Ok(output.stdout)
    }
}
