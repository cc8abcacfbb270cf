// git-branch-archiver: Git branch export and backup tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Shared test utilities.
//!
//! ```text
//! FakeGit       scripted GitClient (refs, trees, failures)
//! capture_logs  run a closure under a buffering subscriber
//! run_git       real git helper for backend tests
//! ```

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::{Arc, Mutex};

use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;

use crate::error::{ArchiverResult, GitError};
use crate::git::backend::GitClient;

// --- FakeGit ---

/// In-memory `GitClient` with scripted refs and trees.
///
/// `list_refs` returns refs in insertion order, filtered by namespace.
#[derive(Debug, Default)]
pub(crate) struct FakeGit {
    refs: Vec<String>,
    trees: BTreeMap<String, Vec<(String, Vec<u8>)>>,
    failing_exports: BTreeSet<String>,
    fail_ref_query: bool,
    fail_clone: bool,
    clones: RefCell<Vec<(String, PathBuf)>>,
    archived: RefCell<Vec<String>>,
}

impl FakeGit {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Adds a ref whose tree holds `files` (path, contents).
    pub(crate) fn with_ref(mut self, full_name: &str, files: &[(&str, &str)]) -> Self {
        self.refs.push(full_name.to_string());
        self.trees.insert(
            full_name.to_string(),
            files
                .iter()
                .map(|(path, data)| ((*path).to_string(), data.as_bytes().to_vec()))
                .collect(),
        );
        self
    }

    /// Makes `archive_tree` fail for `full_name`.
    pub(crate) fn with_failing_export(mut self, full_name: &str) -> Self {
        self.failing_exports.insert(full_name.to_string());
        self
    }

    pub(crate) fn with_ref_query_failure(mut self) -> Self {
        self.fail_ref_query = true;
        self
    }

    pub(crate) fn with_clone_failure(mut self) -> Self {
        self.fail_clone = true;
        self
    }

    /// `(source, dest)` of every mirror clone requested so far.
    pub(crate) fn clones(&self) -> Vec<(String, PathBuf)> {
        self.clones.borrow().clone()
    }

    /// Ref names passed to `archive_tree`, in call order.
    pub(crate) fn archived(&self) -> Vec<String> {
        self.archived.borrow().clone()
    }
}

impl GitClient for FakeGit {
    fn is_repository(&self, path: &Path) -> bool {
        path.join(".git").exists()
    }

    fn mirror_clone(&self, source: &str, dest: &Path) -> ArchiverResult<()> {
        self.clones
            .borrow_mut()
            .push((source.to_string(), dest.to_path_buf()));
        if self.fail_clone {
            return Err(GitError::CloneFailed {
                url: source.to_string(),
                message: "repository not found".to_string(),
            }
            .into());
        }
        std::fs::write(dest.join("HEAD"), "ref: refs/heads/main\n")?;
        Ok(())
    }

    fn list_refs(&self, repo: &Path, namespaces: &[&str]) -> ArchiverResult<Vec<String>> {
        if self.fail_ref_query {
            return Err(GitError::RefQueryFailed {
                repo: repo.display().to_string(),
                message: "not a git repository".to_string(),
            }
            .into());
        }
        Ok(self
            .refs
            .iter()
            .filter(|full| {
                namespaces
                    .iter()
                    .any(|ns| full.strip_prefix(ns).is_some_and(|rest| rest.starts_with('/')))
            })
            .cloned()
            .collect())
    }

    fn archive_tree(&self, _repo: &Path, refname: &str) -> ArchiverResult<Vec<u8>> {
        self.archived.borrow_mut().push(refname.to_string());
        if self.failing_exports.contains(refname) {
            return Err(GitError::CommandFailed {
                command: format!("git archive --format=tar {refname}"),
                message: format!("fatal: not a valid object name: '{refname}'"),
            }
            .into());
        }
        let files = self.trees.get(refname).map(Vec::as_slice).unwrap_or_default();
        Ok(tar_bytes(files)?)
    }
}

/// Builds a tar stream like `git archive`: parent directories first, then files.
pub(crate) fn tar_bytes(files: &[(String, Vec<u8>)]) -> std::io::Result<Vec<u8>> {
    let mut builder = tar::Builder::new(Vec::new());
    let mut dirs = BTreeSet::new();

    for (path, data) in files {
        let mut parent = Path::new(path).parent();
        let mut chain = Vec::new();
        while let Some(dir) = parent.filter(|p| !p.as_os_str().is_empty()) {
            chain.push(dir.to_path_buf());
            parent = dir.parent();
        }
        for dir in chain.into_iter().rev() {
            if dirs.insert(dir.clone()) {
                let mut header = tar::Header::new_ustar();
                header.set_entry_type(tar::EntryType::Directory);
                header.set_mode(0o755);
                header.set_size(0);
                header.set_cksum();
                builder.append_data(&mut header, &dir, std::io::empty())?;
            }
        }

        let mut header = tar::Header::new_ustar();
        header.set_mode(0o644);
        header.set_size(data.len() as u64);
        header.set_cksum();
        builder.append_data(&mut header, path, data.as_slice())?;
    }

    builder.into_inner()
}

// --- Log capture ---

#[derive(Clone)]
struct BufferWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl Write for BufferWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer
            .lock()
            .map_err(|_| std::io::Error::other("buffer poisoned"))?
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[derive(Clone)]
struct BufferMakeWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl<'a> MakeWriter<'a> for BufferMakeWriter {
    type Writer = BufferWriter;

    fn make_writer(&'a self) -> Self::Writer {
        BufferWriter {
            buffer: self.buffer.clone(),
        }
    }
}

/// Runs `f` while capturing tracing output at WARN and above.
///
/// Returns the closure's value and the captured log text.
pub(crate) fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let buffer = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::fmt::Subscriber::builder()
        .with_writer(BufferMakeWriter {
            buffer: buffer.clone(),
        })
        .with_max_level(Level::WARN)
        .with_ansi(false)
        .with_target(false)
        .without_time()
        .finish();

    let value = tracing::subscriber::with_default(subscriber, f);

    let logs = buffer
        .lock()
        .map(|guard| String::from_utf8_lossy(&guard).to_string())
        .unwrap_or_default();
    (value, logs)
}

// --- Real git helpers ---

/// Runs git in `cwd` with a fixed identity, panicking on failure.
pub(crate) fn run_git(args: &[&str], cwd: &Path) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(cwd)
        .env("GIT_AUTHOR_NAME", "Test")
        .env("GIT_AUTHOR_EMAIL", "test@example.com")
        .env("GIT_COMMITTER_NAME", "Test")
        .env("GIT_COMMITTER_EMAIL", "test@example.com")
        .env("GIT_CONFIG_NOSYSTEM", "1")
        .output()
        .expect("failed to run git");
    assert!(
        output.status.success(),
        "git {} failed: {}",
        args.join(" "),
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Initializes a repository on branch `main` with one commit of `files`.
pub(crate) fn init_repo_with_files(path: &Path, files: &[(&str, &str)]) {
    run_git(&["init", "--quiet"], path);
    run_git(&["symbolic-ref", "HEAD", "refs/heads/main"], path);
    for (name, contents) in files {
        let file = path.join(name);
        if let Some(parent) = file.parent() {
            std::fs::create_dir_all(parent).expect("failed to create parent dir");
        }
        std::fs::write(&file, contents).expect("failed to write file");
    }
    run_git(&["add", "--all"], path);
    run_git(
        &["-c", "commit.gpgsign=false", "commit", "--quiet", "-m", "Initial commit"],
        path,
    );
}
