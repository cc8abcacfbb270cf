// git-branch-archiver: Git branch export and backup tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Repository resolution.
//!
//! ```text
//! source --(existing local repo)--> RepoHandle { temporary: false }
//!        --(anything else)--------> mkdtemp(git-archiver-*)
//!                                   git clone --mirror
//!                                   RepoHandle { temporary: true }
//! ```

use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::{debug, info};

use super::backend::GitClient;
use crate::error::{ArchiverResult, FsError};

/// Prefix of temporary clone directories.
pub const TEMP_PREFIX: &str = "git-archiver-";

/// A local repository the pipeline can read refs from.
///
/// A temporary handle owns its clone directory. The directory is removed by
/// [`RepoHandle::release`], or on drop if the handle is never released.
#[derive(Debug)]
pub struct RepoHandle {
    path: PathBuf,
    temp: Option<TempDir>,
}

impl RepoHandle {
    /// Handle for an existing repository that must never be removed.
    pub fn local(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            temp: None,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the repository is a temporary clone.
    #[must_use]
    pub const fn is_temporary(&self) -> bool {
        self.temp.is_some()
    }

    /// Finishes with the repository.
    ///
    /// Temporary clones are removed unless `keep` is set, in which case the
    /// retained path is returned. Local repositories are left untouched.
    ///
    /// # Errors
    ///
    /// Returns `FsError::CleanupFailed` if the temporary directory cannot be
    /// removed.
    pub fn release(self, keep: bool) -> ArchiverResult<Option<PathBuf>> {
        let Some(temp) = self.temp else {
            return Ok(None);
        };

        if keep {
            let kept = temp.keep();
            info!(path = %kept.display(), "keeping temporary clone");
            return Ok(Some(kept));
        }

        debug!(path = %self.path.display(), "removing temporary repo");
        temp.close().map_err(|source| FsError::CleanupFailed {
            path: self.path.display().to_string(),
            source,
        })?;
        Ok(None)
    }
}

/// Return a handle to a local repository to operate on.
///
/// An existing local repository is used in place. Anything else is treated
/// as a clone source and mirror-cloned into a fresh temporary directory under
/// `tmp_parent` (or the system temp dir). Existing paths are canonicalized
/// first, so a relative source resolves against the caller's working
/// directory rather than the clone's.
///
/// # Errors
///
/// Returns `GitError::CloneFailed` if the clone fails (the temporary
/// directory is removed), or an `FsError` if it cannot be created.
pub fn resolve<G: GitClient + ?Sized>(
    client: &G,
    source: &str,
    tmp_parent: Option<&Path>,
) -> ArchiverResult<RepoHandle> {
    let local = Path::new(source);
    let local = if local.exists() {
        Some(std::fs::canonicalize(local).map_err(|e| FsError::io(local, e))?)
    } else {
        None
    };

    if let Some(path) = local.as_deref()
        && client.is_repository(path)
    {
        info!(path = %path.display(), "using local repository");
        return Ok(RepoHandle::local(path));
    }

    let clone_source = local
        .as_deref()
        .map_or_else(|| source.to_string(), |p| p.display().to_string());

    let temp = create_temp_dir(tmp_parent)?;
    info!(path = %temp.path().display(), "cloning repository into temporary dir");
    client.mirror_clone(&clone_source, temp.path())?;

    Ok(RepoHandle {
        path: temp.path().to_path_buf(),
        temp: Some(temp),
    })
}

fn create_temp_dir(tmp_parent: Option<&Path>) -> ArchiverResult<TempDir> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(TEMP_PREFIX);

    let temp = match tmp_parent {
        Some(parent) => {
            std::fs::create_dir_all(parent).map_err(|e| FsError::io(parent, e))?;
            builder
                .tempdir_in(parent)
                .map_err(|e| FsError::io(parent, e))?
        }
        None => builder
            .tempdir()
            .map_err(|e| FsError::io(&std::env::temp_dir(), e))?,
    };
    Ok(temp)
}
