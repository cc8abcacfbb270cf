// git-branch-archiver: Git branch export and backup tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Single-ref export.
//!
//! ```text
//! git archive --format=tar <full_ref> --> tar::Archive::unpack(dest_root/<sanitized>)
//! ```
//!
//! No work tree is checked out.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::backend::GitClient;
use super::refs::RefDescriptor;
use crate::error::{ArchiverResult, GitError};

/// Replacement for path separators in directory names.
pub const SEPARATOR_REPLACEMENT: &str = "__";

/// Flatten a short ref name into a single directory name.
///
/// ```
/// use git_branch_archiver::git::export::sanitize;
///
/// assert_eq!(sanitize("origin/feature/x"), "origin__feature__x");
/// ```
#[must_use]
pub fn sanitize(short_name: &str) -> String {
    short_name.replace(['/', '\\'], SEPARATOR_REPLACEMENT)
}

/// Export directory of `reference` under `dest_root`.
#[must_use]
pub fn export_dir(dest_root: &Path, reference: &RefDescriptor) -> PathBuf {
    dest_root.join(sanitize(reference.short_name()))
}

/// Extract the tree of `reference` into its directory under `dest_root`.
///
/// Existing files are overwritten. Returns the export directory.
///
/// # Errors
///
/// Every failure is reported as `GitError::ExportFailed` naming the ref.
pub fn export_ref<G: GitClient + ?Sized>(
    client: &G,
    repo: &Path,
    reference: &RefDescriptor,
    dest_root: &Path,
) -> ArchiverResult<PathBuf> {
    let dest = export_dir(dest_root, reference);
    info!(ref_name = %reference.short_name(), dest = %dest.display(), "exporting");

    extract_tree(client, repo, reference, &dest).map_err(|e| GitError::ExportFailed {
        ref_name: reference.short_name().to_string(),
        message: e.to_string(),
    })?;
    Ok(dest)
}

fn extract_tree<G: GitClient + ?Sized>(
    client: &G,
    repo: &Path,
    reference: &RefDescriptor,
    dest: &Path,
) -> ArchiverResult<()> {
    std::fs::create_dir_all(dest)?;

    let data = client.archive_tree(repo, reference.full_name())?;
    debug!(ref_name = %reference.short_name(), bytes = data.len(), "received tree archive");

    let mut archive = tar::Archive::new(Cursor::new(data));
    archive.set_overwrite(true);
    archive.unpack(dest)?;
    Ok(())
}
