// git-branch-archiver: Git branch export and backup tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::error::{ArchiverResult, FsError};
use bon::Builder;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// Options for directory traversal.
///
/// Hidden files are always walked and ignore files never apply. Symbolic
/// links are reported, not followed.
#[derive(Debug, Clone, Default, Builder)]
pub struct WalkOptions {
    /// Skip these exact paths (and anything below them)
    #[builder(setters(name = with_skip_paths), default)]
    skip_paths: Vec<PathBuf>,
}

impl WalkOptions {
    /// Returns the skipped paths.
    #[must_use]
    pub fn skip_paths(&self) -> &[PathBuf] {
        &self.skip_paths
    }
}

/// Kind of a walked entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    Symlink,
}

/// A single entry below the walk root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkEntry {
    path: PathBuf,
    kind: EntryKind,
}

impl WalkEntry {
    /// Absolute (root-joined) path of the entry.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub const fn kind(&self) -> EntryKind {
        self.kind
    }
}

/// Result of a walk: every entry below the root, sorted depth-first by name.
#[derive(Debug, Default)]
pub struct WalkResult {
    entries: Vec<WalkEntry>,
}

impl WalkResult {
    /// All entries in walk order.
    #[must_use]
    pub fn entries(&self) -> &[WalkEntry] {
        &self.entries
    }

    /// Files (including symlinks) in walk order.
    pub fn files(&self) -> impl Iterator<Item = &Path> {
        self.entries
            .iter()
            .filter(|e| e.kind != EntryKind::Directory)
            .map(WalkEntry::path)
    }

    /// Directories in walk order.
    pub fn directories(&self) -> impl Iterator<Item = &Path> {
        self.entries
            .iter()
            .filter(|e| e.kind == EntryKind::Directory)
            .map(WalkEntry::path)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Walk `root` sequentially, returning a snapshot of everything below it.
///
/// The root itself is not included.
///
/// # Errors
///
/// Returns an `FsError` for the first entry that cannot be read.
pub fn walk(root: &Path, options: &WalkOptions) -> ArchiverResult<WalkResult> {
    let skip = options.skip_paths().to_vec();

    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .follow_links(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .filter_entry(move |entry| !skip.iter().any(|p| entry.path() == p.as_path()))
        .build();

    let mut entries = Vec::new();
    for result in walker {
        let entry = result.map_err(|e| FsError::IoError {
            path: root.display().to_string(),
            source: std::io::Error::other(e.to_string()),
        })?;

        if entry.depth() == 0 {
            continue;
        }

        let kind = match entry.file_type() {
            Some(ft) if ft.is_dir() => EntryKind::Directory,
            Some(ft) if ft.is_symlink() => EntryKind::Symlink,
            _ => EntryKind::File,
        };
        entries.push(WalkEntry {
            path: entry.into_path(),
            kind,
        });
    }

    Ok(WalkResult { entries })
}
