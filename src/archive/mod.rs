// git-branch-archiver: Git branch export and backup tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Bundling of an export directory into zip and tar archives.
//!
//! ```text
//! bundle(source_dir, base_name)
//!   1. archive_paths    base_name + ".zip" / ".tar"
//!   2. walk             snapshot of source_dir, archive paths excluded
//!   3. write_zip        Deflate, dirs + files + symlinks
//!   4. write_tar        uncompressed, mode/mtime from source
//! ```
//!
//! Both archives are built from the same snapshot, so entries are identical
//! and a previous run's archives inside `source_dir` are never nested.

use crate::error::{ArchiveError, ArchiverResult, FsError};
use crate::utility::fs::walk::{EntryKind, WalkEntry, WalkOptions, walk};
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};


/// Paths of the two archives produced by [`bundle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchivePair {
    pub zip: PathBuf,
    pub tar: PathBuf,
}

/// An entry to archive, with its name inside the archive.
struct Member<'a> {
    entry: &'a WalkEntry,
    name: String,
}

/// Derive `<base>.zip` and `<base>.tar` from a base path.
///
/// The extension is appended, never substituted, so `out/repo_archive`
/// and `out/v1.0_archive` keep their full stem.
///
/// # Errors
///
/// Returns `ArchiveError::InvalidBaseName` when `base_name` has no file name
/// component (e.g. `/` or `..`).
pub fn archive_paths(base_name: &Path) -> ArchiverResult<ArchivePair> {
    if base_name.file_name().is_none() {
        return Err(ArchiveError::InvalidBaseName(base_name.display().to_string()).into());
    }

    let with_ext = |ext: &str| {
        let mut path: OsString = base_name.as_os_str().to_owned();
        path.push(ext);
        PathBuf::from(path)
    };

    Ok(ArchivePair {
        zip: with_ext(".zip"),
        tar: with_ext(".tar"),
    })
}

/// Bundle the contents of `source_dir` into `<base_name>.zip` and
/// `<base_name>.tar`, overwriting existing archives.
///
/// # Errors
///
/// Returns an error if the directory cannot be walked or either archive
/// cannot be written.
pub fn bundle(source_dir: &Path, base_name: &Path) -> ArchiverResult<ArchivePair> {
    let pair = archive_paths(base_name)?;

    if let Some(parent) = pair.zip.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| FsError::io(parent, e))?;
    }

    let options = WalkOptions::builder()
        .with_skip_paths(excluded_paths(source_dir, &pair))
        .build();
    let snapshot = walk(source_dir, &options)?;

    let members: Vec<Member<'_>> = snapshot
        .entries()
        .iter()
        .filter_map(|entry| {
            archive_name(source_dir, entry.path()).map(|name| Member { entry, name })
        })
        .collect();

    debug!(
        source = %source_dir.display(),
        entries = members.len(),
        "bundling directory"
    );

    write_zip(&pair.zip, &members)?;
    info!(path = %pair.zip.display(), "wrote zip archive");

    write_tar(&pair.tar, &members)?;
    info!(path = %pair.tar.display(), "wrote tar archive");

    Ok(pair)
}

/// Archive paths that would appear inside `source_dir`, expressed relative
/// to `source_dir` so they match walked entry paths.
fn excluded_paths(source_dir: &Path, pair: &ArchivePair) -> Vec<PathBuf> {
    let Ok(source) = fs::canonicalize(source_dir) else {
        return Vec::new();
    };

    [&pair.zip, &pair.tar]
        .into_iter()
        .filter_map(|archive| {
            let file_name = archive.file_name()?;
            let parent = match archive.parent() {
                Some(p) if !p.as_os_str().is_empty() => fs::canonicalize(p).ok()?,
                _ => std::env::current_dir().ok()?,
            };
            let relative = parent.strip_prefix(&source).ok()?;
            Some(source_dir.join(relative).join(file_name))
        })
        .collect()
}

/// Forward-slash name of `path` relative to `root`.
fn archive_name(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<_> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

fn write_zip(path: &Path, members: &[Member<'_>]) -> ArchiverResult<()> {
    let zip_err = |source: zip::result::ZipError| ArchiveError::Zip {
        path: path.display().to_string(),
        source,
    };
    let io_err = |e: io::Error| zip_err(zip::result::ZipError::Io(e));

    let file = File::create(path).map_err(io_err)?;
    let mut writer = ZipWriter::new(BufWriter::new(file));
    let base = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for member in members {
        let source = member.entry.path();
        match member.entry.kind() {
            EntryKind::Directory => {
                writer
                    .add_directory(format!("{}/", member.name), base)
                    .map_err(zip_err)?;
            }
            EntryKind::Symlink => {
                let target = fs::read_link(source).map_err(io_err)?;
                writer
                    .add_symlink(
                        member.name.clone(),
                        target.to_string_lossy().into_owned(),
                        base,
                    )
                    .map_err(zip_err)?;
            }
            EntryKind::File => {
                let metadata = fs::metadata(source).map_err(io_err)?;
                let options = file_options(base, &metadata);
                writer
                    .start_file(member.name.clone(), options)
                    .map_err(zip_err)?;
                let mut input = File::open(source).map_err(io_err)?;
                io::copy(&mut input, &mut writer).map_err(io_err)?;
            }
        }
    }

    let mut inner = writer.finish().map_err(zip_err)?;
    inner.flush().map_err(io_err)?;
    Ok(())
}

fn file_options(base: SimpleFileOptions, metadata: &fs::Metadata) -> SimpleFileOptions {
    let options = base.large_file(metadata.len() >= u64::from(u32::MAX));

    #[cfg(unix)]
    let options = {
        use std::os::unix::fs::PermissionsExt;
        options.unix_permissions(metadata.permissions().mode())
    };

    options
}

fn write_tar(path: &Path, members: &[Member<'_>]) -> ArchiverResult<()> {
    let tar_err = |source: io::Error| ArchiveError::Tar {
        path: path.display().to_string(),
        source,
    };

    let file = File::create(path).map_err(tar_err)?;
    let mut builder = tar::Builder::new(BufWriter::new(file));
    builder.follow_symlinks(false);

    for member in members {
        let source = member.entry.path();
        let appended = match member.entry.kind() {
            EntryKind::Directory => builder.append_dir(&member.name, source),
            EntryKind::File | EntryKind::Symlink => {
                builder.append_path_with_name(source, &member.name)
            }
        };
        appended.map_err(tar_err)?;
    }

    let mut inner = builder.into_inner().map_err(tar_err)?;
    inner.flush().map_err(tar_err)?;
    Ok(())
}
