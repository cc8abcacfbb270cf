// git-branch-archiver: Git branch export and backup tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Archive command: resolve, enumerate, export, bundle, release.
//!
//! ```text
//! run_archive
//!   out_dir      create + canonicalize
//!   resolve      local repo | temp mirror clone   (fatal)
//!   list_refs    branches [+ tags]                (fatal)
//!   export_ref   one dir per ref                  (per-ref, logged)
//!                colliding dir names are skipped  (warned)
//!   bundle       <out>/<name><suffix>.{zip,tar}   (fatal)
//!   release      remove temp clone unless kept    (always, non-fatal)
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use bon::Builder;
use tracing::{debug, error, info, warn};

use crate::archive::{ArchivePair, archive_paths, bundle};
use crate::cli::Cli;
use crate::config::Config;
use crate::error::Result;
use crate::git::backend::{GitClient, ShellBackend};
use crate::git::export::{export_ref, sanitize};
use crate::git::refs::list_refs;
use crate::git::resolve::{RepoHandle, resolve};


/// Inputs of a single archive run.
#[derive(Debug, Clone, Builder)]
pub struct ArchiveOptions {
    /// Local repository path or clone URL.
    #[builder(setters(name = with_repo), into)]
    repo: String,
    /// Output directory receiving exports and archives.
    #[builder(setters(name = with_out_dir), into)]
    out_dir: PathBuf,
    #[builder(setters(name = with_include_tags), default = false)]
    include_tags: bool,
    /// Parent for the temporary clone.
    #[builder(setters(name = with_tmp_dir))]
    tmp_dir: Option<PathBuf>,
    #[builder(setters(name = with_keep_temp), default = false)]
    keep_temp: bool,
    #[builder(
        setters(name = with_archive_suffix),
        into,
        default = crate::config::types::DEFAULT_ARCHIVE_SUFFIX.to_string()
    )]
    archive_suffix: String,
}

impl ArchiveOptions {
    #[must_use]
    pub fn repo(&self) -> &str {
        &self.repo
    }

    #[must_use]
    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    #[must_use]
    pub const fn include_tags(&self) -> bool {
        self.include_tags
    }

    #[must_use]
    pub fn tmp_dir(&self) -> Option<&Path> {
        self.tmp_dir.as_deref()
    }

    #[must_use]
    pub const fn keep_temp(&self) -> bool {
        self.keep_temp
    }

    #[must_use]
    pub fn archive_suffix(&self) -> &str {
        &self.archive_suffix
    }
}

/// A ref whose export failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFailure {
    pub ref_name: String,
    pub message: String,
}

/// Outcome of the export phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSummary {
    /// Short names of exported refs, in export order.
    pub exported: Vec<String>,
    pub failed: Vec<ExportFailure>,
}

impl ExportSummary {
    #[must_use]
    pub fn total(&self) -> usize {
        self.exported.len() + self.failed.len()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveReport {
    pub archives: ArchivePair,
    pub summary: ExportSummary,
    /// Retained temporary clone, when `keep_temp` was set.
    pub kept_clone: Option<PathBuf>,
}

/// Run the full pipeline against `client`.
///
/// The repository handle is released whenever resolution succeeded, even if
/// a later step fails. Per-ref export failures are logged and collected in
/// the report; they do not fail the run.
///
/// # Errors
///
/// Returns an error if the output directory cannot be created, the
/// repository cannot be resolved, refs cannot be listed, or bundling fails.
pub fn run_archive<G: GitClient + ?Sized>(
    client: &G,
    options: &ArchiveOptions,
) -> Result<ArchiveReport> {
    let out_dir = prepare_out_dir(options.out_dir())?;

    let handle = resolve(client, options.repo(), options.tmp_dir())
        .with_context(|| format!("failed to resolve repository '{}'", options.repo()))?;

    let outcome = export_and_bundle(client, &handle, &out_dir, options);

    let kept_clone = match handle.release(options.keep_temp()) {
        Ok(kept) => kept,
        Err(e) => {
            error!(error = %e, "cleanup failed");
            None
        }
    };

    let (archives, summary) = outcome?;
    Ok(ArchiveReport {
        archives,
        summary,
        kept_clone,
    })
}

fn prepare_out_dir(out_dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create output directory '{}'", out_dir.display()))?;
    std::fs::canonicalize(out_dir)
        .with_context(|| format!("failed to resolve output directory '{}'", out_dir.display()))
}

/// Archive base path: `<out>/<out-name><suffix>`.
fn archive_base(out_dir: &Path, suffix: &str) -> Result<PathBuf> {
    let name = out_dir
        .file_name()
        .with_context(|| format!("output directory '{}' has no name", out_dir.display()))?;
    Ok(out_dir.join(format!("{}{suffix}", name.to_string_lossy())))
}

/// Export directory names that are already taken: the two archive files.
fn reserved_names(pair: &ArchivePair) -> HashMap<String, String> {
    [&pair.zip, &pair.tar]
        .into_iter()
        .filter_map(|path| path.file_name())
        .map(|name| {
            let name = name.to_string_lossy().into_owned();
            let owner = format!("archive '{name}'");
            (name, owner)
        })
        .collect()
}

fn export_and_bundle<G: GitClient + ?Sized>(
    client: &G,
    handle: &RepoHandle,
    out_dir: &Path,
    options: &ArchiveOptions,
) -> Result<(ArchivePair, ExportSummary)> {
    let refs = list_refs(client, handle.path(), options.include_tags())
        .context("failed to enumerate refs")?;
    if refs.is_empty() {
        warn!(repo = %handle.path().display(), "no refs found");
    }

    let base = archive_base(out_dir, options.archive_suffix())?;
    let pair = archive_paths(&base)?;
    let mut claimed = reserved_names(&pair);

    let mut summary = ExportSummary::default();
    for reference in &refs {
        let dir_name = sanitize(reference.short_name());
        if let Some(owner) = claimed.get(&dir_name) {
            warn!(
                ref_name = %reference.short_name(),
                dir = %dir_name,
                owner = %owner,
                "export directory collision, skipping ref"
            );
            summary.failed.push(ExportFailure {
                ref_name: reference.short_name().to_string(),
                message: format!("export directory '{dir_name}' is already used by {owner}"),
            });
            continue;
        }
        claimed.insert(dir_name, format!("ref '{}'", reference.short_name()));

        match export_ref(client, handle.path(), reference, out_dir) {
            Ok(_) => summary.exported.push(reference.short_name().to_string()),
            Err(e) => {
                error!(ref_name = %reference.short_name(), error = %e, "export failed");
                summary.failed.push(ExportFailure {
                    ref_name: reference.short_name().to_string(),
                    message: e.to_string(),
                });
            }
        }
    }

    info!(
        "exported {} of {} refs",
        summary.exported.len(),
        summary.total()
    );
    for failure in &summary.failed {
        warn!(ref_name = %failure.ref_name, "not exported");
    }

    let archives = bundle(out_dir, &base).context("failed to bundle archives")?;
    Ok((archives, summary))
}

/// Handler for the command line: builds options from `cli` and `config`,
/// runs against the git executable, and prints the archive paths.
///
/// # Errors
///
/// Returns an error if git cannot be located or the run fails.
pub fn run_archive_command(cli: &Cli, config: &Config) -> Result<()> {
    for line in config.format_options() {
        debug!("{line}");
    }

    let client = ShellBackend::locate(&config.git.program)?;

    let options = ArchiveOptions::builder()
        .with_repo(cli.repo.clone())
        .with_out_dir(cli.out.clone())
        .with_include_tags(config.export.include_tags)
        .maybe_with_tmp_dir(config.export.tmp_dir.clone())
        .with_keep_temp(config.export.keep_temp)
        .with_archive_suffix(config.export.archive_suffix.clone())
        .build();

    let report = run_archive(&client, &options)?;

    println!("Created archives:");
    println!(" - {}", report.archives.zip.display());
    println!(" - {}", report.archives.tar.display());
    Ok(())
}
