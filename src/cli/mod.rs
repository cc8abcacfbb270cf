// git-branch-archiver: Git branch export and backup tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module using clap derive.
//!
//! # Usage
//!
//! ```text
//! git-branch-archiver -r <PATH|URL> -o <DIR> [--include-tags] [--tmp DIR]
//!                     [--keep-temp] [-v] [-c FILE]... [--log-file FILE] [--git PATH]
//! ```

pub mod global;


use crate::cli::global::GlobalOptions;
use clap::Parser;
use std::path::PathBuf;

/// Export every branch of a git repository and bundle the result.
#[derive(Debug, Parser)]
#[command(
    name = "git-branch-archiver",
    author,
    version,
    about = "Export every branch (and optionally tag) of a git repository into zip and tar archives",
    long_about = "git-branch-archiver Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Exports the tree of every branch (and optionally every tag) of a\n\
                  repository into its own directory under --out, then bundles the\n\
                  output directory into <name>_archive.zip and <name>_archive.tar.\n\
                  Remote sources are mirror-cloned into a temporary directory that\n\
                  is removed afterwards unless --keep-temp is given.",
    after_help = "CONFIG FILES:\n\n\
                  git-branch-archiver.toml in the current directory is loaded if\n\
                  present, followed by every --config file. Environment variables\n\
                  prefixed with GIT_BRANCH_ARCHIVER_ override file values, using\n\
                  '__' between section and key (GIT_BRANCH_ARCHIVER_EXPORT__KEEP_TEMP).\n\
                  Command-line flags take precedence over everything."
)]
pub struct Cli {
    /// Local repository path or clone URL.
    #[arg(short = 'r', long = "repo", value_name = "PATH|URL")]
    pub repo: String,

    /// Output directory for exports and archives.
    #[arg(short = 'o', long = "out", value_name = "DIR")]
    pub out: PathBuf,

    /// Also export tags.
    #[arg(long = "include-tags")]
    pub include_tags: bool,

    /// Parent directory for the temporary clone.
    #[arg(long = "tmp", value_name = "DIR")]
    pub tmp: Option<PathBuf>,

    /// Keep the temporary clone after the run.
    #[arg(long = "keep-temp")]
    pub keep_temp: bool,

    /// Enable debug logging.
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Environment options
    #[command(flatten)]
    pub global: GlobalOptions,
}

impl Cli {
    /// Converts flags that were given to `(key, value)` config overrides.
    ///
    /// Unset boolean flags produce no override, so config files and the
    /// environment can still enable them.
    #[must_use]
    pub fn to_config_overrides(&self) -> Vec<(&'static str, String)> {
        let mut overrides = self.global.to_config_overrides();

        if self.include_tags {
            overrides.push(("export.include_tags", "true".to_string()));
        }

        if self.keep_temp {
            overrides.push(("export.keep_temp", "true".to_string()));
        }

        if let Some(ref tmp) = self.tmp {
            overrides.push(("export.tmp_dir", tmp.display().to_string()));
        }

        overrides
    }
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}
