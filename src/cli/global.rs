// git-branch-archiver: Git branch export and backup tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Options that tune the environment rather than the archive run.
//!
//! # Option Precedence
//!
//! ```text
//! --config FILE   ← additional config files (can repeat)
//! --log-file FILE ← global.log_file override
//! --git PATH      ← git.program override
//!
//! Precedence: CLI flags > env > --config > ./git-branch-archiver.toml > defaults
//! ```

use clap::Args;
use std::path::PathBuf;

/// Environment options.
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalOptions {
    /// Additional TOML configuration file(s), loaded in order.
    #[arg(short = 'c', long = "config", value_name = "FILE", action = clap::ArgAction::Append)]
    pub config: Vec<PathBuf>,

    /// Path to a log file receiving debug output.
    #[arg(long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Git executable to use.
    #[arg(long = "git", value_name = "PATH")]
    pub git: Option<PathBuf>,
}

impl GlobalOptions {
    /// Converts the options to `(key, value)` config overrides.
    #[must_use]
    pub fn to_config_overrides(&self) -> Vec<(&'static str, String)> {
        let mut overrides = Vec::new();

        if let Some(ref path) = self.log_file {
            overrides.push(("global.log_file", path.display().to_string()));
        }

        if let Some(ref git) = self.git {
            overrides.push(("git.program", git.display().to_string()));
        }

        overrides
    }
}
