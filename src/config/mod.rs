// git-branch-archiver: Git branch export and backup tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults
//! 2. git-branch-archiver.toml (cwd, optional)
//! 3. --config FILE
//! 4. GIT_BRANCH_ARCHIVER_* env vars
//! 5. CLI flags
//! ```
//!
//! # Environment Variable Mapping
//!
//! ```text
//! GIT_BRANCH_ARCHIVER_EXPORT__INCLUDE_TAGS=true → export.include_tags = true
//! GIT_BRANCH_ARCHIVER_GIT__PROGRAM=/usr/bin/git → git.program = "/usr/bin/git"
//! ```

pub mod loader;
pub mod types;


use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{ArchiverResult, Result};

use loader::ConfigLoader;
use types::{ExportConfig, GitConfig, GlobalConfig};

/// Default config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "git-branch-archiver.toml";

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "GIT_BRANCH_ARCHIVER";

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Global options.
    pub global: GlobalConfig,
    /// Export pipeline options.
    pub export: ExportConfig,
    /// Git executable options.
    pub git: GitConfig,
}

impl Config {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use git_branch_archiver::config::Config;
    ///
    /// let config = Config::builder()
    ///     .add_toml_file_optional("git-branch-archiver.toml")
    ///     .with_env_prefix("GIT_BRANCH_ARCHIVER")
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load configuration from a single TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid TOML, or
    /// does not match the `Config` structure.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::builder().add_toml_file(path).build()
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or does not match the
    /// `Config` structure.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// Validate values that serde cannot check on its own.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` for an unusable archive suffix.
    pub fn validate(&self) -> ArchiverResult<()> {
        self.export.validate()?;
        Ok(())
    }

    /// Format configuration options for display, one `key = value` per line.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let fmt = |p: Option<&Path>| p.map_or_else(String::new, |p| p.display().to_string());

        let mut options = BTreeMap::new();
        options.insert("global.log_level", self.global.log_level.as_u8().to_string());
        options.insert("global.log_file", fmt(self.global.log_file.as_deref()));
        options.insert("export.include_tags", self.export.include_tags.to_string());
        options.insert("export.keep_temp", self.export.keep_temp.to_string());
        options.insert("export.tmp_dir", fmt(self.export.tmp_dir.as_deref()));
        options.insert("export.archive_suffix", self.export.archive_suffix.clone());
        options.insert("git.program", self.git.program.display().to_string());

        let max_key_len = options.keys().map(|k| k.len()).max().unwrap_or(0);

        options
            .into_iter()
            .map(|(key, value)| format!("{key:<max_key_len$} = {value}"))
            .collect()
    }
}
