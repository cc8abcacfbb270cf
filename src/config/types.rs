// git-branch-archiver: Git branch export and backup tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration section types.
//!
//! ```text
//! [global]  log_level, log_file
//! [export]  include_tags, keep_temp, tmp_dir, archive_suffix
//! [git]     program
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ConfigError;
use crate::logging::LogLevel;

/// Default suffix appended to the output directory name for archives.
pub const DEFAULT_ARCHIVE_SUFFIX: &str = "_archive";

/// Global options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Console log level (0-5).
    pub log_level: LogLevel,
    /// Optional log file receiving debug output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

/// Export pipeline options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    /// Also export `refs/tags`.
    pub include_tags: bool,
    /// Keep the temporary mirror clone after the run.
    pub keep_temp: bool,
    /// Parent directory for temporary clones (system temp dir if unset).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tmp_dir: Option<PathBuf>,
    /// Suffix appended to the output directory name to form archive names.
    pub archive_suffix: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            include_tags: false,
            keep_temp: false,
            tmp_dir: None,
            archive_suffix: DEFAULT_ARCHIVE_SUFFIX.to_string(),
        }
    }
}

impl ExportConfig {
    /// Checks that `archive_suffix` forms a plain file name.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the suffix is empty or contains
    /// a path separator.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |message: &str| ConfigError::InvalidValue {
            section: "export".to_string(),
            key: "archive_suffix".to_string(),
            message: message.to_string(),
        };

        if self.archive_suffix.is_empty() {
            return Err(invalid("must not be empty"));
        }
        if self.archive_suffix.contains(['/', '\\']) {
            return Err(invalid("must not contain a path separator"));
        }
        Ok(())
    }
}

/// Git executable options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GitConfig {
    /// Git executable name or path.
    pub program: PathBuf,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from("git"),
        }
    }
}
