// git-branch-archiver: Git branch export and backup tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!          ArchiverError (~24 bytes)
//!                  |
//!   +------+-------+-------+------+------+
//!   |      |       |       |      |      |
//!   v      v       v       v      v      v
//!  Git  Archive  Config  Proc    Fs    Io
//!  Box    Box     Box     Box    Box   Box
//!
//! Sub-errors (unboxed internally):
//!   Git      CloneFailed, RefQueryFailed, ExportFailed, CommandFailed
//!   Archive  Zip, Tar, InvalidBaseName
//!   Config   ParseError, InvalidValue
//!   Process  ExecutableNotFound, SpawnFailed
//!   Fs       CleanupFailed, IoError
//! ```
//!
//! Fatal stages (clone, ref query) abort the run. `ExportFailed` is caught
//! per ref and `CleanupFailed` is only ever logged.

use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`ArchiverError`].
pub type ArchiverResult<T> = std::result::Result<T, ArchiverError>;

/// Top-level application error type.
///
/// All sub-errors are boxed to keep this enum at ~24 bytes on the stack.
/// The sub-error is embedded in the display and not exposed as `source()`.
#[derive(Debug, Error)]
pub enum ArchiverError {
    /// Git operation failed.
    #[error("git error: {0}")]
    Git(Box<GitError>),

    /// Archive creation failed.
    #[error("archive error: {0}")]
    Archive(Box<ArchiveError>),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(Box<ConfigError>),

    /// Process execution error.
    #[error("process error: {0}")]
    Process(Box<ProcessError>),

    /// Filesystem error.
    #[error("filesystem error: {0}")]
    Fs(Box<FsError>),

    /// I/O error.
    #[error("io error: {0}")]
    Io(Box<std::io::Error>),
}

impl ArchiverError {
    /// Returns the git error if this is one.
    #[must_use]
    pub fn as_git(&self) -> Option<&GitError> {
        match self {
            Self::Git(err) => Some(err),
            _ => None,
        }
    }
}

// --- From implementations for boxing ---

/// Macro to generate `From` implementations that box the source error.
macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for ArchiverError {
                fn from(err: $error) -> Self {
                    ArchiverError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    GitError => Git,
    ArchiveError => Archive,
    ConfigError => Config,
    ProcessError => Process,
    FsError => Fs,
    std::io::Error => Io,
}

// --- Git Errors ---

/// Git operation errors.
#[derive(Debug, Error)]
pub enum GitError {
    /// Mirror clone of the source failed.
    #[error("failed to clone {url}: {message}")]
    CloneFailed { url: String, message: String },

    /// Listing references failed.
    #[error("failed to list refs in {repo}: {message}")]
    RefQueryFailed { repo: String, message: String },

    /// Exporting a single ref's tree failed.
    #[error("failed to export {ref_name}: {message}")]
    ExportFailed { ref_name: String, message: String },

    /// Git command execution failed.
    #[error("git command failed: {command} - {message}")]
    CommandFailed { command: String, message: String },
}

impl GitError {
    /// Returns `true` for the per-ref failure kind the pipeline recovers from.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::ExportFailed { .. })
    }
}

// --- Archive Errors ---

/// Archive bundling errors.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// Writing the zip archive failed.
    #[error("failed to write zip {path}: {source}")]
    Zip {
        path: String,
        #[source]
        source: zip::result::ZipError,
    },

    /// Writing the tar archive failed.
    #[error("failed to write tar {path}: {source}")]
    Tar {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Archive base name has no usable file name.
    #[error("invalid archive base name: {0}")]
    InvalidBaseName(String),
}

// --- Config Errors ---

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to parse configuration sources.
    #[error("failed to parse config '{path}': {message}")]
    ParseError { path: String, message: String },

    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },
}

// --- Process Errors ---

/// Process execution errors.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Executable not found in PATH.
    #[error("executable not found: '{name}' (not in PATH)")]
    ExecutableNotFound { name: String },

    /// Failed to spawn process.
    #[error("failed to spawn process '{command}': {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

// --- Filesystem Errors ---

/// Filesystem operation errors.
#[derive(Debug, Error)]
pub enum FsError {
    /// Removing a temporary clone failed.
    #[error("failed to remove temporary directory '{path}': {source}")]
    CleanupFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// General I/O error.
    #[error("I/O error on '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl FsError {
    /// Wraps an I/O error with the path it happened on.
    pub fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.display().to_string(),
            source,
        }
    }
}
