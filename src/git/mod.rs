// git-branch-archiver: Git branch export and backup tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git operations module.
//!
//! ```text
//!   resolve.rs    refs.rs     export.rs
//!   RepoHandle  RefDescriptor  sanitize
//!        \          |          /
//!         v         v         v
//!      ,------------------------,
//!      |  backend (GitClient)   |
//!      '---+----------------+---'
//!          |                |
//!          v                v
//!     ShellBackend      FakeGit (tests)
//!     git clone --mirror
//!     git for-each-ref
//!     git archive --format=tar
//! ```
//!
//! **`ShellBackend`** shells out to the git CLI for everything except the
//! repository check, which opens the directory with gix.

pub mod backend;
pub mod export;
pub mod refs;
pub mod resolve;

#[cfg(test)]
mod tests;
