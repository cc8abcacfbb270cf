// git-branch-archiver: Git branch export and backup tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Filesystem utilities.
//!
//! ```text
//! walk:  walk()        ignore::WalkBuilder, sorted, sequential
//!        WalkOptions   skip_paths
//!        WalkResult    ordered snapshot of entries below a root
//! ```

pub mod walk;
