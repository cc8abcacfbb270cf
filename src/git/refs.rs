// git-branch-archiver: Git branch export and backup tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Reference enumeration.
//!
//! ```text
//! for-each-ref refs/heads refs/remotes   (always)
//! for-each-ref refs/tags                 (include_tags, appended)
//!        |
//!        v
//! strip refs/heads/ | refs/remotes/ | refs/tags/
//!        |
//!        v
//! dedup by short name (first seen wins, collision warned)
//! ```

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, warn};

use super::backend::GitClient;
use crate::error::ArchiverResult;

/// Namespaces always queried.
pub const BRANCH_NAMESPACES: [&str; 2] = ["refs/heads", "refs/remotes"];

/// Namespace queried when tags are included.
pub const TAG_NAMESPACE: &str = "refs/tags";

const KNOWN_PREFIXES: [&str; 3] = ["refs/heads/", "refs/remotes/", "refs/tags/"];

/// A full ref name with its namespace-stripped short name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RefDescriptor {
    full_name: String,
    short_name: String,
}

impl RefDescriptor {
    pub fn new(full_name: impl Into<String>) -> Self {
        let full_name = full_name.into();
        let short_name = short_name(&full_name).to_string();
        Self {
            full_name,
            short_name,
        }
    }

    /// e.g. `refs/heads/main`
    #[must_use]
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// e.g. `main`
    #[must_use]
    pub fn short_name(&self) -> &str {
        &self.short_name
    }
}

/// Strip a known namespace prefix; unknown refs keep their full name.
#[must_use]
pub fn short_name(full_name: &str) -> &str {
    KNOWN_PREFIXES
        .iter()
        .find_map(|prefix| full_name.strip_prefix(prefix))
        .unwrap_or(full_name)
}

/// List branch, remote-tracking and (optionally) tag refs of `repo`.
///
/// Tags are appended after branches, so a tag whose short name matches a
/// branch is dropped.
///
/// # Errors
///
/// Returns `GitError::RefQueryFailed` if either query fails. No partial
/// result is returned.
pub fn list_refs<G: GitClient + ?Sized>(
    client: &G,
    repo: &Path,
    include_tags: bool,
) -> ArchiverResult<Vec<RefDescriptor>> {
    let mut full_names = client.list_refs(repo, &BRANCH_NAMESPACES)?;
    if include_tags {
        full_names.extend(client.list_refs(repo, &[TAG_NAMESPACE])?);
    }
    debug!(count = full_names.len(), include_tags, "listed refs");
    Ok(dedup_by_short_name(full_names))
}

/// Normalize refs and keep the first ref seen for each short name.
pub fn dedup_by_short_name<I>(full_names: I) -> Vec<RefDescriptor>
where
    I: IntoIterator<Item = String>,
{
    let mut seen: HashMap<String, String> = HashMap::new();
    let mut result = Vec::new();

    for full in full_names {
        let descriptor = RefDescriptor::new(full);
        if let Some(kept) = seen.get(descriptor.short_name()) {
            if kept != descriptor.full_name() {
                warn!(
                    ref_name = %descriptor.short_name(),
                    kept = %kept,
                    dropped = %descriptor.full_name(),
                    "short name collision, skipping ref"
                );
            }
            continue;
        }
        seen.insert(
            descriptor.short_name().to_string(),
            descriptor.full_name().to_string(),
        );
        result.push(descriptor);
    }

    result
}
