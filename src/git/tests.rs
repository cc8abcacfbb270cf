// git-branch-archiver: Git branch export and backup tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::git::export::{export_dir, export_ref, sanitize};
use crate::git::refs::{RefDescriptor, dedup_by_short_name, list_refs, short_name};
use crate::git::resolve::{RepoHandle, TEMP_PREFIX, resolve};
use crate::test_utils::{FakeGit, capture_logs};
use std::path::Path;
use tempfile::TempDir;

fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("failed to create temp dir")
}

fn short_names(refs: &[RefDescriptor]) -> Vec<&str> {
    refs.iter().map(RefDescriptor::short_name).collect()
}

// =============================================================================
// Resolve
// =============================================================================

#[test]
fn test_resolve_uses_existing_local_repo() {
    let temp = temp_dir();
    std::fs::create_dir(temp.path().join(".git")).unwrap();
    let fake = FakeGit::new();

    let source = temp.path().to_str().unwrap();
    let handle = resolve(&fake, source, None).unwrap();

    assert!(!handle.is_temporary());
    assert_eq!(handle.path(), std::fs::canonicalize(temp.path()).unwrap());
    assert!(fake.clones().is_empty(), "local repo must not be cloned");
}

#[test]
fn test_resolve_clones_url_into_tmp_parent() {
    let tmp_parent = temp_dir();
    let fake = FakeGit::new();

    let handle = resolve(
        &fake,
        "https://example.com/project.git",
        Some(tmp_parent.path()),
    )
    .unwrap();

    assert!(handle.is_temporary());
    assert!(handle.path().starts_with(tmp_parent.path()));
    let dir_name = handle.path().file_name().unwrap().to_string_lossy();
    assert!(dir_name.starts_with(TEMP_PREFIX), "got {dir_name}");

    let clones = fake.clones();
    assert_eq!(clones.len(), 1);
    assert_eq!(clones[0].0, "https://example.com/project.git");
    assert_eq!(clones[0].1, handle.path());
}

#[test]
fn test_resolve_clones_plain_directory() {
    // Exists but holds no repository metadata
    let plain = temp_dir();
    let tmp_parent = temp_dir();
    let fake = FakeGit::new();

    let handle = resolve(&fake, plain.path().to_str().unwrap(), Some(tmp_parent.path())).unwrap();
    assert!(handle.is_temporary());
    assert_eq!(fake.clones().len(), 1);
}

#[test]
fn test_resolve_clones_relative_path_as_absolute() {
    // Tests run from the crate root, where `src` exists but is no repository
    let tmp_parent = temp_dir();
    let fake = FakeGit::new();

    let handle = resolve(&fake, "src", Some(tmp_parent.path())).unwrap();
    assert!(handle.is_temporary());

    let clones = fake.clones();
    let source = Path::new(&clones[0].0);
    assert!(source.is_absolute(), "clone source {source:?} is relative");
    assert_eq!(source, std::fs::canonicalize("src").unwrap());
}

#[test]
fn test_resolve_keeps_urls_verbatim() {
    let tmp_parent = temp_dir();
    let fake = FakeGit::new();

    resolve(&fake, "git@example.com:team/x.git", Some(tmp_parent.path())).unwrap();
    assert_eq!(fake.clones()[0].0, "git@example.com:team/x.git");
}

#[test]
fn test_resolve_creates_missing_tmp_parent() {
    let temp = temp_dir();
    let tmp_parent = temp.path().join("nested").join("clones");
    let fake = FakeGit::new();

    let handle = resolve(&fake, "git@example.com:x.git", Some(&tmp_parent)).unwrap();
    assert!(tmp_parent.is_dir());
    assert!(handle.path().starts_with(&tmp_parent));
}

#[test]
fn test_resolve_clone_failure_is_fatal_and_cleans_up() {
    let tmp_parent = temp_dir();
    let fake = FakeGit::new().with_clone_failure();

    let err = resolve(&fake, "https://example.com/missing.git", Some(tmp_parent.path()))
        .unwrap_err();
    insta::assert_snapshot!(
        err.to_string(),
        @"git error: failed to clone https://example.com/missing.git: repository not found"
    );

    let leftovers = std::fs::read_dir(tmp_parent.path()).unwrap().count();
    assert_eq!(leftovers, 0, "failed clone must not leave a temp dir");
}

#[test]
fn test_release_removes_temporary_clone() {
    let tmp_parent = temp_dir();
    let fake = FakeGit::new();
    let handle = resolve(&fake, "https://example.com/a.git", Some(tmp_parent.path())).unwrap();
    let path = handle.path().to_path_buf();
    assert!(path.exists());

    let kept = handle.release(false).unwrap();
    assert!(kept.is_none());
    assert!(!path.exists());
}

#[test]
fn test_release_keeps_temporary_clone_on_request() {
    let tmp_parent = temp_dir();
    let fake = FakeGit::new();
    let handle = resolve(&fake, "https://example.com/a.git", Some(tmp_parent.path())).unwrap();
    let path = handle.path().to_path_buf();

    let kept = handle.release(true).unwrap();
    assert_eq!(kept.as_deref(), Some(path.as_path()));
    assert!(path.exists());
}

#[test]
fn test_release_never_touches_local_repo() {
    let temp = temp_dir();
    let handle = RepoHandle::local(temp.path());
    assert!(handle.release(false).unwrap().is_none());
    assert!(temp.path().exists());
}

// =============================================================================
// Refs
// =============================================================================

#[test]
fn test_short_name_strips_known_namespaces() {
    let cases = [
        ("refs/heads/main", "main"),
        ("refs/heads/feature/x", "feature/x"),
        ("refs/remotes/origin/dev", "origin/dev"),
        ("refs/tags/v1.0", "v1.0"),
        ("refs/notes/commits", "refs/notes/commits"),
        ("HEAD", "HEAD"),
    ];
    for (full, short) in cases {
        assert_eq!(short_name(full), short, "short name of {full}");
    }
}

#[test]
fn test_list_refs_returns_one_descriptor_per_branch() {
    let fake = FakeGit::new()
        .with_ref("refs/heads/dev", &[])
        .with_ref("refs/heads/main", &[])
        .with_ref("refs/remotes/origin/main", &[])
        .with_ref("refs/tags/v1.0", &[]);

    let refs = list_refs(&fake, Path::new("/repo"), false).unwrap();
    assert_eq!(short_names(&refs), vec!["dev", "main", "origin/main"]);
    assert_eq!(refs[2].full_name(), "refs/remotes/origin/main");
}

#[test]
fn test_list_refs_appends_tags_after_branches() {
    let fake = FakeGit::new()
        .with_ref("refs/tags/v1.0", &[])
        .with_ref("refs/heads/main", &[]);

    let without = list_refs(&fake, Path::new("/repo"), false).unwrap();
    let with = list_refs(&fake, Path::new("/repo"), true).unwrap();

    assert!(with.len() >= without.len());
    assert_eq!(short_names(&with), vec!["main", "v1.0"]);
}

#[test]
fn test_colliding_tag_is_dropped_with_warning() {
    let fake = FakeGit::new()
        .with_ref("refs/heads/release", &[])
        .with_ref("refs/tags/release", &[])
        .with_ref("refs/tags/v2", &[]);

    let (refs, logs) = capture_logs(|| list_refs(&fake, Path::new("/repo"), true).unwrap());

    assert_eq!(short_names(&refs), vec!["release", "v2"]);
    assert_eq!(refs[0].full_name(), "refs/heads/release");
    assert!(logs.contains("short name collision"), "logs: {logs}");
    assert!(logs.contains("refs/tags/release"), "logs: {logs}");
}

#[test]
fn test_dedup_keeps_first_seen_order() {
    let refs = dedup_by_short_name(
        [
            "refs/heads/b",
            "refs/remotes/a",
            "refs/heads/a",
            "refs/tags/b",
            "refs/heads/c",
        ]
        .map(String::from),
    );
    assert_eq!(short_names(&refs), vec!["b", "a", "c"]);
    assert_eq!(refs[1].full_name(), "refs/remotes/a");
}

#[test]
fn test_list_refs_query_failure_is_fatal() {
    let fake = FakeGit::new()
        .with_ref("refs/heads/main", &[])
        .with_ref_query_failure();

    let err = list_refs(&fake, Path::new("/repo"), false).unwrap_err();
    assert!(err.as_git().is_some_and(|e| !e.is_recoverable()));
}

// =============================================================================
// Export
// =============================================================================

#[test]
fn test_sanitize_flattens_separators() {
    assert_eq!(sanitize("origin/feature/x"), "origin__feature__x");
    assert_eq!(sanitize("main"), "main");
    assert_eq!(sanitize("win\\style"), "win__style");
    assert!(!sanitize("a/b/c/d").contains('/'));
}

#[test]
fn test_export_writes_exact_tree() {
    let out = temp_dir();
    let fake = FakeGit::new().with_ref(
        "refs/heads/main",
        &[("a.txt", "alpha\n"), ("b/c.txt", "charlie\n")],
    );
    let reference = RefDescriptor::new("refs/heads/main");

    let dest = export_ref(&fake, Path::new("/repo"), &reference, out.path()).unwrap();
    assert_eq!(dest, out.path().join("main"));

    let mut entries: Vec<String> = walk_relative(&dest);
    entries.sort();
    assert_eq!(entries, vec!["a.txt", "b", "b/c.txt"]);
    assert_eq!(std::fs::read(dest.join("a.txt")).unwrap(), b"alpha\n");
    assert_eq!(std::fs::read(dest.join("b/c.txt")).unwrap(), b"charlie\n");
}

#[test]
fn test_export_uses_full_ref_and_sanitized_dir() {
    let out = temp_dir();
    let fake = FakeGit::new().with_ref("refs/remotes/origin/feature/x", &[("x.txt", "x")]);
    let reference = RefDescriptor::new("refs/remotes/origin/feature/x");

    let dest = export_ref(&fake, Path::new("/repo"), &reference, out.path()).unwrap();
    assert_eq!(dest, export_dir(out.path(), &reference));
    assert_eq!(dest.file_name().unwrap(), "origin__feature__x");
    assert_eq!(fake.archived(), vec!["refs/remotes/origin/feature/x"]);
}

#[test]
fn test_export_overwrites_previous_contents() {
    let out = temp_dir();
    let reference = RefDescriptor::new("refs/heads/main");
    let first = FakeGit::new().with_ref("refs/heads/main", &[("a.txt", "old")]);
    let second = FakeGit::new().with_ref("refs/heads/main", &[("a.txt", "new")]);

    export_ref(&first, Path::new("/repo"), &reference, out.path()).unwrap();
    let dest = export_ref(&second, Path::new("/repo"), &reference, out.path()).unwrap();
    assert_eq!(std::fs::read_to_string(dest.join("a.txt")).unwrap(), "new");
}

#[test]
fn test_export_failure_names_ref() {
    let out = temp_dir();
    let fake = FakeGit::new()
        .with_ref("refs/heads/dev", &[])
        .with_failing_export("refs/heads/dev");
    let reference = RefDescriptor::new("refs/heads/dev");

    let err = export_ref(&fake, Path::new("/repo"), &reference, out.path()).unwrap_err();
    let git_err = err.as_git().expect("export failure is a git error");
    assert!(git_err.is_recoverable());
    assert!(err.to_string().contains("failed to export dev"), "{err}");
}

fn walk_relative(root: &Path) -> Vec<String> {
    fn visit(root: &Path, dir: &Path, out: &mut Vec<String>) {
        for entry in std::fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            let rel = path.strip_prefix(root).unwrap();
            out.push(rel.to_string_lossy().replace('\\', "/"));
            if path.is_dir() {
                visit(root, &path, out);
            }
        }
    }
    let mut out = Vec::new();
    visit(root, root, &mut out);
    out
}
