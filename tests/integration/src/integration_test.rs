#![cfg(unix)]

//! End-to-end activation against a temporary root
//!
//! Each test writes real manifest documents, runs `activate_files`, and
//! inspects the resulting filesystem.

use genlink_core::{
    ActivationStatus, Capabilities, Manifest, ManifestEntry, ProblemReason, RunMode,
    TransactionKind, activate_files,
};
use genlink_test_utils::TestSystem;
use pretty_assertions::assert_eq;

fn run(
    system: &TestSystem,
    old: &Manifest,
    new: &Manifest,
    mode: RunMode,
) -> genlink_core::ActivationReport {
    let old = system.write_manifest("old.json", old);
    let new = system.write_manifest("new.json", new);
    activate_files(&old, &new, mode, Capabilities::default()).unwrap()
}

#[test]
fn test_new_link_on_empty_path() {
    let system = TestSystem::new();
    let a = system.store("a", "content");
    let new = Manifest::new().with_entry(system.path("etc/foo"), ManifestEntry::link(&a));

    let report = run(&system, &Manifest::new(), &new, RunMode::apply());

    assert_eq!(report.status, ActivationStatus::Applied);
    assert_eq!(report.transactions.len(), 1);
    assert_eq!(report.transactions[0].kind, TransactionKind::Link);
    assert_eq!(report.transactions[0].source, a);
    assert_eq!(report.transactions[0].destination, system.path("etc/foo"));
    system.assert_symlink("etc/foo", &a);
}

#[test]
fn test_unknown_file_blocks_activation() {
    let system = TestSystem::new();
    let a = system.store("a", "content");
    system.write("etc/foo", "hand written");
    let new = Manifest::new().with_entry(system.path("etc/foo"), ManifestEntry::link(&a));

    let report = run(&system, &Manifest::new(), &new, RunMode::apply());

    assert_eq!(report.status, ActivationStatus::Conflicted);
    assert!(report.transactions.is_empty());
    assert_eq!(report.problems.len(), 1);
    assert_eq!(report.problems[0].reason, ProblemReason::UntrackedFile);
    system.assert_file("etc/foo", "hand written");
}

#[test]
fn test_dropped_link_is_removed() {
    let system = TestSystem::new();
    let a = system.store("a", "content");
    system.symlink("etc/foo", &a);
    let old = Manifest::new().with_entry(system.path("etc/foo"), ManifestEntry::link(&a));

    let report = run(&system, &old, &Manifest::new(), RunMode::apply());

    assert_eq!(report.transactions.len(), 1);
    assert_eq!(report.transactions[0].kind, TransactionKind::Remove);
    system.assert_missing("etc/foo");
}

#[test]
fn test_preauthorized_file_is_replaced() {
    let system = TestSystem::new();
    let a = system.store("a", "managed");
    system.write("etc/foo", "distribution default");
    let new = Manifest::new().with_entry(
        system.path("etc/foo"),
        ManifestEntry::link(&a).with_known_hashes([TestSystem::sha256("distribution default")]),
    );

    let report = run(&system, &Manifest::new(), &new, RunMode::apply());

    assert_eq!(report.status, ActivationStatus::Applied);
    system.assert_symlink("etc/foo", &a);
}

#[test]
fn test_relative_link_matches_absolute_source() {
    let system = TestSystem::new();
    let a = system.write("etc/static/foo", "content");
    // etc/foo -> static/foo names the same file as the absolute source
    system.symlink("etc/foo", "static/foo");
    let b = system.store("b", "next");
    let old = Manifest::new().with_entry(system.path("etc/foo"), ManifestEntry::link(&a));
    let new = Manifest::new().with_entry(system.path("etc/foo"), ManifestEntry::link(&b));

    let report = run(&system, &old, &new, RunMode::apply());

    assert_eq!(report.status, ActivationStatus::Applied);
    system.assert_symlink("etc/foo", &b);
}

#[test]
fn test_parent_directories_are_created() {
    let system = TestSystem::new();
    let a = system.store("a", "content");
    let new = Manifest::new().with_entry(
        system.path("etc/deeply/nested/dir/foo"),
        ManifestEntry::copy(&a),
    );

    run(&system, &Manifest::new(), &new, RunMode::apply());

    system.assert_file("etc/deeply/nested/dir/foo", "content");
}

#[test]
fn test_directory_in_the_way_is_reported() {
    let system = TestSystem::new();
    let a = system.store("a", "content");
    std::fs::create_dir_all(system.path("etc/foo")).unwrap();
    let new = Manifest::new().with_entry(system.path("etc/foo"), ManifestEntry::link(&a));

    let report = run(&system, &Manifest::new(), &new, RunMode::apply());

    assert_eq!(report.problems[0].reason, ProblemReason::UnsupportedFileType);
    assert!(system.path("etc/foo").is_dir());
}

#[test]
fn test_toml_and_yaml_manifests() {
    let system = TestSystem::new();
    let a = system.store("a", "content");
    let b = system.store("b", "content");
    let old = system.write_manifest_str(
        "old.toml",
        &format!(
            "version = 1\n\n[files.\"{}\"]\nsource = \"{}\"\ntype = \"link\"\n",
            system.path("etc/a").display(),
            a.display()
        ),
    );
    let new = system.write_manifest_str(
        "new.yaml",
        &format!(
            "version: 1\nfiles:\n  {}:\n    source: {}\n    type: link\n",
            system.path("etc/b").display(),
            b.display()
        ),
    );
    system.symlink("etc/a", &a);

    let report = activate_files(&old, &new, RunMode::apply(), Capabilities::default()).unwrap();

    assert_eq!(report.status, ActivationStatus::Applied);
    system.assert_missing("etc/a");
    system.assert_symlink("etc/b", &b);
}

#[test]
fn test_relative_manifest_path_is_rejected() {
    let system = TestSystem::new();
    let old = system.write_manifest("old.json", &Manifest::new());
    let new = system.write_manifest_str(
        "new.json",
        r#"{"version": 1, "files": {"etc/foo": {"source": "/store/a", "type": "link"}}}"#,
    );

    let result = activate_files(&old, &new, RunMode::apply(), Capabilities::default());

    assert!(matches!(result, Err(genlink_core::Error::InvalidManifest { .. })));
}

#[test]
fn test_unknown_entry_type_is_skipped() {
    let system = TestSystem::new();
    let a = system.store("a", "content");
    let b = system.store("b", "content");
    let hard = system.path("etc/hard").display().to_string();
    let soft = system.path("etc/soft").display().to_string();
    let old = system.write_manifest("old.json", &Manifest::new());
    let new = system.write_manifest_str(
        "new.json",
        &serde_json::json!({
            "version": 1,
            "files": {
                hard: {"source": a, "type": "hardlink"},
                soft: {"source": b, "type": "link"},
            }
        })
        .to_string(),
    );

    let report = activate_files(&old, &new, RunMode::apply(), Capabilities::default()).unwrap();
    let execution = report.execution.unwrap();

    assert_eq!(execution.skipped.len(), 1);
    assert_eq!(execution.skipped[0].reason, "Unknown transaction type unknown");
    system.assert_missing("etc/hard");
    system.assert_symlink("etc/soft", &b);
}
