//! Integration tests for vault scanning
//!
//! Tests filtering, ordering and relative paths against real directories.

mod common;

use std::fs;

use common::vault_with;
use serde_json::json;
use vellum::model::tree::scan;
use vellum::model::{NodeKind, TreeNode};

fn names(nodes: &[TreeNode]) -> Vec<&str> {
    nodes.iter().map(|n| n.name.as_str()).collect()
}

#[test]
fn test_scan_filters_hidden_folders_and_other_files() {
    let vault = vault_with(&[
        ("notes/a.md", "# A"),
        ("notes/.git/config", "[core]"),
        ("readme.md", "hello"),
    ]);

    let tree = scan(vault.path()).unwrap();

    assert_eq!(
        tree.roots,
        vec![
            TreeNode::folder("notes", "notes", vec![TreeNode::document("a.md", "notes/a.md")]),
            TreeNode::document("readme.md", "readme.md"),
        ]
    );
}

#[test]
fn test_scan_skips_non_markdown_files() {
    let vault = vault_with(&[
        ("a.md", ""),
        ("b.txt", ""),
        ("c.markdown", ""),
        ("image.png", ""),
        ("notes.md.bak", ""),
    ]);

    let tree = scan(vault.path()).unwrap();
    assert_eq!(names(&tree.roots), vec!["a.md"]);
}

#[test]
fn test_scan_keeps_hidden_markdown_files() {
    // Only hidden folders are excluded; a dot-file with the extension stays
    let vault = vault_with(&[(".draft.md", ""), (".obsidian/workspace.md", "")]);

    let tree = scan(vault.path()).unwrap();
    assert_eq!(names(&tree.roots), vec![".draft.md"]);
}

#[test]
fn test_scan_keeps_empty_folders() {
    let vault = vault_with(&[("a.md", "")]);
    fs::create_dir(vault.path().join("empty")).unwrap();
    fs::create_dir_all(vault.path().join("only-text")).unwrap();
    fs::write(vault.path().join("only-text/x.txt"), "").unwrap();

    let tree = scan(vault.path()).unwrap();

    assert_eq!(names(&tree.roots), vec!["empty", "only-text", "a.md"]);
    assert!(tree.roots[0].children.is_empty());
    assert!(tree.roots[1].children.is_empty());
    assert_eq!(tree.roots[1].kind, NodeKind::Folder);
}

#[test]
fn test_scan_orders_folders_first_then_by_name() {
    let vault = vault_with(&[
        ("b.md", ""),
        ("A.md", ""),
        ("a.md", ""),
        ("Zeta/z.md", ""),
        ("alpha/a.md", ""),
    ]);

    let tree = scan(vault.path()).unwrap();
    assert_eq!(names(&tree.roots), vec!["alpha", "Zeta", "a.md", "A.md", "b.md"]);
}

#[test]
fn test_scan_nested_relative_paths() {
    let vault = vault_with(&[("x/y/z.md", "")]);

    let tree = scan(vault.path()).unwrap();
    let y = &tree.roots[0].children[0];
    assert_eq!(y.path, "x/y");
    assert_eq!(y.children[0].path, "x/y/z.md");
    assert_eq!(tree.document_paths(), vec!["x/y/z.md".to_string()]);
    assert!(tree.is_folder("x/y"));
}

#[test]
fn test_scan_is_idempotent() {
    let vault = vault_with(&[("one/a.md", ""), ("two/b.md", ""), ("c.md", "")]);

    let first = scan(vault.path()).unwrap();
    let second = scan(vault.path()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_scan_unreadable_root_is_error() {
    let vault = vault_with(&[]);
    let missing = vault.path().join("missing");

    let err = scan(&missing).unwrap_err();
    assert_eq!(err.path, missing);
}

#[test]
fn test_scan_empty_vault() {
    let vault = vault_with(&[]);
    assert!(scan(vault.path()).unwrap().is_empty());
}

#[test]
fn test_tree_serializes_to_view_shape() {
    let vault = vault_with(&[("notes/a.md", ""), ("readme.md", "")]);
    let tree = scan(vault.path()).unwrap();

    assert_eq!(
        serde_json::to_value(&tree.roots).unwrap(),
        json!([
            {
                "name": "notes",
                "path": "notes",
                "type": "folder",
                "children": [{ "name": "a.md", "path": "notes/a.md", "type": "file" }]
            },
            { "name": "readme.md", "path": "readme.md", "type": "file" }
        ])
    );
}

#[cfg(unix)]
#[test]
fn test_scan_does_not_follow_symlinks() {
    let vault = vault_with(&[("real/a.md", "")]);
    std::os::unix::fs::symlink(vault.path().join("real"), vault.path().join("link")).unwrap();
    std::os::unix::fs::symlink(vault.path(), vault.path().join("real/loop")).unwrap();

    let tree = scan(vault.path()).unwrap();
    assert_eq!(names(&tree.roots), vec!["real"]);
    assert_eq!(names(&tree.roots[0].children), vec!["a.md"]);
}
