//! Shared helpers for benchmarks

use std::fs;

use tempfile::TempDir;

/// Build a vault with `folders` folders of `per_folder` notes each, plus
/// some noise the scanner has to skip
#[allow(dead_code)]
pub fn make_vault(folders: usize, per_folder: usize) -> TempDir {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    for f in 0..folders {
        let folder = dir.path().join(format!("folder-{f:03}"));
        fs::create_dir_all(&folder).expect("Failed to create folder");
        for n in 0..per_folder {
            fs::write(folder.join(format!("Note {n}.md")), "# note\n").expect("write");
        }
        fs::write(folder.join("attachment.png"), [0u8; 16]).expect("write");
    }
    fs::create_dir_all(dir.path().join(".git/objects")).expect("Failed to create .git");
    dir
}

/// A markdown document with headings, lists, code and a table
#[allow(dead_code)]
pub fn make_markdown(sections: usize) -> String {
    let mut text = String::new();
    for i in 0..sections {
        text.push_str(&format!("## Section {i}\n\nSome *emphasis* and a [link](https://example.com).\nA second line in the same paragraph.\n\n"));
        text.push_str("- [x] done\n- [ ] todo\n\n");
        text.push_str("```rust\nfn main() {}\n```\n\n");
        text.push_str("| a | b |\n|---|---|\n| 1 | 2 |\n\n");
    }
    text
}
