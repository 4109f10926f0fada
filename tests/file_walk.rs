#![cfg(unix)]

use std::error::Error;
use std::fs;
use std::os::unix::fs::symlink;

use assertgen::fs::{walk_files, RealFileSystem};

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn walk_lists_nested_files_sorted() -> TestResult {
    let dir = tempfile::tempdir()?;
    let root = dir.path();
    fs::create_dir_all(root.join("org/example"))?;
    fs::write(root.join("org/example/B.java"), "")?;
    fs::write(root.join("org/A.java"), "")?;

    let files = walk_files(&RealFileSystem, root)?;
    assert_eq!(
        files,
        vec![root.join("org/A.java"), root.join("org/example/B.java")]
    );
    Ok(())
}

#[test]
fn walk_does_not_follow_a_symlink_cycle() -> TestResult {
    let dir = tempfile::tempdir()?;
    let root = dir.path();
    fs::create_dir_all(root.join("org"))?;
    fs::write(root.join("org/A.java"), "")?;
    symlink(root, root.join("org/loop"))?;

    let files = walk_files(&RealFileSystem, root)?;
    assert_eq!(files, vec![root.join("org/A.java")]);
    Ok(())
}

#[test]
fn missing_root_is_empty() -> TestResult {
    let dir = tempfile::tempdir()?;
    assert!(walk_files(&RealFileSystem, &dir.path().join("absent"))?.is_empty());
    Ok(())
}
