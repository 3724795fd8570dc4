// src/tests/writer_tests.rs

//! tests for [`src/writer.rs`]
//!
//! [`src/writer.rs`]: crate::writer

#![allow(non_snake_case)]

use std::collections::BTreeSet;
use std::path::PathBuf;

#[allow(unused_imports)]
use ::si_trace_print::printers::{
    defn,
    defo,
    defx,
};
use ::tempfile::tempdir;

use crate::common::path_to_fpath;
use crate::emitter::TestUnit;
use crate::emitter::header::{
    BANNER,
    render_file,
};
use crate::error::FixtureError;
use crate::writer::{
    Destination,
    MOD_FILE_NAME,
    layout,
    write_units,
};

fn unit(category: &str, text: &str) -> TestUnit {
    TestUnit {
        category: category.to_string(),
        skip: false,
        imports: BTreeSet::from([format!("crate::{}", category)]),
        needs_py_datetime: false,
        text: text.to_string(),
    }
}

fn units() -> Vec<TestUnit> {
    vec![
        unit("test_b", "\n#[test]\nfn test_b0() {}\n"),
        unit("test_a", "\n#[test]\nfn test_a0() {}\n"),
    ]
}

#[test]
fn test_layout_file() {
    let units = units();
    let files = layout(&Destination::File(PathBuf::from("out.rs")), &units);
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].0, PathBuf::from("out.rs"));
    assert_eq!(files[0].1, render_file(&units));
}

#[test]
fn test_layout_directory() {
    let units = units();
    let dir = PathBuf::from("fixtures");
    let files = layout(&Destination::Directory(dir.clone()), &units);
    let paths: Vec<PathBuf> = files.iter().map(|(p, _)| p.clone()).collect();
    assert_eq!(
        paths,
        vec![dir.join("test_b.rs"), dir.join("test_a.rs"), dir.join(MOD_FILE_NAME)],
    );
    assert_eq!(files[0].1, render_file(&units[0..1]));
    // declaration order, not sorted
    assert_eq!(files[2].1, format!("{}\nmod test_b;\nmod test_a;\n", BANNER));
}

#[test]
fn test_write_units_file() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("pycompat.rs");
    let units = units();
    let written = write_units(&Destination::File(path.clone()), &units).unwrap();
    assert_eq!(written, vec![path_to_fpath(&path)]);
    let contents = std::fs::read_to_string(&path).unwrap();
    assert_eq!(contents, render_file(&units));
    // only the one file remains, no temporary files left behind
    assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 1);
}

#[test]
fn test_write_units_file_overwrites() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("pycompat.rs");
    std::fs::write(&path, "old contents").unwrap();
    let units = units();
    write_units(&Destination::File(path.clone()), &units).unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), render_file(&units));
}

#[test]
fn test_write_units_directory() {
    let tmp = tempdir().unwrap();
    let dir = tmp.path().join("fixtures").join("nested");
    let units = units();
    let written = write_units(&Destination::Directory(dir.clone()), &units).unwrap();
    assert_eq!(written.len(), 3);
    for (path, contents) in layout(&Destination::Directory(dir.clone()), &units) {
        defo!("check {:?}", path);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), contents);
    }
    assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 3);
}

#[test]
fn test_write_units_missing_parent_dir() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("no_such_dir").join("pycompat.rs");
    let result = write_units(&Destination::File(path.clone()), &units());
    match result {
        Err(FixtureError::Write { path: p, .. }) => assert_eq!(p, path_to_fpath(&path)),
        other => panic!("expected Write error, got {:?}", other),
    }
    assert!(!path.exists());
}

#[test]
fn test_write_units_all_or_nothing() {
    let tmp = tempdir().unwrap();
    let dir = tmp.path().join("fixtures");
    std::fs::create_dir_all(&dir).unwrap();
    // a directory where `mod.rs` must be written makes the last persist fail
    std::fs::create_dir_all(dir.join(MOD_FILE_NAME).join("blocker")).unwrap();
    let result = write_units(&Destination::Directory(dir.clone()), &units());
    assert!(matches!(result, Err(FixtureError::Write { .. })), "{:?}", result);
    // no temporary files are left behind
    let names: Vec<String> = std::fs::read_dir(&dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    assert!(!names.iter().any(|n| n.starts_with(".tmp")), "{:?}", names);
}
