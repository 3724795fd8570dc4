// src/tests/venv_tests.rs

//! tests for [`src/python/venv.rs`]
//!
//! [`src/python/venv.rs`]: crate::python::venv

#![allow(non_snake_case)]
#![allow(non_camel_case_types)]

use std::io::ErrorKind;

#[allow(unused_imports)]
use ::si_trace_print::printers::{
    defn,
    defo,
    defx,
    defñ,
};
use ::test_case::test_case;

use crate::common::Bytes;
use crate::debug::printers::buffer_to_String_noraw;
use crate::python::pyrunner::{
    PythonToUse,
    venv_python_executable,
};
use crate::python::venv::{
    create,
    extract_compare_version,
    venv_path,
};

#[test]
fn test_venv_path() {
    defn!();
    let path = venv_path();
    defx!("venv_path() returned {:?}", path);
    // tests never touch the user's venv
    assert!(path.ends_with("tmp-pycompat-test-python-venv"), "{:?}", path);
}

#[test_case(b"Python 3.12.0 (main, Oct  3 2023, 13:59:11) [MSC v.1934 64 bit (AMD64)] on win32\n", None; "3.12 windows")]
#[test_case(b"Python 3.9.0\n", None; "3.9 minimum")]
#[test_case(b"Python 3.10.14\n", None; "3.10 compares numerically")]
#[test_case(b"Python 3.8.10\n", Some(ErrorKind::Unsupported); "3.8 too old")]
#[test_case(b"Python 2.7.18\n", Some(ErrorKind::Unsupported); "2.7 too old")]
#[test_case(b"", Some(ErrorKind::Other); "empty")]
#[test_case(b"pypy 3.10\n", Some(ErrorKind::Other); "unrecognized")]
fn test_extract_compare_version(data: &[u8], expect_err: Option<ErrorKind>) {
    let data_v = Bytes::from(data);
    defo!("data_v: {:?}", buffer_to_String_noraw(&data_v));
    let result = extract_compare_version(&data_v);
    defo!("result: {:?}", result);
    match expect_err {
        None => assert!(result.is_ok(), "{:?}", result),
        Some(kind) => assert_eq!(result.err().map(|e| e.kind()), Some(kind)),
    }
}

#[test]
fn test_venv_python_executable_missing() {
    let tmp = ::tempfile::tempdir().unwrap();
    assert_eq!(venv_python_executable(tmp.path()), None);
}

/// creates the test venv; needs network access to install `python-dateutil`
#[test]
#[ignore = "requires python3 in the PATH and network access"]
fn test_create() {
    defn!();
    let result = create(PythonToUse::EnvPath, None);
    assert!(result.is_ok(), "venv creation failed");
    let venv = venv_path();
    assert!(venv.join("done").exists());
    let python = venv_python_executable(venv.as_path());
    defo!("venv python {:?}", python);
    assert!(python.is_some());
    defx!();
}
