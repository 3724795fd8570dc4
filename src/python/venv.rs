// src/python/venv.rs

//! Create and manage the Python virtual environment with `dateutil`
//! installed for the oracle.

#[allow(deprecated)]
use std::env::home_dir;
use std::fs::create_dir_all;
use std::io::{
    ErrorKind,
    Error,
    Result,
};
use std::path::PathBuf;

use ::regex::bytes::Regex;
#[allow(unused_imports)]
use ::si_trace_print::{
    defñ,
    defn,
    defo,
    defx,
    def1ñ,
    def1n,
    def1o,
    def1x,
};
use ::tempfile::env::temp_dir;
use ::version_compare::{
    compare_to,
    Cmp,
};

use crate::{
    e_err,
    e_wrn,
};
#[allow(unused_imports)]
use crate::de_err;
use crate::common::{
    Bytes,
    FPath,
    Result3E,
};
use crate::python::{
    ORACLE_PACKAGE,
    ORACLE_SCRIPT,
};
use crate::python::pyrunner::{
    ChunkDelimiter,
    PipeSz,
    PyRunner,
    PythonToUse,
    RECV_TIMEOUT,
    venv_python_executable,
};

/// Minimum acceptable Python version, checked during venv creation
pub const PYTHON_VERSION_MIN: &str = "3.9";

/// pipe size for PyRunner instances used in venv creation
const PIPE_SZ: PipeSz = 16384;

/// chunk delimiter for PyRunner instances used during venv creation
const CHUNK_DELIMITER: ChunkDelimiter = b'\n';

/// only for user-facing help messages.
/// XXX: this must match the path used in `venv_path()`
pub const PYTHON_VENV_PATH_DEFAULT: &str = "~/.config/pycompat/venv";

/// return path to the pycompat venv directory.
/// does not check if it exists
pub fn venv_path() -> PathBuf {
    #[allow(deprecated)]
    let mut home: PathBuf = match home_dir() {
        Some(h) => h,
        None => temp_dir(),
    };
    home.push(".config");
    home.push("pycompat");
    home.push("venv");

    if cfg!(test) {
        // for tests, use a temporary path
        home = temp_dir();
        home.push("tmp-pycompat-test-python-venv");
    }

    defñ!("return {:?}", home);

    home
}

/// extract and compare the version
/// return `Ok` if version is acceptable
/// `data` is the output of `python --version`, e.g. `b'Python 3.9.7\n'`
pub(crate) fn extract_compare_version(data: &Bytes) -> Result<()> {
    def1n!();
    let version_re: Regex = match Regex::new(r"^Python (\d+)\.(\d+)\.(\d+)") {
        Ok(re) => re,
        Err(err) => {
            def1x!("Regex::new returned Err {:?}", err);
            return Err(Error::other(format!("failed to create python version regex; {}", err)));
        }
    };
    let captures = match version_re.captures(data) {
        Some(captures) => captures,
        None => {
            def1x!("version_re.captures returned None");
            return Err(Error::other(
                format!("failed to capture python version from output {:?}", String::from_utf8_lossy(data))
            ));
        }
    };
    // rebuild "major.minor.patch" from the captured groups
    let mut parts: Vec<&str> = Vec::with_capacity(3);
    for group in 1..=3 {
        match std::str::from_utf8(&captures[group]) {
            Ok(s) => parts.push(s),
            Err(err) => {
                def1x!("from_utf8 returned Err {:?}", err);
                return Err(Error::other(
                    format!("failed to convert python version capture to str; {}", err)
                ));
            }
        }
    }
    let version_str: String = parts.join(".");
    def1o!("Found Python version {}", version_str);
    match compare_to(&version_str, PYTHON_VERSION_MIN, Cmp::Ge) {
        Ok(true) => {
            def1o!("Python version {} is acceptable", version_str);
        }
        Ok(false) => {
            def1x!("Python version too low; return Unsupported");
            return Err(Error::new(
                ErrorKind::Unsupported,
                format!("python version {} is less than the required minimum {}", version_str, PYTHON_VERSION_MIN),
            ));
        }
        Err(err) => {
            def1x!("compare_to returned Err {:?}", err);
            return Err(Error::other(format!("failed to compare python versions {:?}", err)));
        }
    }
    def1x!("return Ok");

    Ok(())
}

/// run one venv creation step with the venv interpreter `python_path`
fn venv_step(python_path: &FPath, argv: Vec<&str>, what: &str, print_argv: bool) -> Result3E<()> {
    def1n!("{}", what);
    match PyRunner::run_once(
        PythonToUse::Value,
        PIPE_SZ,
        RECV_TIMEOUT,
        CHUNK_DELIMITER,
        Some(python_path.clone()),
        argv,
        print_argv,
    ) {
        Ok(_) => {
            def1x!("{} ok", what);

            Result3E::Ok(())
        }
        Err(err) => {
            e_err!("Failed to {}: {}", what, err);
            def1x!("{} returned {:?}", what, err);

            Result3E::ErrNoReprint(err)
        }
    }
}

/// create the Python virtual environment using [`PyRunner`]s.
/// `python_to_use` and `python_path` select the interpreter that creates
/// the venv.
pub fn create(python_to_use: PythonToUse, python_path: Option<FPath>) -> Result3E<()> {
    def1n!("{:?}, {:?}", python_to_use, python_path);

    // run `python --version` to sanity check Python
    let mut pyrunner = match PyRunner::new(
        python_to_use,
        PIPE_SZ,
        RECV_TIMEOUT,
        Some(CHUNK_DELIMITER),
        None,
        python_path,
        vec!["--version"],
    ) {
        Ok(pyrunner) => pyrunner,
        Err(err) => {
            de_err!("Failed to create first Python runner: {}", err);
            def1x!("Python --version; return Err {:?}", err);
            return Result3E::Err(err);
        }
    };
    match pyrunner.run(true, true, true) {
        Ok((stdout, _stderr)) => {
            match extract_compare_version(&stdout) {
                Ok(_) => {}
                Err(err) if err.kind() == ErrorKind::Unsupported => {
                    e_wrn!("{}", err);
                }
                Err(err) => {
                    e_err!("Failed to compare python version: {}", err);
                    def1x!("extract_compare_version returned Err {:?}", err);
                    return Result3E::ErrNoReprint(err);
                }
            }
        }
        Err(err) => {
            e_err!("Failed to run python --version: {}", err);
            def1x!("pyrunner.run() returned Err {:?}", err);
            return Result3E::ErrNoReprint(err);
        }
    }
    let python_path: FPath = pyrunner.python_path;

    let venv_path_pb: PathBuf = venv_path();
    def1o!("create_dir_all({:?})", venv_path_pb);
    if let Err(err) = create_dir_all(venv_path_pb.as_path()) {
        e_err!("Failed to create virtual environment directory {:?}: {}", venv_path_pb, err);
        def1x!("create_dir_all returned {:?}", err);
        return Result3E::ErrNoReprint(err);
    }
    if !venv_path_pb.is_dir() {
        let err_msg = format!("Python virtual environment path {:?} is not a directory", venv_path_pb);
        e_err!("{}", err_msg);
        def1x!("{}", err_msg);
        return Result3E::ErrNoReprint(Error::other(err_msg));
    }
    let venv_path_s: &str = match venv_path_pb.as_os_str().to_str() {
        Some(s) => s,
        None => {
            def1x!("failed convert path to str {:?}, return Unsupported", venv_path_pb);
            return Result3E::Err(Error::new(
                ErrorKind::Unsupported,
                format!("failed to convert path to str; {:?}", venv_path_pb),
            ));
        }
    };
    let step = venv_step(
        &python_path,
        vec!["-m", "venv", "--clear", "--prompt", "pycompat", venv_path_s],
        "create Python virtual environment",
        true,
    );
    if step.is_err() {
        return step;
    }

    // from here on use the venv interpreter
    let venv_python: FPath = match venv_python_executable(venv_path_pb.as_path()) {
        Some(p) => p,
        None => {
            let err_msg = format!("no Python interpreter found in virtual environment {:?}", venv_path_pb);
            e_err!("{}", err_msg);
            def1x!("{}", err_msg);
            return Result3E::ErrNoReprint(Error::new(ErrorKind::NotFound, err_msg));
        }
    };

    // the oracle script is long so its command line is not printed
    let steps: [(Vec<&str>, &str, bool); 4] = [
        (vec!["-m", "ensurepip"], "ensurepip", true),
        (
            vec!["-m", "pip", "config", "set", "--site", "global.disable-pip-version-check", "true"],
            "disable pip version check",
            true,
        ),
        (vec!["-m", "pip", "install", ORACLE_PACKAGE], "install python packages", true),
        (vec!["-c", ORACLE_SCRIPT, "--self-check"], "run the dateutil oracle self-check", false),
    ];
    for (argv, what, print_argv) in steps {
        let step = venv_step(&venv_python, argv, what, print_argv);
        if step.is_err() {
            def1x!("{} failed", what);
            return step;
        }
    }

    // touch special flag file to mark the venv is fully created
    let flag_path: PathBuf = venv_path_pb.join("done");
    if let Err(err) = std::fs::write(&flag_path, b"created by pycompat") {
        e_err!("Failed to create {:?}: {}", flag_path, err);
        def1x!("std::fs::write returned {:?}", err);
        return Result3E::ErrNoReprint(err);
    }

    eprintln!("Python virtual environment created at {}", venv_path_pb.display());
    eprintln!("This environment will be automatically used by pycompat for the dateutil oracle.");

    def1x!("return Ok");

    Result3E::Ok(())
}
