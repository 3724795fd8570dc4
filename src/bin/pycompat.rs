// src/bin/pycompat.rs

//! Driver program _pycompat_.
//!
//! Runs the `dateutil` oracle over the built-in catalog and writes the
//! emitted fixtures to stdout, a file, or a directory.
//!
//! Nothing is written unless every case of every selected category
//! succeeded. Any failure prints a diagnostic naming the failing case and
//! exits with a non-zero code.
//!
//! With CLI option `--venv`, creates the Python virtual environment with
//! `dateutil` installed, then exits.

#![allow(non_camel_case_types)]

use std::path::PathBuf;
use std::process::ExitCode;

use ::anyhow::Context;
use ::clap::Parser;
use ::const_format::concatcp;
use ::regex::Regex;
#[allow(unused_imports)]
use ::si_trace_print::{
    defn,
    defo,
    defx,
    defñ,
    stack::stack_offset_set,
};

use ::pycompatlib::e_err;
use ::pycompatlib::catalog::TestCatalog;
use ::pycompatlib::catalog::default::default_catalog;
use ::pycompatlib::common::{
    FPath,
    Result3E,
    summary_stats_enable,
};
use ::pycompatlib::emitter::{
    EmitConfig,
    TARGET_PATH_DEFAULT,
};
use ::pycompatlib::generator::{
    GenerateOptions,
    Generated,
    generate,
};
use ::pycompatlib::generator::summary::print_summary;
use ::pycompatlib::oracle::dateutil::DateutilOracle;
use ::pycompatlib::python::pyrunner::{
    PYTHON_ENV,
    PythonToUse,
};
use ::pycompatlib::python::venv::{
    PYTHON_VENV_PATH_DEFAULT,
    create as venv_create,
};
use ::pycompatlib::writer::{
    Destination,
    write_units,
};

#[cfg(debug_assertions)]
const CLI_HELP_AFTER_NOTE_DEBUG: &str = "\nDEBUG BUILD";
#[cfg(not(debug_assertions))]
const CLI_HELP_AFTER_NOTE_DEBUG: &str = "";

/// `--help` _afterword_ message.
const CLI_HELP_AFTER: &str = concatcp!(
    "\
Without --out or --out-dir the fixtures are printed to stdout.

The Python interpreter running the dateutil oracle is, in order of preference:
    the path passed with --python
    the path in environment variable ", PYTHON_ENV, "
    the Python virtual environment at ", PYTHON_VENV_PATH_DEFAULT, "
    the first Python interpreter found in the PATH

Create the Python virtual environment with:
    pycompat --venv
",
    CLI_HELP_AFTER_NOTE_DEBUG,
);

/// a Rust path such as `crate`, `dtparse` or `super::dtparse`
const RUST_PATH_PATTERN: &str = r"^[A-Za-z_][A-Za-z0-9_]*(::[A-Za-z_][A-Za-z0-9_]*)*$";

/// CLI argument processing
#[derive(Parser, Debug)]
#[clap(
    about = env!("CARGO_PKG_DESCRIPTION"),
    author = env!("CARGO_PKG_AUTHORS"),
    name = "pycompat",
    // write expanded information for the `--version` output
    version = concatcp!(
        "\n",
        "Version: ",
        env!("CARGO_PKG_VERSION_MAJOR"), ".",
        env!("CARGO_PKG_VERSION_MINOR"), ".",
        env!("CARGO_PKG_VERSION_PATCH"), "\n",
        "MSRV: ", env!("CARGO_PKG_RUST_VERSION"), "\n",
        "License: ", env!("CARGO_PKG_LICENSE"), "\n",
        "Author: ", env!("CARGO_PKG_AUTHORS"), "\n",
    ),
    after_help = CLI_HELP_AFTER,
    verbatim_doc_comment,
    override_usage = "\n  pycompat [OPTIONS]\n\n  pycompat --list\n\n  pycompat --venv",
)]
struct CLI_Args {
    /// Write all fixtures to this one file.
    #[clap(
        short = 'o',
        long,
        value_name = "FILE",
        conflicts_with = "out_dir",
        verbatim_doc_comment,
    )]
    out: Option<PathBuf>,

    /// Write the fixtures of each category to file "<category>.rs" in this
    /// directory, along with a "mod.rs" declaring them.
    #[clap(
        short = 'd',
        long,
        value_name = "DIR",
        verbatim_doc_comment,
    )]
    out_dir: Option<PathBuf>,

    /// Only generate this category. May be a category name, e.g.
    /// "test_parse_tzinfo", or a category kind, e.g. "fuzzy".
    /// May be passed more than once. Catalog order is kept.
    #[clap(
        short = 'c',
        long = "category",
        value_name = "NAME",
        verbatim_doc_comment,
    )]
    categories: Vec<String>,

    /// Print the catalog categories, then exit.
    #[clap(
        long,
        verbatim_doc_comment,
    )]
    list: bool,

    /// Rust path of the crate under test as used by the fixtures,
    /// e.g. "dtparse".
    #[clap(
        long,
        value_name = "PATH",
        default_value_t = String::from(TARGET_PATH_DEFAULT),
        value_parser = cli_parse_target_path,
        verbatim_doc_comment,
    )]
    target_path: String,

    /// Path of the Python interpreter running the dateutil oracle.
    #[clap(
        long,
        value_name = "PYTHON",
        verbatim_doc_comment,
    )]
    python: Option<FPath>,

    /// Create the Python virtual environment with dateutil installed,
    /// then exit.
    #[clap(
        long,
        conflicts_with_all = ["out", "out_dir", "categories", "list"],
        verbatim_doc_comment,
    )]
    venv: bool,

    /// Print a summary of the generation to stderr.
    #[clap(
        short,
        long,
        verbatim_doc_comment,
    )]
    summary: bool,
}

/// `clap` value parser of `--target-path`
fn cli_parse_target_path(path: &str) -> Result<String, String> {
    let rust_path: Regex = match Regex::new(RUST_PATH_PATTERN) {
        Ok(re) => re,
        Err(err) => return Err(err.to_string()),
    };
    if rust_path.is_match(path) {
        Ok(path.to_string())
    } else {
        Err(format!("{:?} is not a Rust path", path))
    }
}

/// the interpreter selection of `--python`
fn python_choice(python: &Option<FPath>) -> (PythonToUse, Option<FPath>) {
    match python {
        Some(path) => (PythonToUse::Value, Some(path.clone())),
        None => (PythonToUse::EnvVenvPath, None),
    }
}

/// print the catalog to stdout
fn list(catalog: &TestCatalog) {
    for category in catalog.iter() {
        println!(
            "{}\t{}\t{}{}",
            category.name(),
            category.kind().slug(),
            category.cases().len(),
            if category.skip() { "\tignored" } else { "" },
        );
    }
}

fn run(args: CLI_Args) -> ::anyhow::Result<()> {
    defn!();
    let catalog: TestCatalog = default_catalog().context("invalid built-in catalog")?;
    if args.list {
        list(&catalog);
        defx!("listed");
        return Ok(());
    }

    let destination: Destination = match (args.out, args.out_dir) {
        (Some(path), _) => Destination::File(path),
        (None, Some(dir)) => Destination::Directory(dir),
        (None, None) => Destination::Stdout,
    };
    defo!("destination {:?}", destination);
    let options = GenerateOptions {
        categories: args.categories,
        emit: EmitConfig {
            target_path: args.target_path,
        },
    };
    // select before starting the oracle so a bad selector fails fast
    catalog.select(&options.categories)?;

    let (python_to_use, python_path) = python_choice(&args.python);
    let mut oracle = DateutilOracle::new(python_to_use, python_path)
        .context("failed to start the dateutil oracle")?;
    defo!("oracle {:?}", oracle);
    let mut generated: Generated = generate(&catalog, &mut oracle, &options)?;
    generated.summary.process = Some(oracle.close()?);

    let written: Vec<FPath> = write_units(&destination, &generated.units)?;
    if args.summary {
        print_summary(&generated.summary, &written);
    }
    defx!();

    Ok(())
}

pub fn main() -> ExitCode {
    if cfg!(debug_assertions) {
        stack_offset_set(Some(0));
    }
    defn!();
    let args = CLI_Args::parse();
    defo!("args {:?}", args);

    if args.summary {
        summary_stats_enable();
    }

    if args.venv {
        // the venv cannot be created by its own interpreter
        let (python_to_use, python_path) = match &args.python {
            Some(path) => (PythonToUse::Value, Some(path.clone())),
            None => (PythonToUse::EnvPath, None),
        };
        let exitcode: ExitCode = match venv_create(python_to_use, python_path) {
            Result3E::Ok(_) => ExitCode::SUCCESS,
            Result3E::Err(err) => {
                e_err!("{}", err);
                ExitCode::FAILURE
            }
            Result3E::ErrNoReprint(_err) => ExitCode::FAILURE,
        };
        defx!("exitcode {:?}", exitcode);

        return exitcode;
    }

    let exitcode: ExitCode = match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            e_err!("{:#}", err);
            ExitCode::FAILURE
        }
    };
    defx!("exitcode {:?}", exitcode);

    exitcode
}
