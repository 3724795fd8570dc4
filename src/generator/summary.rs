// src/generator/summary.rs

//! Statistics of one generation run, printed with CLI option `--summary`.

use std::path::PathBuf;
use std::time::Duration;

use crate::de_err;
use crate::common::{
    Count,
    FPath,
};
use crate::python::pyrunner::{
    PythonPathsRan,
    SummaryPyRunner,
};

/// One category as generated.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CategorySummary {
    pub name: String,
    pub kind: &'static str,
    pub cases: usize,
    pub skip: bool,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Summary {
    pub categories: Vec<CategorySummary>,
    /// requests made of the oracles
    pub oracle_requests: Count,
    /// bytes of emitted fixture text, excluding file headers
    pub emitted_bytes: usize,
    /// wall-clock time of generation
    pub elapsed: Duration,
    /// the oracle process, once closed
    pub process: Option<SummaryPyRunner>,
}

impl Summary {
    pub fn fixtures(&self) -> usize {
        self.categories.iter().map(|c| c.cases).sum()
    }

    pub fn fixtures_ignored(&self) -> usize {
        self.categories.iter().filter(|c| c.skip).map(|c| c.cases).sum()
    }
}

/// Print `summary` to stderr. `written` lists the files written, if any.
pub fn print_summary(summary: &Summary, written: &[FPath]) {
    eprintln!("Program Summary:\n");
    for category in summary.categories.iter() {
        eprintln!(
            "Category {:<30}: {:>4} fixtures ({}{})",
            category.name,
            category.cases,
            category.kind,
            if category.skip { ", ignored" } else { "" },
        );
    }
    eprintln!();
    eprintln!("Categories             : {}", summary.categories.len());
    eprintln!("Fixtures               : {}", summary.fixtures());
    eprintln!("Fixtures ignored       : {}", summary.fixtures_ignored());
    eprintln!("Oracle requests        : {}", summary.oracle_requests);
    eprintln!("Emitted bytes          : {}", summary.emitted_bytes);
    for path in written.iter() {
        eprintln!("Written                : {}", path);
    }
    // print the python executables that were run
    if let Ok(python_exes_ran) = PythonPathsRan.read() {
        for python_exe in python_exes_ran.iter() {
            eprint!("Python Interpreter     : {}", python_exe);
            // print the realpath if different than `python_exe`
            let path_: PathBuf = PathBuf::from(python_exe);
            match path_.canonicalize() {
                Ok(pathbuf) => {
                    if let Some(path_s) = pathbuf.to_str() {
                        if path_s != python_exe.as_str() {
                            eprint!(" ({})", path_s);
                        }
                    }
                }
                Err(_err) => {
                    de_err!("canonicalize failed for {:?}; {}", path_, _err);
                }
            }
            eprintln!();
        }
    }
    if let Some(process) = summary.process.as_ref() {
        eprintln!("Python process writes  : {}", process.count_proc_writes);
        eprintln!("Python process polls   : {}", process.count_proc_polls);
        eprintln!("Python process waiting : {:.3} (seconds)", process.duration_proc_wait.as_secs_f64());
        if let Some(run) = process.duration_proc_run {
            eprintln!("Python process run time: {:.3} (seconds)", run.as_secs_f64());
        }
    }
    eprintln!("Generation Run Time    : {:.3} (seconds)", summary.elapsed.as_secs_f64());
}
