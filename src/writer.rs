// src/writer.rs

//! Persist emitted [`TestUnit`]s to a [`Destination`].
//!
//! Writing is all-or-nothing: every file is first written in full to a
//! temporary file in its destination directory. Only after every write
//! succeeded are the temporary files moved into place.

use std::io::Write;
use std::path::{
    Path,
    PathBuf,
};

#[allow(unused_imports)]
use ::si_trace_print::{
    defn,
    defo,
    defx,
    defñ,
};
use ::tempfile::NamedTempFile;

use crate::common::{
    FPath,
    path_to_fpath,
};
use crate::emitter::TestUnit;
use crate::emitter::header::{
    BANNER,
    render_file,
};
use crate::error::{
    FixtureError,
    FixtureResult,
};

/// name of the module file in directory mode
pub const MOD_FILE_NAME: &str = "mod.rs";

/// Where fixtures are written.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Destination {
    /// one file of all units to stdout
    Stdout,
    /// one file of all units
    File(PathBuf),
    /// one `<category>.rs` file per unit, plus a `mod.rs` declaring them
    Directory(PathBuf),
}

/// The files of `units` for `destination`, as (path, contents), in write
/// order. `Stdout` has the path `-`.
pub fn layout(destination: &Destination, units: &[TestUnit]) -> Vec<(PathBuf, String)> {
    match destination {
        Destination::Stdout => vec![(PathBuf::from("-"), render_file(units))],
        Destination::File(path) => vec![(path.clone(), render_file(units))],
        Destination::Directory(dir) => {
            let mut files: Vec<(PathBuf, String)> = Vec::with_capacity(units.len() + 1);
            let mut module = String::from(BANNER);
            module.push('\n');
            for unit in units.iter() {
                files.push((
                    dir.join(format!("{}.rs", unit.category)),
                    render_file(std::slice::from_ref(unit)),
                ));
                module.push_str(&format!("mod {};\n", unit.category));
            }
            files.push((dir.join(MOD_FILE_NAME), module));

            files
        }
    }
}

fn write_error(path: &Path, source: std::io::Error) -> FixtureError {
    FixtureError::Write {
        path: path_to_fpath(path),
        source,
    }
}

/// write `contents` to a new temporary file next to `path`
fn stage(path: &Path, contents: &str) -> FixtureResult<NamedTempFile> {
    defn!("{:?}", path);
    let dir: &Path = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp: NamedTempFile = NamedTempFile::new_in(dir).map_err(|err| write_error(path, err))?;
    tmp.write_all(contents.as_bytes()).map_err(|err| write_error(path, err))?;
    tmp.flush().map_err(|err| write_error(path, err))?;
    defx!("staged {:?}", tmp.path());

    Ok(tmp)
}

/// Write `units` to `destination`. Returns the paths written.
pub fn write_units(destination: &Destination, units: &[TestUnit]) -> FixtureResult<Vec<FPath>> {
    defn!("{:?}, {} units", destination, units.len());
    let files: Vec<(PathBuf, String)> = layout(destination, units);

    if let Destination::Stdout = destination {
        let mut stdout = std::io::stdout().lock();
        for (path, contents) in files.iter() {
            stdout.write_all(contents.as_bytes()).map_err(|err| write_error(path, err))?;
        }
        stdout.flush().map_err(|err| write_error(Path::new("-"), err))?;
        defx!("wrote stdout");
        return Ok(Vec::new());
    }

    if let Destination::Directory(dir) = destination {
        std::fs::create_dir_all(dir).map_err(|err| write_error(dir, err))?;
    }
    let mut staged: Vec<(PathBuf, NamedTempFile)> = Vec::with_capacity(files.len());
    for (path, contents) in files.into_iter() {
        let tmp: NamedTempFile = stage(&path, &contents)?;
        staged.push((path, tmp));
    }
    // every file is staged; dropping a `NamedTempFile` removes it so an
    // earlier failure leaves nothing behind
    let mut written: Vec<FPath> = Vec::with_capacity(staged.len());
    for (path, tmp) in staged.into_iter() {
        defo!("persist {:?}", path);
        tmp.persist(&path).map_err(|err| write_error(&path, err.error))?;
        written.push(path_to_fpath(&path));
    }
    defx!("wrote {} files", written.len());

    Ok(written)
}
