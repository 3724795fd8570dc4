// src/python/pyrunner.rs

//! Runs a Python process instance that hosts the `dateutil` oracle.
//! It communicates with the Python process over threaded
//! `PipeStreamReader`s connected to stdout and stderr, and writes to stdin.
//! It uses `std::process::Child` to start and manage the Python process.
//!
//! The reader threads only move bytes from the child's pipes into channels.
//! Requests and replies are strictly sequential: one request line is written
//! and one reply line is read before the next request.

use std::cmp::min;
use std::collections::{
    HashSet,
    VecDeque,
};
use std::env;
use std::io::{
    Error,
    ErrorKind,
    Read,
    Result,
    Write,
    stderr,
    stdout,
};
use std::path::PathBuf;
use std::process::{
    Child,
    Command,
    Stdio,
};
use std::sync::RwLock;
use std::thread;
use std::time::{
    Duration,
    Instant,
};

use ::crossbeam_channel::{
    Receiver,
    RecvError,
    RecvTimeoutError,
    Select,
    Sender,
};
use ::lazy_static::lazy_static;
use ::memchr::memchr;
use ::once_cell::sync::OnceCell;
use ::pathsearch::find_executable_in_path;
use ::shell_escape::escape;
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
    def2n,
    def2o,
    def2x,
};

use crate::{
    de_err,
    debug_assert_none,
    debug_panic,
    summary_stat,
};
use crate::common::{
    Bytes,
    Count,
    FPath,
    NLu8,
    path_to_fpath,
    threadid_to_u64,
};
use crate::debug::printers::buffer_to_String_noraw;
use crate::python::venv::venv_path;

/// Python process exit result
pub type ExitStatus = std::process::ExitStatus;

/// Size of pipe read buffers in bytes
pub type PipeSz = usize;

/// Delimiter byte used to separate chunks of data read from the Python process
pub type ChunkDelimiter = u8;

/// Names of possible Python executables that could be found in path
pub const PYTHON_NAMES: [&str; 13] = [
    "python3",
    "python",
    "python3.exe",
    "python.exe",
    "python39",
    "python310",
    "python311",
    "python312",
    "python313",
    "python314",
    "python3.13",
    "pypy3",
    "pypy",
];

/// Possible subdirectories within a Python installation where the Python
/// interpreter executable may be found
pub const PYTHON_SUBDIRS: [&str; 3] = [
    "bin",
    "Scripts",
    "",
];

pub const PROMPT_DEFAULT: &str = "$ ";

pub const CHANNEL_CAPACITY: usize = 16;

/// Environment variable that refers to the exact path to a Python interpreter
/// executable
pub const PYTHON_ENV: &str = "PYCOMPAT_PYTHON";

/// default timeout for Pipe `recv_timeout` when reading from the child Python process
pub const RECV_TIMEOUT: Duration = Duration::from_millis(5);

/// stderr history kept for error messages, in bytes
const STDERR_ALL_MAX: usize = 4096;

/// cached Python path found in environment variable `PYCOMPAT_PYTHON`.
/// set in `find_python_executable`
#[allow(non_upper_case_globals)]
pub static PythonPathEnv: OnceCell<Option<FPath>> = OnceCell::new();
/// cached Python path found in path, set in `find_python_executable`
#[allow(non_upper_case_globals)]
pub static PythonPathPath: OnceCell<Option<FPath>> = OnceCell::new();
/// cached Python path in the pycompat venv, set in `find_python_executable`
#[allow(non_upper_case_globals)]
pub static PythonPathVenv: OnceCell<Option<FPath>> = OnceCell::new();

lazy_static! {
    /// Summary statistic.
    /// Record which Python interpreters ran.
    pub static ref PythonPathsRan: RwLock<HashSet<FPath>> = {
        defñ!("init PythonPathsRan");

        RwLock::new(HashSet::<FPath>::new())
    };
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PythonToUse {
    /// only use Python referred to by environment variable `PYCOMPAT_PYTHON`
    Env,
    /// only use Python found in the `PATH`
    Path,
    /// use Python referred to by environment variable `PYCOMPAT_PYTHON` if set
    /// but if not set then use Python found in the `PATH`
    EnvPath,
    /// only use Python in the pycompat venv
    Venv,
    /// try `PYCOMPAT_PYTHON`, then the pycompat venv, then the `PATH`.
    /// The oracle uses this.
    EnvVenvPath,
    /// use a passed value
    Value,
}

/// find a Python executable.
/// `python_to_use` instructs how to find the Python executable.
/// Does not check if the found Python executable is valid.
/// Caches found paths.
/// Returns `None` when passed `PythonToUse::Value`.
pub fn find_python_executable(python_to_use: PythonToUse) -> &'static Option<FPath> {
    defn!("{:?}", python_to_use);

    match python_to_use {
        PythonToUse::Env => {
            let ret: &Option<FPath> = PythonPathEnv.get_or_init(||
                match env::var(PYTHON_ENV) {
                    Ok(val) if !val.is_empty() => {
                        defo!("env::var found {}={:?}", PYTHON_ENV, val);
                        Some(val)
                    }
                    Ok(_) => None,
                    Err(_err) => {
                        defo!("env::var did not find {:?}; {:?}", PYTHON_ENV, _err);
                        None
                    }
                }
            );
            defx!("{:?}, return {:?}", python_to_use, ret);

            ret
        }
        PythonToUse::Path => {
            let ret: &Option<FPath> = PythonPathPath.get_or_init(|| {
                for name in PYTHON_NAMES.iter() {
                    defo!("find_executable_in_path({:?})", name);
                    if let Some(p) = find_executable_in_path(name) {
                        defo!("find_executable_in_path returned {:?}", p);
                        return Some(path_to_fpath(p.as_path()));
                    }
                }
                None
            });
            defx!("{:?}, return {:?}", python_to_use, ret);

            ret
        }
        PythonToUse::EnvPath => {
            let p = find_python_executable(PythonToUse::Env);
            if p.is_some() {
                defx!("{:?}, return {:?}", python_to_use, p);
                return p;
            }
            let p = find_python_executable(PythonToUse::Path);
            defx!("{:?}, return {:?}", python_to_use, p);

            p
        }
        PythonToUse::Venv => {
            let ret: &Option<FPath> = PythonPathVenv.get_or_init(|| {
                let venv: PathBuf = venv_path();
                defo!("venv={:?}", venv);
                // a venv is only used once it is fully created
                if !venv.join("done").exists() {
                    defo!("venv not marked done");
                    return None;
                }
                venv_python_executable(venv.as_path())
            });
            defx!("{:?}, return {:?}", python_to_use, ret);

            ret
        }
        PythonToUse::EnvVenvPath => {
            for to_use in [PythonToUse::Env, PythonToUse::Venv, PythonToUse::Path] {
                let p = find_python_executable(to_use);
                if p.is_some() {
                    defx!("{:?} via {:?}, return {:?}", python_to_use, to_use, p);
                    return p;
                }
            }
            defx!("{:?}, return None", python_to_use);

            &None
        }
        PythonToUse::Value => {
            de_err!("PythonToUse::Value should not be used in find_python_executable");
            defx!("{:?}, return None", python_to_use);

            &None
        }
    }
}

/// find the Python interpreter within the venv directory `venv`.
/// Not cached.
pub fn venv_python_executable(venv: &std::path::Path) -> Option<FPath> {
    for dir in PYTHON_SUBDIRS.iter() {
        let mut venv_dir: PathBuf = venv.to_path_buf();
        if !dir.is_empty() {
            venv_dir.push(dir);
        }
        for name in PYTHON_NAMES.iter() {
            let venv_name = venv_dir.join(name);
            if venv_name.exists() {
                let fp = path_to_fpath(venv_name.as_path());
                defñ!("found venv python executable: {:?}", fp);
                return Some(fp);
            }
        }
    }
    defñ!("no python executable in {:?}", venv);

    None
}

/// Summary statistics of one `PyRunner`, see [`PyRunner::summary`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SummaryPyRunner {
    /// writes to the process stdin
    pub count_proc_writes: Count,
    /// polls of the process
    pub count_proc_polls: Count,
    /// time spent waiting on the process
    pub duration_proc_wait: Duration,
    /// run time of the process, if it has exited
    pub duration_proc_run: Option<Duration>,
}

#[derive(Debug)]
enum PipedChunk {
    /// a chunk of bytes read from the child process
    Chunk(Bytes),
    /// process not sending but still running
    Continue,
    /// process exited or no more data to read
    /// contains number of reads performed and remaining bytes
    Done(u64, Bytes),
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
enum ProcessStatus {
    #[default]
    Running,
    Exited,
}

/// Reads data from a child process pipe in a thread and passes chunks of
/// data to the owning `PyRunner`.
/// Chunks end with the passed `chunk_delimiter_opt` if set.
/// If `chunk_delimiter_opt` is `None` then each read immediately passes any
/// data read.
///
/// Inspired by gist [ArtemGr/db40ae04b431a95f2b78](https://gist.github.com/ArtemGr/db40ae04b431a95f2b78).
struct PipeStreamReader {
    chunk_receiver: Receiver<core::result::Result<PipedChunk, Error>>,
    exit_sender: Sender<ProcessStatus>,
}

impl PipeStreamReader {
    /// Starts a thread reading bytes from a child process pipe.
    ///
    /// `name` and `pid` are only used for debugging messages.
    fn new(
        name: String,
        pid: u32,
        pipe_sz: PipeSz,
        recv_timeout: Duration,
        chunk_delimiter_opt: Option<ChunkDelimiter>,
        mut stream_child_proc: Box<dyn Read + Send>
    ) -> PipeStreamReader
    {
        def1n!("PipeStreamReader new(pipe_sz={}, name={:?}, chunk_delimiter_opt={:?})",
               pipe_sz, name, chunk_delimiter_opt);
        let (tx_exit, rx_exit) = ::crossbeam_channel::bounded(CHANNEL_CAPACITY);
        let (tx_parent, rx_parent) = ::crossbeam_channel::bounded(CHANNEL_CAPACITY);

        let thread_name: String = format!("{}_PipeStreamReader", name);
        let _tidn_p: u64 = threadid_to_u64(thread::current().id());
        let result = thread::Builder::new().name(thread_name.clone()).spawn(move ||
        {
            let _d_p = format!(
                "PipeStreamReader {:?} PID {:?} PTID {:?} TID {:?}",
                name, pid, _tidn_p, threadid_to_u64(thread::current().id()));
            def2n!("{_d_p} start, pipe_sz {}", pipe_sz);
            let mut reads: u64 = 0;
            let mut buf = Bytes::with_capacity(pipe_sz);
            // data read that does not yet end with the delimiter
            let mut buf_pending: Bytes = Bytes::with_capacity(
                if chunk_delimiter_opt.is_some() { pipe_sz } else { 0 }
            );
            loop {
                reads += 1;
                buf.clear();
                buf.resize(pipe_sz, 0);
                match stream_child_proc.read(&mut buf) {
                    Ok(0) => {
                        def2o!("{_d_p} read zero bytes");
                        // the child may have exited; wait briefly for the owner
                        // to confirm so this does not become a busy loop
                        match rx_exit.recv_timeout(recv_timeout) {
                            Ok(ProcessStatus::Exited) => {
                                def2o!("{_d_p} Exited; send Done({}, {} bytes)", reads, buf_pending.len());
                                let _ = tx_parent.send(Ok(PipedChunk::Done(reads, buf_pending)));
                                break;
                            }
                            Ok(ProcessStatus::Running)
                            | Err(RecvTimeoutError::Timeout) => {}
                            Err(RecvTimeoutError::Disconnected) => {
                                def2o!("{_d_p} exit channel disconnected; break");
                                break;
                            }
                        }
                        if tx_parent.is_empty() && tx_parent.send(Ok(PipedChunk::Continue)).is_err() {
                            def2o!("{_d_p} parent channel disconnected; break");
                            break;
                        }
                    }
                    Ok(len) => {
                        def2o!("{_d_p} (read #{}) read {} bytes '{}'",
                               reads, len, buffer_to_String_noraw(&buf[..len]));
                        let chunk_delimiter: ChunkDelimiter = match chunk_delimiter_opt {
                            Some(delim) => delim,
                            None => {
                                if tx_parent.send(Ok(PipedChunk::Chunk(buf[..len].to_vec()))).is_err() {
                                    break;
                                }
                                continue;
                            }
                        };
                        // send every delimited chunk, keep the remainder pending
                        let mut at: usize = 0;
                        let mut disconnected: bool = false;
                        while at < len {
                            match memchr(chunk_delimiter, &buf[at..len]) {
                                Some(pos) => {
                                    buf_pending.extend_from_slice(&buf[at..at + pos + 1]);
                                    let chunk: Bytes = std::mem::replace(
                                        &mut buf_pending, Bytes::with_capacity(pipe_sz)
                                    );
                                    if tx_parent.send(Ok(PipedChunk::Chunk(chunk))).is_err() {
                                        disconnected = true;
                                        break;
                                    }
                                    at += pos + 1;
                                }
                                None => {
                                    buf_pending.extend_from_slice(&buf[at..len]);
                                    break;
                                }
                            }
                        }
                        if disconnected {
                            def2o!("{_d_p} parent channel disconnected; break");
                            break;
                        }
                    }
                    Err(error) => {
                        if error.kind() == ErrorKind::Interrupted {
                            continue;
                        }
                        def2o!("{_d_p} read error {}; send Error", error);
                        if tx_parent.send(Err(error)).is_err() {
                            break;
                        }
                    }
                }
            }
            def2x!("{_d_p} exit, child process reads {}", reads);
        });
        if let Err(_err) = result {
            de_err!("PipeStreamReader thread {:?} spawn error: {}", thread_name, _err);
        }
        def1x!("PipeStreamReader {:?} return", thread_name);

        PipeStreamReader {
            chunk_receiver: rx_parent,
            exit_sender: tx_exit,
        }
    }
}

/// `PyRunner` represents a Python process instance. It hides
/// the complications of starting and communicating with a Python process
/// over pipes.
///
/// _XXX:_ `PyO3` would embed an interpreter in this process instead. But the
/// oracle must be the `dateutil` installed for a chosen interpreter, possibly
/// a venv, which is simpler to honor with a child process.
pub struct PyRunner {
    /// handle to the Python process
    pub process: Child,
    pipe_stdout: PipeStreamReader,
    pipe_stderr: PipeStreamReader,
    /// arguments of the process
    argv: Vec<String>,
    /// path to Python exectuable
    pub python_path: FPath,
    /// save the `ExitStatus`
    exit_status: Option<ExitStatus>,
    pipe_stdout_eof: bool,
    pipe_stderr_eof: bool,
    /// protect against sending repeat exit messages to child pipe threads.
    pipe_sent_exit: bool,
    /// pipe buffer size in bytes for stdout `PipeStreamReader`
    pub pipe_sz_stdout: PipeSz,
    /// pipe buffer size in bytes for stderr `PipeStreamReader`
    pub pipe_sz_stderr: PipeSz,
    /// `Instant` Python process was started.
    time_beg: Instant,
    /// `Instant` the Python process was first known to be exited.
    time_end: Option<Instant>,
    /// process ID of the Python process
    pid_: u32,
    /// debug message prepend
    _d_p: String,
    /// stderr is kept because an error is often printed well before the
    /// process is known to have exited. oldest stderr data nearest the front
    stderr_all: Option<VecDeque<u8>>,
    /// Summary statistic.
    /// count of writes to Python process stdin
    pub(crate) count_proc_writes: Count,
    /// Summary statistic.
    /// count of polls of Python process
    pub(crate) count_proc_polls: Count,
    /// Summary statistic.
    /// Duration of waiting on the Python process
    pub(crate) duration_proc_wait: Duration,
    /// first seen error
    pub(crate) error: Option<Error>,
}

impl std::fmt::Debug for PyRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PyRunner")
            .field("process", &self.process)
            .field("argv", &self.argv)
            .field("python_path", &self.python_path)
            .field("exit_status", &self.exit_status)
            .field("pipe_stdout_eof", &self.pipe_stdout_eof)
            .field("pipe_stderr_eof", &self.pipe_stderr_eof)
            .field("pipe_sent_exit", &self.pipe_sent_exit)
            .field("pipe_sz_stdout", &self.pipe_sz_stdout)
            .field("pipe_sz_stderr", &self.pipe_sz_stderr)
            .field("time_beg", &self.time_beg)
            .field("time_end", &self.time_end)
            .field("pid_", &self.pid_)
            .finish()
    }
}

impl PyRunner {
    /// Create a new `PyRunner` instance.
    ///
    /// `python_to_use` indicates which Python executable to use.
    /// If `PythonToUse::Value` is used then `python_path` must be `Some(FPath)`.
    /// Otherwise `python_path` must be `None`.
    ///
    /// `argv` is the list of arguments to pass to the Python executable.
    pub fn new(
        python_to_use: PythonToUse,
        pipe_sz: PipeSz,
        recv_timeout: Duration,
        chunk_delimiter_stdout: Option<ChunkDelimiter>,
        chunk_delimiter_stderr: Option<ChunkDelimiter>,
        python_path: Option<FPath>,
        argv: Vec<&str>
    ) -> Result<Self> {
        def1n!("python_to_use {:?}, python_path {:?}, pipe_sz {:?}, argv {:?}",
            python_to_use, python_path, pipe_sz, argv);

        let python_path_: FPath = if python_to_use == PythonToUse::Value {
            match python_path {
                Some(val) => val,
                None => {
                    let s = String::from("PyRunner::new: python_path must be Some(FPath) when python_to_use is Value");
                    def1x!("Error InvalidInput {}", s);
                    return Err(Error::new(ErrorKind::InvalidInput, s));
                }
            }
        } else {
            debug_assert_none!(python_path, "python_path must be None unless python_to_use is Value");
            match find_python_executable(python_to_use) {
                Some(s) => s.clone(),
                None => {
                    let s = format!(
                        "failed to find a Python interpreter; create the Python virtual environment with command --venv, or specify the Python interpreter path using --python or environment variable {}",
                        PYTHON_ENV
                    );
                    def1x!("{}", s);
                    return Err(Error::new(ErrorKind::NotFound, s));
                }
            }
        };
        def1o!("Using Python executable: {:?}", python_path_);

        summary_stat!(
            match PythonPathsRan.write() {
                Ok(mut set) => {
                    set.insert(python_path_.clone());
                }
                Err(err) => {
                    def1x!("Failed to acquire write lock on PythonPathsRan: {}", err);
                    return Err(Error::other(
                        format!("Failed to acquire write lock on PythonPathsRan: {}", err)
                    ));
                }
            }
        );

        def1o!("Command::new({:?}).args({:?}).spawn()", python_path_, argv);
        let time_beg: Instant = Instant::now();
        let mut process: Child = match Command::new(python_path_.as_str())
            .args(argv.iter())
            // the oracle protocol is ASCII but stderr tracebacks may not be
            .env("PYTHONIOENCODING", "utf-8")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
        {
            Ok(p) => p,
            Err(err) => {
                def1x!("Failed to start Python process: {}", err);
                return Err(Error::new(
                    err.kind(),
                    format!("Python process failed to start: Python path {:?}; {}", python_path_, err),
                ));
            }
        };

        let mut argv_: Vec<String> = Vec::with_capacity(argv.len() + 1);
        argv_.push(python_path_.clone());
        argv_.extend(argv.iter().map(|a| a.to_string()));

        let pid: u32 = process.id();
        let _d_p = format!("Python process {}", pid);

        let process_stdout = match process.stdout.take() {
            Some(s) => s,
            None => {
                let s = format!("{_d_p} stdout was None");
                def1x!("{}", s);
                return Err(Error::other(s));
            }
        };
        let process_stderr = match process.stderr.take() {
            Some(s) => s,
            None => {
                let s = format!("{_d_p} stderr was None");
                def1x!("{}", s);
                return Err(Error::other(s));
            }
        };

        let pipe_sz_stdout: PipeSz = pipe_sz;
        let pipe_stdout = PipeStreamReader::new(
            String::from("stdout"),
            pid,
            pipe_sz_stdout,
            recv_timeout,
            chunk_delimiter_stdout,
            Box::new(process_stdout)
        );
        // stderr pipe capped at 4096 bytes
        let pipe_sz_stderr: PipeSz = min(pipe_sz, 4096);
        let pipe_stderr = PipeStreamReader::new(
            String::from("stderr"),
            pid,
            pipe_sz_stderr,
            recv_timeout,
            chunk_delimiter_stderr,
            Box::new(process_stderr)
        );

        def1x!("{_d_p} PyRunner created");

        Ok(Self {
            process,
            pipe_stdout,
            pipe_stderr,
            argv: argv_,
            python_path: python_path_,
            exit_status: None,
            pipe_stdout_eof: false,
            pipe_stderr_eof: false,
            pipe_sent_exit: false,
            pipe_sz_stdout,
            pipe_sz_stderr,
            pid_: pid,
            _d_p,
            stderr_all: None,
            time_beg,
            time_end: None,
            count_proc_writes: 0,
            count_proc_polls: 0,
            duration_proc_wait: Duration::default(),
            error: None,
        })
    }

    pub fn pid(&self) -> u32 {
        self.pid_
    }

    /// Returns the process exit status.
    /// If the process has not exited yet, returns `None`.
    pub fn exit_status(&self) -> Option<ExitStatus> {
        self.exit_status
    }

    /// Summary statistics collected so far. Counts are only collected when
    /// summary statistics are enabled.
    pub fn summary(&self) -> SummaryPyRunner {
        SummaryPyRunner {
            count_proc_writes: self.count_proc_writes,
            count_proc_polls: self.count_proc_polls,
            duration_proc_wait: self.duration_proc_wait,
            duration_proc_run: self.duration(),
        }
    }

    /// Returns `true` if the process exited successfully.
    pub fn exit_okay(&self) -> bool {
        matches!(self.exit_status, Some(status) if status.success())
    }

    /// convert a `RecvError` into an `Error`
    fn new_error_from_recverror(&self, recverror: &RecvError) -> Error {
        Error::other(format!("Python process {} RecvError: {}", self.pid_, recverror))
    }

    /// Returns all stderr data accumulated so far.
    /// oldest stderr data nearest the front
    pub fn stderr_all(&mut self) -> Option<&[u8]> {
        match &mut self.stderr_all {
            Some(v) => Some(v.make_contiguous()),
            None => None,
        }
    }

    /// Poll the Python process to see if it has exited.
    /// If the process has exited, returns `Some(ExitStatus)`.
    /// If the process is still running, returns `None`.
    pub fn poll(&mut self) -> Option<ExitStatus> {
        def1n!("{} poll()", self._d_p);

        summary_stat!(self.count_proc_polls += 1);

        match self.process.try_wait() {
            Ok(Some(exit_status)) => {
                if self.time_end.is_none() {
                    self.time_end = Some(Instant::now());
                }
                if self.exit_status.is_none() {
                    self.exit_status = Some(exit_status);
                }
                def1x!("{} exited {:?}", self._d_p, exit_status);
                self.pipes_exit_sender(ProcessStatus::Exited);

                Some(exit_status)
            }
            Ok(None) => {
                def1x!("{} is still running", self._d_p);

                None
            }
            Err(err) => {
                def1x!("{} poll error: {}", self._d_p, err);
                self.error = Some(err);
                self.pipes_exit_sender(ProcessStatus::Exited);

                None
            }
        }
    }

    /// Accumulate stderr data up to `STDERR_ALL_MAX` bytes, dropping the
    /// oldest data first.
    fn stderr_all_add(&mut self, stderr_data: &[u8]) {
        let se: &mut VecDeque<u8> = self.stderr_all.get_or_insert_with(||
            VecDeque::<u8>::with_capacity(min(stderr_data.len(), STDERR_ALL_MAX))
        );
        se.extend(stderr_data.iter());
        if se.len() > STDERR_ALL_MAX {
            let to_drop: usize = se.len() - STDERR_ALL_MAX;
            se.drain(..to_drop);
        }
    }

    /// Send exit message to both stdout and stderr pipe threads.
    /// May be called multiple times but only the first call has effect.
    fn pipes_exit_sender(&mut self, pe: ProcessStatus) {
        if self.pipe_sent_exit {
            return;
        }
        def2n!("{} pipes_exit_sender({:?})", self._d_p, pe);
        self.pipe_stdout.exit_sender.send(pe).unwrap_or(());
        self.pipe_stderr.exit_sender.send(pe).unwrap_or(());
        self.pipe_sent_exit = true;
    }

    /// receive one message from a pipe thread. Returns the data received
    /// and whether the pipe reached EOF.
    fn recv_piped(
        &mut self,
        received: std::result::Result<std::result::Result<PipedChunk, Error>, RecvError>,
    ) -> (Option<Bytes>, bool) {
        match received {
            Ok(Ok(PipedChunk::Chunk(chunk))) => (Some(chunk), false),
            Ok(Ok(PipedChunk::Continue)) => (None, false),
            Ok(Ok(PipedChunk::Done(_reads, remaining))) => {
                def1o!("{} Done({} reads, {} remaining bytes)", self._d_p, _reads, remaining.len());
                self.pipes_exit_sender(ProcessStatus::Exited);
                if remaining.is_empty() {
                    (None, true)
                } else {
                    (Some(remaining), true)
                }
            }
            Ok(Err(error)) => {
                de_err!("Error reading from Python process {}: {:?}", self.pid_, error);
                self.error = Some(error);
                self.pipes_exit_sender(ProcessStatus::Exited);

                (None, true)
            }
            Err(recverror) => {
                def1o!("{} channel RecvError {}", self._d_p, recverror);
                self.error = Some(self.new_error_from_recverror(&recverror));
                self.pipes_exit_sender(ProcessStatus::Exited);

                (None, true)
            }
        }
    }

    /// Write `input_data` to stdin then read from the Python process stdout
    /// or stderr, whichever is ready first.
    /// Returns (`exited`, `stdout`, `stderr`).
    ///
    /// All stderr read is also kept in `stderr_all` since the crucial error
    /// information, e.g. a Python stack trace, often arrives before the
    /// process is known to have exited.
    pub fn write_read(&mut self, input_data: Option<&[u8]>) -> (bool, Option<Bytes>, Option<Bytes>) {
        def1n!("{} input_data: {} bytes", self._d_p, input_data.unwrap_or(&[]).len());

        if let Some(_exit_status) = self.poll() {
            def1o!("{} already exited before read", self._d_p);
        }

        if !self.exited() {
            if let Some(input_data_) = input_data.filter(|d| !d.is_empty()) {
                match self.process.stdin.as_mut() {
                    Some(stdin) => {
                        def1o!("{} writing '{}' to stdin", self._d_p, buffer_to_String_noraw(input_data_));
                        match stdin.write_all(input_data_).and_then(|_| stdin.flush()) {
                            Ok(_) => {
                                summary_stat!(self.count_proc_writes += 1);
                            }
                            Err(err) => {
                                de_err!("Error writing to Python process {} stdin: {:?}", self.pid_, err);
                                self.error = Some(err);
                                self.pipes_exit_sender(ProcessStatus::Exited);
                            }
                        }
                    }
                    None => {
                        de_err!("{} stdin is None", self._d_p);
                    }
                }
            }
        }

        // block until either channel has data available
        let mut sel = Select::new();
        // `Select` indexes start at zero so add one to distinguish "not selected"
        let sel_out: usize = if !self.pipe_stdout_eof {
            sel.recv(&self.pipe_stdout.chunk_receiver) + 1
        } else { 0 };
        let sel_err: usize = if !self.pipe_stderr_eof {
            sel.recv(&self.pipe_stderr.chunk_receiver) + 1
        } else { 0 };
        if sel_out == 0 && sel_err == 0 {
            def1x!("{} both stdout and stderr EOF; return", self._d_p);
            return (self.exited_exhausted(), None, None);
        }

        let d1: Instant = Instant::now();
        let sel_oper = sel.select();
        summary_stat!(self.duration_proc_wait += d1.elapsed());
        let sel_index: usize = sel_oper.index() + 1;

        debug_assert!(sel_index == sel_out || sel_index == sel_err,
            "{} selected unknown index {}", self._d_p, sel_index);
        let from_stdout: bool = sel_index == sel_out;
        let received = if from_stdout {
            sel_oper.recv(&self.pipe_stdout.chunk_receiver)
        } else {
            sel_oper.recv(&self.pipe_stderr.chunk_receiver)
        };
        drop(sel);

        let mut stdout_data: Option<Bytes> = None;
        let mut stderr_data: Option<Bytes> = None;
        let (data, eof) = self.recv_piped(received);
        if from_stdout {
            stdout_data = data;
            if eof {
                self.pipe_stdout_eof = true;
            }
        } else {
            if let Some(data_) = data.as_ref() {
                self.stderr_all_add(data_);
            }
            stderr_data = data;
            if eof {
                self.pipe_stderr_eof = true;
            }
        }

        def1x!("{} return ({}, stdout {:?} bytes (eof? {}), stderr {:?} bytes (eof? {}))",
            self._d_p,
            self.exited_exhausted(),
            stdout_data.as_ref().map(|d| d.len()),
            self.pipe_stdout_eof,
            stderr_data.as_ref().map(|d| d.len()),
            self.pipe_stderr_eof,
        );

        (self.exited_exhausted(), stdout_data, stderr_data)
    }

    /// Write `request` to stdin, then read stdout until one complete line,
    /// ending with a newline, has arrived. stdout must be delimited by
    /// newline, see `PyRunner::new` parameter `chunk_delimiter_stdout`.
    ///
    /// Returns `Ok(None)` if the process exited before replying with a
    /// complete line.
    pub fn write_read_line(&mut self, request: &[u8]) -> Result<Option<Bytes>> {
        def1n!("{} request {} bytes", self._d_p, request.len());
        let mut line: Bytes = Bytes::with_capacity(256);
        let mut input: Option<&[u8]> = Some(request);
        loop {
            let (exited, stdout_data, _stderr_data) = self.write_read(input.take());
            if let Some(err) = self.error.take() {
                def1x!("{} error {}", self._d_p, err);
                return Err(err);
            }
            if let Some(data) = stdout_data {
                line.extend_from_slice(data.as_slice());
                if line.last() == Some(&NLu8) {
                    def1x!("{} reply '{}'", self._d_p, buffer_to_String_noraw(&line));
                    return Ok(Some(line));
                }
            }
            if exited {
                def1x!("{} exited before a complete reply; partial reply {} bytes", self._d_p, line.len());
                return Ok(None);
            }
        }
    }

    /// Close the stdin of the Python process, signaling no more input.
    pub fn close_stdin(&mut self) {
        def1ñ!("{} close stdin", self._d_p);
        // dropping `ChildStdin` closes it
        drop(self.process.stdin.take());
    }

    /// Has `poll` or `wait` already returned an `ExitStatus`?
    pub fn exited(&self) -> bool {
        self.exit_status.is_some()
    }

    /// Has `poll` or `wait` already returned an `ExitStatus`
    /// *and* have both stdout and stderr streams reached EOF?
    pub fn exited_exhausted(&self) -> bool {
        self.exit_status.is_some() && self.pipe_stdout_eof && self.pipe_stderr_eof
    }

    /// Wait for the Python process to exit.
    /// If the process has already exited then return the saved `ExitStatus`.
    pub fn wait(&mut self) -> Result<ExitStatus> {
        if let Some(status) = self.exit_status {
            def1ñ!("{} exited; return {:?}", self._d_p, status);
            return Ok(status);
        }
        def1n!("{} wait()", self._d_p);
        let d1: Instant = Instant::now();
        let rc = self.process.wait();
        summary_stat!(self.duration_proc_wait += d1.elapsed());
        match rc {
            Ok(exit_status) => {
                self.time_end = Some(Instant::now());
                self.exit_status = Some(exit_status);
                self.pipes_exit_sender(ProcessStatus::Exited);
                def1x!("{} wait returned {:?}", self._d_p, exit_status);

                Ok(exit_status)
            }
            Err(error) => {
                def1x!("{} error wait returned {:?}", self._d_p, error);

                Err(Error::new(
                    error.kind(),
                    format!("Python process {} wait() failed: {}", self.pid_, error),
                ))
            }
        }
    }

    /// Total run duration of the process; imprecise as the end time is merely
    /// the first `Instant` a `poll` or `wait` returned an `ExitStatus`.
    ///
    /// Returns `None` if the process is not yet known to have exited.
    pub fn duration(&self) -> Option<Duration> {
        self.time_end.map(|time_end| time_end - self.time_beg)
    }

    /// Wait for the `PyRunner` process to finish, collecting (and optionally
    /// printing) its output.
    /// Helper for simple Python commands that do not require interaction,
    /// i.e. the commands run to create the venv. It prints to stdout.
    /// A process that already exited cannot be run again.
    pub fn run(&mut self, print_argv: bool, print_stdout: bool, print_stderr: bool) -> Result<(Bytes, Bytes)> {
        def1n!("{}, print_argv={}", self._d_p, print_argv);

        if self.exited() {
            let s = format!("{} already exited", self._d_p);
            def1x!("{}", s);
            return Err(Error::other(s));
        }

        if print_argv {
            // print the command executed, prefer the prompt of env var PS4
            let prompt: String = match env::var("PS4") {
                Ok(s) if !s.is_empty() => s,
                _ => String::from(PROMPT_DEFAULT),
            };
            let mut lock = stdout().lock();
            let _ = lock.write_all(prompt.as_bytes());
            for arg in self.argv.iter() {
                let es = escape(arg.into());
                let _ = lock.write_all(es.as_bytes());
                let _ = lock.write_all(b" ");
            }
            let _ = lock.write_all(b"\n");
            let _ = lock.flush();
        }
        self.close_stdin();

        let mut stdout_data: Bytes = Bytes::with_capacity(2048);
        let mut stderr_data: Bytes = Bytes::with_capacity(1024);
        loop {
            let (exited, out_data, err_data) = self.write_read(None);
            if let Some(data) = out_data {
                stdout_data.extend_from_slice(data.as_slice());
                if print_stdout {
                    let mut lock = stdout().lock();
                    let _ = lock.write_all(data.as_slice());
                    let _ = lock.flush();
                }
            }
            if let Some(data) = err_data {
                stderr_data.extend_from_slice(data.as_slice());
                if print_stderr {
                    let mut lock = stderr().lock();
                    let _ = lock.write_all(data.as_slice());
                    let _ = lock.flush();
                }
            }
            if exited {
                break;
            }
            if let Some(err) = self.error.take() {
                def1x!("{} error {}", self._d_p, err);
                return Err(err);
            }
        }

        match self.exit_status {
            Some(status) if !status.success() => {
                let s = format!("Python process {} exited with non-zero status {:?}", self.pid_, status);
                def1x!("{} {}", self._d_p, s);
                return Err(Error::other(s));
            }
            Some(_) => {}
            None => {
                debug_panic!("{} exit_status is None after exit", self._d_p);
            }
        }

        def1x!("{} duration {:?}, return Ok(stdout {} bytes, stderr {} bytes)",
            self._d_p, self.duration(), stdout_data.len(), stderr_data.len());

        Ok((stdout_data, stderr_data))
    }

    /// Create a `PyRunner`, run it, return Ok or Err.
    ///
    /// This calls `PyRunner::new()` and then `PyRunner::run()`.
    /// See `run()` regarding its intended use.
    pub fn run_once(
        python_to_use: PythonToUse,
        pipe_sz: PipeSz,
        recv_timeout: Duration,
        chunk_delimiter: ChunkDelimiter,
        python_path: Option<FPath>,
        argv: Vec<&str>,
        print_argv: bool
    ) -> Result<(PyRunner, Bytes, Bytes)> {
        def1ñ!("({:?}, {:?}, {:?})", python_to_use, python_path, argv);
        let mut pyrunner = PyRunner::new(
            python_to_use,
            pipe_sz,
            recv_timeout,
            Some(chunk_delimiter),
            None,
            python_path,
            argv,
        )?;
        let (stdout_data, stderr_data) = pyrunner.run(print_argv, print_argv, print_argv)?;

        Ok((pyrunner, stdout_data, stderr_data))
    }
}
