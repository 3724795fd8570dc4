// src/oracle/dateutil.rs

//! The Python `dateutil` oracle. One long-lived Python process serves every
//! request of a run, see [`wire`](crate::oracle::wire) for the protocol.

use std::io::Error;
use std::time::Duration;

#[allow(unused_imports)]
use ::si_trace_print::{
    defn,
    defo,
    defx,
    defñ,
};

use crate::common::{
    Bytes,
    Count,
    FPath,
    NLu8,
};
use crate::data::params::ParameterSet;
use crate::data::parseresult::OracleParse;
use crate::debug::printers::buffer_to_String_noraw;
use crate::error::{
    FixtureError,
    FixtureResult,
};
use crate::oracle::{
    OracleAnswer,
    ParserOracle,
    TokenizerOracle,
};
use crate::oracle::wire::{
    self,
    Reply,
};
use crate::python::ORACLE_SCRIPT;
use crate::python::pyrunner::{
    PipeSz,
    PyRunner,
    PythonToUse,
    SummaryPyRunner,
};

/// pipe size of the oracle process stdout
const PIPE_SZ: PipeSz = 65536;

/// replies are read in a blocking `select`; this only bounds how often the
/// pipe reader threads check on an exited process
const RECV_TIMEOUT: Duration = Duration::from_millis(20);

/// Runs the oracle script in a Python interpreter.
pub struct DateutilOracle {
    pyrunner: PyRunner,
    /// Summary statistic.
    requests: Count,
}

impl std::fmt::Debug for DateutilOracle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DateutilOracle")
            .field("pyrunner", &self.pyrunner)
            .field("requests", &self.requests)
            .finish()
    }
}

impl DateutilOracle {
    /// Start the oracle process. `python_to_use` and `python_path` are as
    /// for [`PyRunner::new`].
    pub fn new(python_to_use: PythonToUse, python_path: Option<FPath>) -> FixtureResult<DateutilOracle> {
        defn!("{:?}, {:?}", python_to_use, python_path);
        let pyrunner = PyRunner::new(
            python_to_use,
            PIPE_SZ,
            RECV_TIMEOUT,
            Some(NLu8),
            None,
            python_path,
            vec!["-c", ORACLE_SCRIPT],
        )?;
        defx!("pid {}", pyrunner.pid());

        Ok(DateutilOracle {
            pyrunner,
            requests: 0,
        })
    }

    /// path of the interpreter running the oracle
    pub fn python_path(&self) -> &FPath {
        &self.pyrunner.python_path
    }

    /// count of requests sent
    pub const fn requests(&self) -> Count {
        self.requests
    }

    /// an error for a process that ended, including its last stderr output
    fn process_ended(&mut self) -> FixtureError {
        let stderr: String = match self.pyrunner.stderr_all() {
            Some(data) => String::from_utf8_lossy(data).to_string(),
            None => String::new(),
        };
        FixtureError::OracleProcess(Error::other(format!(
            "oracle process {} ended without replying; stderr: {}",
            self.pyrunner.pid(),
            stderr.trim_end(),
        )))
    }

    /// send one request line, read one reply line
    fn request(&mut self, request: &str) -> FixtureResult<Reply> {
        defn!("{:?}", request);
        self.requests += 1;
        let line: Bytes = match self.pyrunner.write_read_line(request.as_bytes())? {
            Some(line) => line,
            None => {
                defx!("process ended");
                return Err(self.process_ended());
            }
        };
        let line: &str = match std::str::from_utf8(&line) {
            Ok(s) => s,
            Err(err) => {
                defx!("reply not UTF-8");
                return Err(FixtureError::OracleProtocol {
                    message: format!("reply {} is not UTF-8; {}", buffer_to_String_noraw(&line), err),
                });
            }
        };
        let reply: Reply = wire::decode_reply(line)?;
        defx!();

        Ok(reply)
    }

    /// Close stdin of the oracle process and wait for it to exit.
    /// Returns the process statistics.
    pub fn close(mut self) -> FixtureResult<SummaryPyRunner> {
        defn!();
        self.pyrunner.close_stdin();
        let status = self.pyrunner.wait()?;
        if !status.success() {
            defx!("exit status {:?}", status);
            return Err(FixtureError::OracleProcess(Error::other(format!(
                "oracle process {} exited with {}", self.pyrunner.pid(), status,
            ))));
        }
        defx!("duration {:?}", self.pyrunner.duration());

        Ok(self.pyrunner.summary())
    }
}

impl Drop for DateutilOracle {
    fn drop(&mut self) {
        if !self.pyrunner.exited() {
            defñ!("kill oracle process {}", self.pyrunner.pid());
            let _ = self.pyrunner.process.kill();
            let _ = self.pyrunner.wait();
        }
    }
}

impl TokenizerOracle for DateutilOracle {
    fn split(&mut self, input: &str) -> FixtureResult<Vec<String>> {
        match self.request(&wire::tokenize_request(input))? {
            Reply::Ok(fields) => wire::decode_tokens(&fields),
            Reply::Err(message) => Err(FixtureError::OracleProtocol {
                message: format!("tokenizer failed on {:?}: {}", input, message),
            }),
        }
    }
}

impl ParserOracle for DateutilOracle {
    fn parse(&mut self, input: &str, params: &ParameterSet) -> FixtureResult<OracleAnswer<OracleParse>> {
        match self.request(&wire::parse_request(input, params))? {
            Reply::Ok(fields) => Ok(Ok(wire::decode_parse(&fields)?)),
            Reply::Err(message) => Ok(Err(message)),
        }
    }
}
