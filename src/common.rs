// src/common.rs
//
// common imports, type aliases, and other globals (avoids circular imports)

use std::sync::atomic::{
    AtomicBool,
    Ordering,
};
use std::thread::ThreadId;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// file-handling
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// `F`ake `Path` or `F`ile `Path`
pub type FPath = String;

/// Sequence of Bytes
pub type Bytes = Vec<u8>;

/// general purpose counting type
pub type Count = u64;

/// Single-byte newLine char as u8
#[allow(non_upper_case_globals)]
pub const NLu8: u8 = 10;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// custom Results
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// `Result` with an `Err` variant that signals the error was already printed
/// for the user and should not be printed again.
#[derive(Debug)]
pub enum Result3E<T> {
    Ok(T),
    Err(std::io::Error),
    /// error was already printed by the callee
    ErrNoReprint(std::io::Error),
}

impl<T> Result3E<T> {
    #[inline(always)]
    pub const fn is_ok(&self) -> bool {
        matches!(*self, Result3E::Ok(_))
    }

    #[inline(always)]
    pub const fn is_err(&self) -> bool {
        !self.is_ok()
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// summary statistics
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// are summary statistics collected? Set once by the driver program.
static SUMMARY_STATS_ENABLED: AtomicBool = AtomicBool::new(false);

/// enable collection of summary statistics, i.e. CLI option `--summary`
pub fn summary_stats_enable() {
    SUMMARY_STATS_ENABLED.store(true, Ordering::Relaxed);
}

#[inline(always)]
pub fn summary_stats_enabled() -> bool {
    SUMMARY_STATS_ENABLED.load(Ordering::Relaxed)
}

/// run the statement only if summary statistics are enabled
#[macro_export]
macro_rules! summary_stat {
    (
        $($stmt:tt)*
    ) => {
        {
            if $crate::common::summary_stats_enabled() {
                $($stmt)*;
            }
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// threads
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// return the number within a `ThreadId`, e.g. `ThreadId(5)` returns `5`.
/// `ThreadId::as_u64` is unstable so parse the `Debug` representation.
pub fn threadid_to_u64(thread_id: ThreadId) -> u64 {
    let s: String = format!("{:?}", thread_id);
    let digits: String = s.chars().filter(|c| c.is_ascii_digit()).collect();

    digits.parse::<u64>().unwrap_or(0)
}

/// convert `Path` to `FPath`
pub fn path_to_fpath(path: &std::path::Path) -> FPath {
    match path.to_str() {
        Some(s) => FPath::from(s),
        None => path.to_string_lossy().to_string(),
    }
}
