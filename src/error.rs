use std::io::{self, Write};

use nix::errno::Errno;
use thiserror::Error;

/// The one message the user ever sees for a recoverable failure.
pub const ERROR_MESSAGE: &str = "An error has occurred\n";

/// Everything that can go wrong while reading, dispatching or running a line.
///
/// Variants carry enough detail to tell failures apart in tests and in
/// library use. The interactive shell collapses all of them into
/// [`ERROR_MESSAGE`] through [`report`].
#[derive(Debug, Error)]
pub enum ShellError {
    /// Bad startup arguments.
    #[error("usage: wish [batch-file]")]
    Usage,

    /// The batch file could not be opened or read.
    #[error("cannot read batch file {path}: {source}")]
    Stream {
        path: String,
        #[source]
        source: io::Error,
    },

    /// A leading `>` or a redirection target with embedded spaces.
    #[error("malformed redirection: {0}")]
    MalformedRedirection(String),

    /// The redirection target could not be opened or swapped in.
    #[error("cannot redirect output to {path}: {source}")]
    RedirectionIo {
        path: String,
        #[source]
        source: io::Error,
    },

    /// A built-in was given the wrong arguments or failed to do its job.
    #[error("{name}: {reason}")]
    BuiltinMisuse { name: &'static str, reason: String },

    /// No directory of the search path holds an executable with this name.
    #[error("{0}: command not found")]
    CommandNotFound(String),

    /// The executable was found but replacing the process image failed.
    #[error("cannot execute {path}: {source}")]
    ExecutionFailure {
        path: String,
        #[source]
        source: Errno,
    },

    /// More tokens than the argument list can hold.
    #[error("too many arguments (limit {limit})")]
    TooManyArguments { limit: usize },

    /// `path` was given more directories than the search path can hold.
    #[error("path: too many directories (limit {limit})")]
    TooManySearchDirs { limit: usize },

    /// A parallel directive with more segments than may run at once.
    #[error("too many parallel commands (limit {limit})")]
    TooManySegments { limit: usize },

    /// `fork`, `dup` or `waitpid` failed.
    #[error("{op} failed: {source}")]
    Process {
        op: &'static str,
        #[source]
        source: Errno,
    },
}

impl ShellError {
    /// Fatal errors end the shell with a nonzero status instead of
    /// returning to the prompt.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ShellError::Usage | ShellError::Stream { .. })
    }

    pub(crate) fn process(op: &'static str) -> impl FnOnce(Errno) -> Self {
        move |source| ShellError::Process { op, source }
    }
}

pub type Result<T> = std::result::Result<T, ShellError>;

/// Report a failure the way the shell always does: one fixed line on stderr.
pub fn report(_error: &dyn std::error::Error) {
    let mut stderr = io::stderr().lock();
    let _ = stderr.write_all(ERROR_MESSAGE.as_bytes());
    let _ = stderr.flush();
}
