//! `wish`, a tiny interactive and batch command shell.
//!
//! Lines are read from a terminal or a batch file and run one at a time.
//! The shell knows three builtins (`exit`, `cd`, `path`), resolves every
//! other command against its own search path, redirects a command's
//! standard output with `> file`, and runs `&`-separated commands
//! concurrently, waiting for all of them before reading the next line.
//!
//! The main entry point is [`Interpreter`]. The public modules expose the
//! individual stages so they can be used and tested on their own.

mod builtin;
pub mod config;
pub mod env;
pub mod error;
pub mod external;
pub mod io_adapters;
mod interpreter;
pub mod lexer;
pub mod parallel;
mod process;
pub mod redirect;

pub use builtin::run_builtin;
pub use interpreter::{COMMENT, Interpreter, dispatch};
