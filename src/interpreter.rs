use crate::builtin;
use crate::config::Config;
use crate::env::Environment;
use crate::error::{self, Result};
use crate::external;
use crate::io_adapters::LineSource;
use crate::lexer;
use crate::parallel;
use crate::process::{self, Unit};
use crate::redirect::{self, StdoutGuard};

/// Lines starting with this character are skipped.
pub const COMMENT: char = '#';

/// A minimal shell that runs built-in and external commands line by line.
///
/// The interpreter owns the [`Environment`] (search path, limits, exit
/// flag). Each line goes through the same stages: comment check, parallel
/// split, redirection, trimming, builtins, and finally an external command
/// run in its own process.
///
/// Example
/// ```
/// use wish::Interpreter;
/// let mut sh = Interpreter::default();
/// sh.execute_line("path /usr/bin");
/// assert_eq!(sh.env().search_path.iter().collect::<Vec<_>>(), vec!["/usr/bin"]);
/// sh.execute_line("exit");
/// assert!(sh.env().should_exit);
/// ```
#[derive(Debug, Default)]
pub struct Interpreter {
    env: Environment,
}

impl Interpreter {
    /// Create an interpreter with custom limits and defaults.
    pub fn with_config(config: Config) -> Self {
        Self {
            env: Environment::new(config),
        }
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// Read and run lines from `input` until it is exhausted or `exit` runs.
    pub fn repl(&mut self, input: &mut dyn LineSource) -> anyhow::Result<()> {
        while !self.env.should_exit {
            let Some(line) = input.next_line()? else {
                break;
            };
            self.execute_line(&line);
        }
        Ok(())
    }

    /// Run one line, reporting any failure on stderr.
    pub fn execute_line(&mut self, line: &str) {
        if let Err(e) = self.try_execute_line(line) {
            error::report(&e);
        }
    }

    fn try_execute_line(&mut self, line: &str) -> Result<()> {
        if line.starts_with(COMMENT) {
            return Ok(());
        }
        if let Some(segments) = parallel::split_parallel(line) {
            let limit = self.env.config.max_parallel;
            let env = &mut self.env;
            return parallel::run_parallel(&segments, limit, |segment| run_segment(env, segment));
        }
        dispatch(&mut self.env, line)
    }
}

/// Entry point of a parallel segment's own process unit.
fn run_segment(env: &mut Environment, segment: &str) -> i32 {
    match dispatch(env, segment) {
        Ok(()) => 0,
        Err(e) => {
            error::report(&e);
            1
        }
    }
}

/// Run a single command line that holds no parallel separator.
///
/// Standard output is saved before the redirection is applied and restored
/// when this returns, however the command ended.
pub fn dispatch(env: &mut Environment, line: &str) -> Result<()> {
    let _restore = StdoutGuard::save()?;
    let command = lexer::trim(redirect::apply_redirection(line)?);
    if command.is_empty() {
        return Ok(());
    }
    if let Some(result) = builtin::run_builtin(command, env) {
        return result;
    }
    run_external(env, command)
}

fn run_external(env: &Environment, command: &str) -> Result<()> {
    match process::spawn_unit()? {
        Unit::Child => {
            let err = external::execute_external(command, &env.search_path, env.config.max_args);
            error::report(&err);
            process::exit_unit(1)
        }
        Unit::Parent(child) => {
            process::wait_for(child)?;
            Ok(())
        }
    }
}
