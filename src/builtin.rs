use crate::env::Environment;
use crate::error::{Result, ShellError};
use crate::lexer;
use std::env;

/// A directive the shell carries out in its own process.
///
/// A line belongs to a builtin when it starts with the builtin's keyword.
/// `parse` gets every token of the line, the keyword token first, and none
/// of them has option meaning: `help`, `--help` and `-x` are plain words.
pub(crate) trait BuiltinCommand: Sized {
    /// Keyword the line must start with.
    fn name() -> &'static str;

    fn parse(tokens: &[&str]) -> Result<Self>;

    fn execute(self, env: &mut Environment) -> Result<()>;
}

type Runner = fn(&[&str], &mut Environment) -> Option<Result<()>>;

/// Builtins in the order they are tried.
const BUILTINS: [Runner; 3] = [try_run::<Path>, try_run::<Cd>, try_run::<Exit>];

/// Run `line` as a builtin if it starts with a builtin keyword.
///
/// Returns `None` when the line is not a builtin and should be handed to
/// the external command executor. `Some(Err(_))` means the builtin was
/// recognized but misused or failed; the shell reports it and goes on.
pub fn run_builtin(line: &str, env: &mut Environment) -> Option<Result<()>> {
    let tokens = lexer::split_whitespace(line);
    BUILTINS.iter().find_map(|run| run(&tokens, env))
}

fn try_run<T: BuiltinCommand>(tokens: &[&str], env: &mut Environment) -> Option<Result<()>> {
    if !tokens.first()?.starts_with(T::name()) {
        return None;
    }
    Some(T::parse(tokens).and_then(|cmd| cmd.execute(env)))
}

fn misuse(name: &'static str, reason: impl Into<String>) -> ShellError {
    ShellError::BuiltinMisuse {
        name,
        reason: reason.into(),
    }
}

/// Exit the shell. Takes no arguments.
pub struct Exit;

impl BuiltinCommand for Exit {
    fn name() -> &'static str {
        "exit"
    }

    fn parse(tokens: &[&str]) -> Result<Self> {
        match tokens {
            ["exit"] => Ok(Exit),
            _ => Err(misuse("exit", "takes no arguments")),
        }
    }

    fn execute(self, env: &mut Environment) -> Result<()> {
        env.should_exit = true;
        Ok(())
    }
}

/// Change the current working directory.
pub struct Cd {
    pub target: String,
}

impl BuiltinCommand for Cd {
    fn name() -> &'static str {
        "cd"
    }

    fn parse(tokens: &[&str]) -> Result<Self> {
        match tokens {
            [_, target] => Ok(Cd {
                target: target.to_string(),
            }),
            _ => Err(misuse("cd", "expected exactly one directory")),
        }
    }

    fn execute(self, _env: &mut Environment) -> Result<()> {
        env::set_current_dir(&self.target)
            .map_err(|e| misuse("cd", format!("can't chdir to {}: {}", self.target, e)))
    }
}

/// Replace the command search path with the given directories.
/// Without arguments the search path becomes empty.
pub struct Path {
    pub dirs: Vec<String>,
}

impl BuiltinCommand for Path {
    fn name() -> &'static str {
        "path"
    }

    fn parse(tokens: &[&str]) -> Result<Self> {
        let dirs = tokens.get(1..).unwrap_or_default();
        Ok(Path {
            dirs: dirs.iter().map(|d| d.to_string()).collect(),
        })
    }

    fn execute(self, env: &mut Environment) -> Result<()> {
        let dirs: Vec<&str> = self.dirs.iter().map(String::as_str).collect();
        env.search_path.replace(&dirs, env.config.max_search_dirs)
    }
}
