use crate::config::Config;
use crate::error::{Result, ShellError};

/// Ordered list of directories searched for external commands.
///
/// Entries never end with `/` (the root directory itself excepted). The list
/// is only ever replaced as a whole, never appended to.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchPath {
    dirs: Vec<String>,
}

impl SearchPath {
    /// Build a search path from `dirs`, normalizing trailing separators.
    pub fn new<I, S>(dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            dirs: dirs.into_iter().map(|d| normalize(d.as_ref())).collect(),
        }
    }

    /// Replace every entry with `dirs`.
    ///
    /// Fails without touching the current entries when `dirs` holds more
    /// than `limit` directories.
    pub fn replace(&mut self, dirs: &[&str], limit: usize) -> Result<()> {
        if dirs.len() > limit {
            return Err(ShellError::TooManySearchDirs { limit });
        }
        *self = SearchPath::new(dirs);
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.dirs.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }
}

fn normalize(dir: &str) -> String {
    let trimmed = dir.trim_end_matches('/');
    if trimmed.is_empty() && dir.starts_with('/') {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Shell-wide state owned by the REPL loop.
///
/// Dispatch stages borrow it; a forked process unit works on its own copy,
/// so nothing a child does here is seen by the parent.
#[derive(Debug, Clone)]
pub struct Environment {
    /// Directories searched for external commands.
    pub search_path: SearchPath,
    /// Limits and defaults the shell was started with.
    pub config: Config,
    /// Set by `exit`; the REPL loop stops once it sees it.
    pub should_exit: bool,
}

impl Environment {
    pub fn new(config: Config) -> Self {
        Self {
            search_path: SearchPath::new(&config.default_path),
            config,
            should_exit: false,
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
