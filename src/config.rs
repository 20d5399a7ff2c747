/// Tunable limits and defaults of the shell.
///
/// [`Default`] gives the values the shell has always used. Every limit is
/// enforced with an explicit error; nothing is ever truncated silently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Search path installed at startup.
    pub default_path: Vec<String>,
    /// Maximum number of directories `path` accepts.
    pub max_search_dirs: usize,
    /// Slots in an argument list, the terminating null included.
    pub max_args: usize,
    /// Maximum number of segments in one parallel directive.
    pub max_parallel: usize,
    /// Printed before every read in interactive mode.
    pub prompt: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_path: vec!["/bin".to_string()],
            max_search_dirs: 100,
            max_args: 10,
            max_parallel: 255,
            prompt: "wish> ".to_string(),
        }
    }
}
