use crate::env::SearchPath;
use crate::error::{Result, ShellError};
use crate::lexer;
use nix::errno::Errno;
use nix::unistd::{AccessFlags, access, execv};
use std::convert::Infallible;
use std::ffi::CString;
use std::path::{Path, PathBuf};

/// Command that is not a builtin, ready to replace the current process image.
#[derive(Debug)]
pub struct ExternalCommand {
    path: CString,
    args: Vec<CString>,
}

impl ExternalCommand {
    /// Tokenize `line` and resolve its first token against `search_path`.
    ///
    /// `max_args` counts argument slots including the terminating null that
    /// `execv` expects, so at most `max_args - 1` tokens are accepted.
    pub fn prepare(line: &str, search_path: &SearchPath, max_args: usize) -> Result<Self> {
        let tokens = lexer::split_whitespace(line);
        if tokens.len() >= max_args {
            return Err(ShellError::TooManyArguments { limit: max_args });
        }

        let name = tokens[0];
        let executable = find_command_path(search_path, name)
            .ok_or_else(|| ShellError::CommandNotFound(name.to_string()))?;

        let path = to_cstring(executable.as_os_str().to_string_lossy().as_ref())?;
        let args = tokens
            .iter()
            .map(|token| to_cstring(token))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { path, args })
    }

    #[cfg(test)]
    fn path(&self) -> &Path {
        Path::new(self.path.to_str().unwrap_or_default())
    }

    #[cfg(test)]
    fn args(&self) -> &[CString] {
        &self.args
    }

    /// Replace the current process image. Returns only on failure.
    pub fn exec(self) -> Result<Infallible> {
        execv(&self.path, &self.args).map_err(|source| ShellError::ExecutionFailure {
            path: self.path.to_string_lossy().into_owned(),
            source,
        })
    }
}

fn to_cstring(s: &str) -> Result<CString> {
    CString::new(s).map_err(|_| ShellError::ExecutionFailure {
        path: s.to_string(),
        source: Errno::EINVAL,
    })
}

/// Resolve `line` and turn the current process into it.
///
/// Meant to run inside a freshly forked process unit: on success it never
/// returns, on failure the caller reports the error and ends the unit.
pub fn execute_external(line: &str, search_path: &SearchPath, max_args: usize) -> ShellError {
    match ExternalCommand::prepare(line, search_path, max_args).and_then(ExternalCommand::exec) {
        Ok(never) => match never {},
        Err(e) => e,
    }
}

/// Look `basename` up in every directory of `search_path`, in order.
///
/// Each candidate is `<dir>/<basename>`; the first one the current process
/// may execute wins. Returns `None` for an empty search path.
pub fn find_command_path(search_path: &SearchPath, basename: &str) -> Option<PathBuf> {
    if basename.is_empty() {
        return None;
    }
    search_path
        .iter()
        .map(|dir| PathBuf::from(format!("{dir}/{basename}")))
        .find(|candidate| is_executable(candidate))
}

fn is_executable(path: &Path) -> bool {
    access(path, AccessFlags::X_OK).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::fs::File;
    use std::os::unix::fs::PermissionsExt;

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("external_tests_{}_{}", std::process::id(), tag));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).expect("create temp dir");
        dir
    }

    fn touch(path: &Path, mode: u32) {
        File::create(path).expect("touch");
        fs::set_permissions(path, fs::Permissions::from_mode(mode)).expect("chmod");
    }

    #[test]
    fn single_component_found_in_path() {
        let path = SearchPath::new(["/bin"]);
        let found = find_command_path(&path, "sh").expect("Expected to find 'sh' in /bin");
        assert_eq!(found, PathBuf::from("/bin/sh"));
    }

    #[test]
    fn single_component_not_found_in_path() {
        let path = SearchPath::new(["/bin"]);
        assert!(find_command_path(&path, "nonexisting_command_for_wish").is_none());
    }

    #[test]
    fn empty_search_path_finds_nothing() {
        assert!(find_command_path(&SearchPath::default(), "sh").is_none());
    }

    #[test]
    fn empty_basename_is_none() {
        assert!(find_command_path(&SearchPath::new(["/bin"]), "").is_none());
    }

    #[test]
    fn first_executable_match_wins() {
        let first = temp_dir("first");
        let second = temp_dir("second");
        touch(&first.join("tool"), 0o644);
        touch(&second.join("tool"), 0o755);
        let third = temp_dir("third");
        touch(&third.join("tool"), 0o755);

        let path = SearchPath::new([
            first.to_string_lossy(),
            second.to_string_lossy(),
            third.to_string_lossy(),
        ]);
        let found = find_command_path(&path, "tool").expect("tool");
        assert_eq!(found, second.join("tool"));

        let _ = fs::remove_dir_all(first);
        let _ = fs::remove_dir_all(second);
        let _ = fs::remove_dir_all(third);
    }

    #[test]
    fn prepare_builds_args_in_order() {
        let path = SearchPath::new(["/bin"]);
        let cmd = ExternalCommand::prepare("sh -c true", &path, 10).unwrap();
        assert_eq!(cmd.path(), Path::new("/bin/sh"));
        let args: Vec<_> = cmd.args().iter().map(|a| a.to_str().unwrap()).collect();
        assert_eq!(args, vec!["sh", "-c", "true"]);
    }

    #[test]
    fn prepare_keeps_empty_tokens() {
        let path = SearchPath::new(["/bin"]);
        let cmd = ExternalCommand::prepare("sh  -c", &path, 10).unwrap();
        assert_eq!(cmd.args().len(), 3);
        assert_eq!(cmd.args()[1].to_str().unwrap(), "");
    }

    #[test]
    fn prepare_rejects_too_many_arguments() {
        let path = SearchPath::new(["/bin"]);
        let err = ExternalCommand::prepare("sh a b c", &path, 4).unwrap_err();
        assert!(matches!(err, ShellError::TooManyArguments { limit: 4 }));
        assert!(ExternalCommand::prepare("sh a b", &path, 4).is_ok());
    }

    #[test]
    fn prepare_reports_missing_command() {
        let err = ExternalCommand::prepare("sh", &SearchPath::default(), 10).unwrap_err();
        assert!(matches!(err, ShellError::CommandNotFound(name) if name == "sh"));
    }
}
