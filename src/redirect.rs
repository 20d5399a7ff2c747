//! Redirecting standard output of a single command to a file.
//!
//! A line may carry one `> target` suffix. The target must not contain
//! spaces and the line must not start with the sign. Applying a redirection
//! swaps descriptor 1 of the current process; [`StdoutGuard`] puts the
//! original back once the command is done.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::os::fd::{AsRawFd, FromRawFd, OwnedFd};
use std::os::unix::fs::OpenOptionsExt;

use nix::errno::Errno;
use nix::fcntl::{FcntlArg, fcntl};
use nix::libc::STDOUT_FILENO;
use nix::unistd::dup2;

use crate::error::{Result, ShellError};
use crate::lexer;

/// Character introducing a redirection target.
pub const SIGN: char = '>';

/// Permission bits of a file created by redirection (owner read/write).
pub const TARGET_MODE: u32 = 0o600;

/// Return everything after the first `sign` in `line`, if there is one.
pub fn extract_target(line: &str, sign: char) -> Option<&str> {
    line.find(sign).map(|i| &line[i + sign.len_utf8()..])
}

/// A line split into the command and its optional output target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Redirection<'a> {
    /// The part of the line before the sign, untrimmed.
    pub command: &'a str,
    /// The trimmed target path, when the line has a sign.
    pub target: Option<&'a str>,
}

/// Validate and split `line` without touching any descriptor.
pub fn parse_redirection(line: &str) -> Result<Redirection<'_>> {
    if line.starts_with(SIGN) {
        return Err(ShellError::MalformedRedirection(line.to_string()));
    }
    let Some(raw_target) = extract_target(line, SIGN) else {
        return Ok(Redirection { command: line, target: None });
    };
    let target = lexer::trim(raw_target);
    if target.contains(lexer::SEPARATOR) {
        return Err(ShellError::MalformedRedirection(line.to_string()));
    }
    let end = line.len() - raw_target.len() - SIGN.len_utf8();
    Ok(Redirection {
        command: &line[..end],
        target: Some(target),
    })
}

/// Apply the redirection in `line`, if any, and return the command part.
///
/// Without a sign the line comes back unchanged and no I/O happens. With
/// one, the target is created or truncated and becomes descriptor 1 of
/// this process. Callers hold a [`StdoutGuard`] across the command so the
/// swap is undone afterwards.
pub fn apply_redirection(line: &str) -> Result<&str> {
    let redirection = parse_redirection(line)?;
    if let Some(target) = redirection.target {
        redirect_stdout_to(target)?;
    }
    Ok(redirection.command)
}

fn redirect_stdout_to(path: &str) -> Result<()> {
    let io_error = |source| ShellError::RedirectionIo {
        path: path.to_string(),
        source,
    };
    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(TARGET_MODE)
        .open(path)
        .map_err(io_error)?;

    io::stdout().flush().map_err(io_error)?;
    retry_dup2(file.as_raw_fd(), STDOUT_FILENO).map_err(|e| io_error(e.into()))
    // `file` is closed here; descriptor 1 keeps the open file alive.
}

fn retry_dup2(from: i32, to: i32) -> nix::Result<()> {
    loop {
        match dup2(from, to) {
            Ok(_) => return Ok(()),
            Err(Errno::EINTR) => continue,
            Err(e) => return Err(e),
        }
    }
}

/// Saved copy of standard output, restored when dropped.
///
/// Take one before attempting a redirection; dropping it puts the original
/// descriptor 1 back whether the command succeeded or not.
#[derive(Debug)]
pub struct StdoutGuard {
    saved: OwnedFd,
}

impl StdoutGuard {
    pub fn save() -> Result<Self> {
        let _ = io::stdout().flush();
        let fd = fcntl(STDOUT_FILENO, FcntlArg::F_DUPFD_CLOEXEC(0))
            .map_err(ShellError::process("dup"))?;
        // SAFETY: `fd` was just returned by fcntl and nothing else owns it.
        let saved = unsafe { OwnedFd::from_raw_fd(fd) };
        Ok(Self { saved })
    }
}

impl Drop for StdoutGuard {
    fn drop(&mut self) {
        let _ = io::stdout().flush();
        let _ = retry_dup2(self.saved.as_raw_fd(), STDOUT_FILENO);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_target_finds_first_sign() {
        assert_eq!(extract_target("ls > out.txt", '>'), Some(" out.txt"));
        assert_eq!(extract_target("ls>a>b", '>'), Some("a>b"));
        assert_eq!(extract_target("ls >", '>'), Some(""));
    }

    #[test]
    fn extract_target_without_sign() {
        assert_eq!(extract_target("ls -l", '>'), None);
        assert_eq!(extract_target("", '>'), None);
    }

    #[test]
    fn extract_target_other_sign() {
        assert_eq!(extract_target("ls redirect.c - a.txt ", '-'), Some(" a.txt "));
    }

    #[test]
    fn line_without_sign_is_unchanged() {
        let line = "echo hello world";
        let r = parse_redirection(line).unwrap();
        assert_eq!(r.command, line);
        assert_eq!(r.target, None);
    }

    #[test]
    fn splits_command_and_trimmed_target() {
        let r = parse_redirection("echo hi >   out.txt  ").unwrap();
        assert_eq!(r.command, "echo hi ");
        assert_eq!(r.target, Some("out.txt"));

        let r = parse_redirection("echo hi>out.txt").unwrap();
        assert_eq!(r.command, "echo hi");
        assert_eq!(r.target, Some("out.txt"));
    }

    #[test]
    fn leading_sign_is_malformed() {
        let err = parse_redirection("> out.txt").unwrap_err();
        assert!(matches!(err, ShellError::MalformedRedirection(_)));
    }

    #[test]
    fn leading_space_before_sign_is_accepted() {
        let r = parse_redirection(" > out.txt").unwrap();
        assert_eq!(r.command, " ");
        assert_eq!(r.target, Some("out.txt"));
    }

    #[test]
    fn space_inside_target_is_malformed() {
        let err = parse_redirection("echo hi > out put.txt").unwrap_err();
        assert!(matches!(err, ShellError::MalformedRedirection(_)));

        let err = parse_redirection("ls > a > b").unwrap_err();
        assert!(matches!(err, ShellError::MalformedRedirection(_)));
    }

    #[test]
    fn empty_target_parses_but_cannot_be_opened() {
        let r = parse_redirection("ls >   ").unwrap();
        assert_eq!(r.target, Some(""));
        assert!(matches!(
            apply_redirection("ls >   ").unwrap_err(),
            ShellError::RedirectionIo { .. }
        ));
    }

    #[test]
    fn apply_without_sign_does_no_io() {
        assert_eq!(apply_redirection("echo plain").unwrap(), "echo plain");
    }
}
