//! Running `&`-separated segments of a line concurrently.
//!
//! Splitting is pure; [`run_parallel`] spawns one process unit per segment
//! and waits for all of them before returning, so two parallel directives
//! never overlap from the caller's point of view.

use nix::unistd::Pid;

use crate::error::{Result, ShellError};
use crate::process::{self, Unit};

/// Character separating concurrently executed segments.
pub const SEPARATOR: char = '&';

/// Split `line` into independent segments.
///
/// Returns `None` when the line has no separator, so the caller goes on
/// with the line as is. A trailing separator is optional: `a & b` and
/// `a & b &` both give two segments. A lone `&` is a valid directive with
/// no segments at all. Empty segments are kept; they dispatch to nothing.
pub fn split_parallel(line: &str) -> Option<Vec<&str>> {
    if !line.contains(SEPARATOR) {
        return None;
    }
    if line.len() == SEPARATOR.len_utf8() {
        return Some(Vec::new());
    }
    let body = line.strip_suffix(SEPARATOR).unwrap_or(line);
    Some(body.split(SEPARATOR).collect())
}

/// Run every segment in its own process unit and wait for all of them.
///
/// `dispatch` runs inside the child with that segment as its whole line;
/// its return value becomes the child's exit status. A child never comes
/// back to the caller, so it can never read further input. Fails up front
/// with [`ShellError::TooManySegments`] when there are more than `limit`
/// segments, before anything is spawned.
pub fn run_parallel<F>(segments: &[&str], limit: usize, mut dispatch: F) -> Result<()>
where
    F: FnMut(&str) -> i32,
{
    if segments.len() > limit {
        return Err(ShellError::TooManySegments { limit });
    }

    let mut children: Vec<Pid> = Vec::with_capacity(segments.len());
    for segment in segments {
        match process::spawn_unit() {
            Ok(Unit::Child) => process::exit_unit(dispatch(segment)),
            Ok(Unit::Parent(pid)) => children.push(pid),
            Err(e) => {
                let _ = process::wait_all(&children);
                return Err(e);
            }
        }
    }
    process::wait_all(&children)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_separator_is_a_no_op() {
        assert_eq!(split_parallel("echo hi > out.txt"), None);
        assert_eq!(split_parallel(""), None);
    }

    #[test]
    fn lone_separator_is_consumed() {
        assert_eq!(split_parallel("&"), Some(vec![]));
    }

    #[test]
    fn trailing_separator_is_optional() {
        assert_eq!(split_parallel("a & b"), Some(vec!["a ", " b"]));
        assert_eq!(split_parallel("a & b &"), Some(vec!["a ", " b "]));
    }

    #[test]
    fn single_backgrounded_command() {
        assert_eq!(split_parallel("sleep 1 &"), Some(vec!["sleep 1 "]));
    }

    #[test]
    fn empty_segments_are_kept() {
        assert_eq!(split_parallel("&&"), Some(vec!["", ""]));
        assert_eq!(split_parallel("& ls"), Some(vec!["", " ls"]));
    }

    #[test]
    fn segments_keep_their_redirections() {
        assert_eq!(
            split_parallel("echo a > a.txt & echo b > b.txt"),
            Some(vec!["echo a > a.txt ", " echo b > b.txt"])
        );
    }

    #[test]
    fn too_many_segments_spawn_nothing() {
        let mut calls = 0;
        let err = run_parallel(&["a", "b", "c"], 2, |_| {
            calls += 1;
            0
        })
        .unwrap_err();
        assert!(matches!(err, ShellError::TooManySegments { limit: 2 }));
        assert_eq!(calls, 0);
    }

    #[test]
    fn no_segments_returns_immediately() {
        run_parallel(&[], 255, |_| 0).unwrap();
    }
}
