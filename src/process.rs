//! Process units: forking, waiting and leaving.
//!
//! The shell runs single-threaded, which is what makes calling `fork` from
//! it sound.

use std::io::{self, Write};

use nix::errno::Errno;
use nix::sys::wait::{WaitStatus, waitpid};
use nix::unistd::{ForkResult, Pid, fork};

use crate::error::{Result, ShellError};

/// Which side of a fork the caller is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Parent(Pid),
    Child,
}

/// Create a new process unit with a copy of the current process state.
///
/// Standard output is flushed first so buffered bytes end up written once.
pub fn spawn_unit() -> Result<Unit> {
    let _ = io::stdout().flush();
    // SAFETY: the shell never runs more than one thread.
    match unsafe { fork() }.map_err(ShellError::process("fork"))? {
        ForkResult::Parent { child } => Ok(Unit::Parent(child)),
        ForkResult::Child => Ok(Unit::Child),
    }
}

/// Block until `child` has terminated and return its exit code.
///
/// A child killed by a signal reports `128 + signal`.
pub fn wait_for(child: Pid) -> Result<i32> {
    loop {
        match waitpid(child, None) {
            Ok(WaitStatus::Exited(_, code)) => return Ok(code),
            Ok(WaitStatus::Signaled(_, signal, _)) => return Ok(128 + signal as i32),
            Ok(_) => continue,
            Err(Errno::EINTR) => continue,
            Err(e) => return Err(ShellError::Process { op: "waitpid", source: e }),
        }
    }
}

/// Wait for every unit in `children`, in order.
///
/// All children are waited for even if one wait fails; the first failure
/// is returned afterwards.
pub fn wait_all(children: &[Pid]) -> Result<()> {
    let mut first_error = None;
    for &child in children {
        if let Err(e) = wait_for(child) {
            first_error.get_or_insert(e);
        }
    }
    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// End the current process unit.
pub fn exit_unit(code: i32) -> ! {
    let _ = io::stdout().flush();
    std::process::exit(code)
}
