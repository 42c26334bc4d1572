//! Process signaling helpers.
//!
//! Every operation here is best effort: signaling a dead or foreign pid is
//! expected noise and never surfaces as an error.

use sysinfo::{ProcessRefreshKind, RefreshKind, Signal, System};

#[cfg(unix)]
mod imp {
    /// SIGTERM the whole process group (negative pid convention).
    pub fn terminate_group(pid: u32) {
        unsafe {
            libc::kill(-(pid as i32), libc::SIGTERM);
        }
    }

    /// SIGKILL the whole process group.
    pub fn kill_group(pid: u32) {
        unsafe {
            libc::kill(-(pid as i32), libc::SIGKILL);
        }
    }

    pub fn terminate_pid(pid: u32) {
        unsafe {
            libc::kill(pid as i32, libc::SIGTERM);
        }
    }

    pub fn kill_pid(pid: u32) {
        unsafe {
            libc::kill(pid as i32, libc::SIGKILL);
        }
    }

    /// Signal-0 liveness probe.
    pub fn pid_alive(pid: u32) -> bool {
        unsafe { libc::kill(pid as i32, 0) == 0 }
    }
}

#[cfg(not(unix))]
mod imp {
    use sysinfo::{Pid, ProcessRefreshKind, RefreshKind, System};

    // No process groups here; the sweep in `force_stop` covers descendants.
    pub fn terminate_group(pid: u32) {
        kill_pid(pid);
    }

    pub fn kill_group(pid: u32) {
        kill_pid(pid);
    }

    pub fn terminate_pid(pid: u32) {
        kill_pid(pid);
    }

    pub fn kill_pid(pid: u32) {
        let system = System::new_with_specifics(
            RefreshKind::new().with_processes(ProcessRefreshKind::new()),
        );
        if let Some(process) = system.process(Pid::from_u32(pid)) {
            process.kill();
        }
    }

    pub fn pid_alive(pid: u32) -> bool {
        let system = System::new_with_specifics(
            RefreshKind::new().with_processes(ProcessRefreshKind::new()),
        );
        system.process(Pid::from_u32(pid)).is_some()
    }
}

pub use imp::{kill_group, kill_pid, pid_alive, terminate_group, terminate_pid};

/// Force-kill every process whose executable name matches one of `names`.
///
/// Defensive cleanup for shutdown paths only: it also reaps players left
/// behind by a previous crashed run, at the cost of not distinguishing
/// instances the user started outside this tool.
pub fn sweep_by_name(names: &[&str]) -> usize {
    let system =
        System::new_with_specifics(RefreshKind::new().with_processes(ProcessRefreshKind::new()));

    let own_pid = std::process::id();
    let mut swept = 0;

    for (pid, process) in system.processes() {
        if pid.as_u32() == own_pid {
            continue;
        }
        if !names
            .iter()
            .any(|name| process.name().eq_ignore_ascii_case(name))
        {
            continue;
        }
        let killed = process
            .kill_with(Signal::Kill)
            .unwrap_or_else(|| process.kill());
        if killed {
            swept += 1;
        }
    }

    swept
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pid_alive_for_own_process() {
        assert!(pid_alive(std::process::id()));
    }

    #[test]
    fn test_signaling_dead_pid_is_noop() {
        // Near pid_max; nothing should be there, and nothing should panic.
        let pid = 4_000_000;
        terminate_pid(pid);
        kill_pid(pid);
        terminate_group(pid);
        kill_group(pid);
        assert!(!pid_alive(pid));
    }

    #[test]
    fn test_sweep_with_unknown_name_matches_nothing() {
        assert_eq!(sweep_by_name(&["skywave-no-such-binary-zz"]), 0);
    }
}
