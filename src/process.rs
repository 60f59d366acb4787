//! Finding running background timers by process name

use std::ffi::OsStr;

use sysinfo::System;

/// Name given to every detached timer process. Kept under the 15 byte limit
/// of the kernel's `comm` field.
pub const TIMER_PROCESS_NAME: &str = "pomo-timer";

pub trait ProcessLister {
    /// Ids of the processes whose name is exactly `name`, ascending.
    fn list_by_name(&self, name: &str) -> Vec<u32>;
}

/// Process table snapshot through `sysinfo`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemProcesses;

impl ProcessLister for SystemProcesses {
    fn list_by_name(&self, name: &str) -> Vec<u32> {
        let sys = System::new_all();
        let mut pids: Vec<u32> = sys
            .processes()
            .iter()
            .filter(|(_, process)| process.name() == OsStr::new(name))
            .map(|(pid, _)| pid.as_u32())
            .collect();
        pids.sort_unstable();
        pids
    }
}
