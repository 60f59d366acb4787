//! Timer module: the countdown itself, silent or with a live status line

use std::io::{self, Write};
use std::thread;
use std::time::{Duration, Instant};

use crate::duration::{format_hms, TotalDuration};

/// Blocks the calling thread for the whole duration without output.
pub fn sleep_for(duration: TotalDuration) {
    thread::sleep(duration.as_std());
}

/// Counts down once per second, redrawing a single `HH:MM:SS` line in place.
///
/// `tick` is called after each frame and is expected to block until the next
/// second is due; [`wall_clock`] is the real one.
pub fn countdown<W, F>(duration: TotalDuration, out: &mut W, mut tick: F) -> io::Result<()>
where
    W: Write,
    F: FnMut(),
{
    for remaining in (1..=duration.as_secs()).rev() {
        write!(out, "\r{}", format_hms(remaining))?;
        out.flush()?;
        tick();
    }

    writeln!(out, "\r{} - Time's up!", format_hms(0))?;
    out.flush()
}

/// A tick source that sleeps until the next whole second after `start`, so
/// time spent drawing never accumulates into drift.
pub fn wall_clock() -> impl FnMut() {
    let start = Instant::now();
    let mut ticks: u64 = 0;
    move || {
        ticks += 1;
        let due = start + Duration::from_secs(ticks);
        thread::sleep(due.saturating_duration_since(Instant::now()));
    }
}
