//! Wiring between the parsed configuration and the outside world

use std::io::Write;

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::TimerConfig;
use crate::detach::Launcher;
use crate::duration::TotalDuration;
use crate::notify::{completion_text, Notifier};
use crate::process::{ProcessLister, TIMER_PROCESS_NAME};
use crate::timer;

/// Prints `<pid> <name>` for each running background timer.
pub fn list_timers<P, W>(lister: &P, out: &mut W) -> Result<()>
where
    P: ProcessLister,
    W: Write,
{
    for pid in lister.list_by_name(TIMER_PROCESS_NAME) {
        writeln!(out, "{} {}", pid, TIMER_PROCESS_NAME)?;
    }
    out.flush()?;
    Ok(())
}

/// Announces the timer, then hands the wait and the notification to the
/// launcher. Returns as soon as the launcher does.
pub fn start_detached<L, N, W, S>(
    config: &TimerConfig,
    launcher: &L,
    notifier: &N,
    out: &mut W,
    wait: S,
) -> Result<L::Handle>
where
    L: Launcher,
    N: Notifier,
    W: Write,
    S: FnOnce(TotalDuration),
{
    let duration = config.duration;
    writeln!(out, "Started timer ({})", duration)?;
    out.flush()?;

    let label = config.label.clone();
    info!(seconds = duration.as_secs(), label = ?label, "starting background timer");

    launcher.spawn(move || {
        wait(duration);
        notifier.notify(completion_text(label.as_deref()));
        Ok(())
    })
}

/// Counts down in this terminal, then notifies.
pub fn run_foreground<N, W, F>(config: &TimerConfig, notifier: &N, out: &mut W, tick: F) -> Result<()>
where
    N: Notifier,
    W: Write,
    F: FnMut(),
{
    info!(seconds = config.duration.as_secs(), "starting foreground timer");
    timer::countdown(config.duration, out, tick).context("failed to draw countdown")?;
    notifier.notify(completion_text(config.label.as_deref()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Mode;
    use anyhow::anyhow;
    use std::cell::{Cell, RefCell};

    #[derive(Default)]
    struct Recorder {
        sent: RefCell<Vec<String>>,
    }

    impl Notifier for Recorder {
        fn notify(&self, text: &str) {
            self.sent.borrow_mut().push(text.to_string());
        }
    }

    /// Runs the work right away in this process.
    struct Inline;

    impl Launcher for Inline {
        type Handle = ();

        fn spawn<F>(&self, work: F) -> Result<()>
        where
            F: FnOnce() -> Result<()>,
        {
            work()
        }
    }

    struct Broken;

    impl Launcher for Broken {
        type Handle = ();

        fn spawn<F>(&self, _work: F) -> Result<()>
        where
            F: FnOnce() -> Result<()>,
        {
            Err(anyhow!("fork: resource temporarily unavailable"))
        }
    }

    struct Fixed(Vec<u32>);

    impl ProcessLister for Fixed {
        fn list_by_name(&self, name: &str) -> Vec<u32> {
            assert_eq!(name, TIMER_PROCESS_NAME);
            self.0.clone()
        }
    }

    fn config(secs: u64, label: Option<&str>, mode: Mode) -> TimerConfig {
        TimerConfig {
            duration: TotalDuration::from_secs(secs).unwrap(),
            label: label.map(str::to_string),
            mode,
        }
    }

    #[test]
    fn detached_run_waits_then_notifies_once_with_label() {
        let notifier = Recorder::default();
        let waited = Cell::new(0);
        let mut out = Vec::new();

        start_detached(
            &config(90, Some("stretch"), Mode::Detached),
            &Inline,
            &notifier,
            &mut out,
            |d| waited.set(d.as_secs()),
        )
        .unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "Started timer (00:01:30)\n");
        assert_eq!(waited.get(), 90);
        assert_eq!(*notifier.sent.borrow(), vec!["stretch".to_string()]);
    }

    #[test]
    fn detached_run_without_label_uses_placeholder() {
        let notifier = Recorder::default();
        start_detached(
            &config(1, None, Mode::Detached),
            &Inline,
            &notifier,
            &mut Vec::new(),
            |_| {},
        )
        .unwrap();
        assert_eq!(*notifier.sent.borrow(), vec!["break".to_string()]);
    }

    #[test]
    fn launch_failure_is_reported_and_nothing_runs() {
        let notifier = Recorder::default();
        let waited = Cell::new(false);
        let mut out = Vec::new();

        let err = start_detached(
            &config(5, None, Mode::Detached),
            &Broken,
            &notifier,
            &mut out,
            |_| waited.set(true),
        )
        .unwrap_err();

        assert!(err.to_string().contains("fork"));
        assert!(!waited.get());
        assert!(notifier.sent.borrow().is_empty());
        assert_eq!(String::from_utf8(out).unwrap(), "Started timer (00:00:05)\n");
    }

    #[test]
    fn foreground_counts_down_then_notifies() {
        let notifier = Recorder::default();
        let mut out = Vec::new();
        let mut ticks = 0;

        run_foreground(
            &config(3, Some("tea"), Mode::Foreground),
            &notifier,
            &mut out,
            || ticks += 1,
        )
        .unwrap();

        assert_eq!(ticks, 3);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "\r00:00:03\r00:00:02\r00:00:01\r00:00:00 - Time's up!\n"
        );
        assert_eq!(*notifier.sent.borrow(), vec!["tea".to_string()]);
    }

    #[test]
    fn lists_one_line_per_timer() {
        let mut out = Vec::new();
        list_timers(&Fixed(vec![41, 977]), &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "41 pomo-timer\n977 pomo-timer\n"
        );
    }

    #[test]
    fn empty_listing_prints_nothing() {
        let mut out = Vec::new();
        list_timers(&Fixed(Vec::new()), &mut out).unwrap();
        assert!(out.is_empty());
    }
}
