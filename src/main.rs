mod app;
mod cli;
mod config;
mod detach;
mod duration;
mod notify;
mod process;
mod timer;

use std::io;
use std::process::ExitCode;

use anyhow::{Context, Result};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::cli::{Invocation, Mode, TimerConfig};
use crate::config::Settings;
use crate::detach::Detacher;
use crate::notify::CommandNotifier;
use crate::process::{SystemProcesses, TIMER_PROCESS_NAME};

/// Exit status of a foreground timer stopped with Ctrl-C.
const INTERRUPTED: i32 = 130;

fn main() -> ExitCode {
    let settings = Settings::from_env();

    let parsed = match cli::parse_args(std::env::args_os()) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(settings.log_directive(parsed.verbose)))
        .with_writer(io::stderr)
        .with_target(false)
        .init();
    debug!(?settings, invocation = ?parsed.invocation, "parsed command line");

    match run(parsed.invocation, &settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(invocation: Invocation, settings: &Settings) -> Result<()> {
    match invocation {
        Invocation::Usage => {
            println!("{}", cli::USAGE);
            Ok(())
        }
        Invocation::List => app::list_timers(&SystemProcesses, &mut io::stdout()),
        Invocation::Start(config) => start(&config, settings),
    }
}

fn start(config: &TimerConfig, settings: &Settings) -> Result<()> {
    let notifier = CommandNotifier::new(settings.notify_command.clone());

    match config.mode {
        Mode::Detached => {
            let launcher = Detacher::new(TIMER_PROCESS_NAME);
            app::start_detached(config, &launcher, &notifier, &mut io::stdout(), timer::sleep_for)?;
            Ok(())
        }
        Mode::Foreground => {
            ctrlc::set_handler(|| {
                println!("\nTimer cancelled.");
                std::process::exit(INTERRUPTED);
            })
            .context("failed to install Ctrl-C handler")?;

            app::run_foreground(config, &notifier, &mut io::stdout(), timer::wall_clock())
        }
    }
}
