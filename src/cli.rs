//! Command-line parsing into an immutable timer configuration

use std::ffi::OsString;

use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::{ArgAction, Parser};
use thiserror::Error;

use crate::duration::{parse_flag_value, DurationSpec, TotalDuration};

pub const USAGE: &str = "\
Simple Pomodoro Timer

Pass flags to set the length of the timer:
    -s N      seconds
    -m N      minutes
    -h N      hours

The values are summed. The timer runs in the background for the total
duration, then sends a desktop notification.

Other flags:
    -n TEXT   label shown in the notification (default: break)
    -f        stay in the foreground and show a countdown
    -l        list running background timers
    -v        verbose diagnostics on stderr

EXAMPLE:
    pomo -m 40            notify in 40 minutes
    pomo -h 1 -m 30 -f    count down 01:30:00 in this terminal
";

/// Errors detected before any timer work starts. The display text is what
/// the user sees on stderr.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CliError {
    #[error("Option -{0} requires an argument.")]
    MissingArgument(char),

    #[error("Unknown option {0}.")]
    UnknownOption(String),

    #[error("Unknown option character \\x{0:x}.")]
    UnprintableOption(u32),

    #[error("Option -{flag} expects a value made up of digits not: {raw}")]
    InvalidNumber { flag: char, raw: String },

    #[error("invalid duration: the total must be at least one second")]
    InvalidDuration,

    #[error("invalid duration: the total is too large")]
    DurationTooLarge,

    #[error("{0}")]
    Syntax(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Fork into the background and sleep silently.
    Detached,
    /// Block the terminal with a live countdown line.
    Foreground,
}

/// Everything a timer run needs, fixed at parse time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerConfig {
    pub duration: TotalDuration,
    pub label: Option<String>,
    pub mode: Mode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    Usage,
    List,
    Start(TimerConfig),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parsed {
    pub invocation: Invocation,
    pub verbose: bool,
}

#[derive(Debug, Parser)]
#[command(
    name = "pomo",
    disable_help_flag = true,
    disable_version_flag = true
)]
struct Cli {
    #[arg(short = 's', value_name = "N", action = ArgAction::Append, allow_hyphen_values = true)]
    seconds: Vec<String>,

    #[arg(short = 'm', value_name = "N", action = ArgAction::Append, allow_hyphen_values = true)]
    minutes: Vec<String>,

    #[arg(short = 'h', value_name = "N", action = ArgAction::Append, allow_hyphen_values = true)]
    hours: Vec<String>,

    #[arg(short = 'n', value_name = "TEXT", action = ArgAction::Append, allow_hyphen_values = true)]
    label: Vec<String>,

    #[arg(short = 'l', action = ArgAction::Count)]
    list: u8,

    #[arg(short = 'f', action = ArgAction::Count)]
    foreground: u8,

    #[arg(short = 'v', action = ArgAction::Count)]
    verbose: u8,
}

/// Parses the full argv, program name included.
pub fn parse_args<I, T>(args: I) -> Result<Parsed, CliError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    if args.len() <= 1 {
        return Ok(Parsed {
            invocation: Invocation::Usage,
            verbose: false,
        });
    }

    let cli = Cli::try_parse_from(args).map_err(from_clap)?;
    let verbose = cli.verbose > 0;

    if cli.list > 0 {
        return Ok(Parsed {
            invocation: Invocation::List,
            verbose,
        });
    }

    let spec = DurationSpec {
        seconds: last_valid('s', &cli.seconds)?,
        minutes: last_valid('m', &cli.minutes)?,
        hours: last_valid('h', &cli.hours)?,
    };

    let config = TimerConfig {
        duration: spec.total()?,
        label: label_from(cli.label.last()),
        mode: if cli.foreground > 0 {
            Mode::Foreground
        } else {
            Mode::Detached
        },
    };

    Ok(Parsed {
        invocation: Invocation::Start(config),
        verbose,
    })
}

/// Validates every occurrence of a repeated flag and keeps the last one.
fn last_valid(flag: char, raws: &[String]) -> Result<Option<u64>, CliError> {
    let mut value = None;
    for raw in raws {
        value = Some(parse_flag_value(flag, raw)?);
    }
    Ok(value)
}

fn label_from(raw: Option<&String>) -> Option<String> {
    let raw = raw?;
    if raw.trim().is_empty() {
        eprintln!("Warning: empty label given to -n, the notification will use the default");
        return None;
    }
    Some(raw.clone())
}

fn from_clap(err: clap::Error) -> CliError {
    let invalid_arg = match err.get(ContextKind::InvalidArg) {
        Some(ContextValue::String(arg)) => Some(arg.clone()),
        _ => None,
    };

    match (err.kind(), invalid_arg) {
        (ErrorKind::UnknownArgument, Some(arg)) => unknown_option(&arg),
        (ErrorKind::InvalidValue | ErrorKind::TooFewValues, Some(arg)) => match short_flag(&arg) {
            Some(flag) => CliError::MissingArgument(flag),
            None => syntax(&err),
        },
        _ => syntax(&err),
    }
}

fn unknown_option(arg: &str) -> CliError {
    let mut chars = arg.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (Some('-'), Some(c), None) if c.is_control() => CliError::UnprintableOption(c as u32),
        _ => CliError::UnknownOption(arg.to_string()),
    }
}

/// Extracts `s` from clap's rendering of the argument, e.g. `-s <N>`.
fn short_flag(arg: &str) -> Option<char> {
    let mut chars = arg.strip_prefix('-')?.chars();
    let flag = chars.next()?;
    match chars.next() {
        None | Some(' ') => Some(flag),
        _ => None,
    }
}

fn syntax(err: &clap::Error) -> CliError {
    let rendered = err.to_string();
    let first = rendered.lines().next().unwrap_or_default();
    CliError::Syntax(first.trim_start_matches("error: ").to_string())
}
