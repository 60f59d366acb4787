//! Duration handling: validated flag values summed into a total number of seconds

use std::fmt;

use crate::cli::CliError;

const SECS_PER_MINUTE: u64 = 60;
const SECS_PER_HOUR: u64 = 60 * 60;

/// The raw duration flags, each present only if it was supplied.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DurationSpec {
    pub seconds: Option<u64>,
    pub minutes: Option<u64>,
    pub hours: Option<u64>,
}

impl DurationSpec {
    /// Sums the supplied fields. Missing fields count as zero; a zero or
    /// overflowing total is rejected.
    pub fn total(&self) -> Result<TotalDuration, CliError> {
        let seconds = self.seconds.unwrap_or(0);
        let minutes = self.minutes.unwrap_or(0);
        let hours = self.hours.unwrap_or(0);

        let total = minutes
            .checked_mul(SECS_PER_MINUTE)
            .zip(hours.checked_mul(SECS_PER_HOUR))
            .and_then(|(m, h)| m.checked_add(h))
            .and_then(|mh| mh.checked_add(seconds))
            .ok_or(CliError::DurationTooLarge)?;

        TotalDuration::from_secs(total)
    }
}

/// A countdown length in whole seconds, always at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TotalDuration(u64);

impl TotalDuration {
    pub fn from_secs(secs: u64) -> Result<Self, CliError> {
        if secs == 0 {
            return Err(CliError::InvalidDuration);
        }
        Ok(Self(secs))
    }

    pub fn as_secs(&self) -> u64 {
        self.0
    }

    pub fn as_std(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.0)
    }
}

impl fmt::Display for TotalDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_hms(self.0))
    }
}

/// Parses a duration flag value. Only plain decimal digits are accepted and
/// the value must be at least one.
pub fn parse_flag_value(flag: char, raw: &str) -> Result<u64, CliError> {
    let invalid = || CliError::InvalidNumber {
        flag,
        raw: raw.to_string(),
    };

    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    match raw.parse::<u64>() {
        Ok(value) if value >= 1 => Ok(value),
        _ => Err(invalid()),
    }
}

/// Zero-padded `HH:MM:SS`. Hours widen instead of wrapping.
pub fn format_hms(secs: u64) -> String {
    let hours = secs / SECS_PER_HOUR;
    let minutes = (secs % SECS_PER_HOUR) / SECS_PER_MINUTE;
    let seconds = secs % SECS_PER_MINUTE;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}
