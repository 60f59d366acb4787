//! Runtime settings taken from the environment

use std::env;

pub const NOTIFY_COMMAND_VAR: &str = "POMO_NOTIFY_COMMAND";
pub const LOG_FILTER_VAR: &str = "POMO_LOG";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub notify_command: String,
    pub log_filter: Option<String>,
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            notify_command: non_empty(NOTIFY_COMMAND_VAR).unwrap_or_else(|| "notify-send".to_string()),
            log_filter: non_empty(LOG_FILTER_VAR),
        }
    }

    /// Filter directive for the log subscriber. An explicit `POMO_LOG` wins
    /// over `-v`.
    pub fn log_directive(&self, verbose: bool) -> String {
        match &self.log_filter {
            Some(filter) => filter.clone(),
            None if verbose => "pomo=debug".to_string(),
            None => "warn".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Settings {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let s = settings(&[]);
        assert_eq!(s.notify_command, "notify-send");
        assert_eq!(s.log_directive(false), "warn");
        assert_eq!(s.log_directive(true), "pomo=debug");
    }

    #[test]
    fn overrides() {
        let s = settings(&[(NOTIFY_COMMAND_VAR, "true"), (LOG_FILTER_VAR, "trace")]);
        assert_eq!(s.notify_command, "true");
        assert_eq!(s.log_directive(false), "trace");
        assert_eq!(s.log_directive(true), "trace");
    }

    #[test]
    fn blank_values_are_ignored() {
        let s = settings(&[(NOTIFY_COMMAND_VAR, " "), (LOG_FILTER_VAR, "")]);
        assert_eq!(s, settings(&[]));
    }
}
