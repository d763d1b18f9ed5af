use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::FilterError;

/// Log levels known to the JBoss log manager, ordered by severity.
///
/// Several names share a severity (`WARN` and `WARNING`, `ERROR` and
/// `SEVERE`), but they remain distinct levels: equality compares the level
/// itself, ordering compares [`Level::severity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Level {
    All,
    Finest,
    Trace,
    Finer,
    Fine,
    Debug,
    Config,
    Info,
    Warn,
    Warning,
    Error,
    Severe,
    Fatal,
    Off,
}

impl Level {
    pub fn severity(&self) -> i32 {
        match self {
            Level::All => i32::MIN,
            Level::Finest => 300,
            Level::Trace => 400,
            Level::Finer => 400,
            Level::Fine => 500,
            Level::Debug => 500,
            Level::Config => 700,
            Level::Info => 800,
            Level::Warn => 900,
            Level::Warning => 900,
            Level::Error => 1000,
            Level::Severe => 1000,
            Level::Fatal => 1100,
            Level::Off => i32::MAX,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Level::All => "ALL",
            Level::Finest => "FINEST",
            Level::Trace => "TRACE",
            Level::Finer => "FINER",
            Level::Fine => "FINE",
            Level::Debug => "DEBUG",
            Level::Config => "CONFIG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
            Level::Severe => "SEVERE",
            Level::Fatal => "FATAL",
            Level::Off => "OFF",
        }
    }

    /// True when this level is at least as severe as `threshold`.
    pub fn is_at_least(&self, threshold: Level) -> bool {
        self.severity() >= threshold.severity()
    }
}

impl FromStr for Level {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ALL" => Ok(Level::All),
            "FINEST" => Ok(Level::Finest),
            "TRACE" => Ok(Level::Trace),
            "FINER" => Ok(Level::Finer),
            "FINE" => Ok(Level::Fine),
            "DEBUG" => Ok(Level::Debug),
            "CONFIG" => Ok(Level::Config),
            "INFO" => Ok(Level::Info),
            "WARN" => Ok(Level::Warn),
            "WARNING" => Ok(Level::Warning),
            "ERROR" => Ok(Level::Error),
            "SEVERE" => Ok(Level::Severe),
            "FATAL" => Ok(Level::Fatal),
            "OFF" => Ok(Level::Off),
            _ => Err(FilterError::UnknownLevel(s.to_string())),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
