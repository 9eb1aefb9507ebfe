//! Severity definitions

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Severity {
    Debug = 0,
    #[default]
    Info = 1,
    Warning = 2,
    Error = 3,
    Fatal = 4,
}

impl Severity {
    pub const ALL: [Severity; 5] = [
        Severity::Debug,
        Severity::Info,
        Severity::Warning,
        Severity::Error,
        Severity::Fatal,
    ];

    /// Numeric rank used for threshold comparison
    #[inline]
    pub const fn rank(self) -> u8 {
        self as u8
    }

    /// Single display character used in console headers and remote records
    #[inline]
    pub const fn as_char(self) -> char {
        match self {
            Severity::Debug => 'D',
            Severity::Info => 'I',
            Severity::Warning => 'W',
            Severity::Error => 'E',
            Severity::Fatal => 'F',
        }
    }

    /// Map a numeric threshold code (0=Debug .. 4=Fatal) to a severity.
    ///
    /// Unrecognized codes fall back to `Info`.
    pub const fn from_code(code: u8) -> Self {
        match code {
            0 => Severity::Debug,
            1 => Severity::Info,
            2 => Severity::Warning,
            3 => Severity::Error,
            4 => Severity::Fatal,
            _ => Severity::Info,
        }
    }

    /// Inclusive threshold test: an event at `self` passes `threshold`
    #[inline]
    pub const fn passes(self, threshold: Severity) -> bool {
        self.rank() >= threshold.rank()
    }

    pub fn to_str(&self) -> &'static str {
        match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
        }
    }

    #[cfg(feature = "console")]
    pub fn color_code(&self) -> colored::Color {
        use colored::Color::*;
        match self {
            Severity::Debug => Blue,
            Severity::Info => Green,
            Severity::Warning => Yellow,
            Severity::Error => Red,
            Severity::Fatal => BrightRed,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "DEBUG" | "D" => Ok(Severity::Debug),
            "INFO" | "I" => Ok(Severity::Info),
            "WARN" | "WARNING" | "W" => Ok(Severity::Warning),
            "ERROR" | "E" => Ok(Severity::Error),
            "FATAL" | "F" => Ok(Severity::Fatal),
            _ => Err(format!("Invalid severity: '{}'", s)),
        }
    }
}
