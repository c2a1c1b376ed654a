//! Event severity levels

use crate::core::error::PipelineError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity of a log event, ordered from most to least verbose.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub enum Level {
    Verbose = 0,
    Debug = 1,
    #[default]
    Information = 2,
    Warning = 3,
    Error = 4,
    Fatal = 5,
}

impl Level {
    pub fn to_str(&self) -> &'static str {
        match self {
            Level::Verbose => "VERBOSE",
            Level::Debug => "DEBUG",
            Level::Information => "INFO",
            Level::Warning => "WARN",
            Level::Error => "ERROR",
            Level::Fatal => "FATAL",
        }
    }

    #[cfg(feature = "console")]
    pub fn color_code(&self) -> colored::Color {
        use colored::Color::*;
        match self {
            Level::Verbose => BrightBlack,
            Level::Debug => Blue,
            Level::Information => Green,
            Level::Warning => Yellow,
            Level::Error => Red,
            Level::Fatal => BrightRed,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl FromStr for Level {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "VERBOSE" | "TRACE" => Ok(Level::Verbose),
            "DEBUG" => Ok(Level::Debug),
            "INFO" | "INFORMATION" => Ok(Level::Information),
            "WARN" | "WARNING" => Ok(Level::Warning),
            "ERROR" => Ok(Level::Error),
            "FATAL" | "CRITICAL" => Ok(Level::Fatal),
            _ => Err(PipelineError::config(
                "level",
                format!("unknown level: '{}'", s),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_are_totally_ordered() {
        assert!(Level::Verbose < Level::Debug);
        assert!(Level::Debug < Level::Information);
        assert!(Level::Information < Level::Warning);
        assert!(Level::Warning < Level::Error);
        assert!(Level::Error < Level::Fatal);
    }

    #[test]
    fn test_parse_accepts_common_spellings() {
        assert_eq!("info".parse::<Level>().unwrap(), Level::Information);
        assert_eq!("Information".parse::<Level>().unwrap(), Level::Information);
        assert_eq!("WARNING".parse::<Level>().unwrap(), Level::Warning);
        assert_eq!("warn".parse::<Level>().unwrap(), Level::Warning);
        assert_eq!("verbose".parse::<Level>().unwrap(), Level::Verbose);
    }

    #[test]
    fn test_parse_rejects_unknown_level() {
        assert!("loud".parse::<Level>().is_err());
    }

    #[test]
    fn test_default_is_information() {
        assert_eq!(Level::default(), Level::Information);
    }
}
