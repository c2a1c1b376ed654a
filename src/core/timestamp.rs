//! Timestamp formatting for sink output

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// How sinks render event timestamps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// ISO 8601 with milliseconds: `2025-01-08T10:30:45.123Z`
    #[default]
    Iso8601,

    /// RFC 3339 with millisecond precision and timezone offset
    Rfc3339,

    /// Milliseconds since the Unix epoch: `1736332245123`
    UnixMillis,

    /// Custom strftime format
    Custom(String),
}

impl TimestampFormat {
    #[must_use]
    pub fn format(&self, datetime: &DateTime<Utc>) -> String {
        match self {
            TimestampFormat::Iso8601 => datetime.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
            TimestampFormat::Rfc3339 => datetime.to_rfc3339_opts(SecondsFormat::Millis, false),
            TimestampFormat::UnixMillis => datetime.timestamp_millis().to_string(),
            TimestampFormat::Custom(format_str) => datetime.format(format_str).to_string(),
        }
    }

    /// Check if this format writes a bare number. The JSON output format
    /// emits numeric timestamps unquoted.
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(self, TimestampFormat::UnixMillis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_datetime() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 8, 10, 30, 45)
            .single()
            .expect("valid datetime")
            + chrono::Duration::milliseconds(123)
    }

    #[test]
    fn test_iso8601_format() {
        assert_eq!(
            TimestampFormat::Iso8601.format(&fixed_datetime()),
            "2025-01-08T10:30:45.123Z"
        );
    }

    #[test]
    fn test_rfc3339_format() {
        assert_eq!(
            TimestampFormat::Rfc3339.format(&fixed_datetime()),
            "2025-01-08T10:30:45.123+00:00"
        );
    }

    #[test]
    fn test_unix_millis_is_numeric() {
        let format = TimestampFormat::UnixMillis;
        assert!(format.is_numeric());
        assert!(!TimestampFormat::Iso8601.is_numeric());
        assert_eq!(format.format(&fixed_datetime()), "1736332245123");
    }

    #[test]
    fn test_custom_pattern() {
        let format = TimestampFormat::Custom("%Y-%m-%d".to_string());
        assert_eq!(format.format(&fixed_datetime()), "2025-01-08");
    }
}
