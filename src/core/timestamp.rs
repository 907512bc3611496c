//! Timestamp formatting for log lines

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Timestamp format used by line builders.
///
/// The default renders local time as `2024-03-05 10:05:00`, the on-disk line
/// format this crate writes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// `2024-03-05 10:05:00` (local time, second precision)
    #[default]
    DateTimeSeconds,

    /// RFC 3339 with offset: `2024-03-05T10:05:00+08:00`
    Rfc3339,

    /// Custom strftime format
    ///
    /// ```
    /// use fanlog::core::timestamp::TimestampFormat;
    ///
    /// let format = TimestampFormat::Custom("%d/%b/%Y:%H:%M:%S".to_string());
    /// ```
    Custom(String),
}

impl TimestampFormat {
    /// Format a `DateTime<Local>` according to this format
    #[must_use]
    pub fn format(&self, datetime: &DateTime<Local>) -> String {
        match self {
            TimestampFormat::DateTimeSeconds => {
                datetime.format("%Y-%m-%d %H:%M:%S").to_string()
            }
            TimestampFormat::Rfc3339 => {
                datetime.to_rfc3339_opts(chrono::SecondsFormat::Secs, false)
            }
            TimestampFormat::Custom(format_str) => datetime.format(format_str).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_datetime() -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2024, 3, 5, 10, 5, 0)
            .single()
            .expect("valid datetime")
    }

    #[test]
    fn test_default_format() {
        let format = TimestampFormat::default();
        assert_eq!(format.format(&fixed_datetime()), "2024-03-05 10:05:00");
    }

    #[test]
    fn test_rfc3339_format() {
        let result = TimestampFormat::Rfc3339.format(&fixed_datetime());
        assert!(result.starts_with("2024-03-05T10:05:00"));
    }

    #[test]
    fn test_custom_format() {
        let format = TimestampFormat::Custom("%Y/%m/%d %H:%M".to_string());
        assert_eq!(format.format(&fixed_datetime()), "2024/03/05 10:05");
    }

    #[test]
    fn test_default_is_datetime_seconds() {
        assert_eq!(TimestampFormat::default(), TimestampFormat::DateTimeSeconds);
    }
}
