//! Time and timestamp helpers.
//!
//! Schedules travel as epoch seconds. Users enter and read them as local
//! date-times, so parsing and formatting both go through the local time
//! zone.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};

use crate::error::ScheduleError;

/// Epoch seconds as reported by the device and stored in schedules.
pub type EpochSeconds = i64;

/// Return the current time as epoch seconds.
#[must_use]
pub fn now_epoch() -> EpochSeconds {
    Utc::now().timestamp()
}

/// Parse a local date-time string (`YYYY-MM-DDTHH:MM`, seconds optional)
/// into epoch seconds.
///
/// The string is interpreted in the local time zone. An ambiguous local
/// time (DST fold) resolves to the earliest valid mapping; a nonexistent
/// one (DST gap) is rejected. This makes the result machine-dependent,
/// which matches how the panel is actually used: the person entering the
/// schedule stands in the same time zone as the gate.
///
/// # Errors
///
/// Returns [`ScheduleError::Parse`] when the text matches neither accepted
/// format, or [`ScheduleError::NonexistentLocalTime`] for DST-gap times.
pub fn parse_local(text: &str) -> Result<EpochSeconds, ScheduleError> {
    let naive = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M"))
        .map_err(|_| ScheduleError::Parse(text.to_string()))?;

    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.timestamp())
        .ok_or_else(|| ScheduleError::NonexistentLocalTime(text.to_string()))
}

/// Render epoch seconds as `D-M-YYYY H:M` in the local time zone,
/// non-zero-padded (`9-11-2021 15:00` displays as `9-11-2021 15:0`).
#[must_use]
pub fn format_local(epoch: EpochSeconds) -> String {
    let dt = DateTime::<Utc>::from_timestamp(epoch, 0)
        .unwrap_or(DateTime::UNIX_EPOCH)
        .with_timezone(&Local);
    dt.format("%-d-%-m-%Y %-H:%-M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn should_return_current_epoch() {
        let before = Utc::now().timestamp();
        let ts = now_epoch();
        let after = Utc::now().timestamp();
        assert!(ts >= before);
        assert!(ts <= after);
    }

    #[test]
    fn should_parse_minutes_precision() {
        let epoch = parse_local("2021-11-09T15:00").unwrap();
        let dt = Local.timestamp_opt(epoch, 0).unwrap();
        assert_eq!(dt.year(), 2021);
        assert_eq!(dt.month(), 11);
        assert_eq!(dt.day(), 9);
        assert_eq!(dt.hour(), 15);
        assert_eq!(dt.minute(), 0);
    }

    #[test]
    fn should_parse_seconds_precision() {
        let with = parse_local("2021-11-09T15:00:30").unwrap();
        let without = parse_local("2021-11-09T15:00").unwrap();
        assert_eq!(with, without + 30);
    }

    #[test]
    fn should_reject_garbage() {
        assert!(parse_local("tomorrow at noon").is_err());
        assert!(parse_local("").is_err());
        assert!(parse_local("2021-13-40T99:99").is_err());
    }

    #[test]
    fn should_format_without_zero_padding() {
        // 5-3-2022 7:05 local — minute renders as "5", not "05".
        let epoch = parse_local("2022-03-05T07:05").unwrap();
        assert_eq!(format_local(epoch), "5-3-2022 7:5");
    }

    #[test]
    fn should_roundtrip_parse_then_format() {
        let epoch = parse_local("2021-11-09T15:00").unwrap();
        assert_eq!(format_local(epoch), "9-11-2021 15:0");
    }
}
