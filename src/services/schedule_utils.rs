use chrono::NaiveDate;
use serde_json::json;

use crate::error::{AppError, AppResult};

pub const DAY_END_MINUTES: i64 = 24 * 60;

/// Parses "HH:MM" into minutes since midnight. "24:00" is accepted as the
/// right boundary of the day interval `[0, 1440)`.
pub fn parse_hhmm(value: &str) -> AppResult<i64> {
    let invalid =
        || AppError::validation_with_details("无效的时间格式", json!({ "value": value }));

    let (hour_raw, minute_raw) = value.trim().split_once(':').ok_or_else(invalid)?;
    let hour: i64 = hour_raw.parse().map_err(|_| invalid())?;
    let minute: i64 = minute_raw.parse().map_err(|_| invalid())?;

    if hour == 24 && minute == 0 {
        return Ok(DAY_END_MINUTES);
    }
    if !(0..24).contains(&hour) || !(0..60).contains(&minute) {
        return Err(invalid());
    }

    Ok(hour * 60 + minute)
}

pub fn format_minutes(total: i64) -> String {
    format!("{:02}:{:02}", total / 60, total % 60)
}

pub fn hour_of(minutes: i64) -> i64 {
    minutes / 60
}

pub fn parse_date(value: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|err| {
        AppError::validation_with_details(
            "无效的日期格式",
            json!({ "value": value, "error": err.to_string() }),
        )
    })
}

/// Half-open interval overlap: intervals that only touch do not overlap.
pub fn overlaps(a_start: i64, a_end: i64, b_start: i64, b_end: i64) -> bool {
    !(a_end <= b_start || a_start >= b_end)
}
