use serde_json::Value as JsonValue;

use crate::models::constraint::GlobalConstraint;
use crate::models::schedule::Weekday;
use crate::models::task::TaskRecord;
use crate::services::schedule_utils::{format_minutes, hour_of, parse_hhmm};

const DEFAULT_MAX_END_MINUTES: i64 = 23 * 60;
const DEFAULT_MIN_START_MINUTES: i64 = 6 * 60;

/// The first constraint a candidate placement violates. `constraint_type`
/// names the violated rule so failure reasons can reference it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub constraint_type: String,
    pub detail: String,
}

impl Violation {
    fn new(constraint_type: &str, detail: String) -> Self {
        Self {
            constraint_type: constraint_type.to_string(),
            detail,
        }
    }
}

fn time_payload(value: &JsonValue) -> Option<i64> {
    value
        .get("time")
        .and_then(JsonValue::as_str)
        .and_then(|raw| parse_hhmm(raw).ok())
}

fn range_payload(value: &JsonValue) -> Option<(i64, i64)> {
    let bounds = value.as_array()?;
    let lo = parse_hhmm(bounds.first()?.as_str()?).ok()?;
    let hi = parse_hhmm(bounds.get(1)?.as_str()?).ok()?;
    Some((lo, hi))
}

fn day_payload(value: &JsonValue) -> Option<&str> {
    // 两种历史载荷形状都存在："Monday" 以及 {"day": "Monday"}
    value
        .as_str()
        .or_else(|| value.get("day").and_then(JsonValue::as_str))
}

/// Returns the first global constraint the candidate violates, or `None` when
/// every constraint passes. Unrecognized constraint types are ignored.
pub fn global_violation(
    day: Weekday,
    start: i64,
    end: i64,
    constraints: &[GlobalConstraint],
) -> Option<Violation> {
    for constraint in constraints {
        match constraint.kind.as_str() {
            "allowed_time_range" => {
                if let Some((allowed_start, allowed_end)) = range_payload(&constraint.value) {
                    if start < allowed_start || end > allowed_end {
                        return Some(Violation::new(
                            "allowed_time_range",
                            format!(
                                "时间段必须完整落在 {} 至 {} 之间",
                                format_minutes(allowed_start),
                                format_minutes(allowed_end)
                            ),
                        ));
                    }
                }
            }
            "disallowed_days" => {
                if day_listed(day, &constraint.value) {
                    return Some(Violation::new(
                        "disallowed_days",
                        format!("{} 为禁止排程日", day.name()),
                    ));
                }
            }
            "max_end_time" => {
                let limit = time_payload(&constraint.value).unwrap_or(DEFAULT_MAX_END_MINUTES);
                if end > limit {
                    return Some(Violation::new(
                        "max_end_time",
                        format!("结束时间不得晚于 {}", format_minutes(limit)),
                    ));
                }
            }
            "min_start_time" => {
                let limit = time_payload(&constraint.value).unwrap_or(DEFAULT_MIN_START_MINUTES);
                if start < limit {
                    return Some(Violation::new(
                        "min_start_time",
                        format!("开始时间不得早于 {}", format_minutes(limit)),
                    ));
                }
            }
            _ => {}
        }
    }
    None
}

pub fn check_global(day: Weekday, start: i64, end: i64, constraints: &[GlobalConstraint]) -> bool {
    global_violation(day, start, end, constraints).is_none()
}

/// Whether any `disallowed_days` constraint excludes the whole day, so
/// candidate enumeration can skip it without checking individual slots.
pub fn day_disallowed(day: Weekday, constraints: &[GlobalConstraint]) -> bool {
    constraints
        .iter()
        .any(|constraint| constraint.kind == "disallowed_days" && day_listed(day, &constraint.value))
}

fn day_listed(day: Weekday, value: &JsonValue) -> bool {
    value
        .as_array()
        .map(|days| {
            days.iter()
                .filter_map(JsonValue::as_str)
                .any(|name| name.eq_ignore_ascii_case(day.name()))
        })
        .unwrap_or(false)
}

/// Returns the first task constraint the candidate violates, or `None` when
/// every constraint passes.
pub fn task_violation(task: &TaskRecord, day: Weekday, start: i64, end: i64) -> Option<Violation> {
    let hour = hour_of(start);

    for constraint in &task.constraints {
        match constraint.kind.as_str() {
            "fixed_time" => {
                let expected = constraint
                    .value
                    .get("start")
                    .and_then(JsonValue::as_str)
                    .and_then(|raw| parse_hhmm(raw).ok())
                    .zip(
                        constraint
                            .value
                            .get("end")
                            .and_then(JsonValue::as_str)
                            .and_then(|raw| parse_hhmm(raw).ok()),
                    );
                match expected {
                    Some((expected_start, expected_end))
                        if expected_start == start && expected_end == end => {}
                    _ => {
                        return Some(Violation::new(
                            "fixed_time",
                            "开始与结束时间必须与约束完全一致".to_string(),
                        ));
                    }
                }
            }
            "must_morning" => {
                if hour >= 12 {
                    return Some(Violation::new(
                        "must_morning",
                        "必须在中午 12 点前开始".to_string(),
                    ));
                }
            }
            "must_afternoon" => {
                if !(12..18).contains(&hour) {
                    return Some(Violation::new(
                        "must_afternoon",
                        "必须在 12 点至 18 点之间开始".to_string(),
                    ));
                }
            }
            "must_evening" => {
                if hour < 18 {
                    return Some(Violation::new(
                        "must_evening",
                        "必须在 18 点后开始".to_string(),
                    ));
                }
            }
            kind @ ("fixed_day" | "day") => {
                match day_payload(&constraint.value) {
                    Some(expected) if expected.eq_ignore_ascii_case(day.name()) => {}
                    _ => {
                        return Some(Violation::new(
                            kind,
                            format!("任务只能安排在约束指定的星期，而不是 {}", day.name()),
                        ));
                    }
                }
            }
            _ => {}
        }
    }
    None
}

pub fn check_task(task: &TaskRecord, day: Weekday, start: i64, end: i64) -> bool {
    task_violation(task, day, start, end).is_none()
}
