use chrono::{Datelike, Duration, NaiveDate};

use crate::models::constraint::GlobalConstraint;
use crate::models::schedule::Weekday;
use crate::models::task::TaskRecord;
use crate::services::constraint_checker;
use crate::services::overlap_index::OverlapIndex;
use crate::services::schedule_utils::{hour_of, DAY_END_MINUTES};
use crate::services::time_slots;

const BASE_SCORE: i64 = 100;

/// The calendar date that `day` denotes in the planning week starting from
/// `today` (same weekday resolves to today, earlier weekdays wrap forward).
pub fn resolve_week_date(day: Weekday, today: NaiveDate) -> NaiveDate {
    let today_index = today.weekday().num_days_from_monday() as i64;
    let offset = (day.index() as i64 - today_index).rem_euclid(7);
    today + Duration::days(offset)
}

/// Heuristic desirability of starting the task at `start` on `day`.
pub fn score_slot(
    task: &TaskRecord,
    deadline: Option<NaiveDate>,
    day: Weekday,
    start: i64,
    today: NaiveDate,
) -> i64 {
    let hour = hour_of(start);
    let mut score = BASE_SCORE;

    for preferred in &task.preferred_time {
        match preferred.as_str() {
            "morning" if (6..12).contains(&hour) => score += 20,
            "afternoon" if (12..18).contains(&hour) => score += 20,
            "evening" if (18..22).contains(&hour) => score += 20,
            "night" if (22..24).contains(&hour) => score += 10,
            _ => {}
        }
    }

    // Hard tasks favored early, easy tasks late.
    let difficulty = task.difficulty();
    if difficulty >= 4 && hour < 12 {
        score += 15;
    } else if difficulty <= 2 && hour >= 18 {
        score += 10;
    }

    if hour >= 22 {
        score -= 20;
    }

    match deadline {
        None => {
            // 没有截止日期时偏向本周较早的日子
            score += (5 - day.index() as i64) * 5;
        }
        Some(deadline_date) => {
            let slot_date = resolve_week_date(day, today);
            let days_before = deadline_date.signed_duration_since(slot_date).num_days();
            if days_before < 0 {
                score -= 100;
            } else if days_before == 0 {
                score += 50;
            } else if days_before <= 2 {
                score += 30;
            }
        }
    }

    score
}

/// Enumerates candidates day-major then time-minor, keeps the highest score,
/// and breaks ties by enumeration order. The tie-break is arbitrary but
/// load-bearing: callers rely on byte-identical output for identical input.
pub fn find_best_slot(
    task: &TaskRecord,
    duration: i64,
    deadline: Option<NaiveDate>,
    globals: &[GlobalConstraint],
    index: &OverlapIndex,
    today: NaiveDate,
) -> Option<(Weekday, i64, i64)> {
    let mut best: Option<(i64, Weekday, i64, i64)> = None;

    for day in Weekday::ACTIVE_DAYS {
        if constraint_checker::day_disallowed(day, globals) {
            continue;
        }
        for &start in time_slots::time_slots() {
            let end = start + duration;
            if end > DAY_END_MINUTES {
                continue;
            }
            if !constraint_checker::check_global(day, start, end, globals) {
                continue;
            }
            if !constraint_checker::check_task(task, day, start, end) {
                continue;
            }
            if index.has_overlap(day, start, end) {
                continue;
            }

            let score = score_slot(task, deadline, day, start, today);
            if best.as_ref().map_or(true, |&(top, ..)| score > top) {
                best = Some((score, day, start, end));
            }
        }
    }

    best.map(|(_, day, start, end)| (day, start, end))
}
