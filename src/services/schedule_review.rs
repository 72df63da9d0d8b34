use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::models::schedule::{Weekday, WeeklySchedule};
use crate::models::task::TaskRecord;
use crate::services::schedule_utils::{parse_date, parse_hhmm};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleConflict {
    pub day: Weekday,
    pub first_task: String,
    pub second_task: String,
}

/// Audits an assembled schedule for overlapping neighbours, independent of
/// how it was produced. Useful to callers re-checking a stored schedule.
pub fn find_conflicts(schedule: &WeeklySchedule) -> AppResult<Vec<ScheduleConflict>> {
    let mut conflicts = Vec::new();

    for (day, slots) in schedule.iter() {
        let mut parsed = Vec::with_capacity(slots.len());
        for slot in slots {
            parsed.push((parse_hhmm(&slot.start)?, parse_hhmm(&slot.end)?, slot));
        }
        parsed.sort_by_key(|&(start, _, _)| start);

        for pair in parsed.windows(2) {
            let (_, current_end, current) = pair[0];
            let (next_start, _, next) = pair[1];
            if current_end > next_start {
                conflicts.push(ScheduleConflict {
                    day,
                    first_task: current.name.clone(),
                    second_task: next.name.clone(),
                });
            }
        }
    }

    Ok(conflicts)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingDeadline {
    pub task_id: String,
    pub name: String,
    pub date: String,
}

/// Tasks whose deadline falls within the next `horizon_days` days (today
/// included), sorted by deadline date.
pub fn upcoming_deadlines(
    tasks: &[TaskRecord],
    today: NaiveDate,
    horizon_days: i64,
) -> AppResult<Vec<UpcomingDeadline>> {
    let mut rows = Vec::new();

    for task in tasks {
        let Some(deadline) = &task.deadline else {
            continue;
        };
        let date = parse_date(&deadline.date)?;
        let days_until = date.signed_duration_since(today).num_days();
        if (0..=horizon_days).contains(&days_until) {
            rows.push((
                date,
                UpcomingDeadline {
                    task_id: task.id.clone(),
                    name: task.name.clone(),
                    date: deadline.date.clone(),
                },
            ));
        }
    }

    rows.sort_by_key(|&(date, _)| date);
    Ok(rows.into_iter().map(|(_, row)| row).collect())
}
