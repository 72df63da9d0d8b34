use std::cmp::Reverse;
use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde_json::json;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::constraint::GlobalConstraint;
use crate::models::schedule::{
    FailedTask, ScheduledSlot, SlotKind, Weekday, WeeklySchedule, WeeklyScheduleResult,
};
use crate::models::task::{TaskMode, TaskRecord};
use crate::services::constraint_checker;
use crate::services::overlap_index::OverlapIndex;
use crate::services::schedule_utils::{format_minutes, parse_date, parse_hhmm};
use crate::services::slot_scorer;
use crate::services::task_order;

/// Greedy weekly solver. Placements are irrevocable: once a task occupies a
/// slot, later tasks cannot displace it, even when another arrangement would
/// satisfy more tasks. A true backtracking search is a future extension.
///
/// `today` drives deadline scoring and must come from the caller, so that
/// identical inputs always yield byte-identical results.
pub struct WeekSolver {
    today: NaiveDate,
}

struct FixedPlacement<'a> {
    record: &'a TaskRecord,
    day: Weekday,
    start: i64,
    end: i64,
}

struct FlexPlacement<'a> {
    record: &'a TaskRecord,
    duration: i64,
    deadline: Option<NaiveDate>,
}

struct PlacedSlot {
    task_id: String,
    name: String,
    start: i64,
    end: i64,
    kind: SlotKind,
    category: Option<String>,
}

impl WeekSolver {
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }

    /// Assigns every task either a slot or a failure record. Input-validation
    /// problems abort the whole solve before any placement happens;
    /// unsatisfiable tasks do not.
    pub fn solve(
        &self,
        tasks: &[TaskRecord],
        globals: &[GlobalConstraint],
    ) -> AppResult<WeeklyScheduleResult> {
        let run_id = Uuid::new_v4();
        debug!(
            target: "app::solver",
            %run_id,
            task_count = tasks.len(),
            global_constraint_count = globals.len(),
            "solving weekly schedule"
        );

        let (fixed_tasks, mut flex_tasks) = self.prepare(tasks)?;

        let mut index = OverlapIndex::new();
        let mut days: BTreeMap<Weekday, Vec<PlacedSlot>> = Weekday::ACTIVE_DAYS
            .into_iter()
            .map(|day| (day, Vec::new()))
            .collect();
        let mut failed_tasks = Vec::new();

        // 固定任务优先，且互相独立：单个失败不影响其它任务
        for placement in &fixed_tasks {
            match self.try_place_fixed(placement, globals, &mut index, &mut days) {
                Ok(day) => {
                    debug!(
                        target: "app::solver",
                        %run_id,
                        task_id = %placement.record.id,
                        day = day.name(),
                        start = %format_minutes(placement.start),
                        "placed fixed task"
                    );
                }
                Err(reason) => {
                    debug!(
                        target: "app::solver",
                        %run_id,
                        task_id = %placement.record.id,
                        %reason,
                        "fixed task rejected"
                    );
                    failed_tasks.push(FailedTask::constraints(
                        &placement.record.id,
                        &placement.record.name,
                        reason,
                    ));
                }
            }
        }

        flex_tasks.sort_by_key(|task| {
            Reverse(task_order::flex_sort_key(
                task.record.priority(),
                task.deadline,
                self.today,
            ))
        });

        for placement in &flex_tasks {
            match slot_scorer::find_best_slot(
                placement.record,
                placement.duration,
                placement.deadline,
                globals,
                &index,
                self.today,
            ) {
                Some((day, start, end)) => {
                    index.insert(day, start, end);
                    days.get_mut(&day)
                        .expect("active day present")
                        .push(placed_slot(placement.record, start, end, SlotKind::Flex));
                    debug!(
                        target: "app::solver",
                        %run_id,
                        task_id = %placement.record.id,
                        day = day.name(),
                        start = %format_minutes(start),
                        "placed flexible task"
                    );
                }
                None => {
                    debug!(
                        target: "app::solver",
                        %run_id,
                        task_id = %placement.record.id,
                        "no candidate slot satisfies all constraints"
                    );
                    failed_tasks.push(FailedTask::constraints(
                        &placement.record.id,
                        &placement.record.name,
                        "没有同时满足所有约束的可用时段",
                    ));
                }
            }
        }

        let mut schedule = WeeklySchedule::new();
        for (day, mut slots) in days {
            slots.sort_by_key(|slot| slot.start);
            for slot in slots {
                schedule.push(ScheduledSlot {
                    task_id: slot.task_id,
                    name: slot.name,
                    day,
                    start: format_minutes(slot.start),
                    end: format_minutes(slot.end),
                    kind: slot.kind,
                    category: slot.category,
                });
            }
        }

        let success = failed_tasks.is_empty();
        let message = if success {
            "排程生成成功".to_string()
        } else {
            format!("{} 个任务无法排入本周", failed_tasks.len())
        };

        info!(
            target: "app::solver",
            %run_id,
            placed = schedule.total_slots(),
            failed = failed_tasks.len(),
            success,
            "weekly schedule solved"
        );

        Ok(WeeklyScheduleResult {
            success,
            schedule,
            failed_tasks,
            message,
        })
    }

    fn prepare<'a>(
        &self,
        tasks: &'a [TaskRecord],
    ) -> AppResult<(Vec<FixedPlacement<'a>>, Vec<FlexPlacement<'a>>)> {
        let mut fixed = Vec::new();
        let mut flex = Vec::new();

        for task in tasks {
            match task.mode {
                TaskMode::Fixed => {
                    let day_name = task.day.as_deref().ok_or_else(|| {
                        AppError::validation_with_details(
                            "固定任务缺少 day 字段",
                            json!({ "taskId": task.id }),
                        )
                    })?;
                    let day = Weekday::parse(day_name).ok_or_else(|| {
                        AppError::validation_with_details(
                            "无法识别的星期名称",
                            json!({ "taskId": task.id, "day": day_name }),
                        )
                    })?;
                    let (Some(start_raw), Some(end_raw)) = (&task.start_time, &task.end_time)
                    else {
                        return Err(AppError::validation_with_details(
                            "固定任务缺少开始或结束时间",
                            json!({ "taskId": task.id }),
                        ));
                    };
                    let start = parse_hhmm(start_raw)?;
                    let end = parse_hhmm(end_raw)?;
                    if end <= start {
                        return Err(AppError::validation_with_details(
                            "结束时间必须晚于开始时间",
                            json!({ "taskId": task.id, "start": start_raw, "end": end_raw }),
                        ));
                    }
                    fixed.push(FixedPlacement {
                        record: task,
                        day,
                        start,
                        end,
                    });
                }
                TaskMode::Duration => {
                    let duration = task.duration_minutes.ok_or_else(|| {
                        AppError::validation_with_details(
                            "弹性任务缺少时长",
                            json!({ "taskId": task.id }),
                        )
                    })?;
                    if duration <= 0 {
                        return Err(AppError::validation_with_details(
                            "任务时长必须为正数",
                            json!({ "taskId": task.id, "durationMinutes": duration }),
                        ));
                    }
                    let deadline = match &task.deadline {
                        Some(deadline) => Some(parse_date(&deadline.date)?),
                        None => None,
                    };
                    flex.push(FlexPlacement {
                        record: task,
                        duration,
                        deadline,
                    });
                }
            }
        }

        Ok((fixed, flex))
    }

    fn try_place_fixed(
        &self,
        placement: &FixedPlacement<'_>,
        globals: &[GlobalConstraint],
        index: &mut OverlapIndex,
        days: &mut BTreeMap<Weekday, Vec<PlacedSlot>>,
    ) -> Result<Weekday, String> {
        let FixedPlacement {
            record,
            day,
            start,
            end,
        } = *placement;

        if !day.is_active() {
            return Err(format!("{} 不在可排程的星期范围内", day.name()));
        }
        if let Some(violation) = constraint_checker::global_violation(day, start, end, globals) {
            return Err(format!(
                "违反全局约束 {}: {}",
                violation.constraint_type, violation.detail
            ));
        }
        if let Some(violation) = constraint_checker::task_violation(record, day, start, end) {
            return Err(format!(
                "违反任务约束 {}: {}",
                violation.constraint_type, violation.detail
            ));
        }
        if index.has_overlap(day, start, end) {
            return Err("与已排任务时间重叠".to_string());
        }

        index.insert(day, start, end);
        days.get_mut(&day)
            .expect("active day present")
            .push(placed_slot(record, start, end, SlotKind::Fixed));
        Ok(day)
    }
}

fn placed_slot(record: &TaskRecord, start: i64, end: i64, kind: SlotKind) -> PlacedSlot {
    PlacedSlot {
        task_id: record.id.clone(),
        name: record.name.clone(),
        start,
        end,
        kind,
        category: record.category.clone(),
    }
}
