use chrono::NaiveDate;
use serde_json::json;
use tempfile::tempdir;
use weekplan::models::constraint::GlobalConstraint;
use weekplan::models::schedule::{SlotKind, Weekday, WeeklyScheduleResult};
use weekplan::models::task::{TaskConstraint, TaskDeadline, TaskMode, TaskRecord};
use weekplan::services::constraint_checker;
use weekplan::services::schedule_review;
use weekplan::services::schedule_utils;
use weekplan::services::solver::WeekSolver;

fn monday() -> NaiveDate {
    // 2025-06-02 is a Monday; the planning week starts here.
    NaiveDate::from_ymd_opt(2025, 6, 2).expect("valid date")
}

fn base_task(id: &str, name: &str, mode: TaskMode) -> TaskRecord {
    TaskRecord {
        id: id.into(),
        name: name.into(),
        mode,
        day: None,
        start_time: None,
        end_time: None,
        duration_minutes: None,
        deadline: None,
        category: None,
        difficulty: None,
        priority: None,
        preferred_time: Vec::new(),
        constraints: Vec::new(),
    }
}

fn flex(id: &str, name: &str, duration: i64) -> TaskRecord {
    let mut task = base_task(id, name, TaskMode::Duration);
    task.duration_minutes = Some(duration);
    task
}

fn fixed(id: &str, name: &str, day: &str, start: &str, end: &str) -> TaskRecord {
    let mut task = base_task(id, name, TaskMode::Fixed);
    task.day = Some(day.into());
    task.start_time = Some(start.into());
    task.end_time = Some(end.into());
    task
}

fn assert_completeness(result: &WeeklyScheduleResult, input_count: usize) {
    assert_eq!(
        result.schedule.total_slots() + result.failed_tasks.len(),
        input_count,
        "every input task must be placed or failed, never dropped"
    );
}

fn assert_no_overlap(result: &WeeklyScheduleResult) {
    for (day, slots) in result.schedule.iter() {
        for (i, a) in slots.iter().enumerate() {
            for b in slots.iter().skip(i + 1) {
                let a_start = schedule_utils::parse_hhmm(&a.start).expect("start");
                let a_end = schedule_utils::parse_hhmm(&a.end).expect("end");
                let b_start = schedule_utils::parse_hhmm(&b.start).expect("start");
                let b_end = schedule_utils::parse_hhmm(&b.end).expect("end");
                assert!(
                    !schedule_utils::overlaps(a_start, a_end, b_start, b_end),
                    "slots {} and {} overlap on {}",
                    a.task_id,
                    b.task_id,
                    day.name()
                );
            }
        }
    }
}

fn assert_constraint_soundness(
    result: &WeeklyScheduleResult,
    tasks: &[TaskRecord],
    globals: &[GlobalConstraint],
) {
    for (day, slots) in result.schedule.iter() {
        for slot in slots {
            let start = schedule_utils::parse_hhmm(&slot.start).expect("start");
            let end = schedule_utils::parse_hhmm(&slot.end).expect("end");
            assert!(
                constraint_checker::check_global(day, start, end, globals),
                "placed slot for {} violates a global constraint",
                slot.task_id
            );
            let task = tasks
                .iter()
                .find(|task| task.id == slot.task_id)
                .expect("placed slot refers to an input task");
            assert!(
                constraint_checker::check_task(task, day, start, end),
                "placed slot for {} violates a task constraint",
                slot.task_id
            );
        }
    }
}

#[test]
fn lone_flexible_task_lands_monday_at_dawn() {
    let dir = tempdir().expect("temp dir");
    weekplan::utils::logger::init_logging(dir.path()).expect("logger");

    let tasks = vec![flex("t1", "Deep Work", 60)];
    let result = WeekSolver::new(monday()).solve(&tasks, &[]).expect("solve");

    assert!(result.success);
    assert!(result.failed_tasks.is_empty());
    assert_completeness(&result, tasks.len());

    let monday_slots = result.schedule.day(Weekday::Monday);
    assert_eq!(monday_slots.len(), 1);
    assert_eq!(monday_slots[0].start, "06:00");
    assert_eq!(monday_slots[0].end, "07:00");
    assert_eq!(monday_slots[0].kind, SlotKind::Flex);
}

#[test]
fn fixed_task_on_globally_disallowed_day_fails_with_named_constraint() {
    let tasks = vec![fixed("t1", "Standup", "Monday", "09:00", "10:00")];
    let globals = vec![GlobalConstraint::new("disallowed_days", json!(["Monday"]))];

    let result = WeekSolver::new(monday())
        .solve(&tasks, &globals)
        .expect("solve");

    assert!(!result.success);
    assert_eq!(result.failed_tasks.len(), 1);
    assert_eq!(result.failed_tasks[0].status, "FAILED_CONSTRAINTS");
    assert!(
        result.failed_tasks[0].reason.contains("disallowed_days"),
        "reason must reference the violated constraint: {}",
        result.failed_tasks[0].reason
    );
    assert_eq!(result.schedule.total_slots(), 0);
    assert_completeness(&result, tasks.len());
}

#[test]
fn morning_twins_stack_in_input_order() {
    let mut first = flex("t1", "Reading", 30);
    first.preferred_time = vec!["morning".into()];
    first.constraints = vec![TaskConstraint::new("must_morning", json!(null))];
    let mut second = flex("t2", "Writing", 30);
    second.preferred_time = vec!["morning".into()];
    second.constraints = vec![TaskConstraint::new("must_morning", json!(null))];

    let tasks = vec![first, second];
    let result = WeekSolver::new(monday()).solve(&tasks, &[]).expect("solve");

    assert!(result.success);
    let monday_slots = result.schedule.day(Weekday::Monday);
    assert_eq!(monday_slots.len(), 2);
    assert_eq!(monday_slots[0].task_id, "t1");
    assert_eq!(monday_slots[0].start, "06:00");
    assert_eq!(monday_slots[0].end, "06:30");
    assert_eq!(monday_slots[1].task_id, "t2");
    assert_eq!(monday_slots[1].start, "06:30");
    assert_eq!(monday_slots[1].end, "07:00");
    assert_no_overlap(&result);
}

#[test]
fn high_priority_beats_deadline_urgency_in_ordering() {
    // Key for A: 5 * 100 = 500. Key for B: 1 * 100 + (100 - 2) = 198.
    let mut task_a = flex("a", "Thesis", 60);
    task_a.priority = Some(5);
    task_a.constraints = vec![
        TaskConstraint::new("fixed_day", json!({ "day": "Monday" })),
        TaskConstraint::new("must_morning", json!(null)),
    ];
    let mut task_b = flex("b", "Laundry", 60);
    task_b.priority = Some(1);
    task_b.deadline = Some(TaskDeadline {
        date: "2025-06-04".into(),
        time: None,
    });
    task_b.constraints = vec![
        TaskConstraint::new("fixed_day", json!({ "day": "Monday" })),
        TaskConstraint::new("must_morning", json!(null)),
    ];

    // Input order has B first; the orderer must still try A first.
    let tasks = vec![task_b, task_a];
    let result = WeekSolver::new(monday()).solve(&tasks, &[]).expect("solve");

    assert!(result.success);
    let monday_slots = result.schedule.day(Weekday::Monday);
    assert_eq!(monday_slots[0].task_id, "a");
    assert_eq!(monday_slots[0].start, "06:00");
    assert_eq!(monday_slots[1].task_id, "b");
    assert_eq!(monday_slots[1].start, "06:30");
}

#[test]
fn fixed_task_with_mismatched_fixed_time_constraint_fails() {
    let mut task = fixed("t1", "Gym", "Monday", "09:00", "10:00");
    task.constraints = vec![TaskConstraint::new(
        "fixed_time",
        json!({ "start": "10:00", "end": "11:00" }),
    )];

    let result = WeekSolver::new(monday()).solve(&[task], &[]).expect("solve");

    assert!(!result.success);
    assert_eq!(result.failed_tasks.len(), 1);
    assert!(
        result.failed_tasks[0].reason.contains("fixed_time"),
        "reason: {}",
        result.failed_tasks[0].reason
    );
    assert_eq!(result.schedule.total_slots(), 0);
}

#[test]
fn flexible_tasks_never_land_on_disallowed_days() {
    let globals = vec![GlobalConstraint::new(
        "disallowed_days",
        json!(["Monday", "tuesday", "Wednesday", "Thursday", "Friday"]),
    )];
    let tasks: Vec<TaskRecord> = (0..4)
        .map(|i| flex(&format!("t{i}"), &format!("Chore {i}"), 120))
        .collect();

    let result = WeekSolver::new(monday())
        .solve(&tasks, &globals)
        .expect("solve");

    assert!(result.success);
    for (day, slots) in result.schedule.iter() {
        if day != Weekday::Saturday {
            assert!(slots.is_empty(), "{} should be empty", day.name());
        }
    }
    assert_eq!(result.schedule.day(Weekday::Saturday).len(), 4);
    assert_no_overlap(&result);
    assert_constraint_soundness(&result, &tasks, &globals);
}

#[test]
fn mixed_week_satisfies_all_invariants() {
    let globals = vec![
        GlobalConstraint::new("allowed_time_range", json!(["07:00", "22:00"])),
        GlobalConstraint::new("disallowed_days", json!(["Saturday"])),
        GlobalConstraint::new("max_end_time", json!({ "time": "21:30" })),
    ];

    let mut hard = flex("hard", "Exam Prep", 90);
    hard.difficulty = Some(5);
    hard.priority = Some(5);
    hard.preferred_time = vec!["morning".into()];

    let mut easy = flex("easy", "Email", 30);
    easy.difficulty = Some(1);
    easy.preferred_time = vec!["evening".into()];

    let mut dated = flex("dated", "Report", 60);
    dated.deadline = Some(TaskDeadline {
        date: "2025-06-03".into(),
        time: Some("18:00".into()),
    });
    dated.category = Some("work".into());

    let tasks = vec![
        fixed("standup", "Standup", "Monday", "09:00", "09:30"),
        fixed("review", "Review", "Tuesday", "14:00", "15:00"),
        hard,
        easy,
        dated,
    ];

    let result = WeekSolver::new(monday())
        .solve(&tasks, &globals)
        .expect("solve");

    assert!(result.success, "failed: {:?}", result.failed_tasks);
    assert_completeness(&result, tasks.len());
    assert_no_overlap(&result);
    assert_constraint_soundness(&result, &tasks, &globals);

    // Fixed tasks keep their exact caller-specified interval.
    let standup = result
        .schedule
        .day(Weekday::Monday)
        .iter()
        .find(|slot| slot.task_id == "standup")
        .expect("standup placed");
    assert_eq!(standup.start, "09:00");
    assert_eq!(standup.end, "09:30");
    assert_eq!(standup.kind, SlotKind::Fixed);

    // The solver's own output passes the independent conflict audit.
    let conflicts = schedule_review::find_conflicts(&result.schedule).expect("audit");
    assert!(conflicts.is_empty());
}

#[test]
fn identical_inputs_yield_byte_identical_results() {
    let globals = vec![GlobalConstraint::new("disallowed_days", json!(["Friday"]))];
    let mut dated = flex("dated", "Report", 60);
    dated.deadline = Some(TaskDeadline {
        date: "2025-06-05".into(),
        time: None,
    });
    let tasks = vec![
        fixed("standup", "Standup", "Monday", "09:00", "09:30"),
        flex("a", "Alpha", 45),
        dated,
        flex("b", "Beta", 45),
    ];

    let first = WeekSolver::new(monday())
        .solve(&tasks, &globals)
        .expect("solve");
    let second = WeekSolver::new(monday())
        .solve(&tasks, &globals)
        .expect("solve");

    let first_json = serde_json::to_string(&first).expect("serialize");
    let second_json = serde_json::to_string(&second).expect("serialize");
    assert_eq!(first_json, second_json);
}

#[test]
fn overloaded_week_reports_partial_schedule() {
    // Only Saturday 06:00-12:00 is usable; three 4-hour tasks cannot all fit.
    let globals = vec![
        GlobalConstraint::new(
            "disallowed_days",
            json!(["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"]),
        ),
        GlobalConstraint::new("max_end_time", json!({ "time": "12:00" })),
    ];
    let tasks = vec![
        flex("t1", "Block 1", 240),
        flex("t2", "Block 2", 240),
        flex("t3", "Block 3", 240),
    ];

    let result = WeekSolver::new(monday())
        .solve(&tasks, &globals)
        .expect("solve");

    assert!(!result.success);
    assert_eq!(result.schedule.total_slots(), 1);
    assert_eq!(result.failed_tasks.len(), 2);
    assert!(result.message.contains('2'));
    assert_completeness(&result, tasks.len());
}

#[test]
fn upcoming_deadlines_report_is_pure_and_sorted() {
    let mut near = flex("near", "Near", 30);
    near.deadline = Some(TaskDeadline {
        date: "2025-06-03".into(),
        time: None,
    });
    let mut far = flex("far", "Far", 30);
    far.deadline = Some(TaskDeadline {
        date: "2025-06-20".into(),
        time: None,
    });
    let tasks = vec![far, near, flex("none", "None", 30)];

    let rows = schedule_review::upcoming_deadlines(&tasks, monday(), 7).expect("deadlines");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].task_id, "near");
}
