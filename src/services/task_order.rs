use chrono::NaiveDate;

/// Urgency contribution of a deadline to the flexible-task ordering key:
/// `max(0, 100 - days_until_deadline)`, so closer deadlines rank higher.
pub fn deadline_urgency(deadline: Option<NaiveDate>, today: NaiveDate) -> i64 {
    deadline
        .map(|date| (100 - date.signed_duration_since(today).num_days()).max(0))
        .unwrap_or(0)
}

/// Composite ordering key for flexible tasks, sorted descending. Callers must
/// use a stable sort so equal keys preserve input order.
pub fn flex_sort_key(priority: i64, deadline: Option<NaiveDate>, today: NaiveDate) -> i64 {
    priority * 100 + deadline_urgency(deadline, today)
}
