use once_cell::sync::Lazy;

use crate::services::schedule_utils::DAY_END_MINUTES;

pub const SLOT_INTERVAL_MINUTES: i64 = 30;
pub const FIRST_SLOT_MINUTES: i64 = 6 * 60;

static TIME_SLOTS: Lazy<Vec<i64>> = Lazy::new(|| {
    (FIRST_SLOT_MINUTES..DAY_END_MINUTES)
        .step_by(SLOT_INTERVAL_MINUTES as usize)
        .collect()
});

/// Candidate start boundaries for one day: every 30 minutes from 06:00 up to
/// but excluding 24:00. Computed once, shared read-only across solves.
pub fn time_slots() -> &'static [i64] {
    &TIME_SLOTS
}
