use crate::models::schedule::Weekday;
use crate::services::schedule_utils::overlaps;

/// Per-day set of occupied half-open minute intervals. Rebuilt for every
/// solve; a linear scan is enough with at most 36 slots per day.
#[derive(Debug, Default)]
pub struct OverlapIndex {
    occupied: [Vec<(i64, i64)>; 7],
}

impl OverlapIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_overlap(&self, day: Weekday, start: i64, end: i64) -> bool {
        self.occupied[day.index()]
            .iter()
            .any(|&(taken_start, taken_end)| overlaps(start, end, taken_start, taken_end))
    }

    pub fn insert(&mut self, day: Weekday, start: i64, end: i64) {
        self.occupied[day.index()].push((start, end));
    }

    pub fn slot_count(&self, day: Weekday) -> usize {
        self.occupied[day.index()].len()
    }
}
