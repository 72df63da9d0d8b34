use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// Sunday is off by default and never receives placements.
    pub const ACTIVE_DAYS: [Weekday; 6] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
    ];

    pub fn parse(value: &str) -> Option<Weekday> {
        match value.trim().to_ascii_lowercase().as_str() {
            "monday" => Some(Weekday::Monday),
            "tuesday" => Some(Weekday::Tuesday),
            "wednesday" => Some(Weekday::Wednesday),
            "thursday" => Some(Weekday::Thursday),
            "friday" => Some(Weekday::Friday),
            "saturday" => Some(Weekday::Saturday),
            "sunday" => Some(Weekday::Sunday),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        }
    }

    /// 0-based position in the week, Monday = 0.
    pub fn index(self) -> usize {
        match self {
            Weekday::Monday => 0,
            Weekday::Tuesday => 1,
            Weekday::Wednesday => 2,
            Weekday::Thursday => 3,
            Weekday::Friday => 4,
            Weekday::Saturday => 5,
            Weekday::Sunday => 6,
        }
    }

    pub fn is_active(self) -> bool {
        self != Weekday::Sunday
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotKind {
    Fixed,
    Flex,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledSlot {
    pub task_id: String,
    pub name: String,
    pub day: Weekday,
    pub start: String,
    pub end: String,
    pub kind: SlotKind,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeeklySchedule(BTreeMap<Weekday, Vec<ScheduledSlot>>);

impl WeeklySchedule {
    pub fn new() -> Self {
        let mut days = BTreeMap::new();
        for day in Weekday::ACTIVE_DAYS {
            days.insert(day, Vec::new());
        }
        Self(days)
    }

    pub fn push(&mut self, slot: ScheduledSlot) {
        self.0.entry(slot.day).or_default().push(slot);
    }

    pub fn day(&self, day: Weekday) -> &[ScheduledSlot] {
        self.0.get(&day).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (Weekday, &[ScheduledSlot])> {
        self.0.iter().map(|(day, slots)| (*day, slots.as_slice()))
    }

    pub fn total_slots(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }
}

impl Default for WeeklySchedule {
    fn default() -> Self {
        Self::new()
    }
}

pub const FAILED_CONSTRAINTS: &str = "FAILED_CONSTRAINTS";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FailedTask {
    pub task_id: String,
    pub name: String,
    pub status: String,
    pub reason: String,
}

impl FailedTask {
    pub fn constraints(
        task_id: impl Into<String>,
        name: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            task_id: task_id.into(),
            name: name.into(),
            status: FAILED_CONSTRAINTS.to_string(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyScheduleResult {
    pub success: bool,
    pub schedule: WeeklySchedule,
    pub failed_tasks: Vec<FailedTask>,
    pub message: String,
}
