use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskMode {
    Fixed,
    Duration,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskDeadline {
    pub date: String,
    #[serde(default)]
    pub time: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskConstraint {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub value: JsonValue,
}

impl TaskConstraint {
    pub fn new(kind: impl Into<String>, value: JsonValue) -> Self {
        Self {
            kind: kind.into(),
            value,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    pub id: String,
    pub name: String,
    pub mode: TaskMode,
    #[serde(default)]
    pub day: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub duration_minutes: Option<i64>,
    #[serde(default)]
    pub deadline: Option<TaskDeadline>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub difficulty: Option<i64>,
    #[serde(default)]
    pub priority: Option<i64>,
    #[serde(default)]
    pub preferred_time: Vec<String>,
    #[serde(default)]
    pub constraints: Vec<TaskConstraint>,
}

pub const DEFAULT_PRIORITY: i64 = 3;
pub const DEFAULT_DIFFICULTY: i64 = 3;

impl TaskRecord {
    pub fn priority(&self) -> i64 {
        self.priority.unwrap_or(DEFAULT_PRIORITY)
    }

    pub fn difficulty(&self) -> i64 {
        self.difficulty.unwrap_or(DEFAULT_DIFFICULTY)
    }
}
