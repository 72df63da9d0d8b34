use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GlobalConstraint {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub value: JsonValue,
    /// Informational only. Never consulted when breaking ties between slots.
    #[serde(default)]
    pub priority: Option<i64>,
}

impl GlobalConstraint {
    pub fn new(kind: impl Into<String>, value: JsonValue) -> Self {
        Self {
            kind: kind.into(),
            value,
            priority: None,
        }
    }
}
