//! Task reference data. Tasks are authored outside this system and only ever read.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Task identifier as it appears in `tasks.json`: a number or a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskId {
    Number(i64),
    Text(String),
}

/// A task; only `id` is interpreted, the rest is passed through as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_task_passes_fields_through() {
        let raw = json!({ "id": "triple-1", "type": "triple", "image": "/images/a.png", "xp": 10 });
        let task: Task = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(task.id, TaskId::Text("triple-1".to_string()));
        assert_eq!(serde_json::to_value(&task).unwrap(), raw);
    }
}
