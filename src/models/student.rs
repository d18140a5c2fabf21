//! Student record and the request bodies that create or modify it.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use super::{lenient, non_empty, null_as_empty, TaskId};

/// A student, keyed by `login`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub login: String,
    /// Any JSON number; integers and fractions are stored as given.
    #[serde(default = "zero_xp")]
    pub xp: Number,
    /// Badge ids in award order; the same id may appear more than once.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub badges: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub completed_tasks: Vec<TaskId>,
    /// Fields this service does not interpret, kept so rewrites do not drop them
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Student {
    pub fn new(login: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            xp: zero_xp(),
            badges: Vec::new(),
            completed_tasks: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Apply the recognized fields of `patch`, leaving the rest untouched.
    pub fn apply(&mut self, patch: UpdateStudentRequest) {
        if let Some(xp) = patch.xp {
            self.xp = xp;
        }
        if let Some(badges) = patch.badges {
            self.badges = badges;
        }
        if let Some(completed_tasks) = patch.completed_tasks {
            self.completed_tasks = completed_tasks;
        }
    }
}

fn zero_xp() -> Number {
    Number::from(0)
}

/// Request body for `POST /students`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateStudentRequest {
    #[serde(default, deserialize_with = "lenient")]
    pub login: Option<String>,
}

impl CreateStudentRequest {
    pub fn login(&self) -> Option<&str> {
        non_empty(&self.login)
    }
}

/// Request body for `PUT /students/:login`.
///
/// A field of the wrong type deserializes to `None` and is left unchanged on the record.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStudentRequest {
    #[serde(default, deserialize_with = "lenient")]
    pub xp: Option<Number>,
    #[serde(default, deserialize_with = "lenient")]
    pub badges: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient")]
    pub completed_tasks: Option<Vec<TaskId>>,
}

/// Request body for `POST /students/:login/badges`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddBadgeRequest {
    #[serde(default, deserialize_with = "lenient")]
    pub badge: Option<String>,
}

impl AddBadgeRequest {
    pub fn badge(&self) -> Option<&str> {
        non_empty(&self.badge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_student_shape() {
        let value = serde_json::to_value(Student::new("ada")).unwrap();
        assert_eq!(
            value,
            json!({ "login": "ada", "xp": 0, "badges": [], "completedTasks": [] })
        );
    }

    #[test]
    fn test_unknown_fields_survive_round_trip() {
        let raw = json!({ "login": "ada", "xp": 3, "badges": ["b1"], "completedTasks": [1, "t2"], "nickname": "A" });
        let student: Student = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(student.extra["nickname"], "A");
        assert_eq!(serde_json::to_value(&student).unwrap(), raw);
    }

    #[test]
    fn test_missing_lists_default_to_empty() {
        let student: Student = serde_json::from_value(json!({ "login": "ada" })).unwrap();
        assert_eq!(student.xp, Number::from(0));
        assert!(student.badges.is_empty());
        assert!(student.completed_tasks.is_empty());
    }

    #[test]
    fn test_null_lists_read_as_empty() {
        let student: Student = serde_json::from_value(
            json!({ "login": "ada", "xp": 3, "badges": null, "completedTasks": null }),
        )
        .unwrap();
        assert!(student.badges.is_empty());
        assert!(student.completed_tasks.is_empty());
    }

    #[test]
    fn test_fractional_xp_is_kept() {
        let raw = json!({ "login": "ada", "xp": 2.5, "badges": [], "completedTasks": [] });
        let student: Student = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(serde_json::to_value(&student).unwrap(), raw);

        let mut student = Student::new("eve");
        student.apply(serde_json::from_value(json!({ "xp": 1.5 })).unwrap());
        assert_eq!(student.xp.as_f64(), Some(1.5));
    }

    #[test]
    fn test_patch_ignores_mistyped_fields() {
        let mut student = Student::new("ada");
        student.xp = Number::from(7);
        student.badges = vec!["b1".to_string()];

        let patch: UpdateStudentRequest =
            serde_json::from_value(json!({ "xp": "five", "badges": "b2", "login": "eve" })).unwrap();
        student.apply(patch);

        assert_eq!(student.login, "ada");
        assert_eq!(student.xp, Number::from(7));
        assert_eq!(student.badges, vec!["b1".to_string()]);
    }

    #[test]
    fn test_patch_replaces_provided_fields() {
        let mut student = Student::new("ada");
        let patch: UpdateStudentRequest = serde_json::from_value(
            json!({ "xp": 5, "badges": ["x", "x"], "completedTasks": [3] }),
        )
        .unwrap();
        student.apply(patch);

        assert_eq!(student.xp, Number::from(5));
        assert_eq!(student.badges, vec!["x".to_string(), "x".to_string()]);
        assert_eq!(student.completed_tasks, vec![TaskId::Number(3)]);
    }

    #[test]
    fn test_empty_or_mistyped_login_is_missing() {
        let empty: CreateStudentRequest = serde_json::from_value(json!({ "login": "" })).unwrap();
        assert!(empty.login().is_none());

        let number: CreateStudentRequest = serde_json::from_value(json!({ "login": 42 })).unwrap();
        assert!(number.login().is_none());

        let missing: CreateStudentRequest = serde_json::from_value(json!({})).unwrap();
        assert!(missing.login().is_none());
    }
}
