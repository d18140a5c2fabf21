//! Teacher record.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{lenient, non_empty};

/// A teacher, keyed by `login`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    pub login: String,
    /// RFC 3339 timestamp with millisecond precision, fixed at creation
    pub created_at: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Teacher {
    pub fn new(login: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            login: login.into(),
            created_at: created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            extra: Map::new(),
        }
    }
}

/// Request body for `POST /teachers`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateTeacherRequest {
    #[serde(default, deserialize_with = "lenient")]
    pub login: Option<String>,
}

impl CreateTeacherRequest {
    pub fn login(&self) -> Option<&str> {
        non_empty(&self.login)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_created_at_format() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        let teacher = Teacher::new("grace", at);
        assert_eq!(teacher.created_at, "2024-03-01T12:30:00.000Z");
    }
}
