//! Badge catalog entry.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{lenient, non_empty};

/// A badge that can be awarded to students, keyed by `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Badge {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub icon: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Request body for `POST /badges`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateBadgeRequest {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub icon: Option<String>,
}

impl CreateBadgeRequest {
    /// The badge to create, or `None` when `id` or `title` is missing.
    pub fn to_badge(&self) -> Option<Badge> {
        let id = non_empty(&self.id)?;
        let title = non_empty(&self.title)?;
        Some(Badge {
            id: id.to_string(),
            title: title.to_string(),
            icon: self.icon.clone().unwrap_or_default(),
            extra: Map::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_icon_defaults_to_empty() {
        let request: CreateBadgeRequest =
            serde_json::from_value(json!({ "id": "first", "title": "First steps" })).unwrap();
        let badge = request.to_badge().unwrap();
        assert_eq!(badge.icon, "");
        assert_eq!(
            serde_json::to_value(&badge).unwrap(),
            json!({ "id": "first", "title": "First steps", "icon": "" })
        );
    }

    #[test]
    fn test_requires_id_and_title() {
        let no_title: CreateBadgeRequest = serde_json::from_value(json!({ "id": "x" })).unwrap();
        assert!(no_title.to_badge().is_none());

        let empty_id: CreateBadgeRequest =
            serde_json::from_value(json!({ "id": "", "title": "T" })).unwrap();
        assert!(empty_id.to_badge().is_none());
    }
}
