//! Task records and the inputs the service accepts.
//!
//! A [`Task`] is both the persisted record (see `storage`) and the body the
//! HTTP API returns. Optional fields are omitted from JSON when unset.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A single to-do item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Assigned by the repository on create; ignored on input.
    pub id: u64,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_done: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Build an unsaved task (id 0) stamped with `now`.
    pub fn new(title: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: 0,
            title: title.into(),
            category: None,
            due_date: None,
            is_done: false,
            created_at: now,
            updated_at: Some(now),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }
}

/// Fields accepted when creating a task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateTaskInput {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
}

/// Partial update: only the fields that are `Some` change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateTaskInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_done: Option<bool>,
}

impl UpdateTaskInput {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.category.is_none()
            && self.due_date.is_none()
            && self.is_done.is_none()
    }

    /// Apply the present fields onto `task`.
    pub fn apply_to(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title = title.clone();
        }
        if let Some(category) = &self.category {
            task.category = Some(category.clone());
        }
        if let Some(due_date) = self.due_date {
            task.due_date = Some(due_date);
        }
        if let Some(is_done) = self.is_done {
            task.is_done = is_done;
        }
    }
}

/// Parse a `YYYY-MM-DD` day into midnight UTC.
pub fn parse_due_date(raw: &str) -> Option<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()?;
    Some(date.and_hms_opt(0, 0, 0)?.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 10, h, 0, 0).unwrap()
    }

    #[test]
    fn new_task_is_open_and_stamped() {
        let task = Task::new("Buy milk", at(9));
        assert_eq!(task.id, 0);
        assert!(!task.is_done);
        assert_eq!(task.created_at, at(9));
        assert_eq!(task.updated_at, Some(at(9)));
        assert!(task.category.is_none());
    }

    #[test]
    fn json_omits_unset_optionals() {
        let mut task = Task::new("Buy milk", at(9));
        task.id = 1;
        task.updated_at = None;
        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["id"], 1);
        assert_eq!(value["is_done"], false);
        assert!(value.get("category").is_none());
        assert!(value.get("due_date").is_none());
        assert!(value.get("updated_at").is_none());
    }

    #[test]
    fn null_optionals_deserialize_as_none() {
        let raw = r#"{"id":3,"title":"x","category":null,"due_date":null,
            "is_done":true,"created_at":"2026-01-10T09:00:00Z","updated_at":null}"#;
        let task: Task = serde_json::from_str(raw).unwrap();
        assert_eq!(task.id, 3);
        assert!(task.is_done);
        assert!(task.category.is_none());
        assert!(task.updated_at.is_none());
    }

    #[test]
    fn update_input_applies_only_present_fields() {
        let mut task = Task::new("old", at(9)).with_category("home");
        let input = UpdateTaskInput {
            is_done: Some(true),
            ..Default::default()
        };
        input.apply_to(&mut task);
        assert_eq!(task.title, "old");
        assert_eq!(task.category.as_deref(), Some("home"));
        assert!(task.is_done);
    }

    #[test]
    fn update_input_rejects_unknown_fields() {
        let err = serde_json::from_str::<UpdateTaskInput>(r#"{"priority":"P1"}"#);
        assert!(err.is_err());
        assert!(serde_json::from_str::<UpdateTaskInput>("{}").unwrap().is_empty());
    }

    #[test]
    fn parse_due_date_accepts_plain_days() {
        assert_eq!(
            parse_due_date("2026-01-10"),
            Some(Utc.with_ymd_and_hms(2026, 1, 10, 0, 0, 0).unwrap())
        );
        assert_eq!(parse_due_date("10/01/2026"), None);
    }
}
