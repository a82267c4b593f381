//! Task records and partial updates

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::priority::Priority;
use crate::error::{StoreError, StoreResult};

/// A user-owned unit of work
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier
    pub id: String,

    /// Human-readable title (never empty)
    pub title: String,

    /// Free-text description
    #[serde(default)]
    pub description: String,

    pub priority: Priority,

    /// Calendar due date
    pub due_date: NaiveDate,

    #[serde(default)]
    pub completed: bool,

    /// Owning account ID, fixed at creation
    #[serde(rename = "userId")]
    pub owner_id: String,

    /// Creation timestamp, fixed at creation
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Check whether `account_id` owns this task
    pub fn is_owned_by(&self, account_id: &str) -> bool {
        self.owner_id == account_id
    }
}

/// Partial update for a Task
///
/// Fields left as `None` are not touched by [`TaskPatch::apply`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub due_date: Option<NaiveDate>,
    pub completed: Option<bool>,
}

impl TaskPatch {
    /// Patch that only sets the completion flag
    pub fn completed(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Default::default()
        }
    }

    /// Check if the patch names no fields at all
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
            && self.completed.is_none()
    }

    /// Reject patches that would break a Task invariant
    pub fn validate(&self) -> StoreResult<()> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        Ok(())
    }

    /// Merge the named fields into `task`
    pub fn apply(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
        if let Some(completed) = self.completed {
            task.completed = completed;
        }
    }
}

/// Titles are required and must contain something other than whitespace
pub(crate) fn validate_title(title: &str) -> StoreResult<()> {
    if title.trim().is_empty() {
        return Err(StoreError::InvalidField {
            field: "title",
            reason: "must not be empty".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_task() -> Task {
        Task {
            id: "task-1".to_string(),
            title: "Audit".to_string(),
            description: "quarterly books".to_string(),
            priority: Priority::Medium,
            due_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            completed: false,
            owner_id: "u-1".to_string(),
            created_at: DateTime::parse_from_rfc3339("2024-05-01T09:00:00Z").unwrap().with_timezone(&Utc),
        }
    }

    #[test]
    fn test_apply_only_touches_named_fields() {
        let mut task = sample_task();
        let before = task.clone();

        TaskPatch::completed(true).apply(&mut task);

        assert!(task.completed);
        assert_eq!(task.title, before.title);
        assert_eq!(task.description, before.description);
        assert_eq!(task.priority, before.priority);
        assert_eq!(task.due_date, before.due_date);
        assert_eq!(task.owner_id, before.owner_id);
        assert_eq!(task.created_at, before.created_at);
    }

    #[test]
    fn test_apply_all_fields() {
        let mut task = sample_task();
        let patch = TaskPatch {
            title: Some("Audit v2".to_string()),
            description: Some(String::new()),
            priority: Some(Priority::High),
            due_date: NaiveDate::from_ymd_opt(2024, 7, 1),
            completed: Some(true),
        };

        patch.apply(&mut task);

        assert_eq!(task.title, "Audit v2");
        assert!(task.description.is_empty());
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.due_date, NaiveDate::from_ymd_opt(2024, 7, 1).unwrap());
        assert!(task.completed);
    }

    #[test]
    fn test_validate_rejects_blank_title() {
        let patch = TaskPatch {
            title: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            patch.validate(),
            Err(StoreError::InvalidField { field: "title", .. })
        ));
        assert!(TaskPatch::completed(false).validate().is_ok());
    }

    #[test]
    fn test_is_empty() {
        assert!(TaskPatch::default().is_empty());
        assert!(!TaskPatch::completed(true).is_empty());
    }

    #[test]
    fn test_serde_uses_browser_field_names() {
        let json = serde_json::to_value(sample_task()).unwrap();
        assert_eq!(json["dueDate"], "2024-06-01");
        assert_eq!(json["userId"], "u-1");
        assert_eq!(json["priority"], "Medium");
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn test_deserialize_browser_record() {
        let json = r#"{
            "id": "task-k3j2h1x",
            "title": "Audit",
            "description": "",
            "priority": "High",
            "dueDate": "2024-06-01",
            "completed": true,
            "userId": "u-abc12",
            "createdAt": "2024-05-20T10:11:12.345Z"
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.priority, Priority::High);
        assert!(task.completed);
        assert!(task.is_owned_by("u-abc12"));
    }

    #[test]
    fn test_patch_deserializes_partial_json() {
        let patch: TaskPatch = serde_json::from_str(r#"{"completed": true}"#).unwrap();
        assert_eq!(patch, TaskPatch::completed(true));
    }
}
