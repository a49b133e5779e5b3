//! Tasks (the to-do rows of the remote store)

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Error;

/// The identifier of a [`Task`], assigned by the server on insertion.
///
/// It is immutable and unique within the owner's task set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId {
    content: Uuid,
}

impl TaskId {
    /// Generate a random TaskId.
    ///
    /// Outside of tests and of the in-memory store this should not be needed: real ids come from
    /// the server.
    pub fn random() -> Self {
        Self { content: Uuid::new_v4() }
    }
}

impl From<Uuid> for TaskId {
    fn from(content: Uuid) -> Self {
        Self { content }
    }
}
impl FromStr for TaskId {
    type Err = uuid::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let u: Uuid = s.parse()?;
        Ok(Self::from(u))
    }
}
impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}", self.content)
    }
}

/// The identifier of the user that owns a task.
///
/// Each task belongs to exactly one authenticated user and is never shared.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId {
    content: Uuid,
}

impl UserId {
    /// Generate a random UserId, e.g. to build a test [`Session`](crate::session::Session)
    pub fn random() -> Self {
        Self { content: Uuid::new_v4() }
    }
}

impl From<Uuid> for UserId {
    fn from(content: Uuid) -> Self {
        Self { content }
    }
}
impl FromStr for UserId {
    type Err = uuid::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let u: Uuid = s.parse()?;
        Ok(Self::from(u))
    }
}
impl Display for UserId {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}", self.content)
    }
}

/// The priority of a task
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Default for Priority {
    /// The priority the edit form starts from
    fn default() -> Self {
        Priority::Medium
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        match self {
            Priority::Low => write!(f, "low"),
            Priority::Medium => write!(f, "medium"),
            Priority::High => write!(f, "high"),
        }
    }
}

/// A to-do task.
///
/// The serde representation matches the remote row schema
/// (`id, user_id, title, description, is_completed, priority, due_date, created_at, updated_at`),
/// so rows fetched from the server deserialize straight into this type.
///
/// `due_date` is a plain calendar date: two tasks are due on the same day iff their `due_date`s
/// are equal, independently of any time zone or time of day.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// The server-assigned identifier
    id: TaskId,
    /// The user this task belongs to
    #[serde(rename = "user_id")]
    owner: UserId,
    /// The display title. Never empty (see [`TaskDraft::validate`])
    title: String,
    /// An optional free-form description
    description: Option<String>,
    /// Whether this task is completed
    #[serde(rename = "is_completed")]
    completed: bool,
    /// The priority of this task
    priority: Priority,
    /// The calendar day this task is due, if any
    due_date: Option<NaiveDate>,
    /// The time the server inserted this row
    created_at: DateTime<Utc>,
    /// The last time the server updated this row
    updated_at: DateTime<Utc>,
}

impl Task {
    /// Build a Task from its row fields.
    ///
    /// This is meant for the in-memory store and for tests; real tasks come deserialized from
    /// the server, which is the only authority on `id` and on the timestamps.
    pub fn new_with_fields(
        id: TaskId,
        owner: UserId,
        title: String,
        description: Option<String>,
        completed: bool,
        priority: Priority,
        due_date: Option<NaiveDate>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self { id, owner, title, description, completed, priority, due_date, created_at, updated_at }
    }

    pub fn id(&self) -> &TaskId { &self.id }
    pub fn owner(&self) -> &UserId { &self.owner }
    pub fn title(&self) -> &str { &self.title }
    pub fn description(&self) -> Option<&str> { self.description.as_deref() }
    pub fn completed(&self) -> bool { self.completed }
    pub fn priority(&self) -> Priority { self.priority }
    pub fn due_date(&self) -> Option<NaiveDate> { self.due_date }
    pub fn created_at(&self) -> &DateTime<Utc> { &self.created_at }
    pub fn updated_at(&self) -> &DateTime<Utc> { &self.updated_at }

    /// Whether this task is due on the given calendar day
    pub fn is_due_on(&self, day: NaiveDate) -> bool {
        self.due_date == Some(day)
    }

    pub(crate) fn set_completed(&mut self, completed: bool) {
        self.completed = completed;
        self.updated_at = Utc::now();
    }
}

/// The fields a user submits to create a task (and that the edit form is pre-filled with).
///
/// The server assigns `id`, `created_at` and `updated_at` itself.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TaskDraft {
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub due_date: Option<NaiveDate>,
}

impl TaskDraft {
    pub fn new(title: impl ToString) -> Self {
        Self {
            title: title.to_string(),
            ..Self::default()
        }
    }

    /// Pre-fill a draft from an existing task, for the edit form
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title().to_string(),
            description: task.description().map(str::to_string),
            priority: task.priority(),
            due_date: task.due_date(),
        }
    }

    /// Reject drafts whose title is empty after trimming.
    ///
    /// This runs before any remote call is attempted.
    pub fn validate(&self) -> Result<(), Error> {
        if self.title.trim().is_empty() {
            return Err(Error::Validation("the title must not be empty".to_string()));
        }
        Ok(())
    }
}

/// A partial update to an existing task.
///
/// `None` fields are left unchanged. For the two nullable columns (`description` and `due_date`)
/// the inner `Option` distinguishes "set to this value" from "clear": `Some(None)` serializes to
/// an explicit `null`, while an outer `None` is skipped entirely from the PATCH body.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Option<NaiveDate>>,
}

impl TaskPatch {
    /// The patch an edit-form resubmission produces: every form field is written back,
    /// completion and timestamps are left to the server
    pub fn from_draft(draft: &TaskDraft) -> Self {
        Self {
            title: Some(draft.title.clone()),
            description: Some(draft.description.clone()),
            priority: Some(draft.priority),
            due_date: Some(draft.due_date),
        }
    }

    /// Whether this patch writes no field at all
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
    }

    /// Reject patches that would set an empty title, before any remote call
    pub fn validate(&self) -> Result<(), Error> {
        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                return Err(Error::Validation("the title must not be empty".to_string()));
            }
        }
        Ok(())
    }

    /// Apply this patch to a task, the way the server would.
    ///
    /// Used by the in-memory store.
    pub fn apply_to(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title = title.clone();
        }
        if let Some(description) = &self.description {
            task.description = description.clone();
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
        task.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn some_task(title: &str) -> Task {
        Task::new_with_fields(
            TaskId::random(),
            UserId::random(),
            title.to_string(),
            Some("details".to_string()),
            false,
            Priority::High,
            NaiveDate::from_ymd_opt(2024, 6, 10),
            Utc::now(),
            Utc::now(),
        )
    }

    #[test]
    fn drafts_with_blank_titles_are_rejected() {
        assert!(TaskDraft::new("feed the cat").validate().is_ok());
        assert!(TaskDraft::new("").validate().is_err());
        assert!(TaskDraft::new("   \t ").validate().is_err());

        let patch = TaskPatch { title: Some("  ".to_string()), ..TaskPatch::default() };
        assert!(patch.validate().unwrap_err().is_validation());
        // A patch that does not touch the title is fine
        assert!(TaskPatch::default().validate().is_ok());
    }

    #[test]
    fn patch_only_writes_present_fields() {
        let mut task = some_task("original");
        let patch = TaskPatch {
            title: Some("renamed".to_string()),
            ..TaskPatch::default()
        };
        patch.apply_to(&mut task);

        assert_eq!(task.title(), "renamed");
        assert_eq!(task.description(), Some("details"));
        assert_eq!(task.priority(), Priority::High);
        assert_eq!(task.due_date(), NaiveDate::from_ymd_opt(2024, 6, 10));
    }

    #[test]
    fn patch_distinguishes_clearing_from_leaving_unchanged() {
        let leave = TaskPatch { title: Some("t".to_string()), ..TaskPatch::default() };
        let clear = TaskPatch { due_date: Some(None), description: Some(None), ..TaskPatch::default() };

        let body = serde_json::to_value(&leave).unwrap();
        assert_eq!(body.as_object().unwrap().len(), 1, "absent fields must be skipped");

        let body = serde_json::to_value(&clear).unwrap();
        assert!(body["due_date"].is_null());
        assert!(body["description"].is_null());

        let mut task = some_task("t");
        clear.apply_to(&mut task);
        assert_eq!(task.due_date(), None);
        assert_eq!(task.description(), None);
    }

    #[test]
    fn task_serde_matches_the_row_schema() {
        let row = serde_json::json!({
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "user_id": "550e8400-e29b-41d4-a716-446655440001",
            "title": "water the plants",
            "description": null,
            "is_completed": false,
            "priority": "medium",
            "due_date": "2024-06-15",
            "created_at": "2024-06-01T10:00:00Z",
            "updated_at": "2024-06-01T10:00:00Z",
        });
        let task: Task = serde_json::from_value(row).unwrap();
        assert_eq!(task.title(), "water the plants");
        assert_eq!(task.priority(), Priority::Medium);
        assert_eq!(task.due_date(), NaiveDate::from_ymd_opt(2024, 6, 15));
        assert_eq!(task.completed(), false);
        assert_eq!(task.description(), None);
    }
}
