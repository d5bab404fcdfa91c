//! Task entity.
//!
//! A task is one to-do entry. The plain and image-bearing variants share every
//! field except the image reference, so the difference lives in [`TaskKind`].

use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Runtime identity of a task.
///
/// Never persisted: every load hands out fresh ids. Removal and toggling match
/// on this, not on task content, so two tasks with identical text stay distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    fn generate() -> Self {
        Self(Ulid::new().to_string().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TaskKind {
    Plain,
    WithImage { image: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct Task {
    id: TaskId,
    text: String,
    timestamp: i64,
    is_completed: bool,
    #[serde(flatten)]
    kind: TaskKind,
}

impl Task {
    /// Create a plain task. The text is taken as given; callers guard emptiness.
    pub fn new(text: impl Into<String>, timestamp: i64) -> Self {
        Self {
            id: TaskId::generate(),
            text: text.into(),
            timestamp,
            is_completed: false,
            kind: TaskKind::Plain,
        }
    }

    /// Create a task carrying an image reference (URL or embedded data).
    pub fn with_image(
        text: impl Into<String>,
        timestamp: i64,
        is_completed: bool,
        image: impl Into<String>,
    ) -> Self {
        Self {
            id: TaskId::generate(),
            text: text.into(),
            timestamp,
            is_completed,
            kind: TaskKind::WithImage {
                image: image.into(),
            },
        }
    }

    pub fn with_completed(mut self, is_completed: bool) -> Self {
        self.is_completed = is_completed;
        self
    }

    pub fn id(&self) -> &TaskId {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Creation time in milliseconds since the Unix epoch.
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn is_completed(&self) -> bool {
        self.is_completed
    }

    pub fn kind(&self) -> &TaskKind {
        &self.kind
    }

    pub fn image(&self) -> Option<&str> {
        match &self.kind {
            TaskKind::Plain => None,
            TaskKind::WithImage { image } => Some(image),
        }
    }

    // Only `TaskList::toggle_completed` flips this.
    pub(crate) fn toggle_completed(&mut self) {
        self.is_completed = !self.is_completed;
    }
}

/// Current time in milliseconds since the Unix epoch.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}
