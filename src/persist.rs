//! Snapshotting a [`TaskList`] into a [`KeyValueStore`].
//!
//! Two keys are written:
//! - `tasks`: JSON array of `{ text, timestamp, isCompleted, image? }`
//! - `sortDirection`: `"asc"` or `"desc"`
//!
//! Saving is explicit: callers save after each mutation.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;
use crate::list::{SortDirection, TaskList};
use crate::store::KeyValueStore;
use crate::task::{Task, TaskKind};

pub const TASKS_KEY: &str = "tasks";
pub const SORT_DIRECTION_KEY: &str = "sortDirection";

/// Stored shape of one task. `image` present means the image variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    pub text: String,
    pub timestamp: i64,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl From<&Task> for TaskRecord {
    fn from(task: &Task) -> Self {
        let image = match task.kind() {
            TaskKind::Plain => None,
            TaskKind::WithImage { image } => Some(image.clone()),
        };
        Self {
            text: task.text().to_string(),
            timestamp: task.timestamp(),
            is_completed: task.is_completed(),
            image,
        }
    }
}

impl From<TaskRecord> for Task {
    fn from(record: TaskRecord) -> Self {
        match record.image {
            Some(image) => {
                Task::with_image(record.text, record.timestamp, record.is_completed, image)
            }
            None => Task::new(record.text, record.timestamp).with_completed(record.is_completed),
        }
    }
}

/// Reads and writes task-list snapshots in a store.
#[derive(Debug)]
pub struct Persistence<S> {
    store: S,
}

impl<S: KeyValueStore> Persistence<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Overwrite both keys with the list's current state.
    pub fn save(&mut self, list: &TaskList) -> Result<()> {
        let records: Vec<TaskRecord> = list.items().iter().map(TaskRecord::from).collect();
        let json = serde_json::to_string(&records)?;
        self.store.set(TASKS_KEY, &json)?;
        self.store
            .set(SORT_DIRECTION_KEY, list.sort_direction().as_str())?;
        debug!(
            tasks = records.len(),
            direction = %list.sort_direction(),
            "saved task list"
        );
        Ok(())
    }

    /// Rebuild a list from the store.
    ///
    /// Never fails: a missing, unreadable or malformed value falls back to an
    /// empty list and/or the default direction.
    pub fn load(&self) -> TaskList {
        let items = self.load_items();
        let sort_direction = self.load_sort_direction();
        debug!(tasks = items.len(), direction = %sort_direction, "loaded task list");
        TaskList::from_parts(items, sort_direction)
    }

    /// Wipe the entire store and empty the list.
    pub fn clear(&mut self, list: &mut TaskList) -> Result<()> {
        list.clear();
        self.store.clear()?;
        debug!("cleared store");
        Ok(())
    }

    fn load_items(&self) -> Vec<Task> {
        let raw = match self.store.get(TASKS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                warn!(%err, "could not read stored tasks");
                return Vec::new();
            }
        };
        match serde_json::from_str::<Vec<TaskRecord>>(&raw) {
            Ok(records) => records.into_iter().map(Task::from).collect(),
            Err(err) => {
                warn!(%err, "stored tasks are malformed, starting empty");
                Vec::new()
            }
        }
    }

    fn load_sort_direction(&self) -> SortDirection {
        match self.store.get(SORT_DIRECTION_KEY) {
            Ok(Some(raw)) => raw.parse().unwrap_or_else(|_| {
                warn!(value = %raw, "unknown stored sort direction, using desc");
                SortDirection::default()
            }),
            Ok(None) => SortDirection::default(),
            Err(err) => {
                warn!(%err, "could not read stored sort direction");
                SortDirection::default()
            }
        }
    }
}
