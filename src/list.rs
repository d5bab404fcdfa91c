//! Ordered task collection with a sort-direction setting.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::task::{Task, TaskId};

/// Sort order by creation timestamp.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Oldest first
    Asc,
    /// Newest first
    #[default]
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Asc),
            "desc" | "descending" => Ok(SortDirection::Desc),
            other => Err(Error::InvalidArgument(format!(
                "unknown sort direction '{other}' (expected asc or desc)"
            ))),
        }
    }
}

/// The session's tasks plus the current sort direction.
#[derive(Debug, Clone, Default)]
pub struct TaskList {
    items: Vec<Task>,
    sort_direction: SortDirection,
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(items: Vec<Task>, sort_direction: SortDirection) -> Self {
        Self {
            items,
            sort_direction,
        }
    }

    pub fn items(&self) -> &[Task] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn sort_direction(&self) -> SortDirection {
        self.sort_direction
    }

    /// Takes effect on the next `sort_tasks` call.
    pub fn set_sort_direction(&mut self, direction: SortDirection) {
        self.sort_direction = direction;
    }

    /// Append to the end. No duplicate check.
    pub fn add_task(&mut self, task: Task) {
        self.items.push(task);
    }

    /// Remove the first task with this identity. Returns `None` on a miss.
    pub fn remove_task(&mut self, id: &TaskId) -> Option<Task> {
        let index = self.position_of(id)?;
        Some(self.items.remove(index))
    }

    /// Flip completion on the task with this identity.
    ///
    /// Returns the new state, or `None` when no task matches.
    pub fn toggle_completed(&mut self, id: &TaskId) -> Option<bool> {
        let task = self.items.iter_mut().find(|task| task.id() == id)?;
        task.toggle_completed();
        Some(task.is_completed())
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.items.iter().find(|task| task.id() == id)
    }

    /// Identity of the task at a 1-based position in the current order.
    pub fn id_at(&self, position: usize) -> Option<&TaskId> {
        position
            .checked_sub(1)
            .and_then(|index| self.items.get(index))
            .map(Task::id)
    }

    /// Completed tasks in their current relative order.
    pub fn completed_tasks(&self) -> Vec<&Task> {
        self.items.iter().filter(|task| task.is_completed()).collect()
    }

    /// Reorder by timestamp following `sort_direction`. Equal timestamps keep
    /// their relative order.
    pub fn sort_tasks(&mut self) {
        match self.sort_direction {
            SortDirection::Asc => self.items.sort_by_key(|task| task.timestamp()),
            SortDirection::Desc => self
                .items
                .sort_by(|left, right| right.timestamp().cmp(&left.timestamp())),
        }
    }

    /// A uniformly chosen task with its 1-based position.
    pub fn pick_random<R: Rng>(&self, rng: &mut R) -> Option<(usize, &Task)> {
        if self.items.is_empty() {
            return None;
        }
        let index = rng.gen_range(0..self.items.len());
        Some((index + 1, &self.items[index]))
    }

    /// Drop every task. The sort direction is left alone.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    fn position_of(&self, id: &TaskId) -> Option<usize> {
        self.items.iter().position(|task| task.id() == id)
    }
}
