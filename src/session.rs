//! Session state handed to the presentation layer.
//!
//! A [`Session`] owns the task list and its persistence. Every intent runs
//! mutate then save before returning, so the stored snapshot always matches
//! the list after a call completes.

use rand::Rng;
use tracing::debug;

use crate::error::Result;
use crate::list::{SortDirection, TaskList};
use crate::persist::Persistence;
use crate::store::KeyValueStore;
use crate::task::{now_millis, Task, TaskId};

#[derive(Debug)]
pub struct Session<S> {
    list: TaskList,
    persistence: Persistence<S>,
}

impl<S: KeyValueStore> Session<S> {
    /// Hydrate a session from whatever the store holds.
    pub fn open(store: S) -> Self {
        let persistence = Persistence::new(store);
        let list = persistence.load();
        Self { list, persistence }
    }

    pub fn list(&self) -> &TaskList {
        &self.list
    }

    pub fn store(&self) -> &S {
        self.persistence.store()
    }

    pub fn completed(&self) -> Vec<&Task> {
        self.list.completed_tasks()
    }

    /// Add a task from raw user input.
    ///
    /// Input is trimmed. Blank text is ignored and yields `None`; a non-blank
    /// image reference makes an image task.
    pub fn add(&mut self, text: &str, image: Option<&str>) -> Result<Option<TaskId>> {
        self.add_at(text, image, now_millis())
    }

    pub(crate) fn add_at(
        &mut self,
        text: &str,
        image: Option<&str>,
        timestamp: i64,
    ) -> Result<Option<TaskId>> {
        let text = text.trim();
        if text.is_empty() {
            debug!("ignoring blank task text");
            return Ok(None);
        }

        let task = match image.map(str::trim).filter(|image| !image.is_empty()) {
            Some(image) => Task::with_image(text, timestamp, false, image),
            None => Task::new(text, timestamp),
        };
        let id = task.id().clone();
        debug!(id = %id, timestamp, "adding task");
        self.list.add_task(task);
        self.persistence.save(&self.list)?;
        Ok(Some(id))
    }

    /// Flip completion. Returns the new state, `None` if the task is gone.
    pub fn toggle(&mut self, id: &TaskId) -> Result<Option<bool>> {
        let state = self.list.toggle_completed(id);
        if state.is_some() {
            self.persistence.save(&self.list)?;
        }
        Ok(state)
    }

    pub fn remove(&mut self, id: &TaskId) -> Result<Option<Task>> {
        let removed = self.list.remove_task(id);
        if removed.is_some() {
            self.persistence.save(&self.list)?;
        }
        Ok(removed)
    }

    pub fn sort(&mut self, direction: SortDirection) -> Result<()> {
        self.list.set_sort_direction(direction);
        self.list.sort_tasks();
        self.persistence.save(&self.list)
    }

    /// Wipe the whole store and drop every task.
    pub fn clear_storage(&mut self) -> Result<()> {
        self.persistence.clear(&mut self.list)
    }

    /// A random task with its 1-based position. Nothing is persisted.
    pub fn pick_random(&self) -> Option<(usize, &Task)> {
        self.pick_random_with(&mut rand::thread_rng())
    }

    pub fn pick_random_with<R: Rng>(&self, rng: &mut R) -> Option<(usize, &Task)> {
        self.list.pick_random(rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn texts(session: &Session<MemoryStore>) -> Vec<String> {
        session
            .list()
            .items()
            .iter()
            .map(|task| task.text().to_string())
            .collect()
    }

    fn reopen(session: Session<MemoryStore>) -> Session<MemoryStore> {
        Session::open(session.persistence.into_store())
    }

    #[test]
    fn add_trims_and_persists() {
        let mut session = Session::open(MemoryStore::new());
        session.add_at("  Buy milk  ", None, 1000).unwrap().expect("added");
        session
            .add_at("Walk dog", Some(" dog.png "), 500)
            .unwrap()
            .expect("added");

        let session = reopen(session);
        assert_eq!(texts(&session), vec!["Buy milk", "Walk dog"]);
        assert_eq!(session.list().items()[0].image(), None);
        assert_eq!(session.list().items()[1].image(), Some("dog.png"));
    }

    #[test]
    fn blank_text_is_ignored() {
        let mut session = Session::open(MemoryStore::new());
        assert!(session.add("   ", Some("x.png")).unwrap().is_none());
        assert!(session.list().is_empty());
        assert!(session.store().is_empty());
    }

    #[test]
    fn blank_image_makes_plain_task() {
        let mut session = Session::open(MemoryStore::new());
        session.add("text", Some("   ")).unwrap().expect("added");
        assert!(session.list().items()[0].image().is_none());
    }

    #[test]
    fn toggle_and_remove_persist() {
        let mut session = Session::open(MemoryStore::new());
        let keep = session.add_at("keep", None, 1).unwrap().expect("added");
        let gone = session.add_at("drop", None, 2).unwrap().expect("added");

        assert_eq!(session.toggle(&keep).unwrap(), Some(true));
        assert!(session.remove(&gone).unwrap().is_some());
        assert!(session.remove(&gone).unwrap().is_none());
        assert_eq!(session.toggle(&gone).unwrap(), None);

        let session = reopen(session);
        assert_eq!(texts(&session), vec!["keep"]);
        assert_eq!(session.completed().len(), 1);
    }

    #[test]
    fn sort_persists_direction_and_order() {
        let mut session = Session::open(MemoryStore::new());
        session.add_at("Buy milk", None, 1000).unwrap();
        session.add_at("Walk dog", Some("dog.png"), 500).unwrap();

        session.sort(SortDirection::Asc).unwrap();
        assert_eq!(texts(&session), vec!["Walk dog", "Buy milk"]);

        let mut session = reopen(session);
        assert_eq!(session.list().sort_direction(), SortDirection::Asc);
        assert_eq!(texts(&session), vec!["Walk dog", "Buy milk"]);

        session.sort(SortDirection::Desc).unwrap();
        assert_eq!(texts(&session), vec!["Buy milk", "Walk dog"]);
    }

    #[test]
    fn clear_storage_resets_everything() {
        let mut session = Session::open(MemoryStore::new());
        session.add_at("a", None, 1).unwrap();
        session.sort(SortDirection::Asc).unwrap();
        session.clear_storage().unwrap();
        assert!(session.list().is_empty());

        let session = reopen(session);
        assert!(session.list().is_empty());
        assert_eq!(session.list().sort_direction(), SortDirection::Desc);
    }

    #[test]
    fn pick_random_on_empty_is_none() {
        let session = Session::open(MemoryStore::new());
        assert!(session.pick_random().is_none());
    }
}
