use std::fs;

use todos::persist::{SORT_DIRECTION_KEY, TASKS_KEY};
use todos::store::STORE_FILE;
use todos::{
    FileStore, KeyValueStore, MemoryStore, Persistence, Session, SortDirection, Task, TaskKind,
    TaskList,
};

fn snapshot(list: &TaskList) -> Vec<(String, i64, bool, Option<String>)> {
    list.items()
        .iter()
        .map(|task| {
            (
                task.text().to_string(),
                task.timestamp(),
                task.is_completed(),
                task.image().map(str::to_string),
            )
        })
        .collect()
}

#[test]
fn file_store_round_trip_preserves_items_and_direction() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;

    let mut list = TaskList::new();
    list.add_task(Task::new("Buy milk", 1000));
    list.add_task(Task::with_image("Walk dog", 500, false, "dog.png"));
    list.add_task(Task::new("Pay rent", 500).with_completed(true));
    list.set_sort_direction(SortDirection::Asc);
    list.sort_tasks();

    let mut persistence = Persistence::new(FileStore::open(dir.path()));
    persistence.save(&list)?;

    let loaded = Persistence::new(FileStore::open(dir.path())).load();
    assert_eq!(snapshot(&loaded), snapshot(&list));
    assert_eq!(loaded.sort_direction(), SortDirection::Asc);
    assert!(matches!(loaded.items()[0].kind(), TaskKind::WithImage { .. }));
    assert!(matches!(loaded.items()[1].kind(), TaskKind::Plain));

    Ok(())
}

#[test]
fn loaded_tasks_get_fresh_identities() {
    let mut list = TaskList::new();
    list.add_task(Task::new("a", 1));

    let mut persistence = Persistence::new(MemoryStore::new());
    persistence.save(&list).unwrap();
    let loaded = persistence.load();

    assert_eq!(loaded.items()[0].text(), "a");
    assert_ne!(loaded.items()[0].id(), list.items()[0].id());
}

#[test]
fn corrupt_store_file_loads_as_empty_session() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    fs::write(dir.path().join(STORE_FILE), "{{{ not json")?;

    let mut session = Session::open(FileStore::open(dir.path()));
    assert!(session.list().is_empty());
    assert_eq!(session.list().sort_direction(), SortDirection::Desc);

    session.add("recovered", None)?;
    let reopened = Session::open(FileStore::open(dir.path()));
    assert_eq!(reopened.list().items()[0].text(), "recovered");

    Ok(())
}

#[test]
fn tasks_value_of_wrong_shape_degrades_to_empty() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let mut store = FileStore::open(dir.path());
    store.set(TASKS_KEY, r#"{"text":"not a list"}"#)?;
    store.set(SORT_DIRECTION_KEY, "asc")?;

    let loaded = Persistence::new(store).load();
    assert!(loaded.is_empty());
    assert_eq!(loaded.sort_direction(), SortDirection::Asc);

    Ok(())
}

#[test]
fn clear_wipes_keys_written_by_others() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let mut store = FileStore::open(dir.path());
    store.set("theme", "dark")?;

    let mut session = Session::open(store);
    session.add("a", None)?;
    session.sort(SortDirection::Asc)?;
    session.clear_storage()?;
    assert!(session.list().is_empty());

    let store = FileStore::open(dir.path());
    assert_eq!(store.get("theme")?, None);
    assert_eq!(store.get(TASKS_KEY)?, None);
    assert_eq!(store.get(SORT_DIRECTION_KEY)?, None);

    let reopened = Session::open(store);
    assert!(reopened.list().is_empty());
    assert_eq!(reopened.list().sort_direction(), SortDirection::Desc);

    Ok(())
}

#[test]
fn session_keeps_store_in_step_with_every_mutation() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let mut session = Session::open(FileStore::open(dir.path()));

    let first = session.add("first", None)?.expect("added");
    session.add("second", Some("pic.png"))?;
    session.toggle(&first)?;

    let reopened = Session::open(FileStore::open(dir.path()));
    assert_eq!(snapshot(reopened.list()), snapshot(session.list()));

    session.remove(&first)?;
    let reopened = Session::open(FileStore::open(dir.path()));
    assert_eq!(snapshot(reopened.list()), snapshot(session.list()));
    assert_eq!(reopened.list().len(), 1);

    Ok(())
}
