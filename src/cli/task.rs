//! todos command implementations.

use std::fmt::Write as _;
use std::path::PathBuf;

use chrono::{Local, TimeZone};
use serde::Serialize;

use crate::config::{Config, DisplayConfig};
use crate::error::{Error, Result};
use crate::list::SortDirection;
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::session::Session;
use crate::store::FileStore;
use crate::task::{Task, TaskKind};

pub struct StoreOptions {
    pub dir: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

pub struct AddOptions {
    pub text: String,
    pub image: Option<String>,
    pub store: StoreOptions,
    pub output: OutputOptions,
}

pub struct ListOptions {
    pub completed: bool,
    pub store: StoreOptions,
    pub output: OutputOptions,
}

pub struct PositionOptions {
    pub position: usize,
    pub store: StoreOptions,
    pub output: OutputOptions,
}

pub struct SortOptions {
    pub direction: String,
    pub store: StoreOptions,
    pub output: OutputOptions,
}

pub struct RandomOptions {
    pub store: StoreOptions,
    pub output: OutputOptions,
}

pub struct ClearOptions {
    pub yes: bool,
    pub store: StoreOptions,
    pub output: OutputOptions,
}

#[derive(Serialize)]
struct TaskView<'a> {
    position: usize,
    #[serde(flatten)]
    task: &'a Task,
}

#[derive(Serialize)]
struct ListReport<'a> {
    sort_direction: SortDirection,
    total: usize,
    tasks: Vec<TaskView<'a>>,
}

#[derive(Serialize)]
struct TaskReport<'a> {
    task: TaskView<'a>,
}

#[derive(Serialize)]
struct RemoveReport {
    position: usize,
    text: String,
    remaining: usize,
}

#[derive(Serialize)]
struct ClearReport {
    cleared: bool,
    store: PathBuf,
}

struct Context {
    session: Session<FileStore>,
    display: DisplayConfig,
}

fn open(options: &StoreOptions) -> Result<Context> {
    let config = Config::load_or_default(options.config.as_deref())?;
    let dir = config.store_dir(options.dir.as_deref())?;
    let store = FileStore::open(&dir).with_lock_timeout(config.store.lock_timeout_ms);
    tracing::debug!(store = %store.path().display(), "opening task store");
    Ok(Context {
        session: Session::open(store),
        display: config.display,
    })
}

pub fn run_add(options: AddOptions) -> Result<()> {
    let mut ctx = open(&options.store)?;
    let id = ctx
        .session
        .add(&options.text, options.image.as_deref())?
        .ok_or_else(|| Error::InvalidArgument("task text cannot be empty".to_string()))?;

    let list = ctx.session.list();
    let position = list
        .items()
        .iter()
        .position(|task| task.id() == &id)
        .map(|index| index + 1)
        .unwrap_or(list.len());
    let task = &list.items()[position - 1];

    let mut human = HumanOutput::new("Task added");
    human.push_detail(render_task(position, task, &ctx.display));

    emit_success(
        options.output,
        "add",
        &TaskReport {
            task: TaskView { position, task },
        },
        Some(&human),
    )
}

pub fn run_list(options: ListOptions) -> Result<()> {
    let ctx = open(&options.store)?;
    let list = ctx.session.list();

    let tasks: Vec<TaskView<'_>> = list
        .items()
        .iter()
        .enumerate()
        .map(|(index, task)| TaskView {
            position: index + 1,
            task,
        })
        .filter(|view| !options.completed || view.task.is_completed())
        .collect();

    let header = if options.completed {
        format!("Completed tasks ({})", tasks.len())
    } else {
        format!("Tasks ({})", tasks.len())
    };
    let mut human = HumanOutput::new(header);
    human.push_summary("sort", list.sort_direction().as_str());
    if tasks.is_empty() {
        human.push_detail("(none)");
    }
    for view in &tasks {
        human.push_detail(render_task(view.position, view.task, &ctx.display));
    }

    emit_success(
        options.output,
        "list",
        &ListReport {
            sort_direction: list.sort_direction(),
            total: list.len(),
            tasks,
        },
        Some(&human),
    )
}

pub fn run_toggle(options: PositionOptions) -> Result<()> {
    let mut ctx = open(&options.store)?;
    let id = ctx
        .session
        .list()
        .id_at(options.position)
        .cloned()
        .ok_or(Error::TaskNotFound(options.position))?;

    ctx.session
        .toggle(&id)?
        .ok_or(Error::TaskNotFound(options.position))?;
    let task = ctx
        .session
        .list()
        .get(&id)
        .ok_or(Error::TaskNotFound(options.position))?;

    let header = if task.is_completed() {
        "Task completed"
    } else {
        "Task reopened"
    };
    let mut human = HumanOutput::new(header);
    human.push_detail(render_task(options.position, task, &ctx.display));

    emit_success(
        options.output,
        "toggle",
        &TaskReport {
            task: TaskView {
                position: options.position,
                task,
            },
        },
        Some(&human),
    )
}

pub fn run_rm(options: PositionOptions) -> Result<()> {
    let mut ctx = open(&options.store)?;
    let id = ctx
        .session
        .list()
        .id_at(options.position)
        .cloned()
        .ok_or(Error::TaskNotFound(options.position))?;

    let removed = ctx
        .session
        .remove(&id)?
        .ok_or(Error::TaskNotFound(options.position))?;

    let report = RemoveReport {
        position: options.position,
        text: removed.text().to_string(),
        remaining: ctx.session.list().len(),
    };
    let mut human = HumanOutput::new(format!("Removed: {}", removed.text()));
    human.push_summary("remaining", report.remaining.to_string());

    emit_success(options.output, "rm", &report, Some(&human))
}

pub fn run_sort(options: SortOptions) -> Result<()> {
    let direction: SortDirection = options.direction.parse()?;
    let mut ctx = open(&options.store)?;
    ctx.session.sort(direction)?;

    let list = ctx.session.list();
    let tasks: Vec<TaskView<'_>> = list
        .items()
        .iter()
        .enumerate()
        .map(|(index, task)| TaskView {
            position: index + 1,
            task,
        })
        .collect();

    let label = match direction {
        SortDirection::Asc => "oldest first",
        SortDirection::Desc => "newest first",
    };
    let mut human = HumanOutput::new(format!("Sorted {label}"));
    for view in &tasks {
        human.push_detail(render_task(view.position, view.task, &ctx.display));
    }

    emit_success(
        options.output,
        "sort",
        &ListReport {
            sort_direction: direction,
            total: list.len(),
            tasks,
        },
        Some(&human),
    )
}

pub fn run_random(options: RandomOptions) -> Result<()> {
    let ctx = open(&options.store)?;

    match ctx.session.pick_random() {
        Some((position, task)) => {
            let mut human = HumanOutput::new("Random pick");
            human.push_detail(render_task(position, task, &ctx.display));
            emit_success(
                options.output,
                "random",
                &TaskReport {
                    task: TaskView { position, task },
                },
                Some(&human),
            )
        }
        None => {
            let human = HumanOutput::new("No tasks to pick from");
            emit_success(
                options.output,
                "random",
                &serde_json::json!({ "task": null }),
                Some(&human),
            )
        }
    }
}

pub fn run_clear(options: ClearOptions) -> Result<()> {
    if !options.yes {
        return Err(Error::ConfirmationRequired("erase the whole store".to_string()));
    }

    let mut ctx = open(&options.store)?;
    ctx.session.clear_storage()?;

    let store = ctx.session.store().path().to_path_buf();
    let mut human = HumanOutput::new("Store cleared");
    human.push_summary("store", store.display().to_string());

    emit_success(
        options.output,
        "clear",
        &ClearReport {
            cleared: true,
            store,
        },
        Some(&human),
    )
}

fn render_task(position: usize, task: &Task, display: &DisplayConfig) -> String {
    let mark = if task.is_completed() { "x" } else { " " };
    let mut line = format!(
        "{position}. [{mark}] {} ({})",
        task.text(),
        format_timestamp(task.timestamp(), &display.time_format)
    );
    match task.kind() {
        TaskKind::WithImage { image } if display.show_images => {
            line.push_str(&format!(" [image: {image}]"));
        }
        TaskKind::WithImage { .. } | TaskKind::Plain => {}
    }
    line
}

fn format_timestamp(millis: i64, format: &str) -> String {
    let Some(when) = Local.timestamp_millis_opt(millis).single() else {
        return millis.to_string();
    };
    // chrono reports a bad format string as a fmt error
    let mut out = String::new();
    match write!(out, "{}", when.format(format)) {
        Ok(()) => out,
        Err(_) => millis.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_marks_completion_and_image() {
        let display = DisplayConfig::default();
        let task = Task::with_image("Walk dog", 500, true, "dog.png");
        let line = render_task(2, &task, &display);
        assert!(line.starts_with("2. [x] Walk dog ("));
        assert!(line.ends_with(" [image: dog.png]"));

        let plain = Task::new("Buy milk", 1000);
        let line = render_task(1, &plain, &display);
        assert!(line.starts_with("1. [ ] Buy milk ("));
        assert!(!line.contains("image"));
    }

    #[test]
    fn render_can_hide_images() {
        let display = DisplayConfig {
            show_images: false,
            ..DisplayConfig::default()
        };
        let task = Task::with_image("Walk dog", 500, false, "dog.png");
        assert!(!render_task(1, &task, &display).contains("dog.png"));
    }

    #[test]
    fn timestamp_falls_back_to_millis_on_bad_format() {
        assert_eq!(format_timestamp(1000, "%Q"), "1000");
        assert_eq!(format_timestamp(0, "%Y").len(), 4);
    }
}
