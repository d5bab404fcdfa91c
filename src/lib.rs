//! todos - task list library
//!
//! The in-memory task model and its synchronization with a durable
//! key-value store. The `todos` binary is a thin CLI over [`session::Session`].
//!
//! # Module Organization
//!
//! - `task`: Task entity (plain or image-bearing)
//! - `list`: Ordered task collection and sort direction
//! - `store`: Key-value store trait with memory and file backends
//! - `persist`: Snapshotting a task list into a store
//! - `session`: Presentation-facing state (mutate, then persist)
//! - `config`: Configuration loading from `todos.toml`
//! - `lock`: File locking and atomic writes
//! - `output`: Human and JSON output
//! - `cli`: Command-line interface using clap
//! - `error`: Error types and result aliases

pub mod cli;
pub mod config;
pub mod error;
pub mod list;
pub mod lock;
pub mod output;
pub mod persist;
pub mod session;
pub mod store;
pub mod task;

pub use error::{Error, Result};
pub use list::{SortDirection, TaskList};
pub use persist::Persistence;
pub use session::Session;
pub use store::{FileStore, KeyValueStore, MemoryStore};
pub use task::{Task, TaskId, TaskKind};
