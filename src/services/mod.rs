pub mod tasks;

pub use tasks::{LoadState, StoreError, TaskStore, TASKS_KEY};
