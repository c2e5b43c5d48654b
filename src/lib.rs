pub mod config;
pub mod model;
pub mod services;
pub mod storage;
pub mod theme;
pub mod views;

pub use config::AppConfig;
pub use model::{Category, Filter, Task, TaskDraft, TaskPatch, TaskStats};
pub use services::{LoadState, StoreError, TaskStore};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
pub use theme::{Theme, ThemePreference};
pub use views::{category_label, filter_tasks, format_date, is_overdue};
