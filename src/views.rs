//! Pure helpers deriving filtered views and display facts from a task snapshot.

use chrono::{DateTime, Utc};

use crate::model::{Category, Filter, Task};

/// Apply a filter selector to a snapshot. `All` and the category selectors
/// preserve input order; `ByDate` sorts newest-first by creation time.
pub fn filter_tasks<'a>(tasks: &'a [Task], filter: Filter) -> Vec<&'a Task> {
    match filter {
        Filter::All => tasks.iter().collect(),
        Filter::Category(category) => tasks
            .iter()
            .filter(|task| task.category == category)
            .collect(),
        Filter::ByDate => {
            let mut sorted: Vec<&Task> = tasks.iter().collect();
            sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            sorted
        }
    }
}

/// Display string for a category. Total over the closed enum.
pub fn category_label(category: Category) -> &'static str {
    match category {
        Category::ToDo => "To Do",
        Category::InProgress => "In Progress",
        Category::Done => "Done",
    }
}

/// A task is overdue when it has a due date, is not done, and `now` is
/// strictly past the due date. Done tasks are never overdue.
pub fn is_overdue(task: &Task, now: DateTime<Utc>) -> bool {
    match task.due_date {
        Some(due_date) if task.category != Category::Done => now > due_date,
        _ => false,
    }
}

/// Render the calendar date, day first, without a time-of-day component.
pub fn format_date(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%d/%m/%Y").to_string()
}
