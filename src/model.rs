use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    ToDo,
    InProgress,
    Done,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::ToDo => "to-do",
            Category::InProgress => "in-progress",
            Category::Done => "done",
        }
    }

    /// The category a task cycles into when advanced once.
    pub fn next(&self) -> Self {
        match self {
            Category::ToDo => Category::InProgress,
            Category::InProgress => Category::Done,
            Category::Done => Category::ToDo,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "to-do" | "todo" => Ok(Category::ToDo),
            "in-progress" | "inprogress" => Ok(Category::InProgress),
            "done" => Ok(Category::Done),
            other => Err(anyhow!(
                "Unknown category '{}': expected to-do|in-progress|done",
                other
            )),
        }
    }
}

/// The persisted entity. Stored as camelCase JSON with ISO-8601 timestamps;
/// optional fields are omitted entirely when unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category: Category,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
}

/// Submission payload for creating a task. The store assigns the id and
/// timestamps; it performs no validation on the supplied fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: Option<String>,
    pub category: Category,
    pub due_date: Option<DateTime<Utc>>,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>, category: Category) -> Self {
        Self {
            title: title.into(),
            description: None,
            category,
            due_date: None,
        }
    }

    pub fn into_task(self, now: DateTime<Utc>) -> Task {
        Task {
            id: Ulid::new().to_string(),
            title: self.title,
            description: self.description,
            category: self.category,
            created_at: now,
            updated_at: now,
            due_date: self.due_date,
        }
    }
}

/// Partial update for an existing task. `None` leaves a field unchanged;
/// for the optional fields, `Some(None)` clears them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub category: Option<Category>,
    pub due_date: Option<Option<DateTime<Utc>>>,
}

impl TaskPatch {
    pub fn category(category: Category) -> Self {
        Self {
            category: Some(category),
            ..Self::default()
        }
    }

    pub fn apply(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title = title.clone();
        }
        if let Some(description) = &self.description {
            task.description = description.clone();
        }
        if let Some(category) = self.category {
            task.category = category;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
    }
}

/// Aggregate counts over the current collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub total: usize,
    pub to_do: usize,
    pub in_progress: usize,
    pub done: usize,
    /// Percentage of done tasks, rounded half away from zero; 0 when empty.
    pub completion_rate: u8,
}

impl TaskStats {
    pub fn compute(tasks: &[Task]) -> Self {
        let mut to_do = 0;
        let mut in_progress = 0;
        let mut done = 0;
        for task in tasks {
            match task.category {
                Category::ToDo => to_do += 1,
                Category::InProgress => in_progress += 1,
                Category::Done => done += 1,
            }
        }
        let total = tasks.len();
        let completion_rate = if total == 0 {
            0
        } else {
            ((done as f64 / total as f64) * 100.0).round() as u8
        };
        Self {
            total,
            to_do,
            in_progress,
            done,
            completion_rate,
        }
    }
}

/// Selector applied when deriving a view of the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    All,
    Category(Category),
    /// Sort newest-first by creation time instead of filtering.
    ByDate,
}

impl FromStr for Filter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(Filter::All),
            "by-date" => Ok(Filter::ByDate),
            other => Ok(Filter::Category(other.parse()?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn sample_task() -> Task {
        let created = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        TaskDraft::new("Buy milk", Category::ToDo).into_task(created)
    }

    #[test]
    fn category_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_string(&Category::ToDo).unwrap(),
            "\"to-do\""
        );
        assert_eq!(
            serde_json::to_string(&Category::InProgress).unwrap(),
            "\"in-progress\""
        );
        assert_eq!(serde_json::to_string(&Category::Done).unwrap(), "\"done\"");
    }

    #[test]
    fn category_parses_its_own_rendering() {
        for category in [Category::ToDo, Category::InProgress, Category::Done] {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
        }
        assert!("blocked".parse::<Category>().is_err());
    }

    #[test]
    fn next_cycles_through_all_categories() {
        assert_eq!(Category::ToDo.next(), Category::InProgress);
        assert_eq!(Category::InProgress.next(), Category::Done);
        assert_eq!(Category::Done.next(), Category::ToDo);
    }

    #[test]
    fn task_json_uses_camel_case_and_omits_absent_optionals() {
        let task = sample_task();
        let json = serde_json::to_string(&task).unwrap();
        assert!(json.contains("\"createdAt\""));
        assert!(json.contains("\"updatedAt\""));
        assert!(!json.contains("dueDate"));
        assert!(!json.contains("description"));

        let parsed: Task = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, task);
    }

    #[test]
    fn patch_merges_and_clears_fields() {
        let mut task = sample_task();
        task.description = Some("From the corner shop".into());

        let patch = TaskPatch {
            title: Some("Buy oat milk".into()),
            description: Some(None),
            ..TaskPatch::default()
        };
        patch.apply(&mut task);

        assert_eq!(task.title, "Buy oat milk");
        assert_eq!(task.description, None);
        assert_eq!(task.category, Category::ToDo);
    }

    #[test]
    fn filter_parses_category_selectors() {
        assert_eq!("all".parse::<Filter>().unwrap(), Filter::All);
        assert_eq!("by-date".parse::<Filter>().unwrap(), Filter::ByDate);
        assert_eq!(
            "done".parse::<Filter>().unwrap(),
            Filter::Category(Category::Done)
        );
        assert!("someday".parse::<Filter>().is_err());
    }
}
