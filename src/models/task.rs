use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use super::forms::TaskChanges;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Task {
    pub id: String,
    // Documents written before ownership existed have no user_id field; the
    // default keeps them loadable so the migrator can assign an owner.
    #[serde(default)]
    pub user_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    pub fn new(user_id: String, title: String, description: String, due_date: Option<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id,
            title,
            description,
            due_date,
            completed: false,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    /// Apply a partial update. Completion stamps `completed_at` only on the
    /// first pending->completed transition; toggling completion back off (and
    /// on again) never erases the original completion timestamp.
    pub fn apply_changes(&mut self, changes: &TaskChanges) {
        if let Some(title) = &changes.title {
            self.title = title.clone();
        }
        if let Some(description) = &changes.description {
            self.description = description.clone();
        }
        if let Some(due_date) = &changes.due_date {
            self.due_date = Some(due_date.clone());
        }
        if let Some(completed) = changes.completed {
            self.completed = completed;
            if completed && self.completed_at.is_none() {
                self.completed_at = Some(Utc::now());
            }
        }
    }

    pub fn due_datetime(&self) -> Option<DateTime<Utc>> {
        self.due_date.as_deref().and_then(parse_due_date)
    }

    /// Whether the due date falls inside the given calendar month.
    pub fn due_in_month(&self, year: i32, month: u32) -> bool {
        use chrono::Datelike;
        self.due_datetime()
            .map(|due| due.year() == year && due.month() == month)
            .unwrap_or(false)
    }
}

/// Lenient ISO-8601 parsing for due dates: full RFC 3339 (a trailing `Z` is
/// fine), the naive datetime shapes produced by `<input type="datetime-local">`,
/// and bare dates (interpreted as midnight UTC).
pub fn parse_due_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }
    None
}
