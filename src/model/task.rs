use chrono::{DateTime, Duration, Utc};

use crate::model::category::Category;
use crate::model::record::TaskRecord;

/// Maximum title length, counted in characters after trimming
pub const MAX_TITLE_LEN: usize = 200;

/// Numeric task identifier, unique within a store
pub type TaskId = u64;

/// Rejected task title
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("task title cannot be empty")]
    EmptyTitle,
    #[error("task title is {len} characters, the maximum is {max}")]
    TitleTooLong { len: usize, max: usize },
}

/// Check a title and return its trimmed form
pub fn validate_title(title: &str) -> Result<String, ValidationError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    let len = trimmed.chars().count();
    if len > MAX_TITLE_LEN {
        return Err(ValidationError::TitleTooLong {
            len,
            max: MAX_TITLE_LEN,
        });
    }
    Ok(trimmed.to_string())
}

/// A single to-do item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    id: TaskId,
    title: String,
    complete: bool,
    category: Option<Category>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Task {
    pub fn new(
        id: TaskId,
        title: &str,
        complete: bool,
        category: Option<Category>,
    ) -> Result<Self, ValidationError> {
        let title = validate_title(title)?;
        let now = Utc::now();
        Ok(Task {
            id,
            title,
            complete,
            category,
            created_at: now,
            updated_at: now,
        })
    }

    /// Rebuild a task from a stored record. The title is re-validated;
    /// missing timestamps default to now.
    pub fn from_record(record: TaskRecord) -> Result<Self, ValidationError> {
        let title = validate_title(&record.title)?;
        let now = Utc::now();
        let created_at = record.created_at.unwrap_or(now);
        Ok(Task {
            id: record.id,
            title,
            complete: record.complete,
            category: record.category.map(Category::from),
            created_at,
            updated_at: record.updated_at.unwrap_or(created_at).max(created_at),
        })
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn category(&self) -> Option<&Category> {
        self.category.as_ref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Replace the title. On error the current title is kept.
    pub fn set_title(&mut self, title: &str) -> Result<(), ValidationError> {
        self.title = validate_title(title)?;
        self.touch();
        Ok(())
    }

    pub fn set_complete(&mut self, complete: bool) {
        self.complete = complete;
        self.touch();
    }

    pub fn toggle(&mut self) {
        self.set_complete(!self.complete);
    }

    pub fn set_category(&mut self, category: Option<Category>) {
        self.category = category;
    }

    /// Store-internal: used when a loaded id collides with another task
    pub(crate) fn reassign_id(&mut self, id: TaskId) {
        self.id = id;
    }

    pub fn to_record(&self) -> TaskRecord {
        TaskRecord {
            id: self.id,
            title: self.title.clone(),
            complete: self.complete,
            category: self.category.as_ref().map(Category::to_record),
            created_at: Some(self.created_at),
            updated_at: Some(self.updated_at),
        }
    }

    /// Advance `updated_at`, keeping it strictly increasing even when the
    /// clock has not moved since the last mutation
    fn touch(&mut self) {
        let now = Utc::now();
        self.updated_at = if now > self.updated_at {
            now
        } else {
            self.updated_at + Duration::microseconds(1)
        };
    }
}
