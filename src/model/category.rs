use crate::model::record::CategoryRecord;

/// Badge color for the "work" category (RGBA)
pub const WORK_COLOR: &str = "#FF000099";
/// Badge color for the "house" category
pub const HOUSE_COLOR: &str = "#0000CD";
/// Badge color for every other category
pub const DEFAULT_COLOR: &str = "#008000";

/// A label attached to a task. The color is always derived from the title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    title: String,
    color: &'static str,
}

impl Category {
    pub fn new(title: impl Into<String>) -> Self {
        let title = title.into();
        let color = Category::color_for(&title);
        Category { title, color }
    }

    /// Fixed lookup from title to display color (case-insensitive, trimmed)
    pub fn color_for(title: &str) -> &'static str {
        match title.trim().to_lowercase().as_str() {
            "work" => WORK_COLOR,
            "house" => HOUSE_COLOR,
            _ => DEFAULT_COLOR,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn color(&self) -> &'static str {
        self.color
    }

    /// Replace the title and recompute the color
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.color = Category::color_for(&self.title);
    }

    pub fn to_record(&self) -> CategoryRecord {
        CategoryRecord {
            title: self.title.clone(),
            color: self.color.to_string(),
        }
    }
}

/// Stored colors are never trusted; the color is re-derived from the title.
impl From<CategoryRecord> for Category {
    fn from(record: CategoryRecord) -> Self {
        Category::new(record.title)
    }
}
