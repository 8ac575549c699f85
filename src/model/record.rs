use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Plain category record as stored and displayed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRecord {
    pub title: String,
    pub color: String,
}

/// Plain task record as stored under the storage key and handed to renderers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    pub id: u64,
    pub title: String,
    pub complete: bool,
    pub category: Option<CategoryRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl TaskRecord {
    /// Category title when a badge should be shown
    pub fn badge_title(&self) -> Option<&str> {
        self.category
            .as_ref()
            .map(|c| c.title.as_str())
            .filter(|t| !t.is_empty())
    }
}

/// Loosely-typed shape of a stored entry. Every field may be missing or of
/// the wrong type; `into_record` applies the defaulting rules.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTaskRecord {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    title: Option<Value>,
    /// Older entries stored the title under `text`
    #[serde(default)]
    text: Option<Value>,
    #[serde(default)]
    complete: Option<Value>,
    #[serde(default)]
    category: Option<Value>,
    #[serde(default)]
    created_at: Option<Value>,
    #[serde(default)]
    updated_at: Option<Value>,
}

impl RawTaskRecord {
    fn into_record(self) -> TaskRecord {
        let title = non_empty_str(self.title.as_ref())
            .or_else(|| non_empty_str(self.text.as_ref()))
            .unwrap_or_default();

        let category = match self.category {
            Some(Value::Object(map)) => {
                let title = non_empty_str(map.get("title")).unwrap_or_default();
                let color = crate::model::Category::color_for(&title).to_string();
                Some(CategoryRecord { title, color })
            }
            _ => None,
        };

        TaskRecord {
            id: self.id.as_ref().map_or(0, coerce_id),
            title,
            complete: self.complete.as_ref().is_some_and(is_truthy),
            category,
            created_at: self.created_at.as_ref().and_then(parse_timestamp),
            updated_at: self.updated_at.as_ref().and_then(parse_timestamp),
        }
    }
}

/// Decode the stored JSON array, tolerating malformed entries.
///
/// An unparseable document or a non-array value yields an empty list.
/// Entries that are not objects are skipped. Missing or invalid fields
/// fall back to defaults: id → parsed leading integer or 0, title → legacy
/// `text` or empty, complete → truthiness, category → only when an object.
pub fn decode_records(text: &str) -> Vec<TaskRecord> {
    let entries = match serde_json::from_str::<Value>(text) {
        Ok(Value::Array(items)) => items,
        Ok(_) => {
            tracing::warn!("stored tasks are not a JSON array, starting empty");
            return Vec::new();
        }
        Err(e) => {
            tracing::warn!(error = %e, "stored tasks are not valid JSON, starting empty");
            return Vec::new();
        }
    };

    let mut records = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        if !entry.is_object() {
            tracing::warn!(index, "skipping stored task that is not an object");
            continue;
        }
        match serde_json::from_value::<RawTaskRecord>(entry) {
            Ok(raw) => records.push(raw.into_record()),
            Err(e) => tracing::warn!(index, error = %e, "skipping unreadable stored task"),
        }
    }
    records
}

/// Encode records as the JSON array written to storage
pub fn encode_records(records: &[TaskRecord]) -> Result<String, serde_json::Error> {
    serde_json::to_string(records)
}

fn non_empty_str(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

fn coerce_id(value: &Value) -> u64 {
    match value {
        Value::Number(n) => n.as_u64().unwrap_or(0),
        Value::String(s) => parse_leading_int(s),
        _ => 0,
    }
}

/// Parse leading ASCII digits, ignoring leading whitespace ("12abc" → 12)
fn parse_leading_int(s: &str) -> u64 {
    let digits: String = s
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(0)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    let s = value.as_str()?;
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::category::{DEFAULT_COLOR, HOUSE_COLOR};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_decode_full_record() {
        let json = r##"[{"id":3,"title":"Buy milk","complete":true,
            "category":{"title":"House","color":"#000000"},
            "createdAt":"2025-05-01T10:00:00Z","updatedAt":"2025-05-02T10:00:00Z"}]"##;
        let records = decode_records(json);
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.id, 3);
        assert_eq!(r.title, "Buy milk");
        assert!(r.complete);
        let cat = r.category.as_ref().unwrap();
        assert_eq!(cat.title, "House");
        // stored color is replaced by the derived one
        assert_eq!(cat.color, HOUSE_COLOR);
        assert_eq!(
            r.created_at.unwrap().to_rfc3339(),
            "2025-05-01T10:00:00+00:00"
        );
        assert!(r.updated_at.is_some());
    }

    #[test]
    fn test_decode_defaults_for_missing_fields() {
        let records = decode_records(r#"[{}]"#);
        assert_eq!(
            records,
            vec![TaskRecord {
                id: 0,
                title: String::new(),
                complete: false,
                category: None,
                created_at: None,
                updated_at: None,
            }]
        );
    }

    #[test]
    fn test_decode_string_ids() {
        let records =
            decode_records(r#"[{"id":"7","title":"a"},{"id":"12abc","title":"b"},{"id":"x","title":"c"}]"#);
        let ids: Vec<u64> = records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![7, 12, 0]);
    }

    #[test]
    fn test_decode_legacy_text_field() {
        let records = decode_records(r#"[{"id":1,"text":"Old style","complete":false}]"#);
        assert_eq!(records[0].title, "Old style");

        // title wins when both are present and non-empty
        let records = decode_records(r#"[{"id":1,"title":"New","text":"Old"}]"#);
        assert_eq!(records[0].title, "New");

        // empty title falls back to text
        let records = decode_records(r#"[{"id":1,"title":"","text":"Old"}]"#);
        assert_eq!(records[0].title, "Old");
    }

    #[test]
    fn test_decode_truthy_complete() {
        let records = decode_records(
            r#"[{"id":1,"complete":1},{"id":2,"complete":0},{"id":3,"complete":"yes"},{"id":4,"complete":null}]"#,
        );
        let flags: Vec<bool> = records.iter().map(|r| r.complete).collect();
        assert_eq!(flags, vec![true, false, true, false]);
    }

    #[test]
    fn test_decode_category_must_be_object() {
        let records = decode_records(
            r#"[{"id":1,"title":"a","category":"Work"},{"id":2,"title":"b","category":{}}]"#,
        );
        assert!(records[0].category.is_none());
        let cat = records[1].category.as_ref().unwrap();
        assert_eq!(cat.title, "");
        assert_eq!(cat.color, DEFAULT_COLOR);
        assert_eq!(records[1].badge_title(), None);
    }

    #[test]
    fn test_decode_skips_non_objects() {
        let records = decode_records(r#"[1, "two", null, [3], {"id":4,"title":"four"}]"#);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, 4);
    }

    #[test]
    fn test_decode_malformed_document() {
        assert!(decode_records("not json {{{").is_empty());
        assert!(decode_records(r#"{"id":1}"#).is_empty());
        assert!(decode_records("").is_empty());
    }

    #[test]
    fn test_decode_bad_timestamp_is_dropped() {
        let records = decode_records(r#"[{"id":1,"title":"a","createdAt":"yesterday"}]"#);
        assert!(records[0].created_at.is_none());
    }

    #[test]
    fn test_encode_uses_camel_case_and_null_category() {
        let json = encode_records(&[TaskRecord {
            id: 1,
            title: "Clean".into(),
            complete: false,
            category: None,
            created_at: None,
            updated_at: None,
        }])
        .unwrap();
        assert_eq!(json, r#"[{"id":1,"title":"Clean","complete":false,"category":null}]"#);
    }
}
