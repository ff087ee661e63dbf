use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A student in the roster. Maintained by an external process; this service
/// only ever reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Group")]
    pub group: String,
}

/// A practice question in the directory, keyed by its URL. `column` is the
/// 1-indexed spreadsheet column holding the question's answer cell; the cell
/// at `column + 1` holds the time spent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "URL")]
    pub url: String,
    #[serde(rename = "Column")]
    pub column: u32,
    #[serde(rename = "Sheet")]
    pub sheet: String,
    #[serde(rename = "Platform")]
    pub platform: String,
}

/// One recorded practice attempt. Insert-only: repeated submissions create
/// repeated records, and nothing ever updates or deletes one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    #[serde(rename = "Column")]
    pub column: u32,
    #[serde(rename = "Group")]
    pub group: String,
    /// Derived identifier, `"{student name} | {question column}"`. Downstream
    /// consumers parse this string; the separator must stay `" | "`.
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Sheet")]
    pub sheet: String,
    #[serde(rename = "Number of Attempts")]
    pub attempts: Value,
    #[serde(rename = "Person")]
    pub person: String,
    #[serde(rename = "Question_fkey")]
    pub question_fkey: String,
    #[serde(rename = "Time Spent")]
    pub time_spent: Value,
    #[serde(
        rename = "Update Timestamp",
        with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime"
    )]
    pub updated_at: DateTime<Utc>,
}

/// Render a free-form submission value for display in a cell or URL
/// parameter. Strings pass through unquoted; anything else keeps its JSON
/// rendering.
pub(crate) fn field_text(value: &Value) -> String {
    match value.as_str() {
        Some(text) => text.to_string(),
        None => value.to_string(),
    }
}
