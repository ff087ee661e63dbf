use crate::db::models::field_text;
use crate::record::error::RecordError;
use serde_json::Value;

/// The required fields of a submission, in the order they are checked. The
/// first missing one is reported by name.
pub const REQUIRED_FIELDS: [&str; 6] = [
    "studentName",
    "attempts",
    "timeTaken",
    "gitUrl",
    "questionUrl",
    "platform",
];

/// One validated practice-attempt payload. `attempts` and `time_taken` are
/// free-form and carried through opaquely; the rest are rendered to strings
/// for lookups and the mirror.
#[derive(Debug, Clone)]
pub struct Submission {
    pub student_name: String,
    pub attempts: Value,
    pub time_taken: Value,
    pub git_url: String,
    pub question_url: String,
    pub platform: String,
}

impl Submission {
    /// Validate a raw JSON body. Presence-only: each required field must
    /// exist as a key, nothing more is enforced.
    pub fn from_json(body: &Value) -> Result<Self, RecordError> {
        let map = body
            .as_object()
            .ok_or_else(|| RecordError::MissingField(REQUIRED_FIELDS[0].to_string()))?;

        for field in REQUIRED_FIELDS {
            if !map.contains_key(field) {
                return Err(RecordError::MissingField(field.to_string()));
            }
        }

        Ok(Submission {
            student_name: field_text(&map["studentName"]),
            attempts: map["attempts"].clone(),
            time_taken: map["timeTaken"].clone(),
            git_url: field_text(&map["gitUrl"]),
            question_url: field_text(&map["questionUrl"]),
            platform: field_text(&map["platform"]),
        })
    }
}
