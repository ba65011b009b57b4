//! crates/court_summarizer_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or web framework.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use uuid::Uuid;

/// A persisted court-order summary.
///
/// Records are immutable after creation; `updated_at` exists so any future
/// modification path can touch it, none exists today.
#[derive(Debug, Clone)]
pub struct SummaryRecord {
    pub id: Uuid,
    /// Ownership is by email string. A record may outlive (or never have) a
    /// matching user account; the link is not an enforced foreign key.
    pub owner_email: String,
    pub case_name: String,
    pub original_file_name: String,
    pub summary_file_name: String,
    /// Normalized summary payload, see [`SummaryPayload::into_normalized`].
    pub summary_data: Value,
    /// Relative public path of the stored source file, if one was uploaded.
    /// A weak back-reference: the blob may be removed out from under it.
    pub blob_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The validated, normalized shape handed to the summary store for insertion.
#[derive(Debug, Clone)]
pub struct NewSummaryRecord {
    pub owner_email: String,
    pub case_name: String,
    pub original_file_name: String,
    pub summary_file_name: String,
    pub summary_data: Value,
    pub blob_path: Option<String>,
}

// Only used internally for login/signup - contains sensitive data.
#[derive(Debug, Clone)]
pub struct UserCredential {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub occupation: String,
    pub password_hash: String,
}

impl UserCredential {
    /// The non-secret projection returned to callers.
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            name: self.name.clone(),
            email: self.email.clone(),
            occupation: self.occupation.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewUserCredential {
    pub name: String,
    pub email: String,
    pub occupation: String,
    pub password_hash: String,
}

/// Profile fields safe to hand back over the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    pub occupation: String,
}

/// The recognized list fields of a summary payload. Absent ones are defaulted
/// to empty arrays when the payload is normalized.
const LIST_FIELDS: [&str; 4] = ["judges", "citations", "acts", "sections"];

/// Result of parsing a caller-supplied summary payload.
///
/// Submissions are never rejected for a malformed payload: text that fails to
/// parse as JSON is kept verbatim under a `raw` field so no summary is lost.
#[derive(Debug, Clone)]
pub enum SummaryPayload {
    Structured(Value),
    RawFallback(String),
}

impl SummaryPayload {
    /// Wraps an already-structured value; `None` becomes an empty object.
    pub fn from_value(value: Option<Value>) -> Self {
        Self::Structured(value.unwrap_or_else(|| Value::Object(Map::new())))
    }

    /// Parses a serialized textual payload, falling back to the raw text when
    /// it is not valid JSON.
    pub fn from_text(text: &str) -> Self {
        match serde_json::from_str(text) {
            Ok(value) => Self::Structured(value),
            Err(_) => Self::RawFallback(text.to_string()),
        }
    }

    /// Produces the persisted payload shape.
    ///
    /// Recognized list fields default to empty arrays, `summary` and
    /// `fullSummary` pass through untouched (string or nested object), and
    /// unrecognized fields are preserved. Structured input that is not an
    /// object is wrapped under `raw` the same way unparseable text is.
    pub fn into_normalized(self) -> Value {
        let mut map = match self {
            Self::Structured(Value::Object(map)) => map,
            Self::Structured(Value::Null) => Map::new(),
            Self::Structured(other) => {
                let mut map = Map::new();
                map.insert("raw".to_string(), other);
                map
            }
            Self::RawFallback(text) => {
                let mut map = Map::new();
                map.insert("raw".to_string(), Value::String(text));
                map
            }
        };

        for field in LIST_FIELDS {
            map.entry(field).or_insert_with(|| Value::Array(Vec::new()));
        }

        Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn structured_payload_keeps_fields_and_defaults_lists() {
        let payload = SummaryPayload::from_value(Some(json!({
            "judges": ["J. Lee"],
            "summary": {"headnote": "..."},
            "extra": 42
        })));
        let value = payload.into_normalized();

        assert_eq!(value["judges"], json!(["J. Lee"]));
        assert_eq!(value["citations"], json!([]));
        assert_eq!(value["acts"], json!([]));
        assert_eq!(value["sections"], json!([]));
        assert_eq!(value["summary"], json!({"headnote": "..."}));
        assert_eq!(value["extra"], json!(42));
    }

    #[test]
    fn missing_payload_becomes_empty_object_with_defaults() {
        let value = SummaryPayload::from_value(None).into_normalized();
        assert_eq!(value["judges"], json!([]));
        assert!(value.get("summary").is_none());
    }

    #[test]
    fn unparseable_text_is_kept_under_raw() {
        let value = SummaryPayload::from_text("not {json").into_normalized();
        assert_eq!(value["raw"], json!("not {json"));
        assert_eq!(value["judges"], json!([]));
    }

    #[test]
    fn valid_json_text_is_parsed() {
        let value =
            SummaryPayload::from_text(r#"{"citations":["AIR 1973 SC 1461"]}"#).into_normalized();
        assert_eq!(value["citations"], json!(["AIR 1973 SC 1461"]));
        assert!(value.get("raw").is_none());
    }

    #[test]
    fn non_object_structured_input_is_wrapped_not_rejected() {
        let value = SummaryPayload::from_value(Some(json!("just a string"))).into_normalized();
        assert_eq!(value["raw"], json!("just a string"));
    }
}
