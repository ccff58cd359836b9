//! Stream description payloads.
//!
//! The contract stores the description as an opaque string. By convention
//! it holds a small JSON object, `{"c": "<comment>", "col": "<color>"}`
//! (older streams use `comment` instead of `c`), but streams created by
//! other clients may hold plain text. Parsing is best-effort and never
//! fails.

use serde_json::{Map, Value};

/// Color reported when a description carries none.
pub const TRANSPARENT: &str = "transparent";

/// Decoded description payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamDescription {
    pub comment: Option<String>,
    pub color: Option<String>,
}

impl StreamDescription {
    pub fn new(comment: Option<String>, color: Option<String>) -> Self {
        StreamDescription { comment, color }
    }

    /// Decode a description string.
    ///
    /// Text that is not JSON is taken whole as the comment. JSON that is
    /// not an object carries neither field.
    pub fn parse(description: &str) -> Self {
        if description.is_empty() {
            return StreamDescription::default();
        }
        match serde_json::from_str::<Value>(description) {
            Ok(Value::Object(obj)) => StreamDescription {
                comment: string_field(&obj, "comment").or_else(|| string_field(&obj, "c")),
                color: string_field(&obj, "col"),
            },
            Ok(_) => StreamDescription::default(),
            Err(_) => StreamDescription {
                comment: Some(description.to_string()),
                color: None,
            },
        }
    }

    /// Encode for a create-stream request. Empty fields are left out; if
    /// nothing is left the stream gets no description at all.
    pub fn encode(&self) -> Option<String> {
        let mut obj = Map::new();
        if let Some(color) = self.color.as_deref().filter(|c| !c.is_empty()) {
            obj.insert("col".to_string(), Value::String(color.to_string()));
        }
        if let Some(comment) = self.comment.as_deref().filter(|c| !c.is_empty()) {
            obj.insert("c".to_string(), Value::String(comment.to_string()));
        }
        if obj.is_empty() {
            None
        } else {
            Some(Value::Object(obj).to_string())
        }
    }

    /// The color, or [`TRANSPARENT`] when absent.
    pub fn color_or_default(&self) -> &str {
        self.color.as_deref().unwrap_or(TRANSPARENT)
    }
}

fn string_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Human comment embedded in a description, if any.
pub fn parse_comment(description: &str) -> Option<String> {
    StreamDescription::parse(description).comment
}

/// Display color embedded in a description, [`TRANSPARENT`] otherwise.
pub fn parse_color(description: &str) -> String {
    StreamDescription::parse(description)
        .color_or_default()
        .to_string()
}
