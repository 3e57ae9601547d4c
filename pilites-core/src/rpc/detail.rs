//! Error-message extraction for non-success responses.
//!
//! The controller reports failures as `{"detail": ...}` where `detail` is
//! either a plain message or a list of field errors:
//!
//! ```text
//! {"detail": "Play 'play-x' not found."}
//! {"detail": [{"loc": ["body", "ledCount"], "msg": "value is not a valid integer"}]}
//! ```

use std::fmt;

use serde::Deserialize;

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<Detail>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Detail {
    Message(String),
    Fields(Vec<FieldError>),
    Other(serde_json::Value),
}

#[derive(Deserialize)]
struct FieldError {
    loc: Vec<LocSegment>,
    msg: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LocSegment {
    Key(String),
    Index(i64),
}

impl fmt::Display for LocSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => f.write_str(key),
            Self::Index(index) => write!(f, "{index}"),
        }
    }
}

impl FieldError {
    /// `"a.b: msg"`, dropping the leading location segment (the request root).
    fn describe(&self) -> String {
        let path: Vec<String> = self.loc.iter().skip(1).map(ToString::to_string).collect();
        format!("{}: {}", path.join("."), self.msg)
    }
}

/// The user-facing message for a non-success response.
///
/// A string `detail` is used verbatim, a list of field errors is joined
/// with `"; "`, and anything else falls back to `"HTTP {status}"`.
pub fn decode_error_message(status: u16, body: &[u8]) -> String {
    let detail = serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.detail);

    match detail {
        Some(Detail::Message(message)) => message,
        Some(Detail::Fields(fields)) if !fields.is_empty() => fields
            .iter()
            .map(FieldError::describe)
            .collect::<Vec<_>>()
            .join("; "),
        _ => format!("HTTP {status}"),
    }
}
