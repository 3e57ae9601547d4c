//! Parameter values and per-definition validation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{ParamDef, ParamSpec};
use crate::error::ValidationError;

/// Parameter key → value, as stored on an effect.
pub type Params = BTreeMap<String, ParamValue>;

/// A single parameter value.
///
/// Colors and select options are both carried as text; the schema decides
/// which one a key is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Number(f64),
    Text(String),
}

impl ParamValue {
    /// Build a color value, normalising hex digits to lowercase.
    pub fn color(hex: &str) -> Self {
        Self::Text(hex.to_ascii_lowercase())
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Number(_) => None,
        }
    }
}

impl From<f64> for ParamValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

/// `true` for strings matching `^#[0-9a-f]{6}$`.
pub fn is_hex_color(s: &str) -> bool {
    s.len() == 7
        && s.starts_with('#')
        && s[1..]
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

impl ParamDef {
    /// Validate one value against this definition.
    pub fn check(&self, value: &ParamValue) -> Result<(), ValidationError> {
        let key = || self.key.to_string();
        match (&self.spec, value) {
            (ParamSpec::Color { .. }, ParamValue::Text(s)) => {
                if is_hex_color(s) {
                    Ok(())
                } else {
                    Err(ValidationError::InvalidColor { key: key() })
                }
            }
            (ParamSpec::Number { min, max, .. }, ParamValue::Number(n)) => {
                if n.is_finite() && *n >= *min && *n <= *max {
                    Ok(())
                } else {
                    Err(ValidationError::ParamOutOfBounds {
                        key: key(),
                        min: *min,
                        max: *max,
                    })
                }
            }
            (ParamSpec::Select { options, .. }, ParamValue::Text(s)) => {
                if options.iter().any(|o| o.value == s) {
                    Ok(())
                } else {
                    let options = options
                        .iter()
                        .map(|o| o.value)
                        .collect::<Vec<_>>()
                        .join(", ");
                    Err(ValidationError::NotAnOption {
                        key: key(),
                        options,
                    })
                }
            }
            _ => Err(ValidationError::WrongParamType { key: key() }),
        }
    }
}
