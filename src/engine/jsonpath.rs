//! Path expressions over JSON-shaped values
//!
//! A path is a `.`-separated list of segments, each an identifier optionally
//! followed by `[index]` groups: `editor.tabs[1]`, `matrix[0][2]`.

use crate::error::{EvalError, EvalResult};
use std::collections::BTreeMap;
use std::fmt;

/// A JSON value tree, with an explicit marker for absent values
#[derive(Debug, Clone, PartialEq, Default)]
pub enum JsonValue {
    Boolean(bool),
    Number(f64),
    Null,
    #[default]
    Undefined,
    Text(String),
    Sequence(Vec<JsonValue>),
    Object(BTreeMap<String, JsonValue>),
}

impl JsonValue {
    /// Named field of an object, `Undefined` for anything else
    pub fn field(&self, name: &str) -> &JsonValue {
        match self {
            JsonValue::Object(fields) => fields.get(name).unwrap_or(&UNDEFINED),
            _ => &UNDEFINED,
        }
    }

    /// Element of a sequence, `Undefined` when out of range or not a sequence
    pub fn element(&self, index: usize) -> &JsonValue {
        match self {
            JsonValue::Sequence(items) => items.get(index).unwrap_or(&UNDEFINED),
            _ => &UNDEFINED,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, JsonValue::Undefined)
    }

    fn to_serde(&self) -> serde_json::Value {
        match self {
            JsonValue::Boolean(b) => serde_json::Value::Bool(*b),
            JsonValue::Number(n) if is_integral(*n) => serde_json::Value::from(*n as i64),
            JsonValue::Number(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            JsonValue::Null | JsonValue::Undefined => serde_json::Value::Null,
            JsonValue::Text(s) => serde_json::Value::String(s.clone()),
            JsonValue::Sequence(items) => {
                serde_json::Value::Array(items.iter().map(JsonValue::to_serde).collect())
            }
            JsonValue::Object(fields) => serde_json::Value::Object(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_serde()))
                    .collect(),
            ),
        }
    }
}

static UNDEFINED: JsonValue = JsonValue::Undefined;

impl From<serde_json::Value> for JsonValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => JsonValue::Null,
            serde_json::Value::Bool(b) => JsonValue::Boolean(b),
            serde_json::Value::Number(n) => JsonValue::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => JsonValue::Text(s),
            serde_json::Value::Array(items) => {
                JsonValue::Sequence(items.into_iter().map(JsonValue::from).collect())
            }
            serde_json::Value::Object(fields) => JsonValue::Object(
                fields
                    .into_iter()
                    .map(|(k, v)| (k, JsonValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl fmt::Display for JsonValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JsonValue::Boolean(b) => write!(f, "{}", b),
            JsonValue::Number(n) => f.write_str(&format_number(*n)),
            JsonValue::Null => f.write_str("null"),
            JsonValue::Undefined => f.write_str("undefined"),
            JsonValue::Text(s) => f.write_str(s),
            JsonValue::Sequence(_) | JsonValue::Object(_) => write!(f, "{}", self.to_serde()),
        }
    }
}

/// Canonical decimal text: integral values print without a fraction
fn format_number(n: f64) -> String {
    if is_integral(n) {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

fn is_integral(n: f64) -> bool {
    n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15
}

/// Resolve `path` against `root` and stringify the result
///
/// Missing fields and out-of-range indices give `"undefined"`. A bracket group
/// that isn't a non-negative integer, or a segment with unbalanced brackets,
/// fails with [`EvalError::MalformedPath`].
pub fn evaluate(root: &JsonValue, path: &str) -> EvalResult<String> {
    Ok(lookup(root, path)?.to_string())
}

/// Resolve `path` against `root` without stringifying
pub fn lookup<'a>(root: &'a JsonValue, path: &str) -> EvalResult<&'a JsonValue> {
    let malformed = || EvalError::MalformedPath(path.to_string());
    let mut value = root;

    for segment in path.split('.') {
        let Some(open) = segment.find('[') else {
            value = value.field(segment);
            continue;
        };

        value = value.field(&segment[..open]);

        let indices = segment[open..]
            .strip_prefix('[')
            .and_then(|s| s.strip_suffix(']'))
            .ok_or_else(malformed)?;

        for index in indices.split("][") {
            let index: usize = index.trim().parse().map_err(|_| malformed())?;
            value = value.element(index);
        }
    }

    Ok(value)
}
