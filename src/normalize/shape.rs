//! Response shape resolution
//!
//! List endpoints answer with a bare array or with the array wrapped under a
//! key. The known shapes are tried in order and the first match wins.

use serde_json::Value;

use crate::error::{HerdError, Result};

/// A way a list of records can be wrapped in a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// `[...]`
    BareArray,
    /// `{"<key>": [...]}`
    Wrapped(&'static str),
    /// `{"<outer>": {"<inner>": [...]}}`
    NestedWrapped(&'static str, &'static str),
}

/// Known shapes in resolution order
pub const RESPONSE_SHAPES: &[ResponseShape] = &[
    ResponseShape::BareArray,
    ResponseShape::Wrapped("data"),
    ResponseShape::Wrapped("animals"),
    ResponseShape::Wrapped("items"),
    ResponseShape::NestedWrapped("data", "animals"),
    ResponseShape::NestedWrapped("data", "items"),
];

impl ResponseShape {
    /// Borrow the record list if the payload has this shape
    #[must_use]
    pub fn extract<'a>(&self, payload: &'a Value) -> Option<&'a Vec<Value>> {
        match self {
            Self::BareArray => payload.as_array(),
            Self::Wrapped(key) => payload.get(key)?.as_array(),
            Self::NestedWrapped(outer, inner) => payload.get(outer)?.get(inner)?.as_array(),
        }
    }

    /// Take ownership of the record list if the payload has this shape
    fn take(&self, payload: &mut Value) -> Option<Vec<Value>> {
        let slot = match self {
            Self::BareArray => Some(payload),
            Self::Wrapped(key) => payload.get_mut(key),
            Self::NestedWrapped(outer, inner) => {
                payload.get_mut(outer).and_then(|v| v.get_mut(inner))
            }
        }?;
        match slot.take() {
            Value::Array(records) => Some(records),
            other => {
                *slot = other;
                None
            }
        }
    }
}

/// Shape of a payload, if any known shape matches
#[must_use]
pub fn detect_shape(payload: &Value) -> Option<ResponseShape> {
    RESPONSE_SHAPES
        .iter()
        .copied()
        .find(|shape| shape.extract(payload).is_some())
}

/// Unwrap the record list from a response payload
pub fn extract_records(mut payload: Value) -> Result<Vec<Value>> {
    match detect_shape(&payload) {
        Some(shape) => Ok(shape.take(&mut payload).unwrap_or_default()),
        None => Err(HerdError::UnsupportedShape(describe(&payload))),
    }
}

fn describe(payload: &Value) -> String {
    match payload {
        Value::Object(map) => {
            let keys: Vec<&str> = map.keys().map(String::as_str).collect();
            format!("object with keys [{}]", keys.join(", "))
        }
        Value::Null => "null".to_string(),
        Value::Bool(_) => "boolean".to_string(),
        Value::Number(_) => "number".to_string(),
        Value::String(_) => "string".to_string(),
        Value::Array(_) => "array".to_string(),
    }
}
