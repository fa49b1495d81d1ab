//! Conversion between [`Value`] graphs and `serde_json` values.

use serde_json::{Map, Number};
use thiserror::Error;

use crate::value::{Array, Identity, Key, Value};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JsonBridgeError {
    #[error("value graph contains a cycle through {0}")]
    Cycle(Identity),
    #[error("non-finite float has no JSON form")]
    NonFiniteFloat,
    #[error("string is not valid UTF-8")]
    InvalidUtf8,
    #[error("{0} has no JSON form")]
    Unsupported(&'static str),
}

/// Converts a value graph to JSON.
///
/// Arrays keyed `0..n` in order become JSON arrays, any other array becomes a
/// JSON object with stringified keys. Objects become the JSON object of their
/// properties. Shared cells are transparent. A graph that reaches the same
/// container twice along one path is a cycle and fails; sibling aliases are
/// written out once per position.
pub fn to_json(value: &Value) -> Result<serde_json::Value, JsonBridgeError> {
    let mut path = Vec::new();
    convert(value, &mut path)
}

fn convert(
    value: &Value,
    path: &mut Vec<Identity>,
) -> Result<serde_json::Value, JsonBridgeError> {
    let json = match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Int(n) => serde_json::Value::from(*n),
        Value::Float(f) => Number::from_f64(*f)
            .map(serde_json::Value::Number)
            .ok_or(JsonBridgeError::NonFiniteFloat)?,
        Value::Str(s) => serde_json::Value::String(utf8(s)?),
        Value::Array(array) => {
            enter(path, array.id())?;
            let json = convert_array(&array.borrow(), path);
            path.pop();
            json?
        }
        Value::Object(object) => {
            enter(path, object.id())?;
            let json = {
                let object = object.borrow();
                if object.opaque.is_some() {
                    Err(JsonBridgeError::Unsupported("opaque object"))
                } else {
                    convert_map(&object.props, path)
                }
            };
            path.pop();
            json?
        }
        Value::Shared(cell) => {
            enter(path, cell.id())?;
            let json = convert(&cell.borrow(), path);
            path.pop();
            json?
        }
        Value::Resource(_) => return Err(JsonBridgeError::Unsupported("resource")),
    };
    Ok(json)
}

fn enter(path: &mut Vec<Identity>, id: Identity) -> Result<(), JsonBridgeError> {
    if path.contains(&id) {
        return Err(JsonBridgeError::Cycle(id));
    }
    path.push(id);
    Ok(())
}

fn convert_array(
    array: &Array,
    path: &mut Vec<Identity>,
) -> Result<serde_json::Value, JsonBridgeError> {
    if !array.is_list() {
        return convert_map(array, path);
    }
    let items = array
        .values()
        .map(|v| convert(v, path))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(serde_json::Value::Array(items))
}

fn convert_map(
    array: &Array,
    path: &mut Vec<Identity>,
) -> Result<serde_json::Value, JsonBridgeError> {
    let mut map = Map::with_capacity(array.len());
    for (key, value) in array.iter() {
        let key = match key {
            Key::Int(n) => n.to_string(),
            Key::Str(s) => utf8(s)?,
        };
        map.insert(key, convert(value, path)?);
    }
    Ok(serde_json::Value::Object(map))
}

fn utf8(bytes: &[u8]) -> Result<String, JsonBridgeError> {
    String::from_utf8(bytes.to_vec()).map_err(|_| JsonBridgeError::InvalidUtf8)
}

/// Converts JSON to a value graph.
///
/// JSON arrays become integer-keyed arrays and JSON objects string-keyed
/// arrays. Numbers that fit in `i64` become [`Value::Int`], all others
/// [`Value::Float`].
pub fn from_json(json: &serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Int(i),
            None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        serde_json::Value::String(s) => Value::from(s.as_str()),
        serde_json::Value::Array(items) => Value::array(Array::list(items.iter().map(from_json))),
        serde_json::Value::Object(map) => Value::array(
            map.iter()
                .map(|(k, v)| (k.as_str(), from_json(v)))
                .collect(),
        ),
    }
}
