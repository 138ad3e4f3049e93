//! Interpretation of QuickStats response bodies.

use serde_json::Value;

use super::{FetchError, Record};

/// Turn a parsed response body into records.
///
/// - an `error` field is a hard failure carrying the remote message;
/// - a `data` array is the result set;
/// - no `data` field at all is the API's way of saying "no rows".
pub fn interpret_body(body: Value) -> Result<Vec<Record>, FetchError> {
    let mut object = match body {
        Value::Object(map) => map,
        other => {
            return Err(FetchError::ParseError(format!(
                "expected a JSON object, got {}",
                type_name(&other)
            )))
        }
    };

    if let Some(error) = object.get("error") {
        return Err(FetchError::ApiError(error_message(error)));
    }

    match object.remove("data") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(records)) => Ok(records),
        Some(other) => Err(FetchError::ParseError(format!(
            "expected `data` to be an array, got {}",
            type_name(&other)
        ))),
    }
}

/// QuickStats reports errors either as a string or as a list of strings.
fn error_message(error: &Value) -> String {
    match error {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join("; "),
        other => other.to_string(),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
