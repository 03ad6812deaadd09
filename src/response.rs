//! Shape checks for the status document and extraction of the latest submission.
use serde_json::{Map, Value};

use crate::error::CycleError;

/// Latest submission record, still untyped: key checks happen in `verdict`.
pub type Submission = Map<String, Value>;

/// Outcome of a valid status document.
#[derive(Debug, Clone, PartialEq)]
pub enum Pending {
    None,
    Submission(Submission),
}

/// A validated status document.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusReport {
    pub current_date: i64,
    pub pending: Pending,
}

pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Any JSON number is a usable cursor; fractional seconds are truncated.
fn cursor_value(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_f64().map(|secs| secs.trunc() as i64))
}

/// Validate the document and pick the first (most recent) submission.
pub fn check_response(response: &Value) -> Result<StatusReport, CycleError> {
    let doc = response.as_object().ok_or(CycleError::Shape {
        what: "response",
        found: type_name(response),
    })?;

    let homeworks = doc
        .get("homeworks")
        .ok_or(CycleError::MissingKey("homeworks"))?;
    let homeworks = homeworks.as_array().ok_or(CycleError::Shape {
        what: "homeworks",
        found: type_name(homeworks),
    })?;

    let current_date = doc
        .get("current_date")
        .ok_or(CycleError::MissingKey("current_date"))?;
    let current_date = cursor_value(current_date).ok_or(CycleError::Shape {
        what: "current_date",
        found: type_name(current_date),
    })?;

    let pending = match homeworks.first() {
        None => Pending::None,
        Some(Value::Object(first)) => Pending::Submission(first.clone()),
        Some(other) => {
            return Err(CycleError::Shape {
                what: "homework",
                found: type_name(other),
            })
        }
    };

    Ok(StatusReport {
        current_date,
        pending,
    })
}
