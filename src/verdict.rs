use serde_json::Value;
use tracing::debug;

use crate::error::CycleError;
use crate::response::{type_name, Pending};

pub const NO_CHANGE: &str = "Status did not change";

/// Review status codes the API reports for a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeworkStatus {
    Reviewing,
    Approved,
    Rejected,
}

impl HomeworkStatus {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "reviewing" => Some(HomeworkStatus::Reviewing),
            "approved" => Some(HomeworkStatus::Approved),
            "rejected" => Some(HomeworkStatus::Rejected),
            _ => None,
        }
    }

    pub fn verdict(&self) -> &'static str {
        match self {
            HomeworkStatus::Reviewing => "Taken up for review by the reviewer.",
            HomeworkStatus::Approved => "Reviewed: the reviewer liked everything. Success!",
            HomeworkStatus::Rejected => "Reviewed: the reviewer has comments.",
        }
    }
}

fn string_field<'a>(value: &'a Value, key: &'static str) -> Result<&'a str, CycleError> {
    value.as_str().ok_or(CycleError::Shape {
        what: key,
        found: type_name(value),
    })
}

/// Turn the latest submission (or its absence) into the user-facing message.
pub fn parse_status(pending: &Pending) -> Result<String, CycleError> {
    let message = match pending {
        Pending::None => NO_CHANGE.to_string(),
        Pending::Submission(homework) => {
            let name = homework
                .get("homework_name")
                .ok_or(CycleError::MissingKey("homework_name"))?;
            let status = homework
                .get("status")
                .ok_or(CycleError::MissingKey("status"))?;
            let name = string_field(name, "homework_name")?;
            let code = string_field(status, "status")?;
            if code.is_empty() {
                return Err(CycleError::EmptyStatus);
            }
            let status = HomeworkStatus::from_code(code)
                .ok_or_else(|| CycleError::UnknownStatus(code.to_string()))?;
            format!(
                "Status changed for submission \"{}\". {}",
                name,
                status.verdict()
            )
        }
    };
    debug!(%message, "status message computed");
    Ok(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn submission(value: Value) -> Pending {
        match value {
            Value::Object(map) => Pending::Submission(map),
            _ => unreachable!(),
        }
    }

    #[test]
    fn no_submission_means_no_change() {
        assert_eq!(parse_status(&Pending::None).unwrap(), "Status did not change");
    }

    #[test]
    fn every_known_status_has_a_verdict() {
        let cases = [
            ("reviewing", "Taken up for review by the reviewer."),
            ("approved", "Reviewed: the reviewer liked everything. Success!"),
            ("rejected", "Reviewed: the reviewer has comments."),
        ];
        for (code, verdict) in cases {
            let msg =
                parse_status(&submission(json!({"homework_name": "hw1", "status": code}))).unwrap();
            assert_eq!(msg, format!("Status changed for submission \"hw1\". {verdict}"));
        }
    }

    #[test]
    fn missing_name_or_status() {
        let err = parse_status(&submission(json!({"status": "approved"}))).unwrap_err();
        assert!(matches!(err, CycleError::MissingKey("homework_name")));

        let err = parse_status(&submission(json!({"homework_name": "hw1"}))).unwrap_err();
        assert!(matches!(err, CycleError::MissingKey("status")));
    }

    #[test]
    fn empty_status() {
        let err =
            parse_status(&submission(json!({"homework_name": "hw1", "status": ""}))).unwrap_err();
        assert!(matches!(err, CycleError::EmptyStatus));
    }

    #[test]
    fn unknown_status() {
        let err = parse_status(&submission(json!({"homework_name": "hw1", "status": "bogus"})))
            .unwrap_err();
        match err {
            CycleError::UnknownStatus(code) => assert_eq!(code, "bogus"),
            other => panic!("wrong error: {other:?}"),
        }
    }

    #[test]
    fn non_string_fields_are_shape_errors() {
        let err = parse_status(&submission(json!({"homework_name": 7, "status": "approved"})))
            .unwrap_err();
        assert!(matches!(err, CycleError::Shape { what: "homework_name", found: "number" }));
    }
}
