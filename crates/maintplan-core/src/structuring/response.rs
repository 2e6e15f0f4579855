//! Response normalization and parsing.
//!
//! The model is told to return bare JSON, but it sometimes wraps the
//! object in a ```` ```json ```` fence anyway. [`strip_json_fence`] removes
//! that wrapper before parsing.

use serde_json::error::Category;
use thiserror::Error;
use tracing::error;

use super::error::{FailureKind, StructuringError};
use crate::plan::OrganizedPlan;

/// Detailed reason a response could not be turned into a plan.
#[derive(Debug, Error)]
pub enum ResponseError {
    #[error("received empty response from the model")]
    Empty,

    #[error("response is not valid JSON: {0}")]
    MalformedJson(#[source] serde_json::Error),

    #[error("response JSON does not match the plan shape: {0}")]
    IncompleteShape(#[source] serde_json::Error),
}

impl ResponseError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Empty => FailureKind::EmptyResponse,
            Self::MalformedJson(_) => FailureKind::MalformedJson,
            Self::IncompleteShape(_) => FailureKind::IncompleteShape,
        }
    }
}

/// Remove a leading ```` ```json ```` (plus one newline) and a trailing
/// ```` ``` ```` (plus one preceding newline).
///
/// A body without a fence is returned unchanged, so applying this twice is
/// the same as applying it once.
pub fn strip_json_fence(body: &str) -> &str {
    let body = match body.strip_prefix("```json") {
        Some(rest) => rest.strip_prefix('\n').unwrap_or(rest),
        None => body,
    };
    match body.strip_suffix("```") {
        Some(rest) => rest.strip_suffix('\n').unwrap_or(rest),
        None => body,
    }
}

/// Parse raw response text into a plan.
///
/// `None` and whitespace-only text are both treated as an empty response.
pub fn parse_plan_response(body: Option<&str>) -> Result<OrganizedPlan, ResponseError> {
    let body = match body {
        Some(b) if !b.trim().is_empty() => b,
        _ => return Err(ResponseError::Empty),
    };

    let cleaned = strip_json_fence(body.trim());
    serde_json::from_str(cleaned).map_err(|e| match e.classify() {
        Category::Data => ResponseError::IncompleteShape(e),
        Category::Syntax | Category::Eof | Category::Io => ResponseError::MalformedJson(e),
    })
}

/// Parse raw response text, logging and collapsing any failure into a
/// [`StructuringError`].
pub fn plan_from_response(body: Option<&str>) -> Result<OrganizedPlan, StructuringError> {
    parse_plan_response(body).map_err(|e| {
        error!(kind = %e.kind(), error = %e, "failed to parse model response");
        StructuringError::new(e.kind())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAN_JSON: &str = r#"{
  "eventDetails": {"date": "17/01", "time": "8h", "services": "Ceiling replacement"},
  "planning": [{"task": "Scaffold", "status": "Completed", "responsible": "Eduardo"}],
  "safety": {"dc85": {"preparationBy": "Jonatas", "deadline": "12/01", "safetyResponsible": "Jonatas"}},
  "volunteers": ["Ricardo", "Jonatas"],
  "documents": ["DC-82"],
  "ppe": ["Helmet"]
}"#;

    #[test]
    fn strip_removes_fence_with_newlines() {
        let fenced = format!("```json\n{PLAN_JSON}\n```");
        assert_eq!(strip_json_fence(&fenced), PLAN_JSON);
    }

    #[test]
    fn strip_removes_fence_without_newlines() {
        let fenced = format!("```json{PLAN_JSON}```");
        assert_eq!(strip_json_fence(&fenced), PLAN_JSON);
    }

    #[test]
    fn strip_is_noop_on_bare_json() {
        assert_eq!(strip_json_fence(PLAN_JSON), PLAN_JSON);
    }

    #[test]
    fn strip_is_idempotent() {
        let fenced = format!("```json\n{PLAN_JSON}\n```");
        let once = strip_json_fence(&fenced);
        assert_eq!(strip_json_fence(once), once);
    }

    #[test]
    fn fenced_and_bare_parse_identically() {
        let fenced = format!("```json\n{PLAN_JSON}\n```");
        let a = parse_plan_response(Some(PLAN_JSON)).unwrap();
        let b = parse_plan_response(Some(&fenced)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn surrounding_whitespace_is_tolerated() {
        let fenced = format!("\n  ```json\n{PLAN_JSON}\n```\n");
        let plan = parse_plan_response(Some(&fenced)).unwrap();
        assert_eq!(plan.event_details.date, "17/01");
    }

    #[test]
    fn missing_body_is_empty() {
        let err = parse_plan_response(None).unwrap_err();
        assert_eq!(err.kind(), FailureKind::EmptyResponse);
    }

    #[test]
    fn blank_body_is_empty() {
        let err = parse_plan_response(Some("  \n ")).unwrap_err();
        assert_eq!(err.kind(), FailureKind::EmptyResponse);
    }

    #[test]
    fn prose_is_malformed() {
        let err = parse_plan_response(Some("Sorry, I cannot help with that.")).unwrap_err();
        assert_eq!(err.kind(), FailureKind::MalformedJson);
    }

    #[test]
    fn truncated_json_is_malformed() {
        let err = parse_plan_response(Some(&PLAN_JSON[..40])).unwrap_err();
        assert_eq!(err.kind(), FailureKind::MalformedJson);
    }

    #[test]
    fn missing_group_is_incomplete_shape() {
        let err = parse_plan_response(Some(r#"{"eventDetails": {"date": "a", "time": "b", "services": "c"}}"#))
            .unwrap_err();
        assert_eq!(err.kind(), FailureKind::IncompleteShape);
    }

    #[test]
    fn plan_from_response_collapses_errors() {
        let err = plan_from_response(Some("not json")).unwrap_err();
        assert_eq!(err.kind(), FailureKind::MalformedJson);
        assert_eq!(
            err.to_string(),
            "failed to get a valid structured plan from the model"
        );
    }
}
