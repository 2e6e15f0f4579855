//! Shared test utilities for maintplan tests.
//!
//! Provides [`StubStructurer`], a deterministic [`PlanStructurer`] that
//! replays canned model responses through the real response-parsing path,
//! plus JSON fixtures. Tests never talk to a live model service.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::error;

use maintplan_core::plan::OrganizedPlan;
use maintplan_core::structuring::{
    FailureKind, PlanStructurer, StructuringError, build_prompt, plan_from_response,
};

/// A well-formed response body for the sample notes.
pub const SAMPLE_PLAN_JSON: &str = r#"{
  "eventDetails": {
    "date": "17/01",
    "time": "8h",
    "services": "Replacement of ceiling linings in the main hall and room B, removal of wall plugs, patching holes and cleaning air conditioner filters."
  },
  "planning": [
    {"task": "Ladder", "status": "Pending", "responsible": null},
    {"task": "Scaffold", "status": "Completed", "responsible": null},
    {"task": "Scaffold rental", "status": "Completed", "responsible": "Eduardo"}
  ],
  "safety": {
    "dc85": {
      "preparationBy": "Jonatas",
      "deadline": "12/01",
      "safetyResponsible": "Jonatas"
    }
  },
  "volunteers": ["Ricardo", "Jonatas", "Jessica", "Danilson", "Larissa"],
  "documents": ["DC-82 (have your personal copy and follow its guidelines)"],
  "ppe": [
    "Safety footwear with certificate of approval (CA), appropriate to the activity",
    "Helmet",
    "Safety glasses",
    "T-shirt (no slogans or advertising)",
    "Long pants (jeans)",
    "Reflective vest or high-visibility shirt",
    "Ear protection",
    "Knitted or leather gloves"
  ]
}"#;

/// Parse [`SAMPLE_PLAN_JSON`].
pub fn sample_plan() -> OrganizedPlan {
    plan_from_response(Some(SAMPLE_PLAN_JSON)).expect("sample plan fixture must parse")
}

/// Wrap a body in a ```` ```json ```` fence the way models sometimes do.
pub fn fenced(body: &str) -> String {
    format!("```json\n{body}\n```")
}

/// What the stub answers with.
#[derive(Debug, Clone)]
pub enum StubResponse {
    /// Response text, parsed exactly like a real model response.
    Body(String),
    /// No response text at all.
    Empty,
    /// The request never got an answer.
    TransportFailure,
}

/// One recorded call to [`StubStructurer::structure`].
#[derive(Debug, Clone)]
pub struct StubCall {
    pub text: String,
    /// The prompt a real client would have sent for `text`.
    pub prompt: String,
}

/// Deterministic structurer that replays canned responses.
///
/// Responses are consumed in order; the last one repeats once the queue
/// is down to a single entry.
pub struct StubStructurer {
    responses: Mutex<VecDeque<StubResponse>>,
    calls: Mutex<Vec<StubCall>>,
}

impl StubStructurer {
    pub fn new(response: StubResponse) -> Self {
        Self::with_sequence(vec![response])
    }

    pub fn with_body(body: impl Into<String>) -> Self {
        Self::new(StubResponse::Body(body.into()))
    }

    pub fn with_sequence(responses: Vec<StubResponse>) -> Self {
        assert!(!responses.is_empty(), "stub needs at least one response");
        Self {
            responses: Mutex::new(responses.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Calls made so far, oldest first.
    pub fn calls(&self) -> Vec<StubCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn next_response(&self) -> StubResponse {
        let mut queue = self.responses.lock().unwrap();
        if queue.len() > 1 {
            queue.pop_front().unwrap()
        } else {
            queue.front().cloned().unwrap()
        }
    }
}

#[async_trait]
impl PlanStructurer for StubStructurer {
    fn name(&self) -> &str {
        "stub"
    }

    async fn structure(&self, text: &str) -> Result<OrganizedPlan, StructuringError> {
        self.calls.lock().unwrap().push(StubCall {
            text: text.to_string(),
            prompt: build_prompt(text),
        });

        match self.next_response() {
            StubResponse::Body(body) => plan_from_response(Some(&body)),
            StubResponse::Empty => plan_from_response(None),
            StubResponse::TransportFailure => {
                error!("stub transport failure");
                Err(StructuringError::new(FailureKind::Transport))
            }
        }
    }
}
