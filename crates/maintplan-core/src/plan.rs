//! The structured maintenance plan returned by the model.
//!
//! JSON keys are camelCase to match the shape requested in the prompt
//! (see [`crate::structuring::prompt`]). The six top-level groups are
//! required; a response missing any of them fails deserialization.

use serde::{Deserialize, Deserializer, Serialize};

/// A maintenance event organized into the six plan sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizedPlan {
    pub event_details: EventDetails,
    pub planning: Vec<PlanningItem>,
    pub safety: Safety,
    pub volunteers: Vec<String>,
    pub documents: Vec<String>,
    pub ppe: Vec<String>,
}

/// When the event happens and what work it covers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDetails {
    #[serde(deserialize_with = "null_as_empty")]
    pub date: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub time: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub services: String,
}

/// One logistics task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanningItem {
    #[serde(deserialize_with = "null_as_empty")]
    pub task: String,
    /// Free-form label such as "Completed" or "Pending".
    #[serde(deserialize_with = "null_as_empty")]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsible: Option<String>,
}

impl PlanningItem {
    /// The responsible person, ignoring blank values.
    pub fn responsible(&self) -> Option<&str> {
        self.responsible
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Safety {
    pub dc85: Dc85,
}

/// DC-85 safety documentation fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dc85 {
    #[serde(deserialize_with = "null_as_empty")]
    pub preparation_by: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub deadline: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub safety_responsible: String,
}

/// Models occasionally emit `null` for a text field they could not fill.
/// The key must still be present; only the value may be null.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
