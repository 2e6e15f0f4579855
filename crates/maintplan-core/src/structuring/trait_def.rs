//! The `PlanStructurer` trait -- text in, plan out.

use async_trait::async_trait;

use super::error::StructuringError;
use crate::plan::OrganizedPlan;

/// Converts free-text maintenance notes into an [`OrganizedPlan`].
///
/// Implementations make at most one request per call and never retry. The
/// trait is object-safe so the shell can hold an `Arc<dyn PlanStructurer>`
/// and move it into a spawned task.
#[async_trait]
pub trait PlanStructurer: Send + Sync {
    /// Human-readable name for logs (e.g. "gemini").
    fn name(&self) -> &str;

    /// Structure `text` into a plan.
    ///
    /// Callers must not pass empty or whitespace-only text; input
    /// validation happens before this point.
    async fn structure(&self, text: &str) -> Result<OrganizedPlan, StructuringError>;
}

const _: () = {
    fn _assert_object_safe(_: &dyn PlanStructurer) {}
};
