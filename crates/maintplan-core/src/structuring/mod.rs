//! Turning raw maintenance notes into an [`OrganizedPlan`] via a model.
//!
//! The [`PlanStructurer`] trait is the seam between the presentation layer
//! and whatever does the interpretation. Every implementation goes through
//! the same response path:
//!
//! ```text
//! raw text --build_prompt--> prompt --(model)--> response text
//!                                                    |
//!                                          strip_json_fence
//!                                                    |
//!                                           serde_json -> OrganizedPlan
//! ```
//!
//! Any failure along the way collapses into a single [`StructuringError`].
//!
//! [`OrganizedPlan`]: crate::plan::OrganizedPlan

pub mod error;
pub mod gemini;
pub mod prompt;
pub mod response;
pub mod trait_def;

pub use error::{FailureKind, StructuringError};
pub use gemini::GeminiStructurer;
pub use prompt::build_prompt;
pub use response::{ResponseError, parse_plan_response, plan_from_response, strip_json_fence};
pub use trait_def::PlanStructurer;
