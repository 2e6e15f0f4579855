use thiserror::Error;

/// Coarse category of a structuring failure, kept for diagnostics only.
///
/// The shell never branches on this; it shows one fixed message for
/// every failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Network error or non-success HTTP status.
    Transport,
    /// The service answered without any response text.
    EmptyResponse,
    /// The response text is not JSON (after fence stripping).
    MalformedJson,
    /// Valid JSON that lacks a required plan group or has wrong types.
    IncompleteShape,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Transport => "transport",
            Self::EmptyResponse => "empty_response",
            Self::MalformedJson => "malformed_json",
            Self::IncompleteShape => "incomplete_shape",
        };
        write!(f, "{s}")
    }
}

/// The single error a [`super::PlanStructurer`] reports to its caller.
///
/// The message is fixed; the underlying cause is logged where the failure
/// is caught and is not carried here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("failed to get a valid structured plan from the model")]
pub struct StructuringError {
    kind: FailureKind,
}

impl StructuringError {
    pub fn new(kind: FailureKind) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> FailureKind {
        self.kind
    }
}
