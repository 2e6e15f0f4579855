//! Mapping from free-form task status labels to display indicators.

/// Visual indicator for a planning item's status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusIndicator {
    Done,
    Pending,
    NotStarted,
}

impl StatusIndicator {
    /// Match a status label against the known English and Portuguese
    /// synonyms, ignoring case. Unknown labels have no indicator.
    pub fn from_status(status: &str) -> Option<Self> {
        match status.trim().to_lowercase().as_str() {
            "completed" | "concluído" | "ok" => Some(Self::Done),
            "pending" | "pendente" => Some(Self::Pending),
            "not started" | "não iniciado" => Some(Self::NotStarted),
            _ => None,
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            Self::Done => "✔",
            Self::Pending => "●",
            Self::NotStarted => "○",
        }
    }
}

impl std::fmt::Display for StatusIndicator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Done => "done",
            Self::Pending => "pending",
            Self::NotStarted => "not started",
        };
        write!(f, "{s}")
    }
}
