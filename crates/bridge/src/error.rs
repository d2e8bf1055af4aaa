//! Bridge error types.

/// Error returned when a command cannot be submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    /// The command text was empty or whitespace-only.
    Empty,
    /// The dispatcher has stopped and no longer accepts tasks.
    Closed,
}

impl std::fmt::Display for SubmitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "command text is empty"),
            Self::Closed => write!(f, "dispatcher is no longer accepting commands"),
        }
    }
}

impl std::error::Error for SubmitError {}
