use thiserror::Error;

/// Errors raised while building, decoding or evaluating an expression tree.
///
/// Every variant is fatal to the current enumeration; nothing is retried.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CombError {
    #[error("Expect a list, but got: {0}")]
    NotAList(String),

    #[error("{name} not in {known}")]
    UndefinedVariable { name: String, known: String },

    #[error("{key} not in [{available}]")]
    UnknownChoice { key: String, available: String },

    #[error("Expected list or dict for choices, but got {0}")]
    MalformedChoices(String),

    /// The evaluator broke one of its own invariants. Never caused by caller input.
    #[error("Internal error: {0}")]
    InternalShape(String),

    #[error("Malformed expression: {0}")]
    Malformed(String),

    #[error("Cannot split {line:?}: {reason}")]
    Split { line: String, reason: String },
}

pub type Result<T, E = CombError> = std::result::Result<T, E>;
