use thiserror::Error;

/// Reason a flag or one of its rules was rejected.
///
/// The messages are for humans; match on the variant, not the text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("key cannot be empty")]
    EmptyKey,

    #[error("percentage must be 0-100, got {0}")]
    PercentageOutOfRange(i32),

    #[error("must have at least one user ID")]
    EmptyUserIds,

    #[error("rule evaluator cannot be absent")]
    MissingEvaluator,
}
