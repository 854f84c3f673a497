use thiserror::Error;

/// Errors raised inside the symbolic engine and the topic solvers.
///
/// These never cross the orchestrator boundary; each one is folded into a
/// [`crate::outcome::FailureReason`] and rendered as a failure-shaped result.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SolverError {
    /// The expression text could not be parsed.
    #[error("parse error at offset {offset}: {message}")]
    Parse {
        /// Byte offset into the expression where parsing stopped.
        offset: usize,
        /// What the parser expected or found.
        message: String,
    },
    /// The expression exceeds the configured length or nesting limits.
    #[error("expression too complex: {0}")]
    TooComplex(String),
    /// Numeric evaluation hit an unbound symbol or a non-finite value.
    #[error("evaluation failed: {0}")]
    Evaluation(String),
    /// The integrand is outside the integration rule table.
    #[error("no antiderivative rule for {0}")]
    UnsupportedIntegrand(String),
    /// Vector operands have incompatible lengths.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Required length.
        expected: usize,
        /// Offending length.
        found: usize,
    },
}

impl SolverError {
    pub(crate) fn parse(offset: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            offset,
            message: message.into(),
        }
    }
}
