use serde::{Deserialize, Serialize};

use crate::{error::SolverError, extract::Vector, topic::TopicTag};

/// Topic-specific plotting payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Visualization {
    /// Two vectors and their dot product.
    VectorDot {
        /// Operands.
        vectors: Vec<Vector>,
        /// Scalar product.
        result: f64,
        /// True when the text held no vectors and example operands were used.
        #[serde(default)]
        fallback: bool,
    },
    /// Two vectors and their cross product.
    VectorCross {
        /// Operands.
        vectors: Vec<Vector>,
        /// Resulting vector.
        result: Vector,
        /// True when the text held no vectors and example operands were used.
        #[serde(default)]
        fallback: bool,
    },
    /// Sampled function and derivative curves.
    FunctionPlot {
        /// Printed function.
        function: String,
        /// Printed derivative.
        derivative: String,
        /// Sample abscissas.
        x_values: Vec<f64>,
        /// Function values.
        y_values: Vec<f64>,
        /// Derivative values.
        dy_values: Vec<f64>,
    },
}

/// Uniform answer shape returned for every request, solved or not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveResult {
    /// Human-readable answer line.
    pub answer: String,
    /// Ordered narration steps; may be empty.
    pub steps: Vec<String>,
    /// Optional plotting payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visualization: Option<Visualization>,
}

impl SolveResult {
    /// Result without a visualization.
    #[must_use]
    pub fn new(answer: impl Into<String>, steps: Vec<String>) -> Self {
        Self {
            answer: answer.into(),
            steps,
            visualization: None,
        }
    }

    /// Attaches a visualization.
    #[must_use]
    pub fn with_visualization(mut self, visualization: Visualization) -> Self {
        self.visualization = Some(visualization);
        self
    }
}

/// Why a topic solver gave up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "code", content = "detail", rename_all = "snake_case")]
pub enum FailureReason {
    /// Fewer than two vectors were available.
    NotEnoughVectors,
    /// Neither `dot` nor `cross` was requested.
    UnknownVectorOperation,
    /// Vector lengths do not fit the operation.
    DimensionMismatch {
        /// Required length.
        expected: usize,
        /// Offending length.
        found: usize,
    },
    /// The function text did not parse.
    Parse(String),
    /// Numeric sampling failed.
    Evaluation(String),
    /// No antiderivative rule applies.
    UnsupportedIntegrand(String),
    /// The expression exceeded configured limits.
    TooComplex(String),
    /// The matrix request names no supported operation.
    MissingMatrixOperation,
    /// The topic has no solving strategy yet.
    NotYetSupported,
}

impl FailureReason {
    /// Short stable code for logs.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NotEnoughVectors => "not_enough_vectors",
            Self::UnknownVectorOperation => "unknown_vector_operation",
            Self::DimensionMismatch { .. } => "dimension_mismatch",
            Self::Parse(_) => "parse",
            Self::Evaluation(_) => "evaluation",
            Self::UnsupportedIntegrand(_) => "unsupported_integrand",
            Self::TooComplex(_) => "too_complex",
            Self::MissingMatrixOperation => "missing_matrix_operation",
            Self::NotYetSupported => "not_yet_supported",
        }
    }
}

impl From<SolverError> for FailureReason {
    fn from(err: SolverError) -> Self {
        match err {
            SolverError::Parse { .. } => Self::Parse(err.to_string()),
            SolverError::TooComplex(detail) => Self::TooComplex(detail),
            SolverError::Evaluation(detail) => Self::Evaluation(detail),
            SolverError::UnsupportedIntegrand(detail) => Self::UnsupportedIntegrand(detail),
            SolverError::DimensionMismatch { expected, found } => {
                Self::DimensionMismatch { expected, found }
            }
        }
    }
}

/// A solver's failure, tagged with the topic that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveFailure {
    /// Topic whose solver failed.
    pub topic: TopicTag,
    /// Reason code.
    pub reason: FailureReason,
}

/// What every topic solver returns.
#[derive(Debug, Clone, PartialEq)]
pub enum SolveOutcome {
    /// A complete answer.
    Solved(SolveResult),
    /// A contained failure, rendered later into a [`SolveResult`].
    Failed(SolveFailure),
}

impl SolveOutcome {
    /// Failure shorthand.
    #[must_use]
    pub const fn failed(topic: TopicTag, reason: FailureReason) -> Self {
        Self::Failed(SolveFailure { topic, reason })
    }
}
