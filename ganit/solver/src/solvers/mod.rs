//! Per-topic solving strategies and the rules that pick one.

use crate::{
    classifier::first_match,
    config::SolverConfig,
    error::SolverError,
    expr::{format_number, parse_expression, simplify, Expr},
    extract::{extract_function, Vector},
    outcome::{FailureReason, SolveFailure, SolveOutcome, SolveResult},
    phrasebook::Phrasebook,
    topic::{Language, TopicTag},
};

/// Derivative strategy.
pub mod derivative;
/// Integral strategy.
pub mod integral;
/// Matrix strategy.
pub mod matrix;
/// Terminal strategy for topics without a solver.
pub mod unsupported;
/// Dot and cross products.
pub mod vector;

pub use derivative::DerivativeSolver;
pub use integral::IntegralSolver;
pub use matrix::MatrixSolver;
pub use unsupported::UnsupportedSolver;
pub use vector::VectorSolver;

/// Free variables every solver may reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolTable {
    names: [&'static str; 4],
}

impl SymbolTable {
    /// The variable calculus solvers differentiate and integrate against.
    #[must_use]
    pub const fn primary(&self) -> &'static str {
        self.names[0]
    }
}

/// `x, y, z, t` with `x` primary.
pub const SYMBOLS: SymbolTable = SymbolTable {
    names: ["x", "y", "z", "t"],
};

/// Everything a solver sees for one request.
#[derive(Debug, Clone, Copy)]
pub struct SolveContext<'a> {
    /// Normalized problem text.
    pub text: &'a str,
    /// Declared variables.
    pub symbols: &'a SymbolTable,
    /// Active configuration.
    pub config: &'a SolverConfig,
    /// Narration language.
    pub language: Language,
}

impl SolveContext<'_> {
    /// Narration strings for the request language.
    #[must_use]
    pub fn phrases(&self) -> &'static Phrasebook {
        Phrasebook::for_language(self.language)
    }

    /// Function named in the text, or the configured default.
    #[must_use]
    pub fn function_text(&self) -> String {
        let extracted = extract_function(self.text);
        if extracted.is_empty() {
            self.config.default_function.clone()
        } else {
            extracted
        }
    }

    /// Parses [`Self::function_text`] within the configured limits.
    pub fn parse_function(&self) -> Result<Expr, SolverError> {
        let parsed = parse_expression(&self.function_text(), self.config.parse_limits())?;
        Ok(simplify(&parsed))
    }

    /// Lowercased text for keyword checks.
    #[must_use]
    pub fn lowered(&self) -> String {
        self.text.to_lowercase()
    }
}

/// One topic strategy.
pub trait TopicSolver: Send + Sync {
    /// Topic this solver handles.
    fn topic(&self) -> TopicTag;

    /// Solves the request; never panics on bad input.
    fn solve(&self, ctx: &SolveContext<'_>) -> SolveOutcome;
}

/// Routes a resolved tag, or a telltale verb in the text, to a solver topic.
#[derive(Debug, Clone, Copy)]
pub struct DispatchRule {
    /// Tag that selects this rule.
    pub tag: TopicTag,
    /// Lowercase verb that also selects it regardless of the tag.
    pub verb: Option<&'static str>,
}

impl DispatchRule {
    /// True when the rule fires for `tag` and `lowered` text.
    #[must_use]
    pub fn fires(&self, tag: TopicTag, lowered: &str) -> bool {
        self.tag == tag || self.verb.is_some_and(|verb| lowered.contains(verb))
    }
}

/// Dispatch rules in precedence order.
pub const DISPATCH: &[DispatchRule] = &[
    DispatchRule {
        tag: TopicTag::Vector,
        verb: None,
    },
    DispatchRule {
        tag: TopicTag::Matrix,
        verb: None,
    },
    DispatchRule {
        tag: TopicTag::Derivative,
        verb: Some("differentiate"),
    },
    DispatchRule {
        tag: TopicTag::Integral,
        verb: Some("integrate"),
    },
    DispatchRule {
        tag: TopicTag::Limit,
        verb: None,
    },
    DispatchRule {
        tag: TopicTag::Equation,
        verb: Some("solve"),
    },
];

/// Topic whose solver handles `tag` for this `text`.
#[must_use]
pub fn dispatch(tag: TopicTag, text: &str) -> TopicTag {
    let lowered = text.to_lowercase();
    first_match(DISPATCH, |rule| rule.fires(tag, &lowered)).map_or(TopicTag::General, |rule| rule.tag)
}

/// Solver set covering every topic.
pub fn default_solvers() -> Vec<Box<dyn TopicSolver>> {
    vec![
        Box::new(VectorSolver),
        Box::new(MatrixSolver),
        Box::new(DerivativeSolver),
        Box::new(IntegralSolver),
        Box::new(UnsupportedSolver::new(TopicTag::Limit)),
        Box::new(UnsupportedSolver::new(TopicTag::Equation)),
        Box::new(UnsupportedSolver::new(TopicTag::General)),
    ]
}

/// Renders a failure as the fixed answer and step pair of its topic.
#[must_use]
pub fn failure_result(failure: &SolveFailure, language: Language) -> SolveResult {
    let phrases = Phrasebook::for_language(language);
    let (answer, step) = match (failure.topic, &failure.reason) {
        (TopicTag::Matrix, FailureReason::MissingMatrixOperation) => {
            return SolveResult::new(phrases.matrix_help_answer, Vec::new());
        }
        (_, FailureReason::NotYetSupported) => (phrases.unsupported_answer, phrases.unsupported_step),
        (TopicTag::Vector, _) => (phrases.vector_failed_answer, phrases.vector_failed_step),
        (TopicTag::Derivative, _) => (
            phrases.derivative_failed_answer,
            phrases.derivative_failed_step,
        ),
        (TopicTag::Integral, _) => (phrases.integral_failed_answer, phrases.integral_failed_step),
        (TopicTag::Matrix, _) => (phrases.matrix_help_answer, phrases.unsupported_step),
        _ => (phrases.unsupported_answer, phrases.unsupported_step),
    };
    SolveResult::new(answer, vec![step.to_string()])
}

/// Prints a vector as `[1, 2, 3]`.
#[must_use]
pub fn format_vector(vector: &[f64]) -> String {
    let parts: Vec<String> = vector.iter().copied().map(format_number).collect();
    format!("[{}]", parts.join(", "))
}

/// Prints a matrix row by row as `[[1, 2], [3, 4]]`.
#[must_use]
pub fn format_rows(rows: &[Vector]) -> String {
    let parts: Vec<String> = rows.iter().map(|row| format_vector(row)).collect();
    format!("[{}]", parts.join(", "))
}
