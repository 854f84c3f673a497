#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rust_2018_idioms,
    missing_docs
)]

//! Math problem solving: normalize free text, classify it into a topic,
//! dispatch to a symbolic strategy and narrate the answer step by step.

/// Topic-keyword classification.
pub mod classifier;
/// TOML-backed solver settings.
pub mod config;
/// Typed engine errors.
pub mod error;
/// Symbolic expression engine.
pub mod expr;
/// Vector and function extraction from text.
pub mod extract;
/// Glyph normalization.
pub mod normalizer;
/// Results, visualizations and failure reasons.
pub mod outcome;
/// Narration strings per language.
pub mod phrasebook;
/// Request orchestration.
pub mod runtime;
/// Response envelopes and provider seams.
pub mod service;
/// Topic strategies and dispatch.
pub mod solvers;
/// Structured logging hook.
pub mod telemetry;
/// Topic tags, hints and languages.
pub mod topic;

pub use classifier::classify;
pub use config::SolverConfig;
pub use error::SolverError;
pub use extract::{extract_function, extract_vectors, Provenance, Vector, VectorExtraction};
pub use normalizer::normalize;
pub use outcome::{FailureReason, SolveFailure, SolveOutcome, SolveResult, Visualization};
pub use runtime::{MathSolver, ProblemRequest};
pub use service::{
    DetectionResponse, MathProblem, PassthroughExplainer, SolutionResponse, SolveService,
    StepExplainer, TextExtractor, TopicCatalog,
};
pub use solvers::{SolveContext, SymbolTable, TopicSolver, SYMBOLS};
pub use telemetry::{SolverTelemetry, SolverTelemetryBuilder};
pub use topic::{Language, TopicHint, TopicTag, UnknownTopic};
