use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use shared_logging::LogLevel;
use uuid::Uuid;

use crate::{
    classifier,
    config::SolverConfig,
    normalizer::normalize,
    outcome::{FailureReason, SolveOutcome, SolveResult},
    solvers::{default_solvers, dispatch, failure_result, SolveContext, TopicSolver, SYMBOLS},
    telemetry::SolverTelemetry,
    topic::{Language, TopicHint, TopicTag},
};

/// One problem to solve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemRequest {
    /// Raw problem text, possibly OCR output.
    pub text: String,
    /// Forced topic, or `auto`.
    #[serde(default)]
    pub topic_hint: TopicHint,
    /// Narration language.
    #[serde(default)]
    pub language: Language,
}

impl ProblemRequest {
    /// Auto-classified English request.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            topic_hint: TopicHint::Auto,
            language: Language::En,
        }
    }

    /// Forces a topic.
    #[must_use]
    pub const fn with_hint(mut self, hint: TopicHint) -> Self {
        self.topic_hint = hint;
        self
    }

    /// Selects the narration language.
    #[must_use]
    pub const fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }
}

/// Classifies, dispatches and renders every request into a [`SolveResult`].
pub struct MathSolver {
    config: SolverConfig,
    solvers: Vec<Box<dyn TopicSolver>>,
    telemetry: Option<SolverTelemetry>,
}

impl std::fmt::Debug for MathSolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let topics: Vec<TopicTag> = self.solvers.iter().map(|solver| solver.topic()).collect();
        f.debug_struct("MathSolver")
            .field("config", &self.config)
            .field("topics", &topics)
            .field("telemetry", &self.telemetry)
            .finish()
    }
}

impl Default for MathSolver {
    fn default() -> Self {
        Self::new(SolverConfig::default(), None)
    }
}

impl MathSolver {
    /// Creates a solver with every built-in topic strategy.
    #[must_use]
    pub fn new(config: SolverConfig, telemetry: Option<SolverTelemetry>) -> Self {
        Self::with_solvers(config, default_solvers(), telemetry)
    }

    /// Creates a solver over a custom strategy set.
    ///
    /// Topics without a strategy resolve to the not-yet-supported shape.
    #[must_use]
    pub fn with_solvers(
        config: SolverConfig,
        solvers: Vec<Box<dyn TopicSolver>>,
        telemetry: Option<SolverTelemetry>,
    ) -> Self {
        Self {
            config,
            solvers,
            telemetry,
        }
    }

    /// Topic the classifier assigns to `text`, read before normalization so
    /// that `≤`, `≥` and `≠` never count as `=`.
    #[must_use]
    pub fn classify(&self, text: &str) -> TopicTag {
        classifier::classify(text)
    }

    /// Solves `request`. Never fails: solver failures come back as the fixed
    /// answer and step pair of their topic.
    #[must_use]
    pub fn solve(&self, request: &ProblemRequest) -> SolveResult {
        let request_id = Uuid::new_v4().to_string();
        self.log(
            LogLevel::Info,
            "solver.request.received",
            json!({
                "request_id": request_id,
                "chars": request.text.chars().count(),
                "hint": topic_hint_label(request.topic_hint),
                "language": request.language.code(),
            }),
        );
        let classified = request
            .topic_hint
            .tag()
            .unwrap_or_else(|| self.classify(&request.text));
        let text = normalize(&request.text);
        let topic = dispatch(classified, &text);
        self.log(
            LogLevel::Debug,
            "solver.topic.resolved",
            json!({
                "request_id": request_id,
                "classified": classified.label(),
                "topic": topic.label(),
            }),
        );

        let ctx = SolveContext {
            text: &text,
            symbols: &SYMBOLS,
            config: &self.config,
            language: request.language,
        };
        let outcome = self
            .solvers
            .iter()
            .find(|solver| solver.topic() == topic)
            .map_or_else(
                || SolveOutcome::failed(topic, FailureReason::NotYetSupported),
                |solver| solver.solve(&ctx),
            );

        match outcome {
            SolveOutcome::Solved(result) => {
                self.log(
                    LogLevel::Info,
                    "solver.request.solved",
                    json!({
                        "request_id": request_id,
                        "topic": topic.label(),
                        "steps": result.steps.len(),
                    }),
                );
                result
            }
            SolveOutcome::Failed(failure) => {
                self.log(
                    LogLevel::Warn,
                    "solver.request.failed",
                    json!({
                        "request_id": request_id,
                        "topic": failure.topic.label(),
                        "reason": failure.reason.code(),
                        "detail": failure.reason,
                    }),
                );
                failure_result(&failure, request.language)
            }
        }
    }

    /// Solves from transport strings, resolving unknown hints to `general`.
    #[must_use]
    pub fn solve_text(&self, text: &str, hint: &str, language: &str) -> SolveResult {
        let (topic_hint, recognized) = TopicHint::parse_lenient(hint);
        if !recognized {
            self.log(
                LogLevel::Warn,
                "solver.topic.unknown_hint",
                json!({ "hint": hint, "resolved": "general" }),
            );
        }
        let request = ProblemRequest {
            text: text.to_string(),
            topic_hint,
            language: Language::parse_or_default(language),
        };
        self.solve(&request)
    }

    fn log(&self, level: LogLevel, message: &str, metadata: Value) {
        if let Some(tel) = &self.telemetry {
            let _ = tel.log(level, message, metadata);
        }
    }
}

const fn topic_hint_label(hint: TopicHint) -> &'static str {
    match hint.tag() {
        Some(tag) => tag.label(),
        None => "auto",
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use shared_logging::MemoryLogger;

    use super::*;
    use crate::{service::SolveService, solvers::VectorSolver};

    const fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn solver_and_service_are_send_and_sync() {
        assert_send_sync::<MathSolver>();
        assert_send_sync::<SolveService>();
        assert_send_sync::<SolverTelemetry>();
    }

    fn traced() -> (MathSolver, Arc<MemoryLogger>) {
        let memory = Arc::new(MemoryLogger::new());
        let telemetry = SolverTelemetry::builder("solver")
            .min_level(LogLevel::Debug)
            .sink(memory.clone())
            .build()
            .unwrap();
        (MathSolver::new(SolverConfig::default(), Some(telemetry)), memory)
    }

    #[test]
    fn auto_hint_solves_normalized_text() {
        let solver = MathSolver::default();
        let result = solver.solve(&ProblemRequest::new("∫ x² dx, find the integral of x²"));
        assert_eq!(result.answer, "∫x**2 dx = x**3/3 + C");
        assert_eq!(solver.classify("cross product of two vectors"), TopicTag::Vector);
    }

    #[test]
    fn inequality_glyphs_are_not_equations() {
        let solver = MathSolver::default();
        for text in ["find x with x ≤ 5", "x ≥ 2", "x ≠ 3"] {
            assert_eq!(solver.classify(text), TopicTag::General, "{text}");
            assert_eq!(solver.classify(text), classifier::classify(text), "{text}");
            let result = solver.solve(&ProblemRequest::new(text));
            assert_eq!(result.answer, "This kind of problem is not supported yet");
        }
        assert_eq!(solver.classify("x <= 5 and x = 2"), TopicTag::Equation);
    }

    #[test]
    fn explicit_hint_is_trusted() {
        let solver = MathSolver::default();
        let request = ProblemRequest::new("what is x**2").with_hint(TopicHint::Derivative);
        assert_eq!(solver.solve(&request).answer, "d/dx(x**2) = 2*x");
    }

    #[test]
    fn solving_is_repeatable() {
        let solver = MathSolver::default();
        let request = ProblemRequest::new("dot product of [1,2,3] and [4,5,6]");
        assert_eq!(solver.solve(&request), solver.solve(&request));
    }

    #[test]
    fn failures_are_rendered_not_raised() {
        let solver = MathSolver::default();
        let result = solver.solve(&ProblemRequest::new("what is the limit of 1/x"));
        assert_eq!(result.answer, "This kind of problem is not supported yet");
        assert_eq!(result.steps.len(), 1);

        let result = solver.solve(
            &ProblemRequest::new("derivative of x +* 2").with_language(Language::Bn),
        );
        assert_eq!(result.answer, "ডেরিভেটিভ গণনা করতে ব্যর্থ");
    }

    #[test]
    fn logs_lifecycle_events() {
        let (solver, memory) = traced();
        let _ = solver.solve(&ProblemRequest::new("dot product of [1,2] and [3,4]"));
        let _ = solver.solve(&ProblemRequest::new("hello there"));
        assert_eq!(
            memory.messages(),
            vec![
                "solver.request.received",
                "solver.topic.resolved",
                "solver.request.solved",
                "solver.request.received",
                "solver.topic.resolved",
                "solver.request.failed",
            ]
        );
        let failed = memory.snapshot().pop().unwrap();
        assert_eq!(failed.level, LogLevel::Warn);
        assert_eq!(failed.metadata["reason"], "not_yet_supported");
    }

    #[test]
    fn unknown_hints_fall_through_to_general() {
        let (solver, memory) = traced();
        let result = solver.solve_text("dot product of [1,2] and [3,4]", "geometry", "en");
        assert_eq!(result.answer, "This kind of problem is not supported yet");
        assert_eq!(memory.messages()[0], "solver.topic.unknown_hint");
    }

    #[test]
    fn missing_strategy_is_not_yet_supported() {
        let solver = MathSolver::with_solvers(
            SolverConfig::default(),
            vec![Box::new(VectorSolver)],
            None,
        );
        let result = solver.solve(&ProblemRequest::new("integral of x"));
        assert_eq!(result.answer, "This kind of problem is not supported yet");
    }
}
