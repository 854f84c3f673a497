//! Transport-neutral request/response layer around [`MathSolver`].
//!
//! Text recognition and step enrichment are external collaborators reached
//! through [`TextExtractor`] and [`StepExplainer`].

use anyhow::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use shared_logging::LogLevel;

use crate::{
    normalizer::normalize,
    outcome::Visualization,
    runtime::MathSolver,
    telemetry::SolverTelemetry,
    topic::{Language, TopicTag},
};

/// Turns an uploaded image into raw problem text.
pub trait TextExtractor: Send + Sync {
    /// Recognized text of `image`.
    fn extract_text(&self, image: &[u8]) -> Result<String>;
}

/// Rewrites solver steps into a fuller explanation.
pub trait StepExplainer: Send + Sync {
    /// Refined steps for a solved problem.
    fn refine(
        &self,
        problem: &str,
        answer: &str,
        steps: &[String],
        language: Language,
    ) -> Result<Vec<String>>;
}

/// Explainer that returns the steps unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughExplainer;

impl StepExplainer for PassthroughExplainer {
    fn refine(
        &self,
        _problem: &str,
        _answer: &str,
        steps: &[String],
        _language: Language,
    ) -> Result<Vec<String>> {
        Ok(steps.to_vec())
    }
}

/// Incoming solve request as sent by clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MathProblem {
    /// Problem statement.
    pub problem_text: String,
    /// Topic label or `auto`.
    #[serde(default = "default_problem_type")]
    pub problem_type: String,
    /// `en` or `bn`.
    #[serde(default = "default_language")]
    pub language: String,
}

impl MathProblem {
    /// Auto-classified English problem.
    #[must_use]
    pub fn new(problem_text: impl Into<String>) -> Self {
        Self {
            problem_text: problem_text.into(),
            problem_type: default_problem_type(),
            language: default_language(),
        }
    }
}

fn default_problem_type() -> String {
    "auto".into()
}

fn default_language() -> String {
    "en".into()
}

/// Reply to a solve request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolutionResponse {
    /// False only when the request itself was unusable.
    pub success: bool,
    /// Answer line; empty on failure.
    pub answer: String,
    /// Narration steps.
    pub steps: Vec<String>,
    /// Plotting payload, when the solver produced one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visualization: Option<Visualization>,
    /// Why the request was rejected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SolutionResponse {
    fn rejected(error: impl Into<String>) -> Self {
        Self {
            success: false,
            answer: String::new(),
            steps: Vec::new(),
            visualization: None,
            error: Some(error.into()),
        }
    }
}

/// Reply to an image or text detection request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionResponse {
    /// Always true; recognition failures surface in `extracted_text`.
    pub success: bool,
    /// Cleaned recognized text.
    pub extracted_text: String,
    /// Classifier verdict for the text.
    pub problem_type: TopicTag,
}

/// Ordered area to subtopics map.
pub type TopicCatalog = IndexMap<String, Vec<String>>;

const CATALOG: &[(&str, &[&str])] = &[
    (
        "vector_algebra",
        &[
            "dot_product",
            "cross_product",
            "magnitude",
            "angle_between_vectors",
            "unit_vector",
        ],
    ),
    (
        "linear_algebra",
        &[
            "matrix_addition",
            "matrix_multiplication",
            "determinant",
            "inverse",
            "eigenvalues",
        ],
    ),
    (
        "calculus",
        &[
            "derivative",
            "integral",
            "limit",
            "taylor_series",
            "partial_derivative",
        ],
    ),
    (
        "differential_equations",
        &["first_order", "second_order", "separable", "homogeneous"],
    ),
];

/// Facade combining the solver with optional recognition and explanation.
pub struct SolveService {
    solver: MathSolver,
    explainer: Box<dyn StepExplainer>,
    extractor: Option<Box<dyn TextExtractor>>,
    telemetry: Option<SolverTelemetry>,
}

impl std::fmt::Debug for SolveService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SolveService")
            .field("solver", &self.solver)
            .field("extractor", &self.extractor.is_some())
            .finish_non_exhaustive()
    }
}

impl SolveService {
    /// Service with the passthrough explainer and no text extractor.
    #[must_use]
    pub fn new(solver: MathSolver, telemetry: Option<SolverTelemetry>) -> Self {
        Self {
            solver,
            explainer: Box::new(PassthroughExplainer),
            extractor: None,
            telemetry,
        }
    }

    /// Replaces the step explainer.
    #[must_use]
    pub fn with_explainer(mut self, explainer: Box<dyn StepExplainer>) -> Self {
        self.explainer = explainer;
        self
    }

    /// Installs a text extractor for image requests.
    #[must_use]
    pub fn with_extractor(mut self, extractor: Box<dyn TextExtractor>) -> Self {
        self.extractor = Some(extractor);
        self
    }

    /// Solves `problem` and refines non-empty step lists.
    #[must_use]
    pub fn solve(&self, problem: &MathProblem) -> SolutionResponse {
        if problem.problem_text.trim().is_empty() {
            return SolutionResponse::rejected("problem text is empty");
        }
        let language = Language::parse_or_default(&problem.language);
        let result = self.solver.solve_text(
            &problem.problem_text,
            &problem.problem_type,
            &problem.language,
        );
        let steps = if result.steps.is_empty() {
            result.steps
        } else {
            self.refine(problem, &result.answer, result.steps, language)
        };
        SolutionResponse {
            success: true,
            answer: result.answer,
            steps,
            visualization: result.visualization,
            error: None,
        }
    }

    fn refine(
        &self,
        problem: &MathProblem,
        answer: &str,
        steps: Vec<String>,
        language: Language,
    ) -> Vec<String> {
        match self
            .explainer
            .refine(&problem.problem_text, answer, &steps, language)
        {
            Ok(refined) if !refined.is_empty() => refined,
            Ok(_) => steps,
            Err(err) => {
                self.log(
                    LogLevel::Warn,
                    "service.explainer.failed",
                    json!({ "error": format!("{err:#}") }),
                );
                steps
            }
        }
    }

    /// Recognizes text in `image` and classifies it.
    ///
    /// Recognition errors are not raised; the text becomes
    /// `"OCR Error: <message>"` and is classified like any other input.
    #[must_use]
    pub fn detect_image(&self, image: &[u8]) -> DetectionResponse {
        let raw = match &self.extractor {
            Some(extractor) => extractor.extract_text(image),
            None => Err(anyhow::anyhow!("no text extractor configured")),
        };
        let text = raw.unwrap_or_else(|err| {
            self.log(
                LogLevel::Warn,
                "service.ocr.failed",
                json!({ "error": format!("{err:#}"), "bytes": image.len() }),
            );
            format!("OCR Error: {err}")
        });
        self.detect_text(&text)
    }

    /// Cleans and classifies already-recognized text.
    #[must_use]
    pub fn detect_text(&self, text: &str) -> DetectionResponse {
        let problem_type = self.solver.classify(text);
        let extracted_text = normalize(text);
        DetectionResponse {
            success: true,
            extracted_text,
            problem_type,
        }
    }

    /// Topic areas the solver advertises.
    #[must_use]
    pub fn topics(&self) -> TopicCatalog {
        topic_catalog()
    }

    fn log(&self, level: LogLevel, message: &str, metadata: Value) {
        if let Some(tel) = &self.telemetry {
            let _ = tel.log(level, message, metadata);
        }
    }
}

/// The advertised catalog, in display order.
#[must_use]
pub fn topic_catalog() -> TopicCatalog {
    CATALOG
        .iter()
        .map(|(area, topics)| {
            (
                (*area).to_string(),
                topics.iter().map(|topic| (*topic).to_string()).collect(),
            )
        })
        .collect()
}
