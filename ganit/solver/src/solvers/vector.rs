use ndarray::aview1;

use super::{format_vector, SolveContext, TopicSolver};
use crate::{
    error::SolverError,
    expr::format_number,
    extract::extract_vectors,
    outcome::{FailureReason, SolveOutcome, SolveResult, Visualization},
    phrasebook::Phrasebook,
    topic::TopicTag,
};

/// Dot and cross products of the first two vectors in the text.
#[derive(Debug, Clone, Copy, Default)]
pub struct VectorSolver;

impl TopicSolver for VectorSolver {
    fn topic(&self) -> TopicTag {
        TopicTag::Vector
    }

    fn solve(&self, ctx: &SolveContext<'_>) -> SolveOutcome {
        let extraction = extract_vectors(ctx.text);
        let [a, b, ..] = extraction.vectors.as_slice() else {
            return SolveOutcome::failed(TopicTag::Vector, FailureReason::NotEnoughVectors);
        };
        let lowered = ctx.lowered();
        let phrases = ctx.phrases();
        let fallback = extraction.is_fallback();
        let outcome = if lowered.contains("dot") {
            dot(a, b, fallback, phrases).map_err(FailureReason::from)
        } else if lowered.contains("cross") {
            cross(a, b, fallback, phrases).map_err(FailureReason::from)
        } else {
            Err(FailureReason::UnknownVectorOperation)
        };
        match outcome {
            Ok(result) => SolveOutcome::Solved(result),
            Err(reason) => SolveOutcome::failed(TopicTag::Vector, reason),
        }
    }
}

fn dot(
    a: &[f64],
    b: &[f64],
    fallback: bool,
    phrases: &Phrasebook,
) -> Result<SolveResult, SolverError> {
    if a.len() != b.len() {
        return Err(SolverError::DimensionMismatch {
            expected: a.len(),
            found: b.len(),
        });
    }
    let product = aview1(a).dot(&aview1(b));
    let terms: Vec<String> = a
        .iter()
        .zip(b)
        .map(|(x, y)| format!("({}×{})", format_number(*x), format_number(*y)))
        .collect();
    let steps = vec![
        Phrasebook::line(phrases.vector_first, format_vector(a)),
        Phrasebook::line(phrases.vector_second, format_vector(b)),
        phrases.dot_formula.to_string(),
        Phrasebook::line(phrases.calculation, terms.join(" + ")),
        Phrasebook::line(phrases.result, format_number(product)),
    ];
    let answer = format!("{} = {}", phrases.dot_product, format_number(product));
    Ok(SolveResult::new(answer, steps).with_visualization(Visualization::VectorDot {
        vectors: vec![a.to_vec(), b.to_vec()],
        result: product,
        fallback,
    }))
}

fn cross(
    a: &[f64],
    b: &[f64],
    fallback: bool,
    phrases: &Phrasebook,
) -> Result<SolveResult, SolverError> {
    let (&[a1, a2, a3], &[b1, b2, b3]) = (a, b) else {
        let found = if a.len() == 3 { b.len() } else { a.len() };
        return Err(SolverError::DimensionMismatch { expected: 3, found });
    };
    let product = vec![
        a2.mul_add(b3, -(a3 * b2)),
        a3.mul_add(b1, -(a1 * b3)),
        a1.mul_add(b2, -(a2 * b1)),
    ];
    let n = format_number;
    let calculation = format!(
        "i({}×{} - {}×{}) - j({}×{} - {}×{}) + k({}×{} - {}×{})",
        n(a2),
        n(b3),
        n(a3),
        n(b2),
        n(a1),
        n(b3),
        n(a3),
        n(b1),
        n(a1),
        n(b2),
        n(a2),
        n(b1),
    );
    let steps = vec![
        format!("{} = {}", phrases.vector_a, format_vector(a)),
        format!("{} = {}", phrases.vector_b, format_vector(b)),
        phrases.cross_formula.to_string(),
        Phrasebook::line(phrases.calculation, calculation),
        Phrasebook::line(phrases.result, format_vector(&product)),
    ];
    let answer = format!("{} = {}", phrases.cross_product, format_vector(&product));
    Ok(SolveResult::new(answer, steps).with_visualization(Visualization::VectorCross {
        vectors: vec![a.to_vec(), b.to_vec()],
        result: product,
        fallback,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::SolverConfig, solvers::SYMBOLS, topic::Language};

    fn run(text: &str) -> SolveOutcome {
        let config = SolverConfig::default();
        let ctx = SolveContext {
            text,
            symbols: &SYMBOLS,
            config: &config,
            language: Language::En,
        };
        VectorSolver.solve(&ctx)
    }

    fn solved(text: &str) -> SolveResult {
        match run(text) {
            SolveOutcome::Solved(result) => result,
            SolveOutcome::Failed(failure) => panic!("unexpected failure: {failure:?}"),
        }
    }

    #[test]
    fn dot_product_narrates_five_steps() {
        let result = solved("find the dot product of [1,2,3] and [4,5,6]");
        assert_eq!(result.answer, "Dot product = 32");
        assert_eq!(result.steps.len(), 5);
        assert_eq!(result.steps[3], "Calculation: (1×4) + (2×5) + (3×6)");
        assert_eq!(
            result.visualization,
            Some(Visualization::VectorDot {
                vectors: vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]],
                result: 32.0,
                fallback: false,
            })
        );
    }

    #[test]
    fn cross_product_of_unit_vectors() {
        let result = solved("cross product of [1,0,0] and [0,1,0]");
        assert_eq!(result.answer, "Cross product = [0, 0, 1]");
        assert_eq!(result.steps[4], "Result: [0, 0, 1]");
        assert!(matches!(
            result.visualization,
            Some(Visualization::VectorCross { ref result, .. }) if result == &vec![0.0, 0.0, 1.0]
        ));
    }

    #[test]
    fn fallback_vectors_are_flagged_without_extra_steps() {
        let result = solved("dot product please");
        assert_eq!(result.steps.len(), 5);
        assert_eq!(result.steps[0], "Vector 1: [1, 2, 3]");
        assert_eq!(result.answer, "Dot product = 32");
        assert!(matches!(
            result.visualization,
            Some(Visualization::VectorDot { fallback: true, .. })
        ));

        let crossed = solved("cross product please");
        assert_eq!(crossed.steps.len(), 5);
        assert!(matches!(
            crossed.visualization,
            Some(Visualization::VectorCross { fallback: true, .. })
        ));
    }

    #[test]
    fn dimension_errors_come_from_the_engine_error() {
        let err = dot(&[1.0], &[1.0, 2.0], false, &crate::phrasebook::ENGLISH).unwrap_err();
        assert_eq!(err, SolverError::DimensionMismatch { expected: 1, found: 2 });
        assert_eq!(
            FailureReason::from(err),
            FailureReason::DimensionMismatch { expected: 1, found: 2 }
        );
    }

    #[test]
    fn reports_precise_failures() {
        assert_eq!(
            run("magnitude of [1,2,3]"),
            SolveOutcome::failed(TopicTag::Vector, FailureReason::NotEnoughVectors)
        );
        assert_eq!(
            run("vector [1,2] and [3,4]"),
            SolveOutcome::failed(TopicTag::Vector, FailureReason::UnknownVectorOperation)
        );
        assert_eq!(
            run("cross [1,2] and [3,4]"),
            SolveOutcome::failed(
                TopicTag::Vector,
                FailureReason::DimensionMismatch { expected: 3, found: 2 }
            )
        );
        assert_eq!(
            run("dot [1,2,3] and [3,4]"),
            SolveOutcome::failed(
                TopicTag::Vector,
                FailureReason::DimensionMismatch { expected: 3, found: 2 }
            )
        );
    }
}
