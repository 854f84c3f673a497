use ndarray::{arr2, Array2};

use super::{format_rows, SolveContext, TopicSolver};
use crate::{
    expr::format_number,
    extract::Vector,
    outcome::{FailureReason, SolveOutcome, SolveResult},
    phrasebook::Phrasebook,
    topic::TopicTag,
};

/// Demonstration matrix used for every matrix request.
fn example_matrix() -> Array2<f64> {
    arr2(&[[1.0, 2.0], [3.0, 4.0]])
}

/// Determinant of the fixed 2x2 example matrix.
///
/// Matrices are not read from the problem text; the request only decides
/// whether the determinant is narrated.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatrixSolver;

impl TopicSolver for MatrixSolver {
    fn topic(&self) -> TopicTag {
        TopicTag::Matrix
    }

    fn solve(&self, ctx: &SolveContext<'_>) -> SolveOutcome {
        if !ctx.lowered().contains("determinant") {
            return SolveOutcome::failed(TopicTag::Matrix, FailureReason::MissingMatrixOperation);
        }
        let phrases = ctx.phrases();
        let m = example_matrix();
        let (a, b, c, d) = (m[[0, 0]], m[[0, 1]], m[[1, 0]], m[[1, 1]]);
        let det = a.mul_add(d, -(b * c));
        let rows: Vec<Vector> = m.rows().into_iter().map(|row| row.to_vec()).collect();
        let n = format_number;
        let steps = vec![
            format!("{} = {}", phrases.matrix, format_rows(&rows)),
            phrases.determinant_rule.to_string(),
            Phrasebook::line(
                phrases.calculation,
                format!("({}×{}) - ({}×{})", n(a), n(d), n(b), n(c)),
            ),
            Phrasebook::line(phrases.result, n(det)),
        ];
        SolveOutcome::Solved(SolveResult::new(format!("det(A) = {}", n(det)), steps))
    }
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
        MatrixSolver.solve(&ctx)
    }

    #[test]
    fn narrates_example_determinant() {
        let SolveOutcome::Solved(result) = run("Find the Determinant of A") else {
            panic!("expected a solution");
        };
        assert_eq!(result.answer, "det(A) = -2");
        assert_eq!(
            result.steps,
            vec![
                "Matrix A = [[1, 2], [3, 4]]".to_string(),
                "Determinant of a 2×2 matrix: det([[a,b],[c,d]]) = ad - bc".to_string(),
                "Calculation: (1×4) - (2×3)".to_string(),
                "Result: -2".to_string(),
            ]
        );
    }

    #[test]
    fn other_matrix_requests_need_help() {
        assert_eq!(
            run("inverse of the matrix"),
            SolveOutcome::failed(TopicTag::Matrix, FailureReason::MissingMatrixOperation)
        );
    }
}
