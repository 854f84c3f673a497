use super::{SolveContext, TopicSolver};
use crate::{
    error::SolverError,
    expr::integrate,
    outcome::{FailureReason, SolveOutcome, SolveResult},
    phrasebook::Phrasebook,
    topic::TopicTag,
};

/// Indefinite integral of the extracted function.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntegralSolver;

impl TopicSolver for IntegralSolver {
    fn topic(&self) -> TopicTag {
        TopicTag::Integral
    }

    fn solve(&self, ctx: &SolveContext<'_>) -> SolveOutcome {
        match antiderivative(ctx) {
            Ok(result) => SolveOutcome::Solved(result),
            Err(err) => SolveOutcome::failed(TopicTag::Integral, FailureReason::from(err)),
        }
    }
}

fn antiderivative(ctx: &SolveContext<'_>) -> Result<SolveResult, SolverError> {
    let var = ctx.symbols.primary();
    let integrand = ctx.parse_function()?;
    let primitive = integrate(&integrand, var)?;
    let phrases = ctx.phrases();
    let steps = vec![
        Phrasebook::line(phrases.integral, format!("∫{integrand} d{var}")),
        phrases.integral_rule.to_string(),
        phrases.integral_per_term.to_string(),
        Phrasebook::line(phrases.answer, format!("{primitive} + C")),
    ];
    let answer = format!("∫{integrand} d{var} = {primitive} + C");
    Ok(SolveResult::new(answer, steps))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::SolverConfig, solvers::SYMBOLS, topic::Language};

    fn run(text: &str, language: Language) -> SolveOutcome {
        let config = SolverConfig::default();
        let ctx = SolveContext {
            text,
            symbols: &SYMBOLS,
            config: &config,
            language,
        };
        IntegralSolver.solve(&ctx)
    }

    #[test]
    fn integrates_square_with_constant() {
        let SolveOutcome::Solved(result) = run("integral of x**2", Language::En) else {
            panic!("expected a solution");
        };
        assert_eq!(result.answer, "∫x**2 dx = x**3/3 + C");
        assert_eq!(result.steps.len(), 4);
        assert_eq!(result.steps[3], "Answer: x**3/3 + C");
        assert!(result.visualization.is_none());
    }

    #[test]
    fn narrates_in_bengali() {
        let SolveOutcome::Solved(result) = run("integrate f(x) = cos(x)", Language::Bn) else {
            panic!("expected a solution");
        };
        assert_eq!(result.steps[0], "ইন্টিগ্রাল: ∫cos(x) dx");
        assert_eq!(result.steps[3], "উত্তর: sin(x) + C");
    }

    #[test]
    fn integrates_products_roots_and_reciprocals() {
        for (text, answer) in [
            ("integral of 2*x*x", "∫2*x**2 dx = 2*x**3/3 + C"),
            ("integral of 3*x*x + 2", "∫3*x**2 + 2 dx = x**3 + 2*x + C"),
            ("integral of x*(x+1)", "∫x*(x + 1) dx = x**3/3 + x**2/2 + C"),
            ("integral of 1/x**2", "∫1/x**2 dx = -1/x + C"),
            ("integral of sqrt(x)", "∫sqrt(x) dx = 2*x**1.5/3 + C"),
        ] {
            let SolveOutcome::Solved(result) = run(text, Language::En) else {
                panic!("expected a solution for {text}");
            };
            assert_eq!(result.answer, answer);
            assert_eq!(result.steps.len(), 4);
        }
    }

    #[test]
    fn unsupported_integrand_fails() {
        assert!(matches!(
            run("integral of x*sin(x)", Language::En),
            SolveOutcome::Failed(ref failure)
                if matches!(failure.reason, FailureReason::UnsupportedIntegrand(_))
        ));
    }
}
