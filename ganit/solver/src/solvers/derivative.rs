use ndarray::Array1;

use super::{SolveContext, TopicSolver};
use crate::{
    error::SolverError,
    expr::{differentiate, evaluate, Expr},
    outcome::{FailureReason, SolveOutcome, SolveResult, Visualization},
    phrasebook::Phrasebook,
    topic::TopicTag,
};

/// First derivative of the extracted function, plus sampled curves.
#[derive(Debug, Clone, Copy, Default)]
pub struct DerivativeSolver;

impl TopicSolver for DerivativeSolver {
    fn topic(&self) -> TopicTag {
        TopicTag::Derivative
    }

    fn solve(&self, ctx: &SolveContext<'_>) -> SolveOutcome {
        match derive(ctx) {
            Ok(result) => SolveOutcome::Solved(result),
            Err(err) => SolveOutcome::failed(TopicTag::Derivative, FailureReason::from(err)),
        }
    }
}

fn derive(ctx: &SolveContext<'_>) -> Result<SolveResult, SolverError> {
    let var = ctx.symbols.primary();
    let function = ctx.parse_function()?;
    let derivative = differentiate(&function, var);
    let phrases = ctx.phrases();

    let config = ctx.config;
    let x_values = Array1::linspace(config.sample_min, config.sample_max, config.sample_count);
    let y_values = sample(&function, var, &x_values)?;
    let dy_values = sample(&derivative, var, &x_values)?;

    let steps = vec![
        Phrasebook::line(phrases.function, format!("f({var}) = {function}")),
        phrases.derivative_rule.to_string(),
        phrases.derivative_per_term.to_string(),
        Phrasebook::line(phrases.answer, format!("d/d{var} = {derivative}")),
    ];
    let answer = format!("d/d{var}({function}) = {derivative}");
    Ok(SolveResult::new(answer, steps).with_visualization(Visualization::FunctionPlot {
        function: function.to_string(),
        derivative: derivative.to_string(),
        x_values: x_values.to_vec(),
        y_values,
        dy_values,
    }))
}

fn sample(expr: &Expr, var: &str, at: &Array1<f64>) -> Result<Vec<f64>, SolverError> {
    at.iter().map(|&x| evaluate(expr, &[(var, x)])).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::SolverConfig, solvers::SYMBOLS, topic::Language};

    fn run_with(text: &str, config: &SolverConfig) -> SolveOutcome {
        let ctx = SolveContext {
            text,
            symbols: &SYMBOLS,
            config,
            language: Language::En,
        };
        DerivativeSolver.solve(&ctx)
    }

    fn run(text: &str) -> SolveOutcome {
        run_with(text, &SolverConfig::default())
    }

    #[test]
    fn differentiates_square_with_plot() {
        let SolveOutcome::Solved(result) = run("find the derivative of x**2") else {
            panic!("expected a solution");
        };
        assert_eq!(result.answer, "d/dx(x**2) = 2*x");
        assert_eq!(result.steps.len(), 4);
        assert_eq!(result.steps[0], "Function: f(x) = x**2");
        assert_eq!(result.steps[3], "Answer: d/dx = 2*x");
        let Some(Visualization::FunctionPlot {
            x_values,
            y_values,
            dy_values,
            ..
        }) = result.visualization
        else {
            panic!("expected a function plot");
        };
        assert_eq!(x_values.len(), 100);
        assert_eq!(y_values.len(), 100);
        assert_eq!(dy_values.len(), 100);
        assert!((x_values[0] + 5.0).abs() < 1e-12);
        assert!((x_values[99] - 5.0).abs() < 1e-12);
        assert!((dy_values[99] - 10.0).abs() < 1e-9);
    }

    #[test]
    fn uses_default_function_when_none_found() {
        let SolveOutcome::Solved(result) = run("derivative please") else {
            panic!("expected a solution");
        };
        assert_eq!(result.answer, "d/dx(x**2) = 2*x");
    }

    #[test]
    fn echoes_the_collected_function() {
        let SolveOutcome::Solved(result) = run("derivative of 2*x*x") else {
            panic!("expected a solution");
        };
        assert_eq!(result.answer, "d/dx(2*x**2) = 4*x");
    }

    #[test]
    fn honours_sample_count() {
        let config = SolverConfig {
            sample_count: 5,
            ..SolverConfig::default()
        };
        let SolveOutcome::Solved(result) = run_with("derivative of sin(x)", &config) else {
            panic!("expected a solution");
        };
        assert!(matches!(
            result.visualization,
            Some(Visualization::FunctionPlot { ref x_values, .. }) if x_values.len() == 5
        ));
    }

    #[test]
    fn parse_and_evaluation_failures_are_contained() {
        assert!(matches!(
            run("derivative of x +* 2"),
            SolveOutcome::Failed(ref failure) if matches!(failure.reason, FailureReason::Parse(_))
        ));
        // unbound `w` cannot be sampled
        assert!(matches!(
            run("derivative of w*x"),
            SolveOutcome::Failed(ref failure) if matches!(failure.reason, FailureReason::Evaluation(_))
        ));
    }

    #[test]
    fn oversized_expressions_are_rejected() {
        let config = SolverConfig {
            max_expression_chars: 4,
            ..SolverConfig::default()
        };
        assert!(matches!(
            run_with("derivative of x**2 + x**3", &config),
            SolveOutcome::Failed(ref failure) if matches!(failure.reason, FailureReason::TooComplex(_))
        ));
    }
}
