use super::{SolveContext, TopicSolver};
use crate::{
    outcome::{FailureReason, SolveOutcome},
    topic::TopicTag,
};

/// Terminal state for topics that have no strategy yet.
#[derive(Debug, Clone, Copy)]
pub struct UnsupportedSolver {
    topic: TopicTag,
}

impl UnsupportedSolver {
    /// Placeholder for `topic`.
    #[must_use]
    pub const fn new(topic: TopicTag) -> Self {
        Self { topic }
    }
}

impl TopicSolver for UnsupportedSolver {
    fn topic(&self) -> TopicTag {
        self.topic
    }

    fn solve(&self, _ctx: &SolveContext<'_>) -> SolveOutcome {
        SolveOutcome::failed(self.topic, FailureReason::NotYetSupported)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::SolverConfig, solvers::SYMBOLS, topic::Language};

    #[test]
    fn always_reports_not_yet_supported() {
        let config = SolverConfig::default();
        let ctx = SolveContext {
            text: "solve x + 1 = 2",
            symbols: &SYMBOLS,
            config: &config,
            language: Language::En,
        };
        let solver = UnsupportedSolver::new(TopicTag::Equation);
        assert_eq!(solver.topic(), TopicTag::Equation);
        assert_eq!(
            solver.solve(&ctx),
            SolveOutcome::failed(TopicTag::Equation, FailureReason::NotYetSupported)
        );
    }
}
