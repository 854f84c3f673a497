//! Keyword cascade mapping problem text to a [`TopicTag`].

use crate::topic::TopicTag;

/// Returns the first item satisfying `predicate`.
///
/// Rule tables in this crate are ordered data; this is the single place that
/// decides precedence between them.
pub fn first_match<'a, R>(rules: &'a [R], mut predicate: impl FnMut(&R) -> bool) -> Option<&'a R> {
    rules.iter().find(|rule| predicate(rule))
}

/// One classification rule: any keyword present selects `tag`.
#[derive(Debug, Clone, Copy)]
pub struct KeywordRule {
    /// Lowercase substrings tested against the lowercased text.
    pub keywords: &'static [&'static str],
    /// Tag selected on a hit.
    pub tag: TopicTag,
}

impl KeywordRule {
    /// True when any keyword occurs in `lowered`.
    #[must_use]
    pub fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|keyword| lowered.contains(keyword))
    }
}

/// Classification rules in precedence order.
pub const RULES: &[KeywordRule] = &[
    KeywordRule {
        keywords: &["dot", "cross", "vector", "magnitude"],
        tag: TopicTag::Vector,
    },
    KeywordRule {
        keywords: &["matrix", "determinant", "inverse", "eigen"],
        tag: TopicTag::Matrix,
    },
    KeywordRule {
        keywords: &["derivative", "differentiate", "d/dx"],
        tag: TopicTag::Derivative,
    },
    KeywordRule {
        keywords: &["integral", "integrate", "∫"],
        tag: TopicTag::Integral,
    },
    KeywordRule {
        keywords: &["limit"],
        tag: TopicTag::Limit,
    },
    KeywordRule {
        keywords: &["solve", "equation", "="],
        tag: TopicTag::Equation,
    },
];

/// Classifies `text`; never fails, defaulting to [`TopicTag::General`].
///
/// Matches the text as given, before normalization: `≤` is not `<=` here,
/// so inequality glyphs never hit the `=` keyword.
#[must_use]
pub fn classify(text: &str) -> TopicTag {
    let lowered = text.to_lowercase();
    first_match(RULES, |rule| rule.matches(&lowered)).map_or(TopicTag::General, |rule| rule.tag)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn earlier_rule_wins() {
        assert_eq!(classify("Vector and MATRIX"), TopicTag::Vector);
        assert_eq!(classify("solve the matrix equation"), TopicTag::Matrix);
        assert_eq!(classify("integrate then take the limit"), TopicTag::Integral);
    }

    #[test]
    fn inequality_glyphs_stay_general() {
        assert_eq!(classify("find x with x ≤ 5"), TopicTag::General);
        assert_eq!(classify("x ≥ 2 or x ≠ 3"), TopicTag::General);
        assert_eq!(classify("x <= 5"), TopicTag::Equation);
    }

    #[test]
    fn each_family_is_reachable() {
        assert_eq!(classify("find the dot product"), TopicTag::Vector);
        assert_eq!(classify("compute the determinant"), TopicTag::Matrix);
        assert_eq!(classify("d/dx of sin(x)"), TopicTag::Derivative);
        assert_eq!(classify("∫ x dx"), TopicTag::Integral);
        assert_eq!(classify("limit as x goes to 0"), TopicTag::Limit);
        assert_eq!(classify("x + 1 = 3"), TopicTag::Equation);
    }

    #[test]
    fn defaults_to_general() {
        assert_eq!(classify("what is two plus two"), TopicTag::General);
        assert_eq!(classify(""), TopicTag::General);
    }

    #[test]
    fn first_match_respects_order() {
        let rules = [1, 4, 6, 8];
        assert_eq!(first_match(&rules, |n| n % 2 == 0), Some(&4));
        assert_eq!(first_match(&rules, |n| *n > 10), None);
    }
}
