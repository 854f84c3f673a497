use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Closed set of problem categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TopicTag {
    /// Dot and cross products.
    Vector,
    /// Matrix operations (determinant of the example matrix).
    Matrix,
    /// First derivative with respect to `x`.
    Derivative,
    /// Indefinite integral with respect to `x`.
    Integral,
    /// Limits.
    Limit,
    /// Equations to solve.
    Equation,
    /// Anything else.
    General,
}

impl TopicTag {
    /// Every tag in classifier order, `General` last.
    pub const ALL: [Self; 7] = [
        Self::Vector,
        Self::Matrix,
        Self::Derivative,
        Self::Integral,
        Self::Limit,
        Self::Equation,
        Self::General,
    ];

    /// Lowercase wire label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Vector => "vector",
            Self::Matrix => "matrix",
            Self::Derivative => "derivative",
            Self::Integral => "integral",
            Self::Limit => "limit",
            Self::Equation => "equation",
            Self::General => "general",
        }
    }
}

impl fmt::Display for TopicTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TopicTag {
    type Err = UnknownTopic;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|tag| tag.label() == wanted)
            .ok_or_else(|| UnknownTopic(s.to_string()))
    }
}

/// A topic label outside the closed set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown topic `{0}`")]
pub struct UnknownTopic(pub String);

/// Caller-supplied topic hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TopicHint {
    /// Let the classifier decide.
    #[default]
    Auto,
    /// See [`TopicTag::Vector`].
    Vector,
    /// See [`TopicTag::Matrix`].
    Matrix,
    /// See [`TopicTag::Derivative`].
    Derivative,
    /// See [`TopicTag::Integral`].
    Integral,
    /// See [`TopicTag::Limit`].
    Limit,
    /// See [`TopicTag::Equation`].
    Equation,
    /// See [`TopicTag::General`].
    General,
}

impl TopicHint {
    /// The forced tag, or `None` for [`TopicHint::Auto`].
    #[must_use]
    pub const fn tag(self) -> Option<TopicTag> {
        match self {
            Self::Auto => None,
            Self::Vector => Some(TopicTag::Vector),
            Self::Matrix => Some(TopicTag::Matrix),
            Self::Derivative => Some(TopicTag::Derivative),
            Self::Integral => Some(TopicTag::Integral),
            Self::Limit => Some(TopicTag::Limit),
            Self::Equation => Some(TopicTag::Equation),
            Self::General => Some(TopicTag::General),
        }
    }

    /// Parses a hint from a transport string.
    ///
    /// Unknown labels resolve to [`TopicHint::General`]; the flag in the
    /// returned pair is `false` when that substitution happened so callers
    /// can log it.
    #[must_use]
    pub fn parse_lenient(raw: &str) -> (Self, bool) {
        if raw.trim().eq_ignore_ascii_case("auto") {
            return (Self::Auto, true);
        }
        match raw.parse::<TopicTag>() {
            Ok(tag) => (Self::from(tag), true),
            Err(_) => (Self::General, false),
        }
    }
}

impl From<TopicTag> for TopicHint {
    fn from(tag: TopicTag) -> Self {
        match tag {
            TopicTag::Vector => Self::Vector,
            TopicTag::Matrix => Self::Matrix,
            TopicTag::Derivative => Self::Derivative,
            TopicTag::Integral => Self::Integral,
            TopicTag::Limit => Self::Limit,
            TopicTag::Equation => Self::Equation,
            TopicTag::General => Self::General,
        }
    }
}

/// Narration language for steps and answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English.
    #[default]
    En,
    /// Bengali.
    Bn,
}

impl Language {
    /// BCP-47 style tag.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Bn => "bn",
        }
    }

    /// Parses `en`/`bn`; anything else falls back to English.
    #[must_use]
    pub fn parse_or_default(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "bn" | "bangla" | "bengali" => Self::Bn,
            _ => Self::En,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_round_trip_through_labels() {
        for tag in TopicTag::ALL {
            assert_eq!(tag.label().parse::<TopicTag>().unwrap(), tag);
        }
        assert!("calculus".parse::<TopicTag>().is_err());
    }

    #[test]
    fn lenient_hint_maps_unknown_to_general() {
        assert_eq!(TopicHint::parse_lenient("AUTO"), (TopicHint::Auto, true));
        assert_eq!(TopicHint::parse_lenient("Matrix"), (TopicHint::Matrix, true));
        assert_eq!(
            TopicHint::parse_lenient("geometry"),
            (TopicHint::General, false)
        );
    }

    #[test]
    fn hint_serializes_lowercase() {
        let raw = serde_json::to_string(&TopicHint::Derivative).unwrap();
        assert_eq!(raw, "\"derivative\"");
        assert_eq!(TopicHint::default().tag(), None);
    }

    #[test]
    fn language_parsing_defaults_to_english() {
        assert_eq!(Language::parse_or_default("bn"), Language::Bn);
        assert_eq!(Language::parse_or_default("fr"), Language::En);
    }
}
