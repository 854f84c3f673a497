//! Best-effort extraction of vectors and function expressions from problem text.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Ordered numeric components.
pub type Vector = Vec<f64>;

static BRACKETED: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[[^\]]*\]").expect("valid regex"));

static FUNCTION_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)of\s+([^.?]+)",
        r"(?i)([\w*+/^()\s-]+)\s+where",
        r"(?i)f\(x\)\s*=\s*([^\n]+)",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("valid regex"))
    .collect()
});

/// Vectors used when the text contains none.
pub const FALLBACK_VECTORS: [[f64; 3]; 2] = [[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];

/// Where a set of vectors came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    /// Parsed from the request text.
    Extracted,
    /// Substituted demonstration data.
    Fallback,
}

/// Result of [`extract_vectors`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorExtraction {
    /// Vectors in order of appearance.
    pub vectors: Vec<Vector>,
    /// Whether `vectors` is real input or the fallback pair.
    pub provenance: Provenance,
}

impl VectorExtraction {
    /// True when the fallback pair was substituted.
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.provenance == Provenance::Fallback
    }
}

/// Pulls every `[a, b, ...]` group that parses fully as numbers.
///
/// Groups with an unparsable or no component are skipped. With nothing left
/// the [`FALLBACK_VECTORS`] pair is returned, flagged as [`Provenance::Fallback`].
#[must_use]
pub fn extract_vectors(text: &str) -> VectorExtraction {
    let vectors: Vec<Vector> = BRACKETED
        .find_iter(text)
        .filter_map(|m| parse_components(m.as_str()))
        .collect();
    if vectors.is_empty() {
        return VectorExtraction {
            vectors: FALLBACK_VECTORS.iter().map(|v| v.to_vec()).collect(),
            provenance: Provenance::Fallback,
        };
    }
    VectorExtraction {
        vectors,
        provenance: Provenance::Extracted,
    }
}

fn parse_components(group: &str) -> Option<Vector> {
    let inner = group.trim_start_matches('[').trim_end_matches(']');
    let components = inner
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| item.parse::<f64>().ok())
        .collect::<Option<Vector>>()?;
    (!components.is_empty()).then_some(components)
}

/// Returns the first captured function expression, or `""` when no pattern
/// matches (callers then use their default function).
#[must_use]
pub fn extract_function(text: &str) -> String {
    FUNCTION_PATTERNS
        .iter()
        .find_map(|pattern| pattern.captures(text))
        .and_then(|caps| caps.get(1))
        .map(|group| group.as_str().trim().to_string())
        .unwrap_or_default()
}
