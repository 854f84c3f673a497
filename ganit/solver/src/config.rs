use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::expr::ParseLimits;

/// Solver tuning knobs, loadable from TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Function used when none can be extracted from the text.
    #[serde(default = "default_function")]
    pub default_function: String,
    /// Number of plot samples for the derivative visualization.
    #[serde(default = "default_sample_count")]
    pub sample_count: usize,
    /// Left end of the sampling interval.
    #[serde(default = "default_sample_min")]
    pub sample_min: f64,
    /// Right end of the sampling interval.
    #[serde(default = "default_sample_max")]
    pub sample_max: f64,
    /// Longest expression text accepted by the parser.
    #[serde(default = "default_max_expression_chars")]
    pub max_expression_chars: usize,
    /// Deepest nesting accepted by the parser.
    #[serde(default = "default_max_nesting_depth")]
    pub max_nesting_depth: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            default_function: default_function(),
            sample_count: default_sample_count(),
            sample_min: default_sample_min(),
            sample_max: default_sample_max(),
            max_expression_chars: default_max_expression_chars(),
            max_nesting_depth: default_max_nesting_depth(),
        }
    }
}

impl SolverConfig {
    /// Loads configuration from a TOML file; absent keys take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading solver config {}", path.display()))?;
        let config: Self =
            toml::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("validating {}", path.display()))?;
        Ok(config)
    }

    /// Checks the cross-field constraints.
    pub fn validate(&self) -> Result<()> {
        if self.sample_count < 2 {
            bail!("sample_count must be at least 2, got {}", self.sample_count);
        }
        if !self.sample_min.is_finite()
            || !self.sample_max.is_finite()
            || self.sample_min >= self.sample_max
        {
            bail!(
                "invalid sampling bounds: {} >= {}",
                self.sample_min,
                self.sample_max
            );
        }
        if self.max_expression_chars == 0 || self.max_nesting_depth == 0 {
            bail!("expression limits must be non-zero");
        }
        if self.default_function.trim().is_empty() {
            bail!("default_function must not be empty");
        }
        Ok(())
    }

    /// Parser limits derived from this configuration.
    #[must_use]
    pub const fn parse_limits(&self) -> ParseLimits {
        ParseLimits {
            max_chars: self.max_expression_chars,
            max_depth: self.max_nesting_depth,
        }
    }
}

fn default_function() -> String {
    "x**2".into()
}

const fn default_sample_count() -> usize {
    100
}

const fn default_sample_min() -> f64 {
    -5.0
}

const fn default_sample_max() -> f64 {
    5.0
}

const fn default_max_expression_chars() -> usize {
    512
}

const fn default_max_nesting_depth() -> usize {
    64
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_keys_take_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("solver.toml");
        fs::write(&path, "sample_count = 20\n").unwrap();
        let config = SolverConfig::load(&path).unwrap();
        assert_eq!(config.sample_count, 20);
        assert_eq!(config.default_function, "x**2");
        assert_eq!(config.parse_limits().max_chars, 512);
    }

    #[test]
    fn rejects_inverted_bounds() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("solver.toml");
        fs::write(&path, "sample_min = 3.0\nsample_max = 1.0\n").unwrap();
        let err = SolverConfig::load(&path).unwrap_err();
        assert!(format!("{err:#}").contains("invalid sampling bounds"));
    }

    #[test]
    fn rejects_degenerate_values() {
        let config = SolverConfig {
            sample_count: 1,
            ..SolverConfig::default()
        };
        assert!(config.validate().is_err());
        let config = SolverConfig {
            max_nesting_depth: 0,
            ..SolverConfig::default()
        };
        assert!(config.validate().is_err());
        assert!(SolverConfig::default().validate().is_ok());
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = SolverConfig::load("/nonexistent/solver.toml").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/solver.toml"));
    }
}
