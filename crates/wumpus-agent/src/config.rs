//! Agent configuration loading.

use std::path::Path;

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};
use wumpus_logic::InferenceConfig;

/// Tunables for [`crate::HybridAgent`], loadable from YAML.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Largest lethal probability the agent will gamble on.
    pub risk_threshold: f64,

    /// Model-checking settings for every hazard query.
    #[serde(default = "default_inference")]
    pub inference: InferenceConfig,
}

fn default_inference() -> InferenceConfig {
    InferenceConfig {
        max_unknowns: 20,
        relevance_pruning: true,
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            risk_threshold: 0.4,
            inference: default_inference(),
        }
    }
}

impl AgentConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read agent config from {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse agent config from {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` when given, otherwise use the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            (0.0..=1.0).contains(&self.risk_threshold),
            "risk_threshold must lie in [0, 1], got {}",
            self.risk_threshold
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AgentConfig::default();
        assert_eq!(config.risk_threshold, 0.4);
        assert!(config.inference.relevance_pruning);
        assert_eq!(config.inference.max_unknowns, 20);
    }

    #[test]
    fn test_load_partial_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "risk_threshold: 0.25").unwrap();

        let config = AgentConfig::load(file.path()).unwrap();
        assert_eq!(config.risk_threshold, 0.25);
        assert_eq!(config.inference, default_inference());
    }

    #[test]
    fn test_load_inference_section() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "inference:\n  max_unknowns: 12\n  relevance_pruning: false").unwrap();

        let config = AgentConfig::load(file.path()).unwrap();
        assert_eq!(config.risk_threshold, 0.4);
        assert_eq!(config.inference.max_unknowns, 12);
        assert!(!config.inference.relevance_pruning);
    }

    #[test]
    fn test_rejects_out_of_range_threshold() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "risk_threshold: 1.5").unwrap();
        assert!(AgentConfig::load(file.path()).is_err());
    }

    #[test]
    fn test_missing_file_mentions_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.yaml");
        let err = AgentConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("absent.yaml"));

        assert_eq!(AgentConfig::load_or_default(None).unwrap(), AgentConfig::default());
    }
}
