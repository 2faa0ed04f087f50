use crate::error::ConfigError;
use log::warn;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Hyperparameters of the Q-learning agent, loadable from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub learning_rate: f64,
    pub discount_factor: f64,
    /// Probability of playing a random move instead of the greedy one.
    pub epsilon: f64,
    /// Seed for the agent's random source; fresh entropy when absent.
    pub seed: Option<u64>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        AgentConfig {
            learning_rate: 0.1,
            discount_factor: 0.95,
            epsilon: 0.1,
            seed: None,
        }
    }
}

impl AgentConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AgentConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Like [`AgentConfig::load`], falling back to defaults when the file does
    /// not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            warn!("config file '{}' not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            return Err(ConfigError::Validation(format!(
                "learning_rate must be in (0, 1], got {}",
                self.learning_rate
            )));
        }
        if !(0.0..=1.0).contains(&self.discount_factor) {
            return Err(ConfigError::Validation(format!(
                "discount_factor must be in [0, 1], got {}",
                self.discount_factor
            )));
        }
        if !(0.0..=1.0).contains(&self.epsilon) {
            return Err(ConfigError::Validation(format!(
                "epsilon must be in [0, 1], got {}",
                self.epsilon
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_the_classic_agent() {
        let config = AgentConfig::default();
        assert_eq!(config.learning_rate, 0.1);
        assert_eq!(config.discount_factor, 0.95);
        assert_eq!(config.epsilon, 0.1);
        assert_eq!(config.seed, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"epsilon": 0.0, "seed": 7}}"#).unwrap();
        let config = AgentConfig::load(file.path()).unwrap();
        assert_eq!(config.epsilon, 0.0);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.learning_rate, 0.1);
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"epsilon": 1.5}}"#).unwrap();
        let err = AgentConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));

        let config = AgentConfig {
            learning_rate: 0.0,
            ..AgentConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "learning_rate = 0.2").unwrap();
        let err = AgentConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        assert_eq!(AgentConfig::load_or_default(&path).unwrap(), AgentConfig::default());
        assert!(matches!(
            AgentConfig::load(&path).unwrap_err(),
            ConfigError::FileRead { .. }
        ));
    }
}
