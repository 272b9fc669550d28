//! Match configuration.
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid match config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("turn_limit must be at least 1")]
    ZeroTurnLimit,
}

/// Runtime knobs for a match. The rules themselves are fixed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Seed for the dice stream; `None` draws from OS entropy.
    pub seed: Option<u64>,
    /// Stop after this many turns even without a winner.
    pub turn_limit: Option<u32>,
}

impl MatchConfig {
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_turn_limit(mut self, limit: u32) -> Self {
        self.turn_limit = Some(limit);
        self
    }

    /// Parse and validate a JSON config.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for malformed JSON or invalid values.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroTurnLimit`] when `turn_limit` is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.turn_limit == Some(0) {
            return Err(ConfigError::ZeroTurnLimit);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_default() {
        let config = MatchConfig::from_json("{}").unwrap();
        assert_eq!(config, MatchConfig::default());

        let config = MatchConfig::from_json(r#"{"seed": 1337, "turn_limit": 200}"#).unwrap();
        assert_eq!(config, MatchConfig::seeded(1337).with_turn_limit(200));
    }

    #[test]
    fn invalid_configs_are_rejected() {
        assert!(matches!(
            MatchConfig::from_json(r#"{"turn_limit": 0}"#),
            Err(ConfigError::ZeroTurnLimit)
        ));
        assert!(matches!(
            MatchConfig::from_json("{seed"),
            Err(ConfigError::Parse(_))
        ));
    }
}
