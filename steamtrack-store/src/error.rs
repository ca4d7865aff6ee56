//! Store error types.

use thiserror::Error;

/// A tracker configuration that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The Steam account id is blank or missing.
    #[error("steam id is required")]
    AccountIdRequired,

    /// The Web API key is blank or missing.
    #[error("api key is required")]
    ApiKeyRequired,
}

/// Errors that can occur in the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Invalid tracker configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// No tracker matches the selector.
    #[error("No tracker configured for '{0}'")]
    TrackerNotFound(String),

    /// No tracker configured at all.
    #[error("No tracker configured; run `steamtrack config add` or set STEAM_TRACKER_ACCOUNT_ID and STEAM_TRACKER_API_KEY")]
    NoTracker,

    /// Invalid endpoint or request settings.
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML import could not be parsed.
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl StoreError {
    /// Returns true if the user can fix this by editing configuration.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            StoreError::Config(_)
                | StoreError::TrackerNotFound(_)
                | StoreError::NoTracker
                | StoreError::InvalidSettings(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_errors_are_distinct() {
        assert_ne!(
            ConfigError::AccountIdRequired.to_string(),
            ConfigError::ApiKeyRequired.to_string()
        );
    }

    #[test]
    fn test_is_config() {
        assert!(StoreError::from(ConfigError::ApiKeyRequired).is_config());
        assert!(StoreError::NoTracker.is_config());
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert!(!StoreError::from(io).is_config());
    }
}
