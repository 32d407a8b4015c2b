//! Service configuration, loaded from TOML.

use std::path::Path;

use claimdrop_merkle::OddNodePolicy;
use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceConfig {
    /// `[claims]` table.
    pub claims: ClaimsConfig,
    /// `[log]` table.
    pub log: LogConfig,
}

/// Claim handler settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClaimsConfig {
    /// Check proofs against the registered snapshot before calling the
    /// contract.
    pub verify_before_submit: bool,

    /// Role name whose keccak256 is granted/revoked by the admin handlers.
    pub admin_role: String,

    /// Odd-layer policy for snapshots built by the service.  Must match the
    /// deployed verifier.
    pub odd_node_policy: OddNodePolicy,
}

impl Default for ClaimsConfig {
    fn default() -> Self {
        Self {
            verify_before_submit: true,
            admin_role: "ADMIN_ROLE".to_owned(),
            odd_node_policy: OddNodePolicy::default(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    /// `tracing` filter directive, overridden by `RUST_LOG`.
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_owned(),
        }
    }
}

/// Errors from config loading and validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// Not valid TOML, or unknown keys.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Parsed, but a value is out of range.
    #[error("validation error: {0}")]
    Validation(String),
}

impl ServiceConfig {
    /// Load and validate a config from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate a config from TOML text.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.claims.admin_role.trim().is_empty() {
            return Err(ConfigError::Validation(
                "claims.admin_role must not be empty".into(),
            ));
        }

        if self.log.filter.trim().is_empty() {
            return Err(ConfigError::Validation(
                "log.filter must not be empty".into(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = ServiceConfig::from_toml_str("").unwrap();
        assert!(config.claims.verify_before_submit);
        assert_eq!(config.claims.admin_role, "ADMIN_ROLE");
        assert_eq!(config.claims.odd_node_policy, OddNodePolicy::Duplicate);
        assert_eq!(config.log.filter, "info");
    }

    #[test]
    fn full_config() {
        let config = ServiceConfig::from_toml_str(
            r#"
            [claims]
            verify_before_submit = false
            admin_role = "OPERATOR_ROLE"
            odd_node_policy = "promote"

            [log]
            filter = "claimdrop_service=debug"
            "#,
        )
        .unwrap();
        assert!(!config.claims.verify_before_submit);
        assert_eq!(config.claims.admin_role, "OPERATOR_ROLE");
        assert_eq!(config.claims.odd_node_policy, OddNodePolicy::Promote);
        assert_eq!(config.log.filter, "claimdrop_service=debug");
    }

    #[test]
    fn rejects_blank_role() {
        let err = ServiceConfig::from_toml_str("[claims]\nadmin_role = \" \"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn rejects_unknown_keys() {
        let err = ServiceConfig::from_toml_str("[claims]\nverify = true\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
