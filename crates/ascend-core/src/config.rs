//! Engine configuration loaded from YAML.
//!
//! Every section and field has a default, so an empty document is a valid
//! configuration. The `ASCEND_LOG` environment variable overrides
//! `logging.level` when present.

use std::path::Path;

use ascend_types::BranchId;
use serde::Deserialize;

/// Environment variable that overrides [`LoggingConfig::level`].
pub const LOG_ENV_VAR: &str = "ASCEND_LOG";

/// Why an [`EngineConfig`] could not be produced.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The engine config file could not be read.
    #[error("cannot read engine config: {source}")]
    Io {
        /// Error from the filesystem.
        #[from]
        source: std::io::Error,
    },

    /// The document is not valid YAML or does not match [`EngineConfig`].
    #[error("invalid engine config: {source}")]
    Yaml {
        /// Error from the YAML deserializer.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EngineConfig {
    /// Branches every ledger carries, even before any talent is loaded.
    #[serde(default)]
    pub branches: Vec<BranchId>,

    /// Ledger behaviour.
    #[serde(default)]
    pub ledger: LedgerConfig,

    /// Log level and format.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl EngineConfig {
    /// Read and parse the engine config at `path`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Io`] when the file is unreadable, otherwise whatever
    /// [`EngineConfig::parse`] reports.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse an engine config document, then apply the `ASCEND_LOG`
    /// override.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] for malformed YAML or a field of the
    /// wrong type. Unknown fields are ignored.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.logging.apply_env_overrides();
        Ok(config)
    }
}

/// Ledger behaviour toggles.
///
/// Unloading a player always saves the ledger: the external account has
/// already been debited for every learned level, so dropping the ledger
/// would destroy points.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LedgerConfig {
    /// Check the conservation invariants after every learn and reset.
    #[serde(default = "default_true")]
    pub verify_after_mutation: bool,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            verify_after_mutation: default_true(),
        }
    }
}

/// Where and how the engine logs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive used when `ASCEND_LOG` is unset (e.g. `info`,
    /// `ascend_core=debug`).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON log lines instead of human-readable text.
    #[serde(default)]
    pub json: bool,
}

impl LoggingConfig {
    /// Apply the `ASCEND_LOG` override, if set.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var(LOG_ENV_VAR) {
            self.level = val;
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

const fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config: EngineConfig = serde_yml::from_str("{}").unwrap();
        assert!(config.branches.is_empty());
        assert!(config.ledger.verify_after_mutation);
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.json);
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r"
branches: [combat, arcane, survival]
ledger:
  verify_after_mutation: false
logging:
  json: true
";
        let config: EngineConfig = serde_yml::from_str(yaml).unwrap();
        assert_eq!(
            config.branches,
            vec![
                BranchId::from("combat"),
                BranchId::from("arcane"),
                BranchId::from("survival"),
            ]
        );
        assert!(!config.ledger.verify_after_mutation);
        assert!(config.logging.json);
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let config: EngineConfig = serde_yml::from_str("logging:\n  json: true\n").unwrap();
        assert!(config.logging.json);
        assert_eq!(config.logging.level, "info");
        assert!(config.ledger.verify_after_mutation);
    }

    #[test]
    fn retired_persistence_switch_is_ignored() {
        // Older configs may still carry the removed unload switch.
        let config: EngineConfig =
            serde_yml::from_str("ledger:\n  persist_on_unload: false\n").unwrap();
        assert_eq!(config.ledger, LedgerConfig::default());
    }

    #[test]
    fn invalid_yaml_is_an_error() {
        let result = EngineConfig::parse("branches: [combat");
        assert!(matches!(result, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = EngineConfig::from_file(Path::new("/nonexistent/ascend.yaml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
