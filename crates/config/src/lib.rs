//! Configuration for the newsflow classification service
//!
//! Settings load from layered files plus `NEWSFLOW_`-prefixed environment
//! overrides. Classification rules and the sidecar routing table live in a
//! separate YAML file so they can be hot-reloaded without a restart.

pub mod constants;
pub mod rules_file;
pub mod settings;

pub use rules_file::{load_rule_file, RuleFile};
pub use settings::{
    ClassificationSettings, ReputationSettings, RuntimeEnvironment, ServerSettings, Settings,
    SidecarEndpoint, SidecarSettings,
};

use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: String,
        source: serde_yaml::Error,
    },

    #[error("Invalid configuration: {0}")]
    Validation(String),
}

impl From<ConfigError> for newsflow_core::Error {
    fn from(err: ConfigError) -> Self {
        newsflow_core::Error::Configuration(err.to_string())
    }
}
