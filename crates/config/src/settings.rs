//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::constants::{quality, reputation, sidecars};
use crate::ConfigError;

/// Runtime environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    #[default]
    Development,
    Staging,
    Production,
}

impl RuntimeEnvironment {
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub environment: RuntimeEnvironment,

    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub classification: ClassificationSettings,

    #[serde(default)]
    pub reputation: ReputationSettings,

    #[serde(default)]
    pub sidecars: SidecarSettings,

    /// Path to the YAML file holding classification rules
    #[serde(default = "default_rules_path")]
    pub rules_path: String,

    /// Routing table: content type (`article`) or composite key
    /// (`article:event`) to the sidecars that run for it. An explicitly
    /// empty list means "run no sidecars"; a missing key is a warning.
    #[serde(default = "default_routing")]
    pub routing: BTreeMap<String, Vec<String>>,
}

fn default_rules_path() -> String {
    "config/rules.yaml".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            environment: RuntimeEnvironment::default(),
            server: ServerSettings::default(),
            classification: ClassificationSettings::default(),
            reputation: ReputationSettings::default(),
            sidecars: SidecarSettings::default(),
            rules_path: default_rules_path(),
            routing: default_routing(),
        }
    }
}

fn default_routing() -> BTreeMap<String, Vec<String>> {
    let mut routing = BTreeMap::new();
    routing.insert(
        "article".to_string(),
        vec![
            "crime".to_string(),
            "mining".to_string(),
            "coforge".to_string(),
            "entertainment".to_string(),
            "anishinaabe".to_string(),
            "location".to_string(),
        ],
    );
    routing.insert(
        "article:event".to_string(),
        vec!["entertainment".to_string(), "location".to_string()],
    );
    routing.insert(
        "article:blotter".to_string(),
        vec!["crime".to_string(), "location".to_string()],
    );
    routing.insert(
        "article:report".to_string(),
        vec![
            "mining".to_string(),
            "coforge".to_string(),
            "location".to_string(),
        ],
    );
    routing.insert("page".to_string(), Vec::new());
    routing.insert("video".to_string(), Vec::new());
    routing.insert("image".to_string(), Vec::new());
    routing.insert("job".to_string(), Vec::new());
    routing
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub cors_enabled: bool,
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// Wall-clock budget for one classify request (ms)
    #[serde(default = "default_request_deadline_ms")]
    pub request_deadline_ms: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8085
}

fn default_request_deadline_ms() -> u64 {
    30_000
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_enabled: false,
            cors_origins: Vec::new(),
            request_deadline_ms: default_request_deadline_ms(),
        }
    }
}

/// Classification pipeline settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationSettings {
    #[serde(default = "default_min_word_count")]
    pub min_word_count: u32,
    #[serde(default = "default_optimal_word_count")]
    pub optimal_word_count: u32,
    /// Write reputation observations back after each classification
    #[serde(default = "default_true")]
    pub update_reputation: bool,
}

fn default_min_word_count() -> u32 {
    quality::MIN_WORD_COUNT
}

fn default_optimal_word_count() -> u32 {
    quality::OPTIMAL_WORD_COUNT
}

fn default_true() -> bool {
    true
}

impl Default for ClassificationSettings {
    fn default() -> Self {
        Self {
            min_word_count: default_min_word_count(),
            optimal_word_count: default_optimal_word_count(),
            update_reputation: true,
        }
    }
}

/// Source reputation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReputationSettings {
    #[serde(default = "default_reputation_score")]
    pub default_score: u8,
    #[serde(default = "default_spam_threshold")]
    pub spam_threshold: u8,
    #[serde(default = "default_decay_rate")]
    pub decay_rate: f64,
    #[serde(default = "default_min_articles_for_trust")]
    pub min_articles_for_trust: u64,
}

fn default_reputation_score() -> u8 {
    reputation::DEFAULT_SCORE
}

fn default_spam_threshold() -> u8 {
    reputation::SPAM_THRESHOLD
}

fn default_decay_rate() -> f64 {
    reputation::DECAY_RATE
}

fn default_min_articles_for_trust() -> u64 {
    reputation::MIN_ARTICLES_FOR_TRUST
}

impl Default for ReputationSettings {
    fn default() -> Self {
        Self {
            default_score: default_reputation_score(),
            spam_threshold: default_spam_threshold(),
            decay_rate: default_decay_rate(),
            min_articles_for_trust: default_min_articles_for_trust(),
        }
    }
}

/// One ML sidecar endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SidecarEndpoint {
    #[serde(default = "default_true")]
    pub enabled: bool,
    pub base_url: String,
}

/// ML sidecar settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SidecarSettings {
    #[serde(default)]
    pub crime: Option<SidecarEndpoint>,
    #[serde(default)]
    pub mining: Option<SidecarEndpoint>,
    #[serde(default)]
    pub coforge: Option<SidecarEndpoint>,
    #[serde(default)]
    pub entertainment: Option<SidecarEndpoint>,
    #[serde(default)]
    pub anishinaabe: Option<SidecarEndpoint>,
    /// Per-call ML request timeout (ms)
    #[serde(default = "default_sidecar_timeout_ms")]
    pub request_timeout_ms: u64,
}

fn default_sidecar_timeout_ms() -> u64 {
    sidecars::REQUEST_TIMEOUT_MS
}

impl Default for SidecarSettings {
    fn default() -> Self {
        Self {
            crime: None,
            mining: None,
            coforge: None,
            entertainment: None,
            anishinaabe: None,
            request_timeout_ms: default_sidecar_timeout_ms(),
        }
    }
}

impl Settings {
    /// Load settings from layered files plus environment overrides
    ///
    /// Layering: `config/default.toml`, then `config/{environment}.toml`,
    /// then `NEWSFLOW_`-prefixed environment variables (`__` separates
    /// nesting, e.g. `NEWSFLOW_SERVER__PORT=9000`).
    pub fn load(environment: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder =
            Config::builder().add_source(File::with_name("config/default").required(false));

        if let Some(env) = environment {
            builder =
                builder.add_source(File::with_name(&format!("config/{}", env)).required(false));
        }

        let settings: Settings = builder
            .add_source(Environment::with_prefix("NEWSFLOW").separator("__"))
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    /// Validate settings for internal consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("server.port must be non-zero".into()));
        }
        if self.classification.min_word_count >= self.classification.optimal_word_count {
            return Err(ConfigError::Validation(
                "classification.min_word_count must be below optimal_word_count".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.reputation.decay_rate) {
            return Err(ConfigError::Validation(
                "reputation.decay_rate must be within 0..=1".into(),
            ));
        }
        if self.reputation.spam_threshold > 100 {
            return Err(ConfigError::Validation(
                "reputation.spam_threshold must be within 0..=100".into(),
            ));
        }
        if self.sidecars.request_timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "sidecars.request_timeout_ms must be non-zero".into(),
            ));
        }
        for endpoint in [
            &self.sidecars.crime,
            &self.sidecars.mining,
            &self.sidecars.coforge,
            &self.sidecars.entertainment,
            &self.sidecars.anishinaabe,
        ]
        .into_iter()
        .flatten()
        {
            if endpoint.enabled && endpoint.base_url.is_empty() {
                return Err(ConfigError::Validation(
                    "sidecar endpoint enabled without a base_url".into(),
                ));
            }
        }
        Ok(())
    }
}
