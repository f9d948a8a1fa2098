//! Classification rule file loading
//!
//! Rules live in a YAML file so editors can review and ship keyword
//! changes without a deploy. The file is re-read on the admin reload
//! endpoint and swapped into the rule engine atomically.

use serde::{Deserialize, Serialize};
use std::path::Path;

use newsflow_core::ClassificationRule;

use crate::ConfigError;

/// On-disk rule file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleFile {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub rules: Vec<ClassificationRule>,
}

fn default_version() -> String {
    "1".to_string()
}

/// Load and sanity-check a rule file
pub fn load_rule_file(path: impl AsRef<Path>) -> Result<RuleFile, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let file: RuleFile = serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })?;

    for rule in &file.rules {
        if rule.name.is_empty() {
            return Err(ConfigError::Validation(format!(
                "rule {} has an empty name",
                rule.id
            )));
        }
        if !(0.0..=1.0).contains(&rule.min_confidence) {
            return Err(ConfigError::Validation(format!(
                "rule '{}' min_confidence {} outside 0..=1",
                rule.name, rule.min_confidence
            )));
        }
        if rule.enabled && rule.keywords.iter().all(|k| k.trim().is_empty()) {
            tracing::warn!(rule = %rule.name, "Enabled rule has no usable keywords");
        }
    }

    tracing::info!(
        path = %path.display(),
        rules = file.rules.len(),
        "Loaded rule file"
    );
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_rule_file() {
        let file = write_temp(
            r#"
version: "3"
rules:
  - id: 1
    name: crime
    rule_type: topic
    topic: crime
    keywords: [police, arrest, charged]
    min_confidence: 0.4
    priority: 5
  - id: 2
    name: mining
    rule_type: topic
    keywords: [nickel, ore]
    min_confidence: 0.3
    enabled: false
"#,
        );
        let loaded = load_rule_file(file.path()).unwrap();
        assert_eq!(loaded.version, "3");
        assert_eq!(loaded.rules.len(), 2);
        assert!(loaded.rules[0].enabled);
        assert!(!loaded.rules[1].enabled);
        assert_eq!(loaded.rules[0].priority, 5);
    }

    #[test]
    fn test_rejects_bad_confidence() {
        let file = write_temp(
            r#"
rules:
  - id: 1
    name: broken
    rule_type: topic
    keywords: [x]
    min_confidence: 1.5
"#,
        );
        assert!(load_rule_file(file.path()).is_err());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_rule_file("/nonexistent/rules.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
