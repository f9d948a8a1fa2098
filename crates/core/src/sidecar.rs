//! Domain sidecar result types
//!
//! Every sidecar shares the same three-valued relevance shape (`core_*`,
//! `peripheral_*`, `not_*`) but carries its own domain fields, so each
//! domain gets its own result struct rather than a shared class hierarchy.

use serde::{Deserialize, Serialize};

/// Three-valued domain relevance band shared by every sidecar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Relevance {
    /// The document is primarily about the domain
    Core,
    /// The domain appears in a secondary role
    Peripheral,
    /// No domain relevance
    Not,
}

impl Relevance {
    /// Band of a domain label string such as `core_mining` or `not_crime`
    pub fn from_label(label: &str) -> Self {
        let label = label.trim().to_ascii_lowercase();
        if label.starts_with("core") {
            Relevance::Core
        } else if label.starts_with("peripheral") {
            Relevance::Peripheral
        } else {
            Relevance::Not
        }
    }
}

/// Which branch of the hybrid decision matrix produced a sidecar result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionPath {
    BothAgree,
    RuleOverride,
    RulesOnly,
    MlOverride,
    MlUpgrade,
    Default,
}

impl DecisionPath {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionPath::BothAgree => "both_agree",
            DecisionPath::RuleOverride => "rule_override",
            DecisionPath::RulesOnly => "rules_only",
            DecisionPath::MlOverride => "ml_override",
            DecisionPath::MlUpgrade => "ml_upgrade",
            DecisionPath::Default => "default",
        }
    }
}

impl std::fmt::Display for DecisionPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

macro_rules! domain_relevance {
    ($name:ident, $core:ident => $core_str:literal, $peripheral:ident => $peripheral_str:literal, $not:ident => $not_str:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        pub enum $name {
            #[serde(rename = $core_str)]
            $core,
            #[serde(rename = $peripheral_str)]
            $peripheral,
            #[serde(rename = $not_str)]
            $not,
        }

        impl $name {
            pub fn band(&self) -> Relevance {
                match self {
                    $name::$core => Relevance::Core,
                    $name::$peripheral => Relevance::Peripheral,
                    $name::$not => Relevance::Not,
                }
            }

            pub fn from_band(band: Relevance) -> Self {
                match band {
                    Relevance::Core => $name::$core,
                    Relevance::Peripheral => $name::$peripheral,
                    Relevance::Not => $name::$not,
                }
            }

            pub fn as_str(&self) -> &'static str {
                match self {
                    $name::$core => $core_str,
                    $name::$peripheral => $peripheral_str,
                    $name::$not => $not_str,
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

domain_relevance!(CrimeRelevance,
    CoreStreetCrime => "core_street_crime",
    PeripheralCrime => "peripheral_crime",
    NotCrime => "not_crime");

domain_relevance!(MiningRelevance,
    CoreMining => "core_mining",
    PeripheralMining => "peripheral_mining",
    NotMining => "not_mining");

domain_relevance!(CoforgeRelevance,
    CoreCoforge => "core_coforge",
    PeripheralCoforge => "peripheral_coforge",
    NotCoforge => "not_coforge");

domain_relevance!(EntertainmentRelevance,
    CoreEntertainment => "core_entertainment",
    PeripheralEntertainment => "peripheral_entertainment",
    NotEntertainment => "not_entertainment");

domain_relevance!(AnishinaabeRelevance,
    CoreAnishinaabe => "core_anishinaabe",
    PeripheralAnishinaabe => "peripheral_anishinaabe",
    NotAnishinaabe => "not_anishinaabe");

/// Crime sidecar result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrimeResult {
    pub relevance: CrimeRelevance,
    /// Final merged confidence, 0..=1
    pub confidence: f32,
    /// Crime categories detected (`violent_crime`, `property_crime`, ...)
    #[serde(default)]
    pub crime_types: Vec<String>,
    /// Site category pages this document belongs on
    #[serde(default)]
    pub category_pages: Vec<String>,
    /// Peripheral sub-label: `criminal_justice` or `crime_context`.
    /// Always empty for core and not-crime documents.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub sub_label: String,
    pub homepage_eligible: bool,
    pub review_required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_version: Option<String>,
    pub decision_path: DecisionPath,
    /// Raw ML confidence before merging, when the ML sidecar answered
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ml_confidence: Option<f32>,
    pub processing_time_ms: u64,
}

/// Mining sidecar result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MiningResult {
    pub relevance: MiningRelevance,
    pub confidence: f32,
    /// Commodities mentioned (nickel, gold, copper, ...)
    #[serde(default)]
    pub commodities: Vec<String>,
    /// Project stage reported by the ML sidecar (exploration, production, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mining_stage: Option<String>,
    pub review_required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_version: Option<String>,
    pub decision_path: DecisionPath,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ml_confidence: Option<f32>,
    pub processing_time_ms: u64,
}

/// Corporate-development (coforge) sidecar result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoforgeResult {
    pub relevance: CoforgeRelevance,
    pub confidence: f32,
    /// Audience segments from the ML sidecar
    #[serde(default)]
    pub audience: Vec<String>,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub industries: Vec<String>,
    pub review_required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_version: Option<String>,
    pub decision_path: DecisionPath,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ml_confidence: Option<f32>,
    pub processing_time_ms: u64,
}

/// Entertainment sidecar result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntertainmentResult {
    pub relevance: EntertainmentRelevance,
    pub confidence: f32,
    #[serde(default)]
    pub categories: Vec<String>,
    pub homepage_eligible: bool,
    pub review_required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_version: Option<String>,
    pub decision_path: DecisionPath,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ml_confidence: Option<f32>,
    pub processing_time_ms: u64,
}

/// Anishinaabe cultural-relevance sidecar result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnishinaabeResult {
    pub relevance: AnishinaabeRelevance,
    pub confidence: f32,
    #[serde(default)]
    pub topics: Vec<String>,
    pub review_required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_version: Option<String>,
    pub decision_path: DecisionPath,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ml_confidence: Option<f32>,
    pub processing_time_ms: u64,
}
