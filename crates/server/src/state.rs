//! Application state
//!
//! Shared state across all handlers.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;

use newsflow_config::Settings;
use newsflow_core::MlClassifier;
use newsflow_pipeline::ClassificationOrchestrator;
use newsflow_rules::RuleEngine;

/// Application state
#[derive(Clone)]
pub struct AppState {
    /// Settings wrapped for hot-reload
    pub config: Arc<RwLock<Settings>>,
    pub orchestrator: Arc<ClassificationOrchestrator>,
    /// Shared rule engine, swapped on admin reload
    pub rule_engine: Arc<RuleEngine>,
    /// Configured ML sidecar clients, for readiness checks
    pub ml_clients: Arc<Vec<Arc<dyn MlClassifier>>>,
}

impl AppState {
    /// Wall-clock budget for one classify request
    pub fn request_deadline(&self) -> Duration {
        Duration::from_millis(self.config.read().server.request_deadline_ms)
    }

    /// Path of the rule file for admin reloads
    pub fn rules_path(&self) -> String {
        self.config.read().rules_path.clone()
    }
}
