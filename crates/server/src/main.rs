//! newsflow classification service entry point

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use parking_lot::RwLock;
use tracing_subscriber::EnvFilter;

use newsflow_classify::QualityConfig;
use newsflow_config::{load_rule_file, Settings, SidecarEndpoint};
use newsflow_core::MlClassifier;
use newsflow_pipeline::{
    ClassificationOrchestrator, OrchestratorConfig, RoutingTable, SidecarSet,
};
use newsflow_reputation::{InMemoryReputationStore, ReputationConfig, ReputationScorer};
use newsflow_rules::RuleEngine;
use newsflow_sidecars::{
    AnishinaabeSidecar, CoforgeSidecar, CrimeSidecar, EntertainmentSidecar, HttpMlClassifier,
    MiningSidecar, MlClientConfig,
};
use newsflow_server::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    newsflow_server::metrics::init_metrics();

    let environment = std::env::var("NEWSFLOW_ENV").ok();
    let settings = Settings::load(environment.as_deref()).context("loading settings")?;
    tracing::info!(environment = ?settings.environment, "Starting newsflow classifier");

    // Rule engine: start from the rule file when present, empty otherwise
    let rules = match load_rule_file(&settings.rules_path) {
        Ok(file) => file.rules,
        Err(error) => {
            tracing::warn!(
                path = %settings.rules_path,
                error = %error,
                "Rule file unavailable; starting with an empty rule set"
            );
            Vec::new()
        }
    };
    let rule_engine = Arc::new(RuleEngine::new(rules));

    // ML sidecar clients
    let timeout = Duration::from_millis(settings.sidecars.request_timeout_ms);
    let build_client = |name: &str, endpoint: &Option<SidecarEndpoint>| -> Option<Arc<dyn MlClassifier>> {
        let endpoint = endpoint.as_ref().filter(|e| e.enabled)?;
        match HttpMlClassifier::new(
            MlClientConfig::new(name, endpoint.base_url.clone()).with_timeout(timeout),
        ) {
            Ok(client) => Some(Arc::new(client)),
            Err(error) => {
                tracing::error!(sidecar = name, error = %error, "Failed to build ML client");
                None
            }
        }
    };
    let crime_ml = build_client("crime", &settings.sidecars.crime);
    let mining_ml = build_client("mining", &settings.sidecars.mining);
    let coforge_ml = build_client("coforge", &settings.sidecars.coforge);
    let entertainment_ml = build_client("entertainment", &settings.sidecars.entertainment);
    let anishinaabe_ml = build_client("anishinaabe", &settings.sidecars.anishinaabe);
    let ml_clients: Vec<Arc<dyn MlClassifier>> = [
        &crime_ml,
        &mining_ml,
        &coforge_ml,
        &entertainment_ml,
        &anishinaabe_ml,
    ]
    .into_iter()
    .flatten()
    .cloned()
    .collect();

    let sidecars = SidecarSet {
        crime: Some(Arc::new(CrimeSidecar::new(crime_ml))),
        mining: Some(Arc::new(MiningSidecar::new(mining_ml))),
        coforge: Some(Arc::new(CoforgeSidecar::new(coforge_ml))),
        entertainment: Some(Arc::new(EntertainmentSidecar::new(entertainment_ml))),
        anishinaabe: Some(Arc::new(AnishinaabeSidecar::new(anishinaabe_ml))),
    };

    let reputation = Arc::new(ReputationScorer::new(
        Arc::new(InMemoryReputationStore::new()),
        ReputationConfig {
            default_score: settings.reputation.default_score,
            spam_threshold: settings.reputation.spam_threshold,
            decay_rate: settings.reputation.decay_rate,
            min_articles_for_trust: settings.reputation.min_articles_for_trust,
        },
    ));

    let orchestrator = Arc::new(ClassificationOrchestrator::new(
        Arc::clone(&rule_engine),
        reputation,
        sidecars,
        RoutingTable::new(settings.routing.clone()),
        OrchestratorConfig {
            classifier_version: env!("CARGO_PKG_VERSION").to_string(),
            update_reputation: settings.classification.update_reputation,
            quality: QualityConfig {
                min_word_count: settings.classification.min_word_count,
                optimal_word_count: settings.classification.optimal_word_count,
            },
        },
    ));

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let state = AppState {
        config: Arc::new(RwLock::new(settings)),
        orchestrator,
        rule_engine,
        ml_clients: Arc::new(ml_clients),
    };

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    tracing::info!(%addr, "Listening");
    axum::serve(listener, create_router(state))
        .await
        .context("serving")?;
    Ok(())
}
