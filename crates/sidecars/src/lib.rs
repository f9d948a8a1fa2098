//! Domain sidecars
//!
//! Each sidecar pairs a deterministic rule predicate with an optional ML
//! sidecar service and merges the two verdicts through a shared decision
//! matrix. Sidecars never mutate each other's state; each consumes only
//! the raw document and its own verdicts.

pub mod anishinaabe;
pub mod coforge;
pub mod common;
pub mod crime;
pub mod decision;
pub mod entertainment;
pub mod mining;
pub mod ml_client;
pub mod telemetry;

pub use anishinaabe::AnishinaabeSidecar;
pub use coforge::CoforgeSidecar;
pub use common::{truncate_body, RelevanceRules};
pub use crime::CrimeSidecar;
pub use decision::{decide, homepage_eligible, Decision, MlVerdict, RuleVerdict};
pub use entertainment::EntertainmentSidecar;
pub use mining::MiningSidecar;
pub use ml_client::{HttpMlClassifier, MlClientConfig};
