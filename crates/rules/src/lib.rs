//! Keyword rule engine
//!
//! Matches documents against keyword rules in a single linear pass over the
//! text using an Aho-Corasick automaton. The full rule set can be replaced
//! at runtime; match calls observe either the old automaton or the new one,
//! never a partial rebuild.

pub mod engine;

pub use engine::{RuleEngine, RuleMatch};
