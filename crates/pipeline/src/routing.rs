//! Sidecar routing table
//!
//! Maps a content type (`article`) or composite key (`article:event`) to
//! the sidecars that run for it. An explicitly empty list means "run no
//! sidecars for this content"; a missing key makes the orchestrator warn
//! and run none.

use std::collections::{BTreeMap, HashSet};

/// Sidecar names the routing table may reference
pub const KNOWN_SIDECARS: &[&str] = &[
    "crime",
    "mining",
    "coforge",
    "entertainment",
    "anishinaabe",
    "location",
];

/// Content-type to sidecar routing
#[derive(Debug, Clone)]
pub struct RoutingTable {
    routes: BTreeMap<String, Vec<String>>,
}

impl RoutingTable {
    /// Build a routing table, warning about unknown sidecar names
    pub fn new(routes: BTreeMap<String, Vec<String>>) -> Self {
        for (key, sidecars) in &routes {
            for name in sidecars {
                if !KNOWN_SIDECARS.contains(&name.as_str()) {
                    tracing::warn!(
                        route = %key,
                        sidecar = %name,
                        "Routing table references an unknown sidecar"
                    );
                }
            }
        }
        Self { routes }
    }

    /// Look up the sidecar list for a (content type, subtype) pair
    ///
    /// A composite `type:subtype` entry wins over the bare type entry.
    /// `None` means no entry exists at all.
    pub fn lookup(&self, content_type: &str, subtype: &str) -> Option<&[String]> {
        if !subtype.is_empty() {
            let composite = format!("{}:{}", content_type, subtype);
            if let Some(sidecars) = self.routes.get(&composite) {
                return Some(sidecars.as_slice());
            }
        }
        self.routes.get(content_type).map(|s| s.as_slice())
    }

    /// Every sidecar name referenced anywhere in the table
    pub fn routed_names(&self) -> HashSet<&str> {
        self.routes
            .values()
            .flatten()
            .map(|s| s.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RoutingTable {
        let mut routes = BTreeMap::new();
        routes.insert(
            "article".to_string(),
            vec!["crime".to_string(), "location".to_string()],
        );
        routes.insert(
            "article:event".to_string(),
            vec!["entertainment".to_string()],
        );
        routes.insert("page".to_string(), Vec::new());
        RoutingTable::new(routes)
    }

    #[test]
    fn test_composite_key_wins() {
        let table = table();
        let routed = table.lookup("article", "event").unwrap();
        assert_eq!(routed, ["entertainment".to_string()]);
    }

    #[test]
    fn test_subtype_without_entry_falls_back() {
        let table = table();
        let routed = table.lookup("article", "blotter").unwrap();
        assert_eq!(routed.len(), 2);
    }

    #[test]
    fn test_explicit_empty_vs_missing() {
        let table = table();
        assert_eq!(table.lookup("page", "").unwrap().len(), 0);
        assert!(table.lookup("video", "").is_none());
    }

    #[test]
    fn test_routed_names() {
        let table = table();
        let names = table.routed_names();
        assert!(names.contains("crime"));
        assert!(names.contains("entertainment"));
        assert!(!names.contains("mining"));
    }
}
