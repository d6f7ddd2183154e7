//! Logical API requests.
//!
//! # Responsibilities
//! - Describe one upstream call as endpoint + parameters
//! - Derive the cache key used for deduplication
//! - Render parameters as query pairs for the transport
//!
//! # Design Decisions
//! - Parameters live in a `BTreeMap`, so iteration order is always sorted
//! - Two requests are the same request iff their keys are equal

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cache::request_key;

/// A GET against `endpoint` with query parameters.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ApiRequest {
    pub endpoint: String,
    pub params: BTreeMap<String, Value>,
}

impl ApiRequest {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            params: BTreeMap::new(),
        }
    }

    /// Add or replace a parameter.
    pub fn param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Stable key for caching this request.
    pub fn cache_key(&self) -> String {
        request_key(&self.endpoint, &self.params)
    }

    /// Parameters as query string pairs. Strings are sent verbatim, other
    /// values as their JSON text; nulls are skipped.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        self.params
            .iter()
            .filter(|(_, value)| !value.is_null())
            .map(|(name, value)| {
                let rendered = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (name.clone(), rendered)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order_does_not_change_key() {
        let a = ApiRequest::new("search").param("q", "serde").param("page", 2);
        let b = ApiRequest::new("search").param("page", 2).param("q", "serde");
        assert_eq!(a, b);
        assert_eq!(a.cache_key(), b.cache_key());
        assert_ne!(a.cache_key(), ApiRequest::new("search").cache_key());
    }

    #[test]
    fn test_query_pairs() {
        let request = ApiRequest::new("search")
            .param("q", "tokio")
            .param("page", 3)
            .param("exact", true)
            .param("sort", Value::Null);

        assert_eq!(
            request.query_pairs(),
            vec![
                ("exact".to_string(), "true".to_string()),
                ("page".to_string(), "3".to_string()),
                ("q".to_string(), "tokio".to_string()),
            ]
        );
    }
}
