use serde::{Deserialize, Serialize};
use surety_common::StatusCode;

use super::registry::ResponseRegistry;

/// Tunables for oracle agreement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OraclePolicy {
    /// Indexes are drawn from `0..index_range`.
    pub index_range: u8,
    /// Matching answers needed before a status is accepted.
    pub min_responses: usize,
    /// Lifetime of an unresolved request, and retention of a resolved one.
    /// `None` keeps requests forever.
    pub request_ttl_secs: Option<u64>,
}

impl Default for OraclePolicy {
    fn default() -> Self {
        Self {
            index_range: 10,
            min_responses: 3,
            request_ttl_secs: Some(3600),
        }
    }
}

/// Decides whether a set of answers settles a request.
#[derive(Debug, Clone)]
pub struct ResponseEvaluator {
    min_responses: usize,
}

impl ResponseEvaluator {
    pub fn new(min_responses: usize) -> Self {
        Self { min_responses }
    }

    /// First code, in enumeration order, whose answers reach the threshold.
    pub fn evaluate(&self, registry: &ResponseRegistry) -> Option<StatusCode> {
        registry
            .tally()
            .find(|(_, count)| *count >= self.min_responses)
            .map(|(code, _)| code)
    }
}
