use surety_common::{FlightKey, StatusCode};

use super::registry::ResponseRegistry;

/// One in-flight status query. Frozen once `final_status` is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlightStatusRequest {
    pub key: FlightKey,
    pub requested_index: u8,
    pub opened_at: u64,
    pub responses: ResponseRegistry,
    pub final_status: Option<StatusCode>,
    pub resolved_at: Option<u64>,
}

impl FlightStatusRequest {
    pub fn new(key: FlightKey, requested_index: u8, opened_at: u64) -> Self {
        Self {
            key,
            requested_index,
            opened_at,
            responses: ResponseRegistry::new(),
            final_status: None,
            resolved_at: None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.final_status.is_some()
    }

    /// An unresolved request past its lifetime. Resolved requests never expire.
    pub fn is_expired(&self, now: u64, ttl: Option<u64>) -> bool {
        match ttl {
            Some(ttl) => !self.is_resolved() && now > self.opened_at.saturating_add(ttl),
            None => false,
        }
    }

    /// Eligible for garbage collection.
    pub(crate) fn is_stale(&self, now: u64, ttl: Option<u64>) -> bool {
        let Some(ttl) = ttl else { return false };
        match self.resolved_at {
            Some(resolved_at) => now > resolved_at.saturating_add(ttl),
            None => self.is_expired(now, Some(ttl)),
        }
    }
}

/// Why a response was dropped. None of these are failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    NoSuchRequest,
    AlreadyResolved,
    IndexMismatch,
    AlreadyResponded,
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Accepted { status: StatusCode, responses: usize },
    Ignored(IgnoreReason),
    Resolved(StatusCode),
}
