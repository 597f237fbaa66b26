use std::{
    collections::HashMap,
    sync::{Arc, Mutex, RwLock},
};

use tracing::{debug, info, warn};

use surety_common::{
    utils::time::current_time, FlightKey, OperatingContext, Principal, Result, StatusCode,
};

use super::{
    evaluator::{OraclePolicy, ResponseEvaluator},
    request::{FlightStatusRequest, IgnoreReason, SubmitOutcome},
};
use crate::directory::{index_source::IndexSource, OracleDirectory};

/// Collects oracle answers per flight and fixes the final status.
///
/// The request table lock is only held to find or insert an entry; answers
/// are recorded under that request's own mutex, so different flights never
/// contend and answers for one flight are applied one at a time.
pub struct OracleConsensusEngine {
    requests: RwLock<HashMap<FlightKey, Arc<Mutex<FlightStatusRequest>>>>,
    directory: Arc<OracleDirectory>,
    source: Arc<dyn IndexSource>,
    evaluator: ResponseEvaluator,
    policy: OraclePolicy,
}

impl std::fmt::Debug for OracleConsensusEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OracleConsensusEngine")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl OracleConsensusEngine {
    pub fn new(policy: OraclePolicy, directory: Arc<OracleDirectory>, source: Arc<dyn IndexSource>) -> Self {
        Self {
            requests: RwLock::new(HashMap::new()),
            directory,
            source,
            evaluator: ResponseEvaluator::new(policy.min_responses),
            policy,
        }
    }

    pub fn directory(&self) -> &Arc<OracleDirectory> {
        &self.directory
    }

    pub fn policy(&self) -> &OraclePolicy {
        &self.policy
    }

    pub fn open_request(&self, ctx: &OperatingContext, key: FlightKey) -> Result<u8> {
        self.open_request_at(ctx, key, current_time())
    }

    /// Opens a status query and returns the index oracles must hold to answer.
    ///
    /// Re-opening a live or resolved request returns its index unchanged. An
    /// expired, unresolved request is replaced by a fresh one.
    pub fn open_request_at(&self, ctx: &OperatingContext, key: FlightKey, now: u64) -> Result<u8> {
        ctx.require_operational()?;

        let mut requests = self.requests.write()?;
        if let Some(existing) = requests.get(&key) {
            let existing = existing.lock()?;
            if !existing.is_expired(now, self.policy.request_ttl_secs) {
                debug!("Request {} already open with index {}", key, existing.requested_index);
                return Ok(existing.requested_index);
            }
            info!("⌛ Request {} expired unresolved, opening a new one", key);
        }

        let index = self.source.draw(self.directory.index_range())?;
        requests.insert(
            key.clone(),
            Arc::new(Mutex::new(FlightStatusRequest::new(key.clone(), index, now))),
        );
        info!("📡 Status request opened for {} on index {}", key, index);
        Ok(index)
    }

    pub fn submit_response(
        &self,
        ctx: &OperatingContext,
        principal: &Principal,
        index: u8,
        key: &FlightKey,
        status: StatusCode,
    ) -> Result<SubmitOutcome> {
        self.submit_response_at(ctx, principal, index, key, status, current_time())
    }

    /// Records one oracle's answer.
    ///
    /// Fails with `Unauthorized` when the oracle does not hold `index`. Every
    /// other mismatch is reported as [`SubmitOutcome::Ignored`].
    pub fn submit_response_at(
        &self,
        ctx: &OperatingContext,
        principal: &Principal,
        index: u8,
        key: &FlightKey,
        status: StatusCode,
        now: u64,
    ) -> Result<SubmitOutcome> {
        ctx.require_operational()?;
        self.directory.authorize(principal, index)?;

        let entry = {
            let requests = self.requests.read()?;
            requests.get(key).cloned()
        };
        let Some(entry) = entry else {
            debug!("{} answered unknown request {}", principal, key);
            return Ok(SubmitOutcome::Ignored(IgnoreReason::NoSuchRequest));
        };

        let mut request = entry.lock()?;

        if request.is_resolved() {
            return Ok(SubmitOutcome::Ignored(IgnoreReason::AlreadyResolved));
        }
        if request.requested_index != index {
            debug!(
                "{} answered {} on index {}, request wants {}",
                principal, key, index, request.requested_index
            );
            return Ok(SubmitOutcome::Ignored(IgnoreReason::IndexMismatch));
        }
        if request.is_expired(now, self.policy.request_ttl_secs) {
            return Ok(SubmitOutcome::Ignored(IgnoreReason::Expired));
        }

        let Some(responses) = request.responses.register_response(principal.clone(), status) else {
            warn!("⚠️ {} already answered {}, ignoring {}", principal, key, status);
            return Ok(SubmitOutcome::Ignored(IgnoreReason::AlreadyResponded));
        };
        info!("📥 Oracle {} reported {} for {} ({} so far)", principal, status, key, responses);

        match self.evaluator.evaluate(&request.responses) {
            Some(final_status) => {
                request.final_status = Some(final_status);
                request.resolved_at = Some(now);
                info!("🎉 Request {} resolved: {}", key, final_status);
                Ok(SubmitOutcome::Resolved(final_status))
            }
            None => Ok(SubmitOutcome::Accepted { status, responses }),
        }
    }

    /// Snapshot of a request.
    pub fn get_request(&self, key: &FlightKey) -> Result<Option<FlightStatusRequest>> {
        let entry = {
            let requests = self.requests.read()?;
            requests.get(key).cloned()
        };
        match entry {
            Some(entry) => Ok(Some(entry.lock()?.clone())),
            None => Ok(None),
        }
    }

    pub fn final_status(&self, key: &FlightKey) -> Result<Option<StatusCode>> {
        Ok(self.get_request(key)?.and_then(|r| r.final_status))
    }

    pub fn open_requests(&self) -> Result<usize> {
        let requests = self.requests.read()?;
        let mut open = 0;
        for entry in requests.values() {
            if !entry.lock()?.is_resolved() {
                open += 1;
            }
        }
        Ok(open)
    }

    /// Drops expired unresolved requests and resolved ones past retention.
    /// Returns how many were removed.
    pub fn prune(&self, now: u64) -> Result<usize> {
        let ttl = self.policy.request_ttl_secs;
        let mut requests = self.requests.write()?;
        let before = requests.len();

        let mut stale = Vec::new();
        for (key, entry) in requests.iter() {
            if entry.lock()?.is_stale(now, ttl) {
                stale.push(key.clone());
            }
        }
        for key in &stale {
            requests.remove(key);
        }

        let removed = before - requests.len();
        if removed > 0 {
            info!("🧹 Pruned {} stale status requests", removed);
        }
        Ok(removed)
    }
}
