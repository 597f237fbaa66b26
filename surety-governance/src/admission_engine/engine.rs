use std::sync::RwLock;

use tracing::{debug, info, warn};

use surety_common::{Amount, OperatingContext, Principal, Result, SuretyError};

use super::policy::AdmissionPolicy;
use crate::airline_core::{airline::Airline, registry::MembershipRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    AlreadyRegistered,
}

/// Result of a registration request or vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmissionOutcome {
    Registered,
    Pending { confirmations: usize, quorum: usize },
    Rejected(RejectReason),
}

/// Decides whether a registration is accepted on the spot or needs votes,
/// tallies those votes and admits the airline once quorum is met.
///
/// Each decision runs under one write guard: the registered count, the vote
/// and the transition are observed and applied together.
#[derive(Debug)]
pub struct AdmissionEngine {
    registry: RwLock<MembershipRegistry>,
    policy: AdmissionPolicy,
}

impl AdmissionEngine {
    pub fn new(policy: AdmissionPolicy) -> Self {
        Self {
            registry: RwLock::new(MembershipRegistry::new()),
            policy,
        }
    }

    /// Seeds the registry with the airline registered at deployment. It still has to fund itself.
    pub fn with_founder(policy: AdmissionPolicy, founder: Principal, name: impl Into<String>) -> Result<Self> {
        let mut registry = MembershipRegistry::new();
        registry.record_airline(founder.clone(), name.into());
        registry.admit(&founder)?;
        info!("🛫 Founding airline {} registered", founder);

        Ok(Self {
            registry: RwLock::new(registry),
            policy,
        })
    }

    pub fn policy(&self) -> &AdmissionPolicy {
        &self.policy
    }

    pub fn register_airline(
        &self,
        ctx: &OperatingContext,
        requester: &Principal,
        new_identity: Principal,
        name: impl Into<String>,
    ) -> Result<AdmissionOutcome> {
        ctx.require_operational()?;

        let mut registry = self.registry.write()?;

        if !registry.is_funded(requester) {
            warn!("⛔ {} tried to register {} without funding", requester, new_identity);
            return Err(SuretyError::RequesterNotFunded(requester.clone()));
        }

        if registry.is_registered(&new_identity) {
            debug!("Airline {} already registered, ignoring request from {}", new_identity, requester);
            return Ok(AdmissionOutcome::Rejected(RejectReason::AlreadyRegistered));
        }

        // Quorum follows the membership at the moment of this vote
        let n = registry.count();
        registry.record_airline(new_identity.clone(), name.into());

        if !self.policy.requires_vote(n) {
            registry.admit(&new_identity)?;
            info!("✅ Airline {} registered directly by {} ({} members)", new_identity, requester, n + 1);
            return Ok(AdmissionOutcome::Registered);
        }

        let confirmations = registry.add_confirmation(&new_identity, requester.clone())?;
        let quorum = self.policy.quorum(n);

        if confirmations >= quorum {
            registry.admit(&new_identity)?;
            info!(
                "✅ Airline {} admitted by vote: {}/{} confirmations",
                new_identity, confirmations, quorum
            );
            Ok(AdmissionOutcome::Registered)
        } else {
            info!(
                "🗳️ {} voted for {}: {}/{} confirmations",
                requester, new_identity, confirmations, quorum
            );
            Ok(AdmissionOutcome::Pending { confirmations, quorum })
        }
    }

    /// Deposits the airline's stake. Returns `true` the first time the airline becomes funded.
    pub fn fund(&self, ctx: &OperatingContext, caller: &Principal, value: Amount) -> Result<bool> {
        ctx.require_operational()?;

        if value < self.policy.min_funding {
            return Err(SuretyError::InsufficientValue {
                required: self.policy.min_funding,
                provided: value,
            });
        }

        let newly = self.registry.write()?.mark_funded(caller)?;
        if newly {
            info!("💰 Airline {} funded with {}", caller, value);
        }
        Ok(newly)
    }

    /// Opens or closes the gate. Only the owner or a funded airline may call it.
    /// Returns the previous value.
    pub fn set_operating_status(&self, ctx: &OperatingContext, caller: &Principal, value: bool) -> Result<bool> {
        let allowed = ctx.is_owner(caller) || self.registry.read()?.is_funded(caller);
        if !allowed {
            warn!("⛔ {} is not allowed to change the operating status", caller);
            return Err(SuretyError::Unauthorized(format!(
                "{} is neither the owner nor a funded airline",
                caller
            )));
        }

        let previous = ctx.set_operational(value);
        if previous != value {
            info!("🚦 Operating status set to {} by {}", value, caller);
        }
        Ok(previous)
    }

    pub fn get_airline(&self, identity: &Principal) -> Result<Airline> {
        self.registry.read()?.get_airline(identity).cloned()
    }

    pub fn is_funded(&self, identity: &Principal) -> Result<bool> {
        Ok(self.registry.read()?.is_funded(identity))
    }

    pub fn count(&self) -> Result<usize> {
        Ok(self.registry.read()?.count())
    }

    /// Registered airlines, sorted by identity.
    pub fn registered_airlines(&self) -> Result<Vec<Airline>> {
        let registry = self.registry.read()?;
        let mut airlines: Vec<Airline> = registry.all().filter(|a| a.registered).cloned().collect();
        airlines.sort_by(|a, b| a.identity.cmp(&b.identity));
        Ok(airlines)
    }
}
