use std::collections::HashMap;

use surety_common::{Principal, Result, SuretyError};

use super::airline::Airline;

/// Append-only table of airlines keyed by identity.
///
/// Pure state transitions; callers are responsible for serializing access.
#[derive(Default, Debug, Clone)]
pub struct MembershipRegistry {
    airlines: HashMap<Principal, Airline>,
    registered: usize,
}

impl MembershipRegistry {
    pub fn new() -> Self {
        Self {
            airlines: HashMap::new(),
            registered: 0,
        }
    }

    pub fn get_airline(&self, identity: &Principal) -> Result<&Airline> {
        self.airlines
            .get(identity)
            .ok_or_else(|| SuretyError::NotFound(format!("airline {}", identity)))
    }

    pub fn contains(&self, identity: &Principal) -> bool {
        self.airlines.contains_key(identity)
    }

    /// Creates a pending entry. No-op returning `false` when the identity is already known.
    pub fn record_airline(&mut self, identity: Principal, name: String) -> bool {
        if self.airlines.contains_key(&identity) {
            return false;
        }
        self.airlines
            .insert(identity.clone(), Airline::pending(identity, name));
        true
    }

    /// Adds a voter to a pending airline and returns the confirmation count.
    /// Voting twice leaves the count unchanged.
    pub fn add_confirmation(&mut self, identity: &Principal, voter: Principal) -> Result<usize> {
        let airline = self
            .airlines
            .get_mut(identity)
            .ok_or_else(|| SuretyError::NotFound(format!("airline {}", identity)))?;

        if airline.registered {
            return Err(SuretyError::AlreadyRegistered(format!("airline {}", identity)));
        }

        airline.confirmations.insert(voter);
        Ok(airline.confirmations.len())
    }

    /// Marks an airline as registered and discards its votes.
    pub fn admit(&mut self, identity: &Principal) -> Result<()> {
        let airline = self
            .airlines
            .get_mut(identity)
            .ok_or_else(|| SuretyError::NotFound(format!("airline {}", identity)))?;

        if airline.registered {
            return Err(SuretyError::AlreadyRegistered(format!("airline {}", identity)));
        }

        airline.registered = true;
        airline.confirmations.clear();
        self.registered += 1;
        Ok(())
    }

    /// Records the stake deposit. Returns `false` when the airline was already funded.
    pub fn mark_funded(&mut self, identity: &Principal) -> Result<bool> {
        match self.airlines.get_mut(identity) {
            Some(airline) if airline.registered => {
                let newly = !airline.funded;
                airline.funded = true;
                Ok(newly)
            }
            _ => Err(SuretyError::NotRegistered(format!("airline {}", identity))),
        }
    }

    pub fn is_funded(&self, identity: &Principal) -> bool {
        self.airlines
            .get(identity)
            .map(|a| a.can_govern())
            .unwrap_or(false)
    }

    pub fn is_registered(&self, identity: &Principal) -> bool {
        self.airlines
            .get(identity)
            .map(|a| a.registered)
            .unwrap_or(false)
    }

    /// Number of registered airlines; pending entries are not counted.
    pub fn count(&self) -> usize {
        self.registered
    }

    pub fn all(&self) -> impl Iterator<Item = &Airline> {
        self.airlines.values()
    }
}
