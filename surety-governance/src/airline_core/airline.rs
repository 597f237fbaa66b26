use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use surety_common::Principal;

/// A governance participant.
///
/// An airline is either registered or pending; `confirmations` only holds
/// voters while the airline is pending below quorum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Airline {
    pub identity: Principal,
    pub name: String,
    pub registered: bool,
    pub funded: bool,
    pub confirmations: BTreeSet<Principal>,
}

impl Airline {
    pub fn pending(identity: Principal, name: String) -> Self {
        Self {
            identity,
            name,
            registered: false,
            funded: false,
            confirmations: BTreeSet::new(),
        }
    }

    pub fn is_pending(&self) -> bool {
        !self.registered
    }

    /// Funded airlines may register others, vote and toggle the gate.
    pub fn can_govern(&self) -> bool {
        self.registered && self.funded
    }
}
