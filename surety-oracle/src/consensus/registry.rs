use std::collections::{BTreeMap, BTreeSet};

use surety_common::{Principal, StatusCode};

/// Answers collected for one request, grouped by status code.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ResponseRegistry {
    // StatusCode -> responders, iterated in enumeration order
    responses: BTreeMap<StatusCode, BTreeSet<Principal>>,
    responders: BTreeSet<Principal>,
}

impl ResponseRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an answer and returns the size of its code's set.
    /// `None` when the principal already answered this request, whatever the code.
    pub fn register_response(&mut self, principal: Principal, code: StatusCode) -> Option<usize> {
        if !self.responders.insert(principal.clone()) {
            return None;
        }
        let set = self.responses.entry(code).or_default();
        set.insert(principal);
        Some(set.len())
    }

    pub fn has_responded(&self, principal: &Principal) -> bool {
        self.responders.contains(principal)
    }

    pub fn count(&self, code: StatusCode) -> usize {
        self.responses.get(&code).map(|s| s.len()).unwrap_or(0)
    }

    /// `(code, count)` pairs in enumeration order.
    pub fn tally(&self) -> impl Iterator<Item = (StatusCode, usize)> + '_ {
        self.responses.iter().map(|(code, set)| (*code, set.len()))
    }

    pub fn total(&self) -> usize {
        self.responders.len()
    }
}
