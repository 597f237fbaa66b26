use serde::{Deserialize, Serialize};
use surety_common::{Amount, ETHER};

/// Rules for admitting new airlines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdmissionPolicy {
    /// Below this many registered airlines a funded airline admits others alone.
    pub multiparty_threshold: usize,
    /// Minimum stake an airline deposits before it may govern.
    pub min_funding: Amount,
}

impl Default for AdmissionPolicy {
    fn default() -> Self {
        Self {
            multiparty_threshold: 4,
            min_funding: 10 * ETHER,
        }
    }
}

impl AdmissionPolicy {
    pub fn requires_vote(&self, registered: usize) -> bool {
        registered >= self.multiparty_threshold
    }

    /// Half of the registered airlines, rounded up.
    pub fn quorum(&self, registered: usize) -> usize {
        (registered + 1) / 2
    }
}
