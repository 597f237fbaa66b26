use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use crate::error::{Result, SuretyError};
use crate::utils::Principal;

/// Capability handed to every mutating call, carrying the operational gate.
///
/// Clones share the same gate. It starts open; the governance layer's
/// guarded `set_operating_status` is the only caller of [`Self::set_operational`].
#[derive(Debug, Clone)]
pub struct OperatingContext {
    operational: Arc<AtomicBool>,
    owner: Principal,
}

impl OperatingContext {
    pub fn new(owner: Principal) -> Self {
        Self {
            operational: Arc::new(AtomicBool::new(true)),
            owner,
        }
    }

    pub fn is_operational(&self) -> bool {
        self.operational.load(Ordering::SeqCst)
    }

    /// Fails fast with `NotOperational` when the gate is closed.
    pub fn require_operational(&self) -> Result<()> {
        if self.is_operational() {
            Ok(())
        } else {
            Err(SuretyError::NotOperational)
        }
    }

    pub fn is_owner(&self, caller: &Principal) -> bool {
        &self.owner == caller
    }

    /// Returns the previous value.
    pub fn set_operational(&self, value: bool) -> bool {
        self.operational.swap(value, Ordering::SeqCst)
    }
}
