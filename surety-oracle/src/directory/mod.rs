//! Oracle directory.
//!
//! Every oracle receives three indexes when it registers. A status request
//! carries one index and only oracles holding it may answer.

pub mod index_source;

use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use serde::{Deserialize, Serialize};
use tracing::info;

use surety_common::{OperatingContext, OracleIndexes, Principal, Result, SuretyError};

use index_source::IndexSource;

pub use surety_common::INDEXES_PER_ORACLE;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleRegistration {
    pub principal: Principal,
    /// Fixed at registration. Draws are independent, so an index may repeat.
    pub indexes: OracleIndexes,
}

impl OracleRegistration {
    pub fn holds(&self, index: u8) -> bool {
        self.indexes.contains(&index)
    }
}

pub struct OracleDirectory {
    registrations: RwLock<HashMap<Principal, OracleRegistration>>,
    source: Arc<dyn IndexSource>,
    index_range: u8,
}

impl std::fmt::Debug for OracleDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OracleDirectory")
            .field("index_range", &self.index_range)
            .finish_non_exhaustive()
    }
}

impl OracleDirectory {
    pub fn new(source: Arc<dyn IndexSource>, index_range: u8) -> Self {
        Self {
            registrations: RwLock::new(HashMap::new()),
            source,
            index_range,
        }
    }

    pub fn index_range(&self) -> u8 {
        self.index_range
    }

    pub fn register_oracle(&self, ctx: &OperatingContext, principal: Principal) -> Result<OracleIndexes> {
        ctx.require_operational()?;

        let mut registrations = self.registrations.write()?;
        if registrations.contains_key(&principal) {
            return Err(SuretyError::AlreadyRegistered(format!("oracle {}", principal)));
        }

        let mut indexes = [0u8; INDEXES_PER_ORACLE];
        for slot in indexes.iter_mut() {
            *slot = self.source.draw(self.index_range)?;
        }

        info!("🔮 Oracle {} registered with indexes {:?}", principal, indexes);
        registrations.insert(
            principal.clone(),
            OracleRegistration { principal, indexes },
        );
        Ok(indexes)
    }

    pub fn get_indexes(&self, principal: &Principal) -> Result<OracleIndexes> {
        self.registrations
            .read()?
            .get(principal)
            .map(|r| r.indexes)
            .ok_or_else(|| SuretyError::NotRegistered(format!("oracle {}", principal)))
    }

    /// `Unauthorized` unless `principal` is registered and holds `index`.
    pub fn authorize(&self, principal: &Principal, index: u8) -> Result<()> {
        let registrations = self.registrations.read()?;
        match registrations.get(principal) {
            Some(registration) if registration.holds(index) => Ok(()),
            Some(_) => Err(SuretyError::Unauthorized(format!(
                "oracle {} does not hold index {}",
                principal, index
            ))),
            None => Err(SuretyError::Unauthorized(format!(
                "{} is not a registered oracle",
                principal
            ))),
        }
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.registrations.read()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}
