use serde::{Deserialize, Serialize};

use super::flight::{FlightKey, OracleIndexes, StatusCode};
use super::value::Amount;
use crate::utils::Principal;

/// Notifications published by the registry whenever its state changes.
///
/// Oracle feeders subscribe to `OracleRequest`; everything else is informational.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum SuretyEvent {
    OperatingStatusChanged {
        operational: bool,
        changed_by: Principal,
    },
    AirlineRegistered {
        airline: Principal,
        name: String,
    },
    AirlineVoted {
        airline: Principal,
        voter: Principal,
        confirmations: usize,
        quorum: usize,
    },
    AirlineFunded {
        airline: Principal,
        value: Amount,
    },
    OracleRegistered {
        oracle: Principal,
        indexes: OracleIndexes,
    },
    OracleRequest {
        index: u8,
        key: FlightKey,
    },
    OracleReport {
        oracle: Principal,
        key: FlightKey,
        status: StatusCode,
    },
    FlightStatusInfo {
        key: FlightKey,
        status: StatusCode,
    },
    InsurancePurchased {
        passenger: Principal,
        key: FlightKey,
        premium: Amount,
    },
    InsureeCredited {
        passenger: Principal,
        key: FlightKey,
        amount: Amount,
    },
    Withdrawal {
        passenger: Principal,
        amount: Amount,
    },
}

impl SuretyEvent {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
