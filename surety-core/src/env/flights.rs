use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use surety_common::{FlightKey, Principal, Result, StatusCode, SuretyError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flight {
    pub key: FlightKey,
    pub registered_by: Principal,
    pub status: StatusCode,
    /// Set once a status has been agreed. The status never changes afterwards.
    pub settled: bool,
    pub updated_at: u64,
}

#[derive(Debug, Default, Clone)]
pub struct FlightRegistry {
    flights: HashMap<FlightKey, Flight>,
}

impl FlightRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if the flight was already known.
    pub fn register(&mut self, key: FlightKey, registered_by: Principal, now: u64) -> bool {
        if self.flights.contains_key(&key) {
            return false;
        }
        self.flights.insert(
            key.clone(),
            Flight {
                key,
                registered_by,
                status: StatusCode::Unknown,
                settled: false,
                updated_at: now,
            },
        );
        true
    }

    /// Records the agreed status. Returns `false` and leaves the flight
    /// untouched if it was already settled.
    pub fn settle(&mut self, key: &FlightKey, status: StatusCode, now: u64) -> Result<bool> {
        let flight = self
            .flights
            .get_mut(key)
            .ok_or_else(|| SuretyError::NotFound(format!("flight {}", key)))?;
        if flight.settled {
            return Ok(false);
        }
        flight.status = status;
        flight.settled = true;
        flight.updated_at = now;
        Ok(true)
    }

    pub fn is_settled(&self, key: &FlightKey) -> bool {
        self.flights.get(key).map_or(false, |f| f.settled)
    }

    pub fn get(&self, key: &FlightKey) -> Option<&Flight> {
        self.flights.get(key)
    }

    pub fn len(&self) -> usize {
        self.flights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flights.is_empty()
    }
}
