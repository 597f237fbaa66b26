use std::fmt;

use serde::{Deserialize, Serialize};

use crate::utils::Principal;

/// Flight status reported by oracles.
///
/// The consensus engine only compares codes for equality; the declaration
/// order is the enumeration order used to break ties between codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum StatusCode {
    Unknown = 0,
    OnTime = 10,
    LateAirline = 20,
    LateWeather = 30,
    LateTechnical = 40,
    LateOther = 50,
}

impl StatusCode {
    /// Every code in enumeration order.
    pub const ALL: [StatusCode; 6] = [
        StatusCode::Unknown,
        StatusCode::OnTime,
        StatusCode::LateAirline,
        StatusCode::LateWeather,
        StatusCode::LateTechnical,
        StatusCode::LateOther,
    ];
}

impl Default for StatusCode {
    fn default() -> Self {
        Self::Unknown
    }
}

impl From<StatusCode> for u8 {
    fn from(code: StatusCode) -> Self {
        code as u8
    }
}

impl std::convert::TryFrom<u8> for StatusCode {
    type Error = crate::error::SuretyError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(StatusCode::Unknown),
            10 => Ok(StatusCode::OnTime),
            20 => Ok(StatusCode::LateAirline),
            30 => Ok(StatusCode::LateWeather),
            40 => Ok(StatusCode::LateTechnical),
            50 => Ok(StatusCode::LateOther),
            other => Err(crate::error::SuretyError::InvalidInput(format!(
                "unknown status code {}",
                other
            ))),
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StatusCode::Unknown => "Unknown",
            StatusCode::OnTime => "OnTime",
            StatusCode::LateAirline => "LateAirline",
            StatusCode::LateWeather => "LateWeather",
            StatusCode::LateTechnical => "LateTechnical",
            StatusCode::LateOther => "LateOther",
        };
        write!(f, "{}", s)
    }
}

/// Indexes drawn for every oracle at registration.
pub const INDEXES_PER_ORACLE: usize = 3;

pub type OracleIndexes = [u8; INDEXES_PER_ORACLE];

/// Identifies one flight, and therefore one in-flight status query.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FlightKey {
    pub airline: Principal,
    pub flight: String,
    pub timestamp: u64,
}

impl FlightKey {
    pub fn new(airline: impl Into<Principal>, flight: impl Into<String>, timestamp: u64) -> Self {
        Self {
            airline: airline.into(),
            flight: flight.into(),
            timestamp,
        }
    }
}

impl fmt::Display for FlightKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}@{}", self.airline, self.flight, self.timestamp)
    }
}
