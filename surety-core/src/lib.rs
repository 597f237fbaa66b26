// lib.rs
pub mod app;
pub mod config;
pub mod env;

pub use app::FlightSurety;
pub use config::{InsuranceTerms, SuretyConfig};
pub use env::{
    bus::EventBus,
    flights::{Flight, FlightRegistry},
    insurance::{InsuranceBook, InsurancePolicy},
};

pub use surety_common::{
    Amount, FlightKey, OperatingContext, OracleIndexes, Principal, Result, StatusCode, SuretyError, SuretyEvent, ETHER,
};
pub use surety_governance::{AdmissionOutcome, AdmissionPolicy, Airline, RejectReason};
pub use surety_oracle::{IgnoreReason, OraclePolicy, SubmitOutcome};
