pub mod admission_engine;
pub mod airline_core;


pub use admission_engine::{
    engine::{AdmissionEngine, AdmissionOutcome, RejectReason},
    policy::AdmissionPolicy,
};
pub use airline_core::{airline::Airline, registry::MembershipRegistry};
pub use surety_common::OperatingContext;
