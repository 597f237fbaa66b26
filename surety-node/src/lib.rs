pub mod cli;
pub mod logging;
pub mod runtime;
pub mod setup;

pub use runtime::{
    feeder::{FeedReport, OracleFeeder, StatusPolicy},
    gateway::SuretyGateway,
    simulation::{run_simulation, FlightOutcome, SimulationOptions, SimulationSummary},
};
