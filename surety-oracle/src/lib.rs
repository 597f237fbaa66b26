pub mod consensus;
pub mod directory;

pub use consensus::{
    evaluator::{OraclePolicy, ResponseEvaluator},
    request::{FlightStatusRequest, IgnoreReason, SubmitOutcome},
    OracleConsensusEngine,
};
pub use directory::{
    index_source::{IndexSource, SeededIndexSource},
    OracleDirectory, OracleRegistration, INDEXES_PER_ORACLE,
};
