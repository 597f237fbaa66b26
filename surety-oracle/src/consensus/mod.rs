//! consensus
//!
//! Flight-status agreement among independently assigned oracles.
//!
//! A request is opened for one flight with a single pseudo-random index.
//! Oracles holding that index answer with a status code and the request is
//! resolved once one code gathers enough distinct answers. Resolution depends
//! only on the set of answers, never on the order they arrived in.

mod engine;
pub mod evaluator;
mod registry;
pub mod request;

pub use engine::OracleConsensusEngine;
pub use registry::ResponseRegistry;
