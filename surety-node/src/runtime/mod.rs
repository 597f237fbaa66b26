pub mod feeder;
pub mod gateway;
pub mod simulation;
