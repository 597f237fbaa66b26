pub mod airline;
pub mod registry;
