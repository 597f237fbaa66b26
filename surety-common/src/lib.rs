pub mod env;
pub mod error;
pub mod utils;

pub use env::events::SuretyEvent;
pub use env::flight::{FlightKey, OracleIndexes, StatusCode, INDEXES_PER_ORACLE};
pub use env::operating::OperatingContext;
pub use env::value::{Amount, ETHER};
pub use error::{ErrorKind, Result, SuretyError};
pub use utils::Principal;
