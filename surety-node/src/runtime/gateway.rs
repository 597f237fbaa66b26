use std::sync::Arc;

use async_trait::async_trait;

use flight_surety::{Amount, FlightKey, FlightSurety, OracleIndexes, Principal, Result, StatusCode, SubmitOutcome};

/// The slice of the registry an oracle feeder talks to.
#[async_trait]
pub trait SuretyGateway: Send + Sync {
    async fn register_oracle(&self, oracle: Principal, fee: Amount) -> Result<OracleIndexes>;

    async fn get_my_indexes(&self, oracle: &Principal) -> Result<OracleIndexes>;

    async fn submit_oracle_response(
        &self,
        oracle: &Principal,
        index: u8,
        key: &FlightKey,
        status: StatusCode,
    ) -> Result<SubmitOutcome>;
}

#[async_trait]
impl SuretyGateway for Arc<FlightSurety> {
    async fn register_oracle(&self, oracle: Principal, fee: Amount) -> Result<OracleIndexes> {
        FlightSurety::register_oracle(self, oracle, fee)
    }

    async fn get_my_indexes(&self, oracle: &Principal) -> Result<OracleIndexes> {
        FlightSurety::get_my_indexes(self, oracle)
    }

    async fn submit_oracle_response(
        &self,
        oracle: &Principal,
        index: u8,
        key: &FlightKey,
        status: StatusCode,
    ) -> Result<SubmitOutcome> {
        FlightSurety::submit_oracle_response(self, oracle, index, key, status)
    }
}
