use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use surety_common::{Amount, Principal, Result, SuretyError, ETHER};
use surety_governance::AdmissionPolicy;
use surety_oracle::OraclePolicy;

/// Payout rules for flight-delay insurance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsuranceTerms {
    pub max_premium: Amount,
    pub payout_numerator: u32,
    pub payout_denominator: u32,
}

impl Default for InsuranceTerms {
    fn default() -> Self {
        Self {
            max_premium: ETHER,
            payout_numerator: 3,
            payout_denominator: 2,
        }
    }
}

impl InsuranceTerms {
    pub fn payout(&self, premium: Amount) -> Amount {
        premium.saturating_mul(self.payout_numerator as Amount) / self.payout_denominator as Amount
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuretyConfig {
    pub owner: Principal,
    pub first_airline: Principal,
    pub first_airline_name: String,
    pub admission: AdmissionPolicy,
    pub oracle: OraclePolicy,
    pub oracle_registration_fee: Amount,
    pub insurance: InsuranceTerms,
    /// Seed of the process-wide index source; drawn from the OS when absent.
    #[serde(default)]
    pub index_seed: Option<u64>,
    pub event_capacity: usize,
}

impl Default for SuretyConfig {
    fn default() -> Self {
        Self {
            owner: Principal::from("owner"),
            first_airline: Principal::from("airline-1"),
            first_airline_name: "First Airline".to_string(),
            admission: AdmissionPolicy::default(),
            oracle: OraclePolicy::default(),
            oracle_registration_fee: ETHER,
            insurance: InsuranceTerms::default(),
            index_seed: None,
            event_capacity: 1024,
        }
    }
}

impl SuretyConfig {
    pub fn validate(&self) -> Result<()> {
        if self.oracle.index_range == 0 {
            return Err(SuretyError::Config("oracle.index_range must be positive".into()));
        }
        if self.oracle.min_responses == 0 {
            return Err(SuretyError::Config("oracle.min_responses must be positive".into()));
        }
        if self.insurance.payout_denominator == 0 {
            return Err(SuretyError::Config("insurance.payout_denominator must be positive".into()));
        }
        if self.event_capacity == 0 {
            return Err(SuretyError::Config("event_capacity must be positive".into()));
        }
        if self.owner == self.first_airline {
            return Err(SuretyError::Config("owner and first_airline must differ".into()));
        }
        Ok(())
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        let parsed = serde_json::from_str::<SuretyConfig>(&data)?;
        parsed.validate()?;
        Ok(parsed)
    }
}
