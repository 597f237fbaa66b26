use std::sync::{Arc, Mutex, RwLock};

use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use surety_common::{
    utils::{security::generate_index_seed, time::current_time},
    Amount, FlightKey, OperatingContext, OracleIndexes, Principal, Result, StatusCode, SuretyError,
    SuretyEvent,
};
use surety_governance::{AdmissionEngine, AdmissionOutcome, Airline};
use surety_oracle::{OracleConsensusEngine, OracleDirectory, SeededIndexSource, SubmitOutcome};

use crate::{
    config::SuretyConfig,
    env::{
        bus::EventBus,
        flights::{Flight, FlightRegistry},
        insurance::InsuranceBook,
    },
};

/// The flight-insurance registry: airline governance, oracle consensus,
/// flights and passenger cover behind one entry point.
///
/// Every mutating call checks the operating gate first. State changes are
/// announced on the event bus.
#[derive(Debug)]
pub struct FlightSurety {
    ctx: OperatingContext,
    admission: AdmissionEngine,
    oracles: OracleConsensusEngine,
    flights: RwLock<FlightRegistry>,
    insurance: Mutex<InsuranceBook>,
    bus: EventBus,
    config: SuretyConfig,
}

impl FlightSurety {
    pub fn new(config: SuretyConfig) -> Result<Self> {
        config.validate()?;

        let ctx = OperatingContext::new(config.owner.clone());
        let admission = AdmissionEngine::with_founder(
            config.admission.clone(),
            config.first_airline.clone(),
            config.first_airline_name.clone(),
        )?;

        let seed = config.index_seed.unwrap_or_else(generate_index_seed);
        let source = Arc::new(SeededIndexSource::new(seed));
        let directory = Arc::new(OracleDirectory::new(source.clone(), config.oracle.index_range));
        let oracles = OracleConsensusEngine::new(config.oracle.clone(), directory, source);

        info!(
            "🏛️ FlightSurety ready: owner={}, first airline={}, seed={}",
            config.owner, config.first_airline, seed
        );

        Ok(Self {
            ctx,
            admission,
            oracles,
            flights: RwLock::new(FlightRegistry::new()),
            insurance: Mutex::new(InsuranceBook::new()),
            bus: EventBus::new(config.event_capacity),
            config,
        })
    }

    pub fn config(&self) -> &SuretyConfig {
        &self.config
    }

    pub fn context(&self) -> &OperatingContext {
        &self.ctx
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SuretyEvent> {
        self.bus.subscribe()
    }

    // ---------------------------------------------------------------------
    // Governance
    // ---------------------------------------------------------------------

    pub fn is_operational(&self) -> bool {
        self.ctx.is_operational()
    }

    pub fn set_operating_status(&self, caller: &Principal, value: bool) -> Result<()> {
        let previous = self.admission.set_operating_status(&self.ctx, caller, value)?;
        if previous != value {
            self.bus.publish(SuretyEvent::OperatingStatusChanged {
                operational: value,
                changed_by: caller.clone(),
            });
        }
        Ok(())
    }

    pub fn fund(&self, caller: &Principal, value: Amount) -> Result<()> {
        if self.admission.fund(&self.ctx, caller, value)? {
            info!(target: "audit", "FUND airline={} value={}", caller, value);
            self.bus.publish(SuretyEvent::AirlineFunded {
                airline: caller.clone(),
                value,
            });
        }
        Ok(())
    }

    pub fn register_airline(
        &self,
        requester: &Principal,
        airline: Principal,
        name: impl Into<String>,
    ) -> Result<AdmissionOutcome> {
        let name = name.into();
        let outcome = self
            .admission
            .register_airline(&self.ctx, requester, airline.clone(), name.clone())?;

        match outcome {
            AdmissionOutcome::Registered => {
                info!(target: "audit", "REGISTER airline={} by={}", airline, requester);
                self.bus.publish(SuretyEvent::AirlineRegistered { airline, name });
            }
            AdmissionOutcome::Pending { confirmations, quorum } => {
                self.bus.publish(SuretyEvent::AirlineVoted {
                    airline,
                    voter: requester.clone(),
                    confirmations,
                    quorum,
                });
            }
            AdmissionOutcome::Rejected(_) => {}
        }
        Ok(outcome)
    }

    pub fn get_airline(&self, identity: &Principal) -> Result<Airline> {
        self.admission.get_airline(identity)
    }

    pub fn airline_count(&self) -> Result<usize> {
        self.admission.count()
    }

    pub fn registered_airlines(&self) -> Result<Vec<Airline>> {
        self.admission.registered_airlines()
    }

    // ---------------------------------------------------------------------
    // Flights & insurance
    // ---------------------------------------------------------------------

    /// Registers a flight on behalf of a funded airline. Returns `false` if it already existed.
    pub fn register_flight(&self, airline: &Principal, flight: impl Into<String>, timestamp: u64) -> Result<bool> {
        self.ctx.require_operational()?;
        if !self.admission.is_funded(airline)? {
            return Err(SuretyError::RequesterNotFunded(airline.clone()));
        }

        let key = FlightKey::new(airline.clone(), flight, timestamp);
        let created = self.flights.write()?.register(key.clone(), airline.clone(), current_time());
        if created {
            info!("🛬 Flight {} registered", key);
        }
        Ok(created)
    }

    pub fn get_flight(&self, key: &FlightKey) -> Result<Flight> {
        self.flights
            .read()?
            .get(key)
            .cloned()
            .ok_or_else(|| SuretyError::NotFound(format!("flight {}", key)))
    }

    /// Buys cover for a flight operated by a registered airline. Unknown flights
    /// are registered on the fly.
    pub fn buy_insurance(&self, passenger: &Principal, key: FlightKey, premium: Amount) -> Result<()> {
        self.ctx.require_operational()?;

        let registered = match self.admission.get_airline(&key.airline) {
            Ok(airline) => airline.registered,
            Err(SuretyError::NotFound(_)) => false,
            Err(e) => return Err(e),
        };
        if !registered {
            return Err(SuretyError::NotRegistered(format!("airline {}", key.airline)));
        }

        {
            // Flights before insurance, the same order settlement takes
            let mut flights = self.flights.write()?;
            if flights.is_settled(&key) {
                return Err(SuretyError::InvalidInput(format!("flight {} is already settled", key)));
            }
            self.insurance
                .lock()?
                .buy(&self.config.insurance, passenger.clone(), key.clone(), premium)?;
            if flights.register(key.clone(), key.airline.clone(), current_time()) {
                info!("🛬 Flight {} registered through an insurance purchase", key);
            }
        }

        info!(target: "audit", "INSURE passenger={} flight={} premium={}", passenger, key, premium);
        self.bus.publish(SuretyEvent::InsurancePurchased {
            passenger: passenger.clone(),
            key,
            premium,
        });
        Ok(())
    }

    pub fn credits_of(&self, passenger: &Principal) -> Result<Amount> {
        Ok(self.insurance.lock()?.credits_of(passenger))
    }

    pub fn withdraw(&self, passenger: &Principal) -> Result<Amount> {
        self.ctx.require_operational()?;
        let amount = self.insurance.lock()?.withdraw(passenger)?;

        info!(target: "audit", "WITHDRAW passenger={} amount={}", passenger, amount);
        self.bus.publish(SuretyEvent::Withdrawal {
            passenger: passenger.clone(),
            amount,
        });
        Ok(amount)
    }

    // ---------------------------------------------------------------------
    // Oracles
    // ---------------------------------------------------------------------

    pub fn register_oracle(&self, oracle: Principal, fee: Amount) -> Result<OracleIndexes> {
        let required = self.config.oracle_registration_fee;
        if fee < required {
            return Err(SuretyError::InsufficientValue { required, provided: fee });
        }

        let indexes = self.oracles.directory().register_oracle(&self.ctx, oracle.clone())?;
        self.bus.publish(SuretyEvent::OracleRegistered { oracle, indexes });
        Ok(indexes)
    }

    pub fn get_my_indexes(&self, oracle: &Principal) -> Result<OracleIndexes> {
        self.oracles.directory().get_indexes(oracle)
    }

    /// Opens a status request and announces it to the oracles. Settled
    /// flights cannot be queried again.
    pub fn fetch_flight_status(&self, key: FlightKey) -> Result<u8> {
        if self.flights.read()?.is_settled(&key) {
            return Err(SuretyError::InvalidInput(format!("flight {} is already settled", key)));
        }
        let index = self.oracles.open_request(&self.ctx, key.clone())?;
        self.bus.publish(SuretyEvent::OracleRequest { index, key });
        Ok(index)
    }

    pub fn submit_oracle_response(
        &self,
        oracle: &Principal,
        index: u8,
        key: &FlightKey,
        status: StatusCode,
    ) -> Result<SubmitOutcome> {
        let outcome = self.oracles.submit_response(&self.ctx, oracle, index, key, status)?;

        match outcome {
            SubmitOutcome::Accepted { .. } => {
                self.publish_report(oracle, key, status);
            }
            SubmitOutcome::Resolved(final_status) => {
                self.publish_report(oracle, key, status);
                self.bus.publish(SuretyEvent::FlightStatusInfo {
                    key: key.clone(),
                    status: final_status,
                });
                self.process_flight_status(key, final_status)?;
            }
            SubmitOutcome::Ignored(reason) => {
                debug!("Response from {} for {} ignored: {:?}", oracle, key, reason);
            }
        }
        Ok(outcome)
    }

    pub fn final_status(&self, key: &FlightKey) -> Result<Option<StatusCode>> {
        self.oracles.final_status(key)
    }

    /// Garbage-collects status requests older than the configured lifetime.
    pub fn prune_requests(&self, now: u64) -> Result<usize> {
        self.oracles.prune(now)
    }

    fn publish_report(&self, oracle: &Principal, key: &FlightKey, status: StatusCode) {
        self.bus.publish(SuretyEvent::OracleReport {
            oracle: oracle.clone(),
            key: key.clone(),
            status,
        });
    }

    /// Applies an agreed status: records it on the flight and, when the
    /// airline is to blame, credits the flight's insurees.
    fn process_flight_status(&self, key: &FlightKey, status: StatusCode) -> Result<()> {
        let now = current_time();
        let mut flights = self.flights.write()?;
        flights.register(key.clone(), key.airline.clone(), now);
        if !flights.settle(key, status, now)? {
            warn!("Flight {} already settled, ignoring {}", key, status);
            return Ok(());
        }

        if status != StatusCode::LateAirline {
            return Ok(());
        }

        // Still under the flights guard so no purchase slips in between
        let paid = self.insurance.lock()?.credit_flight(&self.config.insurance, key);
        drop(flights);

        for (passenger, amount) in paid {
            info!(target: "audit", "CREDIT passenger={} flight={} amount={}", passenger, key, amount);
            self.bus.publish(SuretyEvent::InsureeCredited {
                passenger,
                key: key.clone(),
                amount,
            });
        }
        Ok(())
    }
}
