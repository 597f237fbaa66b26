use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, oneshot};
use tracing::{debug, info, warn};

use flight_surety::{
    Amount, FlightKey, FlightSurety, Principal, Result, StatusCode, SuretyConfig, SuretyEvent, ETHER,
};
use surety_common::utils::time::current_time;

use super::feeder::{OracleFeeder, StatusPolicy};

#[derive(Debug, Clone)]
pub struct SimulationOptions {
    pub oracles: usize,
    pub flights: usize,
    pub policy: StatusPolicy,
    pub premium: Amount,
    pub timeout: Duration,
}

impl Default for SimulationOptions {
    fn default() -> Self {
        Self {
            oracles: 20,
            flights: 1,
            policy: StatusPolicy::Fixed(StatusCode::LateAirline),
            premium: ETHER,
            timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FlightOutcome {
    pub key: FlightKey,
    pub passenger: Principal,
    pub status: Option<StatusCode>,
    pub credit: Amount,
}

#[derive(Debug, Clone)]
pub struct SimulationSummary {
    pub outcomes: Vec<FlightOutcome>,
    pub requests_handled: usize,
}

impl SimulationSummary {
    pub fn resolved(&self) -> usize {
        self.outcomes.iter().filter(|o| o.status.is_some()).count()
    }
}

/// Runs a full round in-process: the founding airline funds itself, each
/// flight gets one insured passenger, and the oracle feeder settles every
/// status request it can.
pub async fn run_simulation(config: SuretyConfig, options: SimulationOptions) -> Result<SimulationSummary> {
    let app = Arc::new(FlightSurety::new(config)?);
    let airline = app.config().first_airline.clone();

    app.fund(&airline, app.config().admission.min_funding)?;

    let feeder_events = app.subscribe();
    let mut watch = app.subscribe();

    let fee = app.config().oracle_registration_fee;
    let feeder = OracleFeeder::bootstrap(app.clone(), options.oracles, fee, options.policy).await?;

    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let feeder_handle = tokio::spawn(feeder.run(feeder_events, shutdown_rx));

    let departure = current_time() + 86_400;
    let mut pending = Vec::with_capacity(options.flights);

    for n in 1..=options.flights {
        let flight = format!("ND{:04}", 1300 + n);
        let timestamp = departure + (n as u64) * 3_600;
        let key = FlightKey::new(airline.clone(), flight.clone(), timestamp);
        let passenger = Principal::new(format!("passenger-{}", n));

        app.register_flight(&airline, flight, timestamp)?;
        app.buy_insurance(&passenger, key.clone(), options.premium)?;

        let index = app.fetch_flight_status(key.clone())?;
        info!("✈️ Requested status for {} at index {}", key, index);
        pending.push((key, passenger));
    }

    let expected = pending.len();
    let waited = tokio::time::timeout(options.timeout, wait_for_resolutions(&mut watch, expected)).await;
    if waited.is_err() {
        warn!("⏱️ Timed out waiting for {} resolutions", expected);
    }

    let _ = shutdown_tx.send(());
    let requests_handled = match feeder_handle.await {
        Ok(handled) => handled,
        Err(e) => {
            warn!("Oracle feeder task failed: {}", e);
            0
        }
    };

    let pruned = app.prune_requests(current_time())?;
    if pruned > 0 {
        info!("🧹 Pruned {} stale requests", pruned);
    }

    let mut outcomes = Vec::with_capacity(pending.len());
    for (key, passenger) in pending {
        outcomes.push(FlightOutcome {
            status: app.final_status(&key)?,
            credit: app.credits_of(&passenger)?,
            key,
            passenger,
        });
    }

    Ok(SimulationSummary { outcomes, requests_handled })
}

async fn wait_for_resolutions(events: &mut broadcast::Receiver<SuretyEvent>, expected: usize) {
    let mut seen = 0;
    while seen < expected {
        match events.recv().await {
            Ok(SuretyEvent::FlightStatusInfo { key, status }) => {
                info!("📣 {} resolved as {}", key, status);
                seen += 1;
            }
            Ok(other) => match other.to_json() {
                Ok(json) => debug!("📨 {}", json),
                Err(e) => warn!("Unprintable event {:?}: {}", other, e),
            },
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!("Status watcher lagged, {} events skipped", skipped);
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
