use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{broadcast, oneshot};

use flight_surety::{
    Amount, FlightKey, IgnoreReason, OracleIndexes, Principal, Result, StatusCode, SubmitOutcome, SuretyConfig,
    SuretyError, SuretyEvent, ETHER,
};
use surety_node::{
    run_simulation, OracleFeeder, SimulationOptions, StatusPolicy, SuretyGateway,
};

/// Hands out scripted indexes and resolves a request on its third report.
#[derive(Default)]
struct MockGateway {
    scripted: Mutex<Vec<OracleIndexes>>,
    known: Mutex<HashMap<Principal, OracleIndexes>>,
    submissions: Mutex<Vec<(Principal, u8, StatusCode)>>,
}

impl MockGateway {
    fn with_indexes(indexes: Vec<OracleIndexes>) -> Self {
        let mut scripted = indexes;
        scripted.reverse();
        Self {
            scripted: Mutex::new(scripted),
            ..Default::default()
        }
    }
}

#[async_trait]
impl SuretyGateway for MockGateway {
    async fn register_oracle(&self, oracle: Principal, _fee: Amount) -> Result<OracleIndexes> {
        let mut known = self.known.lock().unwrap();
        if known.contains_key(&oracle) {
            return Err(SuretyError::AlreadyRegistered(oracle.to_string()));
        }
        let indexes = self.scripted.lock().unwrap().pop().unwrap_or([9, 9, 9]);
        known.insert(oracle, indexes);
        Ok(indexes)
    }

    async fn get_my_indexes(&self, oracle: &Principal) -> Result<OracleIndexes> {
        self.known
            .lock()
            .unwrap()
            .get(oracle)
            .copied()
            .ok_or_else(|| SuretyError::NotRegistered(oracle.to_string()))
    }

    async fn submit_oracle_response(
        &self,
        oracle: &Principal,
        index: u8,
        _key: &FlightKey,
        status: StatusCode,
    ) -> Result<SubmitOutcome> {
        let mut submissions = self.submissions.lock().unwrap();
        submissions.push((oracle.clone(), index, status));
        Ok(match submissions.len() {
            n if n < 3 => SubmitOutcome::Accepted { status, responses: n },
            3 => SubmitOutcome::Resolved(status),
            _ => SubmitOutcome::Ignored(IgnoreReason::AlreadyResolved),
        })
    }
}

fn key() -> FlightKey {
    FlightKey::new("airline-1", "ND1309", 1_700_000_000)
}

#[tokio::test]
async fn test_bootstrap_reuses_existing_registration() {
    let gateway = MockGateway::with_indexes(vec![[1, 2, 3], [4, 5, 6]]);
    gateway
        .known
        .lock()
        .unwrap()
        .insert(Principal::from("oracle-1"), [7, 7, 8]);

    let feeder = OracleFeeder::bootstrap(gateway, 2, ETHER, StatusPolicy::Fixed(StatusCode::OnTime))
        .await
        .unwrap();

    let oracles = feeder.oracles();
    assert_eq!(oracles.len(), 2);
    assert_eq!(oracles[0], (Principal::from("oracle-1"), [7, 7, 8]));
    assert_eq!(oracles[1], (Principal::from("oracle-2"), [1, 2, 3]));
}

#[tokio::test]
async fn test_only_matching_oracles_respond() {
    let gateway = MockGateway::with_indexes(vec![[1, 2, 3], [3, 4, 5], [5, 6, 7], [3, 3, 9], [0, 1, 2]]);
    let feeder = OracleFeeder::bootstrap(gateway, 5, ETHER, StatusPolicy::Fixed(StatusCode::LateAirline))
        .await
        .unwrap();

    assert_eq!(feeder.responders(3).len(), 3);
    assert!(feeder.responders(8).is_empty());

    let report = feeder.handle_request(3, &key()).await.unwrap();
    assert_eq!(report.submitted, 3);
    assert_eq!(report.ignored, 0);
    assert_eq!(report.failed, 0);
    assert_eq!(report.resolved, Some(StatusCode::LateAirline));
}

#[tokio::test]
async fn test_late_reports_are_counted_as_ignored() {
    let gateway = MockGateway::with_indexes(vec![[2, 0, 0], [2, 1, 1], [2, 3, 3], [2, 4, 4]]);
    let feeder = OracleFeeder::bootstrap(gateway, 4, ETHER, StatusPolicy::Fixed(StatusCode::OnTime))
        .await
        .unwrap();

    let report = feeder.handle_request(2, &key()).await.unwrap();
    assert_eq!(report.submitted, 3);
    assert_eq!(report.ignored, 1);
    assert_eq!(report.resolved, Some(StatusCode::OnTime));
}

#[tokio::test]
async fn test_unheld_index_yields_empty_report() {
    let gateway = MockGateway::with_indexes(vec![[1, 1, 1]]);
    let feeder = OracleFeeder::bootstrap(gateway, 1, ETHER, StatusPolicy::Random { seed: 3 })
        .await
        .unwrap();

    let report = feeder.handle_request(5, &key()).await.unwrap();
    assert_eq!(report, Default::default());
}

#[tokio::test]
async fn test_run_answers_requests_until_shutdown() {
    let gateway = MockGateway::with_indexes(vec![[4, 0, 0], [4, 1, 1], [4, 2, 2]]);
    let feeder = OracleFeeder::bootstrap(gateway, 3, ETHER, StatusPolicy::Fixed(StatusCode::LateWeather))
        .await
        .unwrap();

    let (tx, rx) = broadcast::channel(16);
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let handle = tokio::spawn(feeder.run(rx, shutdown_rx));

    tx.send(SuretyEvent::FlightStatusInfo { key: key(), status: StatusCode::OnTime }).unwrap();
    tx.send(SuretyEvent::OracleRequest { index: 4, key: key() }).unwrap();

    // Closing the bus ends the loop once queued events are drained.
    drop(tx);
    let handled = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(handled, 1);
    drop(shutdown_tx);
}

#[tokio::test]
async fn test_run_survives_lagging_behind_the_bus() {
    let gateway = MockGateway::with_indexes(vec![[4, 0, 0], [4, 1, 1], [4, 2, 2]]);
    let feeder = OracleFeeder::bootstrap(gateway, 3, ETHER, StatusPolicy::Fixed(StatusCode::OnTime))
        .await
        .unwrap();

    let (tx, rx) = broadcast::channel(1);
    for n in 0..3 {
        let key = FlightKey::new("airline-1", format!("ND{}", n), 1_700_000_000);
        tx.send(SuretyEvent::OracleRequest { index: 4, key }).unwrap();
    }

    // Only the newest request is still buffered; the two before it are skipped
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let handle = tokio::spawn(feeder.run(rx, shutdown_rx));
    drop(tx);

    let handled = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(handled, 1);
    drop(shutdown_tx);
}

#[tokio::test]
async fn test_run_stops_on_shutdown_signal() {
    let gateway = MockGateway::with_indexes(vec![[1, 2, 3]]);
    let feeder = OracleFeeder::bootstrap(gateway, 1, ETHER, StatusPolicy::Fixed(StatusCode::OnTime))
        .await
        .unwrap();

    let (_tx, rx) = broadcast::channel::<SuretyEvent>(4);
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let handle = tokio::spawn(feeder.run(rx, shutdown_rx));

    shutdown_tx.send(()).unwrap();
    let handled = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(handled, 0);
}

fn seeded_config() -> SuretyConfig {
    SuretyConfig {
        index_seed: Some(42),
        ..SuretyConfig::default()
    }
}

#[tokio::test]
async fn test_simulation_credits_passengers_on_airline_delay() {
    let options = SimulationOptions {
        oracles: 60,
        flights: 2,
        policy: StatusPolicy::Fixed(StatusCode::LateAirline),
        premium: ETHER,
        timeout: Duration::from_secs(5),
    };

    let summary = run_simulation(seeded_config(), options).await.unwrap();

    assert_eq!(summary.outcomes.len(), 2);
    assert_eq!(summary.resolved(), 2);
    for outcome in &summary.outcomes {
        assert_eq!(outcome.status, Some(StatusCode::LateAirline));
        assert_eq!(outcome.credit, ETHER * 3 / 2);
    }
}

#[tokio::test]
async fn test_simulation_on_time_pays_nothing() {
    let options = SimulationOptions {
        oracles: 60,
        policy: StatusPolicy::Fixed(StatusCode::OnTime),
        timeout: Duration::from_secs(5),
        ..SimulationOptions::default()
    };

    let summary = run_simulation(seeded_config(), options).await.unwrap();

    assert_eq!(summary.resolved(), 1);
    assert_eq!(summary.outcomes[0].status, Some(StatusCode::OnTime));
    assert_eq!(summary.outcomes[0].credit, 0);
}
