use std::sync::Mutex;

use futures::future::join_all;
use rand::{rngs::StdRng, Rng, SeedableRng};
use tokio::sync::{broadcast, oneshot};
use tracing::{debug, info, warn};

use flight_surety::{
    Amount, FlightKey, OracleIndexes, Principal, Result, StatusCode, SubmitOutcome, SuretyError, SuretyEvent,
};

use super::gateway::SuretyGateway;

/// What a simulated oracle reports when asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusPolicy {
    Fixed(StatusCode),
    Random { seed: u64 },
}

/// Tally of one request's round of submissions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedReport {
    pub submitted: usize,
    pub ignored: usize,
    pub failed: usize,
    pub resolved: Option<StatusCode>,
}

/// A pool of simulated oracles answering `OracleRequest` events.
pub struct OracleFeeder<G: SuretyGateway> {
    gateway: G,
    oracles: Vec<(Principal, OracleIndexes)>,
    policy: StatusPolicy,
    rng: Option<Mutex<StdRng>>,
}

impl<G: SuretyGateway> OracleFeeder<G> {
    /// Registers `count` oracles named `oracle-<n>`. Oracles that are already
    /// known keep their indexes.
    pub async fn bootstrap(gateway: G, count: usize, fee: Amount, policy: StatusPolicy) -> Result<Self> {
        let mut oracles = Vec::with_capacity(count);

        for n in 1..=count {
            let oracle = Principal::new(format!("oracle-{}", n));
            let indexes = match gateway.register_oracle(oracle.clone(), fee).await {
                Ok(indexes) => indexes,
                Err(SuretyError::AlreadyRegistered(_)) => gateway.get_my_indexes(&oracle).await?,
                Err(e) => return Err(e),
            };
            debug!("Oracle {} holds indexes {:?}", oracle, indexes);
            oracles.push((oracle, indexes));
        }

        info!("🔮 {} oracles ready", oracles.len());

        let rng = match policy {
            StatusPolicy::Random { seed } => Some(Mutex::new(StdRng::seed_from_u64(seed))),
            StatusPolicy::Fixed(_) => None,
        };

        Ok(Self { gateway, oracles, policy, rng })
    }

    pub fn oracles(&self) -> &[(Principal, OracleIndexes)] {
        &self.oracles
    }

    /// Oracles holding `index` among their assigned indexes.
    pub fn responders(&self, index: u8) -> Vec<&Principal> {
        self.oracles
            .iter()
            .filter(|(_, indexes)| indexes.contains(&index))
            .map(|(oracle, _)| oracle)
            .collect()
    }

    fn pick_status(&self) -> Result<StatusCode> {
        match (&self.policy, &self.rng) {
            (StatusPolicy::Fixed(code), _) => Ok(*code),
            (StatusPolicy::Random { .. }, Some(rng)) => {
                let i = rng.lock()?.gen_range(0..StatusCode::ALL.len());
                Ok(StatusCode::ALL[i])
            }
            (StatusPolicy::Random { .. }, None) => Err(SuretyError::InvalidInput(
                "random status policy without a generator".into(),
            )),
        }
    }

    /// Every matching oracle answers the request concurrently.
    pub async fn handle_request(&self, index: u8, key: &FlightKey) -> Result<FeedReport> {
        let responders = self.responders(index);
        if responders.is_empty() {
            warn!("No oracle holds index {} for {}", index, key);
            return Ok(FeedReport::default());
        }

        let mut submissions = Vec::with_capacity(responders.len());
        for oracle in responders {
            let status = self.pick_status()?;
            submissions.push(async move {
                (oracle, self.gateway.submit_oracle_response(oracle, index, key, status).await)
            });
        }

        let mut report = FeedReport::default();
        for (oracle, result) in join_all(submissions).await {
            match result {
                Ok(SubmitOutcome::Accepted { .. }) => report.submitted += 1,
                Ok(SubmitOutcome::Resolved(code)) => {
                    report.submitted += 1;
                    report.resolved = Some(code);
                }
                Ok(SubmitOutcome::Ignored(reason)) => {
                    debug!("Oracle {} ignored for {}: {:?}", oracle, key, reason);
                    report.ignored += 1;
                }
                Err(e) => {
                    warn!("Oracle {} failed for {}: {}", oracle, key, e);
                    report.failed += 1;
                }
            }
        }

        Ok(report)
    }

    /// Answers requests from the event stream until shutdown or until the
    /// bus closes. Returns the number of requests handled.
    pub async fn run(
        self,
        mut events: broadcast::Receiver<SuretyEvent>,
        mut shutdown: oneshot::Receiver<()>,
    ) -> usize {
        let mut handled = 0;

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("🛑 Oracle feeder stopping");
                    break;
                }
                received = events.recv() => match received {
                    Ok(SuretyEvent::OracleRequest { index, key }) => {
                        match self.handle_request(index, &key).await {
                            Ok(report) => {
                                debug!("Request {} (index {}): {:?}", key, index, report);
                                handled += 1;
                            }
                            Err(e) => warn!("Request {} (index {}) failed: {}", key, index, e),
                        }
                    }
                    Ok(_) => {}
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!("Oracle feeder lagged, {} events skipped", skipped);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },
            }
        }

        handled
    }
}
