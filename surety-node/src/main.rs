use std::time::Duration;

use clap::Parser;
use tracing::info;

use flight_surety::{StatusCode, SuretyError};
use surety_node::{
    cli::{Cli, Commands},
    logging::init_logging,
    runtime::simulation::{run_simulation, SimulationOptions},
    setup::{ensure_config, load_or_default},
    StatusPolicy,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let _guard = init_logging(cli.audit_log.as_deref());

    match cli.command {
        Commands::Init { force } => {
            ensure_config(&cli.config, force)?;
        }
        Commands::Simulate {
            oracles,
            status_code,
            random_status,
            flights,
            seed,
            timeout_secs,
        } => {
            let mut config = load_or_default(&cli.config)?;
            if seed.is_some() {
                config.index_seed = seed;
            }

            let policy = if random_status {
                StatusPolicy::Random { seed: seed.unwrap_or_else(rand::random) }
            } else {
                StatusPolicy::Fixed(StatusCode::try_from(status_code)?)
            };

            if flights == 0 {
                return Err(SuretyError::InvalidInput("--flights must be at least 1".into()).into());
            }

            let options = SimulationOptions {
                oracles,
                flights,
                policy,
                timeout: Duration::from_secs(timeout_secs),
                ..SimulationOptions::default()
            };

            let summary = run_simulation(config, options).await?;
            info!(
                "Simulation done: {}/{} flights resolved, {} requests answered",
                summary.resolved(),
                summary.outcomes.len(),
                summary.requests_handled
            );

            for outcome in &summary.outcomes {
                let status = outcome
                    .status
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "unresolved".to_string());
                println!(
                    "{}  status={}  {} credit={}",
                    outcome.key, status, outcome.passenger, outcome.credit
                );
            }
        }
    }

    Ok(())
}
