//! Fuzz-style simulation harness.
//!
//! Builds an app, optionally seeds it from a genesis document, floods it
//! with randomized valid/invalid operations from both module simulators,
//! logs per-outcome tallies, and exports the resulting genesis.

use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use realfin_core::{AddressCodec, ACCOUNT_PAYLOAD_LEN};
use realfin_node::modules::insurance::PolicySimulator;
use realfin_node::modules::tokenization::AssetSimulator;
use realfin_node::runtime::{genesis, OperationError};
use realfin_node::{App, RuntimeConfig};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "realfin-sim",
    about = "Flood a Realfin app with randomized operations"
)]
struct Args {
    /// Genesis document to start from; empty-chain defaults when absent.
    #[arg(long, env = "REALFIN_GENESIS")]
    genesis: Option<PathBuf>,

    /// Number of randomized operations to dispatch.
    #[arg(long, default_value_t = 1000)]
    rounds: u32,

    /// RNG seed for a reproducible run.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Number of simulated accounts.
    #[arg(long, default_value_t = 8)]
    accounts: u8,

    /// Write the exported genesis document here when the storm ends.
    #[arg(long)]
    export: Option<PathBuf>,
}

fn error_kind(err: &OperationError) -> &'static str {
    match err {
        OperationError::UnknownModule { .. } => "unknown_module",
        OperationError::WrongModule => "wrong_module",
        OperationError::Module(inner) => inner.kind(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let app = App::new(&RuntimeConfig::default());

    let doc = match &args.genesis {
        Some(path) => genesis::load_file(path)?,
        None => app.default_genesis()?,
    };
    app.validate_genesis(&doc)?;
    app.init_genesis(&doc).await?;

    let mut rng = StdRng::seed_from_u64(args.seed);
    let pool = (0..args.accounts.max(1))
        .map(|_| {
            let mut payload = [0u8; ACCOUNT_PAYLOAD_LEN];
            rng.fill(&mut payload[..]);
            app.codec().bytes_to_string(&payload)
        })
        .collect::<Result<Vec<String>, _>>()?;
    let policy_sim = PolicySimulator::new(pool.clone());
    let asset_sim = AssetSimulator::new(pool);

    tracing::info!(rounds = args.rounds, seed = args.seed, "storm starting");

    let mut outcomes: BTreeMap<String, u64> = BTreeMap::new();
    for round in 0..args.rounds {
        let kind = if round % 2 == 0 {
            policy_sim.next_op(&mut rng, app.insurance())?
        } else {
            asset_sim.next_op(&mut rng, app.tokenization())?
        };
        let label = kind.label();
        let op = app.operation(kind);
        let outcome = match app.dispatch(op).await {
            Ok(_) => format!("{label}/ok"),
            Err(err) => format!("{label}/{}", error_kind(&err)),
        };
        *outcomes.entry(outcome).or_default() += 1;
    }

    for (outcome, count) in &outcomes {
        tracing::info!(outcome = %outcome, count, "storm outcome");
    }

    let exported = app.export_genesis().await?;
    match &args.export {
        Some(path) => {
            genesis::save_file(path, &exported)?;
            tracing::info!(path = %path.display(), "genesis exported");
        }
        None => println!("{}", serde_json::to_string_pretty(&exported)?),
    }

    Ok(())
}
