//! One-shot CLI driver for the analysis core.
//!
//! ```text
//! oneiro <prompt text...>       submit a dream for analysis
//! oneiro --history <user_id>    list past analyses
//! ```
//!
//! Reads `ONEIRO_TOKEN` for the bearer credential and the `ONEIRO_*`
//! config overrides (see `config`).

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use oneiro::{
    AnalysisOrchestrator, AnalysisOutcome, BearerToken, Config, CreditLedger, HttpRemoteClient,
    RemoteApi,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env();
    let credential = std::env::var("ONEIRO_TOKEN")
        .ok()
        .and_then(BearerToken::new);

    let remote = Arc::new(HttpRemoteClient::new(&config).context("building remote client")?);

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.split_first() {
        Some((flag, rest)) if flag == "--history" => {
            let user_id = rest.first().context("--history requires a user id")?;
            print_history(remote.as_ref(), user_id, credential.as_ref()).await
        }
        Some(_) => {
            let prompt = args.join(" ");
            run_submission(remote, &config, &prompt, credential.as_ref()).await
        }
        None => {
            eprintln!("usage: oneiro <prompt text...> | oneiro --history <user_id>");
            std::process::exit(2);
        }
    }
}

async fn run_submission(
    remote: Arc<HttpRemoteClient>,
    config: &Config,
    prompt: &str,
    credential: Option<&BearerToken>,
) -> anyhow::Result<()> {
    let ledger = Arc::new(CreditLedger::new());
    let orchestrator = AnalysisOrchestrator::new(remote, Arc::clone(&ledger), config);

    match orchestrator.submit(prompt, credential).await {
        AnalysisOutcome::Completed(analysis) => {
            println!("{analysis}");
            println!("\ncredits left: {}", ledger.balance().await);
            Ok(())
        }
        AnalysisOutcome::InsufficientCredit => {
            // Dedicated signal, never a generic error message.
            println!("You are out of credits. Purchase a credit package to continue.");
            std::process::exit(1);
        }
        AnalysisOutcome::Failed(err) => Err(anyhow::anyhow!(err).context("analysis failed")),
    }
}

async fn print_history(
    remote: &dyn RemoteApi,
    user_id: &str,
    credential: Option<&BearerToken>,
) -> anyhow::Result<()> {
    let entries = remote
        .fetch_history(user_id, credential)
        .await
        .context("fetching history")?;

    if entries.is_empty() {
        println!("no past analyses");
        return Ok(());
    }
    for entry in entries {
        println!("[{}] {}", entry.created_at.format("%Y-%m-%d %H:%M"), entry.dream);
        println!("    {}", entry.analysis);
    }
    Ok(())
}
