//! Admin sweep over refund-eligible assets.
//!
//! Lists every sold asset whose escrow sat past the refund deadline
//! and, with `--execute`, processes each refund. The sweep is the
//! pull-based trigger for the refund monitor; run it by hand or from
//! a scheduler.

use anyhow::{Context, Result};
use clap::Parser;
use sqlx::PgPool;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use wellswap_settlement::application::services::refund_monitor::RefundMonitor;
use wellswap_settlement::domain::value_objects::{SystemClock, WalletAddress};
use wellswap_settlement::infrastructure::config::Settings;
use wellswap_settlement::infrastructure::ledger::evm::EvmLedgerClient;
use wellswap_settlement::infrastructure::notify::TracingNotificationSink;
use wellswap_settlement::infrastructure::persistence::postgres::{
    PostgresAssetRepository, PostgresTradeRepository,
};

#[derive(Debug, Parser)]
#[command(
    name = "refund_sweep",
    about = "Scan sold assets past the refund deadline and optionally process refunds"
)]
struct Args {
    /// Config file (TOML, path without extension).
    #[arg(long)]
    config: Option<String>,

    /// Process each eligible refund instead of only listing them.
    #[arg(long)]
    execute: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let settings = Settings::load(args.config.as_deref())?;

    let signer_key = settings
        .chain
        .signer_key
        .clone()
        .context("chain.signer_key is required for the refund sweep")?;
    let contract = WalletAddress::parse(&settings.chain.contract_address)?;
    let ledger = Arc::new(EvmLedgerClient::new(
        settings.chain_id()?,
        &settings.chain.rpc_url,
        settings.chain.backup_rpc_urls.clone(),
        &contract,
        &signer_key,
    )?);

    let pool = PgPool::connect(&settings.database.url)
        .await
        .context("connecting to the mirror database")?;
    let monitor = RefundMonitor::new(
        ledger,
        Arc::new(PostgresAssetRepository::new(pool.clone())),
        Arc::new(PostgresTradeRepository::new(pool)),
        Arc::new(TracingNotificationSink::new()),
        Arc::new(SystemClock),
        settings.refund_config(),
    );

    let sweep = monitor.scan().await?;
    if sweep.candidates.is_empty() {
        println!("no assets eligible for refund");
        return Ok(());
    }

    println!(
        "{} asset(s) eligible, {} smallest units total",
        sweep.candidates.len(),
        sweep.total_amount
    );
    for candidate in &sweep.candidates {
        println!(
            "  asset {} -> {} ({} smallest units)",
            candidate.asset_id, candidate.recipient, candidate.amount
        );
    }

    if !args.execute {
        println!("dry run; pass --execute to process refunds");
        return Ok(());
    }

    for candidate in &sweep.candidates {
        match monitor.process_refund(candidate.asset_id).await {
            Ok(refund) => println!(
                "refunded asset {} to {} in {}",
                refund.asset_id, refund.recipient, refund.tx_hash
            ),
            Err(e) => eprintln!("asset {}: refund failed: {e}", candidate.asset_id),
        }
    }

    Ok(())
}
