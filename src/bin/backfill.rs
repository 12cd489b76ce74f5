use anyhow::{Context, Result, bail};
use purchase_bridge::application::usercases::{
    backfill::{BackfillOrderRecord, BackfillUseCase},
    purchase_ingestion::PurchaseIngestionUseCase,
};
use purchase_bridge::config::config_loader;
use purchase_bridge::infrastructure::postgres::{
    postgres_connection,
    repositories::{entitlements::EntitlementPostgres, identities::IdentityPostgres},
};
use std::sync::Arc;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        error!("Backfill exited with error: {:#}", error);
        eprintln!("backfill: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let (orders_path, dry_run) = parse_args()?;

    // Credentials are checked before touching the input file so a
    // misconfigured environment fails fast.
    let database_url = config_loader::get_backfill_database_url()?;
    let postgres_pool = postgres_connection::establish_connection(&database_url)?;
    let db_pool = Arc::new(postgres_pool);

    let ingestion = PurchaseIngestionUseCase::new(
        Arc::new(IdentityPostgres::new(Arc::clone(&db_pool))),
        Arc::new(EntitlementPostgres::new(Arc::clone(&db_pool))),
    );

    let raw = std::fs::read_to_string(&orders_path)
        .with_context(|| format!("failed to read orders file: {orders_path}"))?;
    let records: Vec<BackfillOrderRecord> =
        serde_json::from_str(&raw).context("orders file is not a JSON array of order records")?;

    let backfill = BackfillUseCase::new(Arc::new(ingestion));
    backfill.run(&records, dry_run).await;

    Ok(())
}

fn parse_args() -> Result<(String, bool)> {
    let mut orders_path = None;
    let mut dry_run = false;

    for arg in std::env::args().skip(1) {
        if arg == "--dry-run" {
            dry_run = true;
        } else if orders_path.is_none() {
            orders_path = Some(arg);
        } else {
            bail!("unexpected argument: {arg}");
        }
    }

    let Some(orders_path) = orders_path else {
        bail!("usage: backfill <orders.json> [--dry-run]");
    };

    Ok((orders_path, dry_run))
}
