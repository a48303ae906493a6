use anyhow::Context;
use tracing::info;

use stock_ledger as app;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = app::config::load_config().context("failed to load configuration")?;
    app::config::init_tracing(cfg.log_level(), cfg.log_json);

    info!("Starting database migration");
    app::migrator::run_migration(cfg.database_url())
        .await
        .context("database migration failed")?;

    Ok(())
}
