//! Deployment bootstrap for the quotation engine.
//!
//! Runs the explicit migration step once: loads configuration, connects to
//! the database, creates the schema from the entity definitions and seeds
//! the default admin account. Engine operations never migrate implicitly.

use cotizador::config::{database, settings};
use cotizador::errors::Result;
use dotenvy::dotenv;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    dotenv().ok();

    let config = settings::load_or_default()?;
    info!(
        prefix = %config.numbering.prefix,
        tax_rate = %config.tax.default_rate_percent,
        "configuration loaded"
    );

    let db = database::create_connection().await?;
    database::run_migrations(&db).await?;
    info!("database schema ready");

    Ok(())
}
