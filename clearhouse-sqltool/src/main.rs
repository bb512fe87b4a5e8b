//! One-off schema maintenance CLI
//!
//! Reads a SQL string from the arguments or a file and hands it to the
//! store's administrative procedure. Needs the service-role key;
//! nothing in the console UI goes through this path.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use clearhouse_client::{StoreConfig, admin};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "clearhouse-sql",
    about = "Run an administrative SQL statement against the hosted store"
)]
struct Args {
    /// SQL statement to execute
    #[arg(long)]
    sql: Option<String>,

    /// Read the SQL from a file instead
    #[arg(long, conflicts_with = "sql")]
    file: Option<PathBuf>,

    /// Store project URL
    #[arg(long, env = "STORE_URL")]
    store_url: String,

    /// Service-role key (never the anon key)
    #[arg(long, env = "STORE_SERVICE_ROLE_KEY", hide_env_values = true)]
    service_role_key: String,

    /// Bare trailing words are joined into a statement when neither
    /// --sql nor --file is given
    #[arg(trailing_var_arg = true)]
    rest: Vec<String>,
}

impl Args {
    fn resolve_sql(&self) -> Result<String> {
        if let Some(path) = &self.file {
            return std::fs::read_to_string(path)
                .with_context(|| format!("SQL file not found: {}", path.display()));
        }
        if let Some(sql) = &self.sql {
            return Ok(sql.clone());
        }
        let joined = self.rest.join(" ");
        if !joined.trim().is_empty() {
            return Ok(joined);
        }
        bail!(
            "No SQL provided. Use:\n  clearhouse-sql --sql \"alter table ...\"\n  clearhouse-sql --file query.sql"
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env values feed the clap env fallbacks, so load them first
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let sql = args.resolve_sql()?;

    let store = StoreConfig::new(&args.store_url, &args.service_role_key).build();
    admin::run_admin_sql(&store, &sql)
        .await
        .context("SQL execution failed")?;

    Ok(())
}
