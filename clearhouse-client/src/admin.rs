//! Administrative remote procedures
//!
//! Schema maintenance goes through a single privileged RPC; nothing in
//! the console UI calls this. Used by the `clearhouse-sql` tool.

use serde_json::json;

use crate::{ClientResult, HttpTableStore};

/// Execute a raw SQL string through the `run_admin_sql` procedure.
///
/// Requires a store built with the service-role key.
pub async fn run_admin_sql(store: &HttpTableStore, sql: &str) -> ClientResult<()> {
    store.rpc("run_admin_sql", &json!({ "sql": sql })).await?;
    tracing::info!("SQL executed successfully");
    Ok(())
}
