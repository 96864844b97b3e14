//! Tables command - store connectivity diagnostics.

use anyhow::Result;
use config::Config;
use docstore::DocStore;

/// Runs the tables command.
///
/// # Errors
///
/// Returns an error if the store cannot be reached.
pub async fn run(config: &Config) -> Result<()> {
    let store = DocStore::new(&config.docstore_endpoint, &config.docstore_access_token)?;
    let tables = store.list_tables().await?;

    if tables.is_empty() {
        println!("No tables visible to the configured credentials.");
        return Ok(());
    }

    for table in tables {
        println!("{table}");
    }

    Ok(())
}
