//! Validate a harness document

use anyhow::{Context, Result};

use super::load_document;

/// Run the validate command
pub fn run(input: &str, prepend_file: Option<&str>) -> Result<()> {
    let document = load_document(input, prepend_file)?;
    let rows = document.connections.len();

    let harness = document
        .into_harness()
        .context("Harness document is invalid")?;
    let summary = harness.summary();

    tracing::info!(
        "✓ Connectors: {} ({} autogenerated)",
        summary.connectors,
        summary.autogenerated
    );
    tracing::info!("✓ Cables: {}", summary.cables);
    tracing::info!("✓ Connection rows: {}", rows);
    tracing::info!("✓ Wire links: {}", summary.links);
    tracing::info!("✓ Harness document is valid");
    Ok(())
}
