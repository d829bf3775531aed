//! CLI command implementations

use std::path::Path;

use anyhow::{Context, Result};
use cablemap_core::Document;

pub mod init;
pub mod links;
pub mod validate;

/// Load a document, optionally with a library file prepended
fn load_document(input: &str, prepend_file: Option<&str>) -> Result<Document> {
    tracing::info!("Loading harness document from {}", input);

    let document = match prepend_file {
        Some(prepend) => {
            tracing::debug!("Prepending {}", prepend);
            Document::load_with_prepend(input, prepend)
        }
        None => Document::load(input),
    };
    document.with_context(|| format!("Failed to load {}", Path::new(input).display()))
}
