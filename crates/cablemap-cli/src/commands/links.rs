//! Export resolved wire links

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use cablemap_core::Harness;

use super::load_document;
use crate::Format;

/// Run the links command
pub fn run(
    input: &str,
    prepend_file: Option<&str>,
    output: Option<&str>,
    format: Format,
) -> Result<()> {
    let harness = load_document(input, prepend_file)?
        .into_harness()
        .context("Harness document is invalid")?;

    // Title falls back to the output name, then the input name
    let title_source = output.unwrap_or(input);
    let harness = match Path::new(title_source).file_stem().and_then(|s| s.to_str()) {
        Some(stem) => harness.with_title_fallback(stem),
        None => harness,
    };

    let rendered = render(&harness, format)?;

    match output {
        Some(path) => {
            let path = Path::new(path);
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!(
                "✓ Wrote {} wire links to {}",
                harness.links.len(),
                path.display()
            );
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            stdout.flush()?;
        }
    }

    Ok(())
}

fn render(harness: &Harness, format: Format) -> Result<String> {
    Ok(match format {
        Format::Json => {
            let mut json = serde_json::to_string_pretty(harness)?;
            json.push('\n');
            json
        }
        Format::Yaml => serde_yaml::to_string(harness)?,
    })
}
