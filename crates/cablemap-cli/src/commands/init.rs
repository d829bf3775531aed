//! Write an example harness document

use anyhow::Result;
use std::fs;
use std::path::Path;

/// File name written by `cablemap init`
pub const EXAMPLE_FILE: &str = "harness.yaml";

const EXAMPLE: &str = r#"# cablemap harness document
metadata:
  title: Example harness

connectors:
  X1:
    type: Molex KK 254
    subtype: female
    pincount: 4
    pinlabels: [GND, VCC, RX, TX]
  X2:
    type: Molex KK 254
    subtype: female
    pincount: 4
    pinlabels: [GND, VCC, RX, TX]
  # A template: every use creates a fresh ferrule (_F_1, _F_2, ...)
  F:
    style: simple
    type: Crimp ferrule
    autogenerate: true

cables:
  W1:
    wirecount: 4
    length: 1
    gauge: 0.25 mm2
    colors: [BK, RD, YE, GN]
  W2:
    wirecount: 2
    length: 0.3
    category: bundle

connections:
  # Rows alternate between connectors and cables, starting with either.
  # `X1: [1-4]` lists pins; ranges are inclusive and may count down.
  - - X1: [1-4]
    - W1: [1-4]
    - X2: [1, 2, 4, 3]
  # A bare template id is instantiated once per wire.
  - - F
    - W2: [1-2]
    - X2: [1-2]

additional_bom_items:
  - description: Heat shrink tubing
    qty: 2
"#;

/// Run the init command
pub fn run(path: &str) -> Result<()> {
    let dir = Path::new(path);

    // Create directory if it doesn't exist
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }

    let target = dir.join(EXAMPLE_FILE);
    if target.exists() {
        anyhow::bail!("'{}' already exists", target.display());
    }

    fs::write(&target, EXAMPLE)?;

    tracing::info!("✓ Created {}", target.display());
    tracing::info!("");
    tracing::info!("Next steps:");
    tracing::info!("  cablemap validate {}", target.display());
    tracing::info!("  cablemap links {} -o links.json", target.display());

    Ok(())
}
