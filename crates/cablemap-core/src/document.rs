//! Harness documents
//!
//! Loads a YAML harness description and drives it through the registry,
//! the row normalizer and the link emitter into a [`HarnessSink`].
//!
//! # Document Sections
//!
//! - `connectors` - id -> attributes (`autogenerate: true` marks a template)
//! - `cables` - id -> attributes
//! - `connections` - list of rows
//! - `metadata`, `options`, `tweak` - see [`crate::config`]
//! - `additional_bom_items` - passed through to the bill of materials
//!
//! # Example
//!
//! ```yaml
//! connectors:
//!   X1:
//!     pincount: 4
//!   F:
//!     style: simple
//!     autogenerate: true
//! cables:
//!   W1:
//!     wirecount: 4
//! connections:
//!   - - X1: [1-4]
//!     - W1: [1-4]
//!     - F
//! ```

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

use crate::component::{ComponentDefinition, Role};
use crate::config::{Metadata, Options, Tweak, null_as_default};
use crate::connection::{EndpointSpec, normalize_row};
use crate::error::{Error, Result};
use crate::harness::{Harness, HarnessSink};
use crate::link::emit_links;
use crate::registry::{ParseContext, Registry};

/// A deserialized harness document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    /// Descriptive metadata
    #[serde(default, deserialize_with = "null_as_default")]
    pub metadata: Metadata,

    /// Rendering options
    #[serde(default, deserialize_with = "null_as_default")]
    pub options: Options,

    /// Raw renderer overrides
    #[serde(default, deserialize_with = "null_as_default")]
    pub tweak: Tweak,

    /// Connector definitions by id
    #[serde(default, deserialize_with = "null_as_default")]
    pub connectors: IndexMap<String, Option<Mapping>>,

    /// Cable and bundle definitions by id
    #[serde(default, deserialize_with = "null_as_default")]
    pub cables: IndexMap<String, Option<Mapping>>,

    /// Connection rows
    #[serde(default, deserialize_with = "null_as_default")]
    pub connections: Vec<Vec<EndpointSpec>>,

    /// Extra bill-of-materials lines
    #[serde(default, deserialize_with = "null_as_default")]
    pub additional_bom_items: Vec<Value>,
}

impl Document {
    /// Parse a document from YAML text
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load a document from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_yaml(&read_document(path.as_ref())?)
    }

    /// Load a document with another file's text prepended.
    ///
    /// Lets a shared library of connectors and cables be reused across
    /// documents: the prepended text must end where the main file's
    /// top-level keys can continue.
    pub fn load_with_prepend<P: AsRef<Path>, Q: AsRef<Path>>(path: P, prepend: Q) -> Result<Self> {
        let mut yaml = read_document(prepend.as_ref())?;
        if !yaml.is_empty() && !yaml.ends_with('\n') {
            yaml.push('\n');
        }
        yaml.push_str(&read_document(path.as_ref())?);
        Self::from_yaml(&yaml)
    }

    /// Register the declared components into a fresh registry.
    ///
    /// Templates are registered too so rows can name them; they are never
    /// forwarded to a sink themselves.
    pub fn registry(&self) -> Result<Registry> {
        let mut registry = Registry::new();
        let sections = [(Role::Connector, &self.connectors), (Role::Cable, &self.cables)];
        for (role, section) in sections {
            for (id, attributes) in section {
                let attributes = attributes.clone().unwrap_or_default();
                let definition =
                    ComponentDefinition::from_attributes(id.as_str(), role, attributes)?;
                registry.register(definition)?;
            }
        }
        Ok(registry)
    }

    /// Resolve every connection row and feed the result to `sink`.
    ///
    /// The first invalid row aborts the whole document.
    pub fn build<S: HarnessSink>(&self, sink: &mut S) -> Result<ParseContext> {
        let mut ctx = ParseContext::new(self.registry()?);

        for def in ctx.registry.iter() {
            match def.role {
                Role::Connector if !def.autogenerate => sink.add_connector(def),
                Role::Connector => {}
                Role::Cable => sink.add_cable(def),
            }
        }

        let mut links = 0;
        for (row, items) in self.connections.iter().enumerate() {
            let known = ctx.registry.len();
            let slots = normalize_row(&mut ctx, row, items)?;
            for instance in ctx.registry.iter().skip(known) {
                sink.add_connector(instance);
            }

            let row_links = emit_links(&ctx.registry, row, &slots)?;
            if row_links.is_empty() {
                tracing::warn!(row, "connection row contains no cable");
            }
            links += row_links.len();
            for link in row_links {
                sink.connect(link);
            }
        }

        for item in &self.additional_bom_items {
            sink.add_bom_item(item);
        }

        tracing::info!(
            components = ctx.registry.len(),
            rows = self.connections.len(),
            links,
            "harness document resolved"
        );
        Ok(ctx)
    }

    /// Resolve the document into a collected [`Harness`]
    pub fn into_harness(self) -> Result<Harness> {
        let mut harness = Harness::new(
            self.metadata.clone(),
            self.options.clone(),
            self.tweak.clone(),
        );
        self.build(&mut harness)?;
        Ok(harness)
    }
}

/// Parse YAML text into a harness
pub fn parse(yaml: &str) -> Result<Harness> {
    Document::from_yaml(yaml)?.into_harness()
}

/// Parse a harness file; the title defaults to the file stem
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Harness> {
    let path = path.as_ref();
    let harness = Document::load(path)?.into_harness()?;
    Ok(match path.file_stem().and_then(|s| s.to_str()) {
        Some(stem) => harness.with_title_fallback(stem),
        None => harness,
    })
}

fn read_document(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(Error::DocumentNotFound {
            path: path.display().to_string(),
        });
    }
    Ok(std::fs::read_to_string(path)?)
}
