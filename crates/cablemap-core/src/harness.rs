//! Harness assembly
//!
//! The document driver hands its results to a [`HarnessSink`]: components
//! as they become known, then links row by row. [`Harness`] is the
//! collecting implementation used for export and by renderers.

use serde::Serialize;
use serde_yaml::Value;

use crate::component::ComponentDefinition;
use crate::config::{Metadata, Options, Tweak};
use crate::link::WireLink;

/// Receiver of a parsed harness
pub trait HarnessSink {
    /// A concrete connector (declared or autogenerated)
    fn add_connector(&mut self, connector: &ComponentDefinition);

    /// A cable or bundle
    fn add_cable(&mut self, cable: &ComponentDefinition);

    /// One wire link
    fn connect(&mut self, link: WireLink);

    /// An extra bill-of-materials line, passed through unchanged
    fn add_bom_item(&mut self, item: &Value);
}

/// A complete, validated harness
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct Harness {
    /// Document metadata
    pub metadata: Metadata,

    /// Rendering options
    pub options: Options,

    /// Raw renderer overrides
    pub tweak: Tweak,

    /// Concrete connectors in document order, instances after declared ones
    pub connectors: Vec<ComponentDefinition>,

    /// Cables in document order
    pub cables: Vec<ComponentDefinition>,

    /// Wire links in row order
    pub links: Vec<WireLink>,

    /// Additional bill-of-materials items
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub additional_bom_items: Vec<Value>,
}

/// Counts describing a harness
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    /// Concrete connectors
    pub connectors: usize,
    /// Of which autogenerated
    pub autogenerated: usize,
    /// Cables
    pub cables: usize,
    /// Wire links
    pub links: usize,
}

impl Harness {
    /// Create an empty harness with the given document sections
    pub fn new(metadata: Metadata, options: Options, tweak: Tweak) -> Self {
        Self {
            metadata,
            options,
            tweak,
            ..Default::default()
        }
    }

    /// Title from metadata
    pub fn title(&self) -> Option<&str> {
        self.metadata.title()
    }

    /// Use `title` unless the document already names one
    pub fn with_title_fallback(mut self, title: impl Into<String>) -> Self {
        self.metadata.set_title_if_missing(title);
        self
    }

    /// Look up a connector by id
    pub fn connector(&self, id: &str) -> Option<&ComponentDefinition> {
        self.connectors.iter().find(|c| c.id == id)
    }

    /// Component counts
    pub fn summary(&self) -> Summary {
        Summary {
            connectors: self.connectors.len(),
            autogenerated: self
                .connectors
                .iter()
                .filter(|c| c.instance_of.is_some())
                .count(),
            cables: self.cables.len(),
            links: self.links.len(),
        }
    }
}

impl HarnessSink for Harness {
    fn add_connector(&mut self, connector: &ComponentDefinition) {
        self.connectors.push(connector.clone());
    }

    fn add_cable(&mut self, cable: &ComponentDefinition) {
        self.cables.push(cable.clone());
    }

    fn connect(&mut self, link: WireLink) {
        self.links.push(link);
    }

    fn add_bom_item(&mut self, item: &Value) {
        self.additional_bom_items.push(item.clone());
    }
}
