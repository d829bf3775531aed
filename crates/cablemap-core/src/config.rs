//! Document-level configuration sections
//!
//! Besides components and connections, a harness document may carry:
//!
//! - `metadata` - free-form descriptive data; `title` is recognised
//! - `options` - rendering options handed through to the renderer
//! - `tweak` - raw renderer overrides, passed through untouched
//!
//! # Example
//!
//! ```yaml
//! metadata:
//!   title: Sensor loom
//!   pn: HRN-0042
//! options:
//!   bgcolor: BK
//!   color_mode: full
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::{Mapping, Value};

/// Free-form document metadata
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(transparent)]
pub struct Metadata(pub IndexMap<String, Value>);

impl Metadata {
    /// Document title, when given as a string
    pub fn title(&self) -> Option<&str> {
        self.0.get("title").and_then(Value::as_str)
    }

    /// Set the title unless one is already present
    pub fn set_title_if_missing(&mut self, title: impl Into<String>) {
        self.0
            .entry("title".to_string())
            .or_insert_with(|| Value::String(title.into()));
    }
}

/// Rendering options
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Options {
    /// Font used for all labels
    #[serde(default = "default_fontname")]
    pub fontname: String,

    /// Diagram background color
    #[serde(default = "default_bgcolor")]
    pub bgcolor: String,

    /// Default node background color
    #[serde(default = "default_bgcolor")]
    pub bgcolor_node: String,

    /// Connector background color (falls back to `bgcolor_node`)
    #[serde(default)]
    pub bgcolor_connector: Option<String>,

    /// Cable background color (falls back to `bgcolor_node`)
    #[serde(default)]
    pub bgcolor_cable: Option<String>,

    /// Bundle background color (falls back to `bgcolor_cable`)
    #[serde(default)]
    pub bgcolor_bundle: Option<String>,

    /// How wire colors are spelled out: full, short, hex, ger
    #[serde(default = "default_color_mode")]
    pub color_mode: String,

    /// Whether the renderer adds a mini BOM to each component
    #[serde(default = "default_mini_bom_mode")]
    pub mini_bom_mode: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            fontname: default_fontname(),
            bgcolor: default_bgcolor(),
            bgcolor_node: default_bgcolor(),
            bgcolor_connector: None,
            bgcolor_cable: None,
            bgcolor_bundle: None,
            color_mode: default_color_mode(),
            mini_bom_mode: default_mini_bom_mode(),
        }
    }
}

fn default_fontname() -> String {
    "arial".to_string()
}

fn default_bgcolor() -> String {
    "WH".to_string()
}

fn default_color_mode() -> String {
    "SHORT".to_string()
}

fn default_mini_bom_mode() -> bool {
    true
}

/// Raw renderer overrides
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Tweak {
    /// Per-node attribute overrides
    #[serde(default, rename = "override")]
    pub overrides: Option<Mapping>,

    /// Text appended verbatim to the renderer's output
    #[serde(default)]
    pub append: Option<Value>,
}

/// Treat an explicit YAML `null` the same as a missing key
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
