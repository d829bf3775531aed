//! Component definitions
//!
//! A component is anything a connection row can name: a connector (one end
//! of a wire) or a cable/bundle (the wires themselves). Apart from the role
//! and the autogenerate flag, attributes are carried through opaquely for
//! the renderer.

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

use crate::error::{Error, Result};

/// The role a component plays in a connection row
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Connector, splice or ferrule
    Connector,
    /// Cable or bundle of wires
    Cable,
}

impl Role {
    /// The other role; rows alternate between the two
    pub fn flip(self) -> Self {
        match self {
            Role::Connector => Role::Cable,
            Role::Cable => Role::Connector,
        }
    }

    /// Name of the document section components of this role are declared in
    pub fn section(self) -> &'static str {
        match self {
            Role::Connector => "connectors",
            Role::Cable => "cables",
        }
    }
}

/// Static definition of a connector or cable
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ComponentDefinition {
    /// Designator, unique across the document
    pub id: String,

    /// Connector or cable
    pub role: Role,

    /// Whether this connector is a template instantiated on every use
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub autogenerate: bool,

    /// Template this instance was generated from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_of: Option<String>,

    /// Remaining attributes, uninterpreted
    pub attributes: Mapping,
}

impl ComponentDefinition {
    /// Build a definition from a document section entry.
    ///
    /// `autogenerate` must be a boolean when present; it is only honoured
    /// for connectors and stays an opaque attribute on cables.
    pub fn from_attributes(id: impl Into<String>, role: Role, attributes: Mapping) -> Result<Self> {
        let id = id.into();
        let autogenerate = match (role, attributes.get("autogenerate")) {
            (Role::Connector, Some(Value::Bool(flag))) => *flag,
            (Role::Connector, Some(other)) => {
                return Err(Error::DocumentInvalid {
                    message: format!(
                        "connector '{}': autogenerate must be true or false, got {:?}",
                        id, other
                    ),
                });
            }
            _ => false,
        };

        Ok(Self {
            id,
            role,
            autogenerate,
            instance_of: None,
            attributes,
        })
    }

    /// Declared connector without attributes
    pub fn connector(id: impl Into<String>) -> Self {
        Self::bare(id, Role::Connector)
    }

    /// Declared cable without attributes
    pub fn cable(id: impl Into<String>) -> Self {
        Self::bare(id, Role::Cable)
    }

    /// Autogenerate connector template without attributes
    pub fn template(id: impl Into<String>) -> Self {
        Self {
            autogenerate: true,
            ..Self::bare(id, Role::Connector)
        }
    }

    fn bare(id: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            role,
            autogenerate: false,
            instance_of: None,
            attributes: Mapping::new(),
        }
    }

    /// Clone this template into a concrete instance named `id`.
    ///
    /// The instance keeps every attribute except `autogenerate`, so it is
    /// never itself treated as a template.
    pub fn instantiate(&self, id: impl Into<String>) -> Self {
        let mut attributes = self.attributes.clone();
        attributes.remove("autogenerate");
        Self {
            id: id.into(),
            role: self.role,
            autogenerate: false,
            instance_of: Some(self.id.clone()),
            attributes,
        }
    }
}
