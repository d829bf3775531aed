//! Connection rows
//!
//! A row lists the components one lane of wiring passes through, alternating
//! between connectors and cables. It may start with either. Each entry is
//! one of:
//!
//! - a single id (`X1`): pin 1 of that component, once per wire
//! - a list of ids (`[F, F, X2]`): pin 1 of each, one per wire
//! - a single-key mapping (`X1: 1-3`): the listed pins of one component
//!
//! Ids are strings. Integer ids (`1`, `[1, 2]`, `{1: 3}`) are read as their
//! decimal text, matching how integer keys in `connectors:` and `cables:`
//! are read.
//!
//! # Example
//!
//! ```yaml
//! connections:
//!   - - X1: [1-3]
//!     - W1: [1-3]
//!     - [F, F, F]    # F is an autogenerate template: three ferrules
//! ```

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

use crate::component::Role;
use crate::error::{Error, Result};
use crate::link::PinRef;
use crate::pins::{self, PinLabel};
use crate::registry::{ParseContext, Registry};

/// One position-aligned column of a row: `slot[j]` is wired to `slot[j]`
/// of the neighbouring slots.
pub type Slot = Vec<PinRef>;

/// A raw entry of a connection row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EndpointSpec {
    /// Single component id
    Scalar(String),
    /// List of component ids
    List(Vec<String>),
    /// Component id mapped to a pin specification
    Mapping(Mapping),
    /// Any other YAML value, resolved or rejected by [`normalize_row`]
    Other(Value),
}

impl EndpointSpec {
    /// Shorthand for a mapping entry `id: pins`
    pub fn pins(id: impl Into<String>, pins: impl Into<Value>) -> Self {
        let mut mapping = Mapping::new();
        mapping.insert(Value::String(id.into()), pins.into());
        EndpointSpec::Mapping(mapping)
    }

    /// Rewrite integer ids as strings; reject entries that name no component.
    fn canonical(&self, row: usize, item: usize) -> Result<Cow<'_, EndpointSpec>> {
        let invalid = |message: String| Error::InvalidEndpoint { row, item, message };
        match self {
            EndpointSpec::Mapping(mapping) if mapping.keys().any(Value::is_number) => {
                let mapping = mapping
                    .iter()
                    .map(|(key, value)| {
                        let key = id_text(key).map(Value::String).unwrap_or_else(|| key.clone());
                        (key, value.clone())
                    })
                    .collect();
                Ok(Cow::Owned(EndpointSpec::Mapping(mapping)))
            }
            EndpointSpec::Other(Value::Sequence(values)) => values
                .iter()
                .map(|value| {
                    id_text(value).ok_or_else(|| {
                        invalid(format!("list entries must be component ids, got {:?}", value))
                    })
                })
                .collect::<Result<Vec<_>>>()
                .map(|ids| Cow::Owned(EndpointSpec::List(ids))),
            EndpointSpec::Other(value) => id_text(value)
                .map(|id| Cow::Owned(EndpointSpec::Scalar(id)))
                .ok_or_else(|| other_entry(row, item, value)),
            _ => Ok(Cow::Borrowed(self)),
        }
    }
}

fn other_entry(row: usize, item: usize, value: &Value) -> Error {
    Error::InvalidEndpoint {
        row,
        item,
        message: format!(
            "expected a component id, a list of ids or a single-key mapping, got {:?}",
            value
        ),
    }
}

/// Text of an id written as a string or an integer
fn id_text(value: &Value) -> Option<String> {
    match value {
        Value::String(id) => Some(id.clone()),
        Value::Number(n) if n.is_u64() || n.is_i64() => Some(n.to_string()),
        _ => None,
    }
}

/// An entry after validation, before instances are created
enum Endpoint<'a> {
    Single(&'a str),
    Many(&'a [String]),
    Pins(&'a str, Vec<PinLabel>),
}

impl Endpoint<'_> {
    /// Number of wires this entry determines, if any
    fn count(&self) -> Option<usize> {
        match self {
            Endpoint::Single(_) => None,
            Endpoint::Many(ids) => Some(ids.len()),
            Endpoint::Pins(_, pins) => Some(pins.len()),
        }
    }
}

/// Validate a row and expand it into position-aligned slots.
///
/// Autogenerate templates referenced by id are instantiated here and the
/// new instances registered in `ctx`. On error the row is rejected as a
/// whole; the caller is expected to abort the document.
pub fn normalize_row(
    ctx: &mut ParseContext,
    row: usize,
    items: &[EndpointSpec],
) -> Result<Vec<Slot>> {
    let items = items
        .iter()
        .enumerate()
        .map(|(item, spec)| spec.canonical(row, item))
        .collect::<Result<Vec<_>>>()?;
    let first = items.first().ok_or(Error::EmptyRow { row })?;
    let mut expected = infer_first_role(&ctx.registry, row, first)?;

    let mut cardinality: Option<usize> = None;
    let mut endpoints = Vec::with_capacity(items.len());

    for (item, spec) in items.iter().enumerate() {
        let endpoint = match spec.as_ref() {
            EndpointSpec::Scalar(id) => {
                check_role(&ctx.registry, row, item, id, expected)?;
                Endpoint::Single(id)
            }
            EndpointSpec::List(ids) => {
                if ids.is_empty() {
                    return Err(Error::EmptyEndpoint { row, item });
                }
                for id in ids {
                    check_role(&ctx.registry, row, item, id, expected)?;
                }
                Endpoint::Many(ids)
            }
            EndpointSpec::Mapping(mapping) => {
                let (id, spec) = single_entry(mapping, row, item)?;
                check_role(&ctx.registry, row, item, id, expected)?;
                if ctx.registry.lookup(id).is_some_and(|def| def.autogenerate) {
                    return Err(Error::TemplateInMapping {
                        row,
                        item,
                        id: id.to_string(),
                    });
                }
                let pins = pins::expand(spec).map_err(|e| e.at(row, item))?;
                Endpoint::Pins(id, pins)
            }
            EndpointSpec::Other(value) => return Err(other_entry(row, item, value)),
        };

        if let Some(found) = endpoint.count() {
            match cardinality {
                Some(fixed) if fixed != found => {
                    return Err(Error::CardinalityMismatch {
                        row,
                        item,
                        expected: fixed,
                        found,
                    });
                }
                _ => cardinality = Some(found),
            }
        }

        endpoints.push(endpoint);
        expected = expected.flip();
    }

    let cardinality = cardinality.ok_or(Error::NoCardinalityRevealed { row })?;

    let mut slots = Vec::with_capacity(endpoints.len());
    for endpoint in endpoints {
        let slot = match endpoint {
            Endpoint::Single(id) => (0..cardinality)
                .map(|_| first_pin(ctx, id))
                .collect::<Result<Slot>>()?,
            Endpoint::Many(ids) => ids
                .iter()
                .map(|id| first_pin(ctx, id))
                .collect::<Result<Slot>>()?,
            Endpoint::Pins(id, pins) => {
                pins.into_iter().map(|pin| PinRef::new(id, pin)).collect()
            }
        };
        slots.push(slot);
    }

    tracing::debug!(row, cardinality, slots = slots.len(), "normalized connection row");
    Ok(slots)
}

fn infer_first_role(registry: &Registry, row: usize, first: &EndpointSpec) -> Result<Role> {
    let id = match first {
        EndpointSpec::Scalar(id) => id.as_str(),
        EndpointSpec::List(ids) => ids
            .first()
            .ok_or(Error::EmptyEndpoint { row, item: 0 })?
            .as_str(),
        EndpointSpec::Mapping(mapping) => single_entry(mapping, row, 0)?.0,
        EndpointSpec::Other(value) => return Err(other_entry(row, 0, value)),
    };
    registry.role_of(id).ok_or_else(|| Error::RoleAlternation {
        row,
        item: 0,
        id: id.to_string(),
        expected: None,
    })
}

fn check_role(
    registry: &Registry,
    row: usize,
    item: usize,
    id: &str,
    expected: Role,
) -> Result<()> {
    match registry.role_of(id) {
        Some(role) if role == expected => Ok(()),
        Some(_) => Err(Error::RoleAlternation {
            row,
            item,
            id: id.to_string(),
            expected: Some(expected),
        }),
        None => Err(Error::UnknownComponent {
            row,
            item,
            id: id.to_string(),
        }),
    }
}

fn single_entry(mapping: &Mapping, row: usize, item: usize) -> Result<(&str, &Value)> {
    if mapping.len() != 1 {
        return Err(Error::MultiKeyMapping {
            row,
            item,
            keys: mapping.len(),
        });
    }
    let (key, value) = mapping
        .iter()
        .next()
        .ok_or(Error::MultiKeyMapping { row, item, keys: 0 })?;
    let id = key.as_str().ok_or_else(|| Error::InvalidEndpoint {
        row,
        item,
        message: format!("component ids must be strings, got {:?}", key),
    })?;
    Ok((id, value))
}

/// Pin 1 of `id`, or of a fresh instance when `id` is an autogenerate template
fn first_pin(ctx: &mut ParseContext, id: &str) -> Result<PinRef> {
    let template = match ctx.registry.lookup(id) {
        Some(def) if def.autogenerate => def.clone(),
        _ => return Ok(PinRef::new(id, PinLabel::Number(1))),
    };
    let instance = ctx.instantiate(&template)?;
    Ok(PinRef::new(instance, PinLabel::Number(1)))
}
