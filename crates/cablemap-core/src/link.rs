//! Wire links
//!
//! Turns the normalized slots of one connection row into point-to-point
//! links. Only cable slots emit; their neighbours are the connectors on
//! either side, or nothing when the row starts or ends on a cable.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::component::Role;
use crate::connection::Slot;
use crate::error::{Error, Result};
use crate::pins::PinLabel;
use crate::registry::Registry;

/// One pin of one component
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PinRef {
    /// Component id
    pub component: String,
    /// Pin on that component
    pub pin: PinLabel,
}

impl PinRef {
    /// Create a pin reference
    pub fn new(component: impl Into<String>, pin: PinLabel) -> Self {
        Self {
            component: component.into(),
            pin,
        }
    }
}

impl fmt::Display for PinRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.component, self.pin)
    }
}

/// A single wire: from a connector pin, through a cable wire, to a connector pin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireLink {
    /// Connector pin on the near side, `None` if the row starts on this cable
    pub from: Option<PinRef>,
    /// Cable wire
    pub via: PinRef,
    /// Connector pin on the far side, `None` if the row ends on this cable
    pub to: Option<PinRef>,
}

impl fmt::Display for WireLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.from {
            Some(from) => write!(f, "{} ", from)?,
            None => f.write_str("- ")?,
        }
        write!(f, "=[{}]=", self.via)?;
        match &self.to {
            Some(to) => write!(f, " {}", to),
            None => f.write_str(" -"),
        }
    }
}

/// Emit the links of one normalized row.
///
/// `row` is only used to locate errors.
pub fn emit_links(registry: &Registry, row: usize, slots: &[Slot]) -> Result<Vec<WireLink>> {
    let mut links = Vec::new();
    let last = slots.len().saturating_sub(1);

    for (i, slot) in slots.iter().enumerate() {
        let Some(head) = slot.first() else {
            continue;
        };
        let role = registry
            .role_of(&head.component)
            .ok_or_else(|| Error::UnknownComponent {
                row,
                item: i,
                id: head.component.clone(),
            })?;
        if role != Role::Cable {
            continue;
        }

        for (j, via) in slot.iter().enumerate() {
            let from = if i > 0 {
                slots[i - 1].get(j).cloned()
            } else {
                None
            };
            let to = if i < last {
                slots[i + 1].get(j).cloned()
            } else {
                None
            };
            links.push(WireLink {
                from,
                via: via.clone(),
                to,
            });
        }
    }

    Ok(links)
}
