//! Pin specifications
//!
//! A pin specification names one or more pins of a single component in a
//! compact form. Expansion preserves authoring order and keeps repeats.
//!
//! # Grammar (v1)
//!
//! ```text
//! pin-spec  := scalar | sequence-of-scalars
//! scalar    := integer | string
//! string    := term ("," term)*
//! term      := range | integer | label
//! range     := integer "-" integer        inclusive, ascending or descending
//! label     := any other non-empty text
//! ```
//!
//! A single range may span at most [`MAX_RANGE_PINS`] pins.
//!
//! # Example
//!
//! ```yaml
//! connections:
//!   - - X1: [1-3, 5]      # 1, 2, 3, 5
//!     - W1: "4-2,GND"     # 4, 3, 2, GND
//! ```

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use crate::error::{Error, Result};

static RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<start>\d*)\s*-\s*(?P<end>\d*)$").expect("range pattern is valid")
});

static INTEGER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+$").expect("integer pattern is valid"));

/// Largest number of pins a single range term may expand to
pub const MAX_RANGE_PINS: u64 = 65_536;

/// A single pin label
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PinLabel {
    /// Numbered pin
    Number(u64),
    /// Named pin (e.g. `GND`)
    Name(String),
}

impl fmt::Display for PinLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PinLabel::Number(n) => write!(f, "{}", n),
            PinLabel::Name(name) => f.write_str(name),
        }
    }
}

impl From<u64> for PinLabel {
    fn from(n: u64) -> Self {
        PinLabel::Number(n)
    }
}

impl From<&str> for PinLabel {
    fn from(name: &str) -> Self {
        PinLabel::Name(name.to_string())
    }
}

/// Expand a pin specification into an ordered list of pin labels.
pub fn expand(spec: &Value) -> Result<Vec<PinLabel>> {
    let mut pins = Vec::new();
    match spec {
        Value::Sequence(items) => {
            if items.is_empty() {
                return Err(malformed(spec, "empty pin list"));
            }
            for item in items {
                expand_scalar(item, &mut pins)?;
            }
        }
        other => expand_scalar(other, &mut pins)?,
    }
    Ok(pins)
}

fn expand_scalar(value: &Value, pins: &mut Vec<PinLabel>) -> Result<()> {
    match value {
        Value::Number(n) => {
            let pin = n
                .as_u64()
                .ok_or_else(|| malformed(value, "pin numbers must be non-negative integers"))?;
            pins.push(PinLabel::Number(pin));
            Ok(())
        }
        Value::String(s) => expand_text(s, pins),
        Value::Null => Err(malformed(value, "missing pin specification")),
        Value::Bool(_) => Err(malformed(value, "a boolean is not a pin")),
        Value::Sequence(_) => Err(malformed(value, "nested pin lists are not allowed")),
        Value::Mapping(_) => Err(malformed(value, "a mapping is not a pin")),
        Value::Tagged(tagged) => expand_scalar(&tagged.value, pins),
    }
}

fn expand_text(text: &str, pins: &mut Vec<PinLabel>) -> Result<()> {
    for raw in text.split(',') {
        let term = raw.trim();
        if term.is_empty() {
            return Err(malformed_text(text, "empty pin term"));
        }

        if INTEGER.is_match(term) {
            pins.push(PinLabel::Number(parse_pin(text, term)?));
        } else if let Some(caps) = RANGE.captures(term) {
            let (start, end) = (&caps["start"], &caps["end"]);
            if start.is_empty() || end.is_empty() {
                return Err(malformed_text(text, &format!("incomplete range '{}'", term)));
            }
            let (start, end) = (parse_pin(text, start)?, parse_pin(text, end)?);
            if start.abs_diff(end) >= MAX_RANGE_PINS {
                return Err(malformed_text(
                    text,
                    &format!("range '{}' is too large (limit {} pins)", term, MAX_RANGE_PINS),
                ));
            }
            if start <= end {
                pins.extend((start..=end).map(PinLabel::Number));
            } else {
                pins.extend((end..=start).rev().map(PinLabel::Number));
            }
        } else {
            pins.push(PinLabel::Name(term.to_string()));
        }
    }
    Ok(())
}

fn parse_pin(text: &str, digits: &str) -> Result<u64> {
    digits
        .parse::<u64>()
        .map_err(|_| malformed_text(text, &format!("pin number '{}' is out of range", digits)))
}

fn malformed(value: &Value, message: &str) -> Error {
    let spec = serde_yaml::to_string(value)
        .map(|s| s.trim_end().to_string())
        .unwrap_or_else(|_| format!("{:?}", value));
    Error::MalformedPinSpec {
        location: None,
        spec,
        message: message.to_string(),
    }
}

fn malformed_text(text: &str, message: &str) -> Error {
    Error::MalformedPinSpec {
        location: None,
        spec: text.to_string(),
        message: message.to_string(),
    }
}
