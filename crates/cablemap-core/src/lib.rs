//! cablemap Core Library
//!
//! This crate turns a declarative wiring harness description into a
//! validated topology:
//! - Document loading and configuration sections
//! - Component registry with autogenerated connector instances
//! - Pin specification expansion
//! - Connection row normalization and wire link emission
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Document   │────▶│     Row     │────▶│    Link     │────▶│   Harness   │
//! │   (YAML)    │     │ Normalizer  │     │   Emitter   │     │    Sink     │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//!        │                   ▲
//!        ▼                   │
//! ┌─────────────┐     ┌─────────────┐
//! │  Registry   │────▶│ Pin Ranges  │
//! └─────────────┘     └─────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use cablemap_core::parse_file;
//!
//! let harness = parse_file("./loom.yaml")?;
//! for link in &harness.links {
//!     println!("{}", link);
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod component;
pub mod config;
pub mod connection;
pub mod document;
pub mod error;
pub mod harness;
pub mod link;
pub mod pins;
pub mod registry;

pub use component::{ComponentDefinition, Role};
pub use connection::{EndpointSpec, Slot, normalize_row};
pub use document::{Document, parse, parse_file};
pub use error::{Error, Result};
pub use harness::{Harness, HarnessSink};
pub use link::{PinRef, WireLink, emit_links};
pub use pins::PinLabel;
pub use registry::{AutogenerationCounter, ParseContext, Registry};
