//! Error types for cablemap-core

use thiserror::Error;

use crate::component::Role;

/// Result type alias for cablemap-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in cablemap-core
///
/// Row-level variants carry the zero-based `row` index into `connections`
/// and, where a single entry is at fault, the zero-based `item` index
/// within that row.
#[derive(Error, Debug)]
pub enum Error {
    /// Harness document could not be found
    #[error("harness document not found: {path}")]
    DocumentNotFound {
        /// Path that was searched
        path: String,
    },

    /// Failed to parse the YAML document
    #[error("failed to parse harness document: {0}")]
    DocumentParse(#[from] serde_yaml::Error),

    /// Document is well-formed YAML but semantically invalid
    #[error("invalid harness document: {message}")]
    DocumentInvalid {
        /// Description of what's invalid
        message: String,
    },

    /// A component id was registered twice
    #[error("duplicate component id '{id}'")]
    DuplicateId {
        /// The conflicting id
        id: String,
    },

    /// A row references an id that is neither a connector nor a cable
    #[error("connection row {row}, item {item}: unknown component '{id}'")]
    UnknownComponent {
        /// Row index
        row: usize,
        /// Item index
        item: usize,
        /// The unknown id
        id: String,
    },

    /// An item does not have the role its position in the row requires
    #[error("connection row {row}, item {item}: {}", describe_alternation(.id, .expected))]
    RoleAlternation {
        /// Row index
        row: usize,
        /// Item index
        item: usize,
        /// The offending id
        id: String,
        /// Role required at this position; `None` when the first item of
        /// the row could not be classified at all
        expected: Option<Role>,
    },

    /// A mapping endpoint has more (or fewer) than one key
    #[error(
        "connection row {row}, item {item}: mapping must contain exactly one key, found {keys}"
    )]
    MultiKeyMapping {
        /// Row index
        row: usize,
        /// Item index
        item: usize,
        /// Number of keys found
        keys: usize,
    },

    /// An item's position count differs from the one fixed earlier in the row
    #[error(
        "connection row {row}, item {item}: expected {expected} connections, found {found}"
    )]
    CardinalityMismatch {
        /// Row index
        row: usize,
        /// Item index
        item: usize,
        /// Cardinality fixed by an earlier item
        expected: usize,
        /// Count contributed by this item
        found: usize,
    },

    /// No list or mapping in the row determined how many wires it holds
    #[error("connection row {row}: no item revealed the number of connections to make")]
    NoCardinalityRevealed {
        /// Row index
        row: usize,
    },

    /// A pin specification could not be interpreted as pins
    #[error("{}malformed pin specification '{spec}': {message}", describe_location(.location))]
    MalformedPinSpec {
        /// Row and item index, when raised while normalizing a row
        location: Option<(usize, usize)>,
        /// The offending specification, rendered back to text
        spec: String,
        /// Why it was rejected
        message: String,
    },

    /// A row without any items
    #[error("connection row {row} is empty")]
    EmptyRow {
        /// Row index
        row: usize,
    },

    /// An empty list endpoint
    #[error("connection row {row}, item {item}: empty list of components")]
    EmptyEndpoint {
        /// Row index
        row: usize,
        /// Item index
        item: usize,
    },

    /// An endpoint that is structurally not a component reference
    #[error("connection row {row}, item {item}: {message}")]
    InvalidEndpoint {
        /// Row index
        row: usize,
        /// Item index
        item: usize,
        /// Description of the problem
        message: String,
    },

    /// A pin mapping names an autogenerate template instead of a concrete connector
    #[error(
        "connection row {row}, item {item}: '{id}' is an autogenerate template and cannot be given explicit pins"
    )]
    TemplateInMapping {
        /// Row index
        row: usize,
        /// Item index
        item: usize,
        /// Template id
        id: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Attach a row/item location to a pin specification error.
    pub(crate) fn at(self, row: usize, item: usize) -> Self {
        match self {
            Error::MalformedPinSpec { spec, message, .. } => Error::MalformedPinSpec {
                location: Some((row, item)),
                spec,
                message,
            },
            other => other,
        }
    }

    /// Zero-based row index the error refers to, if any
    pub fn row(&self) -> Option<usize> {
        match self {
            Error::UnknownComponent { row, .. }
            | Error::RoleAlternation { row, .. }
            | Error::MultiKeyMapping { row, .. }
            | Error::CardinalityMismatch { row, .. }
            | Error::NoCardinalityRevealed { row }
            | Error::EmptyRow { row }
            | Error::EmptyEndpoint { row, .. }
            | Error::InvalidEndpoint { row, .. }
            | Error::TemplateInMapping { row, .. } => Some(*row),
            Error::MalformedPinSpec { location, .. } => location.map(|(row, _)| row),
            _ => None,
        }
    }
}

fn describe_alternation(id: &str, expected: &Option<Role>) -> String {
    match expected {
        Some(role) => format!("'{id}' is not in {}", role.section()),
        None => format!("'{id}' not found anywhere"),
    }
}

fn describe_location(location: &Option<(usize, usize)>) -> String {
    match location {
        Some((row, item)) => format!("connection row {row}, item {item}: "),
        None => String::new(),
    }
}
