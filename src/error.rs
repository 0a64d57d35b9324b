use serde_json::Value;
use thiserror::Error;

/// Coarse classification of [`AdtError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The type/data/union definition itself is malformed.
    Definition,
    /// A value was rejected while constructing it.
    Validation,
    /// `case` could not route a value to a handler.
    Dispatch,
}

#[derive(Debug, Clone, Error)]
pub enum AdtError {
    #[error("bad definition for `{name}`: {reason}")]
    Definition { name: String, reason: String },

    #[error("{value} is not a valid {expected}{}", at(.path))]
    Validation {
        expected: String,
        value: Value,
        path: Vec<String>,
    },

    #[error("{expected} requires field `{field}`{}", at(.path))]
    MissingField {
        expected: String,
        field: String,
        path: Vec<String>,
    },

    #[error("`{variant}` is not in the object!")]
    MissingHandler { union: String, variant: String },

    #[error("no variant of {union} accepts {value}")]
    NoVariantMatched { union: String, value: Value },

    #[error("{union} has no variant named `{variant}`")]
    UnknownVariant { union: String, variant: String },
}

pub type Result<T> = std::result::Result<T, AdtError>;

impl AdtError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AdtError::Definition { .. } => ErrorKind::Definition,
            AdtError::Validation { .. } | AdtError::MissingField { .. } => ErrorKind::Validation,
            AdtError::MissingHandler { .. }
            | AdtError::NoVariantMatched { .. }
            | AdtError::UnknownVariant { .. } => ErrorKind::Dispatch,
        }
    }

    pub(crate) fn definition(name: &str, reason: impl Into<String>) -> Self {
        AdtError::Definition { name: name.to_string(), reason: reason.into() }
    }

    pub(crate) fn rejected(expected: &str, value: Value) -> Self {
        AdtError::Validation { expected: expected.to_string(), value, path: Vec::new() }
    }

    /// Field path (outermost first) of a validation failure; empty otherwise.
    pub fn path(&self) -> &[String] {
        match self {
            AdtError::Validation { path, .. } | AdtError::MissingField { path, .. } => path,
            _ => &[],
        }
    }

    /// Prefix the failure path with `field` as the error bubbles out of a record.
    pub(crate) fn within(mut self, field: &str) -> Self {
        if let AdtError::Validation { path, .. } | AdtError::MissingField { path, .. } = &mut self {
            path.insert(0, field.to_string());
        }
        self
    }
}

fn at(path: &[String]) -> String {
    if path.is_empty() {
        String::new()
    } else {
        format!(" (at {})", path.join("."))
    }
}
