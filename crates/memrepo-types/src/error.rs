use thiserror::Error;

/// Errors produced when parsing identifiers.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("unknown identifier kind: {0}")]
    UnknownKind(String),

    #[error("invalid {kind} identifier {value:?}: {reason}")]
    InvalidValue {
        kind: String,
        value: String,
        reason: String,
    },

    #[error("identifier must have the form `kind:value`, got {0:?}")]
    MissingSeparator(String),
}
