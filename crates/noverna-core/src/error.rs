use thiserror::Error;

/// Core error type shared across Noverna crates.
#[derive(Debug, Error)]
pub enum Error {
    /// A polymorphic owner column set violates the exclusivity contract.
    #[error("invalid owner: {0}")]
    InvalidOwner(String),
    /// A cross-field reference is inconsistent (e.g. grade outside its job).
    #[error("invalid reference: {0}")]
    InvalidReference(String),
    /// No relation with the given name exists in the registry.
    #[error("unknown relation: {0}")]
    UnknownRelation(String),
    /// A relation was resolved against the wrong entity or call shape.
    #[error("relation mismatch: {0}")]
    RelationMismatch(String),
}

/// Convenience alias for results returned by Noverna crates.
pub type Result<T> = std::result::Result<T, Error>;
