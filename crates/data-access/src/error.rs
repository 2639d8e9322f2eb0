use event_source::Version;
use thiserror::Error;
use uuid::Uuid;

/// Errors surfaced by the mapper boundary.
///
/// Nothing here is retried locally; every failure crosses the unit-of-work
/// boundary unchanged so the command-handling caller decides what to do.
#[derive(Debug, Error)]
pub enum MapperError {
    /// A version-checked load found a different stored version. The caller
    /// must re-fetch and re-apply its business logic.
    #[error(
        "concurrency conflict on {kind} stream {stream_id}: expected version {expected}, found {actual}"
    )]
    ConcurrencyConflict {
        kind: &'static str,
        stream_id: Uuid,
        expected: Version,
        actual: Version,
    },

    /// The requested aggregate does not exist in the store.
    #[error("{kind} stream {stream_id} not found")]
    NotFound {
        kind: &'static str,
        stream_id: Uuid,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Failure reported by the backing store, passed through unchanged.
    #[error("store backend error: {0}")]
    Backend(String),
}

/// Convenience result type for mapper operations.
pub type Result<T> = std::result::Result<T, MapperError>;
