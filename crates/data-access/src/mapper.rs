use async_trait::async_trait;
use event_source::{AggregateRoot, Version};

use crate::error::Result;

/// Session-scoped mapper operations, independent of aggregate type.
///
/// A mapper instance is a cheap handle onto shared store state; cloning it
/// yields another handle onto the same session, never a copy of the data.
#[async_trait]
pub trait Mapper: Clone + Send + Sync + 'static {
    /// Writes every registered change to the store. Failures propagate
    /// unchanged; no retry happens at this layer.
    async fn submit_changes(&self) -> Result<()>;

    /// Drops every pending registration without writing it.
    async fn evict_all(&self);

    /// Releases store resources held by this mapper. Called once, by the
    /// owning session, when its last handle is released.
    fn dispose(&self);
}

/// Aggregate-typed access on top of [`Mapper`].
///
/// A mapper implements this once per aggregate type it can persist; the
/// in-memory mapper implements it for every [`AggregateRoot`].
#[async_trait]
pub trait AggregateMapper<A: AggregateRoot>: Mapper {
    /// Loads the aggregate addressed by `key`.
    ///
    /// A missing stream fails with [`MapperError::NotFound`]. With
    /// `expected_version` set, the load is version-checked and fails with
    /// [`MapperError::ConcurrencyConflict`] when the stored version differs;
    /// without it, the load is unconditional.
    ///
    /// [`MapperError::NotFound`]: crate::MapperError::NotFound
    /// [`MapperError::ConcurrencyConflict`]: crate::MapperError::ConcurrencyConflict
    async fn get(&self, key: &A::Key, expected_version: Option<Version>) -> Result<A>;

    /// Whether a committed stream exists for `key`.
    async fn exists(&self, key: &A::Key) -> Result<bool>;

    /// Registers `aggregate`'s pending events for the next
    /// [`submit_changes`]. Registering the same stream again refreshes the
    /// registration; with an unchanged aggregate that is a no-op.
    ///
    /// [`submit_changes`]: Mapper::submit_changes
    async fn add(&self, aggregate: &A) -> Result<()>;

    /// Drops the pending registration for `key`, if any.
    async fn evict(&self, key: &A::Key);
}
