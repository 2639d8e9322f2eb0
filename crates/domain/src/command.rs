//! Command-handling port.

use async_trait::async_trait;

use crate::error::DomainError;

/// A handler for one command type.
///
/// Command routers depend on this trait rather than on concrete handlers.
/// Each invocation is one logical transaction: the handler opens its own
/// unit of work, drives the aggregate, and submits before returning.
#[async_trait]
pub trait HandleCommand<C>: Send + Sync {
    async fn handle(&self, command: C) -> Result<(), DomainError>;
}
