//! Domain error types.

use data_access::MapperError;
use thiserror::Error;

use crate::recipe::RecipeError;

/// Errors that can occur during domain operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// An error crossed the mapper boundary unchanged.
    #[error("data access error: {0}")]
    DataAccess(#[from] MapperError),

    /// A command was rejected by the recipe aggregate.
    #[error("recipe error: {0}")]
    Recipe(#[from] RecipeError),
}
