//! Recipe identity.

use common::FunctionalKey;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a recipe.
///
/// The key is itself a UUID, so it doubles as the recipe's stream id with no
/// derivation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipeId(Uuid);

impl RecipeId {
    /// Creates a new random recipe ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a recipe ID from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl FunctionalKey for RecipeId {
    fn unique_id(&self) -> Option<Uuid> {
        Some(self.0)
    }
}

impl Default for RecipeId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RecipeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for RecipeId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<RecipeId> for Uuid {
    fn from(id: RecipeId) -> Self {
        id.0
    }
}
