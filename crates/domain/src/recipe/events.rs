//! Recipe domain events.

use chrono::{DateTime, Utc};
use event_source::DomainEvent;
use serde::{Deserialize, Serialize};

use super::RecipeId;

/// Events that can occur on a recipe aggregate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum RecipeEvent {
    /// Recipe was created.
    RecipeCreated(RecipeCreatedData),

    /// Recipe was given a new title.
    RecipeRenamed(RecipeRenamedData),

    /// Ingredient was added to the recipe.
    IngredientAdded(IngredientAddedData),

    /// Ingredient was removed from the recipe.
    IngredientRemoved(IngredientRemovedData),

    /// Recipe was published and is no longer editable.
    RecipePublished(RecipePublishedData),

    /// Free-text notes attached to the recipe. Notes moved to their own
    /// stream long ago; the variant stays so historical streams replay.
    NotesScribbled(NotesScribbledData),
}

impl DomainEvent for RecipeEvent {
    fn event_type(&self) -> &'static str {
        match self {
            RecipeEvent::RecipeCreated(_) => "RecipeCreated",
            RecipeEvent::RecipeRenamed(_) => "RecipeRenamed",
            RecipeEvent::IngredientAdded(_) => "IngredientAdded",
            RecipeEvent::IngredientRemoved(_) => "IngredientRemoved",
            RecipeEvent::RecipePublished(_) => "RecipePublished",
            RecipeEvent::NotesScribbled(_) => "NotesScribbled",
        }
    }

    fn is_obsolete(&self) -> bool {
        matches!(self, RecipeEvent::NotesScribbled(_))
    }
}

/// Data for RecipeCreated event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeCreatedData {
    /// The unique recipe ID.
    pub recipe_id: RecipeId,

    /// The recipe's title.
    pub title: String,

    /// When the recipe was created.
    pub created_at: DateTime<Utc>,
}

/// Data for RecipeRenamed event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeRenamedData {
    /// The new title.
    pub title: String,

    /// When the recipe was renamed.
    pub renamed_at: DateTime<Utc>,
}

/// Data for IngredientAdded event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngredientAddedData {
    /// Ingredient name.
    pub name: String,

    /// Free-form amount, e.g. "200 g".
    pub amount: String,
}

/// Data for IngredientRemoved event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngredientRemovedData {
    /// Ingredient name.
    pub name: String,
}

/// Data for RecipePublished event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipePublishedData {
    /// When the recipe was published.
    pub published_at: DateTime<Utc>,
}

/// Data for the obsolete NotesScribbled event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotesScribbledData {
    /// The note text.
    pub text: String,
}

// Convenience constructors for events
impl RecipeEvent {
    /// Creates a RecipeCreated event.
    pub fn created(recipe_id: RecipeId, title: impl Into<String>) -> Self {
        RecipeEvent::RecipeCreated(RecipeCreatedData {
            recipe_id,
            title: title.into(),
            created_at: Utc::now(),
        })
    }

    /// Creates a RecipeRenamed event.
    pub fn renamed(title: impl Into<String>) -> Self {
        RecipeEvent::RecipeRenamed(RecipeRenamedData {
            title: title.into(),
            renamed_at: Utc::now(),
        })
    }

    /// Creates an IngredientAdded event.
    pub fn ingredient_added(name: impl Into<String>, amount: impl Into<String>) -> Self {
        RecipeEvent::IngredientAdded(IngredientAddedData {
            name: name.into(),
            amount: amount.into(),
        })
    }

    /// Creates an IngredientRemoved event.
    pub fn ingredient_removed(name: impl Into<String>) -> Self {
        RecipeEvent::IngredientRemoved(IngredientRemovedData { name: name.into() })
    }

    /// Creates a RecipePublished event.
    pub fn published() -> Self {
        RecipeEvent::RecipePublished(RecipePublishedData {
            published_at: Utc::now(),
        })
    }

    /// Creates a NotesScribbled event, as found in historical streams.
    pub fn notes_scribbled(text: impl Into<String>) -> Self {
        RecipeEvent::NotesScribbled(NotesScribbledData { text: text.into() })
    }
}
