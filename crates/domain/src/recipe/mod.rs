//! Recipe aggregate and related types.

mod aggregate;
mod commands;
mod events;
mod identity;
mod service;
mod state;

pub use aggregate::Recipe;
pub use commands::{AddIngredient, CreateRecipe, PublishRecipe, RemoveIngredient, RenameRecipe};
pub use events::{
    IngredientAddedData, IngredientRemovedData, NotesScribbledData, RecipeCreatedData, RecipeEvent,
    RecipePublishedData, RecipeRenamedData,
};
pub use identity::RecipeId;
pub use service::{CreateRecipeHandler, RecipeService};
pub use state::{Ingredient, RecipeState, RecipeStatus};

use thiserror::Error;

/// Errors that can occur during recipe commands.
#[derive(Debug, Error)]
pub enum RecipeError {
    /// Title is empty or whitespace.
    #[error("recipe title must not be empty")]
    TitleRequired,

    /// A command other than create reached a recipe with no history.
    #[error("recipe has not been created yet")]
    NotCreated,

    /// The recipe's status does not allow the action.
    #[error("cannot {action} a {status} recipe")]
    InvalidStatus {
        status: RecipeStatus,
        action: &'static str,
    },

    /// Ingredient name is empty or whitespace.
    #[error("ingredient name must not be empty")]
    IngredientRequired,

    /// Ingredient is already on the list.
    #[error("ingredient already listed: {name}")]
    DuplicateIngredient { name: String },

    /// Ingredient is not on the list.
    #[error("ingredient not found: {name}")]
    IngredientNotFound { name: String },

    /// A recipe without ingredients cannot be published.
    #[error("cannot publish a recipe without ingredients")]
    NoIngredients,
}
