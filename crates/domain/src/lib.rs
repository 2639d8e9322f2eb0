//! Recipe domain built on the event-sourced aggregate core.
//!
//! This crate shows the intended shape of a domain layer on top of
//! `event-source` and `data-access`:
//! - `Recipe` is an aggregate root whose command methods validate input and
//!   record events
//! - `RecipeService` runs each command inside its own domain unit of work
//! - `HandleCommand` is the port command routers call into

pub mod command;
pub mod error;
pub mod recipe;

pub use command::HandleCommand;
pub use error::DomainError;
pub use recipe::{
    AddIngredient, CreateRecipe, CreateRecipeHandler, Ingredient, PublishRecipe, Recipe,
    RecipeError, RecipeEvent, RecipeId, RecipeService, RecipeState, RecipeStatus, RemoveIngredient,
    RenameRecipe,
};
