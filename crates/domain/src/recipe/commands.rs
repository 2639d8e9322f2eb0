//! Recipe commands.
//!
//! Update commands carry the version the caller last observed; the service
//! asserts it against the store before applying the change.

use event_source::Version;

use super::RecipeId;

/// Command to create a new recipe.
#[derive(Debug, Clone)]
pub struct CreateRecipe {
    /// The recipe ID to create.
    pub recipe_id: RecipeId,

    /// The recipe's title.
    pub title: String,
}

impl CreateRecipe {
    /// Creates a new CreateRecipe command.
    pub fn new(recipe_id: RecipeId, title: impl Into<String>) -> Self {
        Self {
            recipe_id,
            title: title.into(),
        }
    }

    /// Creates a new CreateRecipe command with a generated recipe ID.
    pub fn with_title(title: impl Into<String>) -> Self {
        Self::new(RecipeId::new(), title)
    }
}

/// Command to rename a recipe.
#[derive(Debug, Clone)]
pub struct RenameRecipe {
    /// The recipe to rename.
    pub recipe_id: RecipeId,

    /// The version the caller last observed.
    pub expected_version: Version,

    /// The new title.
    pub title: String,
}

impl RenameRecipe {
    /// Creates a new RenameRecipe command.
    pub fn new(recipe_id: RecipeId, expected_version: Version, title: impl Into<String>) -> Self {
        Self {
            recipe_id,
            expected_version,
            title: title.into(),
        }
    }
}

/// Command to add an ingredient line to a recipe.
#[derive(Debug, Clone)]
pub struct AddIngredient {
    /// The recipe to extend.
    pub recipe_id: RecipeId,

    /// The version the caller last observed.
    pub expected_version: Version,

    /// Ingredient name.
    pub name: String,

    /// Free-form amount, e.g. "200 g".
    pub amount: String,
}

impl AddIngredient {
    /// Creates a new AddIngredient command.
    pub fn new(
        recipe_id: RecipeId,
        expected_version: Version,
        name: impl Into<String>,
        amount: impl Into<String>,
    ) -> Self {
        Self {
            recipe_id,
            expected_version,
            name: name.into(),
            amount: amount.into(),
        }
    }
}

/// Command to remove an ingredient line from a recipe.
#[derive(Debug, Clone)]
pub struct RemoveIngredient {
    /// The recipe to shorten.
    pub recipe_id: RecipeId,

    /// The version the caller last observed.
    pub expected_version: Version,

    /// Ingredient name.
    pub name: String,
}

impl RemoveIngredient {
    /// Creates a new RemoveIngredient command.
    pub fn new(recipe_id: RecipeId, expected_version: Version, name: impl Into<String>) -> Self {
        Self {
            recipe_id,
            expected_version,
            name: name.into(),
        }
    }
}

/// Command to publish a recipe.
#[derive(Debug, Clone)]
pub struct PublishRecipe {
    /// The recipe to publish.
    pub recipe_id: RecipeId,

    /// The version the caller last observed.
    pub expected_version: Version,
}

impl PublishRecipe {
    /// Creates a new PublishRecipe command.
    pub fn new(recipe_id: RecipeId, expected_version: Version) -> Self {
        Self {
            recipe_id,
            expected_version,
        }
    }
}
