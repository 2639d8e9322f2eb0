//! Recipe state, rebuilt by folding events.

use event_source::AggregateState;

use super::RecipeEvent;

/// The status of a recipe in its lifecycle.
///
/// A recipe starts as a draft and may be published once. Published recipes
/// are frozen: no renaming, no ingredient changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RecipeStatus {
    /// Recipe is being worked on, everything can change.
    #[default]
    Draft,

    /// Recipe is visible to readers and frozen (terminal state).
    Published,
}

impl RecipeStatus {
    /// Returns true if the recipe can still be edited in this status.
    pub fn can_edit(&self) -> bool {
        matches!(self, RecipeStatus::Draft)
    }

    /// Returns the status name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            RecipeStatus::Draft => "draft",
            RecipeStatus::Published => "published",
        }
    }
}

impl std::fmt::Display for RecipeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One ingredient line on a recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ingredient {
    /// Ingredient name.
    pub name: String,

    /// Free-form amount, e.g. "200 g".
    pub amount: String,
}

/// Replay-only state owned by the [`Recipe`](super::Recipe) aggregate.
///
/// Every field is set exclusively by [`when`](AggregateState::when); there is
/// no other mutation path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipeState {
    created: bool,
    title: String,
    status: RecipeStatus,
    ingredients: Vec<Ingredient>,
}

impl RecipeState {
    /// Whether a RecipeCreated event has been folded in.
    pub fn is_created(&self) -> bool {
        self.created
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn status(&self) -> RecipeStatus {
        self.status
    }

    /// Ingredient lines in the order they were added.
    pub fn ingredients(&self) -> &[Ingredient] {
        &self.ingredients
    }

    pub fn has_ingredient(&self, name: &str) -> bool {
        self.ingredients.iter().any(|line| line.name == name)
    }
}

impl AggregateState for RecipeState {
    type Event = RecipeEvent;

    fn when(&mut self, event: &RecipeEvent) {
        match event {
            RecipeEvent::RecipeCreated(data) => {
                self.created = true;
                self.title = data.title.clone();
            }
            RecipeEvent::RecipeRenamed(data) => {
                self.title = data.title.clone();
            }
            RecipeEvent::IngredientAdded(data) => {
                self.ingredients.push(Ingredient {
                    name: data.name.clone(),
                    amount: data.amount.clone(),
                });
            }
            RecipeEvent::IngredientRemoved(data) => {
                self.ingredients.retain(|line| line.name != data.name);
            }
            RecipeEvent::RecipePublished(_) => {
                self.status = RecipeStatus::Published;
            }
            RecipeEvent::NotesScribbled(_) => {
                // Obsolete, filtered out by process() before reaching here.
            }
        }
    }
}
