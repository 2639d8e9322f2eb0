//! Recipe aggregate implementation.

use event_source::{AggregateRoot, EventSource};

use super::{Ingredient, RecipeError, RecipeEvent, RecipeId, RecipeState, RecipeStatus};

/// Recipe aggregate root.
///
/// All state lives in the replayable event stream: command methods validate
/// against the current state and record events, queries read the folded
/// state. Version bookkeeping and replay come from the owned [`EventSource`].
pub struct Recipe {
    source: EventSource<Recipe>,
}

impl AggregateRoot for Recipe {
    const KIND: &'static str = "Recipe";

    type Key = RecipeId;
    type Event = RecipeEvent;
    type State = RecipeState;

    fn with_key(key: RecipeId) -> Self {
        Self {
            source: EventSource::new(key),
        }
    }

    fn source(&self) -> &EventSource<Self> {
        &self.source
    }

    fn source_mut(&mut self) -> &mut EventSource<Self> {
        &mut self.source
    }
}

// Query methods
impl Recipe {
    /// Returns the recipe ID.
    pub fn id(&self) -> RecipeId {
        *self.source.key()
    }

    /// Returns the current title.
    pub fn title(&self) -> &str {
        self.source.state().title()
    }

    /// Returns the current status.
    pub fn status(&self) -> RecipeStatus {
        self.source.state().status()
    }

    /// Returns the ingredient lines in the order they were added.
    pub fn ingredients(&self) -> &[Ingredient] {
        self.source.state().ingredients()
    }

    /// Returns true if the recipe has been published.
    pub fn is_published(&self) -> bool {
        self.status() == RecipeStatus::Published
    }
}

// Command methods (validate, then record events)
impl Recipe {
    /// Creates a new recipe with the given title.
    ///
    /// The returned aggregate carries one pending event at version 1.
    pub fn create(id: RecipeId, title: impl Into<String>) -> Result<Self, RecipeError> {
        let title = valid_title(title)?;
        let mut recipe = Self::with_key(id);
        recipe.source.apply(RecipeEvent::created(id, title));
        Ok(recipe)
    }

    /// Gives the recipe a new title.
    pub fn rename(&mut self, title: impl Into<String>) -> Result<(), RecipeError> {
        self.ensure_editable("rename")?;
        let title = valid_title(title)?;
        self.source.apply(RecipeEvent::renamed(title));
        Ok(())
    }

    /// Adds an ingredient line.
    pub fn add_ingredient(
        &mut self,
        name: impl Into<String>,
        amount: impl Into<String>,
    ) -> Result<(), RecipeError> {
        self.ensure_editable("add an ingredient to")?;

        let name = name.into();
        if name.trim().is_empty() {
            return Err(RecipeError::IngredientRequired);
        }
        if self.source.state().has_ingredient(&name) {
            return Err(RecipeError::DuplicateIngredient { name });
        }

        self.source
            .apply(RecipeEvent::ingredient_added(name, amount.into()));
        Ok(())
    }

    /// Removes an ingredient line.
    pub fn remove_ingredient(&mut self, name: impl Into<String>) -> Result<(), RecipeError> {
        self.ensure_editable("remove an ingredient from")?;

        let name = name.into();
        if !self.source.state().has_ingredient(&name) {
            return Err(RecipeError::IngredientNotFound { name });
        }

        self.source.apply(RecipeEvent::ingredient_removed(name));
        Ok(())
    }

    /// Publishes the recipe, freezing it.
    pub fn publish(&mut self) -> Result<(), RecipeError> {
        self.ensure_editable("publish")?;

        if self.source.state().ingredients().is_empty() {
            return Err(RecipeError::NoIngredients);
        }

        self.source.apply(RecipeEvent::published());
        Ok(())
    }

    fn ensure_editable(&self, action: &'static str) -> Result<(), RecipeError> {
        let state = self.source.state();
        if !state.is_created() {
            return Err(RecipeError::NotCreated);
        }
        if !state.status().can_edit() {
            return Err(RecipeError::InvalidStatus {
                status: state.status(),
                action,
            });
        }
        Ok(())
    }
}

fn valid_title(title: impl Into<String>) -> Result<String, RecipeError> {
    let title = title.into();
    if title.trim().is_empty() {
        return Err(RecipeError::TitleRequired);
    }
    Ok(title)
}
