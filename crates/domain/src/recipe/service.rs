//! Recipe service driving commands through a domain unit of work.

use std::marker::PhantomData;

use async_trait::async_trait;
use data_access::{AggregateMapper, DomainUnitOfWork, Mapper};
use event_source::AggregateRoot;

use crate::command::HandleCommand;
use crate::error::DomainError;

use super::{
    AddIngredient, CreateRecipe, PublishRecipe, Recipe, RecipeId, RemoveIngredient, RenameRecipe,
};

/// Service for managing recipes.
///
/// Each method runs one logical transaction: it opens a fresh domain unit of
/// work over the shared mapper, drives the aggregate, submits, and returns
/// the committed aggregate. Because the unit of work is new per command, the
/// version a caller passes with an update command is always asserted against
/// the store.
pub struct RecipeService<M>
where
    M: Mapper + AggregateMapper<Recipe>,
{
    mapper: M,
}

impl<M> RecipeService<M>
where
    M: Mapper + AggregateMapper<Recipe>,
{
    /// Creates a new recipe service over the given mapper.
    pub fn new(mapper: M) -> Self {
        Self { mapper }
    }

    /// The service owns the mapper's lifecycle, so sessions bind to it as
    /// shared and never dispose it.
    fn open_session(&self) -> DomainUnitOfWork<M> {
        DomainUnitOfWork::shared(self.mapper.clone())
    }

    /// Creates a new recipe.
    #[tracing::instrument(skip(self))]
    pub async fn create_recipe(&self, cmd: CreateRecipe) -> Result<Recipe, DomainError> {
        let session = self.open_session();
        let recipe = Recipe::create(cmd.recipe_id, cmd.title)?;
        session.add(&recipe).await?;
        commit(session, recipe).await
    }

    /// Renames a recipe.
    #[tracing::instrument(skip(self))]
    pub async fn rename_recipe(&self, cmd: RenameRecipe) -> Result<Recipe, DomainError> {
        let session = self.open_session();
        let mut recipe = session
            .get::<Recipe>(&cmd.recipe_id, cmd.expected_version)
            .await?;
        recipe.rename(cmd.title)?;
        session.add(&recipe).await?;
        commit(session, recipe).await
    }

    /// Adds an ingredient line to a recipe.
    #[tracing::instrument(skip(self))]
    pub async fn add_ingredient(&self, cmd: AddIngredient) -> Result<Recipe, DomainError> {
        let session = self.open_session();
        let mut recipe = session
            .get::<Recipe>(&cmd.recipe_id, cmd.expected_version)
            .await?;
        recipe.add_ingredient(cmd.name, cmd.amount)?;
        session.add(&recipe).await?;
        commit(session, recipe).await
    }

    /// Removes an ingredient line from a recipe.
    #[tracing::instrument(skip(self))]
    pub async fn remove_ingredient(&self, cmd: RemoveIngredient) -> Result<Recipe, DomainError> {
        let session = self.open_session();
        let mut recipe = session
            .get::<Recipe>(&cmd.recipe_id, cmd.expected_version)
            .await?;
        recipe.remove_ingredient(cmd.name)?;
        session.add(&recipe).await?;
        commit(session, recipe).await
    }

    /// Publishes a recipe.
    #[tracing::instrument(skip(self))]
    pub async fn publish_recipe(&self, cmd: PublishRecipe) -> Result<Recipe, DomainError> {
        let session = self.open_session();
        let mut recipe = session
            .get::<Recipe>(&cmd.recipe_id, cmd.expected_version)
            .await?;
        recipe.publish()?;
        session.add(&recipe).await?;
        commit(session, recipe).await
    }

    /// Loads a recipe by ID.
    ///
    /// Returns None if the recipe doesn't exist.
    #[tracing::instrument(skip(self))]
    pub async fn get_recipe(&self, recipe_id: RecipeId) -> Result<Option<Recipe>, DomainError> {
        let session = self.open_session();
        if !session.exists::<Recipe>(&recipe_id).await? {
            return Ok(None);
        }
        Ok(Some(session.get_unchecked::<Recipe>(&recipe_id).await?))
    }
}

/// Writes the session's staged changes, then acknowledges them on the
/// aggregate so the returned instance reports a clean committed state.
async fn commit<M>(session: DomainUnitOfWork<M>, mut recipe: Recipe) -> Result<Recipe, DomainError>
where
    M: Mapper + AggregateMapper<Recipe>,
{
    session.submit_changes().await?;
    let version = recipe.version();
    recipe.mark_as_committed(version);
    Ok(recipe)
}

/// Handler for [`CreateRecipe`] commands.
///
/// Takes a session factory so the composition root decides how each unit of
/// work binds to the store: owning it ([`DomainUnitOfWork::new`]) or sharing
/// it ([`DomainUnitOfWork::shared`]). One session is opened per command.
pub struct CreateRecipeHandler<M, F>
where
    M: Mapper + AggregateMapper<Recipe>,
    F: Fn() -> DomainUnitOfWork<M> + Send + Sync,
{
    open_session: F,
    _mapper: PhantomData<fn() -> M>,
}

impl<M, F> CreateRecipeHandler<M, F>
where
    M: Mapper + AggregateMapper<Recipe>,
    F: Fn() -> DomainUnitOfWork<M> + Send + Sync,
{
    /// Creates a handler that opens one session per command via
    /// `open_session`.
    pub fn new(open_session: F) -> Self {
        Self {
            open_session,
            _mapper: PhantomData,
        }
    }
}

#[async_trait]
impl<M, F> HandleCommand<CreateRecipe> for CreateRecipeHandler<M, F>
where
    M: Mapper + AggregateMapper<Recipe>,
    F: Fn() -> DomainUnitOfWork<M> + Send + Sync,
{
    async fn handle(&self, command: CreateRecipe) -> Result<(), DomainError> {
        let session = (self.open_session)();
        let recipe = Recipe::create(command.recipe_id, command.title)?;
        session.add(&recipe).await?;
        session.submit_changes().await?;
        Ok(())
    }
}
