//! Integration tests for the recipe domain.
//!
//! These tests drive full command flows through the service and unit-of-work
//! layers against the in-memory mapper, covering aggregate reconstruction,
//! version assertions and session lifecycle.

use data_access::{DomainUnitOfWork, InMemoryDataMapper, MapperError};
use domain::{
    AddIngredient, CreateRecipe, CreateRecipeHandler, DomainError, HandleCommand, PublishRecipe,
    Recipe, RecipeError, RecipeEvent, RecipeId, RecipeService, RecipeStatus, RemoveIngredient,
    RenameRecipe,
};
use event_source::{AggregateRoot, Version};

/// Helper to create a mapper and a service sharing it.
fn create_service() -> (InMemoryDataMapper, RecipeService<InMemoryDataMapper>) {
    let mapper = InMemoryDataMapper::new();
    (mapper.clone(), RecipeService::new(mapper))
}

mod recipe_lifecycle {
    use super::*;

    #[tokio::test]
    async fn complete_recipe_lifecycle() {
        let (_mapper, service) = create_service();

        // Create recipe
        let cmd = CreateRecipe::with_title("Macaroni with cheese");
        let recipe_id = cmd.recipe_id;
        let recipe = service.create_recipe(cmd).await.unwrap();
        assert_eq!(recipe.status(), RecipeStatus::Draft);
        assert_eq!(recipe.version(), Version::first());

        // Add ingredients
        let recipe = service
            .add_ingredient(AddIngredient::new(
                recipe_id,
                recipe.version(),
                "Macaroni",
                "400 g",
            ))
            .await
            .unwrap();
        let recipe = service
            .add_ingredient(AddIngredient::new(
                recipe_id,
                recipe.version(),
                "Cheddar",
                "150 g",
            ))
            .await
            .unwrap();
        assert_eq!(recipe.ingredients().len(), 2);
        assert_eq!(recipe.version(), Version::new(3));

        // Swap the cheese
        let recipe = service
            .remove_ingredient(RemoveIngredient::new(recipe_id, recipe.version(), "Cheddar"))
            .await
            .unwrap();
        let recipe = service
            .add_ingredient(AddIngredient::new(
                recipe_id,
                recipe.version(),
                "Parmesan",
                "150 g",
            ))
            .await
            .unwrap();

        // Publish
        let recipe = service
            .publish_recipe(PublishRecipe::new(recipe_id, recipe.version()))
            .await
            .unwrap();
        assert!(recipe.is_published());
        assert_eq!(recipe.committed_version(), Version::new(6));
        assert!(recipe.changes().is_empty());
    }

    #[tokio::test]
    async fn reloaded_recipe_matches_the_one_that_was_written() {
        let (_mapper, service) = create_service();
        let cmd = CreateRecipe::with_title("Pea soup");
        let recipe_id = cmd.recipe_id;
        let written = service.create_recipe(cmd).await.unwrap();
        let written = service
            .add_ingredient(AddIngredient::new(
                recipe_id,
                written.version(),
                "Split peas",
                "300 g",
            ))
            .await
            .unwrap();

        let reloaded = service.get_recipe(recipe_id).await.unwrap().unwrap();

        assert_eq!(reloaded.id(), written.id());
        assert_eq!(reloaded.source().state(), written.source().state());
        assert_eq!(reloaded.version(), written.version());
        assert_eq!(reloaded.committed_version(), Version::new(2));
        assert!(reloaded.changes().is_empty());
    }

    #[tokio::test]
    async fn published_recipe_rejects_further_edits() {
        let (_mapper, service) = create_service();
        let cmd = CreateRecipe::with_title("Toast");
        let recipe_id = cmd.recipe_id;
        let recipe = service.create_recipe(cmd).await.unwrap();
        let recipe = service
            .add_ingredient(AddIngredient::new(
                recipe_id,
                recipe.version(),
                "Bread",
                "2 slices",
            ))
            .await
            .unwrap();
        let recipe = service
            .publish_recipe(PublishRecipe::new(recipe_id, recipe.version()))
            .await
            .unwrap();

        let result = service
            .rename_recipe(RenameRecipe::new(recipe_id, recipe.version(), "Burnt toast"))
            .await;

        assert!(matches!(
            result,
            Err(DomainError::Recipe(RecipeError::InvalidStatus {
                status: RecipeStatus::Published,
                action: "rename",
            }))
        ));
    }

    #[tokio::test]
    async fn historical_notes_replay_silently() {
        let (mapper, service) = create_service();

        // Streams written before notes moved out still carry the event.
        let mut recipe = Recipe::create(RecipeId::new(), "Grandma's stew").unwrap();
        recipe
            .source_mut()
            .apply(RecipeEvent::notes_scribbled("use the big pot"));
        recipe.add_ingredient("Beef", "500 g").unwrap();
        mapper.seed(&recipe).await;

        let reloaded = service.get_recipe(recipe.id()).await.unwrap().unwrap();

        // The event still counts for the version but leaves no state behind.
        assert_eq!(reloaded.version(), Version::new(3));
        assert_eq!(reloaded.title(), "Grandma's stew");
        assert_eq!(reloaded.ingredients().len(), 1);
    }
}

mod concurrency {
    use super::*;

    #[tokio::test]
    async fn version_is_asserted_once_per_session() {
        let (mapper, service) = create_service();
        let cmd = CreateRecipe::with_title("Pea soup");
        let recipe_id = cmd.recipe_id;
        let recipe = service.create_recipe(cmd).await.unwrap();
        let recipe = service
            .add_ingredient(AddIngredient::new(
                recipe_id,
                recipe.version(),
                "Split peas",
                "300 g",
            ))
            .await
            .unwrap();
        let current = recipe.version();

        // First read checks the caller's version against the store.
        let session = DomainUnitOfWork::shared(mapper.clone());
        session.get::<Recipe>(&recipe_id, current).await.unwrap();

        // Later reads in the same session skip the check, even when stale.
        session
            .get::<Recipe>(&recipe_id, Version::new(99))
            .await
            .unwrap();

        // A fresh session asserts again.
        let fresh = DomainUnitOfWork::shared(mapper.clone());
        let result = fresh.get::<Recipe>(&recipe_id, Version::new(99)).await;
        assert!(matches!(
            result,
            Err(MapperError::ConcurrencyConflict { expected, actual, .. })
                if expected == Version::new(99) && actual == current
        ));
    }

    #[tokio::test]
    async fn retry_after_concurrency_conflict() {
        let (_mapper, service) = create_service();
        let cmd = CreateRecipe::with_title("Pea soup");
        let recipe_id = cmd.recipe_id;
        service.create_recipe(cmd).await.unwrap();

        // A writer that lost the race shows up as a conflict.
        let result = service
            .rename_recipe(RenameRecipe::new(
                recipe_id,
                Version::new(7),
                "Yellow pea soup",
            ))
            .await;
        assert!(matches!(
            result,
            Err(DomainError::DataAccess(MapperError::ConcurrencyConflict { .. }))
        ));

        // Reload to learn the current version, then retry.
        let current = service.get_recipe(recipe_id).await.unwrap().unwrap();
        let renamed = service
            .rename_recipe(RenameRecipe::new(
                recipe_id,
                current.version(),
                "Yellow pea soup",
            ))
            .await
            .unwrap();
        assert_eq!(renamed.title(), "Yellow pea soup");
    }
}

mod sessions {
    use super::*;

    #[tokio::test]
    async fn attached_handles_share_one_session() {
        let mapper = InMemoryDataMapper::new();
        let mut recipe = Recipe::create(RecipeId::new(), "Pea soup").unwrap();
        recipe.add_ingredient("Split peas", "300 g").unwrap();
        mapper.seed(&recipe).await;

        let first = DomainUnitOfWork::new(mapper.clone());
        let second = first.attach();
        assert_eq!(first.id(), second.id());

        // The version assertion made on one handle covers the other.
        first
            .get::<Recipe>(&recipe.id(), recipe.version())
            .await
            .unwrap();
        second
            .get::<Recipe>(&recipe.id(), Version::new(42))
            .await
            .unwrap();

        // The mapper is released when the last handle goes away.
        drop(first);
        assert!(!mapper.is_disposed());
        drop(second);
        assert!(mapper.is_disposed());
    }

    #[tokio::test]
    async fn handler_can_bind_sessions_to_a_shared_mapper() {
        let mapper = InMemoryDataMapper::new();
        let handler = {
            let mapper = mapper.clone();
            CreateRecipeHandler::new(move || DomainUnitOfWork::shared(mapper.clone()))
        };

        handler
            .handle(CreateRecipe::with_title("Macaroni with cheese"))
            .await
            .unwrap();
        handler
            .handle(CreateRecipe::with_title("Pea soup"))
            .await
            .unwrap();

        assert_eq!(mapper.committed::<Recipe>().await.len(), 2);
        assert!(!mapper.is_disposed());
    }
}

mod error_handling {
    use super::*;

    #[tokio::test]
    async fn unknown_recipe_cannot_be_loaded() {
        let mapper = InMemoryDataMapper::new();
        let service = RecipeService::new(mapper.clone());
        let missing = RecipeId::new();

        assert!(service.get_recipe(missing).await.unwrap().is_none());

        let session = DomainUnitOfWork::shared(mapper);
        assert!(!session.exists::<Recipe>(&missing).await.unwrap());
        let result = session.get::<Recipe>(&missing, Version::first()).await;
        assert!(matches!(
            result,
            Err(MapperError::NotFound { kind: "Recipe", .. })
        ));
    }

    #[tokio::test]
    async fn duplicate_ingredient_is_rejected() {
        let (_mapper, service) = create_service();
        let cmd = CreateRecipe::with_title("Macaroni with cheese");
        let recipe_id = cmd.recipe_id;
        let recipe = service.create_recipe(cmd).await.unwrap();
        let recipe = service
            .add_ingredient(AddIngredient::new(
                recipe_id,
                recipe.version(),
                "Macaroni",
                "400 g",
            ))
            .await
            .unwrap();

        let result = service
            .add_ingredient(AddIngredient::new(
                recipe_id,
                recipe.version(),
                "Macaroni",
                "250 g",
            ))
            .await;

        assert!(matches!(
            result,
            Err(DomainError::Recipe(RecipeError::DuplicateIngredient { ref name }))
                if name == "Macaroni"
        ));

        let reloaded = service.get_recipe(recipe_id).await.unwrap().unwrap();
        assert_eq!(reloaded.ingredients().len(), 1);
    }

    #[tokio::test]
    async fn removing_a_missing_ingredient_is_rejected() {
        let (_mapper, service) = create_service();
        let cmd = CreateRecipe::with_title("Toast");
        let recipe_id = cmd.recipe_id;
        let recipe = service.create_recipe(cmd).await.unwrap();

        let result = service
            .remove_ingredient(RemoveIngredient::new(recipe_id, recipe.version(), "Butter"))
            .await;

        assert!(matches!(
            result,
            Err(DomainError::Recipe(RecipeError::IngredientNotFound { ref name }))
                if name == "Butter"
        ));
    }

    #[tokio::test]
    async fn rejected_publish_leaves_the_draft_untouched() {
        let (mapper, service) = create_service();
        let cmd = CreateRecipe::with_title("Air pie");
        let recipe_id = cmd.recipe_id;
        let created = service.create_recipe(cmd).await.unwrap();

        let result = service
            .publish_recipe(PublishRecipe::new(recipe_id, created.version()))
            .await;

        assert!(matches!(
            result,
            Err(DomainError::Recipe(RecipeError::NoIngredients))
        ));
        assert!(!mapper.has_changes().await);

        let reloaded = service.get_recipe(recipe_id).await.unwrap().unwrap();
        assert_eq!(reloaded.status(), RecipeStatus::Draft);
        assert_eq!(reloaded.version(), Version::first());
    }
}
