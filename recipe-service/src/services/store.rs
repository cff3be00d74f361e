//! Storage abstraction used by the HTTP handlers.

use async_trait::async_trait;
use service_core::error::AppError;

use crate::models::{Dish, NewDish, NewRecipe, Recipe};

/// Persistence operations over recipes and their dishes.
///
/// Absence is reported as `None`/`false`; `Err` always means the store itself
/// failed.
#[async_trait]
pub trait RecipeStore: Send + Sync {
    async fn health_check(&self) -> Result<(), AppError>;

    /// Insert a recipe together with its companion dish, atomically.
    async fn create_recipe(&self, input: &NewRecipe) -> Result<Recipe, AppError>;

    /// Insert a dish row for an existing recipe id.
    async fn create_dish(&self, input: &NewDish) -> Result<Dish, AppError>;

    /// All dishes, most viewed first, then shortest cooking time.
    async fn list_dishes(&self) -> Result<Vec<Dish>, AppError>;

    async fn get_recipe(&self, id: i32) -> Result<Option<Recipe>, AppError>;

    /// Add one view to the dish with this id and return the new count.
    async fn increment_views(&self, id: i32) -> Result<Option<i32>, AppError>;

    /// Remove the recipe and dish with this id. Administrative use only.
    async fn delete_by_id(&self, id: i32) -> Result<bool, AppError>;
}
