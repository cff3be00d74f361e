//! In-process store used in tests and local runs without PostgreSQL.

use async_trait::async_trait;
use service_core::error::AppError;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use crate::models::dish::listing_order;
use crate::models::{Dish, NewDish, NewRecipe, Recipe};
use crate::services::store::RecipeStore;

#[derive(Default)]
struct Tables {
    last_id: i32,
    recipes: BTreeMap<i32, Recipe>,
    dishes: BTreeMap<i32, Dish>,
}

/// `RecipeStore` over two maps behind one mutex.
///
/// Every operation holds the lock for its whole duration, so the
/// recipe + dish insert and the view increment are atomic.
#[derive(Default)]
pub struct InMemoryRecipeStore {
    tables: Mutex<Tables>,
}

impl InMemoryRecipeStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, AppError> {
        self.tables
            .lock()
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Store mutex poisoned: {}", e)))
    }

    /// Number of stored recipes and dishes.
    pub fn counts(&self) -> Result<(usize, usize), AppError> {
        let tables = self.lock()?;
        Ok((tables.recipes.len(), tables.dishes.len()))
    }
}

#[async_trait]
impl RecipeStore for InMemoryRecipeStore {
    async fn health_check(&self) -> Result<(), AppError> {
        self.lock().map(|_| ())
    }

    async fn create_recipe(&self, input: &NewRecipe) -> Result<Recipe, AppError> {
        let mut tables = self.lock()?;
        tables.last_id += 1;

        let recipe = input.clone().into_recipe(tables.last_id);
        let dish = NewDish::for_recipe(&recipe).into_dish();
        tables.dishes.insert(dish.id, dish);
        tables.recipes.insert(recipe.id, recipe.clone());

        Ok(recipe)
    }

    async fn create_dish(&self, input: &NewDish) -> Result<Dish, AppError> {
        let mut tables = self.lock()?;

        if !tables.recipes.contains_key(&input.recipe_id) {
            return Err(AppError::DatabaseError(anyhow::anyhow!(
                "Recipe {} does not exist",
                input.recipe_id
            )));
        }
        if tables.dishes.contains_key(&input.recipe_id) {
            return Err(AppError::DatabaseError(anyhow::anyhow!(
                "Dish {} already exists",
                input.recipe_id
            )));
        }

        let dish = input.clone().into_dish();
        tables.dishes.insert(dish.id, dish.clone());
        Ok(dish)
    }

    async fn list_dishes(&self) -> Result<Vec<Dish>, AppError> {
        let tables = self.lock()?;
        let mut dishes: Vec<Dish> = tables.dishes.values().cloned().collect();
        dishes.sort_by(listing_order);
        Ok(dishes)
    }

    async fn get_recipe(&self, id: i32) -> Result<Option<Recipe>, AppError> {
        Ok(self.lock()?.recipes.get(&id).cloned())
    }

    async fn increment_views(&self, id: i32) -> Result<Option<i32>, AppError> {
        let mut tables = self.lock()?;
        Ok(tables.dishes.get_mut(&id).map(|dish| {
            dish.views += 1;
            dish.views
        }))
    }

    async fn delete_by_id(&self, id: i32) -> Result<bool, AppError> {
        let mut tables = self.lock()?;
        let dish = tables.dishes.remove(&id);
        let recipe = tables.recipes.remove(&id);
        Ok(dish.is_some() || recipe.is_some())
    }
}
