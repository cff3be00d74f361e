//! Recipe: the detailed record behind `GET /recipes/:id`.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Stored recipe. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Recipe {
    pub id: i32,
    pub name: String,
    pub cooking_time: i32,
    pub ingredients: String,
    pub description: String,
}

/// Input for creating a recipe. Assumed already validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRecipe {
    pub name: String,
    pub cooking_time: i32,
    pub ingredients: String,
    pub description: String,
}

impl NewRecipe {
    /// Attach the identifier assigned by the store.
    pub fn into_recipe(self, id: i32) -> Recipe {
        Recipe {
            id,
            name: self.name,
            cooking_time: self.cooking_time,
            ingredients: self.ingredients,
            description: self.description,
        }
    }
}
