//! Dish: the listing/view-count record paired with each recipe.
//!
//! A dish shares its primary key with the recipe it summarises, so the
//! recipe id addresses the view counter directly.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::Recipe;

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Dish {
    pub id: i32,
    pub name: String,
    pub views: i32,
    pub cooking_time: i32,
}

/// Input for creating a dish row for an existing recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDish {
    pub recipe_id: i32,
    pub name: String,
    pub cooking_time: i32,
    pub views: i32,
}

impl NewDish {
    /// Companion dish for a freshly created recipe, with no views yet.
    pub fn for_recipe(recipe: &Recipe) -> Self {
        Self {
            recipe_id: recipe.id,
            name: recipe.name.clone(),
            cooking_time: recipe.cooking_time,
            views: 0,
        }
    }

    pub fn into_dish(self) -> Dish {
        Dish {
            id: self.recipe_id,
            name: self.name,
            views: self.views,
            cooking_time: self.cooking_time,
        }
    }
}

/// Listing order: most viewed first, then quickest to cook.
///
/// Ties on both keys fall back to id so in-memory listings are stable.
pub fn listing_order(a: &Dish, b: &Dish) -> std::cmp::Ordering {
    b.views
        .cmp(&a.views)
        .then_with(|| a.cooking_time.cmp(&b.cooking_time))
        .then_with(|| a.id.cmp(&b.id))
}
