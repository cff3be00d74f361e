pub mod recipes;

pub use recipes::{CreateRecipeRequest, DishSummary, RecipeDetailResponse, RecipeResponse};
