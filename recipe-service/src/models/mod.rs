//! Persistent records of the recipe catalogue.

pub mod dish;
pub mod recipe;

pub use dish::{Dish, NewDish};
pub use recipe::{NewRecipe, Recipe};
