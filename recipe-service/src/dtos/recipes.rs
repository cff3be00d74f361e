use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{Dish, NewRecipe, Recipe};
use crate::utils::{FieldReader, FromJsonFields};

/// Body of `POST /recipes`.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct CreateRecipeRequest {
    #[validate(length(max = 50, message = "Name must be at most 50 characters"))]
    pub name: String,

    #[validate(range(min = 1, message = "Cooking time must be a positive number of minutes"))]
    pub cooking_time: i32,

    #[validate(length(max = 500, message = "Ingredients must be at most 500 characters"))]
    pub ingredients: String,

    #[validate(length(max = 250, message = "Description must be at most 250 characters"))]
    pub description: String,
}

impl FromJsonFields for CreateRecipeRequest {
    fn from_fields(fields: &mut FieldReader<'_>) -> Self {
        Self {
            name: fields.string("name"),
            cooking_time: fields.integer("cooking_time"),
            ingredients: fields.string("ingredients"),
            description: fields.string("description"),
        }
    }
}

impl From<CreateRecipeRequest> for NewRecipe {
    fn from(req: CreateRecipeRequest) -> Self {
        Self {
            name: req.name,
            cooking_time: req.cooking_time,
            ingredients: req.ingredients,
            description: req.description,
        }
    }
}

/// Created recipe as returned by `POST /recipes`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecipeResponse {
    pub id: i32,
    pub name: String,
    pub cooking_time: i32,
    pub ingredients: String,
    pub description: String,
}

impl From<Recipe> for RecipeResponse {
    fn from(recipe: Recipe) -> Self {
        Self {
            id: recipe.id,
            name: recipe.name,
            cooking_time: recipe.cooking_time,
            ingredients: recipe.ingredients,
            description: recipe.description,
        }
    }
}

/// Full recipe with its view count, returned by `GET /recipes/:id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecipeDetailResponse {
    pub id: i32,
    pub name: String,
    pub cooking_time: i32,
    pub ingredients: String,
    pub description: String,
    pub views: i32,
}

impl RecipeDetailResponse {
    pub fn new(recipe: Recipe, views: i32) -> Self {
        Self {
            id: recipe.id,
            name: recipe.name,
            cooking_time: recipe.cooking_time,
            ingredients: recipe.ingredients,
            description: recipe.description,
            views,
        }
    }
}

/// One entry of `GET /recipes`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DishSummary {
    pub id: i32,
    pub name: String,
    pub views: i32,
    pub cooking_time: i32,
}

impl From<Dish> for DishSummary {
    fn from(dish: Dish) -> Self {
        Self {
            id: dish.id,
            name: dish.name,
            views: dish.views,
            cooking_time: dish.cooking_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use service_core::error::field_violations;

    fn valid() -> CreateRecipeRequest {
        CreateRecipeRequest {
            name: "Pasta".to_string(),
            cooking_time: 10,
            ingredients: "pasta, water".to_string(),
            description: "boil".to_string(),
        }
    }

    #[test]
    fn accepts_values_at_the_limits() {
        let req = CreateRecipeRequest {
            name: "n".repeat(50),
            cooking_time: 1,
            ingredients: "i".repeat(500),
            description: "d".repeat(250),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn counts_characters_not_bytes() {
        let req = CreateRecipeRequest {
            name: "é".repeat(50),
            ..valid()
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn reports_every_violated_field() {
        let req = CreateRecipeRequest {
            name: "n".repeat(51),
            cooking_time: 0,
            ingredients: "i".repeat(501),
            description: "d".repeat(251),
        };

        let errors = req.validate().unwrap_err();
        let fields: Vec<String> = field_violations(&errors)
            .into_iter()
            .map(|v| v.field)
            .collect();
        assert_eq!(
            fields,
            vec!["cooking_time", "description", "ingredients", "name"]
        );
    }

    #[test]
    fn rejects_negative_cooking_time() {
        let req = CreateRecipeRequest {
            cooking_time: -5,
            ..valid()
        };
        let errors = req.validate().unwrap_err();
        let violations = field_violations(&errors);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "cooking_time");
        assert_eq!(violations[0].code, "range");
    }

    #[test]
    fn reads_request_from_json_fields() {
        let body = serde_json::json!({
            "name": "Tea",
            "cooking_time": 3,
            "ingredients": "tea",
            "description": "steep",
        });
        let mut reader = FieldReader::new(&body);
        let req = CreateRecipeRequest::from_fields(&mut reader);

        assert!(reader.into_violations().is_empty());
        assert_eq!(req.name, "Tea");
        assert_eq!(req.cooking_time, 3);
    }
}
