//! Recipe catalogue endpoints.

use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::StatusCode,
    Json,
};
use service_core::error::AppError;

use crate::{
    dtos::{CreateRecipeRequest, DishSummary, RecipeDetailResponse, RecipeResponse},
    models::NewRecipe,
    services::metrics::{record_error, RECIPES_CREATED, RECIPE_VIEWS},
    startup::AppState,
    utils::ValidatedJson,
};

/// `POST /recipes`: store a recipe and its dish, return it with its id.
pub async fn create_recipe(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateRecipeRequest>,
) -> Result<(StatusCode, Json<RecipeResponse>), AppError> {
    tracing::info!(
        name = %payload.name,
        cooking_time = payload.cooking_time,
        "Creating recipe"
    );

    let recipe = state
        .store
        .create_recipe(&NewRecipe::from(payload))
        .await
        .inspect_err(|e| record_error(e.kind()))?;

    RECIPES_CREATED.inc();

    Ok((StatusCode::CREATED, Json(RecipeResponse::from(recipe))))
}

/// `GET /recipes`: dish summaries, most viewed first.
pub async fn list_recipes(
    State(state): State<AppState>,
) -> Result<Json<Vec<DishSummary>>, AppError> {
    let dishes = state
        .store
        .list_dishes()
        .await
        .inspect_err(|e| record_error(e.kind()))?;

    tracing::debug!(count = dishes.len(), "Listed recipes");

    Ok(Json(dishes.into_iter().map(DishSummary::from).collect()))
}

/// `GET /recipes/:id`: full recipe; counts one view when it exists.
pub async fn get_recipe(
    State(state): State<AppState>,
    recipe_id: Result<Path<i32>, PathRejection>,
) -> Result<Json<RecipeDetailResponse>, AppError> {
    let Path(recipe_id) =
        recipe_id.map_err(|e| AppError::BadRequest(anyhow::anyhow!("{}", e.body_text())))?;

    let recipe = state
        .store
        .get_recipe(recipe_id)
        .await
        .inspect_err(|e| record_error(e.kind()))?
        .ok_or_else(|| {
            tracing::info!(recipe_id, "Recipe not found");
            AppError::NotFound(anyhow::anyhow!("Recipe {} not found", recipe_id))
        })?;

    let views = match state
        .store
        .increment_views(recipe_id)
        .await
        .inspect_err(|e| record_error(e.kind()))?
    {
        Some(views) => {
            RECIPE_VIEWS.inc();
            views
        }
        None => {
            tracing::warn!(recipe_id, "Recipe has no dish row; view not counted");
            0
        }
    };

    tracing::info!(recipe_id, views, "Recipe viewed");

    Ok(Json(RecipeDetailResponse::new(recipe, views)))
}
