//! PostgreSQL store for recipe-service.

use async_trait::async_trait;
use secrecy::{ExposeSecret, Secret};
use service_core::error::AppError;
use sqlx::postgres::{PgConnection, PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{info, instrument};

use crate::models::{Dish, NewDish, NewRecipe, Recipe};
use crate::services::metrics::DB_QUERY_DURATION;
use crate::services::store::RecipeStore;

/// Idempotent schema creation, run once at startup.
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS recipes (
        id SERIAL PRIMARY KEY,
        name VARCHAR(50) NOT NULL,
        cooking_time INTEGER NOT NULL CHECK (cooking_time > 0),
        ingredients VARCHAR(500) NOT NULL,
        description VARCHAR(250) NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS dishes (
        id INTEGER PRIMARY KEY REFERENCES recipes (id) ON DELETE CASCADE,
        name VARCHAR(50) NOT NULL,
        views INTEGER NOT NULL DEFAULT 0 CHECK (views >= 0),
        cooking_time INTEGER NOT NULL CHECK (cooking_time > 0)
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS dishes_listing_idx
        ON dishes (views DESC, cooking_time ASC)
    "#,
];

/// Database connection pool wrapper.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new database connection pool.
    #[instrument(skip(database_url), fields(service = "recipe-service"))]
    pub async fn new(
        database_url: &Secret<String>,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, AppError> {
        info!(
            max_connections = max_connections,
            min_connections = min_connections,
            "Connecting to PostgreSQL"
        );

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .connect(database_url.expose_secret())
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to connect: {}", e)))?;

        info!("PostgreSQL connection pool established");

        Ok(Self { pool })
    }

    /// Wrap an existing pool.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create the recipe and dish tables if they do not exist yet.
    #[instrument(skip(self))]
    pub async fn ensure_schema(&self) -> Result<(), AppError> {
        info!("Ensuring database schema");
        for statement in SCHEMA {
            sqlx::query(*statement)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::DatabaseError(anyhow::anyhow!("Schema creation failed: {}", e))
                })?;
        }
        info!("Database schema ready");
        Ok(())
    }

    /// Close every pooled connection. Waits for checked-out connections.
    pub async fn close(&self) {
        info!("Closing PostgreSQL connection pool");
        self.pool.close().await;
    }
}

async fn insert_dish(conn: &mut PgConnection, input: &NewDish) -> Result<Dish, sqlx::Error> {
    sqlx::query_as::<_, Dish>(
        r#"
        INSERT INTO dishes (id, name, views, cooking_time)
        VALUES ($1, $2, $3, $4)
        RETURNING id, name, views, cooking_time
        "#,
    )
    .bind(input.recipe_id)
    .bind(&input.name)
    .bind(input.views)
    .bind(input.cooking_time)
    .fetch_one(conn)
    .await
}

#[async_trait]
impl RecipeStore for Database {
    #[instrument(skip(self))]
    async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Health check failed: {}", e)))?;
        Ok(())
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    async fn create_recipe(&self, input: &NewRecipe) -> Result<Recipe, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_recipe"])
            .start_timer();

        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to begin transaction: {}", e))
        })?;

        let recipe = sqlx::query_as::<_, Recipe>(
            r#"
            INSERT INTO recipes (name, cooking_time, ingredients, description)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, cooking_time, ingredients, description
            "#,
        )
        .bind(&input.name)
        .bind(input.cooking_time)
        .bind(&input.ingredients)
        .bind(&input.description)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to create recipe: {}", e)))?;

        insert_dish(&mut *tx, &NewDish::for_recipe(&recipe))
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to create dish: {}", e)))?;

        tx.commit().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to commit recipe: {}", e))
        })?;

        timer.observe_duration();

        info!(recipe_id = recipe.id, "Recipe created");

        Ok(recipe)
    }

    #[instrument(skip(self, input), fields(recipe_id = input.recipe_id))]
    async fn create_dish(&self, input: &NewDish) -> Result<Dish, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_dish"])
            .start_timer();

        let mut conn = self.pool.acquire().await?;
        let dish = insert_dish(&mut *conn, input)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to create dish: {}", e)))?;

        timer.observe_duration();

        Ok(dish)
    }

    #[instrument(skip(self))]
    async fn list_dishes(&self) -> Result<Vec<Dish>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_dishes"])
            .start_timer();

        let dishes = sqlx::query_as::<_, Dish>(
            r#"
            SELECT id, name, views, cooking_time
            FROM dishes
            ORDER BY views DESC, cooking_time ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list dishes: {}", e)))?;

        timer.observe_duration();

        Ok(dishes)
    }

    #[instrument(skip(self))]
    async fn get_recipe(&self, id: i32) -> Result<Option<Recipe>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_recipe"])
            .start_timer();

        let recipe = sqlx::query_as::<_, Recipe>(
            r#"
            SELECT id, name, cooking_time, ingredients, description
            FROM recipes
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get recipe: {}", e)))?;

        timer.observe_duration();

        Ok(recipe)
    }

    #[instrument(skip(self))]
    async fn increment_views(&self, id: i32) -> Result<Option<i32>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["increment_views"])
            .start_timer();

        // Single statement: concurrent increments serialize on the row lock.
        let views: Option<i32> = sqlx::query_scalar(
            r#"
            UPDATE dishes
            SET views = views + 1
            WHERE id = $1
            RETURNING views
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to count view: {}", e)))?;

        timer.observe_duration();

        Ok(views)
    }

    #[instrument(skip(self))]
    async fn delete_by_id(&self, id: i32) -> Result<bool, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["delete_by_id"])
            .start_timer();

        let mut tx = self.pool.begin().await?;

        let dishes = sqlx::query("DELETE FROM dishes WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to delete dish: {}", e)))?
            .rows_affected();

        let recipes = sqlx::query("DELETE FROM recipes WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to delete recipe: {}", e))
            })?
            .rows_affected();

        tx.commit().await?;

        timer.observe_duration();

        info!(recipe_id = id, recipes, dishes, "Recipe deleted");

        Ok(recipes + dishes > 0)
    }
}
