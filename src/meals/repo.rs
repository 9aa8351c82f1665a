use anyhow::Context;
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use time::PrimitiveDateTime;
use tracing::warn;

use super::repo_types::{Meal, NewMeal};

/// Access to the meal table. Timestamps are chosen by the caller.
#[async_trait]
pub trait MealStore: Send + Sync {
    /// Insert a meal; `now` becomes both `created_at` and `updated_at`.
    async fn insert(&self, meal: NewMeal, now: PrimitiveDateTime) -> anyhow::Result<Meal>;

    /// All meals, newest `meal_datetime` first, ties by ascending id.
    async fn list(&self) -> anyhow::Result<Vec<Meal>>;

    async fn find(&self, id: i64) -> anyhow::Result<Option<Meal>>;

    /// Replace the mutable fields of meal `id`. `None` when it does not exist.
    async fn update(
        &self,
        id: i64,
        meal: NewMeal,
        updated_at: PrimitiveDateTime,
    ) -> anyhow::Result<Option<Meal>>;
}

const MEAL_COLUMNS: &str =
    "id, name, description, meal_datetime, is_on_diet, created_at, updated_at";

#[derive(Clone)]
pub struct PgMealStore {
    db: PgPool,
}

impl PgMealStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

async fn rollback(tx: Transaction<'_, Postgres>) {
    if let Err(e) = tx.rollback().await {
        warn!(error = %e, "rollback failed");
    }
}

#[async_trait]
impl MealStore for PgMealStore {
    async fn insert(&self, meal: NewMeal, now: PrimitiveDateTime) -> anyhow::Result<Meal> {
        let mut tx = self.db.begin().await.context("begin tx")?;
        let sql = format!(
            r#"
            INSERT INTO meals (name, description, meal_datetime, is_on_diet, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING {MEAL_COLUMNS}
            "#
        );
        let inserted = sqlx::query_as::<_, Meal>(&sql)
            .bind(&meal.name)
            .bind(&meal.description)
            .bind(meal.meal_datetime)
            .bind(meal.is_on_diet)
            .bind(now)
            .fetch_one(&mut *tx)
            .await;

        match inserted {
            Ok(row) => {
                tx.commit().await.context("commit insert")?;
                Ok(row)
            }
            Err(e) => {
                rollback(tx).await;
                Err(e).context("insert meal")
            }
        }
    }

    async fn list(&self) -> anyhow::Result<Vec<Meal>> {
        let sql = format!(
            r#"
            SELECT {MEAL_COLUMNS}
            FROM meals
            ORDER BY meal_datetime DESC, id ASC
            "#
        );
        let rows = sqlx::query_as::<_, Meal>(&sql)
            .fetch_all(&self.db)
            .await
            .context("list meals")?;
        Ok(rows)
    }

    async fn find(&self, id: i64) -> anyhow::Result<Option<Meal>> {
        let sql = format!("SELECT {MEAL_COLUMNS} FROM meals WHERE id = $1");
        let row = sqlx::query_as::<_, Meal>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await
            .context("find meal")?;
        Ok(row)
    }

    async fn update(
        &self,
        id: i64,
        meal: NewMeal,
        updated_at: PrimitiveDateTime,
    ) -> anyhow::Result<Option<Meal>> {
        let mut tx = self.db.begin().await.context("begin tx")?;
        let sql = format!(
            r#"
            UPDATE meals
               SET name = $2,
                   description = $3,
                   meal_datetime = $4,
                   is_on_diet = $5,
                   updated_at = $6
             WHERE id = $1
            RETURNING {MEAL_COLUMNS}
            "#
        );
        let updated = sqlx::query_as::<_, Meal>(&sql)
            .bind(id)
            .bind(&meal.name)
            .bind(&meal.description)
            .bind(meal.meal_datetime)
            .bind(meal.is_on_diet)
            .bind(updated_at)
            .fetch_optional(&mut *tx)
            .await;

        match updated {
            Ok(row) => {
                tx.commit().await.context("commit update")?;
                Ok(row)
            }
            Err(e) => {
                rollback(tx).await;
                Err(e).context("update meal")
            }
        }
    }
}
