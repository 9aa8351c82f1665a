//! In-memory `MealStore` used by the tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use time::PrimitiveDateTime;

use super::repo::MealStore;
use super::repo_types::{Meal, NewMeal};

#[derive(Default)]
pub struct MemoryMealStore {
    rows: Mutex<Vec<Meal>>,
    writes_fail: AtomicBool,
}

impl MemoryMealStore {
    pub fn snapshot(&self) -> Vec<Meal> {
        self.rows.lock().expect("store lock").clone()
    }

    /// Reads keep working; inserts and updates fail from now on.
    pub fn fail_writes(&self) {
        self.writes_fail.store(true, Ordering::SeqCst);
    }

    fn check_writable(&self) -> anyhow::Result<()> {
        if self.writes_fail.load(Ordering::SeqCst) {
            anyhow::bail!("connection refused");
        }
        Ok(())
    }
}

#[async_trait]
impl MealStore for MemoryMealStore {
    async fn insert(&self, meal: NewMeal, now: PrimitiveDateTime) -> anyhow::Result<Meal> {
        self.check_writable()?;
        let mut rows = self.rows.lock().expect("store lock");
        let id = rows.iter().map(|m| m.id).max().unwrap_or(0) + 1;
        let row = Meal {
            id,
            name: meal.name,
            description: meal.description,
            meal_datetime: meal.meal_datetime,
            is_on_diet: meal.is_on_diet,
            created_at: now,
            updated_at: now,
        };
        rows.push(row.clone());
        Ok(row)
    }

    async fn list(&self) -> anyhow::Result<Vec<Meal>> {
        let mut rows = self.snapshot();
        rows.sort_by(|a, b| {
            b.meal_datetime
                .cmp(&a.meal_datetime)
                .then(a.id.cmp(&b.id))
        });
        Ok(rows)
    }

    async fn find(&self, id: i64) -> anyhow::Result<Option<Meal>> {
        Ok(self.snapshot().into_iter().find(|m| m.id == id))
    }

    async fn update(
        &self,
        id: i64,
        meal: NewMeal,
        updated_at: PrimitiveDateTime,
    ) -> anyhow::Result<Option<Meal>> {
        self.check_writable()?;
        let mut rows = self.rows.lock().expect("store lock");
        Ok(rows.iter_mut().find(|m| m.id == id).map(|row| {
            row.name = meal.name;
            row.description = meal.description;
            row.meal_datetime = meal.meal_datetime;
            row.is_on_diet = meal.is_on_diet;
            row.updated_at = updated_at;
            row.clone()
        }))
    }
}

/// Store whose every call fails, as a broken database would.
pub struct FailingMealStore;

#[async_trait]
impl MealStore for FailingMealStore {
    async fn insert(&self, _meal: NewMeal, _now: PrimitiveDateTime) -> anyhow::Result<Meal> {
        anyhow::bail!("connection refused")
    }

    async fn list(&self) -> anyhow::Result<Vec<Meal>> {
        anyhow::bail!("connection refused")
    }

    async fn find(&self, _id: i64) -> anyhow::Result<Option<Meal>> {
        anyhow::bail!("connection refused")
    }

    async fn update(
        &self,
        _id: i64,
        _meal: NewMeal,
        _updated_at: PrimitiveDateTime,
    ) -> anyhow::Result<Option<Meal>> {
        anyhow::bail!("connection refused")
    }
}
