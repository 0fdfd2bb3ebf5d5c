use async_trait::async_trait;
use reqwest::Method;
use tracing::{info, instrument};

use super::dto::{CreatedMeal, DayMeals, DeleteMeals, MealItem, NewMeal, UpdateServing};
use crate::backend::{expect_json, expect_ok, BackendClient};
use crate::error::{AppError, AppResult};

#[async_trait]
pub trait MealApi: Send + Sync {
    /// Returns the new meal id when the backend reports one.
    async fn create_meal(&self, meal: &NewMeal) -> AppResult<Option<i64>>;
}

#[async_trait]
impl MealApi for BackendClient {
    #[instrument(skip(self, meal), fields(barcode = %meal.barcode, grams = meal.serving_size_grams))]
    async fn create_meal(&self, meal: &NewMeal) -> AppResult<Option<i64>> {
        let res = self
            .mutate(Method::POST, "/api/meals", Some(meal))
            .await
            .map_err(|e| AppError::SubmissionFailed(e.user_message()))?;
        let created: CreatedMeal = expect_json(res, "Unknown error", AppError::SubmissionFailed).await?;
        info!(meal_id = ?created.meal_id, "meal created");
        Ok(created.meal_id)
    }
}

impl BackendClient {
    pub async fn list_meals(&self) -> AppResult<Vec<MealItem>> {
        let res = self.get("/api/meals").await?;
        expect_json(res, "Unable to load meals", AppError::Backend).await
    }

    /// Thirty calendar-day buckets, oldest first.
    pub async fn recent_meals(&self) -> AppResult<Vec<DayMeals>> {
        let res = self.get("/api/meals/recent").await?;
        expect_json(res, "Unable to load meals", AppError::Backend).await
    }

    pub async fn update_serving(&self, meal_ids: &[i64], grams: f64) -> AppResult<()> {
        let body = UpdateServing {
            meal_ids,
            serving_size_grams: grams,
        };
        let res = self.mutate(Method::PATCH, "/api/meals/serving", Some(&body)).await?;
        expect_ok(res, "Unable to update servings", AppError::Backend).await
    }

    pub async fn delete_meals(&self, meal_ids: &[i64]) -> AppResult<()> {
        let body = DeleteMeals { meal_ids };
        let res = self.mutate(Method::DELETE, "/api/meals", Some(&body)).await?;
        expect_ok(res, "Unable to delete meals", AppError::Backend).await
    }
}
