use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::backend::{expect_json, expect_ok, BackendClient};
use crate::error::{AppError, AppResult};

#[derive(Debug, Deserialize)]
struct GoalResponse {
    #[serde(default)]
    goal: Option<i64>,
}

#[derive(Debug, Serialize)]
struct SetGoal {
    goal: i64,
}

impl BackendClient {
    /// Daily calorie goal; 0 when the user never set one.
    pub async fn goal(&self) -> AppResult<i64> {
        let res = self.get("/api/goal").await?;
        let body: GoalResponse = expect_json(res, "Unable to load goal", AppError::Backend).await?;
        Ok(body.goal.unwrap_or(0))
    }

    pub async fn set_goal(&self, goal: i64) -> AppResult<()> {
        if goal < 0 {
            return Err(AppError::InvalidInput("Goal must be a whole number of calories".into()));
        }
        let res = self.mutate(Method::POST, "/api/goal", Some(&SetGoal { goal })).await?;
        expect_ok(res, "Unable to save goal", AppError::Backend).await?;
        info!(goal, "goal updated");
        Ok(())
    }
}
