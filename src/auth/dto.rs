use serde::{Deserialize, Serialize};

/// Request body for login.
#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Request body for registration. `goal` is the daily calorie goal.
#[derive(Debug, Serialize)]
pub struct SignupRequest {
    pub username: String,
    pub password: String,
    pub goal: Option<i64>,
}

/// Current session user as reported by `/api/me`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub user_id: i64,
    pub username: String,
}

/// Raw signup form fields, validated before anything is sent.
#[derive(Debug, Default, Clone)]
pub struct SignupForm {
    pub username: String,
    pub password: String,
    pub confirm_password: String,
    pub goal: String,
}
