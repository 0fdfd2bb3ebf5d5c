use reqwest::{Method, StatusCode};
use tracing::{info, instrument};

use super::dto::{LoginRequest, SessionUser, SignupForm, SignupRequest};
use crate::backend::{expect_json, expect_ok, BackendClient};
use crate::error::{AppError, AppResult};

pub const MIN_PASSWORD_LEN: usize = 8;

impl SignupForm {
    /// Same rules the backend enforces, plus the confirmation match.
    pub fn validate(&self) -> AppResult<SignupRequest> {
        let username = self.username.trim();
        if username.is_empty() {
            return Err(AppError::InvalidInput("Invalid username".into()));
        }
        if self.password.is_empty() || self.password != self.confirm_password {
            return Err(AppError::InvalidInput("Passwords do not match".into()));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::InvalidInput("Password too weak".into()));
        }
        let goal = match self.goal.trim() {
            "" => None,
            g => match g.parse::<i64>() {
                Ok(v) if v >= 0 => Some(v),
                _ => return Err(AppError::InvalidInput("Goal must be a whole number of calories".into())),
            },
        };
        Ok(SignupRequest {
            username: username.to_string(),
            password: self.password.clone(),
            goal,
        })
    }
}

impl BackendClient {
    /// `None` when there is no session.
    pub async fn me(&self) -> AppResult<Option<SessionUser>> {
        let res = self.get("/api/me").await?;
        if res.status() == StatusCode::UNAUTHORIZED {
            return Ok(None);
        }
        expect_json(res, "Unable to load session", AppError::Backend)
            .await
            .map(Some)
    }

    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> AppResult<SessionUser> {
        let body = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let res = self.mutate(Method::POST, "/api/login", Some(&body)).await?;
        expect_ok(res, "Invalid credentials", AppError::Backend).await?;
        let user = self.require_session().await?;
        info!(user_id = user.user_id, "logged in");
        Ok(user)
    }

    #[instrument(skip_all, fields(username = %form.username))]
    pub async fn signup(&self, form: &SignupForm) -> AppResult<SessionUser> {
        let body = form.validate()?;
        let res = self.mutate(Method::POST, "/api/signup", Some(&body)).await?;
        expect_ok(res, "Invalid credentials", AppError::Backend).await?;
        let user = self.require_session().await?;
        info!(user_id = user.user_id, "signed up");
        Ok(user)
    }

    pub async fn demo_login(&self) -> AppResult<SessionUser> {
        let res = self.mutate::<()>(Method::POST, "/api/demo-login", None).await?;
        expect_ok(res, "Demo login failed", AppError::Backend).await?;
        self.require_session().await
    }

    pub async fn logout(&self) -> AppResult<()> {
        let res = self.mutate::<()>(Method::POST, "/api/logout", None).await?;
        expect_ok(res, "Logout failed", AppError::Backend).await
    }

    async fn require_session(&self) -> AppResult<SessionUser> {
        self.me()
            .await?
            .ok_or_else(|| AppError::Backend("Unable to load session".into()))
    }
}
