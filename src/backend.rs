use reqwest::{Client, Method, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};

pub const CSRF_HEADER: &str = "X-CSRFToken";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CsrfToken {
    csrf_token: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Session-cookie client for the Eatr backend API.
#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(config: &AppConfig) -> AppResult<Self> {
        let client = Client::builder()
            .cookie_store(true)
            .timeout(config.http.timeout())
            .build()?;
        Ok(Self {
            client,
            base_url: config.backend_url.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn csrf_token(&self) -> AppResult<String> {
        let res = self.client.get(self.url("/api/csrf-token")).send().await?;
        if !res.status().is_success() {
            warn!(status = %res.status(), "csrf token request rejected");
            return Err(AppError::Backend("Unable to fetch CSRF token".into()));
        }
        let body: CsrfToken = res.json().await?;
        Ok(body.csrf_token)
    }

    pub(crate) async fn get(&self, path: &str) -> AppResult<Response> {
        Ok(self.client.get(self.url(path)).send().await?)
    }

    /// State-changing call: fetches a fresh CSRF token first.
    pub(crate) async fn mutate<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> AppResult<Response> {
        let token = self.csrf_token().await?;
        let mut req = self
            .client
            .request(method.clone(), self.url(path))
            .header(CSRF_HEADER, token);
        if let Some(body) = body {
            req = req.json(body);
        }
        debug!(%method, path, "backend mutation");
        Ok(req.send().await?)
    }
}

/// Server-provided `error` field, or `default` when the body has none.
pub(crate) async fn error_message(res: Response, default: &str) -> String {
    let status = res.status();
    let message = res
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|b| b.error)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| default.to_string());
    warn!(%status, %message, "backend call rejected");
    message
}

/// Decodes a success body, or maps the failure through `on_error`.
pub(crate) async fn expect_json<T: DeserializeOwned>(
    res: Response,
    default_error: &str,
    on_error: fn(String) -> AppError,
) -> AppResult<T> {
    if !res.status().is_success() {
        return Err(on_error(error_message(res, default_error).await));
    }
    Ok(res.json::<T>().await?)
}

pub(crate) async fn expect_ok(
    res: Response,
    default_error: &str,
    on_error: fn(String) -> AppError,
) -> AppResult<()> {
    if !res.status().is_success() {
        return Err(on_error(error_message(res, default_error).await));
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod fake_server {
    //! In-process stand-in for the backend API, shared by the client tests.

    use std::sync::{Arc, Mutex};

    use axum::{
        extract::State,
        http::{HeaderMap, StatusCode},
        routing::{get, patch, post},
        Json, Router,
    };
    use serde_json::{json, Value};

    use super::CSRF_HEADER;

    pub(crate) const TOKEN: &str = "csrf-123";

    #[derive(Clone, Default)]
    pub(crate) struct Recorded {
        pub bodies: Arc<Mutex<Vec<(String, Value)>>>,
        pub goal: Arc<Mutex<i64>>,
        pub logged_in: Arc<Mutex<bool>>,
    }

    impl Recorded {
        fn push(&self, route: &str, body: Value) {
            self.bodies.lock().unwrap().push((route.into(), body));
        }

        pub(crate) fn calls(&self, route: &str) -> Vec<Value> {
            self.bodies
                .lock()
                .unwrap()
                .iter()
                .filter(|(r, _)| r == route)
                .map(|(_, b)| b.clone())
                .collect()
        }
    }

    fn csrf_ok(headers: &HeaderMap) -> bool {
        headers.get(CSRF_HEADER).and_then(|v| v.to_str().ok()) == Some(TOKEN)
    }

    type Reply = (StatusCode, Json<Value>);

    fn forbidden() -> Reply {
        (StatusCode::FORBIDDEN, Json(json!({ "error": "The CSRF token is missing." })))
    }

    pub(crate) fn router(rec: Recorded) -> Router {
        Router::new()
            .route("/api/csrf-token", get(|| async { Json(json!({ "csrfToken": TOKEN })) }))
            .route(
                "/api/login",
                post(|State(rec): State<Recorded>, headers: HeaderMap, Json(body): Json<Value>| async move {
                    if !csrf_ok(&headers) {
                        return forbidden();
                    }
                    rec.push("login", body.clone());
                    if body["password"] == "correct-horse" {
                        *rec.logged_in.lock().unwrap() = true;
                        (StatusCode::OK, Json(json!({ "ok": true })))
                    } else {
                        (StatusCode::UNAUTHORIZED, Json(json!({ "error": "Invalid password" })))
                    }
                }),
            )
            .route(
                "/api/signup",
                post(|State(rec): State<Recorded>, headers: HeaderMap, Json(body): Json<Value>| async move {
                    if !csrf_ok(&headers) {
                        return forbidden();
                    }
                    rec.push("signup", body.clone());
                    if body["username"] == "taken" {
                        return (StatusCode::NOT_FOUND, Json(json!({ "error": "User already registered" })));
                    }
                    *rec.logged_in.lock().unwrap() = true;
                    (StatusCode::OK, Json(json!({ "ok": true })))
                }),
            )
            .route(
                "/api/demo-login",
                post(|State(rec): State<Recorded>, headers: HeaderMap| async move {
                    if !csrf_ok(&headers) {
                        return forbidden();
                    }
                    *rec.logged_in.lock().unwrap() = true;
                    (StatusCode::OK, Json(json!({ "ok": true })))
                }),
            )
            .route(
                "/api/logout",
                post(|State(rec): State<Recorded>, headers: HeaderMap| async move {
                    if !csrf_ok(&headers) {
                        return forbidden();
                    }
                    *rec.logged_in.lock().unwrap() = false;
                    (StatusCode::OK, Json(json!({ "ok": true })))
                }),
            )
            .route(
                "/api/me",
                get(|State(rec): State<Recorded>| async move {
                    if *rec.logged_in.lock().unwrap() {
                        (StatusCode::OK, Json(json!({ "userId": 7, "username": "ada" })))
                    } else {
                        (StatusCode::UNAUTHORIZED, Json(json!({ "error": "Not logged in" })))
                    }
                }),
            )
            .route(
                "/api/goal",
                get(|State(rec): State<Recorded>| async move {
                    let goal = *rec.goal.lock().unwrap();
                    Json(json!({ "goal": goal }))
                })
                .post(|State(rec): State<Recorded>, headers: HeaderMap, Json(body): Json<Value>| async move {
                    if !csrf_ok(&headers) {
                        return forbidden();
                    }
                    *rec.goal.lock().unwrap() = body["goal"].as_i64().unwrap_or_default();
                    (StatusCode::CREATED, Json(json!({ "ok": true })))
                }),
            )
            .route(
                "/api/meals",
                get(|| async {
                    Json(json!([
                        {
                            "mealId": 2,
                            "servingSizeGrams": 150,
                            "productName": "Apple",
                            "nutriments": { "energy-kcal_100g": 52 },
                            "createdAt": "2026-10-16 08:30:00"
                        },
                        { "meal_id": 1, "serving_size_grams": 80, "product_name": "Oats" }
                    ]))
                })
                .post(|State(rec): State<Recorded>, headers: HeaderMap, Json(body): Json<Value>| async move {
                    if !csrf_ok(&headers) {
                        return forbidden();
                    }
                    rec.push("create", body.clone());
                    if body["barcode"] == "666" {
                        return (StatusCode::BAD_REQUEST, Json(json!({ "error": "Meal rejected" })));
                    }
                    if body["barcode"] == "500" {
                        return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({})));
                    }
                    (StatusCode::CREATED, Json(json!({ "ok": true, "meal_id": 42 })))
                })
                .delete(|State(rec): State<Recorded>, headers: HeaderMap, Json(body): Json<Value>| async move {
                    if !csrf_ok(&headers) {
                        return forbidden();
                    }
                    rec.push("delete", body);
                    (StatusCode::OK, Json(json!({ "ok": true })))
                }),
            )
            .route(
                "/api/meals/serving",
                patch(|State(rec): State<Recorded>, headers: HeaderMap, Json(body): Json<Value>| async move {
                    if !csrf_ok(&headers) {
                        return forbidden();
                    }
                    if body["mealIds"].as_array().map_or(true, |ids| ids.is_empty()) {
                        return (
                            StatusCode::BAD_REQUEST,
                            Json(json!({ "error": "mealIds and servingSizeGrams are required" })),
                        );
                    }
                    rec.push("serving", body);
                    (StatusCode::OK, Json(json!({ "ok": true })))
                }),
            )
            .route(
                "/api/meals/recent",
                get(|| async {
                    Json(json!([
                        { "date": "15 Oct", "meals": [] },
                        { "date": "16 Oct", "meals": [
                            { "mealId": 1, "servingSizeGrams": 200, "date": "16 Oct",
                              "nutriments": { "energy-kcal_100g": 100, "proteins_100g": 10 } }
                        ] },
                        { "date": "17 Oct", "meals": null }
                    ]))
                }),
            )
            .with_state(rec)
    }
}
