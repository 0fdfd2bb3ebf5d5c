use std::time::Duration;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub backend_url: String,
    pub food_db_url: String,
    /// Origin the app is served from; decides whether camera access is allowed.
    pub origin: String,
    pub http: HttpConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let backend_url = std::env::var("EATR_BACKEND_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:5000".into());
        let food_db_url = std::env::var("EATR_FOOD_DB_URL")
            .unwrap_or_else(|_| "https://world.openfoodfacts.org".into());
        let origin = std::env::var("EATR_ORIGIN").unwrap_or_else(|_| "http://localhost".into());
        let http = HttpConfig {
            user_agent: std::env::var("EATR_USER_AGENT").unwrap_or_else(|_| default_user_agent()),
            timeout_secs: std::env::var("EATR_HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(15),
        };
        Ok(Self {
            backend_url: trim_base(backend_url),
            food_db_url: trim_base(food_db_url),
            origin,
            http,
        })
    }

    /// Config pointing both collaborators at the same local base URL.
    pub fn local(base_url: &str) -> Self {
        Self {
            backend_url: trim_base(base_url.to_string()),
            food_db_url: trim_base(base_url.to_string()),
            origin: "http://localhost".into(),
            http: HttpConfig {
                user_agent: default_user_agent(),
                timeout_secs: 5,
            },
        }
    }
}

fn default_user_agent() -> String {
    format!("Eatr/{} (barcode lookup)", env!("CARGO_PKG_VERSION"))
}

fn trim_base(url: String) -> String {
    url.trim_end_matches('/').to_string()
}
