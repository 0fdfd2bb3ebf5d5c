use async_trait::async_trait;
use reqwest::{header::ACCEPT, Client};
use tracing::{debug, instrument, warn};

use super::dto::{LookupResponse, ProductRecord};
use crate::barcode::Barcode;
use crate::config::AppConfig;
use crate::error::{AppError, AppResult};

pub const PRODUCT_NOT_FOUND: &str = "Product not found";

#[async_trait]
pub trait ProductLookup: Send + Sync {
    async fn fetch(&self, barcode: &Barcode) -> AppResult<ProductRecord>;
}

/// Open Food Facts v2 product endpoint.
#[derive(Clone)]
pub struct FoodDbClient {
    client: Client,
    base_url: String,
}

impl FoodDbClient {
    pub fn new(config: &AppConfig) -> AppResult<Self> {
        let client = Client::builder()
            .user_agent(config.http.user_agent.clone())
            .timeout(config.http.timeout())
            .build()?;
        Ok(Self {
            client,
            base_url: config.food_db_url.clone(),
        })
    }

    fn product_url(&self, barcode: &Barcode) -> String {
        format!("{}/api/v2/product/{}.json", self.base_url, barcode)
    }
}

#[async_trait]
impl ProductLookup for FoodDbClient {
    #[instrument(skip(self), fields(barcode = %barcode))]
    async fn fetch(&self, barcode: &Barcode) -> AppResult<ProductRecord> {
        let res = self
            .client
            .get(self.product_url(barcode))
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        let status = res.status();
        let body = res.text().await?;

        let parsed: LookupResponse = match serde_json::from_str(&body) {
            Ok(p) => p,
            Err(_) if !status.is_success() => {
                warn!(%status, "product lookup failed");
                return Err(AppError::ProductNotFound(format!(
                    "Request failed ({})",
                    status.as_u16()
                )));
            }
            Err(e) => return Err(e.into()),
        };

        if !status.is_success() || !parsed.is_found() {
            let message = parsed
                .status_verbose
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| PRODUCT_NOT_FOUND.to_string());
            debug!(%status, %message, "product not found");
            return Err(AppError::ProductNotFound(message));
        }

        let product = parsed
            .product
            .ok_or_else(|| AppError::ProductNotFound(PRODUCT_NOT_FOUND.into()))?;
        Ok(ProductRecord::from(product))
    }
}
