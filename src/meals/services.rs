use time::{macros::format_description, PrimitiveDateTime};
use tracing::{instrument, warn};

use super::client::MealApi;
use super::dto::{MealItem, NewMeal};
use crate::barcode::Barcode;
use crate::error::{AppError, AppResult};
use crate::nutrients::serving_calories;
use crate::products::dto::UNKNOWN_PRODUCT;
use crate::products::{ProductRecord, ResolvedProduct};

/// A meal ready to send: resolved product, positive serving size, owner.
#[derive(Debug, Clone, PartialEq)]
pub struct MealDraft {
    pub user_id: i64,
    pub barcode: Barcode,
    pub serving_size_grams: f64,
    pub product: ProductRecord,
}

impl MealDraft {
    pub fn new(
        user_id: i64,
        product: Option<&ResolvedProduct>,
        serving_input: &str,
    ) -> AppResult<Self> {
        let resolved = product.ok_or(AppError::NoProductResolved)?;
        let serving_size_grams = parse_serving(serving_input)?;
        Ok(Self {
            user_id,
            barcode: resolved.barcode.clone(),
            serving_size_grams,
            product: resolved.record.clone(),
        })
    }

    pub fn calories(&self) -> i64 {
        serving_calories(&self.product.nutriments, self.serving_size_grams)
    }

    pub fn into_payload(self) -> NewMeal {
        NewMeal {
            user_id: self.user_id,
            barcode: self.barcode.to_string(),
            serving_size_grams: self.serving_size_grams,
            product_name: self
                .product
                .name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| UNKNOWN_PRODUCT.to_string()),
            nutriments: self.product.nutriments,
        }
    }
}

/// Grams from the serving field; anything but a positive finite number is missing.
pub fn parse_serving(input: &str) -> AppResult<f64> {
    match input.trim().parse::<f64>() {
        Ok(g) if g.is_finite() && g > 0.0 => Ok(g),
        _ => Err(AppError::MissingServingSize),
    }
}

/// Consumes the draft whatever the outcome.
#[instrument(skip_all, fields(barcode = %draft.barcode, grams = draft.serving_size_grams))]
pub async fn submit_draft(api: &dyn MealApi, draft: MealDraft) -> AppResult<Option<i64>> {
    let payload = draft.into_payload();
    api.create_meal(&payload).await.map_err(|e| {
        warn!(error = %e, "meal submission failed");
        match e {
            AppError::SubmissionFailed(_) => e,
            other => AppError::SubmissionFailed(other.user_message()),
        }
    })
}

/// Dashboard table row.
#[derive(Debug, Clone, PartialEq)]
pub struct MealRow {
    pub meal_id: i64,
    pub name: String,
    pub serving_size_grams: f64,
    pub calories: i64,
    pub created_at: Option<PrimitiveDateTime>,
}

impl From<MealItem> for MealRow {
    fn from(item: MealItem) -> Self {
        let created_at = item.created_at.as_deref().and_then(parse_created_at);
        Self {
            meal_id: item.meal_id,
            calories: serving_calories(&item.nutriments, item.serving_size_grams),
            name: item
                .product_name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| UNKNOWN_PRODUCT.to_string()),
            serving_size_grams: item.serving_size_grams,
            created_at,
        }
    }
}

pub fn meal_rows(items: Vec<MealItem>) -> Vec<MealRow> {
    items.into_iter().map(MealRow::from).collect()
}

fn parse_created_at(raw: &str) -> Option<PrimitiveDateTime> {
    let format = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    PrimitiveDateTime::parse(raw, &format).ok()
}
