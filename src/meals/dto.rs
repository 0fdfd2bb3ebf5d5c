use serde::{Deserialize, Serialize};

use crate::nutrients::Nutriments;

/// Body of `POST /api/meals`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMeal {
    pub user_id: i64,
    pub barcode: String,
    pub serving_size_grams: f64,
    pub product_name: String,
    pub nutriments: Nutriments,
}

#[derive(Debug, Deserialize)]
pub struct CreatedMeal {
    #[serde(default, alias = "mealId")]
    pub meal_id: Option<i64>,
}

/// One row of `GET /api/meals`. Accepts both casings the backend has used.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealItem {
    #[serde(default, alias = "meal_id", alias = "id")]
    pub meal_id: i64,
    #[serde(default, alias = "serving_size_grams", deserialize_with = "nullable_grams")]
    pub serving_size_grams: f64,
    #[serde(default, alias = "product_name")]
    pub product_name: Option<String>,
    #[serde(default, deserialize_with = "nullable_map")]
    pub nutriments: Nutriments,
    #[serde(default, alias = "created_at")]
    pub created_at: Option<String>,
}

/// A meal inside a day bucket of `GET /api/meals/recent`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealEntry {
    #[serde(default)]
    pub meal_id: i64,
    #[serde(default, deserialize_with = "nullable_grams")]
    pub serving_size_grams: f64,
    #[serde(default)]
    pub date: String,
    #[serde(default, deserialize_with = "nullable_map")]
    pub nutriments: Nutriments,
}

/// One calendar day, oldest first in the recent-meals response.
#[derive(Debug, Clone, Deserialize)]
pub struct DayMeals {
    pub date: String,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub meals: Vec<MealEntry>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateServing<'a> {
    pub meal_ids: &'a [i64],
    pub serving_size_grams: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteMeals<'a> {
    pub meal_ids: &'a [i64],
}

fn nullable_map<'de, D>(d: D) -> Result<Nutriments, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<std::collections::HashMap<String, serde_json::Value>> =
        Option::deserialize(d)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(k, v)| v.as_f64().map(|n| (k, n)))
        .collect())
}

fn nullable_grams<'de, D>(d: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(d)?.unwrap_or_default())
}

fn nullable_vec<'de, D>(d: D) -> Result<Vec<MealEntry>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<MealEntry>>::deserialize(d)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_meal_uses_camel_case() {
        let meal = NewMeal {
            user_id: 1,
            barcode: "123".into(),
            serving_size_grams: 150.0,
            product_name: "Apple".into(),
            nutriments: Nutriments::new(),
        };
        let json = serde_json::to_value(&meal).unwrap();
        assert_eq!(json["userId"], 1);
        assert_eq!(json["servingSizeGrams"], 150.0);
        assert_eq!(json["productName"], "Apple");
        assert!(json["nutriments"].as_object().unwrap().is_empty());
    }

    #[test]
    fn meal_item_accepts_snake_case_and_nulls() {
        let item: MealItem = serde_json::from_str(
            r#"{"meal_id":3,"serving_size_grams":80,"product_name":"Oats","nutriments":null}"#,
        )
        .unwrap();
        assert_eq!(item.meal_id, 3);
        assert_eq!(item.serving_size_grams, 80.0);
        assert!(item.nutriments.is_empty());
        assert!(item.created_at.is_none());
    }

    #[test]
    fn null_serving_reads_as_zero() {
        let items: Vec<MealItem> = serde_json::from_str(
            r#"[{"mealId":1,"servingSizeGrams":null,"productName":"Tea"},
                {"mealId":2,"servingSizeGrams":100}]"#,
        )
        .unwrap();
        assert_eq!(items[0].serving_size_grams, 0.0);
        assert_eq!(items[1].serving_size_grams, 100.0);

        let day: DayMeals = serde_json::from_str(
            r#"{"date":"16 Oct","meals":[{"mealId":1,"servingSizeGrams":null,"nutriments":{}}]}"#,
        )
        .unwrap();
        assert_eq!(day.meals[0].serving_size_grams, 0.0);
    }

    #[test]
    fn day_with_null_meals_is_empty() {
        let day: DayMeals = serde_json::from_str(r#"{"date":"17 Oct","meals":null}"#).unwrap();
        assert!(day.meals.is_empty());
    }
}
