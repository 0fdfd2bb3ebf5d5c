use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Nutrient values per 100 g keyed by food-database key (`energy-kcal_100g`, ...).
pub type Nutriments = BTreeMap<String, f64>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NutrientKey {
    #[serde(rename = "energy-kcal_100g")]
    EnergyKcal,
    #[serde(rename = "proteins_100g")]
    Proteins,
    #[serde(rename = "fat_100g")]
    Fat,
    #[serde(rename = "carbohydrates_100g")]
    Carbohydrates,
    #[serde(rename = "fiber_100g")]
    Fiber,
    #[serde(rename = "sugars_100g")]
    Sugars,
    #[serde(rename = "salt_100g")]
    Salt,
    #[serde(rename = "saturated-fat_100g")]
    SaturatedFat,
    #[serde(rename = "sodium_100g")]
    Sodium,
    #[serde(rename = "vitamin-a_100g")]
    VitaminA,
    #[serde(rename = "vitamin-d_100g")]
    VitaminD,
    #[serde(rename = "vitamin-e_100g")]
    VitaminE,
    #[serde(rename = "vitamin-k_100g")]
    VitaminK,
    #[serde(rename = "vitamin-c_100g")]
    VitaminC,
    #[serde(rename = "vitamin-b1_100g")]
    VitaminB1,
    #[serde(rename = "vitamin-b2_100g")]
    VitaminB2,
    #[serde(rename = "vitamin-pp_100g")]
    VitaminPp,
    #[serde(rename = "vitamin-b6_100g")]
    VitaminB6,
    #[serde(rename = "vitamin-b9_100g")]
    VitaminB9,
    #[serde(rename = "vitamin-b12_100g")]
    VitaminB12,
    #[serde(rename = "biotin_100g")]
    Biotin,
    #[serde(rename = "pantothenic-acid_100g")]
    PantothenicAcid,
    #[serde(rename = "calcium_100g")]
    Calcium,
    #[serde(rename = "iron_100g")]
    Iron,
    #[serde(rename = "magnesium_100g")]
    Magnesium,
    #[serde(rename = "zinc_100g")]
    Zinc,
    #[serde(rename = "potassium_100g")]
    Potassium,
    #[serde(rename = "phosphorus_100g")]
    Phosphorus,
    #[serde(rename = "selenium_100g")]
    Selenium,
    #[serde(rename = "iodine_100g")]
    Iodine,
    #[serde(rename = "cholesterol_100g")]
    Cholesterol,
    #[serde(rename = "trans-fat_100g")]
    TransFat,
    #[serde(rename = "polyunsaturated-fat_100g")]
    PolyunsaturatedFat,
    #[serde(rename = "monounsaturated-fat_100g")]
    MonounsaturatedFat,
    #[serde(rename = "omega-3-fat_100g")]
    Omega3Fat,
    #[serde(rename = "omega-6-fat_100g")]
    Omega6Fat,
    #[serde(rename = "caffeine_100g")]
    Caffeine,
    #[serde(rename = "taurine_100g")]
    Taurine,
    #[serde(rename = "alcohol_100g")]
    Alcohol,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Kcal,
    Grams,
    Milligrams,
    Micrograms,
    PercentVol,
}

impl Unit {
    pub fn label(self) -> &'static str {
        match self {
            Unit::Kcal => "kcal",
            Unit::Grams => "g",
            Unit::Milligrams => "mg",
            Unit::Micrograms => "µg",
            Unit::PercentVol => "% vol",
        }
    }
}

use NutrientKey::*;

/// Display order of the add-meal nutrient table.
pub const DISPLAY_NUTRIENTS: [NutrientKey; 39] = [
    EnergyKcal, Proteins, Fat, Carbohydrates, Fiber, Sugars, Salt, SaturatedFat, Sodium,
    VitaminA, VitaminD, VitaminE, VitaminK, VitaminC, VitaminB1, VitaminB2, VitaminPp, VitaminB6,
    VitaminB9, VitaminB12, Biotin, PantothenicAcid, Calcium, Iron, Magnesium, Zinc, Potassium,
    Phosphorus, Selenium, Iodine, Cholesterol, TransFat, PolyunsaturatedFat, MonounsaturatedFat,
    Omega3Fat, Omega6Fat, Caffeine, Taurine, Alcohol,
];

/// The four keys the diet overview aggregates.
pub const MACRO_NUTRIENTS: [NutrientKey; 4] = [EnergyKcal, Proteins, Fat, Carbohydrates];

impl NutrientKey {
    pub fn key(self) -> &'static str {
        match self {
            EnergyKcal => "energy-kcal_100g",
            Proteins => "proteins_100g",
            Fat => "fat_100g",
            Carbohydrates => "carbohydrates_100g",
            Fiber => "fiber_100g",
            Sugars => "sugars_100g",
            Salt => "salt_100g",
            SaturatedFat => "saturated-fat_100g",
            Sodium => "sodium_100g",
            VitaminA => "vitamin-a_100g",
            VitaminD => "vitamin-d_100g",
            VitaminE => "vitamin-e_100g",
            VitaminK => "vitamin-k_100g",
            VitaminC => "vitamin-c_100g",
            VitaminB1 => "vitamin-b1_100g",
            VitaminB2 => "vitamin-b2_100g",
            VitaminPp => "vitamin-pp_100g",
            VitaminB6 => "vitamin-b6_100g",
            VitaminB9 => "vitamin-b9_100g",
            VitaminB12 => "vitamin-b12_100g",
            Biotin => "biotin_100g",
            PantothenicAcid => "pantothenic-acid_100g",
            Calcium => "calcium_100g",
            Iron => "iron_100g",
            Magnesium => "magnesium_100g",
            Zinc => "zinc_100g",
            Potassium => "potassium_100g",
            Phosphorus => "phosphorus_100g",
            Selenium => "selenium_100g",
            Iodine => "iodine_100g",
            Cholesterol => "cholesterol_100g",
            TransFat => "trans-fat_100g",
            PolyunsaturatedFat => "polyunsaturated-fat_100g",
            MonounsaturatedFat => "monounsaturated-fat_100g",
            Omega3Fat => "omega-3-fat_100g",
            Omega6Fat => "omega-6-fat_100g",
            Caffeine => "caffeine_100g",
            Taurine => "taurine_100g",
            Alcohol => "alcohol_100g",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            EnergyKcal => "Calories",
            Proteins => "Protein",
            Fat => "Fat",
            Carbohydrates => "Carbohydrates",
            Fiber => "Fiber",
            Sugars => "Sugar",
            Salt => "Salt",
            SaturatedFat => "Saturated Fat",
            Sodium => "Sodium",
            VitaminA => "Vitamin A",
            VitaminD => "Vitamin D",
            VitaminE => "Vitamin E",
            VitaminK => "Vitamin K",
            VitaminC => "Vitamin C",
            VitaminB1 => "Vitamin B1 (Thiamine)",
            VitaminB2 => "Vitamin B2 (Riboflavin)",
            VitaminPp => "Vitamin B3 (Niacin)",
            VitaminB6 => "Vitamin B6",
            VitaminB9 => "Vitamin B9 (Folate)",
            VitaminB12 => "Vitamin B12",
            Biotin => "Biotin (Vitamin B8)",
            PantothenicAcid => "Pantothenic Acid (Vitamin B5)",
            Calcium => "Calcium",
            Iron => "Iron",
            Magnesium => "Magnesium",
            Zinc => "Zinc",
            Potassium => "Potassium",
            Phosphorus => "Phosphorus",
            Selenium => "Selenium",
            Iodine => "Iodine",
            Cholesterol => "Cholesterol",
            TransFat => "Trans Fat",
            PolyunsaturatedFat => "Polyunsaturated Fat",
            MonounsaturatedFat => "Monounsaturated Fat",
            Omega3Fat => "Omega-3 Fat",
            Omega6Fat => "Omega-6 Fat",
            Caffeine => "Caffeine",
            Taurine => "Taurine",
            Alcohol => "Alcohol",
        }
    }

    pub fn unit(self) -> Unit {
        match self {
            EnergyKcal => Unit::Kcal,
            Sodium | VitaminE | VitaminC | VitaminB1 | VitaminB2 | VitaminPp | VitaminB6
            | PantothenicAcid | Calcium | Iron | Magnesium | Zinc | Potassium | Phosphorus
            | Cholesterol | Caffeine | Taurine => Unit::Milligrams,
            VitaminA | VitaminD | VitaminK | VitaminB9 | VitaminB12 | Biotin | Selenium
            | Iodine => Unit::Micrograms,
            Alcohol => Unit::PercentVol,
            _ => Unit::Grams,
        }
    }

    /// e.g. `Calories (kcal / 100g)`.
    pub fn label(self) -> String {
        format!("{} ({} / 100g)", self.name(), self.unit().label())
    }

    /// Value per 100 g, 0 when the product does not report it.
    pub fn per_100g(self, nutriments: &Nutriments) -> f64 {
        nutriments.get(self.key()).copied().unwrap_or(0.0)
    }

    pub fn for_serving(self, nutriments: &Nutriments, grams: f64) -> f64 {
        scale_to_serving(self.per_100g(nutriments), grams)
    }
}

pub fn scale_to_serving(per_100g: f64, grams: f64) -> f64 {
    per_100g * grams / 100.0
}

/// Whole calories for a serving, rounded like the screens display them.
pub fn serving_calories(nutriments: &Nutriments, grams: f64) -> i64 {
    EnergyKcal.for_serving(nutriments, grams).round() as i64
}
