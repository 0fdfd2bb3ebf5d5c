//! Diet overview numbers: nutrient totals over the last N day buckets,
//! macro energy split, daily calorie bars and goal axis ticks.

use std::collections::BTreeMap;

use crate::meals::dto::{DayMeals, MealEntry};
use crate::nutrients::{scale_to_serving, NutrientKey, MACRO_NUTRIENTS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    Today,
    Week,
    Month,
}

impl Window {
    pub fn days(self) -> usize {
        match self {
            Window::Today => 1,
            Window::Week => 7,
            Window::Month => 30,
        }
    }
}

/// Per-serving totals keyed by nutrient.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Totals(BTreeMap<&'static str, f64>);

impl Totals {
    pub fn get(&self, key: NutrientKey) -> f64 {
        self.0.get(key.key()).copied().unwrap_or(0.0)
    }

    fn add_meal(mut self, meal: &MealEntry, keys: &[NutrientKey]) -> Self {
        for key in keys {
            let value = scale_to_serving(key.per_100g(&meal.nutriments), meal.serving_size_grams);
            *self.0.entry(key.key()).or_insert(0.0) += value;
        }
        self
    }
}

fn last_days(days: &[DayMeals], n: usize) -> &[DayMeals] {
    &days[days.len().saturating_sub(n)..]
}

pub fn totals(days: &[DayMeals], n: usize, keys: &[NutrientKey]) -> Totals {
    last_days(days, n)
        .iter()
        .flat_map(|d| d.meals.iter())
        .fold(Totals::default(), |acc, meal| acc.add_meal(meal, keys))
}

pub fn window_totals(days: &[DayMeals], window: Window) -> Totals {
    totals(days, window.days(), &MACRO_NUTRIENTS)
}

/// Share of calories from each macro, in percent with one decimal.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MacroSplit {
    pub fat: f64,
    pub protein: f64,
    pub carbs: f64,
}

impl MacroSplit {
    /// All zero when there are no calories to split.
    pub fn from_totals(t: &Totals) -> Self {
        let kcal = t.get(NutrientKey::EnergyKcal);
        if kcal <= 0.0 {
            return Self::default();
        }
        let fat = round1(t.get(NutrientKey::Fat) * 9.0 / kcal * 100.0);
        let protein = round1(t.get(NutrientKey::Proteins) * 4.0 / kcal * 100.0);
        Self {
            fat,
            protein,
            carbs: round1(100.0 - fat - protein),
        }
    }
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyCalories {
    pub day: String,
    pub calories: i64,
}

/// Rounded calories per day for the last `n` buckets, oldest first.
pub fn daily_calories(days: &[DayMeals], n: usize) -> Vec<DailyCalories> {
    last_days(days, n)
        .iter()
        .map(|d| DailyCalories {
            day: d.date.clone(),
            calories: totals(std::slice::from_ref(d), 1, &[NutrientKey::EnergyKcal])
                .get(NutrientKey::EnergyKcal)
                .round() as i64,
        })
        .collect()
}

/// Axis ticks at 1/4, 1/2, 3/4, 1 and 5/4 of the goal; deduplicated, ascending.
pub fn goal_ticks(goal: i64) -> Vec<i64> {
    let g = goal as f64;
    let mut ticks: Vec<i64> = [g / 4.0, g / 2.0, 3.0 * g / 4.0, g, g * 1.25]
        .iter()
        .map(|t| t.round() as i64)
        .collect();
    ticks.sort_unstable();
    ticks.dedup();
    ticks
}

/// Everything the overview screen draws.
#[derive(Debug, Clone, PartialEq)]
pub struct Overview {
    pub today: MacroSplit,
    pub week: MacroSplit,
    pub month: MacroSplit,
    pub today_totals: Totals,
    pub last_week: Vec<DailyCalories>,
    pub goal: i64,
    pub ticks: Vec<i64>,
}

impl Overview {
    pub fn build(days: &[DayMeals], goal: i64) -> Self {
        let today_totals = window_totals(days, Window::Today);
        Self {
            today: MacroSplit::from_totals(&today_totals),
            week: MacroSplit::from_totals(&window_totals(days, Window::Week)),
            month: MacroSplit::from_totals(&window_totals(days, Window::Month)),
            today_totals,
            last_week: daily_calories(days, Window::Week.days()),
            goal,
            ticks: goal_ticks(goal),
        }
    }
}
