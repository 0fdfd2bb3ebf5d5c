pub mod client;
pub mod dto;
pub mod services;

pub use client::MealApi;
pub use services::{meal_rows, parse_serving, submit_draft, MealDraft, MealRow};
