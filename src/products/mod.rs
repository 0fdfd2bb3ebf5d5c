pub mod client;
pub mod dto;
pub mod services;

pub use client::{FoodDbClient, ProductLookup};
pub use dto::{ProductRecord, ResolvedProduct};
pub use services::{LookupCoordinator, LookupOutcome};
