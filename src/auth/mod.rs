mod client;
pub mod dto;

pub use client::MIN_PASSWORD_LEN;
pub use dto::{SessionUser, SignupForm};
