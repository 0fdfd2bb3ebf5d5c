use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    InvalidBarcode(String),

    #[error("{0}")]
    ProductNotFound(String),

    #[error("{0}")]
    CameraUnavailable(String),

    #[error("Please enter a serving size in grams.")]
    MissingServingSize,

    #[error("No product selected.")]
    NoProductResolved,

    #[error("{0}")]
    SubmissionFailed(String),

    /// Form input rejected before anything was sent.
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    Backend(String),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Message shown inline on the screen. Transport failures get a generic line.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Http(_) | AppError::Decode(_) => "Something went wrong".into(),
            other => other.to_string(),
        }
    }

    pub fn is_user_input(&self) -> bool {
        matches!(
            self,
            AppError::InvalidBarcode(_)
                | AppError::InvalidInput(_)
                | AppError::MissingServingSize
                | AppError::NoProductResolved
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_pass_through_service_text() {
        let e = AppError::ProductNotFound("product not found".into());
        assert_eq!(e.user_message(), "product not found");
        assert!(!e.is_user_input());
        assert!(AppError::MissingServingSize.is_user_input());
        assert!(AppError::InvalidInput("Password too weak".into()).is_user_input());
    }

    #[test]
    fn decode_errors_are_generic_for_the_user() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let e = AppError::from(err);
        assert_eq!(e.user_message(), "Something went wrong");
        assert!(e.to_string().starts_with("malformed response"));
    }
}
