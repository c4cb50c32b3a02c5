use thiserror::Error;

use super::order::FormField;

/// Failures of the storage capability. The cart store logs these and
/// degrades to an empty or unchanged cart; they never reach the user.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Stored cart is not valid JSON: {0}")]
    Corrupted(#[from] serde_json::Error),
    #[error("Storage read failed: {0}")]
    Read(String),
    #[error("Storage write failed: {0}")]
    Write(String),
}

pub const GENERIC_REJECTION: &str = "The order could not be placed. Please try again.";
pub const CONNECTIVITY_ERROR: &str =
    "Could not reach the server. Check your connection and try again.";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CheckoutError {
    #[error("Cart is empty")]
    EmptyCart,
    #[error("Missing customer {}", .0.label())]
    MissingField(FormField),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Order rejected with status {status}")]
    Rejected { status: u16, detail: Option<String> },
    #[error("Unexpected response: {0}")]
    InvalidResponse(String),
}

impl CheckoutError {
    /// Text shown to the customer for this failure.
    pub fn user_message(&self) -> String {
        match self {
            CheckoutError::EmptyCart => "Your cart is empty.".to_string(),
            CheckoutError::MissingField(field) => {
                format!("Please enter your {}.", field.label())
            }
            CheckoutError::Network(_) => CONNECTIVITY_ERROR.to_string(),
            CheckoutError::Rejected {
                detail: Some(detail),
                ..
            } => detail.clone(),
            CheckoutError::Rejected { detail: None, .. } | CheckoutError::InvalidResponse(_) => {
                GENERIC_REJECTION.to_string()
            }
        }
    }
}
