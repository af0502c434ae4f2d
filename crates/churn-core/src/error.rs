//! Error types for input collection

use thiserror::Error;

/// Input collection error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CollectError {
    /// Value is not one of the field's options
    #[error("invalid value {value:?} for {field}")]
    InvalidOption {
        /// Form field name
        field: &'static str,
        /// Rejected value
        value: String,
    },

    /// City tier outside {1, 2, 3}
    #[error("invalid city tier: {0}")]
    InvalidCityTier(i64),
}

/// Result type for input collection
pub type CollectResult<T> = Result<T, CollectError>;
