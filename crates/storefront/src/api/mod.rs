//! ShopFusion backend REST API client.
//!
//! # Architecture
//!
//! - Plain JSON over HTTP via `reqwest` - the backend is the source of truth,
//!   no local sync
//! - Cart reads/mutations are never cached; every mutation returns the fresh
//!   server-side cart wholesale
//! - The nav category dropdown is the one cached read (`moka`, 60 second TTL)
//!
//! # Example
//!
//! ```rust,ignore
//! use shopfusion_storefront::api::ShopApi;
//!
//! let api = ShopApi::new(&config.api);
//!
//! let product = api.get_product(ProductId::new(1)).await?;
//! let cart = api.add_item("default-cart", product.id, 2).await?;
//! ```

mod client;

pub use client::ShopApi;

use thiserror::Error;

/// Errors that can occur when talking to the ShopFusion backend.
///
/// Mirrors the failure taxonomy every page handles: transport failure,
/// non-2xx response, JSON parse failure, and malformed result shape.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network/transport failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend returned a non-2xx status.
    #[error("Backend returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Response parsed but did not have the expected shape.
    #[error("Malformed response shape: {0}")]
    MalformedShape(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ApiError::NotFound("product 123".to_string());
        assert_eq!(err.to_string(), "Not found: product 123");

        let err = ApiError::MalformedShape("expected an array of categories".to_string());
        assert_eq!(
            err.to_string(),
            "Malformed response shape: expected an array of categories"
        );
    }

    #[test]
    fn test_status_error_display() {
        let err = ApiError::Status {
            status: reqwest::StatusCode::BAD_GATEWAY,
            body: "upstream down".to_string(),
        };
        assert_eq!(err.to_string(), "Backend returned 502 Bad Gateway: upstream down");
    }
}
