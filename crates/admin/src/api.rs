//! Admin client for the ShopFusion backend REST API.
//!
//! Same wire surface as the storefront's read paths, plus the product and
//! category CRUD mutations. Nothing is cached: every admin list view is a
//! fresh fetch, and every mutation is followed by a redirect back to a list
//! page that refetches.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::instrument;

use shopfusion_core::{Category, CategoryId, Product, ProductId, ProductPage};

use crate::forms::{CategoryPayload, ProductPayload};

/// Products per admin list page.
pub const ADMIN_PAGE_SIZE: u32 = 10;

/// Errors from the backend API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure (connection refused, timeout, DNS).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend returned a non-success status.
    #[error("Backend returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    /// Response body was not valid JSON for the expected type.
    #[error("Failed to parse backend response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource does not exist.
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Client for the ShopFusion backend REST API (admin surface).
#[derive(Clone)]
pub struct AdminApi {
    inner: Arc<AdminApiInner>,
}

struct AdminApiInner {
    client: reqwest::Client,
    base_url: String,
}

impl AdminApi {
    /// Create a new backend API client.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            inner: Arc::new(AdminApiInner {
                client: reqwest::Client::new(),
                base_url: base_url.trim_end_matches('/').to_string(),
            }),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    async fn decode<T: DeserializeOwned>(
        response: reqwest::Response,
        path: &str,
    ) -> Result<T, ApiError> {
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(path.to_string()));
        }

        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(200).collect::<String>(),
                path,
                "Backend returned non-success status"
            );
            return Err(ApiError::Status {
                status,
                body: body.chars().take(200).collect(),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(200).collect::<String>(),
                path,
                "Failed to parse backend response"
            );
            ApiError::Parse(e)
        })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(String, String)],
    ) -> Result<T, ApiError> {
        let response = self
            .inner
            .client
            .get(self.url(path))
            .query(params)
            .send()
            .await?;
        Self::decode(response, path).await
    }

    async fn post<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self.inner.client.post(self.url(path)).json(body).send().await?;
        Self::decode(response, path).await
    }

    async fn put<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self.inner.client.put(self.url(path)).json(body).send().await?;
        Self::decode(response, path).await
    }

    /// Issue a DELETE, tolerating an empty success body.
    async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let response = self.inner.client.delete(self.url(path)).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(path.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status,
                body: body.chars().take(200).collect(),
            });
        }

        Ok(())
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// Get one page of products for the admin list (page size 10).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the page cannot be decoded.
    #[instrument(skip(self))]
    pub async fn list_products(&self, page: u32) -> Result<ProductPage, ApiError> {
        let params = vec![
            ("page".to_string(), page.saturating_sub(1).to_string()),
            ("size".to_string(), ADMIN_PAGE_SIZE.to_string()),
            ("sort".to_string(), "name,asc".to_string()),
        ];
        self.get("/api/products", &params).await
    }

    /// Get a single product by id.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` for unknown ids, or another variant if
    /// the request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: ProductId) -> Result<Product, ApiError> {
        self.get(&format!("/api/products/{id}"), &[]).await
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the mutation fails.
    #[instrument(skip(self, payload))]
    pub async fn create_product(&self, payload: &ProductPayload) -> Result<Product, ApiError> {
        self.post("/api/products", payload).await
    }

    /// Update a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the mutation fails.
    #[instrument(skip(self, payload), fields(product_id = %id))]
    pub async fn update_product(
        &self,
        id: ProductId,
        payload: &ProductPayload,
    ) -> Result<Product, ApiError> {
        self.put(&format!("/api/products/{id}"), payload).await
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the mutation fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete_product(&self, id: ProductId) -> Result<(), ApiError> {
        self.delete(&format!("/api/products/{id}")).await
    }

    // =========================================================================
    // Categories
    // =========================================================================

    /// Get the full (unpaginated) category list.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the list cannot be decoded.
    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
        self.get("/api/categories", &[]).await
    }

    /// Get a single category by id.
    ///
    /// The backend exposes no per-id category read, so this filters the full
    /// list.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` for unknown ids, or another variant if
    /// the list fetch fails.
    #[instrument(skip(self), fields(category_id = %id))]
    pub async fn get_category(&self, id: CategoryId) -> Result<Category, ApiError> {
        self.list_categories()
            .await?
            .into_iter()
            .find(|category| category.id == id)
            .ok_or_else(|| ApiError::NotFound(format!("/api/categories/{id}")))
    }

    /// Create a category.
    ///
    /// # Errors
    ///
    /// Returns an error if the mutation fails.
    #[instrument(skip(self, payload))]
    pub async fn create_category(&self, payload: &CategoryPayload) -> Result<Category, ApiError> {
        self.post("/api/categories", payload).await
    }

    /// Update a category.
    ///
    /// # Errors
    ///
    /// Returns an error if the mutation fails.
    #[instrument(skip(self, payload), fields(category_id = %id))]
    pub async fn update_category(
        &self,
        id: CategoryId,
        payload: &CategoryPayload,
    ) -> Result<Category, ApiError> {
        self.put(&format!("/api/categories/{id}"), payload).await
    }

    /// Delete a category.
    ///
    /// # Errors
    ///
    /// Returns an error if the mutation fails.
    #[instrument(skip(self), fields(category_id = %id))]
    pub async fn delete_category(&self, id: CategoryId) -> Result<(), ApiError> {
        self.delete(&format!("/api/categories/{id}")).await
    }
}
