//! ShopFusion REST API client implementation.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use shopfusion_core::{Cart, CartItemId, Category, Product, ProductId, ProductPage};

use crate::api::ApiError;
use crate::catalog::CatalogQuery;
use crate::config::ApiConfig;

/// TTL for the nav category dropdown cache.
const CATEGORY_CACHE_TTL: Duration = Duration::from_secs(60);

/// Cache key for the category list (single entry).
const CATEGORY_CACHE_KEY: &str = "categories";

/// Request body for `POST /api/cart/{cartId}/items`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AddItemBody {
    product_id: ProductId,
    quantity: u32,
}

/// Request body for `PUT /api/cart/{cartId}/items/{itemId}`.
#[derive(Debug, Serialize)]
struct UpdateItemBody {
    quantity: u32,
}

/// Client for the ShopFusion backend REST API.
///
/// Cheaply cloneable via `Arc`. Cart operations are never cached; the
/// category list used by the nav shell is cached for one minute.
#[derive(Clone)]
pub struct ShopApi {
    inner: Arc<ShopApiInner>,
}

struct ShopApiInner {
    client: reqwest::Client,
    base_url: String,
    categories: Cache<&'static str, Vec<Category>>,
}

impl ShopApi {
    /// Create a new backend API client.
    #[must_use]
    pub fn new(config: &ApiConfig) -> Self {
        Self::with_base_url(&config.base_url)
    }

    /// Create a client against an explicit base URL (used by tests).
    #[must_use]
    pub fn with_base_url(base_url: &str) -> Self {
        let categories = Cache::builder()
            .max_capacity(1)
            .time_to_live(CATEGORY_CACHE_TTL)
            .build();

        Self {
            inner: Arc::new(ShopApiInner {
                client: reqwest::Client::new(),
                base_url: base_url.trim_end_matches('/').to_string(),
                categories,
            }),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    /// Execute a GET and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(
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

    /// Check the status and decode a response body, with the raw text kept
    /// around for error diagnostics.
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

    // =========================================================================
    // Category Methods
    // =========================================================================

    /// Get the full category list.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is not an array
    /// of categories.
    #[instrument(skip(self))]
    pub async fn get_categories(&self) -> Result<Vec<Category>, ApiError> {
        let value: serde_json::Value = self.get_json("/api/categories", &[]).await?;

        if !value.is_array() {
            return Err(ApiError::MalformedShape(
                "expected an array of categories".to_string(),
            ));
        }

        Ok(serde_json::from_value(value)?)
    }

    /// Get the category list for the nav shell, degrading silently to empty.
    ///
    /// Cached for one minute; a fetch failure yields an empty dropdown rather
    /// than an error page.
    pub async fn nav_categories(&self) -> Vec<Category> {
        if let Some(cached) = self.inner.categories.get(CATEGORY_CACHE_KEY).await {
            debug!("Cache hit for nav categories");
            return cached;
        }

        match self.get_categories().await {
            Ok(categories) => {
                self.inner
                    .categories
                    .insert(CATEGORY_CACHE_KEY, categories.clone())
                    .await;
                categories
            }
            Err(e) => {
                tracing::warn!("Failed to fetch nav categories: {e}");
                Vec::new()
            }
        }
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// Get one page of the filtered, sorted product catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the page cannot be decoded.
    #[instrument(skip(self, query))]
    pub async fn get_products(&self, query: &CatalogQuery) -> Result<ProductPage, ApiError> {
        self.get_json("/api/products", &query.backend_params()).await
    }

    /// Get a single product by id.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` for unknown ids, or another variant if
    /// the request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: ProductId) -> Result<Product, ApiError> {
        self.get_json(&format!("/api/products/{id}"), &[]).await
    }

    /// Get related products for a product.
    ///
    /// Any failure (transport, non-OK status, parse) is tolerated as "no
    /// related products" rather than surfaced as an error.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_related(&self, id: ProductId) -> Vec<Product> {
        let result: Result<Vec<Product>, ApiError> = self
            .get_json(&format!("/api/products/{id}/related"), &[])
            .await;

        match result {
            Ok(products) => products,
            Err(e) => {
                tracing::warn!("Related products unavailable for {id}: {e}");
                Vec::new()
            }
        }
    }

    // =========================================================================
    // Cart Methods (never cached - mutable state)
    // =========================================================================

    /// Fetch a cart by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be fetched or decoded.
    #[instrument(skip(self), fields(cart_id = %cart_id))]
    pub async fn get_cart(&self, cart_id: &str) -> Result<Cart, ApiError> {
        self.get_json(&format!("/api/cart/{}", urlencoding::encode(cart_id)), &[])
            .await
    }

    /// Add an item to a cart. Returns the fresh server-side cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the mutation fails.
    #[instrument(skip(self), fields(cart_id = %cart_id, product_id = %product_id))]
    pub async fn add_item(
        &self,
        cart_id: &str,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<Cart, ApiError> {
        let path = format!("/api/cart/{}/items", urlencoding::encode(cart_id));
        let response = self
            .inner
            .client
            .post(self.url(&path))
            .json(&AddItemBody {
                product_id,
                quantity,
            })
            .send()
            .await?;

        Self::decode(response, &path).await
    }

    /// Set an item's quantity. Returns the fresh server-side cart.
    ///
    /// Callers clamp the quantity into `[1, stock]` before issuing the call.
    ///
    /// # Errors
    ///
    /// Returns an error if the mutation fails.
    #[instrument(skip(self), fields(cart_id = %cart_id, item_id = %item_id))]
    pub async fn update_item(
        &self,
        cart_id: &str,
        item_id: CartItemId,
        quantity: u32,
    ) -> Result<Cart, ApiError> {
        let path = format!(
            "/api/cart/{}/items/{item_id}",
            urlencoding::encode(cart_id)
        );
        let response = self
            .inner
            .client
            .put(self.url(&path))
            .json(&UpdateItemBody { quantity })
            .send()
            .await?;

        Self::decode(response, &path).await
    }

    /// Remove an item from a cart. Returns the fresh server-side cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the mutation fails.
    #[instrument(skip(self), fields(cart_id = %cart_id, item_id = %item_id))]
    pub async fn remove_item(&self, cart_id: &str, item_id: CartItemId) -> Result<Cart, ApiError> {
        let path = format!(
            "/api/cart/{}/items/{item_id}",
            urlencoding::encode(cart_id)
        );
        let response = self.inner.client.delete(self.url(&path)).send().await?;

        Self::decode(response, &path).await
    }

    /// Clear a cart. Returns the fresh (now empty) server-side cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the mutation fails.
    #[instrument(skip(self), fields(cart_id = %cart_id))]
    pub async fn clear_cart(&self, cart_id: &str) -> Result<Cart, ApiError> {
        let path = format!("/api/cart/{}", urlencoding::encode(cart_id));
        let response = self.inner.client.delete(self.url(&path)).send().await?;

        Self::decode(response, &path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_strips_trailing_slash() {
        let api = ShopApi::with_base_url("http://localhost:8080/");
        assert_eq!(api.url("/api/categories"), "http://localhost:8080/api/categories");
    }

    #[test]
    fn test_cart_id_is_percent_encoded() {
        let api = ShopApi::with_base_url("http://localhost:8080");
        let encoded = urlencoding::encode("cart/with spaces");
        assert_eq!(
            api.url(&format!("/api/cart/{encoded}")),
            "http://localhost:8080/api/cart/cart%2Fwith%20spaces"
        );
    }
}
