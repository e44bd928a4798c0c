//! Catalog wire types: products, categories, and the paginated product page.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{CategoryId, ProductId};

/// A product as returned by the ShopFusion backend.
///
/// Read-only on the storefront; created/updated/deleted via admin CRUD.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    #[serde(default)]
    pub image: String,
    pub category_id: CategoryId,
    /// Denormalized category name, present on list and detail reads.
    #[serde(default)]
    pub category_name: String,
    pub stock: u32,
    #[serde(default)]
    pub rating: Decimal,
    #[serde(default)]
    pub reviews: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
}

/// A product category.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// One page of products: the backend's `{content, totalPages, totalElements}`
/// shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPage {
    pub content: Vec<Product>,
    pub total_pages: u32,
    pub total_elements: u64,
}

impl ProductPage {
    /// An empty page, used when a fetch degrades silently.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            content: Vec::new(),
            total_pages: 0,
            total_elements: 0,
        }
    }
}
