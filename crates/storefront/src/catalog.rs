//! Catalog filter state and pagination windowing.
//!
//! The filter state is mirrored bidirectionally to the URL query string so a
//! shared link reproduces the same view. Default values (page 1, sortBy=name,
//! sortOrder=asc) are omitted to keep URLs minimal. Every change produces a
//! fresh full-page fetch; catalog pages are never cached client-side.

use rust_decimal::Decimal;
use serde::Deserialize;

use shopfusion_core::CategoryId;

/// Products per catalog page.
pub const PAGE_SIZE: u32 = 12;

/// Maximum page-number buttons shown at once.
const MAX_VISIBLE_PAGES: u32 = 5;

/// Sort field for the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    #[default]
    Name,
    Price,
    Rating,
}

impl SortBy {
    /// Wire name, as used in both the URL and the backend sort parameter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Price => "price",
            Self::Rating => "rating",
        }
    }
}

/// Sort direction for the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// Wire name, as used in both the URL and the backend sort parameter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

fn default_page() -> u32 {
    1
}

/// Catalog filter, sort, and pagination state.
///
/// Deserialized straight from the page's query string; [`Self::to_query_string`]
/// is the inverse, omitting defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CatalogQuery {
    pub category: Option<CategoryId>,
    pub search: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub sort_by: SortBy,
    pub sort_order: SortOrder,
    /// 1-indexed in the UI; translated to 0-indexed for the backend.
    pub page: u32,
}

impl Default for CatalogQuery {
    fn default() -> Self {
        Self {
            category: None,
            search: None,
            min_price: None,
            max_price: None,
            sort_by: SortBy::default(),
            sort_order: SortOrder::default(),
            page: default_page(),
        }
    }
}

impl CatalogQuery {
    /// Whether any non-default filter is active.
    #[must_use]
    pub fn is_filtered(&self) -> bool {
        *self != Self::default()
    }

    /// Serialize to a URL query string, omitting default values. Returns an
    /// empty string when every field is at its default.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        let mut pairs: Vec<String> = Vec::new();

        if let Some(category) = self.category {
            pairs.push(format!("category={category}"));
        }
        if let Some(search) = &self.search {
            pairs.push(format!("search={}", urlencoding::encode(search)));
        }
        if let Some(min_price) = self.min_price {
            pairs.push(format!("minPrice={min_price}"));
        }
        if let Some(max_price) = self.max_price {
            pairs.push(format!("maxPrice={max_price}"));
        }
        if self.sort_by != SortBy::default() {
            pairs.push(format!("sortBy={}", self.sort_by.as_str()));
        }
        if self.sort_order != SortOrder::default() {
            pairs.push(format!("sortOrder={}", self.sort_order.as_str()));
        }
        if self.page != default_page() {
            pairs.push(format!("page={}", self.page));
        }

        pairs.join("&")
    }

    /// Catalog page href for this filter state.
    #[must_use]
    pub fn href(&self) -> String {
        let query = self.to_query_string();
        if query.is_empty() {
            "/products".to_string()
        } else {
            format!("/products?{query}")
        }
    }

    /// Whether `id` is the currently selected category (template helper).
    #[must_use]
    pub fn has_category(&self, id: CategoryId) -> bool {
        self.category == Some(id)
    }

    /// Search input value for re-rendering the filter form.
    #[must_use]
    pub fn search_value(&self) -> &str {
        self.search.as_deref().unwrap_or("")
    }

    /// Min-price input value for re-rendering the filter form.
    #[must_use]
    pub fn min_price_value(&self) -> String {
        self.min_price.map(|p| p.to_string()).unwrap_or_default()
    }

    /// Max-price input value for re-rendering the filter form.
    #[must_use]
    pub fn max_price_value(&self) -> String {
        self.max_price.map(|p| p.to_string()).unwrap_or_default()
    }

    /// The same filter state on a different page.
    #[must_use]
    pub fn with_page(&self, page: u32) -> Self {
        let mut query = self.clone();
        query.page = page;
        query
    }

    /// Backend request parameters: 0-indexed `page`, `size`, combined
    /// `sort=field,dir`, and any active filters.
    #[must_use]
    pub fn backend_params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("page".to_string(), self.page.saturating_sub(1).to_string()),
            ("size".to_string(), PAGE_SIZE.to_string()),
            (
                "sort".to_string(),
                format!("{},{}", self.sort_by.as_str(), self.sort_order.as_str()),
            ),
        ];

        if let Some(category) = self.category {
            params.push(("category".to_string(), category.to_string()));
        }
        if let Some(search) = &self.search {
            params.push(("search".to_string(), search.clone()));
        }
        if let Some(min_price) = self.min_price {
            params.push(("minPrice".to_string(), min_price.to_string()));
        }
        if let Some(max_price) = self.max_price {
            params.push(("maxPrice".to_string(), max_price.to_string()));
        }

        params
    }
}

/// Page-number window for pagination buttons.
///
/// At most [`MAX_VISIBLE_PAGES`] consecutive page numbers centered on the
/// current page, clamped to `[1, total_pages]`, sliding at either edge so
/// exactly `min(5, total_pages)` entries are shown whenever possible.
#[must_use]
pub fn page_window(current_page: u32, total_pages: u32) -> Vec<u32> {
    if total_pages == 0 {
        return Vec::new();
    }

    let current = current_page.clamp(1, total_pages);
    let mut start = current.saturating_sub(MAX_VISIBLE_PAGES / 2).max(1);
    let end = (start + MAX_VISIBLE_PAGES - 1).min(total_pages);

    // Slide the window back when clamped at the upper edge
    if end - start + 1 < MAX_VISIBLE_PAGES {
        start = end.saturating_sub(MAX_VISIBLE_PAGES - 1).max(1);
    }

    (start..=end).collect()
}
