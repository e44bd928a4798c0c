//! Catalog listing and product detail handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use tower_sessions::Session;
use tracing::instrument;

use shopfusion_core::{Product, ProductId, ProductPage};

use crate::api::ApiError;
use crate::catalog::{CatalogQuery, page_window};
use crate::error::AppError;
use crate::filters;
use crate::routes::shell::Shell;
use crate::state::AppState;

/// Stock threshold below which a "Low Stock" badge is shown.
const LOW_STOCK_THRESHOLD: u32 = 10;

/// One pagination button, precomputed for the template.
pub struct PageLink {
    pub number: u32,
    pub href: String,
    pub current: bool,
}

/// Catalog listing template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductListTemplate {
    pub shell: Shell,
    pub query: CatalogQuery,
    pub page: ProductPage,
    /// Page-number window for the pagination buttons.
    pub pages: Vec<PageLink>,
    pub prev_href: Option<String>,
    pub next_href: Option<String>,
    /// Backend error for the banner-with-retry state, if any.
    pub error: Option<String>,
    pub low_stock_threshold: u32,
}

/// Product detail template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub shell: Shell,
    pub product: Option<Product>,
    pub related: Vec<Product>,
    pub error: Option<String>,
}

/// Display one page of the filtered, sorted catalog.
///
/// Every filter, sort, or page change is a fresh full-page fetch; a backend
/// failure renders the page with an error banner and a retry link instead of
/// failing the request.
#[instrument(skip(state, session))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<CatalogQuery>,
) -> impl IntoResponse {
    let shell = Shell::build(&state, &session).await;

    let (page, error) = match state.api().get_products(&query).await {
        Ok(page) => (page, None),
        Err(e) => {
            tracing::error!("Failed to fetch catalog page: {e}");
            (ProductPage::empty(), Some("Failed to load products".to_string()))
        }
    };

    let pages = page_window(query.page, page.total_pages)
        .into_iter()
        .map(|number| PageLink {
            number,
            href: query.with_page(number).href(),
            current: number == query.page,
        })
        .collect();

    let prev_href = (query.page > 1).then(|| query.with_page(query.page - 1).href());
    let next_href =
        (query.page < page.total_pages).then(|| query.with_page(query.page + 1).href());

    ProductListTemplate {
        shell,
        query,
        page,
        pages,
        prev_href,
        next_href,
        error,
        low_stock_threshold: LOW_STOCK_THRESHOLD,
    }
}

/// Display a product detail page with its related products.
///
/// The primary and related fetches run concurrently. A related failure is a
/// silent empty list; a missing product is a 404; any other primary failure
/// renders the error state.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<ProductId>,
) -> Result<ProductShowTemplate, AppError> {
    let shell = Shell::build(&state, &session).await;

    let (product, related) = tokio::join!(state.api().get_product(id), state.api().get_related(id));

    match product {
        Ok(product) => Ok(ProductShowTemplate {
            shell,
            product: Some(product),
            related,
            error: None,
        }),
        Err(ApiError::NotFound(_)) => Err(AppError::NotFound(format!("product {id}"))),
        Err(e) => {
            tracing::error!("Failed to fetch product {id}: {e}");
            Ok(ProductShowTemplate {
                shell,
                product: None,
                related: Vec::new(),
                error: Some("Failed to load product".to_string()),
            })
        }
    }
}
