//! Admin product CRUD handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use shopfusion_core::{Category, ProductId, ProductPage};

use crate::api::ADMIN_PAGE_SIZE;
use crate::error::Result;
use crate::filters;
use crate::forms::{FieldError, ProductForm};
use crate::state::AppState;

/// List page query: 1-indexed page plus redirect flash messages.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub flash: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Delete form data. Without the confirmation field no DELETE is issued.
#[derive(Debug, Deserialize)]
pub struct DeleteForm {
    #[serde(default)]
    pub confirmed: bool,
}

/// Product list template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductListTemplate {
    pub page: ProductPage,
    pub current_page: u32,
    pub page_size: u32,
    pub flash: Option<String>,
    pub error: Option<String>,
}

/// Product create/edit form template.
#[derive(Template, WebTemplate)]
#[template(path = "products/form.html")]
pub struct ProductFormTemplate {
    pub title: &'static str,
    pub action: String,
    pub form: ProductForm,
    pub errors: Vec<FieldError>,
    pub categories: Vec<Category>,
}

/// Redirect to the product list with a flash message.
fn list_redirect(param: &str, message: &str) -> Redirect {
    Redirect::to(&format!("/products?{param}={}", urlencoding::encode(message)))
}

/// Display the paginated product list.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<ProductListTemplate> {
    let current_page = query.page.unwrap_or(1).max(1);
    let page = state.api().list_products(current_page).await?;

    Ok(ProductListTemplate {
        page,
        current_page,
        page_size: ADMIN_PAGE_SIZE,
        flash: query.flash,
        error: query.error,
    })
}

/// Display the create-product form.
#[instrument(skip(state))]
pub async fn new_form(State(state): State<AppState>) -> Result<ProductFormTemplate> {
    let categories = state.api().list_categories().await?;

    Ok(ProductFormTemplate {
        title: "New Product",
        action: "/products".to_string(),
        form: ProductForm::default(),
        errors: Vec::new(),
        categories,
    })
}

/// Create a product.
///
/// Validation failures re-render the form with field errors and issue no
/// backend request.
#[instrument(skip(state, form))]
pub async fn create(
    State(state): State<AppState>,
    Form(form): Form<ProductForm>,
) -> Result<Response> {
    let payload = match form.validate() {
        Ok(payload) => payload,
        Err(errors) => {
            let categories = state.api().list_categories().await?;
            return Ok(ProductFormTemplate {
                title: "New Product",
                action: "/products".to_string(),
                form,
                errors,
                categories,
            }
            .into_response());
        }
    };

    match state.api().create_product(&payload).await {
        Ok(product) => {
            tracing::info!(product_id = %product.id, "Product created");
            Ok(list_redirect("flash", "Product created").into_response())
        }
        Err(e) => {
            tracing::error!("Failed to create product: {e}");
            Ok(list_redirect("error", "Failed to create product").into_response())
        }
    }
}

/// Display the edit-product form.
#[instrument(skip(state))]
pub async fn edit_form(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<ProductFormTemplate> {
    let product = state.api().get_product(id).await?;
    let categories = state.api().list_categories().await?;

    Ok(ProductFormTemplate {
        title: "Edit Product",
        action: format!("/products/{id}"),
        form: ProductForm::from_product(&product),
        errors: Vec::new(),
        categories,
    })
}

/// Update a product.
#[instrument(skip(state, form))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Form(form): Form<ProductForm>,
) -> Result<Response> {
    let payload = match form.validate() {
        Ok(payload) => payload,
        Err(errors) => {
            let categories = state.api().list_categories().await?;
            return Ok(ProductFormTemplate {
                title: "Edit Product",
                action: format!("/products/{id}"),
                form,
                errors,
                categories,
            }
            .into_response());
        }
    };

    match state.api().update_product(id, &payload).await {
        Ok(_) => Ok(list_redirect("flash", "Product updated").into_response()),
        Err(e) => {
            tracing::error!("Failed to update product {id}: {e}");
            Ok(list_redirect("error", "Failed to update product").into_response())
        }
    }
}

/// Delete a product.
///
/// A request without the confirmation field issues no DELETE and leaves the
/// list unchanged.
#[instrument(skip(state, form))]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Form(form): Form<DeleteForm>,
) -> Result<Redirect> {
    if !form.confirmed {
        return Ok(Redirect::to("/products"));
    }

    match state.api().delete_product(id).await {
        Ok(()) => Ok(list_redirect("flash", "Product deleted")),
        Err(e) => {
            tracing::error!("Failed to delete product {id}: {e}");
            Ok(list_redirect("error", "Failed to delete product"))
        }
    }
}
