//! Admin category CRUD handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use shopfusion_core::{Category, CategoryId};

use crate::error::Result;
use crate::filters;
use crate::forms::{CategoryForm, FieldError};
use crate::routes::products::DeleteForm;
use crate::state::AppState;

/// List page query: redirect flash messages.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub flash: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Category list template.
#[derive(Template, WebTemplate)]
#[template(path = "categories/index.html")]
pub struct CategoryListTemplate {
    pub categories: Vec<Category>,
    pub flash: Option<String>,
    pub error: Option<String>,
}

/// Category create/edit form template.
#[derive(Template, WebTemplate)]
#[template(path = "categories/form.html")]
pub struct CategoryFormTemplate {
    pub title: &'static str,
    pub action: String,
    pub form: CategoryForm,
    pub errors: Vec<FieldError>,
}

/// Redirect to the category list with a flash message.
fn list_redirect(param: &str, message: &str) -> Redirect {
    Redirect::to(&format!(
        "/categories?{param}={}",
        urlencoding::encode(message)
    ))
}

/// Display the (unpaginated) category list.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<CategoryListTemplate> {
    let categories = state.api().list_categories().await?;

    Ok(CategoryListTemplate {
        categories,
        flash: query.flash,
        error: query.error,
    })
}

/// Display the create-category form.
#[instrument]
pub async fn new_form() -> CategoryFormTemplate {
    CategoryFormTemplate {
        title: "New Category",
        action: "/categories".to_string(),
        form: CategoryForm::default(),
        errors: Vec::new(),
    }
}

/// Create a category.
#[instrument(skip(state, form))]
pub async fn create(
    State(state): State<AppState>,
    Form(form): Form<CategoryForm>,
) -> Result<Response> {
    let payload = match form.validate() {
        Ok(payload) => payload,
        Err(errors) => {
            return Ok(CategoryFormTemplate {
                title: "New Category",
                action: "/categories".to_string(),
                form,
                errors,
            }
            .into_response());
        }
    };

    match state.api().create_category(&payload).await {
        Ok(category) => {
            tracing::info!(category_id = %category.id, "Category created");
            Ok(list_redirect("flash", "Category created").into_response())
        }
        Err(e) => {
            tracing::error!("Failed to create category: {e}");
            Ok(list_redirect("error", "Failed to create category").into_response())
        }
    }
}

/// Display the edit-category form.
#[instrument(skip(state))]
pub async fn edit_form(
    State(state): State<AppState>,
    Path(id): Path<CategoryId>,
) -> Result<CategoryFormTemplate> {
    let category = state.api().get_category(id).await?;

    Ok(CategoryFormTemplate {
        title: "Edit Category",
        action: format!("/categories/{id}"),
        form: CategoryForm::from_category(&category),
        errors: Vec::new(),
    })
}

/// Update a category.
#[instrument(skip(state, form))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<CategoryId>,
    Form(form): Form<CategoryForm>,
) -> Result<Response> {
    let payload = match form.validate() {
        Ok(payload) => payload,
        Err(errors) => {
            return Ok(CategoryFormTemplate {
                title: "Edit Category",
                action: format!("/categories/{id}"),
                form,
                errors,
            }
            .into_response());
        }
    };

    match state.api().update_category(id, &payload).await {
        Ok(_) => Ok(list_redirect("flash", "Category updated").into_response()),
        Err(e) => {
            tracing::error!("Failed to update category {id}: {e}");
            Ok(list_redirect("error", "Failed to update category").into_response())
        }
    }
}

/// Delete a category.
///
/// A request without the confirmation field issues no DELETE and leaves the
/// list unchanged. The backend rejects deleting a category that still has
/// products; that failure surfaces as an error flash.
#[instrument(skip(state, form))]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<CategoryId>,
    Form(form): Form<DeleteForm>,
) -> Result<Redirect> {
    if !form.confirmed {
        return Ok(Redirect::to("/categories"));
    }

    match state.api().delete_category(id).await {
        Ok(()) => Ok(list_redirect("flash", "Category deleted")),
        Err(e) => {
            tracing::error!("Failed to delete category {id}: {e}");
            Ok(list_redirect("error", "Failed to delete category"))
        }
    }
}
