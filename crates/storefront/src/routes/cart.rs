//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! The backend owns the cart; the session holds the cart key and a snapshot
//! that is replaced wholesale after every mutation. Mutations on the same
//! item are sequenced so a stale response never overwrites a newer snapshot.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{AppendHeaders, IntoResponse, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;
use uuid::Uuid;

use shopfusion_core::{Cart, CartItemId, ProductId, Totals};

use crate::cart_session::{CartSession, SESSION_KEY, SHARED_SENTINEL_CART_ID, clamp_quantity};
use crate::config::CartIdentityMode;
use crate::error::{AppError, Result};
use crate::filters::{self, format_price};
use crate::routes::checkout::CheckoutModal;
use crate::routes::shell::Shell;
use crate::state::AppState;

// =============================================================================
// Display Data
// =============================================================================

/// Cart line display data for templates.
pub struct CartItemView {
    pub id: CartItemId,
    pub product_id: ProductId,
    pub name: String,
    pub image: String,
    pub price: String,
    pub quantity: u32,
    pub stock: u32,
    pub line_total: String,
    /// Quantity exceeds available stock ("Only N available" notice).
    pub over_stock: bool,
}

/// Cart display data for templates.
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub item_count: u32,
    pub subtotal: String,
    pub tax: String,
    pub grand_total: String,
    pub is_empty: bool,
}

impl CartView {
    /// Create an empty cart view.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            item_count: 0,
            subtotal: "$0.00".to_string(),
            tax: "$0.00".to_string(),
            grand_total: "$0.00".to_string(),
            is_empty: true,
        }
    }
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        let totals = Totals::from(cart);

        Self {
            items: cart
                .items
                .iter()
                .map(|item| CartItemView {
                    id: item.id,
                    product_id: item.product.id,
                    name: item.product.name.clone(),
                    image: item.product.image.clone(),
                    price: format_price(item.product.price),
                    quantity: item.quantity,
                    stock: item.product.stock,
                    line_total: format_price(item.line_total()),
                    over_stock: item.quantity > item.product.stock,
                })
                .collect(),
            item_count: cart.item_count,
            subtotal: format_price(totals.subtotal),
            tax: format_price(totals.tax),
            grand_total: format_price(totals.grand_total),
            is_empty: cart.is_empty(),
        }
    }
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Load the cart view-model from the session, creating one on first use.
///
/// The cart key for a fresh session depends on the configured identity mode:
/// a new UUID per session, or the shared legacy sentinel.
pub async fn load_cart_session(session: &Session, state: &AppState) -> Result<CartSession> {
    if let Some(cart_session) = session.get::<CartSession>(SESSION_KEY).await? {
        return Ok(cart_session);
    }

    let cart_id = match state.config().cart_identity {
        CartIdentityMode::PerSession => Uuid::new_v4().to_string(),
        CartIdentityMode::SharedSentinel => SHARED_SENTINEL_CART_ID.to_string(),
    };
    tracing::debug!(%cart_id, "Issuing new cart key for session");

    let cart_session = CartSession::new(cart_id);
    session.insert(SESSION_KEY, &cart_session).await?;
    Ok(cart_session)
}

/// Persist the cart view-model back to the session.
pub async fn save_cart_session(session: &Session, cart_session: &CartSession) -> Result<()> {
    session.insert(SESSION_KEY, cart_session).await?;
    Ok(())
}

// =============================================================================
// Forms
// =============================================================================

/// Add to cart form data (product detail page).
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: ProductId,
    pub quantity: Option<i64>,
}

/// Update cart item quantity form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub item_id: CartItemId,
    pub quantity: i64,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub item_id: CartItemId,
}

/// Clear cart form data. The confirmation field is set by the confirm
/// dialog; clearing without it is a no-op.
#[derive(Debug, Deserialize)]
pub struct ClearCartForm {
    #[serde(default)]
    pub confirmed: bool,
}

// =============================================================================
// Templates
// =============================================================================

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub shell: Shell,
    pub cart: CartView,
    pub checkout: CheckoutModal,
    pub error: Option<String>,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
    pub error: Option<String>,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

fn items_fragment(cart_session: &CartSession, error: Option<String>) -> CartItemsTemplate {
    CartItemsTemplate {
        cart: cart_session
            .snapshot()
            .map_or_else(CartView::empty, CartView::from),
        error,
    }
}

fn updated(fragment: CartItemsTemplate) -> Response {
    (AppendHeaders([("HX-Trigger", "cart-updated")]), fragment).into_response()
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the cart page.
///
/// Always refetches the server-side cart; a fetch failure renders the page
/// with an error banner over the last known snapshot.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<CartShowTemplate> {
    let shell = Shell::build(&state, &session).await;
    let mut cart_session = load_cart_session(&session, &state).await?;

    let error = match state.api().get_cart(&cart_session.cart_id).await {
        Ok(cart) => {
            cart_session.replace(cart);
            save_cart_session(&session, &cart_session).await?;
            None
        }
        Err(e) => {
            tracing::error!("Failed to fetch cart: {e}");
            Some("Failed to load cart".to_string())
        }
    };

    let cart = cart_session
        .snapshot()
        .map_or_else(CartView::empty, CartView::from);

    Ok(CartShowTemplate {
        shell,
        cart,
        checkout: CheckoutModal::view(&state, &cart_session.cart_id),
        error,
    })
}

/// Cart items fragment (HTMX), refetched after checkout auto-close.
#[instrument(skip(state, session))]
pub async fn items(State(state): State<AppState>, session: Session) -> Result<CartItemsTemplate> {
    let mut cart_session = load_cart_session(&session, &state).await?;

    let error = match state.api().get_cart(&cart_session.cart_id).await {
        Ok(cart) => {
            cart_session.replace(cart);
            save_cart_session(&session, &cart_session).await?;
            None
        }
        Err(e) => {
            tracing::error!("Failed to fetch cart: {e}");
            Some("Failed to load cart".to_string())
        }
    };

    Ok(items_fragment(&cart_session, error))
}

/// Add an item to the cart (HTMX, from the product detail page).
///
/// The detail-page quantity selector only enforces a minimum of 1; stock
/// clamping happens on the cart page where the line's stock is visible.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let mut cart_session = load_cart_session(&session, &state).await?;
    let quantity = u32::try_from(form.quantity.unwrap_or(1).max(1)).unwrap_or(1);

    match state
        .api()
        .add_item(&cart_session.cart_id, form.product_id, quantity)
        .await
    {
        Ok(cart) => {
            let count = cart.item_count;
            cart_session.replace(cart);
            save_cart_session(&session, &cart_session).await?;

            Ok((
                AppendHeaders([("HX-Trigger", "cart-updated")]),
                CartCountTemplate { count },
            )
                .into_response())
        }
        Err(e) => {
            tracing::error!("Failed to add item to cart: {e}");
            Err(AppError::Api(e))
        }
    }
}

/// Set a cart line's quantity (HTMX).
///
/// The requested quantity is clamped into `[1, stock]` before any request is
/// issued. The response is applied only if it is the latest in-flight
/// mutation for that line.
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<UpdateCartForm>,
) -> Result<Response> {
    let mut cart_session = load_cart_session(&session, &state).await?;

    let stock = cart_session
        .snapshot()
        .and_then(|cart| cart.items.iter().find(|item| item.id == form.item_id))
        .map(|item| item.product.stock)
        .ok_or_else(|| AppError::BadRequest("unknown cart item".to_string()))?;

    let quantity = clamp_quantity(form.quantity, stock);
    let seq = cart_session.issue(form.item_id);
    save_cart_session(&session, &cart_session).await?;

    match state
        .api()
        .update_item(&cart_session.cart_id, form.item_id, quantity)
        .await
    {
        Ok(cart) => {
            // Reload: a concurrent mutation may have advanced the session
            let mut cart_session = load_cart_session(&session, &state).await?;
            if cart_session.apply(form.item_id, seq, cart) {
                save_cart_session(&session, &cart_session).await?;
            }
            Ok(updated(items_fragment(&cart_session, None)))
        }
        Err(e) => {
            tracing::error!("Failed to update cart item: {e}");
            Ok(items_fragment(
                &cart_session,
                Some("Failed to update quantity".to_string()),
            )
            .into_response())
        }
    }
}

/// Remove a line from the cart (HTMX).
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Response> {
    let mut cart_session = load_cart_session(&session, &state).await?;
    let seq = cart_session.issue(form.item_id);
    save_cart_session(&session, &cart_session).await?;

    match state
        .api()
        .remove_item(&cart_session.cart_id, form.item_id)
        .await
    {
        Ok(cart) => {
            let mut cart_session = load_cart_session(&session, &state).await?;
            if cart_session.apply(form.item_id, seq, cart) {
                save_cart_session(&session, &cart_session).await?;
            }
            Ok(updated(items_fragment(&cart_session, None)))
        }
        Err(e) => {
            tracing::error!("Failed to remove cart item: {e}");
            Ok(items_fragment(
                &cart_session,
                Some("Failed to remove item".to_string()),
            )
            .into_response())
        }
    }
}

/// Clear the cart (HTMX).
///
/// Requires the confirmation field; a declined confirmation or an already
/// empty cart issues no request and leaves the snapshot unchanged.
#[instrument(skip(state, session))]
pub async fn clear(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<ClearCartForm>,
) -> Result<Response> {
    let mut cart_session = load_cart_session(&session, &state).await?;

    let has_items = cart_session.snapshot().is_some_and(|cart| !cart.is_empty());
    if !form.confirmed || !has_items {
        return Ok(items_fragment(&cart_session, None).into_response());
    }

    match state.api().clear_cart(&cart_session.cart_id).await {
        Ok(cart) => {
            cart_session.replace(cart);
            save_cart_session(&session, &cart_session).await?;
            Ok(updated(items_fragment(&cart_session, None)))
        }
        Err(e) => {
            tracing::error!("Failed to clear cart: {e}");
            Ok(items_fragment(
                &cart_session,
                Some("Failed to clear cart".to_string()),
            )
            .into_response())
        }
    }
}

/// Cart count badge fragment (HTMX).
#[instrument(skip(state, session))]
pub async fn count(State(state): State<AppState>, session: Session) -> Result<CartCountTemplate> {
    let cart_session = load_cart_session(&session, &state).await?;

    let count = match cart_session.snapshot() {
        Some(cart) => cart.item_count,
        None => state
            .api()
            .get_cart(&cart_session.cart_id)
            .await
            .map(|cart| cart.item_count)
            .unwrap_or(0),
    };

    Ok(CartCountTemplate { count })
}
