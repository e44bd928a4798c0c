//! Simulated checkout handlers and timer drivers.
//!
//! The state machine itself lives in [`crate::checkout`]; these handlers
//! start it, render its current state as an HTMX fragment, and own the tokio
//! timer tasks that drive scheduled transitions. Every driver task carries
//! the epoch it was scheduled under and the machine discards it if the epoch
//! has moved on.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    response::{AppendHeaders, IntoResponse, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use shopfusion_core::Totals;

use crate::checkout::{
    COUNTDOWN_TICK, CheckoutState, PROCESSING_DELAY, PaymentOutcome, Resolution, Tick,
};
use crate::error::Result;
use crate::filters::format_price;
use crate::routes::cart::{load_cart_session, save_cart_session};
use crate::state::AppState;

/// Checkout modal display data.
///
/// Flattened from [`CheckoutState`] so the template switches on a phase
/// string instead of destructuring enum variants.
pub struct CheckoutModal {
    pub phase: &'static str,
    pub order_number: String,
    pub countdown: u8,
    pub grand_total: String,
}

impl CheckoutModal {
    /// Render-ready view of the current machine state for a cart.
    #[must_use]
    pub fn view(state: &AppState, cart_id: &str) -> Self {
        let (checkout_state, grand_total) = state.checkout().view(cart_id);

        match checkout_state {
            CheckoutState::Idle => Self {
                phase: "idle",
                order_number: String::new(),
                countdown: 0,
                grand_total,
            },
            CheckoutState::Processing => Self {
                phase: "processing",
                order_number: String::new(),
                countdown: 0,
                grand_total,
            },
            CheckoutState::Success {
                order_number,
                countdown,
            } => Self {
                phase: "success",
                order_number,
                countdown,
                grand_total,
            },
            CheckoutState::Failed => Self {
                phase: "failed",
                order_number: String::new(),
                countdown: 0,
                grand_total,
            },
        }
    }
}

/// Checkout modal fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/checkout_modal.html")]
pub struct CheckoutModalTemplate {
    pub checkout: CheckoutModal,
}

fn modal(state: &AppState, cart_id: &str) -> CheckoutModalTemplate {
    CheckoutModalTemplate {
        checkout: CheckoutModal::view(state, cart_id),
    }
}

/// Start the checkout simulation (HTMX).
///
/// An empty or missing cart is a no-op: the machine stays idle and the
/// fragment renders nothing.
#[instrument(skip(state, session))]
pub async fn start(State(state): State<AppState>, session: Session) -> Result<Response> {
    let mut cart_session = load_cart_session(&session, &state).await?;

    // Refetch so the empty-cart guard and the captured total see the truth
    let cart = state.api().get_cart(&cart_session.cart_id).await?;
    cart_session.replace(cart.clone());
    save_cart_session(&session, &cart_session).await?;

    let grand_total = format_price(Totals::from(&cart).grand_total);

    if let Some(epoch) = state.checkout().begin(&cart_session.cart_id, &cart, grand_total) {
        spawn_resolution(state.clone(), cart_session.cart_id.clone(), epoch);
    }

    Ok(modal(&state, &cart_session.cart_id).into_response())
}

/// Current checkout modal fragment (HTMX polling).
///
/// While the modal is active the fragment re-polls itself; once the machine
/// returns to idle the response triggers a cart refresh so an auto-closed
/// successful order shows its cleared cart.
#[instrument(skip(state, session))]
pub async fn status(State(state): State<AppState>, session: Session) -> Result<Response> {
    let cart_session = load_cart_session(&session, &state).await?;
    let fragment = modal(&state, &cart_session.cart_id);

    if fragment.checkout.phase == "idle" {
        return Ok((AppendHeaders([("HX-Trigger", "cart-updated")]), fragment).into_response());
    }

    Ok(fragment.into_response())
}

/// Retry a failed checkout (HTMX).
#[instrument(skip(state, session))]
pub async fn retry(State(state): State<AppState>, session: Session) -> Result<Response> {
    let cart_session = load_cart_session(&session, &state).await?;

    if let Some(epoch) = state.checkout().retry(&cart_session.cart_id) {
        spawn_resolution(state.clone(), cart_session.cart_id.clone(), epoch);
    }

    Ok(modal(&state, &cart_session.cart_id).into_response())
}

/// Close the checkout modal manually (HTMX).
///
/// Never clears the cart; only the completed success countdown does that.
#[instrument(skip(state, session))]
pub async fn close(State(state): State<AppState>, session: Session) -> Result<Response> {
    let cart_session = load_cart_session(&session, &state).await?;

    state.checkout().close(&cart_session.cart_id);

    Ok(modal(&state, &cart_session.cart_id).into_response())
}

/// Schedule the processing resolution for a checkout run.
///
/// After the fixed delay the payment outcome is drawn and applied; an
/// approved outcome chains into the countdown driver. A stale epoch means
/// the run was superseded and the task simply ends.
fn spawn_resolution(state: AppState, cart_id: String, epoch: u64) {
    tokio::spawn(async move {
        tokio::time::sleep(PROCESSING_DELAY).await;

        match state.checkout().resolve(&cart_id, epoch, PaymentOutcome::draw()) {
            Resolution::Approved => drive_countdown(state, cart_id, epoch).await,
            Resolution::Declined => {
                tracing::info!(%cart_id, "Simulated payment declined");
            }
            Resolution::Stale => {
                tracing::debug!(%cart_id, epoch, "Discarding stale checkout resolution");
            }
        }
    });
}

/// Drive the success countdown to completion.
///
/// The completed countdown is the one path that clears the cart.
async fn drive_countdown(state: AppState, cart_id: String, epoch: u64) {
    loop {
        tokio::time::sleep(COUNTDOWN_TICK).await;

        match state.checkout().tick(&cart_id, epoch) {
            Tick::Continue(_) => {}
            Tick::CompleteAndClearCart => {
                if let Err(e) = state.api().clear_cart(&cart_id).await {
                    tracing::error!("Failed to clear cart {cart_id} after checkout: {e}");
                }
                break;
            }
            Tick::Stale => {
                tracing::debug!(%cart_id, epoch, "Discarding stale countdown tick");
                break;
            }
        }
    }
}
