//! Shared page chrome data: nav categories and the cart count badge.

use tower_sessions::Session;

use shopfusion_core::Category;

use crate::cart_session::{CartSession, SESSION_KEY};
use crate::state::AppState;

/// Data every full page needs for the global chrome.
pub struct Shell {
    pub categories: Vec<Category>,
    pub cart_count: u32,
}

impl Shell {
    /// Build the shell for a request.
    ///
    /// Nav categories degrade silently to an empty dropdown on fetch failure.
    /// The cart count comes from the session snapshot when present; the badge
    /// refreshes itself over HTMX after mutations.
    pub async fn build(state: &AppState, session: &Session) -> Self {
        let categories = state.api().nav_categories().await;

        let cart_count = session
            .get::<CartSession>(SESSION_KEY)
            .await
            .ok()
            .flatten()
            .and_then(|cs| cs.snapshot().map(|cart| cart.item_count))
            .unwrap_or(0);

        Self {
            categories,
            cart_count,
        }
    }
}
