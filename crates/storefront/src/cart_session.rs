//! Per-session cart view-model.
//!
//! The cart is server-owned; this is the transient read-through cache the
//! session holds between renders, invalidated and replaced wholesale after
//! every mutation. No optimistic merge, no partial patching.
//!
//! Concurrent edits to different items are allowed simultaneously. For edits
//! to the *same* item, each mutation is issued a monotonic per-item sequence
//! number and a response is applied only if it carries the latest sequence
//! number issued for that item - stale responses are discarded instead of
//! overwriting newer state.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use shopfusion_core::{Cart, CartItemId};

/// Session key under which the cart view-model is stored.
pub const SESSION_KEY: &str = "cart_session";

/// Legacy sentinel cart id shared by anonymous sessions when
/// `CartIdentityMode::SharedSentinel` is configured.
pub const SHARED_SENTINEL_CART_ID: &str = "default-cart";

/// Clamp a requested quantity into `[1, stock]` before issuing an update.
///
/// A zero-stock product clamps to 1; the backend rejects the update and the
/// error surfaces through the normal mutation path.
#[must_use]
pub fn clamp_quantity(requested: i64, stock: u32) -> u32 {
    let upper = i64::from(stock.max(1));
    u32::try_from(requested.clamp(1, upper)).unwrap_or(1)
}

/// Per-item request sequencing state.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
struct ItemSeq {
    /// Latest sequence number issued for this item.
    issued: u64,
    /// Sequence number of the last applied response.
    applied: u64,
}

/// The session-owned cart view-model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartSession {
    /// Opaque backend cart key for this session.
    pub cart_id: String,
    snapshot: Option<Cart>,
    seqs: HashMap<CartItemId, ItemSeq>,
}

impl CartSession {
    /// Create a view-model bound to a cart key.
    #[must_use]
    pub fn new(cart_id: String) -> Self {
        Self {
            cart_id,
            snapshot: None,
            seqs: HashMap::new(),
        }
    }

    /// The last applied server snapshot, if any.
    #[must_use]
    pub const fn snapshot(&self) -> Option<&Cart> {
        self.snapshot.as_ref()
    }

    /// Replace the snapshot wholesale, outside any per-item race (fetch,
    /// add-to-cart, clear).
    pub fn replace(&mut self, cart: Cart) {
        self.snapshot = Some(cart);
    }

    /// Issue the next sequence number for a mutation on `item_id`.
    pub fn issue(&mut self, item_id: CartItemId) -> u64 {
        let seq = self.seqs.entry(item_id).or_default();
        seq.issued += 1;
        seq.issued
    }

    /// Apply a mutation response for `item_id` carrying sequence number
    /// `seq`. Returns `false` (discarding the response) unless `seq` is the
    /// latest issued for that item.
    pub fn apply(&mut self, item_id: CartItemId, seq: u64, cart: Cart) -> bool {
        let entry = self.seqs.entry(item_id).or_default();
        if seq != entry.issued || seq <= entry.applied {
            tracing::debug!(%item_id, seq, issued = entry.issued, "Discarding stale cart response");
            return false;
        }

        entry.applied = seq;
        self.snapshot = Some(cart);
        true
    }
}
