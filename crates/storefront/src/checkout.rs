//! Client-only checkout simulation.
//!
//! No network call represents a real payment: after a fixed processing delay
//! the outcome is a 0.9/0.1 success/failure draw, and a successful order only
//! fabricates a display-only order number before clearing the cart.
//!
//! The flow is an explicit state machine value owned per cart. Every
//! scheduled transition (the processing delay, each countdown tick) carries
//! the epoch current at scheduling time; any user action bumps the epoch, so
//! a stale timer callback is discarded instead of mutating torn-down state.
//!
//! One asymmetry is load-bearing: the cart is cleared only when the success
//! countdown runs to zero. Closing the success modal manually leaves the cart
//! untouched.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rand::Rng;

use shopfusion_core::Cart;

/// Fixed processing delay before the payment outcome is drawn.
pub const PROCESSING_DELAY: Duration = Duration::from_millis(2000);

/// Interval between success countdown ticks.
pub const COUNTDOWN_TICK: Duration = Duration::from_secs(1);

/// Success countdown start value.
pub const COUNTDOWN_START: u8 = 5;

/// Probability that the simulated payment succeeds.
const SUCCESS_PROBABILITY: f64 = 0.9;

/// Simulated payment outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentOutcome {
    Approved,
    Declined,
}

impl PaymentOutcome {
    /// Draw an outcome: approved with probability 0.9. Unseeded and
    /// non-deterministic; a placeholder for a real payment integration.
    #[must_use]
    pub fn draw() -> Self {
        if rand::rng().random_bool(SUCCESS_PROBABILITY) {
            Self::Approved
        } else {
            Self::Declined
        }
    }
}

/// Checkout modal state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CheckoutState {
    /// Modal closed.
    #[default]
    Idle,
    /// Payment simulation in flight.
    Processing,
    /// Payment approved; auto-close countdown running.
    Success {
        order_number: String,
        countdown: u8,
    },
    /// Payment declined. Terminal until the user retries or closes.
    Failed,
}

/// Result of applying a scheduled resolve transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Entered `Success`; the countdown chain should be scheduled.
    Approved,
    /// Entered `Failed`; nothing further is scheduled.
    Declined,
    /// The epoch was stale or the state had moved on; discarded.
    Stale,
}

/// Result of applying a scheduled countdown tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Countdown still running; the next tick should be scheduled.
    Continue(u8),
    /// Countdown reached zero: the modal auto-closed and the caller must
    /// clear the cart as the order side effect.
    CompleteAndClearCart,
    /// The epoch was stale or the state had moved on; discarded.
    Stale,
}

#[derive(Debug, Default)]
struct Slot {
    state: CheckoutState,
    /// Bumped on every user action; scheduled transitions apply only while
    /// their epoch is current.
    epoch: u64,
    /// Display-only grand total captured when checkout began.
    grand_total: String,
}

/// Registry of per-cart checkout machines.
///
/// Keyed by the session's cart id. All transitions are applied under one
/// lock; timer tasks re-validate their epoch at apply time.
#[derive(Clone, Default)]
pub struct CheckoutSessions {
    inner: Arc<Mutex<HashMap<String, Slot>>>,
}

impl CheckoutSessions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Slot>> {
        // Lock poisoning only happens if a holder panicked; the map contents
        // are still coherent state machine values.
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Begin checkout for a cart. Entry guard: a missing or empty cart is a
    /// no-op and returns `None`. Otherwise the machine enters `Processing`
    /// and the caller schedules the resolve with the returned epoch.
    pub fn begin(&self, cart_id: &str, cart: &Cart, grand_total: String) -> Option<u64> {
        if cart.is_empty() {
            return None;
        }

        let mut slots = self.lock();
        let slot = slots.entry(cart_id.to_string()).or_default();
        slot.epoch += 1;
        slot.state = CheckoutState::Processing;
        slot.grand_total = grand_total;
        Some(slot.epoch)
    }

    /// Apply the scheduled processing resolution.
    pub fn resolve(&self, cart_id: &str, epoch: u64, outcome: PaymentOutcome) -> Resolution {
        let mut slots = self.lock();
        let Some(slot) = slots.get_mut(cart_id) else {
            return Resolution::Stale;
        };
        if slot.epoch != epoch || slot.state != CheckoutState::Processing {
            return Resolution::Stale;
        }

        match outcome {
            PaymentOutcome::Approved => {
                slot.state = CheckoutState::Success {
                    order_number: fabricate_order_number(),
                    countdown: COUNTDOWN_START,
                };
                Resolution::Approved
            }
            PaymentOutcome::Declined => {
                slot.state = CheckoutState::Failed;
                Resolution::Declined
            }
        }
    }

    /// Apply one scheduled countdown tick.
    pub fn tick(&self, cart_id: &str, epoch: u64) -> Tick {
        let mut slots = self.lock();
        let Some(slot) = slots.get_mut(cart_id) else {
            return Tick::Stale;
        };
        if slot.epoch != epoch {
            return Tick::Stale;
        }
        let CheckoutState::Success { countdown, .. } = &mut slot.state else {
            return Tick::Stale;
        };

        *countdown = countdown.saturating_sub(1);
        if *countdown == 0 {
            // Auto-close: the one path that clears the cart
            slot.state = CheckoutState::Idle;
            slot.epoch += 1;
            Tick::CompleteAndClearCart
        } else {
            Tick::Continue(*countdown)
        }
    }

    /// Re-enter `Processing` from `Failed` ("Try Again"). Returns the new
    /// epoch for the rescheduled resolve, or `None` if not in `Failed`.
    pub fn retry(&self, cart_id: &str) -> Option<u64> {
        let mut slots = self.lock();
        let slot = slots.get_mut(cart_id)?;
        if slot.state != CheckoutState::Failed {
            return None;
        }

        slot.epoch += 1;
        slot.state = CheckoutState::Processing;
        Some(slot.epoch)
    }

    /// Close the modal manually. Never clears the cart, and invalidates any
    /// scheduled transition.
    pub fn close(&self, cart_id: &str) {
        let mut slots = self.lock();
        if let Some(slot) = slots.get_mut(cart_id) {
            slot.epoch += 1;
            slot.state = CheckoutState::Idle;
        }
    }

    /// Current state and captured grand total for rendering the modal.
    #[must_use]
    pub fn view(&self, cart_id: &str) -> (CheckoutState, String) {
        let slots = self.lock();
        slots.get(cart_id).map_or_else(
            || (CheckoutState::Idle, String::new()),
            |slot| (slot.state.clone(), slot.grand_total.clone()),
        )
    }
}

/// Display-only fabricated order number: `ORD-` plus the last six digits of
/// the current millisecond timestamp. No order record is persisted.
fn fabricate_order_number() -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    format!("ORD-{:06}", millis.rem_euclid(1_000_000))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cart_with_items() -> Cart {
        serde_json::from_str(
            r#"{
                "id": "c1",
                "items": [{
                    "id": 1,
                    "product": {"id": 1, "name": "Mug", "price": 19.99, "categoryId": 1, "stock": 5},
                    "quantity": 2
                }],
                "itemCount": 2,
                "total": 39.98
            }"#,
        )
        .expect("valid cart json")
    }

    fn empty_cart() -> Cart {
        Cart {
            id: "c1".to_string(),
            items: Vec::new(),
            item_count: 0,
            total: rust_decimal::Decimal::ZERO,
        }
    }

    #[test]
    fn test_begin_guards_empty_cart() {
        let sessions = CheckoutSessions::new();
        assert!(sessions.begin("c1", &empty_cart(), String::new()).is_none());
        assert_eq!(sessions.view("c1").0, CheckoutState::Idle);
    }

    #[test]
    fn test_processing_resolves_to_success() {
        let sessions = CheckoutSessions::new();
        let epoch = sessions
            .begin("c1", &cart_with_items(), "$43.18".to_string())
            .unwrap();
        assert_eq!(sessions.view("c1").0, CheckoutState::Processing);

        assert_eq!(
            sessions.resolve("c1", epoch, PaymentOutcome::Approved),
            Resolution::Approved
        );

        let (state, grand_total) = sessions.view("c1");
        assert_eq!(grand_total, "$43.18");
        match state {
            CheckoutState::Success {
                order_number,
                countdown,
            } => {
                assert!(order_number.starts_with("ORD-"));
                assert_eq!(order_number.len(), 10);
                assert_eq!(countdown, COUNTDOWN_START);
            }
            other => panic!("expected Success, got {other:?}"),
        }
    }

    #[test]
    fn test_processing_resolves_to_failed() {
        let sessions = CheckoutSessions::new();
        let epoch = sessions
            .begin("c1", &cart_with_items(), String::new())
            .unwrap();

        assert_eq!(
            sessions.resolve("c1", epoch, PaymentOutcome::Declined),
            Resolution::Declined
        );
        assert_eq!(sessions.view("c1").0, CheckoutState::Failed);
    }

    #[test]
    fn test_failed_never_auto_transitions() {
        let sessions = CheckoutSessions::new();
        let epoch = sessions
            .begin("c1", &cart_with_items(), String::new())
            .unwrap();
        sessions.resolve("c1", epoch, PaymentOutcome::Declined);

        // A tick scheduled against a Failed machine is discarded
        assert_eq!(sessions.tick("c1", epoch), Tick::Stale);
        assert_eq!(sessions.view("c1").0, CheckoutState::Failed);
    }

    #[test]
    fn test_countdown_completes_and_clears_cart() {
        let sessions = CheckoutSessions::new();
        let epoch = sessions
            .begin("c1", &cart_with_items(), String::new())
            .unwrap();
        sessions.resolve("c1", epoch, PaymentOutcome::Approved);

        assert_eq!(sessions.tick("c1", epoch), Tick::Continue(4));
        assert_eq!(sessions.tick("c1", epoch), Tick::Continue(3));
        assert_eq!(sessions.tick("c1", epoch), Tick::Continue(2));
        assert_eq!(sessions.tick("c1", epoch), Tick::Continue(1));
        assert_eq!(sessions.tick("c1", epoch), Tick::CompleteAndClearCart);

        // Auto-closed; a further stale tick does nothing
        assert_eq!(sessions.view("c1").0, CheckoutState::Idle);
        assert_eq!(sessions.tick("c1", epoch), Tick::Stale);
    }

    #[test]
    fn test_manual_close_never_clears_cart() {
        let sessions = CheckoutSessions::new();
        let epoch = sessions
            .begin("c1", &cart_with_items(), String::new())
            .unwrap();
        sessions.resolve("c1", epoch, PaymentOutcome::Approved);
        sessions.tick("c1", epoch);

        // User closes mid-countdown: pending ticks are invalidated and no
        // CompleteAndClearCart is ever produced for this run
        sessions.close("c1");
        assert_eq!(sessions.view("c1").0, CheckoutState::Idle);
        assert_eq!(sessions.tick("c1", epoch), Tick::Stale);
    }

    #[test]
    fn test_stale_resolve_discarded_after_close() {
        let sessions = CheckoutSessions::new();
        let epoch = sessions
            .begin("c1", &cart_with_items(), String::new())
            .unwrap();

        // Modal closed before the 2s delay fires
        sessions.close("c1");
        assert_eq!(
            sessions.resolve("c1", epoch, PaymentOutcome::Approved),
            Resolution::Stale
        );
        assert_eq!(sessions.view("c1").0, CheckoutState::Idle);
    }

    #[test]
    fn test_retry_reenters_processing() {
        let sessions = CheckoutSessions::new();
        let epoch = sessions
            .begin("c1", &cart_with_items(), String::new())
            .unwrap();
        sessions.resolve("c1", epoch, PaymentOutcome::Declined);

        let retry_epoch = sessions.retry("c1").unwrap();
        assert_eq!(sessions.view("c1").0, CheckoutState::Processing);
        assert!(retry_epoch > epoch);

        // The original epoch can no longer resolve anything
        assert_eq!(
            sessions.resolve("c1", epoch, PaymentOutcome::Approved),
            Resolution::Stale
        );
        // The retry epoch can
        assert_eq!(
            sessions.resolve("c1", retry_epoch, PaymentOutcome::Approved),
            Resolution::Approved
        );
    }

    #[test]
    fn test_retry_only_from_failed() {
        let sessions = CheckoutSessions::new();
        assert!(sessions.retry("c1").is_none());

        let epoch = sessions
            .begin("c1", &cart_with_items(), String::new())
            .unwrap();
        assert!(sessions.retry("c1").is_none());

        sessions.resolve("c1", epoch, PaymentOutcome::Approved);
        assert!(sessions.retry("c1").is_none());
    }

    #[test]
    fn test_begin_while_processing_invalidates_previous_run() {
        let sessions = CheckoutSessions::new();
        let first = sessions
            .begin("c1", &cart_with_items(), String::new())
            .unwrap();
        let second = sessions
            .begin("c1", &cart_with_items(), String::new())
            .unwrap();

        assert_eq!(
            sessions.resolve("c1", first, PaymentOutcome::Declined),
            Resolution::Stale
        );
        assert_eq!(
            sessions.resolve("c1", second, PaymentOutcome::Approved),
            Resolution::Approved
        );
    }
}
