//! Session-owned cart store.

use crate::cart::{CartAction, CartState};
use crate::catalog::ProductSnapshot;
use crate::ids::ProductId;
use std::fmt;

type Subscriber = Box<dyn FnMut(&CartState)>;

/// Owns the single live cart for a browsing session.
///
/// The application shell constructs one store and hands `&mut` access to
/// whatever dispatches cart actions. Subscribers run after each committed
/// change, so derived displays always see the latest state.
pub struct CartStore {
    state: CartState,
    version: u64,
    subscribers: Vec<Subscriber>,
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CartStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("state", &self.state)
            .field("version", &self.version)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl CartStore {
    /// Create a store holding an empty cart.
    pub fn new() -> Self {
        Self::with_state(CartState::new())
    }

    /// Create a store around an existing cart.
    pub fn with_state(state: CartState) -> Self {
        Self {
            state,
            version: 0,
            subscribers: Vec::new(),
        }
    }

    /// Latest committed cart state.
    pub fn state(&self) -> &CartState {
        &self.state
    }

    /// Number of committed changes since the store was created.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Register a callback invoked after every committed change.
    pub fn subscribe(&mut self, subscriber: impl FnMut(&CartState) + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    /// Apply an action. Returns whether the cart changed.
    pub fn dispatch(&mut self, action: CartAction) -> bool {
        let changed = self.state.apply(&action);

        tracing::debug!(
            action = action.as_str(),
            product_id = action.product_id().map(ProductId::as_str),
            changed,
            total_quantity = self.state.total_quantity(),
            total_amount = %self.state.total_amount(),
            "cart action applied"
        );

        if changed {
            self.version += 1;
            for subscriber in &mut self.subscribers {
                subscriber(&self.state);
            }
        }
        changed
    }

    /// Add `quantity` units of a product.
    pub fn add(&mut self, product: ProductSnapshot, quantity: u32) -> bool {
        self.dispatch(CartAction::Add { product, quantity })
    }

    /// Remove a product's line item.
    pub fn remove(&mut self, product_id: &ProductId) -> bool {
        self.dispatch(CartAction::Remove {
            product_id: product_id.clone(),
        })
    }

    /// Replace a line item's quantity.
    pub fn set_quantity(&mut self, product_id: &ProductId, quantity: u32) -> bool {
        self.dispatch(CartAction::SetQuantity {
            product_id: product_id.clone(),
            quantity,
        })
    }

    /// Empty the cart.
    pub fn clear(&mut self) -> bool {
        self.dispatch(CartAction::Clear)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::{Currency, Money};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn cake(id: &str, cents: i64) -> ProductSnapshot {
        ProductSnapshot::new(id, "Cake", Money::new(cents, Currency::USD))
    }

    #[test]
    fn test_subscribers_see_latest_state() {
        let mut store = CartStore::new();
        let badge = Rc::new(RefCell::new(Vec::new()));
        let seen = Rc::clone(&badge);
        store.subscribe(move |state| seen.borrow_mut().push(state.total_quantity()));

        store.add(cake("1", 500), 2);
        store.add(cake("2", 900), 1);
        store.set_quantity(&ProductId::new("1"), 5);
        store.remove(&ProductId::new("2"));
        store.clear();

        assert_eq!(*badge.borrow(), vec![2, 3, 6, 5, 0]);
    }

    #[test]
    fn test_noops_do_not_notify_or_bump_version() {
        let mut store = CartStore::new();
        let calls = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&calls);
        store.subscribe(move |_| *counter.borrow_mut() += 1);

        assert!(!store.remove(&ProductId::new("missing")));
        assert!(!store.clear());
        assert!(!store.add(cake("1", 500), 0));
        assert_eq!(*calls.borrow(), 0);
        assert_eq!(store.version(), 0);

        assert!(store.add(cake("1", 500), 1));
        assert_eq!(*calls.borrow(), 1);
        assert_eq!(store.version(), 1);
    }

    #[test]
    fn test_state_reflects_dispatch() {
        let mut store = CartStore::new();
        store.add(cake("1", 750), 1);
        store.set_quantity(&ProductId::new("1"), 3);
        assert_eq!(store.state().total_amount(), Money::new(2250, Currency::USD));
    }
}
