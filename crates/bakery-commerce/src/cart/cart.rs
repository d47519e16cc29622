//! Cart state and line item types.

use crate::catalog::ProductSnapshot;
use crate::ids::ProductId;
use crate::money::{Currency, Money};
use serde::Serialize;

/// One entry per distinct product in the cart.
///
/// Display fields are a snapshot taken at first add and are never re-synced
/// with the catalog. `line_total` always equals `unit_price * quantity`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LineItem {
    product_id: ProductId,
    name: String,
    unit_price: Money,
    image_url: Option<String>,
    quantity: u32,
    line_total: Money,
}

impl LineItem {
    fn new(snapshot: &ProductSnapshot, quantity: u32) -> Self {
        let mut item = Self {
            product_id: snapshot.product_id.clone(),
            name: snapshot.name.clone(),
            unit_price: snapshot.unit_price,
            image_url: snapshot.image_url.clone(),
            quantity,
            line_total: Money::zero(snapshot.unit_price.currency),
        };
        item.update_total();
        item
    }

    fn update_total(&mut self) {
        self.line_total = self.unit_price.multiply(i64::from(self.quantity));
    }

    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    /// Always at least 1.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn line_total(&self) -> Money {
        self.line_total
    }
}

/// The cart aggregate: line items in insertion order plus derived totals.
///
/// After every operation:
/// - `total_quantity` is the sum of item quantities,
/// - `total_amount` is the sum of line totals,
/// - product ids are pairwise distinct,
/// - every item has quantity >= 1.
///
/// All operations are total. Input outside an operation's contract leaves
/// the state unchanged, and each mutating operation reports whether the
/// state changed.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CartState {
    items: Vec<LineItem>,
    total_quantity: u64,
    total_amount: Money,
    currency: Currency,
}

impl Default for CartState {
    fn default() -> Self {
        Self::new()
    }
}

impl CartState {
    /// Create an empty cart priced in USD.
    pub fn new() -> Self {
        Self::with_currency(Currency::USD)
    }

    /// Create an empty cart priced in `currency`.
    pub fn with_currency(currency: Currency) -> Self {
        Self {
            items: Vec::new(),
            total_quantity: 0,
            total_amount: Money::zero(currency),
            currency,
        }
    }

    /// Add `quantity` units of a product.
    ///
    /// A product not yet in the cart is appended at the end; an existing one
    /// has its quantity increased and keeps its first snapshot. A zero
    /// quantity, or a snapshot priced in another currency, is a no-op.
    pub fn add(&mut self, product: &ProductSnapshot, quantity: u32) -> bool {
        if quantity == 0 || product.unit_price.currency != self.currency {
            return false;
        }

        match self.position(&product.product_id) {
            Some(idx) => {
                let item = &mut self.items[idx];
                item.quantity = item.quantity.saturating_add(quantity);
                item.update_total();
            }
            None => self.items.push(LineItem::new(product, quantity)),
        }

        self.recompute_totals();
        true
    }

    /// Add a single unit of a product.
    pub fn add_one(&mut self, product: &ProductSnapshot) -> bool {
        self.add(product, 1)
    }

    /// Remove a product's line item. Unknown ids are a no-op.
    pub fn remove(&mut self, product_id: &ProductId) -> bool {
        let Some(idx) = self.position(product_id) else {
            return false;
        };
        self.items.remove(idx);
        self.recompute_totals();
        true
    }

    /// Replace a line item's quantity.
    ///
    /// Defined only for an existing product and `quantity >= 1`; anything
    /// else is a no-op. Callers route removal through [`CartState::remove`].
    pub fn set_quantity(&mut self, product_id: &ProductId, quantity: u32) -> bool {
        if quantity == 0 {
            return false;
        }
        let Some(idx) = self.position(product_id) else {
            return false;
        };

        let item = &mut self.items[idx];
        item.quantity = quantity;
        item.update_total();
        self.recompute_totals();
        true
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.items.clear();
        self.recompute_totals();
    }

    /// Line items in the order their products were first added.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Sum of all item quantities.
    pub fn total_quantity(&self) -> u64 {
        self.total_quantity
    }

    /// Sum of all line totals.
    pub fn total_amount(&self) -> Money {
        self.total_amount
    }

    /// The currency every line item is priced in.
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Get an item by product ID.
    pub fn get_item(&self, product_id: &ProductId) -> Option<&LineItem> {
        self.items.iter().find(|i| &i.product_id == product_id)
    }

    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.position(product_id).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct products.
    pub fn unique_item_count(&self) -> usize {
        self.items.len()
    }

    fn position(&self, product_id: &ProductId) -> Option<usize> {
        self.items.iter().position(|i| &i.product_id == product_id)
    }

    // Totals are rebuilt from the items on every mutation.
    fn recompute_totals(&mut self) {
        self.total_quantity = self.items.iter().map(|i| u64::from(i.quantity)).sum();
        self.total_amount = Money::sum(self.items.iter().map(|i| &i.line_total), self.currency);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn usd(cents: i64) -> Money {
        Money::new(cents, Currency::USD)
    }

    fn product(id: &str, cents: i64) -> ProductSnapshot {
        ProductSnapshot::new(id, format!("Cake {id}"), usd(cents))
    }

    fn ids(cart: &CartState) -> Vec<&str> {
        cart.items().iter().map(|i| i.product_id().as_str()).collect()
    }

    fn assert_invariants(cart: &CartState) {
        let qty: u64 = cart.items().iter().map(|i| u64::from(i.quantity())).sum();
        assert_eq!(cart.total_quantity(), qty);

        let amount: i64 = cart.items().iter().map(|i| i.line_total().amount_cents).sum();
        assert_eq!(cart.total_amount().amount_cents, amount);

        for item in cart.items() {
            assert!(item.quantity() >= 1);
            assert_eq!(
                item.line_total().amount_cents,
                item.unit_price().amount_cents * i64::from(item.quantity())
            );
        }

        let mut seen = std::collections::HashSet::new();
        assert!(cart.items().iter().all(|i| seen.insert(i.product_id().clone())));
    }

    #[test]
    fn test_new_cart_is_empty() {
        let cart = CartState::new();
        assert!(cart.is_empty());
        assert_eq!(cart.total_quantity(), 0);
        assert_eq!(cart.total_amount(), usd(0));
    }

    #[test]
    fn test_add_accumulates() {
        let mut cart = CartState::new();
        let p = product("p", 1000);
        cart.add(&p, 1);
        cart.add(&p, 1);

        assert_eq!(cart.unique_item_count(), 1);
        let item = &cart.items()[0];
        assert_eq!(item.quantity(), 2);
        assert_eq!(item.line_total(), usd(2000));
        assert_eq!(cart.total_quantity(), 2);
        assert_eq!(cart.total_amount(), usd(2000));
    }

    #[test]
    fn test_add_increases_total_by_delta() {
        let mut cart = CartState::new();
        let p = product("p", 300);
        cart.add(&p, 4);
        cart.add(&p, 3);
        assert_eq!(cart.total_quantity(), 7);
        assert_eq!(cart.total_amount(), usd(2100));
    }

    #[test]
    fn test_add_zero_is_noop() {
        let mut cart = CartState::new();
        assert!(!cart.add(&product("p", 500), 0));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_other_currency_is_noop() {
        let mut cart = CartState::new();
        let euro = ProductSnapshot::new("e", "Sachertorte", Money::new(900, Currency::EUR));
        assert!(!cart.add(&euro, 1));
        assert!(cart.is_empty());
        assert_invariants(&cart);
    }

    #[test]
    fn test_snapshot_is_not_resynced() {
        let mut cart = CartState::new();
        cart.add(&product("p", 1000), 1);
        cart.add(&product("p", 1500), 1);

        let item = cart.get_item(&ProductId::new("p")).unwrap();
        assert_eq!(item.unit_price(), usd(1000));
        assert_eq!(cart.total_amount(), usd(2000));
    }

    #[test]
    fn test_remove_zeroes_out() {
        let mut cart = CartState::new();
        cart.add(&product("p", 1000), 1);
        assert!(cart.remove(&ProductId::new("p")));

        assert!(cart.is_empty());
        assert_eq!(cart.total_quantity(), 0);
        assert_eq!(cart.total_amount(), usd(0));
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let mut cart = CartState::new();
        cart.add(&product("a", 100), 2);
        let before = cart.clone();
        assert!(!cart.remove(&ProductId::new("missing")));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_set_quantity_recomputes_totals() {
        let mut cart = CartState::new();
        cart.add(&product("p", 750), 1);
        assert!(cart.set_quantity(&ProductId::new("p"), 3));

        assert_eq!(cart.items()[0].line_total(), usd(2250));
        assert_eq!(cart.total_amount(), usd(2250));
        assert_eq!(cart.total_quantity(), 3);
    }

    #[test]
    fn test_set_quantity_out_of_contract_is_noop() {
        let mut cart = CartState::new();
        cart.add(&product("p", 750), 2);
        let before = cart.clone();

        assert!(!cart.set_quantity(&ProductId::new("p"), 0));
        assert!(!cart.set_quantity(&ProductId::new("missing"), 4));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_multi_product_totals() {
        let mut cart = CartState::new();
        cart.add(&product("A", 500), 2);
        cart.add(&product("B", 1200), 1);

        assert_eq!(cart.total_quantity(), 3);
        assert_eq!(cart.total_amount(), usd(2200));
        assert_eq!(ids(&cart), ["A", "B"]);
    }

    #[test]
    fn test_clear_resets_fully() {
        let mut cart = CartState::new();
        cart.add(&product("A", 500), 2);
        cart.add(&product("B", 1200), 1);
        cart.clear();

        assert!(cart.is_empty());
        assert_eq!(cart.total_quantity(), 0);
        assert_eq!(cart.total_amount(), usd(0));
        assert_eq!(cart, CartState::new());

        cart.add(&product("B", 1200), 1);
        let mut fresh = CartState::new();
        fresh.add(&product("B", 1200), 1);
        assert_eq!(cart, fresh);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut cart = CartState::new();
        cart.add(&product("C", 100), 5);
        cart.add(&product("A", 100), 1);
        cart.add(&product("B", 100), 9);
        cart.add(&product("A", 100), 3);
        assert_eq!(ids(&cart), ["C", "A", "B"]);
    }

    #[test]
    fn test_quantity_saturates() {
        let mut cart = CartState::new();
        let p = product("p", 1);
        cart.add(&p, u32::MAX);
        cart.add(&p, 10);
        assert_eq!(cart.items()[0].quantity(), u32::MAX);
        assert_invariants(&cart);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Add(u8, u32),
        Remove(u8),
        SetQuantity(u8, u32),
        Clear,
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            4 => (0u8..6, 0u32..20).prop_map(|(p, q)| Op::Add(p, q)),
            2 => (0u8..6).prop_map(Op::Remove),
            2 => (0u8..6, 0u32..20).prop_map(|(p, q)| Op::SetQuantity(p, q)),
            1 => Just(Op::Clear),
        ]
    }

    fn catalog_entry(p: u8) -> ProductSnapshot {
        product(&format!("p{p}"), 125 * (i64::from(p) + 1))
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Invariants hold after every operation in any sequence.
        #[test]
        fn invariants_hold_after_every_operation(ops in prop::collection::vec(op_strategy(), 0..60)) {
            let mut cart = CartState::new();
            for op in ops {
                match op {
                    Op::Add(p, q) => { cart.add(&catalog_entry(p), q); }
                    Op::Remove(p) => { cart.remove(&catalog_entry(p).product_id); }
                    Op::SetQuantity(p, q) => { cart.set_quantity(&catalog_entry(p).product_id, q); }
                    Op::Clear => cart.clear(),
                }
                assert_invariants(&cart);
            }
        }

        /// Removing twice leaves the same state as removing once.
        #[test]
        fn remove_is_idempotent(
            ops in prop::collection::vec(op_strategy(), 0..30),
            target in 0u8..8,
        ) {
            let mut cart = CartState::new();
            for op in ops {
                match op {
                    Op::Add(p, q) => { cart.add(&catalog_entry(p), q); }
                    Op::Remove(p) => { cart.remove(&catalog_entry(p).product_id); }
                    Op::SetQuantity(p, q) => { cart.set_quantity(&catalog_entry(p).product_id, q); }
                    Op::Clear => cart.clear(),
                }
            }

            let id = ProductId::new(format!("p{target}"));
            cart.remove(&id);
            let once = cart.clone();
            prop_assert!(!cart.remove(&id));
            prop_assert_eq!(cart, once);
        }
    }
}
