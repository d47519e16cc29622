//! Interactive shopping session.
//!
//! One session owns one cart store. Every screen reads the cart from the
//! store, and the badge in the menu prompt is kept current by a store
//! subscription rather than by the screens themselves.

use std::cell::Cell;
use std::rc::Rc;

use anyhow::{bail, Result};
use bakery_commerce::cart::{CartStore, CartSummary};
use bakery_commerce::catalog::{Product, ProductQuery};
use bakery_commerce::checkout::{
    CardDetails, Checkout, CustomerDetails, Order, PaymentMethod, PaymentOutcome,
};
use bakery_commerce::{OrderId, StorefrontApi};
use dialoguer::{Confirm, Input, Password, Select};

use super::orders::print_order;
use super::products::{print_product_details, print_product_table};
use super::ShopArgs;
use crate::context::Context;

/// Run the shop command.
pub async fn run(args: ShopArgs, ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        bail!("The shop session is interactive and cannot be used with --json");
    }

    let api = ctx.storefront()?;
    let mut session = ShopSession::new(api.as_ref(), ctx);
    session.run(args.category).await
}

/// Parse a requested line quantity.
///
/// Zero and negative input is ignored, the same as pressing "-" on a
/// quantity of one; removal is a separate action.
pub fn requested_quantity(input: i64) -> Option<u32> {
    if input <= 0 {
        None
    } else {
        Some(u32::try_from(input).unwrap_or(u32::MAX))
    }
}

/// Menu prompt showing the live item count.
pub fn badge_label(store_name: &str, items: u64) -> String {
    format!("{} | Cart ({})", store_name, items)
}

struct ShopSession<'a> {
    api: &'a dyn StorefrontApi,
    ctx: &'a Context,
    store: CartStore,
    badge: Rc<Cell<u64>>,
}

impl<'a> ShopSession<'a> {
    fn new(api: &'a dyn StorefrontApi, ctx: &'a Context) -> Self {
        let mut store = CartStore::new();
        let badge = Rc::new(Cell::new(0));

        let count = Rc::clone(&badge);
        store.subscribe(move |cart| count.set(cart.total_quantity()));

        Self {
            api,
            ctx,
            store,
            badge,
        }
    }

    async fn run(&mut self, category: Option<String>) -> Result<()> {
        self.ctx
            .output
            .header(&format!("Welcome to {}", self.ctx.config.store.name));

        if let Some(category) = category {
            self.browse(ProductQuery::from_filters(Some(&category), None))
                .await?;
        }

        let items = ["Browse cakes", "Search", "View cart", "Checkout", "Quit"];
        loop {
            let prompt = badge_label(&self.ctx.config.store.name, self.badge.get());
            let selection = Select::new()
                .with_prompt(prompt)
                .items(&items[..])
                .default(0)
                .interact_opt()?;

            match selection {
                Some(0) => self.browse(ProductQuery::All).await?,
                Some(1) => {
                    let term: String = Input::new()
                        .with_prompt("Search for")
                        .allow_empty(true)
                        .interact_text()?;
                    self.browse(ProductQuery::from_filters(None, Some(&term)))
                        .await?;
                }
                Some(2) => self.view_cart()?,
                Some(3) => {
                    if !self.checkout().await? {
                        break;
                    }
                }
                _ => break,
            }
        }

        if !self.store.state().is_empty() {
            self.ctx.output.info(&format!(
                "Leaving {} item(s) in the cart behind",
                self.store.state().total_quantity()
            ));
        }
        Ok(())
    }

    async fn browse(&mut self, query: ProductQuery) -> Result<()> {
        let spinner = self.ctx.output.spinner("Loading products...");
        let products = self.api.list_products(&query).await;
        spinner.finish_and_clear();

        let products = match products {
            Ok(products) => products,
            Err(e) => {
                self.ctx.output.error(&format!("Failed to load products: {}", e));
                return Ok(());
            }
        };
        if products.is_empty() {
            self.ctx.output.info("No products found.");
            return Ok(());
        }

        print_product_table(&self.ctx.output, &products);

        let mut items: Vec<String> = products
            .iter()
            .map(|p| format!("{} ({})", p.name, p.price))
            .collect();
        items.push("Back".to_string());

        let Some(index) = Select::new()
            .with_prompt("Choose a cake")
            .items(&items[..])
            .default(0)
            .interact_opt()?
        else {
            return Ok(());
        };
        match products.get(index) {
            Some(product) => self.product_detail(product),
            None => Ok(()),
        }
    }

    fn product_detail(&mut self, product: &Product) -> Result<()> {
        self.ctx.output.header(&product.name);
        print_product_details(&self.ctx.output, product);

        if !product.is_purchasable() {
            self.ctx.output.warn("This cake is out of stock");
            return Ok(());
        }

        let input: i64 = Input::new()
            .with_prompt("Quantity")
            .default(1)
            .interact_text()?;
        let Some(quantity) = requested_quantity(input) else {
            self.ctx.output.info("Nothing added");
            return Ok(());
        };

        self.store.add(product.snapshot(), quantity);
        self.ctx
            .output
            .success(&format!("Added {} x {} to cart", quantity, product.name));
        Ok(())
    }

    fn view_cart(&mut self) -> Result<()> {
        loop {
            if self.store.state().is_empty() {
                self.ctx.output.info("Your cart is empty");
                return Ok(());
            }
            self.print_cart();

            let actions = ["Change quantity", "Remove item", "Clear cart", "Back"];
            match Select::new()
                .with_prompt("Cart")
                .items(&actions[..])
                .default(3)
                .interact_opt()?
            {
                Some(0) => self.change_quantity()?,
                Some(1) => self.remove_item()?,
                Some(2) => {
                    if Confirm::new()
                        .with_prompt("Empty the cart?")
                        .default(false)
                        .interact()?
                    {
                        self.store.clear();
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn print_cart(&self) {
        let cart = self.store.state();
        let summary = CartSummary::with_shipping(cart, self.ctx.config.store.shipping_cents);

        self.ctx.output.header("Shopping Cart");
        for item in cart.items() {
            self.ctx.output.list_item(&format!(
                "{} x{} @ {} = {}",
                item.name(),
                item.quantity(),
                item.unit_price(),
                item.line_total()
            ));
        }
        self.ctx.output.kv(&summary.subtotal_label(), &summary.subtotal.display());
        self.ctx.output.kv("Shipping", &summary.shipping.display());
        self.ctx.output.kv("Total", &summary.grand_total.display());
    }

    fn pick_item(&self, prompt: &str) -> Result<Option<usize>> {
        let items: Vec<String> = self
            .store
            .state()
            .items()
            .iter()
            .map(|item| format!("{} (x{})", item.name(), item.quantity()))
            .collect();
        Ok(Select::new()
            .with_prompt(prompt)
            .items(&items[..])
            .default(0)
            .interact_opt()?)
    }

    fn change_quantity(&mut self) -> Result<()> {
        let Some(index) = self.pick_item("Change which item?")? else {
            return Ok(());
        };
        let Some(item) = self.store.state().items().get(index) else {
            return Ok(());
        };
        let product_id = item.product_id().clone();
        let current = item.quantity();

        let input: i64 = Input::new()
            .with_prompt("New quantity")
            .default(i64::from(current))
            .interact_text()?;
        match requested_quantity(input) {
            Some(quantity) => {
                self.store.set_quantity(&product_id, quantity);
            }
            None => self
                .ctx
                .output
                .info("Quantity must be at least 1; use Remove item to drop it"),
        }
        Ok(())
    }

    fn remove_item(&mut self) -> Result<()> {
        let Some(index) = self.pick_item("Remove which item?")? else {
            return Ok(());
        };
        if let Some(product_id) = self
            .store
            .state()
            .items()
            .get(index)
            .map(|item| item.product_id().clone())
        {
            self.store.remove(&product_id);
        }
        Ok(())
    }

    /// Returns false when the customer is done shopping.
    async fn checkout(&mut self) -> Result<bool> {
        if self.store.state().is_empty() {
            self.ctx.output.warn("Your cart is empty");
            return Ok(true);
        }
        self.print_cart();

        self.ctx.output.header("Checkout");
        let customer = prompt_customer()?;
        if let Err(e) = customer.validate() {
            self.ctx.output.error(&e.to_string());
            return Ok(true);
        }

        let methods = [PaymentMethod::Card, PaymentMethod::Cash];
        let labels: Vec<&str> = methods.iter().map(|m| m.display_name()).collect();
        let Some(choice) = Select::new()
            .with_prompt("Payment method")
            .items(&labels[..])
            .default(0)
            .interact_opt()?
        else {
            return Ok(true);
        };
        let method = methods[choice];

        let spinner = self.ctx.output.spinner("Placing order...");
        let placed = Checkout::new(self.api, &mut self.store)
            .place_order(customer, method)
            .await;
        spinner.finish_and_clear();

        let order = match placed {
            Ok(order) => order,
            Err(e) => {
                self.ctx.output.error(&format!("Failed to create order: {}", e));
                return Ok(true);
            }
        };

        self.ctx.output.success(&format!("Order #{} created", order.id));
        print_order(&self.ctx.output, &order);

        match method {
            PaymentMethod::Cash => {
                self.settle_cash(&order)?;
                Ok(Confirm::new()
                    .with_prompt("Continue shopping?")
                    .default(true)
                    .interact()?)
            }
            PaymentMethod::Card => {
                self.pay_by_card(&order).await?;
                Ok(true)
            }
        }
    }

    /// A cash order is complete once it exists, so the cart empties here.
    fn settle_cash(&mut self, order: &Order) -> Result<()> {
        Checkout::new(self.api, &mut self.store).confirm_cash_on_delivery(order)?;
        self.ctx.output.success("Thank you for your order!");
        self.ctx.output.info(&format!(
            "Please have {} ready when your order arrives",
            order.total_amount
        ));
        Ok(())
    }

    /// Reload a paid order so the confirmed status and intent are shown.
    async fn show_paid_order(&self, order_id: &OrderId) -> Option<Order> {
        match self.api.get_order(order_id).await {
            Ok(order) => {
                print_order(&self.ctx.output, &order);
                Some(order)
            }
            Err(e) => {
                tracing::warn!(%order_id, error = %e, "could not reload paid order");
                self.ctx
                    .output
                    .warn(&format!("Could not reload order #{}: {}", order_id, e));
                None
            }
        }
    }

    async fn pay_by_card(&mut self, order: &Order) -> Result<()> {
        loop {
            self.ctx
                .output
                .header(&format!("Payment of {}", order.total_amount));
            let card = prompt_card()?;

            let spinner = self.ctx.output.spinner("Processing payment...");
            let outcome = Checkout::new(self.api, &mut self.store)
                .pay_by_card(order, card)
                .await;
            spinner.finish_and_clear();

            match outcome {
                Ok(PaymentOutcome::Paid {
                    payment_intent_id, ..
                }) => {
                    self.ctx.output.success("Payment successful!");
                    if let Some(intent) = payment_intent_id {
                        self.ctx.output.kv("payment intent", intent.as_str());
                    }
                    self.show_paid_order(&order.id).await;
                    return Ok(());
                }
                Ok(PaymentOutcome::Declined { message, .. }) => self.ctx.output.error(&message),
                Err(e) => self.ctx.output.error(&e.to_string()),
            }

            if !Confirm::new()
                .with_prompt("Try again?")
                .default(true)
                .interact()?
            {
                self.ctx.output.info(&format!(
                    "Order #{} is waiting for payment; your cart was kept",
                    order.id
                ));
                return Ok(());
            }
        }
    }
}

fn prompt_customer() -> Result<CustomerDetails> {
    let name: String = Input::new().with_prompt("Full name").interact_text()?;
    let email: String = Input::new().with_prompt("Email").interact_text()?;
    let phone: String = Input::new().with_prompt("Phone").interact_text()?;
    let address: String = Input::new()
        .with_prompt("Shipping address")
        .interact_text()?;
    Ok(CustomerDetails::new(name, email, phone, address))
}

fn prompt_card() -> Result<CardDetails> {
    Ok(CardDetails {
        card_number: Input::new().with_prompt("Card number").interact_text()?,
        cardholder_name: Input::new().with_prompt("Cardholder name").interact_text()?,
        expiry_month: Input::new().with_prompt("Expiry month (MM)").interact_text()?,
        expiry_year: Input::new().with_prompt("Expiry year (YY)").interact_text()?,
        cvv: Password::new().with_prompt("CVV").interact()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BakeryConfig;
    use crate::output::Output;
    use bakery_client::DemoStorefront;
    use bakery_commerce::catalog::ProductSnapshot;
    use bakery_commerce::checkout::OrderStatus;
    use bakery_commerce::{Currency, Money, ProductId};
    use std::path::PathBuf;

    fn quiet_context() -> Context {
        Context {
            config: BakeryConfig::default(),
            output: Output::new(false, false),
            cwd: PathBuf::from("."),
            config_path: None,
        }
    }

    fn customer() -> CustomerDetails {
        CustomerDetails::new("Jane Baker", "jane@example.com", "555-0100", "1 Flour St")
    }

    async fn session_with_cake<'a>(api: &'a DemoStorefront, ctx: &'a Context) -> ShopSession<'a> {
        let mut session = ShopSession::new(api, ctx);
        let cake = api.get_product(&ProductId::from(1)).await.unwrap();
        session.store.add(cake.snapshot(), 2);
        assert_eq!(session.badge.get(), 2);
        session
    }

    #[test]
    fn test_requested_quantity_ignores_non_positive() {
        assert_eq!(requested_quantity(0), None);
        assert_eq!(requested_quantity(-3), None);
        assert_eq!(requested_quantity(2), Some(2));
        assert_eq!(requested_quantity(i64::MAX), Some(u32::MAX));
    }

    #[test]
    fn test_badge_follows_store_subscription() {
        let mut store = CartStore::new();
        let badge = Rc::new(Cell::new(0));
        let count = Rc::clone(&badge);
        store.subscribe(move |cart| count.set(cart.total_quantity()));

        let carrot = ProductSnapshot::new("5", "Carrot Cake", Money::new(3899, Currency::USD));
        store.add(carrot.clone(), 2);
        assert_eq!(badge_label("Sweet Delights", badge.get()), "Sweet Delights | Cart (2)");

        store.remove(&carrot.product_id);
        assert_eq!(badge.get(), 0);
    }

    #[tokio::test]
    async fn test_cash_order_empties_cart_once_placed() {
        let api = DemoStorefront::new();
        let ctx = quiet_context();
        let mut session = session_with_cake(&api, &ctx).await;

        let order = Checkout::new(session.api, &mut session.store)
            .place_order(customer(), PaymentMethod::Cash)
            .await
            .unwrap();
        session.settle_cash(&order).unwrap();

        assert!(session.store.state().is_empty());
        assert_eq!(session.badge.get(), 0);
    }

    #[tokio::test]
    async fn test_paid_order_is_reloaded() {
        let api = DemoStorefront::new();
        let ctx = quiet_context();
        let mut session = session_with_cake(&api, &ctx).await;

        let order = Checkout::new(session.api, &mut session.store)
            .place_order(customer(), PaymentMethod::Card)
            .await
            .unwrap();
        assert_eq!(order.status, OrderStatus::Pending);

        let card = CardDetails {
            card_number: "4242424242424242".into(),
            cardholder_name: "Jane Baker".into(),
            expiry_month: "12".into(),
            expiry_year: "30".into(),
            cvv: "123".into(),
        };
        let outcome = Checkout::new(session.api, &mut session.store)
            .pay_by_card(&order, card)
            .await
            .unwrap();
        assert!(matches!(outcome, PaymentOutcome::Paid { .. }));

        let reloaded = session.show_paid_order(&order.id).await.unwrap();
        assert_eq!(reloaded.status, OrderStatus::Confirmed);
        assert!(reloaded.payment_intent_id.is_some());
        assert!(session.show_paid_order(&OrderId::from(999)).await.is_none());
    }
}
