//! Order lookup and status commands.

use anyhow::{anyhow, Context as _, Result};
use bakery_commerce::checkout::{Order, OrderStatus};
use bakery_commerce::OrderId;

use super::{OrdersArgs, OrdersCommand};
use crate::context::Context;
use crate::output::{status_badge, truncate, Output};

const WIDTHS: [usize; 5] = [6, 20, 26, 10, 10];

/// Run the orders command.
pub async fn run(args: OrdersArgs, ctx: &Context) -> Result<()> {
    match args.command {
        OrdersCommand::List { email } => list_orders(email.as_deref(), ctx).await,
        OrdersCommand::Show { id } => show_order(&OrderId::new(id), ctx).await,
        OrdersCommand::Status { id, status } => {
            let status = parse_status(&status)?;
            update_status(&OrderId::new(id), status, ctx).await
        }
    }
}

/// Parse a status name, listing the valid ones on failure.
pub fn parse_status(input: &str) -> Result<OrderStatus> {
    OrderStatus::parse(input).ok_or_else(|| {
        let valid: Vec<&str> = OrderStatus::ALL.iter().map(|s| s.as_str()).collect();
        anyhow!("Unknown order status '{}'. Expected one of: {}", input, valid.join(", "))
    })
}

async fn list_orders(email: Option<&str>, ctx: &Context) -> Result<()> {
    let api = ctx.storefront()?;

    let spinner = ctx.output.spinner("Loading orders...");
    let orders = api.list_orders(email).await;
    spinner.finish_and_clear();
    let orders = orders.context("Failed to load orders")?;

    if ctx.output.is_json() {
        ctx.output.json(&orders);
        return Ok(());
    }

    match email {
        Some(email) => ctx.output.header(&format!("Orders for {}", email)),
        None => ctx.output.header("Orders"),
    }

    if orders.is_empty() {
        ctx.output.info("No orders found.");
        return Ok(());
    }

    ctx.output
        .table_row(&["ID", "CUSTOMER", "EMAIL", "TOTAL", "STATUS"], &WIDTHS);
    for order in &orders {
        let total = order.total_amount.display();
        ctx.output.table_row(
            &[
                order.id.as_str(),
                &truncate(&order.customer.customer_name, WIDTHS[1]),
                &truncate(&order.customer.customer_email, WIDTHS[2]),
                &total,
                &status_badge(order.status),
            ],
            &WIDTHS,
        );
    }

    Ok(())
}

async fn show_order(id: &OrderId, ctx: &Context) -> Result<()> {
    let api = ctx.storefront()?;
    let order = api.get_order(id).await?;

    if ctx.output.is_json() {
        ctx.output.json(&order);
        return Ok(());
    }

    ctx.output.header(&format!("Order #{}", order.id));
    print_order(&ctx.output, &order);
    Ok(())
}

async fn update_status(id: &OrderId, status: OrderStatus, ctx: &Context) -> Result<()> {
    let api = ctx.storefront()?;
    let order = api
        .update_order_status(id, status)
        .await
        .with_context(|| format!("Failed to update order {}", id))?;

    if ctx.output.is_json() {
        ctx.output.json(&order);
        return Ok(());
    }

    ctx.output.success(&format!(
        "Order #{} is now {}",
        order.id,
        status_badge(order.status)
    ));
    Ok(())
}

/// Print the detail view of one order.
pub fn print_order(output: &Output, order: &Order) {
    output.kv("status", &status_badge(order.status));
    output.kv("customer", &order.customer.customer_name);
    output.kv("email", &order.customer.customer_email);
    output.kv("phone", &order.customer.customer_phone);
    output.kv("ship to", &order.customer.shipping_address);
    output.kv("payment", order.payment_method.display_name());
    if let Some(intent) = &order.payment_intent_id {
        output.kv("payment intent", intent.as_str());
    }
    if let Some(created_at) = order.created_at {
        output.kv("placed", &created_at.format("%Y-%m-%d %H:%M").to_string());
    }

    for item in &order.items {
        output.list_item(&format!(
            "{} x{} @ {} = {}",
            item.product_name, item.quantity, item.price, item.subtotal
        ));
    }
    output.kv("total", &order.total_amount.display());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status() {
        assert_eq!(parse_status("preparing").unwrap(), OrderStatus::Preparing);
        let err = parse_status("baking").unwrap_err().to_string();
        assert!(err.contains("Expected one of: PENDING, CONFIRMED"));
    }
}
