//! Catalog browsing and product admin commands.

use anyhow::{Context as _, Result};
use bakery_commerce::catalog::{Product, ProductDraft, ProductQuery};
use bakery_commerce::{Currency, Money, ProductId};

use super::{ProductChanges, ProductsArgs, ProductsCommand};
use crate::context::Context;
use crate::output::{truncate, Output};

const WIDTHS: [usize; 5] = [4, 24, 10, 10, 22];

/// Run the products command.
pub async fn run(args: ProductsArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ProductsCommand::List { category, search } => {
            let query = ProductQuery::from_filters(category.as_deref(), search.as_deref());
            list_products(&query, ctx).await
        }
        ProductsCommand::Show { id } => show_product(&ProductId::new(id), ctx).await,
        ProductsCommand::Create {
            name,
            price,
            category,
            description,
            image_url,
            stock,
            unavailable,
        } => {
            let mut draft = ProductDraft::new(name, dollars(price), stock);
            draft.category = non_empty(category);
            draft.description = non_empty(description);
            draft.image_url = non_empty(image_url);
            draft.available = !unavailable;
            create_product(&draft, ctx).await
        }
        ProductsCommand::Update { id, changes } => {
            update_product(&ProductId::new(id), changes, ctx).await
        }
        ProductsCommand::Delete { id, yes } => delete_product(&ProductId::new(id), yes, ctx).await,
    }
}

fn dollars(amount: f64) -> Money {
    Money::from_decimal(amount, Currency::USD)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Apply `changes` on top of `draft`. An empty string clears an optional field.
pub fn apply_changes(draft: &mut ProductDraft, changes: ProductChanges) {
    if let Some(name) = changes.name {
        draft.name = name;
    }
    if let Some(price) = changes.price {
        draft.price = dollars(price);
    }
    if let Some(category) = changes.category {
        draft.category = non_empty(Some(category));
    }
    if let Some(description) = changes.description {
        draft.description = non_empty(Some(description));
    }
    if let Some(image_url) = changes.image_url {
        draft.image_url = non_empty(Some(image_url));
    }
    if let Some(stock) = changes.stock {
        draft.stock_quantity = stock;
    }
    if let Some(available) = changes.available {
        draft.available = available;
    }
}

async fn create_product(draft: &ProductDraft, ctx: &Context) -> Result<()> {
    draft.validate()?;
    let api = ctx.storefront()?;
    let product = api.create_product(draft).await.context("Failed to create product")?;

    if ctx.output.is_json() {
        ctx.output.json(&product);
        return Ok(());
    }

    ctx.output
        .success(&format!("Created product {} ({})", product.id, product.name));
    print_product_details(&ctx.output, &product);
    Ok(())
}

async fn update_product(id: &ProductId, changes: ProductChanges, ctx: &Context) -> Result<()> {
    let api = ctx.storefront()?;
    let current = api.get_product(id).await?;

    let mut draft = ProductDraft::from(&current);
    apply_changes(&mut draft, changes);
    draft.validate()?;

    let product = api.update_product(id, &draft).await?;

    if ctx.output.is_json() {
        ctx.output.json(&product);
        return Ok(());
    }

    ctx.output.success(&format!("Updated product {}", product.id));
    print_product_details(&ctx.output, &product);
    Ok(())
}

async fn delete_product(id: &ProductId, yes: bool, ctx: &Context) -> Result<()> {
    let api = ctx.storefront()?;
    let product = api.get_product(id).await?;

    if !yes {
        use dialoguer::Confirm;
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete product '{}'?", product.name))
            .default(false)
            .interact()?;

        if !confirmed {
            ctx.output.warn("Cancelled");
            return Ok(());
        }
    }

    api.delete_product(id).await?;
    ctx.output
        .success(&format!("Deleted product {} ({})", product.id, product.name));
    Ok(())
}

async fn list_products(query: &ProductQuery, ctx: &Context) -> Result<()> {
    let api = ctx.storefront()?;

    let spinner = ctx.output.spinner("Loading products...");
    let products = api.list_products(query).await;
    spinner.finish_and_clear();
    let products = products.context("Failed to load products")?;

    if ctx.output.is_json() {
        ctx.output.json(&products);
        return Ok(());
    }

    ctx.output.header(&match query {
        ProductQuery::All => "Our Delicious Cakes".to_string(),
        ProductQuery::Category(category) => format!("Cakes in {}", category),
        ProductQuery::Search(term) => format!("Cakes matching \"{}\"", term),
    });

    if products.is_empty() {
        ctx.output.info("No products found.");
        return Ok(());
    }

    print_product_table(&ctx.output, &products);
    Ok(())
}

/// Print products as an ID/name/price/category/stock table.
pub fn print_product_table(output: &Output, products: &[Product]) {
    output.table_row(&["ID", "NAME", "PRICE", "CATEGORY", "STOCK"], &WIDTHS);
    for product in products {
        let price = product.price.display();
        let category = product.category.as_deref().unwrap_or("-");
        let stock = product.stock_label();
        output.table_row(
            &[
                product.id.as_str(),
                &truncate(&product.name, WIDTHS[1]),
                &price,
                category,
                &stock,
            ],
            &WIDTHS,
        );
    }
}

async fn show_product(id: &ProductId, ctx: &Context) -> Result<()> {
    let api = ctx.storefront()?;
    let product = api.get_product(id).await?;

    if ctx.output.is_json() {
        ctx.output.json(&product);
        return Ok(());
    }

    ctx.output.header(&product.name);
    print_product_details(&ctx.output, &product);
    Ok(())
}

/// Print the detail view of one product.
pub fn print_product_details(output: &Output, product: &Product) {
    output.kv("id", product.id.as_str());
    output.kv("price", &product.price.display());
    if let Some(category) = &product.category {
        output.kv("category", category);
    }
    output.kv("stock", &product.stock_label());
    if let Some(description) = &product.description {
        output.kv("description", description);
    }
    if let Some(url) = &product.image_url {
        output.kv("image", url);
    }
}
