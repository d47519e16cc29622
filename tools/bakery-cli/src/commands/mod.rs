//! CLI command implementations.

pub mod config;
pub mod orders;
pub mod products;
pub mod shop;

use clap::{Args, Subcommand};

/// Arguments for the products command.
#[derive(Args)]
pub struct ProductsArgs {
    #[command(subcommand)]
    pub command: ProductsCommand,
}

#[derive(Subcommand)]
pub enum ProductsCommand {
    /// List the catalog.
    List {
        /// Only products in this category.
        #[arg(long)]
        category: Option<String>,

        /// Only products whose name contains this text.
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Show one product.
    Show {
        /// Product ID.
        id: String,
    },
    /// Add a product to the catalog.
    Create {
        /// Product name.
        name: String,

        /// Price in dollars.
        #[arg(long)]
        price: f64,

        /// Category, e.g. Chocolate.
        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        image_url: Option<String>,

        /// Units in stock.
        #[arg(long, default_value_t = 0)]
        stock: i64,

        /// List the product as unavailable.
        #[arg(long)]
        unavailable: bool,
    },
    /// Change fields of an existing product.
    Update {
        /// Product ID.
        id: String,

        #[command(flatten)]
        changes: ProductChanges,
    },
    /// Remove a product from the catalog.
    Delete {
        /// Product ID.
        id: String,

        /// Skip confirmation.
        #[arg(short, long)]
        yes: bool,
    },
}

/// Field overrides for `products update`. Unset fields keep their value.
#[derive(Args, Debug, Default)]
pub struct ProductChanges {
    #[arg(long)]
    pub name: Option<String>,

    /// Price in dollars.
    #[arg(long)]
    pub price: Option<f64>,

    #[arg(long)]
    pub category: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub image_url: Option<String>,

    /// Units in stock.
    #[arg(long)]
    pub stock: Option<i64>,

    /// true or false.
    #[arg(long)]
    pub available: Option<bool>,
}

/// Arguments for the orders command.
#[derive(Args)]
pub struct OrdersArgs {
    #[command(subcommand)]
    pub command: OrdersCommand,
}

#[derive(Subcommand)]
pub enum OrdersCommand {
    /// List orders.
    List {
        /// Only orders placed with this email.
        #[arg(short, long)]
        email: Option<String>,
    },
    /// Show one order.
    Show {
        /// Order ID.
        id: String,
    },
    /// Change an order's status.
    Status {
        /// Order ID.
        id: String,

        /// New status (PENDING, CONFIRMED, PREPARING, READY, DELIVERED, CANCELLED).
        status: String,
    },
}

/// Arguments for the shop command.
#[derive(Args)]
pub struct ShopArgs {
    /// Start with products from this category.
    #[arg(long)]
    pub category: Option<String>,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Create a bakery.toml in the current directory.
    Init {
        /// Overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate configuration.
    Validate,
}
