//! Catalog queries.

use serde::{Deserialize, Serialize};

/// Which products to list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ProductQuery {
    /// Every available product.
    #[default]
    All,
    /// Products in a category.
    Category(String),
    /// Products whose name contains the term.
    Search(String),
}

impl ProductQuery {
    /// Build a query from optional filters.
    ///
    /// A non-empty search term takes precedence over the category, and blank
    /// values are treated as absent.
    pub fn from_filters(category: Option<&str>, search: Option<&str>) -> Self {
        let present = |s: Option<&str>| s.map(str::trim).filter(|s| !s.is_empty()).map(String::from);
        match (present(search), present(category)) {
            (Some(term), _) => ProductQuery::Search(term),
            (None, Some(category)) => ProductQuery::Category(category),
            (None, None) => ProductQuery::All,
        }
    }

    /// Query-string parameters for the remote API.
    pub fn to_params(&self) -> Vec<(&'static str, &str)> {
        match self {
            ProductQuery::All => Vec::new(),
            ProductQuery::Category(c) => vec![("category", c.as_str())],
            ProductQuery::Search(s) => vec![("search", s.as_str())],
        }
    }
}
