//! Inventory stock alerts for the admin dashboard.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Category for bookable services, which have no stock.
pub const SERVICE_CATEGORY: &str = "Servicio";

/// Products with fewer units than this are flagged.
pub const LOW_STOCK_THRESHOLD: i64 = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub category: String,
    /// Units on hand; always zero for services.
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub price: f64,
}

impl Product {
    pub fn is_service(&self) -> bool {
        self.category == SERVICE_CATEGORY
    }

    pub fn is_low_stock(&self) -> bool {
        !self.is_service() && self.stock < LOW_STOCK_THRESHOLD
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockReport {
    pub low_stock: Vec<Product>,
    pub count: usize,
}

/// Low-stock products ordered by name.
pub fn low_stock(products: &[Product]) -> Vec<&Product> {
    let mut low: Vec<&Product> = products.iter().filter(|p| p.is_low_stock()).collect();
    low.sort_by(|a, b| a.name.cmp(&b.name));
    low
}

pub fn stock_report(products: &[Product]) -> StockReport {
    let low_stock: Vec<Product> = low_stock(products).into_iter().cloned().collect();
    StockReport {
        count: low_stock.len(),
        low_stock,
    }
}

/// Parse an inventory listing from its JSON array form.
pub fn products_from_json(json: &str) -> Result<Vec<Product>> {
    Ok(serde_json::from_str(json)?)
}
