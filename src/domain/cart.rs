use serde::{Deserialize, Serialize};

use super::Product;

/// One row of the cart: a product reference, its quantity and the display fields
/// captured when the product was first added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: u64,
    pub name: String,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub category: String,
    pub quantity: u32,
}

impl CartLine {
    /// Snapshots the product's display fields into a line of quantity 1.
    pub fn from_product(product: &Product) -> Self {
        Self {
            product_id: product.id,
            name: product.display_name().to_string(),
            price: product.price,
            image: product.image.clone(),
            category: product.category.clone(),
            quantity: 1,
        }
    }

    pub fn subtotal(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

/// Direction of a single-step quantity adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityChange {
    Increase,
    Decrease,
}

/// Point-in-time view of the cart with totals derived from the lines.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSnapshot {
    pub items: Vec<CartLine>,
    pub total_quantity: u64,
    pub total_price: f64,
}

impl CartSnapshot {
    /// Builds a snapshot, recomputing both totals from scratch.
    pub fn from_lines(lines: &[CartLine]) -> Self {
        Self {
            items: lines.to_vec(),
            total_quantity: lines.iter().map(|line| u64::from(line.quantity)).sum(),
            total_price: lines.iter().map(CartLine::subtotal).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn line(&self, product_id: u64) -> Option<&CartLine> {
        self.items.iter().find(|line| line.product_id == product_id)
    }
}
