use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Stock availability flag carried alongside the numeric stock level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InventoryStatus {
    InStock,
    LowStock,
    OutOfStock,
}

/// Represents a product in the catalog.
///
/// Field names serialize in camelCase so the stored collection keeps the shape of
/// the catalog data file. `name` and `description` are optional at the type level
/// because the file is an external collaborator: a record written without them is
/// loaded as-is and reported by the query engine as a data-integrity failure.
///
/// # Actor Framework
/// Implements [`Entity`](crate::actor_framework::Entity) in `catalog::entity`, so a
/// [`ResourceActor`](crate::actor_framework::ResourceActor) can own the collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal_reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shell_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inventory_status: Option<InventoryStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
    /// Fields the catalog does not model, kept verbatim so a rewrite of the
    /// collection never loses them.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Product {
    /// Creates a product with the fields the catalog logic relies on.
    ///
    /// # Arguments
    /// * `id` - Identifier (normally assigned by the repository sequence)
    /// * `name` - Display name
    /// * `price` - Unit price
    /// * `quantity` - Available stock
    ///
    /// # Notes
    /// `description` starts empty rather than absent, so the record passes search
    /// filtering. Metadata fields start unset.
    pub fn new(id: u64, name: impl Into<String>, price: f64, quantity: u32) -> Self {
        Self {
            id,
            code: None,
            name: Some(name.into()),
            description: Some(String::new()),
            image: None,
            category: String::new(),
            price,
            quantity,
            internal_reference: None,
            shell_id: None,
            inventory_status: None,
            rating: None,
            created_at: None,
            updated_at: None,
            extra: Map::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    /// Name for logs and cart lines; empty when the record has none.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }
}

/// Payload for creating a new product. The identifier and timestamps are assigned
/// by the catalog, everything else comes from the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductCreate {
    pub code: Option<String>,
    pub name: String,
    pub description: String,
    pub image: Option<String>,
    pub category: String,
    pub price: f64,
    pub quantity: u32,
    pub internal_reference: Option<String>,
    pub shell_id: Option<u64>,
    pub inventory_status: Option<InventoryStatus>,
    pub rating: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProductCreate {
    pub fn new(name: impl Into<String>, description: impl Into<String>, price: f64, quantity: u32) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            price,
            quantity,
            ..Self::default()
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }
}

/// Partial update merged over a stored product. Absent fields keep their value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductPatch {
    pub code: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub quantity: Option<u32>,
    pub internal_reference: Option<String>,
    pub shell_id: Option<u64>,
    pub inventory_status: Option<InventoryStatus>,
    pub rating: Option<f64>,
    /// Unmodeled fields, merged key by key over the stored ones.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
