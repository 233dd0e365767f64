use chrono::Utc;
use serde_json::{Map, Value};

use crate::actor_framework::{Entity, FrameworkError, IdSequence};
use crate::domain::{Product, ProductCreate, ProductPatch};

impl Entity for Product {
    type Id = u64;
    type CreateParams = ProductCreate;
    type Patch = ProductPatch;

    const KIND: &'static str = "product";

    fn id(&self) -> &u64 {
        &self.id
    }

    /// Creates a new Product from creation parameters.
    ///
    /// # Arguments
    /// * `id` - Identifier drawn from the catalog's [`MaxPlusOne`] sequence
    /// * `params` - Caller-supplied fields
    ///
    /// # Errors
    /// Rejects a negative or non-finite price.
    fn from_create_params(id: u64, params: ProductCreate) -> Result<Self, FrameworkError> {
        validate_price(params.price)?;
        let mut product = Self {
            id,
            code: params.code,
            name: Some(params.name),
            description: Some(params.description),
            image: params.image,
            category: params.category,
            price: params.price,
            quantity: params.quantity,
            internal_reference: params.internal_reference,
            shell_id: params.shell_id,
            inventory_status: params.inventory_status,
            rating: params.rating,
            created_at: None,
            updated_at: None,
            extra: Map::new(),
        };
        merge_extra(&mut product.extra, params.extra);
        Ok(product)
    }

    /// Stamps both timestamps with the creation time.
    fn on_create(&mut self) -> Result<(), FrameworkError> {
        let now = Utc::now().timestamp_millis();
        self.created_at = Some(now);
        self.updated_at = Some(now);
        Ok(())
    }

    /// Merges the provided fields over the stored record.
    ///
    /// # Fields Updated
    /// Every field present in the patch. `id` and `createdAt` are not patchable;
    /// `updatedAt` is refreshed on every successful update.
    fn on_update(&mut self, patch: ProductPatch) -> Result<(), FrameworkError> {
        if let Some(price) = patch.price {
            validate_price(price)?;
            self.price = price;
        }
        if let Some(code) = patch.code {
            self.code = Some(code);
        }
        if let Some(name) = patch.name {
            self.name = Some(name);
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
        if let Some(image) = patch.image {
            self.image = Some(image);
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(quantity) = patch.quantity {
            self.quantity = quantity;
        }
        if let Some(reference) = patch.internal_reference {
            self.internal_reference = Some(reference);
        }
        if let Some(shell_id) = patch.shell_id {
            self.shell_id = Some(shell_id);
        }
        if let Some(status) = patch.inventory_status {
            self.inventory_status = Some(status);
        }
        if let Some(rating) = patch.rating {
            self.rating = Some(rating);
        }
        merge_extra(&mut self.extra, patch.extra);
        self.updated_at = Some(Utc::now().timestamp_millis());
        Ok(())
    }
}

/// Modeled fields a caller cannot set through a create or patch body.
const RESERVED_KEYS: [&str; 3] = ["id", "createdAt", "updatedAt"];

fn merge_extra(target: &mut Map<String, Value>, incoming: Map<String, Value>) {
    for (key, value) in incoming {
        if !RESERVED_KEYS.contains(&key.as_str()) {
            target.insert(key, value);
        }
    }
}

fn validate_price(price: f64) -> Result<(), FrameworkError> {
    if price.is_finite() && price >= 0.0 {
        Ok(())
    } else {
        Err(FrameworkError::Validation(format!("price must be a non-negative number, got {price}")))
    }
}

/// Product identifier policy: one past the highest identifier in the collection,
/// or 1 for an empty collection.
///
/// The maximum is taken over the collection the actor just loaded. Two processes
/// sharing one data file can both observe the same maximum and hand out the same
/// identifier; nothing here guards against that.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaxPlusOne;

impl IdSequence<Product> for MaxPlusOne {
    fn next_id(&self, existing: &[Product]) -> u64 {
        existing.iter().map(|p| p.id).max().map_or(1, |max| max + 1)
    }
}
