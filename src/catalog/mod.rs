//! Catalog logic: the product entity, its identifier sequence, query parameter
//! normalization and the pure query engine.

pub mod entity;
pub mod error;
pub mod params;
pub mod query;

use std::sync::Arc;

pub use entity::MaxPlusOne;
pub use error::*;
pub use params::*;
pub use query::{categories, query, QueryResult};

use crate::actor_framework::ResourceActor;
use crate::clients::ProductClient;
use crate::domain::Product;
use crate::repository::Repository;

/// Creates a new Product actor over `repository` and its client.
pub fn new(buffer_size: usize, repository: Arc<dyn Repository<Product>>) -> (ResourceActor<Product>, ProductClient) {
    let (actor, generic_client) = ResourceActor::new(buffer_size, repository, MaxPlusOne);
    let client = ProductClient::new(generic_client);

    (actor, client)
}
