use std::sync::Arc;

use tracing::{error, info};

use super::config::AppConfig;
use super::error::SystemError;
use crate::cart::CartService;
use crate::catalog;
use crate::clients::{CartClient, ProductClient};
use crate::domain::Product;
use crate::repository::{InMemoryRepository, JsonFileRepository, Repository};

/// The main application system that owns the catalog and cart actors.
///
/// Responsible for starting up actors, wiring them to their repository, and
/// handling shutdown.
pub struct CatalogSystem {
    pub product_client: ProductClient,
    pub cart_client: CartClient,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl CatalogSystem {
    /// Starts the system with the repository named by `config`.
    pub fn new(config: &AppConfig) -> Self {
        let repository: Arc<dyn Repository<Product>> = match &config.data_file {
            Some(path) => {
                let repository = JsonFileRepository::<Product>::new(path);
                info!(path = %repository.path().display(), "Using JSON file catalog");
                Arc::new(repository)
            }
            None => {
                info!("Using in-memory catalog");
                Arc::new(InMemoryRepository::<Product>::new())
            }
        };
        Self::with_repository(repository, config.channel_capacity)
    }

    /// Starts the system over an existing repository. Must run inside a tokio runtime.
    pub fn with_repository(repository: Arc<dyn Repository<Product>>, channel_capacity: usize) -> Self {
        // 1. Catalog actor
        let (product_actor, product_client) = catalog::new(channel_capacity, repository);
        let product_handle = tokio::spawn(product_actor.run());

        // 2. Cart actor
        let (cart_service, cart_client) = CartService::new(channel_capacity);
        let cart_handle = tokio::spawn(cart_service.run());

        Self {
            product_client,
            cart_client,
            handles: vec![product_handle, cart_handle],
        }
    }

    /// Stops both actors and waits for them.
    ///
    /// The cart is told to stop explicitly; the catalog actor stops once the
    /// product client, its last sender, is dropped. Clones of either client held
    /// elsewhere keep the catalog actor alive, so drop them first.
    pub async fn shutdown(self) -> Result<(), SystemError> {
        info!("Shutting down system...");

        self.cart_client.shutdown().await?;
        drop(self.cart_client);
        drop(self.product_client);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(SystemError::TaskFailed(e));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
